use std::{fs, path::Path, path::PathBuf, sync::Arc, time::Duration};

use anyhow::{anyhow, Context, Result};
use chrono::{NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use client_core::{
    layout::Layout, ApiEndpoint, Clipboard, EngineDeps, EngineOptions, HttpGuestbookStore,
    HttpRsvpClient, MemoryClipboard, PreviewEngine, RsvpForm, SystemClock,
};
use shared::{
    domain::{Attendance, MealType, Side, UserId},
    invitation::InvitationData,
};
use tracing::warn;
use tracing_subscriber::EnvFilter;

mod clipboard;
mod config;
mod layouts;

use config::{load_settings, PreviewSettings};

const GUESTBOOK_LOAD_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Parser, Debug)]
struct Cli {
    /// Invitation JSON as authored in the editor.
    #[arg(long)]
    invitation: PathBuf,
    #[arg(long, default_value = "classic")]
    layout: String,
    /// Replaces the invitation's wedding date (YYYY-MM-DD).
    #[arg(long)]
    date: Option<NaiveDate>,
    /// Replaces the invitation's wedding time (HH:MM:SS).
    #[arg(long)]
    time: Option<NaiveTime>,
    /// Copy into the desktop clipboard instead of only echoing the text.
    #[arg(long)]
    system_clipboard: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Render {
        #[arg(long)]
        contact: bool,
        #[arg(long)]
        viewer: Option<usize>,
        #[arg(long)]
        expand: Option<String>,
    },
    Watch {
        #[arg(long, default_value_t = 10)]
        seconds: u64,
    },
    Sign {
        #[arg(long)]
        name: String,
        #[arg(long)]
        message: String,
    },
    Copy {
        text: String,
        #[arg(long, default_value = "내용이")]
        label: String,
    },
    CopyLink,
    Rsvp {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "groom", value_parser = parse_side)]
        side: Side,
        #[arg(long, default_value = "confirmed", value_parser = parse_attendance)]
        attendance: Attendance,
        #[arg(long, default_value = "adult", value_parser = parse_meal_type)]
        meal: MealType,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        memo: Option<String>,
        #[arg(long, default_value = "")]
        relationship: String,
        #[arg(long, default_value_t = 0)]
        gift_amount: i64,
        #[arg(long)]
        invitation_sent: bool,
    },
}

fn parse_side(raw: &str) -> Result<Side, String> {
    Side::parse(raw).ok_or_else(|| format!("unknown side '{raw}' (groom|bride)"))
}

fn parse_attendance(raw: &str) -> Result<Attendance, String> {
    Attendance::parse(raw).ok_or_else(|| format!("unknown attendance '{raw}' (confirmed|declined)"))
}

fn parse_meal_type(raw: &str) -> Result<MealType, String> {
    MealType::parse(raw).ok_or_else(|| format!("unknown meal type '{raw}' (adult|child|none)"))
}

fn load_invitation(path: &Path) -> Result<InvitationData> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read invitation '{}'", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse invitation '{}'", path.display()))
}

fn engine_options(settings: &PreviewSettings, cli: &Cli) -> EngineOptions {
    EngineOptions {
        user_id: UserId::new(settings.user_id.clone()),
        share_url: settings.share_url.clone(),
        utc_offset: settings.utc_offset(),
        date_override: cli.date,
        time_override: cli.time,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let settings = load_settings();
    let data = load_invitation(&cli.invitation)?;
    let layout = layouts::by_name(&cli.layout)
        .ok_or_else(|| anyhow!("unknown layout '{}' (classic|compact)", cli.layout))?;
    let endpoint = ApiEndpoint::new(&settings.server_url)?;
    let memory_clipboard = Arc::new(MemoryClipboard::default());
    let clipboard: Arc<dyn Clipboard> = if cli.system_clipboard {
        Arc::new(clipboard::SystemClipboard)
    } else {
        memory_clipboard.clone()
    };

    let mut engine = PreviewEngine::start(
        data,
        engine_options(&settings, &cli),
        EngineDeps {
            guestbook: Arc::new(HttpGuestbookStore::new(endpoint.clone())),
            clipboard,
            clock: Arc::new(SystemClock),
        },
    );
    if tokio::time::timeout(GUESTBOOK_LOAD_TIMEOUT, engine.guestbook_loaded())
        .await
        .is_err()
    {
        warn!(server_url = %settings.server_url, "guestbook did not load in time; rendering without it");
    }

    match cli.command {
        Command::Render {
            contact,
            viewer,
            expand,
        } => {
            if contact {
                engine.open_contact();
            }
            if let Some(index) = viewer {
                engine.open_photo_viewer(index);
            }
            if let Some(key) = expand {
                engine.toggle_accordion(&key);
            }
            print!("{}", engine.render_with(&*layout));
        }
        Command::Watch { seconds } => {
            let mut ticker = tokio::time::interval(Duration::from_secs(1));
            for _ in 0..=seconds {
                ticker.tick().await;
                println!("--- {} ---", layout.name());
                print!("{}", engine.render_with(&*layout));
            }
        }
        Command::Sign { name, message } => {
            engine.open_guestbook_form();
            engine.set_guestbook_name(name);
            engine.set_guestbook_message(message);
            if !engine.submit_guestbook() {
                return Err(anyhow!("guestbook name and message must not be blank"));
            }
            engine.flush_pending_writes().await;
            print!("{}", engine.render_with(&*layout));
        }
        Command::Copy { text, label } => {
            if engine.copy_to_clipboard(&text, &label).await {
                print!("{}", engine.render_with(&*layout));
            }
        }
        Command::CopyLink => {
            if engine.copy_link().await {
                if let Some(link) = memory_clipboard.last() {
                    println!("{link}");
                }
                print!("{}", engine.render_with(&*layout));
            }
        }
        Command::Rsvp {
            name,
            side,
            attendance,
            meal,
            phone,
            memo,
            relationship,
            gift_amount,
            invitation_sent,
        } => {
            let mut form = RsvpForm::default();
            form.name = name;
            form.side = side;
            form.attendance = attendance;
            form.meal_type = meal;
            form.phone = phone.unwrap_or_default();
            form.memo = memo.unwrap_or_default();
            form.relationship = relationship;
            form.gift_amount = gift_amount;
            form.invitation_sent = invitation_sent;
            let client = HttpRsvpClient::new(endpoint);
            match form.submit(&client, &engine.options().user_id).await {
                Ok(accepted) => println!("rsvp accepted id={}", accepted.id),
                Err(err) => {
                    eprintln!("{}", err.user_message());
                    return Err(err.into());
                }
            }
        }
    }

    engine.dispose();
    Ok(())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod config_tests;

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
