use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use shared::domain::UserId;
use storage::Storage;

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, default_value = "sqlite://./data/invitations.db")]
    database_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    ListGuestbook {
        user_id: String,
    },
    DeleteGuestbookEntry {
        user_id: String,
        id: i64,
    },
    ListRsvps {
        user_id: String,
        #[arg(long)]
        json: bool,
    },
    RsvpSummary {
        user_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let storage = Storage::new(&cli.database_url).await?;

    match cli.command {
        Command::ListGuestbook { user_id } => {
            let entries = storage
                .list_stored_guestbook_entries(&UserId::new(user_id))
                .await?;
            for stored in entries {
                println!(
                    "#{} {} {}: {} (written {})",
                    stored.id,
                    stored.entry.date,
                    stored.entry.name,
                    stored.entry.message,
                    stored.created_at.to_rfc3339()
                );
            }
        }
        Command::DeleteGuestbookEntry { user_id, id } => {
            if !storage
                .delete_guestbook_entry(&UserId::new(user_id.clone()), id)
                .await?
            {
                bail!("no guestbook entry {id} for user {user_id}");
            }
            println!("deleted guestbook entry {id}");
        }
        Command::ListRsvps { user_id, json } => {
            let rsvps = storage.list_rsvps(&UserId::new(user_id)).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&rsvps)?);
            } else {
                for record in rsvps {
                    let rsvp = &record.request;
                    println!(
                        "#{} {} [{}] {} meal={} gift={}",
                        record.id,
                        rsvp.name,
                        rsvp.side.as_str(),
                        rsvp.attendance.as_str(),
                        rsvp.meal_type.as_str(),
                        rsvp.gift_amount
                    );
                }
            }
        }
        Command::RsvpSummary { user_id } => {
            let summary = storage.rsvp_summary(&UserId::new(user_id)).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}
