use super::{engine_options, load_invitation, Cli, Command};
use crate::config::PreviewSettings;

use clap::Parser;
use shared::domain::{Attendance, CoverDisplayMode, MealType, Side};
use std::{
    env, fs,
    time::{SystemTime, UNIX_EPOCH},
};

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).expect("valid arguments")
}

#[test]
fn render_is_the_plain_subcommand() {
    let cli = parse(&["preview", "--invitation", "inv.json", "render", "--contact"]);
    assert_eq!(cli.layout, "classic");
    assert!(matches!(
        cli.command,
        Command::Render {
            contact: true,
            viewer: None,
            expand: None,
        }
    ));
}

#[test]
fn rsvp_arguments_use_wire_names() {
    let cli = parse(&[
        "preview",
        "--invitation",
        "inv.json",
        "rsvp",
        "--name",
        "Park",
        "--side",
        "bride",
        "--attendance",
        "declined",
        "--meal",
        "child",
        "--gift-amount",
        "50000",
    ]);
    let Command::Rsvp {
        name,
        side,
        attendance,
        meal,
        gift_amount,
        invitation_sent,
        ..
    } = cli.command
    else {
        panic!("expected rsvp command");
    };
    assert_eq!(name, "Park");
    assert_eq!(side, Side::Bride);
    assert_eq!(attendance, Attendance::Declined);
    assert_eq!(meal, MealType::Child);
    assert_eq!(gift_amount, 50_000);
    assert!(!invitation_sent);
}

#[test]
fn unknown_side_is_rejected() {
    let result = Cli::try_parse_from([
        "preview",
        "--invitation",
        "inv.json",
        "rsvp",
        "--name",
        "Park",
        "--side",
        "both",
    ]);
    assert!(result.is_err());
}

#[test]
fn date_and_time_overrides_reach_engine_options() {
    let cli = parse(&[
        "preview",
        "--invitation",
        "inv.json",
        "--date",
        "2026-11-21",
        "--time",
        "14:30:00",
        "watch",
    ]);
    let settings = PreviewSettings {
        user_id: "owner".into(),
        share_url: "https://invite.example/owner".into(),
        ..Default::default()
    };
    let options = engine_options(&settings, &cli);
    assert_eq!(options.user_id.as_str(), "owner");
    assert_eq!(options.share_url, "https://invite.example/owner");
    assert_eq!(options.date_override.map(|d| d.to_string()).as_deref(), Some("2026-11-21"));
    assert_eq!(options.time_override.map(|t| t.to_string()).as_deref(), Some("14:30:00"));
    assert!(matches!(cli.command, Command::Watch { seconds: 10 }));
}

#[test]
fn loads_invitation_json_from_disk() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("invitation_preview_test_{suffix}.json"));
    fs::write(
        &path,
        r#"{ "groomName": "민수", "brideName": "지은", "coverDisplayStyle": "static" }"#,
    )
    .expect("write invitation");

    let data = load_invitation(&path).expect("load invitation");
    assert_eq!(data.groom_name, "민수");
    assert_eq!(data.cover_display_style, CoverDisplayMode::Static);

    let _ = fs::remove_file(&path);
}

#[test]
fn missing_invitation_file_names_the_path() {
    let path = env::temp_dir().join("invitation_preview_missing.json");
    let err = load_invitation(&path).expect_err("should fail");
    assert!(err.to_string().contains("invitation_preview_missing.json"));
}
