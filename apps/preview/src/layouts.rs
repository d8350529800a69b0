use std::fmt::Write;

use client_core::{
    calendar::CalendarGrid,
    countdown::Countdown,
    engine::EngineState,
    format::{d_day_label, wedding_date_label, wedding_datetime_label},
    layout::{Layout, PreviewHelpers},
};
use shared::{
    domain::Section,
    invitation::{InvitationData, ParentInfo},
};

pub const ACCOUNTS_GROOM: &str = "groom-accounts";
pub const ACCOUNTS_BRIDE: &str = "bride-accounts";

/// Looks a layout up by its CLI name.
pub fn by_name(name: &str) -> Option<Box<dyn Layout<Output = String>>> {
    match name {
        "classic" => Some(Box::new(ClassicLayout)),
        "compact" => Some(Box::new(CompactLayout)),
        _ => None,
    }
}

/// Every section, one titled block each.
pub struct ClassicLayout;

/// One line per section, for narrow terminals.
pub struct CompactLayout;

const COMPACT_ORDER: [Section; 5] = [
    Section::Cover,
    Section::Countdown,
    Section::Rsvp,
    Section::Guestbook,
    Section::Closing,
];

fn couple(data: &InvitationData) -> String {
    format!("{} ♥ {}", data.groom_name, data.bride_name)
}

fn parent_label(parent: &ParentInfo) -> String {
    if parent.deceased {
        format!("故 {}", parent.name)
    } else {
        parent.name.clone()
    }
}

fn parents_line(role: &str, father: &ParentInfo, mother: &ParentInfo) -> Option<String> {
    let names: Vec<String> = [father, mother]
        .into_iter()
        .filter(|parent| parent.is_present())
        .map(parent_label)
        .collect();
    (!names.is_empty()).then(|| format!("{role}: {}", names.join(" · ")))
}

fn countdown_label(countdown: &Countdown) -> String {
    format!(
        "{}일 {}시간 {}분 {}초",
        countdown.days, countdown.hours, countdown.minutes, countdown.seconds
    )
}

fn calendar_lines(grid: &CalendarGrid) -> Vec<String> {
    let mut lines = vec![format!("{}년 {}월", grid.year, grid.month)];
    lines.push(
        grid.day_names
            .iter()
            .map(|name| format!(" {name} "))
            .collect::<String>(),
    );
    for week in grid.weeks() {
        let row: String = week
            .iter()
            .map(|cell| match cell {
                Some(day) if *day == grid.wedding_day => format!("[{day:>2}]"),
                Some(day) => format!(" {day:>2} "),
                None => "    ".to_string(),
            })
            .collect();
        lines.push(row.trim_end().to_string());
    }
    lines
}

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n== {title} ==");
}

impl ClassicLayout {
    fn section(
        &self,
        out: &mut String,
        section: Section,
        data: &InvitationData,
        state: &EngineState,
        helpers: &dyn PreviewHelpers,
    ) {
        match section {
            Section::Cover => {
                let _ = writeln!(out, "{}", couple(data));
                let photos = helpers.all_photos();
                if let Some(photo) = photos.get(state.current_slide) {
                    let _ = writeln!(
                        out,
                        "[{}/{}] {photo}",
                        state.current_slide + 1,
                        photos.len()
                    );
                }
                if let Some(at) = helpers.wedding_datetime() {
                    let _ = writeln!(out, "{}", wedding_datetime_label(&at));
                }
                if !data.venue_name.is_empty() {
                    let _ = writeln!(out, "{} {}", data.venue_name, data.venue_hall);
                }
            }
            Section::Greeting => {
                let title = match data.greeting_title.as_str() {
                    "" => "인사말",
                    title => title,
                };
                heading(out, title);
                let _ = writeln!(out, "{}", data.greeting_message);
            }
            Section::Parents => {
                heading(out, "혼주");
                let lines = [
                    parents_line("신랑측", &data.groom_father, &data.groom_mother),
                    parents_line("신부측", &data.bride_father, &data.bride_mother),
                ];
                for line in lines.into_iter().flatten() {
                    let _ = writeln!(out, "{line}");
                }
                if state.show_contact {
                    let _ = writeln!(out, "신랑 {} / 신부 {}", data.groom_phone, data.bride_phone);
                }
            }
            Section::Calendar => {
                if let Some(grid) = helpers.calendar() {
                    heading(out, "달력");
                    for line in calendar_lines(&grid) {
                        let _ = writeln!(out, "{line}");
                    }
                }
            }
            Section::Countdown => {
                heading(out, "남은 시간");
                if let Some(date) = data.wedding_date {
                    let _ = writeln!(out, "{}", d_day_label(date, helpers.today()));
                }
                let _ = writeln!(out, "{}", countdown_label(&state.countdown));
            }
            Section::Gallery => {
                let gallery = helpers.gallery_images();
                heading(out, "갤러리");
                let _ = writeln!(out, "사진 {}장", gallery.len());
                if state.show_photo_viewer {
                    if let Some(photo) = gallery.get(state.viewer_index) {
                        let _ = writeln!(
                            out,
                            "보기 {}/{}: {photo}",
                            state.viewer_index + 1,
                            gallery.len()
                        );
                    }
                }
            }
            Section::Directions => {
                heading(out, "오시는 길");
                let _ = writeln!(out, "{} {}", data.venue_name, data.venue_hall);
                let _ = writeln!(out, "{}", data.venue_address);
            }
            Section::Accounts => {
                heading(out, "마음 전하실 곳");
                for (key, title) in [(ACCOUNTS_GROOM, "신랑측"), (ACCOUNTS_BRIDE, "신부측")] {
                    let open = state.expanded_accordion.as_deref() == Some(key);
                    let _ = writeln!(out, "{} {title}", if open { "▾" } else { "▸" });
                }
            }
            Section::Funding => {
                heading(out, "축하 펀딩");
                let _ = writeln!(out, "{}", data.funding_message);
            }
            Section::Rsvp => {
                heading(out, "참석 의사 전달");
                if let Some(date) = data.wedding_date {
                    let _ = writeln!(out, "{}", wedding_date_label(date));
                }
            }
            Section::Guestbook => {
                heading(out, "방명록");
                for entry in state.recent_guestbook_entries() {
                    let _ = writeln!(out, "{} ({}): {}", entry.name, entry.date, entry.message);
                }
                if state.guestbook_entries.is_empty() {
                    let _ = writeln!(out, "첫 번째 축하 메시지를 남겨주세요.");
                }
                if state.show_guestbook_form {
                    let _ = writeln!(
                        out,
                        "> {} / {}",
                        state.guestbook_name, state.guestbook_message
                    );
                }
            }
            Section::GuestSnap => {
                heading(out, "게스트 스냅");
                let _ = writeln!(out, "사진 {}장", data.guest_snaps().len());
            }
            Section::Closing => {
                if !data.closing_message.is_empty() {
                    heading(out, "맺음말");
                    let _ = writeln!(out, "{}", data.closing_message);
                }
            }
        }
    }
}

impl Layout for ClassicLayout {
    type Output = String;

    fn name(&self) -> &'static str {
        "classic"
    }

    fn render(
        &self,
        data: &InvitationData,
        state: &EngineState,
        helpers: &dyn PreviewHelpers,
    ) -> String {
        let mut out = String::new();
        for section in self.visible_sections(data) {
            self.section(&mut out, section, data, state, helpers);
        }
        if let Some(toast) = &state.copied_toast {
            let _ = writeln!(out, "\n({toast})");
        }
        out
    }
}

impl Layout for CompactLayout {
    type Output = String;

    fn name(&self) -> &'static str {
        "compact"
    }

    fn section_order(&self) -> &[Section] {
        &COMPACT_ORDER
    }

    fn render(
        &self,
        data: &InvitationData,
        state: &EngineState,
        helpers: &dyn PreviewHelpers,
    ) -> String {
        let mut lines = Vec::new();
        for section in self.visible_sections(data) {
            match section {
                Section::Cover => {
                    let when = helpers
                        .wedding_datetime()
                        .map(|at| wedding_datetime_label(&at))
                        .unwrap_or_default();
                    lines.push(format!("{} | {when}", couple(data)));
                }
                Section::Countdown => lines.push(countdown_label(&state.countdown)),
                Section::Rsvp => lines.push("RSVP".to_string()),
                Section::Guestbook => lines.push(format!(
                    "방명록 {}개",
                    state.guestbook_entries.len()
                )),
                Section::Closing if !data.closing_message.is_empty() => {
                    lines.push(data.closing_message.clone())
                }
                _ => {}
            }
        }
        if let Some(toast) = &state.copied_toast {
            lines.push(format!("({toast})"));
        }
        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}
