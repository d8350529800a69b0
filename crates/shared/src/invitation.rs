use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone};
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::{CoverDisplayMode, Section};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParentInfo {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(deserialize_with = "null_as_default")]
    pub deceased: bool,
}

impl ParentInfo {
    pub fn is_present(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

/// Per-section visibility switches authored alongside the invitation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SectionFlags {
    #[serde(deserialize_with = "null_as_default")]
    pub show_gallery: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub show_calendar: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub show_countdown: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub show_rsvp: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub show_guestbook: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub show_funding: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub show_guest_snap: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub show_directions: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub show_accounts: bool,
}

/// Static, user-authored content and configuration of one invitation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InvitationData {
    #[serde(deserialize_with = "null_as_default")]
    pub groom_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub bride_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub groom_phone: String,
    #[serde(deserialize_with = "null_as_default")]
    pub bride_phone: String,
    #[serde(deserialize_with = "null_as_default")]
    pub groom_father: ParentInfo,
    #[serde(deserialize_with = "null_as_default")]
    pub groom_mother: ParentInfo,
    #[serde(deserialize_with = "null_as_default")]
    pub bride_father: ParentInfo,
    #[serde(deserialize_with = "null_as_default")]
    pub bride_mother: ParentInfo,

    #[serde(with = "lenient_date")]
    pub wedding_date: Option<NaiveDate>,
    #[serde(with = "lenient_time")]
    pub wedding_time: Option<NaiveTime>,

    #[serde(deserialize_with = "null_as_default")]
    pub venue_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub venue_hall: String,
    #[serde(deserialize_with = "null_as_default")]
    pub venue_address: String,

    #[serde(flatten)]
    pub sections: SectionFlags,

    #[serde(deserialize_with = "null_as_default")]
    pub greeting_title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub greeting_message: String,
    #[serde(deserialize_with = "null_as_default")]
    pub funding_message: String,
    #[serde(deserialize_with = "null_as_default")]
    pub closing_message: String,

    pub cover_image: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub main_photos: Vec<Option<String>>,
    #[serde(deserialize_with = "null_as_default")]
    pub gallery_images: Vec<Option<String>>,
    #[serde(deserialize_with = "null_as_default")]
    pub guest_snap_photos: Vec<Option<String>>,
    pub cover_display_style: CoverDisplayMode,
}

/// Reads JSON `null` the same as a missing key.
fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(d).map(Option::unwrap_or_default)
}

fn present(entry: &Option<String>) -> Option<String> {
    entry.as_ref().filter(|url| !url.is_empty()).cloned()
}

impl InvitationData {
    /// Cover image followed by the main photos, empty entries dropped.
    pub fn all_photos(&self) -> Vec<String> {
        std::iter::once(&self.cover_image)
            .chain(self.main_photos.iter())
            .filter_map(present)
            .collect()
    }

    pub fn gallery(&self) -> Vec<String> {
        self.gallery_images.iter().filter_map(present).collect()
    }

    pub fn guest_snaps(&self) -> Vec<String> {
        self.guest_snap_photos.iter().filter_map(present).collect()
    }

    /// Wedding start in `offset`. A missing time means midnight.
    pub fn wedding_at(&self, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
        let date = self.wedding_date?;
        let time = self.wedding_time.unwrap_or(NaiveTime::MIN);
        offset.from_local_datetime(&date.and_time(time)).single()
    }

    /// Whether `section` should be rendered: its flag is on and there is
    /// something to show.
    pub fn section_enabled(&self, section: Section) -> bool {
        let flags = &self.sections;
        match section {
            Section::Cover | Section::Greeting | Section::Closing => true,
            Section::Parents => [
                &self.groom_father,
                &self.groom_mother,
                &self.bride_father,
                &self.bride_mother,
            ]
            .iter()
            .any(|parent| parent.is_present()),
            Section::Calendar => flags.show_calendar && self.wedding_date.is_some(),
            Section::Countdown => flags.show_countdown && self.wedding_date.is_some(),
            Section::Gallery => flags.show_gallery && !self.gallery().is_empty(),
            Section::Directions => {
                flags.show_directions && !self.venue_address.trim().is_empty()
            }
            Section::Accounts => flags.show_accounts,
            Section::Funding => flags.show_funding,
            Section::Rsvp => flags.show_rsvp,
            Section::Guestbook => flags.show_guestbook,
            Section::GuestSnap => flags.show_guest_snap && !self.guest_snaps().is_empty(),
        }
    }
}

mod lenient_date {
    use chrono::NaiveDate;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(date) => s.serialize_str(&date.format("%Y-%m-%d").to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw = Option::<String>::deserialize(d)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) => NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .map(Some)
                .map_err(|err| D::Error::custom(format!("invalid weddingDate {text:?}: {err}"))),
        }
    }
}

mod lenient_time {
    use chrono::NaiveTime;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<NaiveTime>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(time) => s.serialize_str(&time.format("%H:%M").to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveTime>, D::Error> {
        let raw = Option::<String>::deserialize(d)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) => NaiveTime::parse_from_str(text, "%H:%M:%S")
                .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M"))
                .map(Some)
                .map_err(|err| D::Error::custom(format!("invalid weddingTime {text:?}: {err}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_photos_skips_missing_entries_and_keeps_order() {
        let data = InvitationData {
            cover_image: None,
            main_photos: vec![Some("a".into()), Some(String::new()), Some("b".into())],
            ..Default::default()
        };
        assert_eq!(data.all_photos(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn all_photos_puts_cover_first() {
        let data = InvitationData {
            cover_image: Some("cover".into()),
            main_photos: vec![None, Some("main".into())],
            ..Default::default()
        };
        assert_eq!(data.all_photos(), vec!["cover".to_string(), "main".to_string()]);
    }

    #[test]
    fn parses_camel_case_json_with_nulls_and_short_time() {
        let raw = serde_json::json!({
            "groomName": "민수",
            "brideName": "지은",
            "weddingDate": "2026-11-21",
            "weddingTime": "14:30",
            "coverImage": null,
            "mainPhotos": ["a.jpg", null, ""],
            "galleryImages": ["g1.jpg", ""],
            "showGallery": true,
            "showCalendar": true,
            "coverDisplayStyle": "slide"
        });
        let data: InvitationData = serde_json::from_value(raw).expect("invitation");
        assert_eq!(data.groom_name, "민수");
        assert_eq!(data.wedding_date, NaiveDate::from_ymd_opt(2026, 11, 21));
        assert_eq!(data.wedding_time, NaiveTime::from_hms_opt(14, 30, 0));
        assert_eq!(data.all_photos(), vec!["a.jpg".to_string()]);
        assert_eq!(data.gallery(), vec!["g1.jpg".to_string()]);
        assert_eq!(data.cover_display_style, CoverDisplayMode::Slide);
        assert!(data.section_enabled(Section::Gallery));
        assert!(data.section_enabled(Section::Calendar));
        assert!(!data.section_enabled(Section::Countdown));
    }

    #[test]
    fn unknown_display_style_falls_back_to_fade() {
        let data: InvitationData =
            serde_json::from_value(serde_json::json!({ "coverDisplayStyle": "zoom" }))
                .expect("invitation");
        assert_eq!(data.cover_display_style, CoverDisplayMode::Fade);
    }

    #[test]
    fn null_fields_read_as_defaults() {
        let data: InvitationData = serde_json::from_value(serde_json::json!({
            "coverDisplayStyle": null,
            "mainPhotos": null,
            "groomName": null,
            "groomFather": null,
            "brideMother": { "name": "박영희", "phone": null, "deceased": null },
            "showGallery": null,
            "closingMessage": null
        }))
        .expect("invitation");
        assert_eq!(data.cover_display_style, CoverDisplayMode::Fade);
        assert!(data.main_photos.is_empty());
        assert!(data.groom_name.is_empty());
        assert_eq!(data.groom_father, ParentInfo::default());
        assert_eq!(data.bride_mother.name, "박영희");
        assert!(data.bride_mother.phone.is_empty());
        assert!(!data.bride_mother.deceased);
        assert!(!data.sections.show_gallery);
        assert!(data.closing_message.is_empty());
    }

    #[test]
    fn empty_date_string_means_no_wedding_date() {
        let data: InvitationData =
            serde_json::from_value(serde_json::json!({ "weddingDate": "", "weddingTime": "" }))
                .expect("invitation");
        assert!(data.wedding_date.is_none());
        assert!(data.wedding_at(FixedOffset::east_opt(0).expect("offset")).is_none());
    }

    #[test]
    fn wedding_at_combines_date_time_and_offset() {
        let data = InvitationData {
            wedding_date: NaiveDate::from_ymd_opt(2026, 11, 21),
            wedding_time: NaiveTime::from_hms_opt(12, 0, 0),
            ..Default::default()
        };
        let kst = FixedOffset::east_opt(9 * 3600).expect("offset");
        let at = data.wedding_at(kst).expect("datetime");
        assert_eq!(at.to_rfc3339(), "2026-11-21T12:00:00+09:00");
    }

    #[test]
    fn gallery_section_needs_images() {
        let data = InvitationData {
            sections: SectionFlags {
                show_gallery: true,
                ..Default::default()
            },
            gallery_images: vec![Some(String::new())],
            ..Default::default()
        };
        assert!(!data.section_enabled(Section::Gallery));
    }
}
