use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{Attendance, MealType, Side, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestbookEntry {
    pub name: String,
    pub message: String,
    /// Calendar day the entry was written, serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestbookQuery {
    pub user_id: UserId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestbookWriteRequest {
    pub user_id: UserId,
    pub entry: GuestbookEntry,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RsvpRequest {
    pub user_id: UserId,
    pub name: String,
    pub side: Side,
    pub attendance: Attendance,
    pub meal_type: MealType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    #[serde(default)]
    pub relationship: String,
    #[serde(default)]
    pub gift_amount: i64,
    #[serde(default)]
    pub invitation_sent: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RsvpAccepted {
    pub id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RsvpRecord {
    pub id: i64,
    #[serde(flatten)]
    pub request: RsvpRequest,
}

/// Head counts over all RSVPs of one invitation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RsvpSummary {
    pub total: i64,
    pub confirmed: i64,
    pub declined: i64,
    pub groom_side: i64,
    pub bride_side: i64,
    pub adult_meals: i64,
    pub child_meals: i64,
    pub gift_total: i64,
}

impl RsvpSummary {
    pub fn tally<'a>(records: impl IntoIterator<Item = &'a RsvpRequest>) -> Self {
        let mut summary = Self::default();
        for rsvp in records {
            summary.total += 1;
            summary.gift_total += rsvp.gift_amount;
            match rsvp.side {
                Side::Groom => summary.groom_side += 1,
                Side::Bride => summary.bride_side += 1,
            }
            match rsvp.attendance {
                Attendance::Declined => summary.declined += 1,
                Attendance::Confirmed => {
                    summary.confirmed += 1;
                    match rsvp.meal_type {
                        MealType::Adult => summary.adult_meals += 1,
                        MealType::Child => summary.child_meals += 1,
                        MealType::None => {}
                    }
                }
            }
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rsvp(side: Side, attendance: Attendance, meal_type: MealType, gift: i64) -> RsvpRequest {
        RsvpRequest {
            user_id: UserId::new("owner"),
            name: "guest".into(),
            side,
            attendance,
            meal_type,
            phone: None,
            memo: None,
            relationship: String::new(),
            gift_amount: gift,
            invitation_sent: false,
        }
    }

    #[test]
    fn rsvp_request_uses_camel_case_wire_names() {
        let value = serde_json::to_value(rsvp(
            Side::Bride,
            Attendance::Confirmed,
            MealType::Child,
            50_000,
        ))
        .expect("json");
        assert_eq!(value["userId"], "owner");
        assert_eq!(value["side"], "bride");
        assert_eq!(value["attendance"], "confirmed");
        assert_eq!(value["mealType"], "child");
        assert_eq!(value["giftAmount"], 50_000);
        assert_eq!(value["invitationSent"], false);
        assert!(value.get("phone").is_none());
    }

    #[test]
    fn guestbook_entry_date_is_plain_calendar_day() {
        let entry = GuestbookEntry {
            name: "Kim".into(),
            message: "Congrats".into(),
            date: NaiveDate::from_ymd_opt(2026, 10, 15).expect("date"),
        };
        let value = serde_json::to_value(&entry).expect("json");
        assert_eq!(value["date"], "2026-10-15");
    }

    #[test]
    fn summary_counts_meals_only_for_confirmed_guests() {
        let records = [
            rsvp(Side::Groom, Attendance::Confirmed, MealType::Adult, 100_000),
            rsvp(Side::Bride, Attendance::Confirmed, MealType::Child, 0),
            rsvp(Side::Bride, Attendance::Declined, MealType::Adult, 30_000),
        ];
        let summary = RsvpSummary::tally(records.iter());
        assert_eq!(summary.total, 3);
        assert_eq!(summary.confirmed, 2);
        assert_eq!(summary.declined, 1);
        assert_eq!(summary.groom_side, 1);
        assert_eq!(summary.bride_side, 2);
        assert_eq!(summary.adult_meals, 1);
        assert_eq!(summary.child_meals, 1);
        assert_eq!(summary.gift_total, 130_000);
    }
}
