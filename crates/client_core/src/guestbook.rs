use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use shared::{
    domain::UserId,
    protocol::{GuestbookEntry, GuestbookWriteRequest},
};
use tracing::debug;

use crate::transport::ApiEndpoint;

/// Layouts show at most this many guestbook entries.
pub const GUESTBOOK_DISPLAY_LIMIT: usize = 5;

/// Persistence for guestbook entries of one invitation owner.
#[async_trait]
pub trait GuestbookStore: Send + Sync {
    async fn load(&self, user_id: &UserId) -> Result<Vec<GuestbookEntry>>;
    async fn append(&self, user_id: &UserId, entry: &GuestbookEntry) -> Result<()>;
}

pub struct MissingGuestbookStore;

#[async_trait]
impl GuestbookStore for MissingGuestbookStore {
    async fn load(&self, user_id: &UserId) -> Result<Vec<GuestbookEntry>> {
        Err(anyhow!("guestbook backend unavailable for user {user_id}"))
    }

    async fn append(&self, user_id: &UserId, _entry: &GuestbookEntry) -> Result<()> {
        Err(anyhow!("guestbook backend unavailable for user {user_id}"))
    }
}

pub struct HttpGuestbookStore {
    endpoint: ApiEndpoint,
}

impl HttpGuestbookStore {
    pub fn new(endpoint: ApiEndpoint) -> Self {
        Self { endpoint }
    }
}

#[async_trait]
impl GuestbookStore for HttpGuestbookStore {
    async fn load(&self, user_id: &UserId) -> Result<Vec<GuestbookEntry>> {
        let body: serde_json::Value = self
            .endpoint
            .http()
            .get(self.endpoint.url("api/guestbook")?)
            .query(&[("userId", user_id.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(entries_from_json(body))
    }

    async fn append(&self, user_id: &UserId, entry: &GuestbookEntry) -> Result<()> {
        self.endpoint
            .http()
            .post(self.endpoint.url("api/guestbook")?)
            .json(&GuestbookWriteRequest {
                user_id: user_id.clone(),
                entry: entry.clone(),
            })
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

/// Anything other than a JSON array reads as an empty guestbook; malformed
/// elements are skipped.
pub fn entries_from_json(body: serde_json::Value) -> Vec<GuestbookEntry> {
    let serde_json::Value::Array(items) = body else {
        debug!("guestbook response is not a list; treating as empty");
        return Vec::new();
    };
    items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect()
}

/// Builds the entry a guest submits, or `None` when name or message is blank.
pub fn prepare_entry(name: &str, message: &str, today: NaiveDate) -> Option<GuestbookEntry> {
    let name = name.trim();
    let message = message.trim();
    if name.is_empty() || message.is_empty() {
        return None;
    }
    Some(GuestbookEntry {
        name: name.to_string(),
        message: message.to_string(),
        date: today,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 15).expect("date")
    }

    #[test]
    fn blank_name_or_message_is_rejected() {
        assert!(prepare_entry(" ", "hello", today()).is_none());
        assert!(prepare_entry("Kim", "\n\t", today()).is_none());
    }

    #[test]
    fn entry_text_is_trimmed() {
        let entry = prepare_entry(" Kim ", " Congrats ", today()).expect("entry");
        assert_eq!(entry.name, "Kim");
        assert_eq!(entry.message, "Congrats");
        assert_eq!(entry.date, today());
    }

    #[test]
    fn non_list_response_reads_as_empty() {
        assert!(entries_from_json(serde_json::json!({ "error": "nope" })).is_empty());
        assert!(entries_from_json(serde_json::Value::Null).is_empty());
    }

    #[test]
    fn malformed_list_items_are_skipped() {
        let entries = entries_from_json(serde_json::json!([
            { "name": "Kim", "message": "Congrats", "date": "2026-10-15" },
            { "name": "broken" },
            42
        ]));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "Kim");
    }
}
