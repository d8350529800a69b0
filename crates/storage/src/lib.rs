use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use shared::{
    domain::{Attendance, MealType, Side, UserId},
    protocol::{GuestbookEntry, RsvpRecord, RsvpRequest, RsvpSummary},
};

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

#[derive(Debug, Clone)]
pub struct StoredGuestbookEntry {
    pub id: i64,
    pub user_id: UserId,
    pub entry: GuestbookEntry,
    pub created_at: DateTime<Utc>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool_options = if database_url.contains(":memory:") {
            // Every in-memory connection is its own database; pin a single one.
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };
        let pool = pool_options.connect_with(connect_options).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    pub async fn insert_guestbook_entry(
        &self,
        user_id: &UserId,
        entry: &GuestbookEntry,
    ) -> Result<i64> {
        let rec = sqlx::query(
            "INSERT INTO guestbook_entries (user_id, name, message, entry_date) VALUES (?, ?, ?, ?) RETURNING id",
        )
        .bind(user_id.as_str())
        .bind(&entry.name)
        .bind(&entry.message)
        .bind(entry.date)
        .fetch_one(&self.pool)
        .await
        .context("failed to insert guestbook entry")?;
        Ok(rec.get::<i64, _>(0))
    }

    /// Entries of one invitation, newest first.
    pub async fn list_guestbook_entries(&self, user_id: &UserId) -> Result<Vec<GuestbookEntry>> {
        Ok(self
            .list_stored_guestbook_entries(user_id)
            .await?
            .into_iter()
            .map(|stored| stored.entry)
            .collect())
    }

    pub async fn list_stored_guestbook_entries(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<StoredGuestbookEntry>> {
        let rows = sqlx::query(
            "SELECT id, user_id, name, message, entry_date, created_at
             FROM guestbook_entries
             WHERE user_id = ?
             ORDER BY id DESC",
        )
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await
        .context("failed to list guestbook entries")?;

        Ok(rows
            .into_iter()
            .map(|row| StoredGuestbookEntry {
                id: row.get("id"),
                user_id: UserId(row.get("user_id")),
                entry: GuestbookEntry {
                    name: row.get("name"),
                    message: row.get("message"),
                    date: row.get::<NaiveDate, _>("entry_date"),
                },
                created_at: row.get::<NaiveDateTime, _>("created_at").and_utc(),
            })
            .collect())
    }

    pub async fn delete_guestbook_entry(&self, user_id: &UserId, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM guestbook_entries WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id.as_str())
            .execute(&self.pool)
            .await
            .context("failed to delete guestbook entry")?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn insert_rsvp(&self, rsvp: &RsvpRequest) -> Result<i64> {
        let rec = sqlx::query(
            "INSERT INTO rsvps (user_id, name, side, attendance, meal_type, phone, memo, relationship, gift_amount, invitation_sent)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(rsvp.user_id.as_str())
        .bind(&rsvp.name)
        .bind(rsvp.side.as_str())
        .bind(rsvp.attendance.as_str())
        .bind(rsvp.meal_type.as_str())
        .bind(rsvp.phone.as_deref())
        .bind(rsvp.memo.as_deref())
        .bind(&rsvp.relationship)
        .bind(rsvp.gift_amount)
        .bind(rsvp.invitation_sent)
        .fetch_one(&self.pool)
        .await
        .context("failed to insert rsvp")?;
        Ok(rec.get::<i64, _>(0))
    }

    pub async fn list_rsvps(&self, user_id: &UserId) -> Result<Vec<RsvpRecord>> {
        let rows = sqlx::query(
            "SELECT id, user_id, name, side, attendance, meal_type, phone, memo, relationship, gift_amount, invitation_sent
             FROM rsvps
             WHERE user_id = ?
             ORDER BY id ASC",
        )
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await
        .context("failed to list rsvps")?;

        rows.iter().map(rsvp_from_row).collect()
    }

    pub async fn rsvp_summary(&self, user_id: &UserId) -> Result<RsvpSummary> {
        let records = self.list_rsvps(user_id).await?;
        Ok(RsvpSummary::tally(records.iter().map(|record| &record.request)))
    }
}

fn rsvp_from_row(row: &SqliteRow) -> Result<RsvpRecord> {
    let side: String = row.try_get("side")?;
    let attendance: String = row.try_get("attendance")?;
    let meal_type: String = row.try_get("meal_type")?;
    Ok(RsvpRecord {
        id: row.try_get("id")?,
        request: RsvpRequest {
            user_id: UserId(row.try_get("user_id")?),
            name: row.try_get("name")?,
            side: Side::parse(&side).ok_or_else(|| anyhow!("unknown rsvp side '{side}'"))?,
            attendance: Attendance::parse(&attendance)
                .ok_or_else(|| anyhow!("unknown rsvp attendance '{attendance}'"))?,
            meal_type: MealType::parse(&meal_type)
                .ok_or_else(|| anyhow!("unknown rsvp meal type '{meal_type}'"))?,
            phone: row.try_get("phone")?,
            memo: row.try_get("memo")?,
            relationship: row.try_get("relationship")?,
            gift_amount: row.try_get("gift_amount")?,
            invitation_sent: row.try_get("invitation_sent")?,
        },
    })
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url.contains(":memory:") || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
