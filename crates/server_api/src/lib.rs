use shared::{
    domain::UserId,
    error::{ApiError, ErrorCode},
    protocol::{
        GuestbookEntry, GuestbookWriteRequest, RsvpAccepted, RsvpRecord, RsvpRequest, RsvpSummary,
    },
};
use storage::Storage;
use tracing::info;

pub const MAX_GUEST_NAME_CHARS: usize = 40;
pub const MAX_GUESTBOOK_MESSAGE_CHARS: usize = 500;
pub const MAX_RSVP_MEMO_CHARS: usize = 500;

#[derive(Clone)]
pub struct ApiContext {
    pub storage: Storage,
}

pub async fn list_guestbook(
    ctx: &ApiContext,
    user_id: &UserId,
) -> Result<Vec<GuestbookEntry>, ApiError> {
    require_user(user_id)?;
    ctx.storage
        .list_guestbook_entries(user_id)
        .await
        .map_err(internal)
}

/// Stores a guestbook entry after trimming its text fields.
pub async fn add_guestbook_entry(
    ctx: &ApiContext,
    request: GuestbookWriteRequest,
) -> Result<GuestbookEntry, ApiError> {
    require_user(&request.user_id)?;
    let name = required_text("name", &request.entry.name, MAX_GUEST_NAME_CHARS)?;
    let message = required_text(
        "message",
        &request.entry.message,
        MAX_GUESTBOOK_MESSAGE_CHARS,
    )?;
    let entry = GuestbookEntry {
        name,
        message,
        date: request.entry.date,
    };

    let id = ctx
        .storage
        .insert_guestbook_entry(&request.user_id, &entry)
        .await
        .map_err(internal)?;
    info!(user_id = %request.user_id, entry_id = id, "guestbook entry stored");
    Ok(entry)
}

pub async fn submit_rsvp(
    ctx: &ApiContext,
    request: RsvpRequest,
) -> Result<RsvpAccepted, ApiError> {
    require_user(&request.user_id)?;
    let name = required_text("name", &request.name, MAX_GUEST_NAME_CHARS)?;
    if request.gift_amount < 0 {
        return Err(ApiError::validation("giftAmount must not be negative"));
    }
    let memo = optional_text(request.memo.as_deref());
    if memo
        .as_deref()
        .is_some_and(|memo| memo.chars().count() > MAX_RSVP_MEMO_CHARS)
    {
        return Err(ApiError::validation(format!(
            "memo exceeds {MAX_RSVP_MEMO_CHARS} characters"
        )));
    }

    let normalized = RsvpRequest {
        name,
        phone: optional_text(request.phone.as_deref()),
        memo,
        relationship: request.relationship.trim().to_string(),
        ..request
    };
    let id = ctx
        .storage
        .insert_rsvp(&normalized)
        .await
        .map_err(internal)?;
    info!(
        user_id = %normalized.user_id,
        rsvp_id = id,
        attendance = normalized.attendance.as_str(),
        "rsvp stored"
    );
    Ok(RsvpAccepted { id })
}

pub async fn list_rsvps(ctx: &ApiContext, user_id: &UserId) -> Result<Vec<RsvpRecord>, ApiError> {
    require_user(user_id)?;
    ctx.storage.list_rsvps(user_id).await.map_err(internal)
}

pub async fn rsvp_summary(ctx: &ApiContext, user_id: &UserId) -> Result<RsvpSummary, ApiError> {
    require_user(user_id)?;
    ctx.storage.rsvp_summary(user_id).await.map_err(internal)
}

fn require_user(user_id: &UserId) -> Result<(), ApiError> {
    if user_id.as_str().trim().is_empty() {
        return Err(ApiError::validation("userId is required"));
    }
    Ok(())
}

fn required_text(field: &str, value: &str, max_chars: usize) -> Result<String, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation(format!("{field} must not be empty")));
    }
    if trimmed.chars().count() > max_chars {
        return Err(ApiError::validation(format!(
            "{field} exceeds {max_chars} characters"
        )));
    }
    Ok(trimmed.to_string())
}

fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn internal(err: anyhow::Error) -> ApiError {
    ApiError::new(ErrorCode::Internal, err.to_string())
}
