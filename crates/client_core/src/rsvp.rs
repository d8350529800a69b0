use async_trait::async_trait;
use shared::{
    domain::{Attendance, MealType, Side, UserId},
    protocol::{RsvpAccepted, RsvpRequest},
};
use thiserror::Error;
use tracing::{info, warn};

use crate::transport::ApiEndpoint;

pub const RSVP_RETRY_MESSAGE: &str = "전송에 실패했습니다. 다시 시도해주세요.";
pub const RSVP_NAME_REQUIRED_MESSAGE: &str = "이름을 입력해주세요.";

#[derive(Debug, Error)]
pub enum RsvpError {
    #[error("rsvp name is required")]
    MissingName,
    #[error("an rsvp submission is already in flight")]
    InFlight,
    #[error("rsvp rejected by server with status {0}")]
    Rejected(u16),
    #[error("failed to send rsvp: {0}")]
    Transport(String),
}

impl RsvpError {
    /// Message shown to the guest for this failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::MissingName => RSVP_NAME_REQUIRED_MESSAGE,
            Self::InFlight | Self::Rejected(_) | Self::Transport(_) => RSVP_RETRY_MESSAGE,
        }
    }
}

#[async_trait]
pub trait RsvpSender: Send + Sync {
    async fn send(&self, request: &RsvpRequest) -> Result<RsvpAccepted, RsvpError>;
}

pub struct HttpRsvpClient {
    endpoint: ApiEndpoint,
}

impl HttpRsvpClient {
    pub fn new(endpoint: ApiEndpoint) -> Self {
        Self { endpoint }
    }
}

#[async_trait]
impl RsvpSender for HttpRsvpClient {
    async fn send(&self, request: &RsvpRequest) -> Result<RsvpAccepted, RsvpError> {
        let url = self
            .endpoint
            .url("api/rsvp")
            .map_err(|e| RsvpError::Transport(e.to_string()))?;
        let response = self
            .endpoint
            .http()
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| RsvpError::Transport(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(RsvpError::Rejected(status.as_u16()));
        }
        response
            .json::<RsvpAccepted>()
            .await
            .map_err(|e| RsvpError::Transport(e.to_string()))
    }
}

/// Guest-facing RSVP form. Submission disables the form until the server
/// answers; a failure re-enables it.
#[derive(Debug, Clone)]
pub struct RsvpForm {
    pub name: String,
    pub side: Side,
    pub attendance: Attendance,
    pub meal_type: MealType,
    pub phone: String,
    pub memo: String,
    pub relationship: String,
    pub gift_amount: i64,
    pub invitation_sent: bool,
    submitting: bool,
    submitted: bool,
}

impl Default for RsvpForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            side: Side::Groom,
            attendance: Attendance::Confirmed,
            meal_type: MealType::Adult,
            phone: String::new(),
            memo: String::new(),
            relationship: String::new(),
            gift_amount: 0,
            invitation_sent: false,
            submitting: false,
            submitted: false,
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl RsvpForm {
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn can_submit(&self) -> bool {
        !self.submitting && !self.name.trim().is_empty()
    }

    pub fn to_request(&self, user_id: &UserId) -> Result<RsvpRequest, RsvpError> {
        let name = non_empty(&self.name).ok_or(RsvpError::MissingName)?;
        let meal_type = match self.attendance {
            Attendance::Declined => MealType::None,
            Attendance::Confirmed => self.meal_type,
        };
        Ok(RsvpRequest {
            user_id: user_id.clone(),
            name,
            side: self.side,
            attendance: self.attendance,
            meal_type,
            phone: non_empty(&self.phone),
            memo: non_empty(&self.memo),
            relationship: self.relationship.trim().to_string(),
            gift_amount: self.gift_amount.max(0),
            invitation_sent: self.invitation_sent,
        })
    }

    pub async fn submit(
        &mut self,
        sender: &dyn RsvpSender,
        user_id: &UserId,
    ) -> Result<RsvpAccepted, RsvpError> {
        if self.submitting {
            return Err(RsvpError::InFlight);
        }
        let request = self.to_request(user_id)?;

        self.submitting = true;
        let result = sender.send(&request).await;
        self.submitting = false;

        match &result {
            Ok(accepted) => {
                self.submitted = true;
                info!(rsvp_id = accepted.id, "rsvp submitted");
            }
            Err(err) => warn!(error = %err, "rsvp submission failed"),
        }
        result
    }
}
