use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TicketStatus {
    #[serde(alias = "active", alias = "ACTIVE", alias = "open", alias = "Open")]
    Active,
    #[serde(alias = "closed", alias = "CLOSED")]
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sender {
    #[serde(alias = "customer", alias = "CUSTOMER")]
    Customer,
    #[serde(alias = "support", alias = "SUPPORT", alias = "agent")]
    Support,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub sender: Sender,
    pub text: String,
    pub sent_at: DateTime<Utc>,
    /// Set while an optimistic local message awaits the server copy.
    #[serde(skip)]
    pub pending: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: String,
    pub subject: String,
    pub reason: String,
    pub status: TicketStatus,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Ticket {
    pub fn is_closed(&self) -> bool {
        self.status == TicketStatus::Closed
    }

    pub fn ensure_accepts_customer_messages(&self) -> Result<(), AppError> {
        if self.is_closed() {
            return Err(AppError::InvalidState(
                "This ticket is closed and no longer accepts replies.".to_string(),
            ));
        }
        Ok(())
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.iter().max_by_key(|m| m.sent_at)
    }

    /// Keeps the thread ordered by send time; equal timestamps keep arrival order.
    pub fn sort_messages(&mut self) {
        self.messages.sort_by_key(|m| m.sent_at);
    }
}
