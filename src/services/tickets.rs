//! Support tickets and the optimistic reply flow.

use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use crate::api::MobileApiClient;
use crate::domain::{Message, Sender, Ticket, TicketStatus};
use crate::error::AppError;

pub const CREATE_TICKET_FUNCTION: &str = "createTicket";
pub const LIST_TICKETS_FUNCTION: &str = "getTickets";
pub const TICKET_DETAILS_FUNCTION: &str = "getTicketDetails";
pub const REPLY_TICKET_FUNCTION: &str = "replyTicket";
pub const CLOSE_TICKET_FUNCTION: &str = "closeTicket";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTicket {
    pub subject: String,
    pub reason: String,
    pub message: String,
}

impl NewTicket {
    fn validate(&self) -> Result<(), AppError> {
        for (field, value) in [
            ("Subject", &self.subject),
            ("Reason", &self.reason),
            ("Message", &self.message),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::ValidationError(format!("{} is required", field)));
            }
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct TicketService {
    api: MobileApiClient,
}

impl TicketService {
    pub fn new(api: MobileApiClient) -> Self {
        Self { api }
    }

    pub async fn create_ticket(&self, ticket: &NewTicket) -> Result<Ticket, AppError> {
        ticket.validate()?;
        let created: Ticket = self
            .api
            .call(
                CREATE_TICKET_FUNCTION,
                json!({
                    "subject": ticket.subject.trim(),
                    "reason": ticket.reason.trim(),
                    "message": ticket.message.trim(),
                }),
            )
            .await?
            .into_data()?;
        tracing::info!(ticket_id = %created.id, "Support ticket created");
        Ok(created)
    }

    pub async fn list_tickets(&self) -> Result<Vec<Ticket>, AppError> {
        Ok(self.api.call(LIST_TICKETS_FUNCTION, json!({})).await?.into_data()?)
    }

    pub async fn get_ticket(&self, ticket_id: &str) -> Result<Ticket, AppError> {
        let mut ticket: Ticket = self
            .api
            .call(TICKET_DETAILS_FUNCTION, json!({ "ticketId": ticket_id }))
            .await?
            .into_data()?;
        ticket.sort_messages();
        Ok(ticket)
    }

    pub async fn close_ticket(&self, ticket: &mut Ticket) -> Result<(), AppError> {
        if ticket.is_closed() {
            return Ok(());
        }
        self.api
            .call(CLOSE_TICKET_FUNCTION, json!({ "ticketId": ticket.id }))
            .await?
            .ensure_success()?;
        ticket.status = TicketStatus::Closed;
        Ok(())
    }

    /// Appends the reply locally before the server answers. On success the
    /// local copy is replaced by the server's message; on failure it is
    /// removed again and the error returned.
    pub async fn send_reply(&self, ticket: &mut Ticket, text: &str) -> Result<Message, AppError> {
        ticket.ensure_accepts_customer_messages()?;
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::ValidationError("Message cannot be empty".to_string()));
        }

        let local_id = format!("local-{}", Uuid::new_v4());
        ticket.messages.push(Message {
            id: local_id.clone(),
            sender: Sender::Customer,
            text: text.to_string(),
            sent_at: Utc::now(),
            pending: true,
        });

        let result = self
            .api
            .call(
                REPLY_TICKET_FUNCTION,
                json!({ "ticketId": ticket.id, "message": text }),
            )
            .await
            .map_err(AppError::from)
            .and_then(|response| response.ensure_success().map_err(AppError::from));

        let position = ticket.messages.iter().position(|m| m.id == local_id);
        match result {
            Ok(response) => {
                let confirmed = serde_json::from_value::<Message>(response.data).ok();
                let message = match (position, confirmed) {
                    (Some(idx), Some(server)) => {
                        ticket.messages[idx] = server.clone();
                        server
                    }
                    (Some(idx), None) => {
                        ticket.messages[idx].pending = false;
                        ticket.messages[idx].clone()
                    }
                    (None, Some(server)) => {
                        ticket.messages.push(server.clone());
                        server
                    }
                    (None, None) => {
                        return Err(AppError::InvalidState(
                            "Reply disappeared from the thread".to_string(),
                        ))
                    }
                };
                ticket.sort_messages();
                Ok(message)
            }
            Err(e) => {
                if let Some(idx) = position {
                    ticket.messages.remove(idx);
                }
                tracing::warn!(ticket_id = %ticket.id, error = %e, "Reply failed, rolled back");
                Err(e)
            }
        }
    }
}
