use serde_json::json;

use crate::api::MobileApiClient;
use crate::domain::Card;
use crate::error::AppError;

pub const LIST_CARDS_FUNCTION: &str = "getCards";
pub const ADD_CARD_FUNCTION: &str = "addCard";
pub const REMOVE_CARD_FUNCTION: &str = "removeCard";

#[derive(Clone)]
pub struct PaymentMethodService {
    api: MobileApiClient,
}

impl PaymentMethodService {
    pub fn new(api: MobileApiClient) -> Self {
        Self { api }
    }

    pub async fn list_cards(&self) -> Result<Vec<Card>, AppError> {
        Ok(self.api.call(LIST_CARDS_FUNCTION, json!({})).await?.into_data()?)
    }

    /// The card used for installments. Customers have had at most one active
    /// card so far; if several are returned the first active one wins.
    pub async fn primary_card(&self) -> Result<Option<Card>, AppError> {
        let cards = self.list_cards().await?;
        Ok(cards.into_iter().find(|c| c.is_active))
    }

    /// Registers a card from a payment-provider token. Raw card numbers never
    /// reach this client.
    pub async fn add_card(&self, card_token: &str) -> Result<Card, AppError> {
        if card_token.trim().is_empty() {
            return Err(AppError::ValidationError("Card token is required".to_string()));
        }
        let card: Card = self
            .api
            .call(ADD_CARD_FUNCTION, json!({ "cardToken": card_token.trim() }))
            .await?
            .into_data()?;
        tracing::info!(brand = %card.brand, last4 = %card.last4, "Payment card added");
        Ok(card)
    }

    pub async fn remove_card(&self, card_id: &str) -> Result<(), AppError> {
        self.api
            .call(REMOVE_CARD_FUNCTION, json!({ "cardId": card_id }))
            .await?
            .ensure_success()?;
        Ok(())
    }
}
