//! Payability check for a resolved sale before the order screen opens.

use serde::Serialize;
use serde_json::{json, Value};

use crate::api::{ApiError, MobileApiClient};
use crate::error::CONNECTIVITY_MESSAGE;

pub const VALIDATE_SALE_FUNCTION: &str = "validateSale";
pub const ADD_CARD_MESSAGE: &str = "Please add a payment card to continue with this purchase.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleValidation {
    pub success: bool,
    pub message: String,
    /// The backend refused because no card is on file.
    pub requires_card: bool,
}

impl SaleValidation {
    fn ok(message: String) -> Self {
        Self {
            success: true,
            message,
            requires_card: false,
        }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            requires_card: false,
        }
    }
}

/// Rewrites a backend refusal into the text shown to the customer.
///
/// Card problems are detected by substring; the backend has no error code
/// for them.
pub fn interpret_refusal(message: &str) -> SaleValidation {
    if message.to_lowercase().contains("card") {
        SaleValidation {
            success: false,
            message: ADD_CARD_MESSAGE.to_string(),
            requires_card: true,
        }
    } else {
        SaleValidation::failed(message)
    }
}

#[derive(Clone)]
pub struct SaleValidator {
    api: MobileApiClient,
}

impl SaleValidator {
    pub fn new(api: MobileApiClient) -> Self {
        Self { api }
    }

    pub async fn validate_sale(&self, order_id: &str) -> SaleValidation {
        let order_id = order_id.trim();
        if order_id.is_empty() {
            return SaleValidation::failed("Invalid sale code");
        }

        let response = match self
            .api
            .call(VALIDATE_SALE_FUNCTION, json!({ "saleId": order_id }))
            .await
        {
            Ok(response) => response,
            Err(ApiError::InvalidRequest(msg)) => return SaleValidation::failed(msg),
            Err(e) => {
                tracing::warn!(sale_id = %order_id, error = %e, "Sale validation request failed");
                return SaleValidation::failed(CONNECTIVITY_MESSAGE);
            }
        };

        if response.status_code == 200 && response.data == Value::Bool(true) {
            tracing::info!(sale_id = %order_id, "Sale validated");
            return SaleValidation::ok(response.message_or("Sale is valid"));
        }

        let message = response.message_or("This sale cannot be paid right now.");
        tracing::info!(
            sale_id = %order_id,
            status = response.status_code,
            message = %message,
            "Sale refused by backend"
        );
        interpret_refusal(&message)
    }
}
