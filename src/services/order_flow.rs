//! Order lookup, loan creation and the scan-to-order checkout flow.

use serde::Serialize;
use serde_json::json;

use crate::api::MobileApiClient;
use crate::deeplink::resolve_sale_code;
use crate::domain::{InstallmentPlan, LoanResult, OrderDetails};
use crate::error::AppError;
use crate::services::sale_validator::SaleValidator;

pub const ORDER_DETAILS_FUNCTION: &str = "getOrderDetails";
pub const CREATE_LOAN_FUNCTION: &str = "createLoan";

#[derive(Clone)]
pub struct OrderService {
    api: MobileApiClient,
}

impl OrderService {
    pub fn new(api: MobileApiClient) -> Self {
        Self { api }
    }

    pub async fn fetch_order_details(&self, order_id: &str) -> Result<OrderDetails, AppError> {
        let order_id = order_id.trim();
        if order_id.is_empty() {
            return Err(AppError::ValidationError("Order id is required".to_string()));
        }

        let response = self
            .api
            .call(ORDER_DETAILS_FUNCTION, json!({ "orderId": order_id }))
            .await?;
        let details: OrderDetails = response.into_data()?;
        tracing::debug!(order_id = %order_id, total = %details.total_amount, "Fetched order details");
        Ok(details)
    }

    /// Creates the loan for a validated sale. Nothing is rolled back on
    /// failure; the server owns the state and the caller may simply retry.
    pub async fn create_loan(
        &self,
        sale_id: &str,
        installment_count: u32,
    ) -> Result<LoanResult, AppError> {
        let sale_id = sale_id.trim();
        if sale_id.is_empty() {
            return Err(AppError::ValidationError("Sale id is required".to_string()));
        }
        if installment_count == 0 {
            return Err(AppError::ValidationError(
                "Choose at least one installment".to_string(),
            ));
        }

        let is_pay_at_once = installment_count == 1;
        let response = self
            .api
            .call(
                CREATE_LOAN_FUNCTION,
                json!({
                    "saleId": sale_id,
                    "installmentCount": installment_count,
                    "isPayAtOnce": is_pay_at_once,
                }),
            )
            .await?
            .ensure_success()?;

        let message = response.message.clone();
        let mut result: LoanResult = if response.data.is_object() {
            response.into_data()?
        } else {
            LoanResult {
                loan_id: response.data.as_str().map(str::to_string),
                message: None,
            }
        };
        if result.message.is_none() {
            result.message = message;
        }

        tracing::info!(
            sale_id = %sale_id,
            installments = installment_count,
            loan_id = ?result.loan_id,
            "Loan created"
        );
        Ok(result)
    }
}

/// Plans offered for an order: pay in full first, then each installment
/// count the order allows.
pub fn installment_options(details: &OrderDetails) -> Vec<InstallmentPlan> {
    details.installment_plans()
}

/// Where the checkout flow lands after a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "step", rename_all = "camelCase")]
pub enum CheckoutStep {
    /// Proceed to the order screen for this sale.
    #[serde(rename_all = "camelCase")]
    Order {
        sale_code: String,
        merchant_id: Option<String>,
    },
    /// Static merchant QR: open the merchant page instead.
    #[serde(rename_all = "camelCase")]
    Merchant { merchant_id: String },
    #[serde(rename_all = "camelCase")]
    Blocked { message: String, requires_card: bool },
    Invalid,
}

/// Result of [`CheckoutFlow::checkout`]: the step plus, when the sale is
/// payable, the order it leads to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkout {
    pub step: CheckoutStep,
    pub order: Option<OrderDetails>,
}

/// Scan → resolve → validate. Validation failures stop the flow before any
/// order or loan call is made.
#[derive(Clone)]
pub struct CheckoutFlow {
    validator: SaleValidator,
    orders: OrderService,
}

impl CheckoutFlow {
    pub fn new(api: MobileApiClient) -> Self {
        Self {
            validator: SaleValidator::new(api.clone()),
            orders: OrderService::new(api),
        }
    }

    /// Runs [`start`](Self::start) and loads the order details for a payable
    /// sale. A failed detail fetch is an error; the step is not retried.
    pub async fn checkout(&self, input: &str) -> Result<Checkout, AppError> {
        let step = self.start(input).await;
        let order = match &step {
            CheckoutStep::Order { sale_code, .. } => {
                Some(self.orders.fetch_order_details(sale_code).await?)
            }
            _ => None,
        };
        Ok(Checkout { step, order })
    }

    pub async fn start(&self, input: &str) -> CheckoutStep {
        let resolution = resolve_sale_code(input);
        if !resolution.is_valid {
            return CheckoutStep::Invalid;
        }
        if resolution.is_fallback() {
            tracing::warn!("Sale code did not match a known format, trying it verbatim");
        }

        let sale_code = match (resolution.order_id, resolution.merchant_id.clone()) {
            (Some(sale_code), _) => sale_code,
            (None, Some(merchant_id)) => return CheckoutStep::Merchant { merchant_id },
            (None, None) => return CheckoutStep::Invalid,
        };

        let validation = self.validator.validate_sale(&sale_code).await;
        if !validation.success {
            return CheckoutStep::Blocked {
                message: validation.message,
                requires_card: validation.requires_card,
            };
        }

        CheckoutStep::Order {
            sale_code,
            merchant_id: resolution.merchant_id,
        }
    }
}
