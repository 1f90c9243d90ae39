//! Loan listing, per-loan enrichment and installment payment.

use bigdecimal::BigDecimal;
use chrono::Utc;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::MobileApiClient;
use crate::domain::{Installment, InstallmentStatus, Loan};
use crate::error::AppError;

pub const LIST_LOANS_FUNCTION: &str = "getLoans";
pub const LOAN_DETAILS_FUNCTION: &str = "getLoanDetails";
pub const PAY_INSTALLMENT_FUNCTION: &str = "payInstallment";

/// Per-loan detail fetched separately from the list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanDetails {
    #[serde(default)]
    pub installments: Vec<Installment>,
    /// Absent when the backend leaves the sums to the client.
    #[serde(default)]
    pub paid_amount: Option<BigDecimal>,
    #[serde(default)]
    pub remaining_amount: Option<BigDecimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanOverview {
    pub loan: Loan,
    pub paid_amount: BigDecimal,
    pub remaining_amount: BigDecimal,
    /// False when the detail call failed and zero defaults were substituted.
    pub details_loaded: bool,
}

impl LoanOverview {
    fn from_details(mut loan: Loan, details: Option<LoanDetails>) -> Self {
        match details {
            Some(details) => {
                if !details.installments.is_empty() {
                    loan.installments = details.installments;
                }
                let paid_amount = details.paid_amount.unwrap_or_else(|| loan.paid_amount());
                let remaining_amount = details
                    .remaining_amount
                    .unwrap_or_else(|| loan.remaining_amount());
                Self {
                    loan,
                    paid_amount,
                    remaining_amount,
                    details_loaded: true,
                }
            }
            None => Self {
                loan,
                paid_amount: BigDecimal::from(0),
                remaining_amount: BigDecimal::from(0),
                details_loaded: false,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceipt {
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Clone)]
pub struct LoanService {
    api: MobileApiClient,
}

impl LoanService {
    pub fn new(api: MobileApiClient) -> Self {
        Self { api }
    }

    pub async fn fetch_loans(&self) -> Result<Vec<Loan>, AppError> {
        let loans: Vec<Loan> = self.api.call(LIST_LOANS_FUNCTION, json!({})).await?.into_data()?;
        Ok(loans)
    }

    pub async fn fetch_loan_details(&self, loan_id: &str) -> Result<LoanDetails, AppError> {
        let details = self
            .api
            .call(LOAN_DETAILS_FUNCTION, json!({ "loanId": loan_id }))
            .await?
            .into_data()?;
        Ok(details)
    }

    /// Lists loans and enriches each one in parallel. A failed detail call
    /// only degrades that loan to zero amounts; the list itself still loads.
    pub async fn list_loans(&self) -> Result<Vec<LoanOverview>, AppError> {
        let loans = self.fetch_loans().await?;

        let enriched = join_all(loans.into_iter().map(|loan| async move {
            let details = match self.fetch_loan_details(&loan.id).await {
                Ok(details) => Some(details),
                Err(e) => {
                    tracing::warn!(loan_id = %loan.id, error = %e, "Loan detail fetch failed, using defaults");
                    None
                }
            };
            LoanOverview::from_details(loan, details)
        }))
        .await;

        Ok(enriched)
    }

    /// Pays one installment and applies the Paid transition locally once the
    /// backend confirms.
    pub async fn pay_installment(
        &self,
        loan: &mut Loan,
        installment_id: &str,
    ) -> Result<PaymentReceipt, AppError> {
        let installment = loan
            .installments
            .iter()
            .find(|i| i.id == installment_id)
            .ok_or_else(|| AppError::NotFound(format!("Installment {}", installment_id)))?;
        if installment.is_down_payment() {
            return Err(AppError::InvalidState(
                "The down payment is settled at checkout".to_string(),
            ));
        }
        if !installment.status.can_transition_to(InstallmentStatus::Paid) {
            return Err(AppError::InvalidState(format!(
                "Installment {} is already {:?}",
                installment_id, installment.status
            )));
        }
        let amount = installment.amount.clone();

        let response = self
            .api
            .call(
                PAY_INSTALLMENT_FUNCTION,
                json!({
                    "loanId": loan.id,
                    "installmentId": installment_id,
                    "amount": amount.to_string(),
                }),
            )
            .await?
            .ensure_success()?;

        let message = response.message.clone();
        let receipt = if response.data.is_object() {
            response.into_data()?
        } else {
            PaymentReceipt {
                transaction_id: None,
                message,
            }
        };

        if let Some(installment) = loan.installment_mut(installment_id) {
            installment.transition(InstallmentStatus::Paid, Utc::now())?;
        }
        loan.refresh_status();
        tracing::info!(loan_id = %loan.id, installment_id = %installment_id, "Installment paid");
        Ok(receipt)
    }
}
