use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::utils::format::round_cents;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub name: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    pub price: BigDecimal,
}

fn default_quantity() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetails {
    #[serde(alias = "orderId", alias = "id")]
    pub sale_id: String,
    #[serde(default)]
    pub merchant_name: Option<String>,
    pub total_amount: BigDecimal,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    /// Installment counts the merchant offers besides paying in full.
    #[serde(default, alias = "availableInstallments")]
    pub installment_options: Vec<u32>,
}

/// One selectable way to pay for an order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentPlan {
    pub installment_count: u32,
    pub is_pay_at_once: bool,
    pub installment_amount: BigDecimal,
}

impl InstallmentPlan {
    pub fn for_total(total: &BigDecimal, installment_count: u32) -> Self {
        let count = installment_count.max(1);
        Self {
            installment_count: count,
            is_pay_at_once: count == 1,
            installment_amount: round_cents(&(total.clone() / BigDecimal::from(count))),
        }
    }
}

impl OrderDetails {
    /// Pay-in-full first, then each offered count in ascending order.
    pub fn installment_plans(&self) -> Vec<InstallmentPlan> {
        let mut counts: Vec<u32> = self
            .installment_options
            .iter()
            .copied()
            .filter(|c| *c > 1)
            .collect();
        counts.sort_unstable();
        counts.dedup();

        std::iter::once(1)
            .chain(counts)
            .map(|count| InstallmentPlan::for_total(&self.total_amount, count))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanResult {
    #[serde(default, alias = "id")]
    pub loan_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
