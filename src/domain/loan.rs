//! Loan and installment entities as mirrored from the backend.
//!
//! The server owns the authoritative state; the client only enforces that
//! installment statuses move forward.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanStatus {
    #[serde(alias = "active", alias = "ACTIVE")]
    Active,
    #[serde(alias = "completed", alias = "COMPLETED")]
    Completed,
    #[serde(alias = "returned", alias = "RETURNED")]
    Returned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstallmentStatus {
    #[serde(alias = "pending", alias = "PENDING")]
    Pending,
    #[serde(alias = "paid", alias = "PAID")]
    Paid,
    #[serde(alias = "overdue", alias = "OVERDUE")]
    Overdue,
    #[serde(alias = "cancelled", alias = "CANCELLED")]
    Cancelled,
    #[serde(alias = "returned", alias = "RETURNED")]
    Returned,
}

impl InstallmentStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Paid | Self::Cancelled | Self::Returned)
    }

    pub fn is_payable(self) -> bool {
        matches!(self, Self::Pending | Self::Overdue)
    }

    pub fn can_transition_to(self, next: InstallmentStatus) -> bool {
        use InstallmentStatus::*;
        matches!(
            (self, next),
            (Pending, Paid)
                | (Pending, Overdue)
                | (Pending, Cancelled)
                | (Pending, Returned)
                | (Overdue, Paid)
                | (Overdue, Cancelled)
                | (Overdue, Returned)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Installment {
    pub id: String,
    #[serde(default, alias = "installmentNumber")]
    pub sequence: Option<u32>,
    pub amount: BigDecimal,
    pub due_date: DateTime<Utc>,
    pub status: InstallmentStatus,
    #[serde(default)]
    pub settle_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_down_payment: bool,
}

impl Installment {
    pub fn is_down_payment(&self) -> bool {
        self.is_down_payment || self.sequence == Some(0)
    }

    pub fn is_late(&self, now: DateTime<Utc>) -> bool {
        self.status == InstallmentStatus::Overdue
            || (self.status == InstallmentStatus::Pending && self.due_date < now)
    }

    pub fn transition(&mut self, next: InstallmentStatus, at: DateTime<Utc>) -> Result<(), AppError> {
        if !self.status.can_transition_to(next) {
            return Err(AppError::InvalidState(format!(
                "Installment {} cannot move from {:?} to {:?}",
                self.id, self.status, next
            )));
        }
        self.status = next;
        if next == InstallmentStatus::Paid {
            self.settle_date = Some(at);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    #[serde(alias = "loanId")]
    pub id: String,
    #[serde(default)]
    pub merchant_name: Option<String>,
    pub total_amount: BigDecimal,
    #[serde(default, alias = "numberOfInstallments")]
    pub installment_count: u32,
    pub status: LoanStatus,
    #[serde(default)]
    pub installments: Vec<Installment>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Loan {
    /// Installments shown to the customer; the down payment is not one of them.
    pub fn visible_installments(&self) -> impl Iterator<Item = &Installment> {
        self.installments.iter().filter(|i| !i.is_down_payment())
    }

    pub fn installment_mut(&mut self, installment_id: &str) -> Option<&mut Installment> {
        self.installments.iter_mut().find(|i| i.id == installment_id)
    }

    pub fn paid_amount(&self) -> BigDecimal {
        self.visible_installments()
            .filter(|i| i.status == InstallmentStatus::Paid)
            .fold(BigDecimal::from(0), |acc, i| acc + i.amount.clone())
    }

    pub fn remaining_amount(&self) -> BigDecimal {
        self.visible_installments()
            .filter(|i| i.status.is_payable())
            .fold(BigDecimal::from(0), |acc, i| acc + i.amount.clone())
    }

    /// Earliest installment that still needs paying.
    pub fn next_due(&self) -> Option<&Installment> {
        self.visible_installments()
            .filter(|i| i.status.is_payable())
            .min_by_key(|i| i.due_date)
    }

    /// Marks the loan completed once every visible installment is settled.
    pub fn refresh_status(&mut self) {
        if self.status != LoanStatus::Active {
            return;
        }
        let settled = {
            let mut visible = self.visible_installments().peekable();
            visible.peek().is_some() && visible.all(|i| i.status == InstallmentStatus::Paid)
        };
        if settled {
            self.status = LoanStatus::Completed;
        }
    }
}
