//! Payment allocation: the receipt draft, its allocation lines, and the
//! derivations (running totals, balances, reference exclusivity) the
//! payment-entry form is built on.

mod engine;
mod form;

pub use engine::{AllocationLine, LineEdit, PaymentEntry, ReceiptDraft};
pub use form::EntryForm;

use backoffice_core::error::AppError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How an allocation line justifies its slice of the receipt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceiptType {
    Invoice,
    OnAccount,
    Advance,
    Other,
    #[default]
    Unset,
}

impl ReceiptType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReceiptType::Invoice => "invoice",
            ReceiptType::OnAccount => "on_account",
            ReceiptType::Advance => "advance",
            ReceiptType::Other => "other",
            ReceiptType::Unset => "unset",
        }
    }
}

/// Payment instrument recorded on the receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMode {
    Cash,
    Bank,
    Check,
}

/// Failures raised by the allocation engine and the entry form.
#[derive(Debug, Error, PartialEq)]
pub enum AllocationError {
    #[error("reference document {id} is already allocated on another line")]
    ReferenceInUse { id: i64 },

    #[error("allocated {allocated} exceeds the receipt amount {total}")]
    OverAllocated { allocated: Decimal, total: Decimal },

    #[error("no client selected for the receipt")]
    MissingClient,

    #[error("a submission is already in flight")]
    SubmissionInFlight,
}

impl From<AllocationError> for AppError {
    fn from(err: AllocationError) -> Self {
        match err {
            AllocationError::ReferenceInUse { .. } | AllocationError::SubmissionInFlight => {
                AppError::Conflict(anyhow::anyhow!(err))
            }
            AllocationError::OverAllocated { .. } | AllocationError::MissingClient => {
                AppError::BadRequest(anyhow::anyhow!(err))
            }
        }
    }
}

/// Coerce free-text numeric input. Empty or unparseable text becomes zero.
pub fn parse_amount(input: &str) -> Decimal {
    input.trim().parse::<Decimal>().unwrap_or(Decimal::ZERO)
}

/// Coerce free-text date input. Empty or unparseable text becomes `None`.
pub fn parse_date(input: &str) -> Option<chrono::NaiveDate> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse().ok()
}
