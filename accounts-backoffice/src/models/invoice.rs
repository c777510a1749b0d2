//! Reference documents offered for allocation.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An invoice a payment line may reference.
///
/// Read-only: fetched from the accounts API and never mutated here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceDocument {
    pub id: i64,
    pub number: String,
    pub date: NaiveDate,
    pub amount: Decimal,
}
