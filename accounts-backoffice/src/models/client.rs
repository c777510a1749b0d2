//! Client rows as served by the accounts API.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// A client of the back office.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub client_id: i64,
    pub client_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub outstanding: Option<Decimal>,
    #[serde(default)]
    pub credit_or_debit: Option<String>,
}

/// Input for correcting a client's outstanding balance.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateOutstanding {
    pub outstanding: Decimal,
    #[validate(custom(function = "validate_credit_or_debit"))]
    pub credit_or_debit: String,
}

fn validate_credit_or_debit(value: &str) -> Result<(), ValidationError> {
    match value {
        "credit" | "debit" => Ok(()),
        _ => {
            let mut err = ValidationError::new("credit_or_debit");
            err.message = Some("must be either \"credit\" or \"debit\"".into());
            Err(err)
        }
    }
}
