//! Payment records and the creation payload sent to the accounts API.

use crate::allocation::{PaymentMode, ReceiptType};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A posted payment as listed by the accounts API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: i64,
    pub client_id: i64,
    pub receipt_date: Option<NaiveDate>,
    pub receipt_amount: Decimal,
    pub payment_mode: Option<PaymentMode>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub details: Vec<PaymentDetail>,
}

/// One flattened allocation row of a posted payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentDetail {
    pub id: i64,
    pub receipt_id: i64,
    pub reference_id: Option<i64>,
    pub receipt_type: ReceiptType,
    pub amount: Decimal,
    #[serde(default)]
    pub description: String,
}

/// Payload submitted to `POST /payment/create`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePaymentRequest {
    pub client_id: i64,
    pub receipt_date: Option<NaiveDate>,
    pub receipt_amount: Decimal,
    pub payment_mode: Option<PaymentMode>,
    pub description: String,
    pub opening_balance: Decimal,
    pub opening_balance_date: Option<NaiveDate>,
    pub details: Vec<CreatePaymentLine>,
}

/// One allocation line within a creation payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePaymentLine {
    pub receipt_type: ReceiptType,
    pub reference_ids: Vec<i64>,
    pub amount: Decimal,
    pub description: String,
}

/// Upstream acknowledgement for a created payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePaymentResponse {
    pub payment_id: i64,
}
