//! The payment-entry form: one interactive allocation session.
//!
//! The form is a single shared state behind `AppState::entry`; handlers apply
//! engine operations under the lock and return the derived view. The submit
//! handler releases the lock around the upstream call so a concurrent submit
//! is rejected by the in-flight guard instead of queueing a duplicate.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use backoffice_core::error::AppError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::allocation::{
    parse_amount, parse_date, EntryForm, LineEdit, PaymentMode, ReceiptDraft, ReceiptType,
};
use crate::models::{CreatePaymentResponse, ReferenceDocument};
use crate::services::metrics;
use crate::startup::AppState;

/// Body for starting a fresh entry.
#[derive(Debug, Default, Deserialize)]
pub struct StartEntryRequest {
    /// Scope the candidate reference documents to this client.
    pub client_id: Option<i64>,
}

/// One-field line edit; the amount arrives as the raw input text.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineEditRequest {
    ReceiptType(ReceiptType),
    Amount(String),
    Description(String),
}

impl From<LineEditRequest> for LineEdit {
    fn from(edit: LineEditRequest) -> Self {
        match edit {
            LineEditRequest::ReceiptType(receipt_type) => LineEdit::ReceiptType(receipt_type),
            LineEditRequest::Amount(text) => LineEdit::Amount(parse_amount(&text)),
            LineEditRequest::Description(description) => LineEdit::Description(description),
        }
    }
}

/// Partial update of the receipt header; text amounts and dates are coerced.
#[derive(Debug, Default, Deserialize)]
pub struct ReceiptFieldsRequest {
    pub client_id: Option<i64>,
    pub receipt_date: Option<String>,
    pub amount: Option<String>,
    pub payment_mode: Option<PaymentMode>,
    pub description: Option<String>,
    pub opening_balance: Option<String>,
    pub opening_balance_date: Option<String>,
}

/// Body for replacing a line's reference set.
#[derive(Debug, Deserialize)]
pub struct SetReferencesRequest {
    pub reference_ids: Vec<i64>,
}

#[derive(Debug, Serialize)]
pub struct LineView {
    pub receipt_type: ReceiptType,
    pub reference_ids: Vec<i64>,
    /// References claimed by other lines; unavailable to this one.
    pub blocked_reference_ids: Vec<i64>,
    pub amount: Decimal,
    pub description: String,
    pub running_total: Decimal,
    /// Remaining balance after this line, clamped at zero for display.
    pub balance: Decimal,
}

#[derive(Debug, Serialize)]
pub struct EntryView {
    pub receipt: ReceiptDraft,
    pub lines: Vec<LineView>,
    pub candidates: Vec<ReferenceDocument>,
    pub total_allocated: Decimal,
    pub unallocated: Decimal,
    pub over_allocated: bool,
    pub submitting: bool,
}

fn entry_view(form: &EntryForm) -> EntryView {
    let entry = &form.entry;

    let lines = entry
        .lines
        .iter()
        .enumerate()
        .map(|(i, line)| LineView {
            receipt_type: line.receipt_type,
            reference_ids: line.references.iter().copied().collect(),
            blocked_reference_ids: entry.used_reference_ids(Some(i)).into_iter().collect(),
            amount: line.amount,
            description: line.description.clone(),
            running_total: entry.running_total(i),
            balance: entry.display_balance(i),
        })
        .collect();

    EntryView {
        receipt: entry.receipt.clone(),
        lines,
        candidates: form.candidates.clone(),
        total_allocated: entry.total_allocated(),
        unallocated: entry.unallocated().max(Decimal::ZERO),
        over_allocated: entry.unallocated() < Decimal::ZERO,
        submitting: form.is_submitting(),
    }
}

/// Start a fresh entry, fetching allocation candidates for the chosen client.
///
/// A candidate fetch failure is not fatal: the form starts with an empty
/// candidate list and stays usable.
#[tracing::instrument(skip(state, body))]
pub async fn start_entry(
    State(state): State<AppState>,
    body: Option<Json<StartEntryRequest>>,
) -> Result<Json<EntryView>, AppError> {
    let request = body.map(|Json(b)| b).unwrap_or_default();

    let candidates = match state.accounts.list_invoices(request.client_id).await {
        Ok(candidates) => candidates,
        Err(e) => {
            tracing::warn!(
                error = %e,
                "Reference document fetch failed; starting entry with no candidates"
            );
            Vec::new()
        }
    };

    let mut form = state.entry.lock().await;
    form.reset(candidates);
    Ok(Json(entry_view(&form)))
}

pub async fn get_entry(State(state): State<AppState>) -> Json<EntryView> {
    let form = state.entry.lock().await;
    Json(entry_view(&form))
}

pub async fn add_line(State(state): State<AppState>) -> Json<EntryView> {
    let mut form = state.entry.lock().await;
    form.entry.add_line();
    Json(entry_view(&form))
}

pub async fn remove_line(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Json<EntryView> {
    let mut form = state.entry.lock().await;
    form.entry.remove_line(index);
    Json(entry_view(&form))
}

pub async fn edit_line(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Json(request): Json<LineEditRequest>,
) -> Json<EntryView> {
    let mut form = state.entry.lock().await;
    form.entry.edit_line(index, request.into());
    Json(entry_view(&form))
}

pub async fn set_line_references(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Json(request): Json<SetReferencesRequest>,
) -> Result<Json<EntryView>, AppError> {
    let mut form = state.entry.lock().await;
    form.entry.set_line_references(index, request.reference_ids)?;
    Ok(Json(entry_view(&form)))
}

pub async fn update_receipt(
    State(state): State<AppState>,
    Json(request): Json<ReceiptFieldsRequest>,
) -> Json<EntryView> {
    let mut form = state.entry.lock().await;
    let receipt = &mut form.entry.receipt;

    if let Some(client_id) = request.client_id {
        receipt.client_id = Some(client_id);
    }
    if let Some(text) = request.receipt_date {
        receipt.receipt_date = parse_date(&text);
    }
    if let Some(text) = request.amount {
        receipt.amount = parse_amount(&text);
    }
    if let Some(mode) = request.payment_mode {
        receipt.payment_mode = Some(mode);
    }
    if let Some(description) = request.description {
        receipt.description = description;
    }
    if let Some(text) = request.opening_balance {
        receipt.opening_balance = parse_amount(&text);
    }
    if let Some(text) = request.opening_balance_date {
        receipt.opening_balance_date = parse_date(&text);
    }

    Json(entry_view(&form))
}

/// Submit the current entry upstream. The form resets only on success.
#[tracing::instrument(skip(state))]
pub async fn submit_entry(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<CreatePaymentResponse>), AppError> {
    let payload = {
        let mut form = state.entry.lock().await;
        match form.begin_submit() {
            Ok(payload) => payload,
            Err(err) => {
                metrics::track_submission("rejected");
                return Err(err.into());
            }
        }
    };

    let result = state.accounts.create_payment(&payload).await;

    let mut form = state.entry.lock().await;
    match result {
        Ok(response) => {
            form.complete_submit(true);
            metrics::track_submission("accepted");
            tracing::info!(
                payment_id = response.payment_id,
                client_id = payload.client_id,
                "Payment submitted"
            );
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(err) => {
            form.complete_submit(false);
            metrics::track_submission("failed");
            tracing::error!(error = %err, "Payment submission failed; entry preserved");
            Err(err)
        }
    }
}
