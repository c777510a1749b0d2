//! Payment review screens: posted payments and their detail rows.

use axum::{
    extract::{Query, State},
    Json,
};
use backoffice_core::error::AppError;
use validator::Validate;

use crate::models::{paginate, ListQuery, Page, Payment, PaymentDetail};
use crate::startup::AppState;

/// List posted payments, proxying the filter and window to the accounts API.
pub async fn list_payments(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<Payment>>, AppError> {
    query.validate()?;
    let page = state.accounts.list_payments(&query).await?;
    Ok(Json(page))
}

/// Flattened detail rows across every payment, filtered by receipt type.
///
/// The accounts API has no row-level endpoint for details, so the filter and
/// the page window are computed here over the full flattened list.
pub async fn list_payment_details(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<PaymentDetail>>, AppError> {
    query.validate()?;

    let payments = state.accounts.all_payments().await?;
    let needle = query.text.trim().to_lowercase();

    let rows: Vec<PaymentDetail> = payments
        .into_iter()
        .flat_map(|payment| payment.details)
        .filter(|detail| detail.receipt_type.as_str().contains(&needle))
        .collect();

    Ok(Json(paginate(rows, query.limit, query.offset)))
}
