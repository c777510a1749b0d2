//! Client directory screens: list, detail, outstanding correction.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use backoffice_core::error::AppError;
use validator::Validate;

use crate::models::{Client, ListQuery, Page, UpdateOutstanding};
use crate::startup::AppState;

/// List clients, proxying the filter and window to the accounts API.
pub async fn list_clients(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<Client>>, AppError> {
    query.validate()?;
    let page = state.accounts.list_clients(&query).await?;
    Ok(Json(page))
}

pub async fn get_client(
    State(state): State<AppState>,
    Path(client_id): Path<i64>,
) -> Result<Json<Client>, AppError> {
    let client = state.accounts.get_client(client_id).await?;
    Ok(Json(client))
}

/// Correct a client's outstanding balance upstream.
pub async fn update_outstanding(
    State(state): State<AppState>,
    Path(client_id): Path<i64>,
    Json(request): Json<UpdateOutstanding>,
) -> Result<StatusCode, AppError> {
    request.validate()?;

    state
        .accounts
        .update_outstanding(client_id, request.outstanding, &request.credit_or_debit)
        .await?;

    tracing::info!(
        client_id,
        outstanding = %request.outstanding,
        side = %request.credit_or_debit,
        "Outstanding balance updated"
    );

    Ok(StatusCode::NO_CONTENT)
}
