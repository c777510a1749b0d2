//! REST client for the external accounts API.
//!
//! Every method maps one upstream endpoint. Any transport failure or non-2xx
//! status surfaces as `AppError::BadGateway`; nothing here retries.

use crate::config::AccountsApiConfig;
use crate::models::{
    Client, CreatePaymentRequest, CreatePaymentResponse, ListQuery, Page, Payment,
    ReferenceDocument,
};
use crate::services::metrics;
use backoffice_core::error::AppError;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::instrument;

/// Client for the accounts REST API this service sits in front of.
pub struct AccountsClient {
    client: reqwest::Client,
    settings: AccountsApiConfig,
}

/// Bare `{data}` envelope used by the non-paginated list endpoints.
#[derive(Deserialize)]
struct DataEnvelope<T> {
    data: Vec<T>,
}

impl AccountsClient {
    pub fn new(settings: AccountsApiConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::ConfigError(anyhow::anyhow!("Failed to build HTTP client: {}", e))
            })?;
        Ok(Self { client, settings })
    }

    pub fn base_url(&self) -> &str {
        &self.settings.base_url
    }

    /// Page of clients matching the free-text filter.
    #[instrument(skip(self, query))]
    pub async fn list_clients(&self, query: &ListQuery) -> Result<Page<Client>, AppError> {
        self.post_json(
            "/client/list-all",
            &json!({
                "limit": query.limit,
                "offset": query.offset,
                "text": query.text,
            }),
        )
        .await
    }

    /// A single client row.
    #[instrument(skip(self))]
    pub async fn get_client(&self, client_id: i64) -> Result<Client, AppError> {
        self.get_json(&format!("/client/{}", client_id)).await
    }

    /// Pass through an outstanding-balance correction.
    #[instrument(skip(self))]
    pub async fn update_outstanding(
        &self,
        client_id: i64,
        outstanding: Decimal,
        credit_or_debit: &str,
    ) -> Result<(), AppError> {
        self.put_json(
            "/client/update",
            &json!({
                "client_id": client_id,
                "outstanding": outstanding,
                "credit_or_debit": credit_or_debit,
            }),
        )
        .await
    }

    /// Candidate reference documents for allocation, optionally scoped to a
    /// client.
    #[instrument(skip(self))]
    pub async fn list_invoices(
        &self,
        client_id: Option<i64>,
    ) -> Result<Vec<ReferenceDocument>, AppError> {
        let path = "/invoice/list-all";
        let url = format!("{}{}", self.settings.base_url, path);

        let mut request = self.client.get(&url);
        if let Some(id) = client_id {
            request = request.query(&[("client_id", id)]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| upstream_unreachable(path, e))?;
        let envelope: DataEnvelope<ReferenceDocument> = decode(path, response).await?;
        Ok(envelope.data)
    }

    /// Submit an assembled payment. Any 2xx is success.
    #[instrument(skip(self, payload), fields(client_id = payload.client_id))]
    pub async fn create_payment(
        &self,
        payload: &CreatePaymentRequest,
    ) -> Result<CreatePaymentResponse, AppError> {
        self.post_json("/payment/create", payload).await
    }

    /// Page of posted payments matching the free-text filter.
    #[instrument(skip(self, query))]
    pub async fn list_payments(&self, query: &ListQuery) -> Result<Page<Payment>, AppError> {
        self.post_json(
            "/payment/list-all",
            &json!({
                "limit": query.limit,
                "offset": query.offset,
                "text": query.text,
            }),
        )
        .await
    }

    /// Every posted payment with its detail rows.
    #[instrument(skip(self))]
    pub async fn all_payments(&self) -> Result<Vec<Payment>, AppError> {
        let envelope: DataEnvelope<Payment> = self.get_json("/payment/all-payment").await?;
        Ok(envelope.data)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, AppError> {
        let url = format!("{}{}", self.settings.base_url, path);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| upstream_unreachable(path, e))?;
        decode(path, response).await
    }

    async fn post_json<T, B>(&self, path: &str, body: &B) -> Result<T, AppError>
    where
        T: DeserializeOwned,
        B: serde::Serialize + ?Sized,
    {
        let url = format!("{}{}", self.settings.base_url, path);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| upstream_unreachable(path, e))?;
        decode(path, response).await
    }

    async fn put_json<B>(&self, path: &str, body: &B) -> Result<(), AppError>
    where
        B: serde::Serialize + ?Sized,
    {
        let url = format!("{}{}", self.settings.base_url, path);
        let response = self
            .client
            .put(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| upstream_unreachable(path, e))?;

        let status = response.status();
        if !status.is_success() {
            metrics::track_upstream(path, "error");
            tracing::error!(path, status = %status, "Accounts API returned an error status");
            return Err(AppError::BadGateway(format!(
                "accounts API {} returned {}",
                path, status
            )));
        }
        metrics::track_upstream(path, "ok");
        Ok(())
    }
}

async fn decode<T: DeserializeOwned>(
    path: &str,
    response: reqwest::Response,
) -> Result<T, AppError> {
    let status = response.status();
    if status == reqwest::StatusCode::NOT_FOUND {
        metrics::track_upstream(path, "error");
        return Err(AppError::NotFound(anyhow::anyhow!(
            "accounts API has no record at {}",
            path
        )));
    }
    if !status.is_success() {
        metrics::track_upstream(path, "error");
        tracing::error!(path, status = %status, "Accounts API returned an error status");
        return Err(AppError::BadGateway(format!(
            "accounts API {} returned {}",
            path, status
        )));
    }
    metrics::track_upstream(path, "ok");

    response.json::<T>().await.map_err(|e| {
        tracing::error!(path, error = %e, "Accounts API returned an unreadable body");
        AppError::BadGateway(format!(
            "accounts API {} returned an invalid body: {}",
            path, e
        ))
    })
}

fn upstream_unreachable(path: &str, err: reqwest::Error) -> AppError {
    metrics::track_upstream(path, "unreachable");
    tracing::error!(path, error = %err, "Failed to reach the accounts API");
    AppError::BadGateway(format!("accounts API unreachable: {}", err))
}
