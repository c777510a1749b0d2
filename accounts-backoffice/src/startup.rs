//! Application startup and lifecycle management.

use axum::middleware::from_fn;
use axum::routing::{get, patch, post, put};
use axum::Router;
use backoffice_core::error::AppError;
use backoffice_core::middleware::{request_id_middleware, request_span};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

use crate::allocation::EntryForm;
use crate::config::Config;
use crate::handlers::{app, clients, entry, metrics as metrics_handler, payments};
use crate::services::metrics::{init_metrics, metrics_middleware};
use crate::services::AccountsClient;

/// Shared application state: the upstream client and the single entry form.
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<AccountsClient>,
    pub entry: Arc<Mutex<EntryForm>>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(app::health_check))
        .route("/ready", get(app::readiness_check))
        .route("/metrics", get(metrics_handler::metrics))
        .route("/clients", get(clients::list_clients))
        .route("/clients/:client_id", get(clients::get_client))
        .route(
            "/clients/:client_id/outstanding",
            put(clients::update_outstanding),
        )
        .route("/payments", get(payments::list_payments))
        .route("/payments/details", get(payments::list_payment_details))
        .route("/entry", post(entry::start_entry).get(entry::get_entry))
        .route("/entry/receipt", put(entry::update_receipt))
        .route("/entry/lines", post(entry::add_line))
        .route(
            "/entry/lines/:index",
            patch(entry::edit_line).delete(entry::remove_line),
        )
        .route(
            "/entry/lines/:index/references",
            put(entry::set_line_references),
        )
        .route("/entry/submit", post(entry::submit_entry))
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| request_span(request)),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Application container owning the bound listener.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Bind the listener and assemble the shared state. Port 0 binds a random
    /// free port.
    pub async fn build(config: Config) -> Result<Self, AppError> {
        init_metrics();

        let accounts = Arc::new(AccountsClient::new(config.accounts_api.clone())?);
        let state = AppState {
            accounts,
            entry: Arc::new(Mutex::new(EntryForm::default())),
        };

        let address = format!("{}:{}", config.server.host, config.server.port);
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!("Failed to bind listener to {}: {}", address, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    /// Port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve requests until the process is stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        tracing::info!(port = self.port, "Starting accounts-backoffice");
        axum::serve(self.listener, build_router(self.state)).await
    }
}
