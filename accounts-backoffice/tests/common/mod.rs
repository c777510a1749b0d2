//! Shared test harness: the application under test plus a stub accounts API.

use accounts_backoffice::config::{AccountsApiConfig, Config, ServerConfig};
use accounts_backoffice::startup::Application;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// Observable state of the stub accounts API.
#[derive(Default)]
pub struct StubState {
    pub created_payments: Mutex<Vec<Value>>,
    pub outstanding_updates: Mutex<Vec<Value>>,
    pub fail_payment_create: AtomicBool,
    pub fail_invoice_list: AtomicBool,
    pub payment_create_delay_ms: AtomicU64,
}

/// A live stub playing the external accounts API.
pub struct StubBackend {
    pub url: String,
    pub state: Arc<StubState>,
}

impl StubBackend {
    pub async fn spawn() -> Self {
        let state = Arc::new(StubState::default());
        let router = stub_router(state.clone());
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub backend");
        let url = format!("http://{}", listener.local_addr().expect("stub address"));

        tokio::spawn(async move {
            axum::serve(listener, router).await.ok();
        });

        Self { url, state }
    }
}

/// The application under test.
pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
    pub backend: StubBackend,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let backend = StubBackend::spawn().await;
        let (address, client) = spawn_bare(backend.url.clone()).await;
        TestApp {
            address,
            client,
            backend,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }
}

/// Spawn the application against an arbitrary upstream URL and wait for it to
/// accept requests.
pub async fn spawn_bare(upstream_url: String) -> (String, reqwest::Client) {
    let config = Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        accounts_api: AccountsApiConfig {
            base_url: upstream_url,
            timeout_seconds: 5,
        },
        service_name: "accounts-backoffice".to_string(),
    };

    let app = Application::build(config)
        .await
        .expect("Failed to build test application");
    let port = app.port();

    tokio::spawn(async move {
        app.run_until_stopped().await.ok();
    });

    let address = format!("http://127.0.0.1:{}", port);
    let client = reqwest::Client::new();

    // Wait for the server to be ready by polling the health endpoint.
    let health_url = format!("{}/health", address);
    for _ in 0..50 {
        if client.get(&health_url).send().await.is_ok() {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    }

    (address, client)
}

/// An address nothing is listening on.
pub async fn unreachable_upstream() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to reserve a port");
    let url = format!("http://{}", listener.local_addr().expect("reserved address"));
    drop(listener);
    url
}

// -----------------------------------------------------------------------------
// Stub accounts API
// -----------------------------------------------------------------------------

fn stub_router(state: Arc<StubState>) -> Router {
    Router::new()
        .route("/client/list-all", post(stub_list_clients))
        .route("/client/:id", get(stub_get_client))
        .route("/client/update", put(stub_update_client))
        .route("/invoice/list-all", get(stub_list_invoices))
        .route("/payment/create", post(stub_create_payment))
        .route("/payment/list-all", post(stub_list_payments))
        .route("/payment/all-payment", get(stub_all_payments))
        .with_state(state)
}

fn canned_clients() -> Vec<Value> {
    vec![
        json!({
            "client_id": 1,
            "client_name": "Acme Abrasives",
            "address": "14 Mill Road",
            "city": "Pune",
            "phone": "9820012345",
            "currency": "INR",
            "country": "India",
            "outstanding": "1200.50",
            "credit_or_debit": "debit"
        }),
        json!({
            "client_id": 2,
            "client_name": "Globex Trading",
            "address": "2 Harbour Way",
            "city": "Mumbai",
            "phone": "9820054321",
            "currency": "INR",
            "country": "India",
            "outstanding": null,
            "credit_or_debit": null
        }),
        json!({
            "client_id": 3,
            "client_name": "Acme Polishing",
            "address": "7 Grinding Lane",
            "city": "Nashik",
            "phone": "9820067890",
            "currency": "INR",
            "country": "India",
            "outstanding": "80",
            "credit_or_debit": "credit"
        }),
    ]
}

fn canned_payments() -> Vec<Value> {
    vec![
        json!({
            "id": 11,
            "client_id": 1,
            "receipt_date": "2026-06-01",
            "receipt_amount": "750",
            "payment_mode": "cash",
            "description": "June receipt",
            "details": [
                {
                    "id": 1,
                    "receipt_id": 11,
                    "reference_id": 101,
                    "receipt_type": "invoice",
                    "amount": "600",
                    "description": ""
                },
                {
                    "id": 2,
                    "receipt_id": 11,
                    "reference_id": null,
                    "receipt_type": "on_account",
                    "amount": "150",
                    "description": "kept on account"
                }
            ]
        }),
        json!({
            "id": 12,
            "client_id": 2,
            "receipt_date": "2026-06-15",
            "receipt_amount": "300",
            "payment_mode": "bank",
            "description": "",
            "details": [
                {
                    "id": 3,
                    "receipt_id": 12,
                    "reference_id": 102,
                    "receipt_type": "invoice",
                    "amount": "300",
                    "description": ""
                }
            ]
        }),
    ]
}

async fn stub_list_clients(Json(body): Json<Value>) -> Json<Value> {
    let text = body["text"].as_str().unwrap_or("").to_lowercase();
    let limit = body["limit"].as_i64().unwrap_or(10).max(0) as usize;
    let offset = body["offset"].as_i64().unwrap_or(0).max(0) as usize;

    let filtered: Vec<Value> = canned_clients()
        .into_iter()
        .filter(|client| {
            client["client_name"]
                .as_str()
                .unwrap_or("")
                .to_lowercase()
                .contains(&text)
        })
        .collect();
    let total = filtered.len();
    let data: Vec<Value> = filtered.into_iter().skip(offset).take(limit).collect();

    Json(json!({ "data": data, "total": total }))
}

async fn stub_get_client(Path(id): Path<i64>) -> Response {
    match canned_clients()
        .into_iter()
        .find(|client| client["client_id"] == json!(id))
    {
        Some(client) => Json(client).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({"error": "not found"}))).into_response(),
    }
}

async fn stub_update_client(
    State(state): State<Arc<StubState>>,
    Json(body): Json<Value>,
) -> StatusCode {
    state
        .outstanding_updates
        .lock()
        .expect("stub lock")
        .push(body);
    StatusCode::OK
}

#[derive(Deserialize)]
struct InvoiceListParams {
    #[allow(dead_code)]
    client_id: Option<i64>,
}

async fn stub_list_invoices(
    State(state): State<Arc<StubState>>,
    Query(_params): Query<InvoiceListParams>,
) -> Response {
    if state.fail_invoice_list.load(Ordering::SeqCst) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "invoice store offline"})),
        )
            .into_response();
    }

    Json(json!({
        "data": [
            { "id": 101, "number": "INV-101", "date": "2026-05-01", "amount": "600" },
            { "id": 102, "number": "INV-102", "date": "2026-05-12", "amount": "300" },
            { "id": 103, "number": "INV-103", "date": "2026-06-02", "amount": "250" }
        ]
    }))
    .into_response()
}

async fn stub_create_payment(
    State(state): State<Arc<StubState>>,
    Json(body): Json<Value>,
) -> Response {
    let delay = state.payment_create_delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(std::time::Duration::from_millis(delay)).await;
    }

    if state.fail_payment_create.load(Ordering::SeqCst) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "ledger write failed"})),
        )
            .into_response();
    }

    state.created_payments.lock().expect("stub lock").push(body);
    (StatusCode::CREATED, Json(json!({"payment_id": 90001}))).into_response()
}

async fn stub_list_payments(Json(body): Json<Value>) -> Json<Value> {
    let limit = body["limit"].as_i64().unwrap_or(10).max(0) as usize;
    let offset = body["offset"].as_i64().unwrap_or(0).max(0) as usize;

    let all = canned_payments();
    let total = all.len();
    let data: Vec<Value> = all.into_iter().skip(offset).take(limit).collect();

    Json(json!({ "data": data, "total": total }))
}

async fn stub_all_payments() -> Json<Value> {
    Json(json!({ "data": canned_payments() }))
}
