//! Payment review integration tests.

mod common;

use common::TestApp;
use serde_json::Value;

#[tokio::test]
async fn list_payments_proxies_the_page() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(app.url("/payments"))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());
    let page: Value = response.json().await.expect("Invalid page body");
    assert_eq!(page["total"], 2);
    assert_eq!(page["data"][0]["id"], 11);
    assert_eq!(page["data"][0]["receipt_amount"], "750");
    assert_eq!(page["data"][0]["payment_mode"], "cash");
}

#[tokio::test]
async fn payment_details_flatten_every_payment() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(app.url("/payments/details"))
        .send()
        .await
        .expect("Failed to execute request");

    let page: Value = response.json().await.expect("Invalid page body");
    assert_eq!(page["total"], 3);
    let rows = page["data"].as_array().expect("data array");
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["receipt_id"], 11);
    assert_eq!(rows[2]["receipt_id"], 12);
}

#[tokio::test]
async fn payment_details_filter_by_receipt_type() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(app.url("/payments/details?text=invoice"))
        .send()
        .await
        .expect("Failed to execute request");

    let page: Value = response.json().await.expect("Invalid page body");
    assert_eq!(page["total"], 2);
    for row in page["data"].as_array().expect("data array") {
        assert_eq!(row["receipt_type"], "invoice");
    }
}

#[tokio::test]
async fn payment_details_filter_matches_substrings_case_insensitively() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(app.url("/payments/details?text=ACCO"))
        .send()
        .await
        .expect("Failed to execute request");

    let page: Value = response.json().await.expect("Invalid page body");
    assert_eq!(page["total"], 1);
    assert_eq!(page["data"][0]["receipt_type"], "on_account");
}

#[tokio::test]
async fn payment_details_paginate_the_filtered_rows() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(app.url("/payments/details?text=invoice&limit=1&offset=1"))
        .send()
        .await
        .expect("Failed to execute request");

    let page: Value = response.json().await.expect("Invalid page body");
    // Total reflects the filter, not the slice.
    assert_eq!(page["total"], 2);
    let rows = page["data"].as_array().expect("data array");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["reference_id"], 102);
}
