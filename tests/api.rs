//! Integration tests for the `GrantFlow` API.
//!
//! These tests run the complete router against an in-memory database,
//! covering authentication, role gates, and end-to-end request flows.

use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::{Datelike, Utc};
use grantflow::config::database::create_tables;
use grantflow::core::{auth, user};
use grantflow::entities::{Role, user as user_entity};
use grantflow::http::{AppState, server::build_app};
use serde_json::{Value, json};

const PASSWORD: &str = "integration-pw";
const SECRET: &str = "integration-test-secret";

/// Accounts seeded into every test server: one per role plus a second
/// beneficiary for isolation tests.
const ACCOUNTS: [(&str, Role); 4] = [
    ("beneficiary@example.com", Role::Beneficiary),
    ("other@example.com", Role::Beneficiary),
    ("manager@example.com", Role::Manager),
    ("admin@example.com", Role::Admin),
];

/// Create test app state backed by a fresh in-memory database
async fn create_test_state() -> AppState {
    let db = sea_orm::Database::connect("sqlite::memory:").await.unwrap();
    create_tables(&db).await.unwrap();
    for (email, role) in ACCOUNTS {
        user::create_user(&db, email, PASSWORD, role, None, None)
            .await
            .unwrap();
    }
    AppState::new(db, SECRET)
}

/// Create test server
async fn create_test_server() -> TestServer {
    TestServer::new(build_app(create_test_state().await)).unwrap()
}

/// Log in through the API and return the bearer token
async fn login(server: &TestServer, email: &str) -> String {
    let response = server
        .post("/api/auth/login")
        .json(&json!({"email": email, "password": PASSWORD}))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    body["data"]["token"].as_str().unwrap().to_string()
}

/// Create a draft request as the given beneficiary, returning its id
async fn create_draft(server: &TestServer, token: &str, amount: f64) -> i64 {
    let response = server
        .post("/api/requests")
        .authorization_bearer(token)
        .json(&json!({"type": "TRAVEL", "amount": amount, "description": "Test"}))
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    body["data"]["id"].as_i64().unwrap()
}

/// Walk a draft through submission and approval
async fn submit_and_approve(server: &TestServer, owner: &str, manager: &str, id: i64) {
    server
        .put(&format!("/api/requests/{id}/submit"))
        .authorization_bearer(owner)
        .await
        .assert_status_ok();
    server
        .put(&format!("/api/requests/{id}/status"))
        .authorization_bearer(manager)
        .json(&json!({"status": "APPROVED"}))
        .await
        .assert_status_ok();
}

// ============ Health Endpoint Tests ============

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server().await;

    let response = server.get("/api/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "healthy");
}

// ============ Authentication Tests ============

#[tokio::test]
async fn test_login_returns_token_and_redacts_password() {
    let server = create_test_server().await;

    let response = server
        .post("/api/auth/login")
        .json(&json!({"email": "manager@example.com", "password": PASSWORD}))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert!(!body["data"]["token"].as_str().unwrap().is_empty());
    assert_eq!(body["data"]["user"]["email"], "manager@example.com");
    assert_eq!(body["data"]["user"]["role"], "MANAGER");
    // The hash must never reach the wire
    assert!(body["data"]["user"].get("password").is_none());
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let server = create_test_server().await;

    let wrong_password = server
        .post("/api/auth/login")
        .json(&json!({"email": "admin@example.com", "password": "nope"}))
        .await;
    wrong_password.assert_status_unauthorized();

    let unknown_email = server
        .post("/api/auth/login")
        .json(&json!({"email": "ghost@example.com", "password": PASSWORD}))
        .await;
    unknown_email.assert_status_unauthorized();

    // Same status, same message: the endpoint cannot be used to probe
    // which accounts exist
    let a: Value = wrong_password.json();
    let b: Value = unknown_email.json();
    assert_eq!(a["error"], b["error"]);
    assert_eq!(a["code"], "UNAUTHORIZED");
    assert_eq!(a["success"], false);

    // A repeated wrong attempt fails the same way
    server
        .post("/api/auth/login")
        .json(&json!({"email": "admin@example.com", "password": "nope"}))
        .await
        .assert_status_unauthorized();
}

#[tokio::test]
async fn test_protected_routes_reject_missing_and_bad_tokens() {
    let server = create_test_server().await;

    // No Authorization header at all
    let response = server.get("/api/requests").await;
    response.assert_status_unauthorized();
    let body: Value = response.json();
    assert_eq!(body["code"], "UNAUTHORIZED");

    // Wrong scheme
    server
        .get("/api/requests")
        .authorization("Basic dXNlcjpwdw==")
        .await
        .assert_status_unauthorized();

    // Garbage token
    server
        .get("/api/requests")
        .authorization_bearer("not-a-token")
        .await
        .assert_status_unauthorized();

    // Well-formed token signed with the wrong secret
    let outsider = user_entity::Model {
        id: 1,
        email: "admin@example.com".to_string(),
        password: String::new(),
        role: Role::Admin,
        first_name: None,
        last_name: None,
    };
    let forged = auth::issue_token(&outsider, "some-other-secret").unwrap();
    server
        .get("/api/requests")
        .authorization_bearer(&forged)
        .await
        .assert_status_unauthorized();
}

// ============ Role Gate Tests ============

#[tokio::test]
async fn test_admin_surfaces_are_gated_by_role() {
    let server = create_test_server().await;
    let beneficiary = login(&server, "beneficiary@example.com").await;
    let manager = login(&server, "manager@example.com").await;

    // The budget overview needs a reviewer role
    let response = server
        .get("/api/budget/current")
        .authorization_bearer(&beneficiary)
        .await;
    response.assert_status_forbidden();
    let body: Value = response.json();
    assert_eq!(body["code"], "ROLE_ERROR");

    // Managers can read the budget but not the payment history
    server
        .get("/api/budget/current")
        .authorization_bearer(&manager)
        .await
        .assert_status_ok();
    server
        .get("/api/transactions")
        .authorization_bearer(&manager)
        .await
        .assert_status_forbidden();

    // Budget history and writes are admin-only
    server
        .get("/api/budget/history")
        .authorization_bearer(&manager)
        .await
        .assert_status_forbidden();
    server
        .put("/api/budget/2030")
        .authorization_bearer(&manager)
        .json(&json!({"total_amount": 1.0}))
        .await
        .assert_status_forbidden();

    // Creating requests is the beneficiary's job
    server
        .post("/api/requests")
        .authorization_bearer(&manager)
        .json(&json!({"type": "TRAVEL", "amount": 10.0}))
        .await
        .assert_status_forbidden();
}

// ============ Request Endpoint Tests ============

#[tokio::test]
async fn test_request_listing_is_isolated_per_beneficiary() {
    let server = create_test_server().await;
    let alice = login(&server, "beneficiary@example.com").await;
    let bob = login(&server, "other@example.com").await;
    let manager = login(&server, "manager@example.com").await;

    let alice_request = create_draft(&server, &alice, 100.0).await;
    create_draft(&server, &alice, 200.0).await;
    create_draft(&server, &bob, 300.0).await;

    let response = server.get("/api/requests").authorization_bearer(&alice).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let response = server.get("/api/requests").authorization_bearer(&bob).await;
    let body: Value = response.json();
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    // A reviewer sees everything
    let response = server
        .get("/api/requests")
        .authorization_bearer(&manager)
        .await;
    let body: Value = response.json();
    assert_eq!(body["data"].as_array().unwrap().len(), 3);

    // Another beneficiary cannot read Alice's request...
    let response = server
        .get(&format!("/api/requests/{alice_request}"))
        .authorization_bearer(&bob)
        .await;
    response.assert_status_forbidden();

    // ...but a manager can
    server
        .get(&format!("/api/requests/{alice_request}"))
        .authorization_bearer(&manager)
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_request_validation_reaches_the_wire() {
    let server = create_test_server().await;
    let token = login(&server, "beneficiary@example.com").await;

    let response = server
        .post("/api/requests")
        .authorization_bearer(&token)
        .json(&json!({"type": "TRAVEL", "amount": -5.0}))
        .await;
    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["code"], "VALIDATION_ERROR");

    server
        .post("/api/requests")
        .authorization_bearer(&token)
        .json(&json!({"type": "X", "amount": 50.0}))
        .await
        .assert_status_bad_request();

    // Identifiers must be positive integers
    server
        .get("/api/requests/banana")
        .authorization_bearer(&token)
        .await
        .assert_status_bad_request();

    // Unknown ids are 404, not 400
    let response = server
        .get("/api/requests/9999")
        .authorization_bearer(&token)
        .await;
    response.assert_status_not_found();
    let body: Value = response.json();
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_draft_editing_stops_at_submission() {
    let server = create_test_server().await;
    let owner = login(&server, "beneficiary@example.com").await;
    let id = create_draft(&server, &owner, 120.0).await;

    // Drafts can be edited
    let response = server
        .put(&format!("/api/requests/{id}"))
        .authorization_bearer(&owner)
        .json(&json!({"amount": 150.0}))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["amount"], 150.0);

    // Submission moves the request out of the owner's reach
    let response = server
        .put(&format!("/api/requests/{id}/submit"))
        .authorization_bearer(&owner)
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["status"], "SUBMITTED");

    let response = server
        .put(&format!("/api/requests/{id}"))
        .authorization_bearer(&owner)
        .json(&json!({"amount": 999.0}))
        .await;
    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_STATUS");

    // And it can no longer be deleted either
    server
        .delete(&format!("/api/requests/{id}"))
        .authorization_bearer(&owner)
        .await
        .assert_status_bad_request();
}

#[tokio::test]
async fn test_draft_deletion_rules() {
    let server = create_test_server().await;
    let owner = login(&server, "beneficiary@example.com").await;
    let other = login(&server, "other@example.com").await;
    let admin = login(&server, "admin@example.com").await;

    let mine = create_draft(&server, &owner, 10.0).await;
    let theirs = create_draft(&server, &owner, 20.0).await;

    // A stranger cannot delete someone else's draft
    server
        .delete(&format!("/api/requests/{mine}"))
        .authorization_bearer(&other)
        .await
        .assert_status_forbidden();

    // The owner can
    let response = server
        .delete(&format!("/api/requests/{mine}"))
        .authorization_bearer(&owner)
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"], "Request deleted");

    // So can an admin
    server
        .delete(&format!("/api/requests/{theirs}"))
        .authorization_bearer(&admin)
        .await
        .assert_status_ok();

    server
        .get(&format!("/api/requests/{mine}"))
        .authorization_bearer(&owner)
        .await
        .assert_status_not_found();
}

// ============ Budget Endpoint Tests ============

#[tokio::test]
async fn test_budget_check_reports_shortfall() {
    let server = create_test_server().await;
    let manager = login(&server, "manager@example.com").await;
    let admin = login(&server, "admin@example.com").await;

    server
        .put("/api/budget/2027")
        .authorization_bearer(&admin)
        .json(&json!({"total_amount": 300.0}))
        .await
        .assert_status_ok();

    let response = server
        .get("/api/budget/2027/check/120.5")
        .authorization_bearer(&manager)
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["has_enough"], true);
    assert_eq!(body["data"]["shortfall"], 0.0);

    let response = server
        .get("/api/budget/2027/check/500")
        .authorization_bearer(&manager)
        .await;
    let body: Value = response.json();
    assert_eq!(body["data"]["has_enough"], false);
    assert_eq!(body["data"]["remaining"], 300.0);
    assert_eq!(body["data"]["shortfall"], 200.0);

    // A year nobody budgeted reads as empty rather than erroring
    let response = server
        .get("/api/budget/2028/check/10")
        .authorization_bearer(&manager)
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["has_enough"], false);
    assert_eq!(body["data"]["remaining"], 0.0);
}

#[tokio::test]
async fn test_budget_initialize_is_idempotent() {
    let server = create_test_server().await;
    let admin = login(&server, "admin@example.com").await;

    let response = server
        .post("/api/budget/2029/initialize")
        .authorization_bearer(&admin)
        .json(&json!({"amount": 750.0}))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["total_amount"], 750.0);

    // A second initialize returns the existing ledger untouched
    let response = server
        .post("/api/budget/2029/initialize")
        .authorization_bearer(&admin)
        .json(&json!({"amount": 9999.0}))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["total_amount"], 750.0);

    // Reading a year nobody budgeted is a 404
    server
        .get("/api/budget/2042")
        .authorization_bearer(&admin)
        .await
        .assert_status_not_found();
}

// ============ End-to-End Flow Tests ============

/// Test complete flow: allocate budget -> draft -> submit -> approve -> pay
#[tokio::test]
async fn test_e2e_request_approval_and_payment() {
    let server = create_test_server().await;
    let owner = login(&server, "beneficiary@example.com").await;
    let manager = login(&server, "manager@example.com").await;
    let admin = login(&server, "admin@example.com").await;

    // Step 1: the admin allocates the 2025 budget
    let response = server
        .put("/api/budget/2025")
        .authorization_bearer(&admin)
        .json(&json!({"total_amount": 1000.0}))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["remaining_amount"], 1000.0);

    // Step 2: the beneficiary drafts and submits a request
    let response = server
        .post("/api/requests")
        .authorization_bearer(&owner)
        .json(&json!({"type": "TRAVEL", "amount": 400.0, "description": "Conference travel"}))
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["data"]["status"], "DRAFT");
    let id = body["data"]["id"].as_i64().unwrap();

    server
        .put(&format!("/api/requests/{id}/submit"))
        .authorization_bearer(&owner)
        .await
        .assert_status_ok();

    // Step 3: the manager approves it
    let response = server
        .put(&format!("/api/requests/{id}/status"))
        .authorization_bearer(&manager)
        .json(&json!({"status": "APPROVED"}))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["status"], "APPROVED");
    assert_eq!(body["data"]["approved_by"], "manager@example.com");

    // Step 4: the manager cannot pay, only an admin can
    server
        .put(&format!("/api/requests/{id}/status"))
        .authorization_bearer(&manager)
        .json(&json!({"status": "PAID", "year": 2025}))
        .await
        .assert_status_forbidden();

    let response = server
        .put(&format!("/api/requests/{id}/status"))
        .authorization_bearer(&admin)
        .json(&json!({"status": "PAID", "year": 2025}))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["status"], "PAID");
    assert_eq!(body["data"]["paid_by"], "admin@example.com");

    // Step 5: the ledger was debited
    let response = server
        .get("/api/budget/2025")
        .authorization_bearer(&admin)
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["remaining_amount"], 600.0);

    // Step 6: the payment is on the books
    let response = server
        .get("/api/transactions")
        .authorization_bearer(&admin)
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["count"], 1);
    let snapshot = &body["data"]["items"][0];
    assert_eq!(snapshot["amount"], 400.0);
    assert_eq!(snapshot["beneficiary_email"], "beneficiary@example.com");
    assert_eq!(snapshot["approved_by"], "manager@example.com");
    assert_eq!(snapshot["paid_by"], "admin@example.com");

    let snapshot_id = snapshot["id"].as_i64().unwrap();
    server
        .get(&format!("/api/transactions/{snapshot_id}"))
        .authorization_bearer(&admin)
        .await
        .assert_status_ok();
}

/// Test that two payments cannot spend the same funds
#[tokio::test]
async fn test_competing_payments_cannot_overspend() {
    let server = create_test_server().await;
    let owner = login(&server, "beneficiary@example.com").await;
    let manager = login(&server, "manager@example.com").await;
    let admin = login(&server, "admin@example.com").await;

    server
        .put("/api/budget/2031")
        .authorization_bearer(&admin)
        .json(&json!({"total_amount": 500.0}))
        .await
        .assert_status_ok();

    let first = create_draft(&server, &owner, 400.0).await;
    let second = create_draft(&server, &owner, 300.0).await;
    for id in [first, second] {
        submit_and_approve(&server, &owner, &manager, id).await;
    }

    // The first payment fits
    server
        .put(&format!("/api/requests/{first}/status"))
        .authorization_bearer(&admin)
        .json(&json!({"status": "PAID", "year": 2031}))
        .await
        .assert_status_ok();

    // The second would overdraw and must fail whole
    let response = server
        .put(&format!("/api/requests/{second}/status"))
        .authorization_bearer(&admin)
        .json(&json!({"status": "PAID", "year": 2031}))
        .await;
    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["code"], "INSUFFICIENT_BUDGET");

    // The loser is untouched and the ledger holds the difference
    let response = server
        .get(&format!("/api/requests/{second}"))
        .authorization_bearer(&admin)
        .await;
    let body: Value = response.json();
    assert_eq!(body["data"]["status"], "APPROVED");

    let response = server
        .get("/api/budget/2031")
        .authorization_bearer(&admin)
        .await;
    let body: Value = response.json();
    assert_eq!(body["data"]["remaining_amount"], 100.0);

    let response = server
        .get("/api/transactions")
        .authorization_bearer(&admin)
        .await;
    let body: Value = response.json();
    assert_eq!(body["data"]["count"], 1);
}

/// Test that reversing a payment refunds the ledger without erasing history
#[tokio::test]
async fn test_e2e_payment_reversal_restores_funds() {
    let server = create_test_server().await;
    let owner = login(&server, "beneficiary@example.com").await;
    let manager = login(&server, "manager@example.com").await;
    let admin = login(&server, "admin@example.com").await;

    // Reversals credit the year the payment happened in, so settle
    // against the current one
    let year = Utc::now().year();
    server
        .put(&format!("/api/budget/{year}"))
        .authorization_bearer(&admin)
        .json(&json!({"total_amount": 1000.0}))
        .await
        .assert_status_ok();

    let id = create_draft(&server, &owner, 250.0).await;
    submit_and_approve(&server, &owner, &manager, id).await;

    // Paying without naming a year settles against the current one
    server
        .put(&format!("/api/requests/{id}/status"))
        .authorization_bearer(&admin)
        .json(&json!({"status": "PAID"}))
        .await
        .assert_status_ok();

    let response = server
        .get(&format!("/api/budget/{year}"))
        .authorization_bearer(&admin)
        .await;
    let body: Value = response.json();
    assert_eq!(body["data"]["remaining_amount"], 750.0);

    // An admin walks the payment back
    let response = server
        .put(&format!("/api/requests/{id}/status"))
        .authorization_bearer(&admin)
        .json(&json!({"status": "APPROVED"}))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["status"], "APPROVED");

    // The funds are back, the history row is not erased
    let response = server
        .get(&format!("/api/budget/{year}"))
        .authorization_bearer(&admin)
        .await;
    let body: Value = response.json();
    assert_eq!(body["data"]["remaining_amount"], 1000.0);

    let response = server
        .get("/api/transactions")
        .authorization_bearer(&admin)
        .await;
    let body: Value = response.json();
    assert_eq!(body["data"]["count"], 1);
}
