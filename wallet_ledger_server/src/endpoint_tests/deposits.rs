use actix_web::{http::StatusCode, test, test::TestRequest, App};
use paystack_tools::SIGNATURE_HEADER;
use serde_json::json;

use super::helpers::{as_user, charge_event, send, send_json, signed_webhook, TestSystem, WEBHOOK_SECRET};

#[actix_web::test]
async fn deposit_then_webhook_credits_once() {
    let system = TestSystem::new().await;
    system.wallet_with_balance("alice", 0).await;
    let app = test::init_service(App::new().configure(system.configure())).await;

    let req = as_user(TestRequest::post().uri("/wallet/deposit"), "alice").set_json(json!({ "amount": 10_000 }));
    let (status, body) = send_json(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    let reference = body["reference"].as_str().unwrap().to_string();
    assert!(reference.starts_with("DEP-"));
    assert_eq!(body["authorization_url"], json!(format!("https://checkout.example.com/{reference}")));
    let calls = system.gateway.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].payer_email, "alice@example.com");
    assert_eq!(calls[0].amount.value(), 10_000);

    let status_uri = format!("/wallet/deposit/{reference}/status");
    let (status, body) = send_json(&app, as_user(TestRequest::get().uri(&status_uri), "alice")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "reference": reference, "status": "pending", "amount": 10_000 }));

    // Paystack delivers the same notification three times
    let event = charge_event("charge.success", &reference, "success");
    for _ in 0..3 {
        let (status, body) = send_json(&app, signed_webhook(&event, WEBHOOK_SECRET)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": true }));
    }

    let (_, balance) = send_json(&app, as_user(TestRequest::get().uri("/wallet/balance"), "alice")).await;
    assert_eq!(balance["balance"], json!(10_000));
    let (_, body) = send_json(&app, as_user(TestRequest::get().uri(&status_uri), "alice")).await;
    assert_eq!(body["status"], "success");

    // A late failure report changes nothing
    let event = charge_event("charge.failed", &reference, "failed");
    let (status, _) = send_json(&app, signed_webhook(&event, WEBHOOK_SECRET)).await;
    assert_eq!(status, StatusCode::OK);
    let (_, balance) = send_json(&app, as_user(TestRequest::get().uri("/wallet/balance"), "alice")).await;
    assert_eq!(balance["balance"], json!(10_000));
    system.tear_down().await;
}

#[actix_web::test]
async fn failed_deposits_do_not_credit() {
    let system = TestSystem::new().await;
    system.wallet_with_balance("alice", 500).await;
    let app = test::init_service(App::new().configure(system.configure())).await;
    let req = as_user(TestRequest::post().uri("/wallet/deposit"), "alice").set_json(json!({ "amount": 2_000 }));
    let (_, body) = send_json(&app, req).await;
    let reference = body["reference"].as_str().unwrap().to_string();

    let event = charge_event("charge.failed", &reference, "failed");
    let (status, _) = send_json(&app, signed_webhook(&event, WEBHOOK_SECRET)).await;
    assert_eq!(status, StatusCode::OK);
    let status_uri = format!("/wallet/deposit/{reference}/status");
    let (_, body) = send_json(&app, as_user(TestRequest::get().uri(&status_uri), "alice")).await;
    assert_eq!(body["status"], "failed");
    let (_, balance) = send_json(&app, as_user(TestRequest::get().uri("/wallet/balance"), "alice")).await;
    assert_eq!(balance["balance"], json!(500));
    system.tear_down().await;
}

#[actix_web::test]
async fn webhook_signatures_are_checked() {
    let system = TestSystem::new().await;
    system.wallet_with_balance("alice", 0).await;
    let app = test::init_service(App::new().configure(system.configure())).await;
    let req = as_user(TestRequest::post().uri("/wallet/deposit"), "alice").set_json(json!({ "amount": 10_000 }));
    let (_, body) = send_json(&app, req).await;
    let reference = body["reference"].as_str().unwrap().to_string();
    let event = charge_event("charge.success", &reference, "success");

    let (status, body) = send(&app, signed_webhook(&event, "sk_test_forged")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, r#"{"error":"invalid signature"}"#);

    let unsigned = TestRequest::post().uri("/wallet/paystack/webhook").set_payload(event.clone());
    let (status, _) = send(&app, unsigned).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let empty = TestRequest::post()
        .uri("/wallet/paystack/webhook")
        .insert_header((SIGNATURE_HEADER, ""))
        .set_payload(event.clone());
    let (status, _) = send(&app, empty).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, balance) = send_json(&app, as_user(TestRequest::get().uri("/wallet/balance"), "alice")).await;
    assert_eq!(balance["balance"], json!(0));
    system.tear_down().await;
}

#[actix_web::test]
async fn malformed_webhooks() {
    let system = TestSystem::new().await;
    let app = test::init_service(App::new().configure(system.configure())).await;

    let (status, body) = send_json(&app, signed_webhook("not json", WEBHOOK_SECRET)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "invalid payload" }));

    let event = charge_event("charge.success", "", "success");
    let (status, body) = send_json(&app, signed_webhook(&event, WEBHOOK_SECRET)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "missing reference" }));

    let event = charge_event("charge.success", "DEP-does-not-exist", "success");
    let (status, _) = send_json(&app, signed_webhook(&event, WEBHOOK_SECRET)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Events other than charges are acknowledged and ignored
    let event = charge_event("transfer.success", "TRF-elsewhere", "success");
    let (status, _) = send_json(&app, signed_webhook(&event, WEBHOOK_SECRET)).await;
    assert_eq!(status, StatusCode::OK);
    system.tear_down().await;
}

#[actix_web::test]
async fn deposit_errors() {
    let system = TestSystem::new().await;
    system.wallet_with_balance("alice", 0).await;
    system.wallet_with_balance("bob", 0).await;
    let app = test::init_service(App::new().configure(system.configure())).await;

    let req = as_user(TestRequest::post().uri("/wallet/deposit"), "alice").set_json(json!({ "amount": -5 }));
    let (status, _) = send_json(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let req = as_user(TestRequest::post().uri("/wallet/deposit"), "carol").set_json(json!({ "amount": 100 }));
    let (status, _) = send_json(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    system.gateway.set_failing(true);
    let req = as_user(TestRequest::post().uri("/wallet/deposit"), "alice").set_json(json!({ "amount": 100 }));
    let (status, _) = send_json(&app, req).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    system.gateway.set_failing(false);

    // Bob cannot see Alice's deposits
    let req = as_user(TestRequest::post().uri("/wallet/deposit"), "alice").set_json(json!({ "amount": 100 }));
    let (_, body) = send_json(&app, req).await;
    let reference = body["reference"].as_str().unwrap().to_string();
    let status_uri = format!("/wallet/deposit/{reference}/status");
    let (status, _) = send_json(&app, as_user(TestRequest::get().uri(&status_uri), "bob")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    system.tear_down().await;
}
