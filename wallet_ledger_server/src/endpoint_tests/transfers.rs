use actix_web::{http::StatusCode, test, test::TestRequest, App};
use serde_json::json;

use super::helpers::{as_service, as_user, send_json, TestSystem};

#[actix_web::test]
async fn transfer_between_wallets() {
    let system = TestSystem::new().await;
    system.wallet_with_balance("alice", 10_000).await;
    let bob = system.wallet_with_balance("bob", 2_000).await;
    let app = test::init_service(App::new().configure(system.configure())).await;

    let req = as_user(TestRequest::post().uri("/wallet/transfer"), "alice")
        .set_json(json!({ "wallet_number": bob.number, "amount": 5_000 }));
    let (status, body) = send_json(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Transfer completed");
    assert_eq!(body["balance"], json!(5_000));

    let (_, alice_bal) = send_json(&app, as_user(TestRequest::get().uri("/wallet/balance"), "alice")).await;
    let (_, bob_bal) = send_json(&app, as_user(TestRequest::get().uri("/wallet/balance"), "bob")).await;
    assert_eq!(alice_bal["balance"], json!(5_000));
    assert_eq!(bob_bal["balance"], json!(7_000));

    let (status, history) = send_json(&app, as_user(TestRequest::get().uri("/wallet/transactions"), "alice")).await;
    assert_eq!(status, StatusCode::OK);
    let history = history.as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["type"], "transfer");
    assert_eq!(history[0]["direction"], "debit");
    assert_eq!(history[0]["status"], "success");
    assert_eq!(history[0]["amount"], json!(5_000));
    assert_eq!(history[0]["counterparty"], json!(bob.number));
    assert_eq!(history[0]["reference"], body["reference"]);
    system.tear_down().await;
}

#[actix_web::test]
async fn failed_transfers() {
    let system = TestSystem::new().await;
    let alice = system.wallet_with_balance("alice", 1_000).await;
    let bob = system.wallet_with_balance("bob", 2_000).await;
    let app = test::init_service(App::new().configure(system.configure())).await;

    let req = as_user(TestRequest::post().uri("/wallet/transfer"), "alice")
        .set_json(json!({ "wallet_number": bob.number, "amount": 5_000 }));
    let (status, body) = send_json(&app, req).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("Insufficient balance"));

    let req = as_user(TestRequest::post().uri("/wallet/transfer"), "alice")
        .set_json(json!({ "wallet_number": alice.number, "amount": 100 }));
    let (status, _) = send_json(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let req = as_user(TestRequest::post().uri("/wallet/transfer"), "alice")
        .set_json(json!({ "wallet_number": "000000000000", "amount": 100 }));
    let (status, _) = send_json(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let req = as_user(TestRequest::post().uri("/wallet/transfer"), "alice")
        .set_json(json!({ "wallet_number": bob.number, "amount": 0 }));
    let (status, _) = send_json(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let req = as_service(TestRequest::post().uri("/wallet/transfer"), "alice", "read")
        .set_json(json!({ "wallet_number": bob.number, "amount": 100 }));
    let (status, _) = send_json(&app, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Nothing moved, and nothing was recorded
    let (_, alice_bal) = send_json(&app, as_user(TestRequest::get().uri("/wallet/balance"), "alice")).await;
    let (_, bob_bal) = send_json(&app, as_user(TestRequest::get().uri("/wallet/balance"), "bob")).await;
    assert_eq!(alice_bal["balance"], json!(1_000));
    assert_eq!(bob_bal["balance"], json!(2_000));
    let (_, history) = send_json(&app, as_user(TestRequest::get().uri("/wallet/transactions"), "alice")).await;
    assert!(history.as_array().unwrap().is_empty());
    system.tear_down().await;
}
