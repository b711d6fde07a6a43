//! Review authorship and order ownership rules.
//!
//! Run: cargo test --package storefront-api --test reviews_orders

mod common;

use axum::http::{Method, StatusCode};
use common::{TestApp, ids};
use serde_json::json;

async fn catalog_with_product(app: &TestApp, token: &str) -> i64 {
    let category = app.category(token, "Coffee", None).await;
    app.product(token, "Grinder", category, None, "45.00").await
}

#[tokio::test]
async fn a_user_reviews_a_product_once() {
    let app = TestApp::new().await;
    let alice = app.login_as("alice").await;
    let product = catalog_with_product(&app, &alice).await;

    let (status, first) = app
        .post("/reviews", &alice, json!({ "product": product, "rating": 5, "comment": "great" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["product"].as_i64(), Some(product));

    let (status, body) = app
        .post("/reviews", &alice, json!({ "product": product, "rating": 1, "comment": "again" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BUSINESS_RULE");
    assert!(body["error"]["message"].as_str().unwrap().contains("already reviewed"));

    let (_, reviews) = app.get(&format!("/reviews?product={product}")).await;
    assert_eq!(ids(&reviews), vec![first["id"].as_i64().unwrap()]);
}

#[tokio::test]
async fn review_author_comes_from_the_token() {
    let app = TestApp::new().await;
    let alice = app.login_as("alice").await;
    let bob = app.login_as("bob").await;
    let product = catalog_with_product(&app, &alice).await;

    let (_, me) = app.request(Method::GET, "/auth/me", Some(&bob), None).await;
    let (status, review) = app
        .post("/reviews", &bob, json!({ "product": product, "rating": 3, "user": 1 }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(review["user"], me["id"]);
}

#[tokio::test]
async fn only_the_author_may_edit_a_review() {
    let app = TestApp::new().await;
    let alice = app.login_as("alice").await;
    let bob = app.login_as("bob").await;
    let product = catalog_with_product(&app, &alice).await;

    let (_, review) = app
        .post("/reviews", &alice, json!({ "product": product, "rating": 4 }))
        .await;
    let id = review["id"].as_i64().unwrap();

    let (status, _) = app.patch(&format!("/reviews/{id}"), &bob, json!({ "rating": 1 })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(app.delete(&format!("/reviews/{id}"), &bob).await, StatusCode::FORBIDDEN);

    let (status, body) = app.patch(&format!("/reviews/{id}"), &alice, json!({ "rating": 2 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rating"], json!(2));

    let (status, _) = app.patch(&format!("/reviews/{id}"), &alice, json!({ "rating": 6 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(app.delete(&format!("/reviews/{id}"), &alice).await, StatusCode::NO_CONTENT);
    assert_eq!(app.get(&format!("/reviews/{id}")).await.0, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn orders_are_private_to_their_owner() {
    let app = TestApp::new().await;
    let alice = app.login_as("alice").await;
    let bob = app.login_as("bob").await;
    let product = catalog_with_product(&app, &alice).await;

    let (status, order) = app
        .post("/orders", &alice, json!({ "product": product, "quantity": 2 }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(order["status"], "pending");
    assert!(order["delivery_date"].is_null());
    let id = order["id"].as_i64().unwrap();

    let (status, _) = app
        .request(Method::GET, &format!("/orders/{id}"), Some(&bob), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, bobs) = app.request(Method::GET, "/orders", Some(&bob), None).await;
    assert_eq!(bobs, json!([]));
    let (_, alices) = app.request(Method::GET, "/orders", Some(&alice), None).await;
    assert_eq!(ids(&alices), vec![id]);

    let (status, _) = app.get("/orders").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .post("/orders", &alice, json!({ "product": product, "quantity": 0 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn order_status_only_moves_forward() {
    let app = TestApp::new().await;
    let alice = app.login_as("alice").await;
    let product = catalog_with_product(&app, &alice).await;

    let (_, order) = app
        .post("/orders", &alice, json!({ "product": product, "quantity": 1 }))
        .await;
    let uri = format!("/orders/{}", order["id"]);

    let (status, body) = app.patch(&uri, &alice, json!({ "status": "processing" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "processing");

    let (status, body) = app.patch(&uri, &alice, json!({ "status": "pending" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BUSINESS_RULE");

    let (status, body) = app.patch(&uri, &alice, json!({ "status": "delivered" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "delivered");
    assert!(body["delivery_date"].is_string());

    let (status, _) = app.patch(&uri, &alice, json!({ "status": "shipped" })).await;
    assert!(status.is_client_error());
}
