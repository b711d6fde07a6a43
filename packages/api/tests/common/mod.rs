//! Shared harness: a fresh in-memory database per test and a router driven
//! through `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use serde_json::{Value, json};
use storefront_api::{config::Config, construct_router, state::State};
use tower::ServiceExt;

pub const SECRET: &str = "integration-test-secret";

pub struct TestApp {
    pub state: Arc<State>,
    pub router: Router,
}

impl TestApp {
    pub async fn new() -> Self {
        let state = Arc::new(
            State::new(Config::in_memory(SECRET))
                .await
                .expect("in-memory database"),
        );
        let router = construct_router(state.clone());
        Self { state, router }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(format!("/api/v1{uri}"));
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None, None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PATCH, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> StatusCode {
        self.request(Method::DELETE, uri, Some(token), None).await.0
    }

    /// Registers `username` and returns an access token for it.
    pub async fn login_as(&self, username: &str) -> String {
        let (status, _) = self
            .request(
                Method::POST,
                "/auth/register",
                None,
                Some(json!({
                    "username": username,
                    "email": format!("{username}@example.com"),
                    "password": "correct-horse",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, tokens) = self
            .request(
                Method::POST,
                "/auth/login",
                None,
                Some(json!({ "username": username, "password": "correct-horse" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        tokens["access"].as_str().unwrap().to_string()
    }

    pub async fn category(&self, token: &str, name: &str, parent: Option<i64>) -> i64 {
        let (status, body) = self
            .post("/categories", token, json!({ "name": name, "parent": parent }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_i64().unwrap()
    }

    pub async fn brand(&self, token: &str, name: &str) -> i64 {
        let (status, body) = self.post("/brands", token, json!({ "name": name })).await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_i64().unwrap()
    }

    pub async fn product(
        &self,
        token: &str,
        name: &str,
        category: i64,
        brand: Option<i64>,
        price: &str,
    ) -> i64 {
        let (status, body) = self
            .post(
                "/products",
                token,
                json!({
                    "name": name,
                    "category": category,
                    "brand": brand,
                    "price": price,
                    "stock": 10,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_i64().unwrap()
    }
}

pub fn ids(list: &Value) -> Vec<i64> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_i64().unwrap())
        .collect()
}
