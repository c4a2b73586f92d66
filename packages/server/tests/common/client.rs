//! In-process API client for integration testing.
//!
//! Drives the real axum router without binding a socket.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use server_core::domains::accounts::User;
use server_core::domains::auth::JwtService;

pub struct ApiClient {
    router: Router,
    jwt: Arc<JwtService>,
}

impl ApiClient {
    pub fn new(router: Router, jwt: Arc<JwtService>) -> Self {
        Self { router, jwt }
    }

    /// Mint a bearer token the way the identity service would at login.
    pub fn token_for(&self, user: &User) -> String {
        self.jwt
            .create_token(user.id, user.role)
            .expect("token creation failed")
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send("GET", path, token, None).await
    }

    pub async fn post(
        &self,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        self.send("POST", path, token, body).await
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send("DELETE", path, token, None).await
    }

    async fn send(
        &self,
        method: &str,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }

        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .expect("request build failed"),
            None => builder.body(Body::empty()).expect("request build failed"),
        };

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router call failed");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body read failed");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, value)
    }
}
