//! Router-level tests against the in-memory store.

mod summary;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::{app::build_app, state::AppState};

pub(crate) struct TestApp {
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self {
            router: build_app(AppState::fake()),
        }
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> anyhow::Result<(StatusCode, Value)> {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let req = match body {
            Some(body) => req
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body)?))?,
            None => req.body(Body::empty())?,
        };

        let resp = self.router.clone().oneshot(req).await?;
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        Ok((status, value))
    }

    pub async fn get(&self, uri: &str, token: &str) -> anyhow::Result<(StatusCode, Value)> {
        self.send(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> anyhow::Result<(StatusCode, Value)> {
        self.send(Method::POST, uri, Some(token), Some(body)).await
    }

    /// Registers a user and returns `(token, user id)`.
    pub async fn signup(&self, email: &str) -> anyhow::Result<(String, String)> {
        let (status, body) = self
            .send(
                Method::POST,
                "/signup",
                None,
                Some(json!({ "email": email, "password": "secret1" })),
            )
            .await?;
        assert_eq!(status, StatusCode::CREATED, "signup failed: {body}");
        let token = body["token"].as_str().unwrap_or_default().to_string();
        let id = body["user"]["id"].as_str().unwrap_or_default().to_string();
        Ok((token, id))
    }

    pub async fn category(&self, token: &str, name: &str) -> anyhow::Result<String> {
        let (status, body) = self
            .post("/api/categories", token, json!({ "name": name }))
            .await?;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        Ok(body["id"].as_str().unwrap_or_default().to_string())
    }
}
