mod config;
mod resource;

pub(crate) use config::EnvConfig;
pub(crate) use resource::ResourceService;

use crate::models::{ResourceKind, User};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ApiErrorKind {
    /// The backend answered with an `{ "error": ... }` payload.
    Server,
    Unauthorized,
    Http,
    Network,
    Parse,
}

#[derive(Clone, Debug, thiserror::Error)]
#[error("{message}")]
pub(crate) struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl ApiError {
    fn network(e: reqwest::Error) -> Self {
        Self {
            kind: ApiErrorKind::Network,
            message: format!("Network error: {e}"),
        }
    }

    pub(crate) fn parse(e: impl std::fmt::Display) -> Self {
        Self {
            kind: ApiErrorKind::Parse,
            message: format!("Unexpected response: {e}"),
        }
    }

    fn unauthorized(message: Option<String>) -> Self {
        Self {
            kind: ApiErrorKind::Unauthorized,
            message: message.unwrap_or_else(|| "Unauthorized".to_string()),
        }
    }

    fn http(status: u16, body: &str) -> Self {
        Self {
            kind: ApiErrorKind::Http,
            message: format!("Request failed ({status}): {}", body.trim()),
        }
    }

    pub(crate) fn server(message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Server,
            message: message.into(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind == ApiErrorKind::Unauthorized
    }
}

pub(crate) type ApiResult<T> = Result<T, ApiError>;

/// Extracts the message of an `{ "error": ... }` payload, if the body carries one.
///
/// Falsy values (`null`, `false`, `""`) mean "no error", matching how the backend
/// fills the field on success.
pub(crate) fn server_error(body: &Value) -> Option<String> {
    match body.get("error")? {
        Value::Null | Value::Bool(false) => None,
        Value::Bool(true) => Some("Request failed".to_string()),
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(
            other
                .get("message")
                .and_then(|m| m.as_str())
                .map(|s| s.to_string())
                .unwrap_or_else(|| other.to_string()),
        ),
    }
}

/// Turns a raw status + body into the tagged result every service call returns.
pub(crate) fn interpret_response(status: u16, text: &str) -> ApiResult<Value> {
    let success = (200..300).contains(&status);

    let body = if text.trim().is_empty() {
        Value::Null
    } else {
        match serde_json::from_str::<Value>(text) {
            Ok(v) => v,
            Err(_) if !success => return Err(ApiError::http(status, text)),
            Err(e) => return Err(ApiError::parse(e)),
        }
    };

    if status == 401 {
        return Err(ApiError::unauthorized(server_error(&body)));
    }
    if let Some(message) = server_error(&body) {
        return Err(ApiError::server(message));
    }
    if !success {
        return Err(ApiError::http(status, text));
    }
    Ok(body)
}

/// Account endpoints live under the users resource.
fn users_path(action: &str) -> String {
    format!("{}/{action}", ResourceKind::Users)
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Registration payload in the backend's key naming.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct RegisterRequest {
    #[serde(rename = "firstname")]
    pub first_name: String,
    #[serde(rename = "lastname")]
    pub last_name: String,
    pub email: String,
    // Plain password; hashing happens server-side.
    #[serde(rename = "passwordHash")]
    pub password: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct AuthResponse {
    #[serde(alias = "accessToken")]
    pub token: String,
    pub user: User,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ApiClient {
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    pub(crate) fn auth_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {t}"))
    }

    /// Absolute URL for a path relative to the configured host.
    pub(crate) fn build_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub(crate) fn build_url_with_query(&self, path: &str, query: &[(&str, &str)]) -> String {
        let mut url = self.build_url(path);
        for (i, (k, v)) in query.iter().enumerate() {
            url.push(if i == 0 { '?' } else { '&' });
            url.push_str(&urlencoding::encode(k));
            url.push('=');
            url.push_str(&urlencoding::encode(v));
        }
        url
    }

    fn with_auth_headers(&self, mut req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(header) = self.auth_header() {
            req = req.header("Authorization", header);
        }
        req
    }

    pub(crate) async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> ApiResult<Value> {
        let url = self.build_url_with_query(path, query);
        log::debug!("{method} {url}");

        let client = reqwest::Client::new();
        let mut req = self.with_auth_headers(client.request(method.clone(), url.as_str()));
        if let Some(b) = body {
            req = req.json(b);
        }

        let res = req.send().await.map_err(|e| {
            log::error!("{method} {url} failed: {e}");
            ApiError::network(e)
        })?;
        let status = res.status().as_u16();
        let text = res.text().await.map_err(ApiError::network)?;

        interpret_response(status, &text).map_err(|e| {
            log::warn!("{method} {url} -> {status}: {e}");
            e
        })
    }

    pub async fn login(&self, email: &str, password: &str) -> ApiResult<AuthResponse> {
        let body = serde_json::to_value(LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        })
        .map_err(ApiError::parse)?;
        let data = self.send(Method::POST, &users_path("login"), &[], Some(&body)).await?;
        serde_json::from_value(data).map_err(ApiError::parse)
    }

    pub async fn register(&self, req: &RegisterRequest) -> ApiResult<()> {
        let body = serde_json::to_value(req).map_err(ApiError::parse)?;
        self.send(Method::POST, &users_path("register"), &[], Some(&body))
            .await
            .map(|_| ())
    }

    pub async fn forgot_password(&self, email: &str) -> ApiResult<()> {
        let body = serde_json::json!({ "email": email });
        self.send(Method::POST, &users_path("forgotpassword"), &[], Some(&body))
            .await
            .map(|_| ())
    }
}
