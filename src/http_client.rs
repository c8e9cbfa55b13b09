use std::collections::BTreeMap;
use std::sync::RwLock;
use std::time::Duration;

use anyhow::Context;
use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde_json::{Value, json};
use thiserror::Error;

const REQUEST_TIMEOUT_SECS: u64 = 10;
const API_ROOT: &str = "/apis/v1/sports-app";
const AUTH_PATH: &str = "/apis/v1/auth/login/";

/// Error classes the rest of the app dispatches on. Only transport
/// and routing-class failures are fair game for the verb-fallback
/// chain; validation and auth failures abort immediately.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Transport(String),
    #[error("not authenticated")]
    Unauthorized,
    #[error("not found")]
    NotFound,
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("validation failed")]
    Validation { fields: BTreeMap<String, Vec<String>> },
    #[error("http {status}: {message}")]
    Status { status: u16, message: String },
}

impl ApiError {
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Transport(_) | ApiError::MethodNotAllowed | ApiError::NotFound => true,
            ApiError::Status { status, .. } => *status >= 500,
            ApiError::Validation { .. } | ApiError::Unauthorized => false,
        }
    }

    /// Message for the terminal error dialog: the server `detail`
    /// field when present, field errors flattened otherwise.
    pub fn detail(&self) -> String {
        match self {
            ApiError::Validation { fields } => {
                let mut parts = Vec::new();
                for (field, messages) in fields {
                    parts.push(format!("{field}: {}", messages.join(", ")));
                }
                if parts.is_empty() {
                    "validation failed".to_string()
                } else {
                    parts.join("; ")
                }
            }
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Verb {
    pub fn label(self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Put => "PUT",
            Verb::Patch => "PATCH",
            Verb::Delete => "DELETE",
        }
    }
}

/// Backend client. Owns the session token; there is no ambient
/// global, callers hold an `Arc<ApiClient>`.
pub struct ApiClient {
    http: Client,
    api_root: String,
    auth_url: String,
    token: RwLock<Option<String>>,
}

impl ApiClient {
    pub fn new(base: &str) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("failed to build http client")?;
        let base = base.trim_end_matches('/');
        Ok(Self {
            http,
            api_root: format!("{base}{API_ROOT}"),
            auth_url: format!("{base}{AUTH_PATH}"),
            token: RwLock::new(None),
        })
    }

    pub fn set_token(&self, token: &str) {
        let mut guard = self.token.write().expect("token lock poisoned");
        *guard = Some(token.to_string());
    }

    pub fn clear_token(&self) {
        let mut guard = self.token.write().expect("token lock poisoned");
        *guard = None;
    }

    pub fn has_token(&self) -> bool {
        self.token.read().expect("token lock poisoned").is_some()
    }

    /// Exchanges credentials for a bearer token. The token is stored
    /// on the client; persisting it is the caller's concern.
    pub fn login(&self, username: &str, password: &str) -> Result<String, ApiError> {
        let payload = json!({ "username": username, "password": password });
        let resp = self
            .http
            .post(&self.auth_url)
            .json(&payload)
            .send()
            .map_err(transport)?;
        let body = handle_response(resp)?;
        let token = crate::wire::pick_string(&body, &["token", "auth_token", "key"]).ok_or_else(
            || ApiError::Status {
                status: 200,
                message: "login response carried no token".to_string(),
            },
        )?;
        self.set_token(&token);
        Ok(token)
    }

    pub fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.send(Verb::Get, path, None)
    }

    pub fn send(&self, verb: Verb, path: &str, body: Option<&Value>) -> Result<Value, ApiError> {
        let url = self.url(path);
        let req = match verb {
            Verb::Get => self.http.get(&url),
            Verb::Post => self.http.post(&url),
            Verb::Put => self.http.put(&url),
            Verb::Patch => self.http.patch(&url),
            Verb::Delete => self.http.delete(&url),
        };
        let mut req = self.authorize(req);
        if let Some(body) = body {
            req = req.json(body);
        }
        let resp = req.send().map_err(transport)?;
        handle_response(resp)
    }

    /// Fetches a binary body (results export). Errors map the same
    /// way as JSON endpoints.
    pub fn get_bytes(&self, path: &str) -> Result<Vec<u8>, ApiError> {
        let url = self.url(path);
        let resp = self
            .authorize(self.http.get(&url))
            .send()
            .map_err(transport)?;
        let status = resp.status();
        if status.is_success() {
            let bytes = resp.bytes().map_err(transport)?;
            return Ok(bytes.to_vec());
        }
        let body = resp.text().unwrap_or_default();
        Err(status_error(status, &body))
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_root, path.trim_start_matches('/'))
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        let guard = self.token.read().expect("token lock poisoned");
        match guard.as_ref() {
            Some(token) => req.header("Authorization", format!("Token {token}")),
            None => req,
        }
    }
}

fn transport(err: reqwest::Error) -> ApiError {
    ApiError::Transport(err.to_string())
}

fn handle_response(resp: Response) -> Result<Value, ApiError> {
    let status = resp.status();
    let body = resp.text().map_err(transport)?;
    if status.is_success() {
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        return serde_json::from_str(&body).map_err(|err| ApiError::Status {
            status: status.as_u16(),
            message: format!("invalid json body: {err}"),
        });
    }
    Err(status_error(status, &body))
}

fn status_error(status: StatusCode, body: &str) -> ApiError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthorized,
        StatusCode::NOT_FOUND => ApiError::NotFound,
        StatusCode::METHOD_NOT_ALLOWED => ApiError::MethodNotAllowed,
        StatusCode::BAD_REQUEST => parse_validation_body(body).unwrap_or(ApiError::Status {
            status: 400,
            message: summarize_body(body),
        }),
        other => ApiError::Status {
            status: other.as_u16(),
            message: summarize_body(body),
        },
    }
}

/// A 400 with a field-keyed error map becomes `Validation` so the
/// form layer can re-mark the offending controls.
pub fn parse_validation_body(body: &str) -> Option<ApiError> {
    let value: Value = serde_json::from_str(body.trim()).ok()?;
    let map = value.as_object()?;
    let mut fields = BTreeMap::new();
    for (key, entry) in map {
        if key == "detail" || key == "message" {
            continue;
        }
        let messages: Vec<String> = match entry {
            Value::String(s) => vec![s.clone()],
            Value::Array(items) => items
                .iter()
                .filter_map(|item| item.as_str().map(|s| s.to_string()))
                .collect(),
            _ => continue,
        };
        if !messages.is_empty() {
            fields.insert(key.clone(), messages);
        }
    }
    if fields.is_empty() {
        None
    } else {
        Some(ApiError::Validation { fields })
    }
}

fn summarize_body(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body.trim()) {
        if let Some(detail) = crate::wire::pick_string(&value, &["detail", "message", "error"]) {
            return detail;
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "no response body".to_string()
    } else {
        trimmed.chars().take(200).collect()
    }
}
