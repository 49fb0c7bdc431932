//! Stateless HTTP request builder and response parser for the todo API.
//!
//! # Design
//! `TodoClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! Authorization is not added here; `Session::authorize` does that, so the
//! builder stays deterministic.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, APPLICATION_JSON, CONTENT_TYPE};
use crate::types::{Confirmation, Credentials, LogoutRequest, NewTodo, Todo, TokenPair};

/// Synchronous, stateless request builder for the todo API.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_login(&self, credentials: &Credentials) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/auth/login", credentials)
    }

    pub fn build_register(&self, credentials: &Credentials) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/auth/register", credentials)
    }

    pub fn build_logout(&self, refresh_token: &str) -> Result<HttpRequest, ApiError> {
        let body = LogoutRequest {
            token: refresh_token.to_string(),
        };
        self.json_request(HttpMethod::Post, "/auth/logout", &body)
    }

    pub fn build_list_todos(&self) -> HttpRequest {
        self.empty_request(HttpMethod::Get, "/todo")
    }

    pub fn build_create_todo(&self, input: &NewTodo) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/todo", input)
    }

    /// Full-document replace: every field of `todo` is sent.
    pub fn build_update_todo(&self, id: &str, todo: &Todo) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Put, &todo_path(id), todo)
    }

    pub fn build_delete_todo(&self, id: &str) -> HttpRequest {
        self.empty_request(HttpMethod::Delete, &todo_path(id))
    }

    pub fn parse_token_pair(&self, response: HttpResponse) -> Result<TokenPair, ApiError> {
        parse_json(response)
    }

    pub fn parse_logout(&self, response: HttpResponse) -> Result<Confirmation, ApiError> {
        parse_confirmation(response)
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        parse_json(response)
    }

    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        parse_json(response)
    }

    pub fn parse_update_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        parse_json(response)
    }

    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<Confirmation, ApiError> {
        parse_confirmation(response)
    }

    fn empty_request(&self, method: HttpMethod, path: &str) -> HttpRequest {
        HttpRequest {
            method,
            path: format!("{}{path}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    fn json_request<B: Serialize>(
        &self,
        method: HttpMethod,
        path: &str,
        body: &B,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(body)?;
        Ok(HttpRequest {
            method,
            path: format!("{}{path}", self.base_url),
            headers: vec![(CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string())],
            body: Some(body),
        })
    }
}

/// Ids are opaque, so they are percent-encoded as a single path segment.
fn todo_path(id: &str) -> String {
    format!("/todo/{}", urlencoding::encode(id))
}

fn parse_json<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    Ok(serde_json::from_str(&response.body)?)
}

/// Confirmations tolerate an empty body (e.g. a bare 204).
fn parse_confirmation(response: HttpResponse) -> Result<Confirmation, ApiError> {
    check_status(&response)?;
    if response.body.trim().is_empty() {
        return Ok(Confirmation::default());
    }
    Ok(serde_json::from_str(&response.body)?)
}

/// Map non-2xx responses to `ApiError::Api`, keeping the server's message.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::Api {
        status: response.status,
        message: error_message(&response.body),
    })
}

fn error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(value) => value
            .get("message")
            .and_then(|m| m.as_str())
            .filter(|m| !m.is_empty())
            .map(str::to_string),
        Err(_) => Some(trimmed.to_string()),
    }
}
