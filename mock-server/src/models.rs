//! Wire and storage types for the reference server.
//!
//! Defined independently from the client crate's DTOs; the client's
//! integration tests catch schema drift.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TodoStatus {
    #[default]
    Pending,
    #[serde(alias = "in progress")]
    InProgress,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: String,
    pub title: String,
    pub description: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub deadline_date: i64,
    pub status: TodoStatus,
    pub priority: u8,
    pub color: String,
    pub user_id: String,
}

/// Body of `POST /todo` and `PUT /todo/{id}`. Server-owned fields sent by
/// the client (`id`, `createdAt`, `updatedAt`, `userId`) are ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoInput {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub deadline_date: i64,
    #[serde(default)]
    pub status: TodoStatus,
    #[serde(default = "default_priority")]
    pub priority: u8,
    #[serde(default)]
    pub color: String,
}

fn default_priority() -> u8 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password: String,
}

/// One issued credential. `token` is the refresh token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub id: String,
    pub user_id: String,
    pub token: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogoutRequest {
    #[serde(default)]
    pub token: String,
}

/// Confirmation and error payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
