//! Client core for the todo board API.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern), then layers a transport
//! client, data hooks and an auth flow on top.
//!
//! # Design
//! - `TodoClient` is stateless: it holds only `base_url`.
//! - `ApiClient` is the single façade for backend calls. It owns an explicit
//!   `Session` (bearer token) and a `Transport` that performs the I/O.
//! - Hooks (`FetchTodos`, `CreateTodo`, `UpdateTodo`, `DeleteTodo`) own their
//!   loading/error/result state and drop responses from superseded requests.
//! - `AuthFlow` persists tokens through an injectable `KeyValueStore`.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod hooks;
pub mod http;
pub mod messages;
pub mod session;
pub mod storage;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use api::ApiClient;
pub use auth::AuthFlow;
pub use client::TodoClient;
pub use config::{ClientConfig, ConfigError};
pub use error::ApiError;
pub use hooks::{CreateTodo, DeleteTodo, FetchTodos, Generation, Phase, StaleDataPolicy, UpdateTodo};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use messages::Locale;
pub use session::Session;
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use transport::{Transport, UreqTransport};
pub use types::{Confirmation, Credentials, NewTodo, Priority, Todo, TodoStatus, TokenPair};
