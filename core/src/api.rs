//! The transport client: one method per backend operation.
//!
//! # Design
//! `ApiClient` composes the stateless `TodoClient` builder, an explicit
//! `Session` and a `Transport`. Every call is build → authorize → execute →
//! parse; nothing is retried.

use tracing::debug;

use crate::client::TodoClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::session::Session;
use crate::transport::{Transport, UreqTransport};
use crate::types::{Confirmation, Credentials, NewTodo, Todo, TokenPair};

#[derive(Debug)]
pub struct ApiClient<T> {
    client: TodoClient,
    transport: T,
    session: Session,
}

impl ApiClient<UreqTransport> {
    pub fn from_config(config: &crate::config::ClientConfig) -> Self {
        Self::new(&config.base_url, UreqTransport::new(config.timeout()))
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn new(base_url: &str, transport: T) -> Self {
        Self::with_session(base_url, transport, Session::anonymous())
    }

    pub fn with_session(base_url: &str, transport: T, session: Session) -> Self {
        Self {
            client: TodoClient::new(base_url),
            transport,
            session,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.session.set_token(token);
    }

    pub fn clear_token(&mut self) {
        self.session.clear();
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn login(&self, credentials: &Credentials) -> Result<TokenPair, ApiError> {
        let request = self.client.build_login(credentials)?;
        let response = self.send(request)?;
        self.client.parse_token_pair(response)
    }

    pub fn register(&self, credentials: &Credentials) -> Result<TokenPair, ApiError> {
        let request = self.client.build_register(credentials)?;
        let response = self.send(request)?;
        self.client.parse_token_pair(response)
    }

    pub fn logout(&self, refresh_token: &str) -> Result<Confirmation, ApiError> {
        let request = self.client.build_logout(refresh_token)?;
        let response = self.send(request)?;
        self.client.parse_logout(response)
    }

    pub fn list_todos(&self) -> Result<Vec<Todo>, ApiError> {
        let response = self.send(self.client.build_list_todos())?;
        self.client.parse_list_todos(response)
    }

    pub fn create_todo(&self, input: &NewTodo) -> Result<Todo, ApiError> {
        let request = self.client.build_create_todo(input)?;
        let response = self.send(request)?;
        self.client.parse_create_todo(response)
    }

    pub fn update_todo(&self, id: &str, todo: &Todo) -> Result<Todo, ApiError> {
        let request = self.client.build_update_todo(id, todo)?;
        let response = self.send(request)?;
        self.client.parse_update_todo(response)
    }

    pub fn delete_todo(&self, id: &str) -> Result<Confirmation, ApiError> {
        let response = self.send(self.client.build_delete_todo(id))?;
        self.client.parse_delete_todo(response)
    }

    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let request = self.session.authorize(request);
        debug!(
            method = request.method.as_str(),
            path = %request.path,
            authenticated = self.session.is_authenticated(),
            "dispatching"
        );
        self.transport.execute(&request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedTransport;

    #[test]
    fn bearer_header_follows_session() {
        let transport = ScriptedTransport::new();
        transport.respond(200, "[]");
        transport.respond(200, "[]");
        transport.respond(200, "[]");

        let mut api = ApiClient::new("http://api", transport);
        api.list_todos().unwrap();
        api.set_token("tok");
        api.list_todos().unwrap();
        api.clear_token();
        api.list_todos().unwrap();

        let sent = api.transport().requests();
        assert_eq!(sent[0].header("authorization"), None);
        assert_eq!(sent[1].header("authorization"), Some("Bearer tok"));
        assert_eq!(sent[2].header("authorization"), None);
    }

    #[test]
    fn network_failure_is_passed_through() {
        let transport = ScriptedTransport::new();
        transport.fail_network("connection refused");
        let api = ApiClient::new("http://api", transport);
        assert!(matches!(api.list_todos(), Err(ApiError::Network(_))));
    }

    #[test]
    fn delete_hits_item_path() {
        let transport = ScriptedTransport::new();
        transport.respond(200, r#"{"message":"deleted"}"#);
        let api = ApiClient::new("http://api/", transport);
        let confirmation = api.delete_todo("t9").unwrap();
        assert_eq!(confirmation.message, "deleted");
        assert_eq!(api.transport().requests()[0].path, "http://api/todo/t9");
    }
}
