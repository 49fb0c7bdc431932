//! Explicit bearer-token state.
//!
//! The token lives in a `Session` value owned by `ApiClient` rather than in
//! shared default headers, so every change goes through `&mut` access.

use std::fmt;

use crate::http::{HttpRequest, AUTHORIZATION};

#[derive(Clone, Default, PartialEq, Eq)]
pub struct Session {
    access_token: Option<String>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        let mut session = Self::default();
        session.set_token(token);
        session
    }

    /// An empty token clears the session.
    pub fn set_token(&mut self, token: impl Into<String>) {
        let token = token.into();
        self.access_token = (!token.is_empty()).then_some(token);
    }

    pub fn clear(&mut self) {
        self.access_token = None;
    }

    pub fn token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    /// Attach `Authorization: Bearer <token>` when a token is set.
    pub fn authorize(&self, mut request: HttpRequest) -> HttpRequest {
        if let Some(token) = &self.access_token {
            request
                .headers
                .retain(|(k, _)| !k.eq_ignore_ascii_case(AUTHORIZATION));
            request
                .headers
                .push((AUTHORIZATION.to_string(), format!("Bearer {token}")));
        }
        request
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::TodoClient;

    #[test]
    fn anonymous_session_adds_no_header() {
        let req = Session::anonymous().authorize(TodoClient::new("http://x").build_list_todos());
        assert!(req.header("authorization").is_none());
    }

    #[test]
    fn token_becomes_bearer_header() {
        let req = Session::with_token("abc").authorize(TodoClient::new("http://x").build_list_todos());
        assert_eq!(req.header("Authorization"), Some("Bearer abc"));
        assert_eq!(req.headers.len(), 1);
    }

    #[test]
    fn empty_token_clears() {
        let mut session = Session::with_token("abc");
        session.set_token("");
        assert!(!session.is_authenticated());
    }

    #[test]
    fn debug_does_not_leak_token() {
        let printed = format!("{:?}", Session::with_token("secret-token"));
        assert!(!printed.contains("secret-token"));
    }
}
