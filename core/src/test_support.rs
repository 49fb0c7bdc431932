//! Fixtures for unit tests.

use std::cell::RefCell;
use std::collections::VecDeque;

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;

/// In-process transport that replays queued outcomes and records requests.
#[derive(Debug, Default)]
pub(crate) struct ScriptedTransport {
    outcomes: RefCell<VecDeque<Result<HttpResponse, ApiError>>>,
    sent: RefCell<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(&self, status: u16, body: &str) {
        self.outcomes
            .borrow_mut()
            .push_back(Ok(HttpResponse::new(status, body)));
    }

    pub(crate) fn fail_network(&self, reason: &str) {
        self.outcomes
            .borrow_mut()
            .push_back(Err(ApiError::Network(reason.to_string())));
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.sent.borrow().clone()
    }

    pub(crate) fn request_count(&self) -> usize {
        self.sent.borrow().len()
    }
}

impl Transport for ScriptedTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        self.sent.borrow_mut().push(request.clone());
        self.outcomes
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Unexpected("no scripted response".to_string())))
    }
}

pub(crate) fn todo_json(id: &str, title: &str) -> String {
    format!(
        r#"{{"id":"{id}","title":"{title}","description":"","createdAt":1,"updatedAt":1,"deadlineDate":0,"status":"pending","priority":1,"color":"","userId":"u1"}}"#
    )
}
