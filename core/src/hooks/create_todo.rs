//! Create hook.

use tracing::{debug, info, warn};

use super::state::{Generation, Phase, RequestState};
use crate::api::ApiClient;
use crate::error::ApiError;
use crate::messages::Locale;
use crate::transport::Transport;
use crate::types::{NewTodo, Todo};

const HOOK: &str = "create_todo";

/// Creates todos from a draft. Nothing is sent while the draft's title is
/// empty, and at most one create is in flight per instance.
#[derive(Debug, Default)]
pub struct CreateTodo {
    data: Option<Todo>,
    state: RequestState,
    locale: Locale,
}

impl CreateTodo {
    pub fn new(locale: Locale) -> Self {
        Self {
            locale,
            ..Self::default()
        }
    }

    /// Returns whether a request was issued and its result applied.
    pub fn trigger<T: Transport>(&mut self, api: &ApiClient<T>, draft: &NewTodo) -> bool {
        let Some(generation) = self.start(draft) else {
            return false;
        };
        let result = api.create_todo(draft);
        self.finish(generation, result)
    }

    /// `None` when the title is empty or a create is already in flight.
    pub fn start(&mut self, draft: &NewTodo) -> Option<Generation> {
        if draft.title.is_empty() {
            debug!("create skipped: empty title");
            return None;
        }
        if self.state.is_loading() {
            debug!("create skipped: request already in flight");
            return None;
        }
        Some(self.state.begin())
    }

    pub fn finish(&mut self, generation: Generation, result: Result<Todo, ApiError>) -> bool {
        if !self.state.accepts(HOOK, generation) {
            return false;
        }
        match result {
            Ok(todo) => {
                info!(id = %todo.id, "todo created");
                self.data = Some(todo);
                self.state.succeed();
            }
            Err(err) => {
                warn!(error = %err, "todo create failed");
                self.state.fail(self.locale.describe(&err));
            }
        }
        true
    }

    pub fn data(&self) -> Option<&Todo> {
        self.data.as_ref()
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{todo_json, ScriptedTransport};

    #[test]
    fn empty_title_never_hits_network() {
        let api = ApiClient::new("http://api", ScriptedTransport::new());
        let mut hook = CreateTodo::default();

        assert!(!hook.trigger(&api, &NewTodo::new("")));
        assert_eq!(api.transport().request_count(), 0);
        assert_eq!(hook.phase(), Phase::Idle);
    }

    #[test]
    fn non_empty_title_issues_request_and_yields_entity() {
        let transport = ScriptedTransport::new();
        transport.respond(201, &todo_json("t1", "Buy milk"));
        let api = ApiClient::new("http://api", transport);
        let mut hook = CreateTodo::default();

        let mut draft = NewTodo::new("");
        assert!(!hook.trigger(&api, &draft));
        draft.title.push_str("Buy milk");
        assert!(hook.trigger(&api, &draft));

        assert_eq!(api.transport().request_count(), 1);
        let created = hook.data().unwrap();
        assert_eq!(created.id, "t1");
        assert_eq!(created.title, "Buy milk");
        assert_eq!(hook.phase(), Phase::Success);
    }

    #[test]
    fn second_trigger_while_in_flight_is_ignored() {
        let mut hook = CreateTodo::default();
        let draft = NewTodo::new("Buy milk");

        let first = hook.start(&draft).unwrap();
        assert!(hook.start(&draft).is_none());

        let todo: Todo = serde_json::from_str(&todo_json("t1", "Buy milk")).unwrap();
        assert!(hook.finish(first, Ok(todo)));
        assert!(hook.start(&draft).is_some());
    }

    #[test]
    fn server_rejection_is_reported() {
        let transport = ScriptedTransport::new();
        transport.respond(400, r#"{"message":"Title is required"}"#);
        let api = ApiClient::new("http://api", transport);
        let mut hook = CreateTodo::default();

        hook.trigger(&api, &NewTodo::new(" "));
        assert_eq!(hook.error(), Some("Title is required"));
        assert!(hook.data().is_none());
        assert!(!hook.is_loading());
    }
}
