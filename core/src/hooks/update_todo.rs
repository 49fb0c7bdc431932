//! Update hook: full-document replace of one todo.

use tracing::{info, warn};

use super::state::{Generation, Phase, RequestState};
use crate::api::ApiClient;
use crate::error::ApiError;
use crate::messages::Locale;
use crate::transport::Transport;
use crate::types::Todo;

const HOOK: &str = "update_todo";

/// Replaces a todo server-side. The latest call wins.
#[derive(Debug, Default)]
pub struct UpdateTodo {
    data: Option<Todo>,
    state: RequestState,
    locale: Locale,
}

impl UpdateTodo {
    pub fn new(locale: Locale) -> Self {
        Self {
            locale,
            ..Self::default()
        }
    }

    pub fn run<T: Transport>(&mut self, api: &ApiClient<T>, id: &str, todo: &Todo) -> bool {
        let generation = self.start();
        let result = api.update_todo(id, todo);
        self.finish(generation, result)
    }

    pub fn start(&mut self) -> Generation {
        self.state.begin()
    }

    pub fn finish(&mut self, generation: Generation, result: Result<Todo, ApiError>) -> bool {
        if !self.state.accepts(HOOK, generation) {
            return false;
        }
        match result {
            Ok(todo) => {
                info!(id = %todo.id, status = ?todo.status, "todo updated");
                self.data = Some(todo);
                self.state.succeed();
            }
            Err(err) => {
                warn!(error = %err, "todo update failed");
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
    use crate::types::TodoStatus;

    #[test]
    fn update_yields_server_entity() {
        let transport = ScriptedTransport::new();
        let completed = todo_json("t1", "Buy milk").replace("pending", "completed");
        transport.respond(200, &completed);
        let api = ApiClient::new("http://api", transport);

        let mut todo: Todo = serde_json::from_str(&todo_json("t1", "Buy milk")).unwrap();
        todo.status = TodoStatus::Completed;

        let mut hook = UpdateTodo::default();
        assert!(hook.run(&api, "t1", &todo));
        assert_eq!(hook.data().unwrap().status, TodoStatus::Completed);

        let sent = &api.transport().requests()[0];
        assert_eq!(sent.path, "http://api/todo/t1");
        let body: serde_json::Value = serde_json::from_str(sent.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["status"], "completed");
        assert_eq!(body["title"], "Buy milk");
    }

    #[test]
    fn not_found_without_message_gets_generic_text() {
        let transport = ScriptedTransport::new();
        transport.respond(404, "");
        let api = ApiClient::new("http://api", transport);
        let todo: Todo = serde_json::from_str(&todo_json("gone", "x")).unwrap();

        let mut hook = UpdateTodo::new(Locale::En);
        hook.run(&api, "gone", &todo);
        assert_eq!(hook.error(), Some("Request failed with status 404."));
        assert_eq!(hook.phase(), Phase::Error);
    }

    #[test]
    fn stale_update_result_is_dropped() {
        let mut hook = UpdateTodo::default();
        let old = hook.start();
        let new = hook.start();

        assert!(!hook.finish(old, Err(ApiError::Network("late".to_string()))));
        assert!(hook.is_loading());
        let todo: Todo = serde_json::from_str(&todo_json("t1", "fresh")).unwrap();
        assert!(hook.finish(new, Ok(todo)));
        assert_eq!(hook.data().unwrap().title, "fresh");
        assert_eq!(hook.error(), None);
    }
}
