//! The todo list query.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::state::{Generation, Phase, RequestState};
use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::messages::Locale;
use crate::transport::Transport;
use crate::types::Todo;

const HOOK: &str = "fetch_todos";

/// What the held list becomes when a refetch fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaleDataPolicy {
    /// Keep showing the last successfully fetched list.
    #[default]
    Preserve,
    /// Drop the list so nothing stale is shown.
    Clear,
}

#[derive(Debug, Default)]
pub struct FetchTodos {
    todos: Vec<Todo>,
    state: RequestState,
    policy: StaleDataPolicy,
    locale: Locale,
    observed: bool,
}

impl FetchTodos {
    pub fn new(policy: StaleDataPolicy, locale: Locale) -> Self {
        Self {
            policy,
            locale,
            ..Self::default()
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.stale_data_policy, config.locale)
    }

    /// Fetch on first observation only. Returns whether a fetch ran.
    pub fn observe<T: Transport>(&mut self, api: &ApiClient<T>) -> bool {
        if self.observed {
            return false;
        }
        self.refetch(api);
        true
    }

    /// Fetch unconditionally. Returns whether the result was applied.
    pub fn refetch<T: Transport>(&mut self, api: &ApiClient<T>) -> bool {
        let generation = self.start();
        let result = api.list_todos();
        self.finish(generation, result)
    }

    pub fn start(&mut self) -> Generation {
        self.observed = true;
        self.state.begin()
    }

    pub fn finish(&mut self, generation: Generation, result: Result<Vec<Todo>, ApiError>) -> bool {
        if !self.state.accepts(HOOK, generation) {
            return false;
        }
        match result {
            Ok(todos) => {
                debug!(count = todos.len(), "todo list fetched");
                self.todos = todos;
                self.state.succeed();
            }
            Err(err) => {
                warn!(error = %err, policy = ?self.policy, "todo list fetch failed");
                if self.policy == StaleDataPolicy::Clear {
                    self.todos.clear();
                }
                self.state.fail(self.locale.describe(&err));
            }
        }
        true
    }

    pub fn data(&self) -> &[Todo] {
        &self.todos
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

    /// Fold a created or updated todo into the held list.
    pub fn upsert(&mut self, todo: Todo) {
        match self.todos.iter_mut().find(|t| t.id == todo.id) {
            Some(existing) => *existing = todo,
            None => self.todos.push(todo),
        }
    }

    /// Drop a deleted todo from the held list. Returns whether it was present.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.todos.len();
        self.todos.retain(|t| t.id != id);
        self.todos.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{todo_json, ScriptedTransport};

    fn api(transport: ScriptedTransport) -> ApiClient<ScriptedTransport> {
        ApiClient::new("http://api", transport)
    }

    fn todo(id: &str) -> Todo {
        serde_json::from_str(&todo_json(id, id)).unwrap()
    }

    #[test]
    fn success_replaces_list_in_server_order() {
        let transport = ScriptedTransport::new();
        transport.respond(
            200,
            &format!("[{},{},{}]", todo_json("c", "C"), todo_json("a", "A"), todo_json("b", "B")),
        );
        let api = api(transport);

        let mut hook = FetchTodos::default();
        assert_eq!(hook.phase(), Phase::Idle);
        assert!(hook.observe(&api));

        let ids: Vec<&str> = hook.data().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["c", "a", "b"]);
        assert_eq!(hook.phase(), Phase::Success);
        assert_eq!(hook.error(), None);
    }

    #[test]
    fn observe_fetches_only_once() {
        let transport = ScriptedTransport::new();
        transport.respond(200, "[]");
        transport.respond(200, "[]");
        let api = api(transport);

        let mut hook = FetchTodos::default();
        assert!(hook.observe(&api));
        assert!(!hook.observe(&api));
        assert_eq!(api.transport().request_count(), 1);

        hook.refetch(&api);
        assert_eq!(api.transport().request_count(), 2);
    }

    #[test]
    fn network_failure_on_first_load_leaves_empty_list() {
        let transport = ScriptedTransport::new();
        transport.fail_network("connection refused");
        let api = api(transport);

        let mut hook = FetchTodos::default();
        hook.observe(&api);
        assert!(hook.data().is_empty());
        assert_eq!(hook.error(), Some(Locale::En.no_connectivity()));
        assert!(!hook.is_loading());
    }

    #[test]
    fn refetch_failure_preserves_list_by_default() {
        let transport = ScriptedTransport::new();
        transport.respond(200, &format!("[{}]", todo_json("t1", "Buy milk")));
        transport.fail_network("connection reset");
        let api = api(transport);

        let mut hook = FetchTodos::default();
        hook.observe(&api);
        hook.refetch(&api);
        assert_eq!(hook.data().len(), 1);
        assert_eq!(hook.phase(), Phase::Error);
        assert!(!hook.error().unwrap_or_default().is_empty());
    }

    #[test]
    fn refetch_failure_clears_list_when_configured() {
        let transport = ScriptedTransport::new();
        transport.respond(200, &format!("[{}]", todo_json("t1", "Buy milk")));
        transport.respond(500, r#"{"message":"database down"}"#);
        let api = api(transport);

        let mut hook = FetchTodos::new(StaleDataPolicy::Clear, Locale::En);
        hook.observe(&api);
        hook.refetch(&api);
        assert!(hook.data().is_empty());
        assert_eq!(hook.error(), Some("database down"));
    }

    #[test]
    fn late_response_from_superseded_fetch_is_discarded() {
        let mut hook = FetchTodos::default();
        let first = hook.start();
        let second = hook.start();

        assert!(hook.finish(second, Ok(vec![todo("new")])));
        assert!(!hook.finish(first, Ok(vec![todo("old")])));

        assert_eq!(hook.data().len(), 1);
        assert_eq!(hook.data()[0].id, "new");
        assert_eq!(hook.phase(), Phase::Success);
    }

    #[test]
    fn upsert_and_remove_edit_held_list() {
        let mut hook = FetchTodos::default();
        hook.upsert(todo("t1"));
        hook.upsert(todo("t2"));
        let mut changed = todo("t1");
        changed.title = "changed".to_string();
        hook.upsert(changed);

        assert_eq!(hook.data().len(), 2);
        assert_eq!(hook.data()[0].title, "changed");
        assert!(hook.remove("t2"));
        assert!(!hook.remove("t2"));
        assert_eq!(hook.data().len(), 1);
    }
}
