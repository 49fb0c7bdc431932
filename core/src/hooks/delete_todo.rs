//! Delete hook.

use tracing::{debug, info, warn};

use super::state::{Generation, Phase, RequestState};
use crate::api::ApiClient;
use crate::error::ApiError;
use crate::messages::Locale;
use crate::transport::Transport;
use crate::types::Confirmation;

const HOOK: &str = "delete_todo";

/// Deletes todos pessimistically: loading stays set until the server
/// answers, and only then is the id reported as deleted for the caller to
/// drop from its list.
#[derive(Debug, Default)]
pub struct DeleteTodo {
    pending: Option<String>,
    deleted: Option<String>,
    state: RequestState,
    locale: Locale,
}

impl DeleteTodo {
    pub fn new(locale: Locale) -> Self {
        Self {
            locale,
            ..Self::default()
        }
    }

    /// Returns whether a request was issued and its result applied. An
    /// empty id is a no-op.
    pub fn run<T: Transport>(&mut self, api: &ApiClient<T>, id: &str) -> bool {
        let Some(generation) = self.start(id) else {
            return false;
        };
        let result = api.delete_todo(id);
        self.finish(generation, result)
    }

    pub fn start(&mut self, id: &str) -> Option<Generation> {
        if id.is_empty() {
            debug!("delete skipped: empty id");
            return None;
        }
        self.pending = Some(id.to_string());
        Some(self.state.begin())
    }

    pub fn finish(&mut self, generation: Generation, result: Result<Confirmation, ApiError>) -> bool {
        if !self.state.accepts(HOOK, generation) {
            return false;
        }
        let id = self.pending.take();
        match result {
            Ok(_) => {
                info!(id = id.as_deref().unwrap_or_default(), "todo deleted");
                self.deleted = id;
                self.state.succeed();
            }
            Err(err) => {
                warn!(id = id.as_deref().unwrap_or_default(), error = %err, "todo delete failed");
                self.state.fail(self.locale.describe(&err));
            }
        }
        true
    }

    /// Id removed by the last successful delete.
    pub fn deleted(&self) -> Option<&str> {
        self.deleted.as_deref()
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
