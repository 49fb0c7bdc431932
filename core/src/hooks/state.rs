//! Request lifecycle shared by the hooks and the auth flow.

use tracing::warn;

/// Identifies one triggered request of a hook. Only the most recently
/// started generation may apply its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// Loading/error bookkeeping shared by every hook.
#[derive(Debug, Default)]
pub(crate) struct RequestState {
    phase: Phase,
    error: Option<String>,
    latest: u64,
}

impl RequestState {
    pub(crate) fn begin(&mut self) -> Generation {
        self.latest += 1;
        self.phase = Phase::Loading;
        self.error = None;
        Generation(self.latest)
    }

    /// Whether a result for `generation` may be applied; logs discards.
    pub(crate) fn accepts(&self, hook: &'static str, generation: Generation) -> bool {
        if generation.0 == self.latest {
            return true;
        }
        warn!(
            hook,
            generation = generation.0,
            latest = self.latest,
            "discarding stale response"
        );
        false
    }

    pub(crate) fn succeed(&mut self) {
        self.phase = Phase::Success;
        self.error = None;
    }

    pub(crate) fn fail(&mut self, message: String) {
        self.phase = Phase::Error;
        self.error = Some(message);
    }

    pub(crate) fn phase(&self) -> Phase {
        self.phase
    }

    pub(crate) fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub(crate) fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_generation_supersedes_older() {
        let mut state = RequestState::default();
        let first = state.begin();
        let second = state.begin();
        assert!(first < second);
        assert!(!state.accepts("test", first));
        assert!(state.accepts("test", second));
    }

    #[test]
    fn begin_clears_previous_error() {
        let mut state = RequestState::default();
        state.begin();
        state.fail("boom".to_string());
        assert_eq!(state.phase(), Phase::Error);
        state.begin();
        assert!(state.is_loading());
        assert_eq!(state.error(), None);
    }
}
