//! Request wrappers that own loading/error/result state.
//!
//! # Design
//! Each hook is `Idle → Loading → {Success | Error}` and re-enters `Loading`
//! on every trigger. `start` hands out a `Generation`; `finish` applies a
//! result only if that generation is still the latest, so a late response
//! from a superseded request never overwrites newer state. The convenience
//! `run`/`trigger`/`refetch` methods do both through an `ApiClient`.
//!
//! Errors never escape a hook: they become one human-readable string.

mod create_todo;
mod delete_todo;
mod fetch_todos;
pub(crate) mod state;
mod update_todo;

pub use create_todo::CreateTodo;
pub use delete_todo::DeleteTodo;
pub use fetch_todos::{FetchTodos, StaleDataPolicy};
pub use state::{Generation, Phase};
pub use update_todo::UpdateTodo;
