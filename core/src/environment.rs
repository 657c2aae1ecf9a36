//! Dependency injection traits.
//!
//! Reducers never reach for the clock or the network directly; they get both
//! from their environment so tests can substitute deterministic doubles.

use crate::error::TodoError;
use crate::model::{CreatedTodo, NewTodo, Todo, TodoId, User, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Abstracts time for testability
pub trait Clock: Send + Sync {
    /// Get the current time
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Remote todo store
///
/// One method per endpoint. Implementations report failures as
/// [`TodoError`]; they do not retry.
#[async_trait]
pub trait TodoApi: Send + Sync {
    /// `GET /users`
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Network`] on a non-2xx response or transport failure.
    async fn fetch_users(&self) -> Result<Vec<User>, TodoError>;

    /// `GET /todos[?userId=N]`
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Network`] on a non-2xx response or transport failure.
    async fn fetch_todos(&self, owner: Option<UserId>) -> Result<Vec<Todo>, TodoError>;

    /// `PATCH /todos/:id` with the new completion flag
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::NotFound`] if the todo does not exist, or
    /// [`TodoError::Network`] for other failures.
    async fn set_completed(&self, id: TodoId, completed: bool) -> Result<Todo, TodoError>;

    /// `DELETE /todos/:id`
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::NotFound`] if the todo does not exist, or
    /// [`TodoError::Network`] for other failures.
    async fn delete_todo(&self, id: TodoId) -> Result<(), TodoError>;

    /// `POST /todos`
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Network`] on a non-2xx response or transport failure.
    async fn add_todo(&self, todo: NewTodo) -> Result<CreatedTodo, TodoError>;
}
