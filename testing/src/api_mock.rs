//! In-memory [`TodoApi`] double.
//!
//! Holds a small user/todo table, records every call in order and lets a
//! test inject failures or latency per endpoint.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use todo_sections_core::environment::TodoApi;
use todo_sections_core::error::TodoError;
use todo_sections_core::model::{CreatedTodo, NewTodo, OwnerRef, Todo, TodoId, User, UserId};

/// Endpoint selector for failure and latency injection
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// `GET /users`
    FetchUsers,
    /// `GET /todos`
    FetchTodos,
    /// `PATCH /todos/:id`
    SetCompleted,
    /// `DELETE /todos/:id`
    DeleteTodo,
    /// `POST /todos`
    AddTodo,
}

/// A recorded call, in arrival order
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApiCall {
    /// `fetch_users()`
    FetchUsers,
    /// `fetch_todos(owner)`
    FetchTodos(Option<UserId>),
    /// `set_completed(id, completed)`
    SetCompleted(TodoId, bool),
    /// `delete_todo(id)`
    DeleteTodo(TodoId),
    /// `add_todo(todo)`
    AddTodo(NewTodo),
}

impl ApiCall {
    /// The endpoint this call hit
    #[must_use]
    pub const fn endpoint(&self) -> Endpoint {
        match self {
            Self::FetchUsers => Endpoint::FetchUsers,
            Self::FetchTodos(_) => Endpoint::FetchTodos,
            Self::SetCompleted(..) => Endpoint::SetCompleted,
            Self::DeleteTodo(_) => Endpoint::DeleteTodo,
            Self::AddTodo(_) => Endpoint::AddTodo,
        }
    }
}

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    todos: Vec<Todo>,
    calls: Vec<ApiCall>,
    failures: HashMap<Endpoint, VecDeque<TodoError>>,
    latency: HashMap<Endpoint, VecDeque<Duration>>,
    echo_username: bool,
}

impl Tables {
    fn next_todo_id(&self) -> TodoId {
        TodoId::new(self.todos.iter().map(|t| t.id.get()).max().unwrap_or(0) + 1)
    }

    fn next_user_id(&self) -> UserId {
        UserId::new(self.users.iter().map(|u| u.id.get()).max().unwrap_or(0) + 1)
    }
}

/// Mock remote todo store
///
/// Clones share the same tables, so a test can keep one handle for
/// assertions while the store owns another.
///
/// # Example
///
/// ```
/// use todo_sections_core::model::{Todo, TodoId, User, UserId};
/// use todo_sections_testing::mocks::{ApiCall, MockTodoApi};
///
/// let api = MockTodoApi::new()
///     .with_users(vec![User::new(UserId::new(1), "u1")])
///     .with_todos(vec![Todo::new(TodoId::new(1), UserId::new(1), "A", false)]);
/// assert_eq!(api.todos().len(), 1);
/// assert!(api.calls().is_empty());
/// ```
#[derive(Clone, Debug, Default)]
pub struct MockTodoApi {
    tables: Arc<Mutex<Tables>>,
}

impl MockTodoApi {
    /// Empty store; the add endpoint echoes usernames
    #[must_use]
    pub fn new() -> Self {
        let api = Self::default();
        api.lock().echo_username = true;
        api
    }

    /// Seed the user table
    #[must_use]
    pub fn with_users(self, users: Vec<User>) -> Self {
        self.lock().users = users;
        self
    }

    /// Seed the todo table
    #[must_use]
    pub fn with_todos(self, todos: Vec<Todo>) -> Self {
        self.lock().todos = todos;
        self
    }

    /// Whether created todos carry the owner's username
    #[must_use]
    pub fn echo_username(self, echo: bool) -> Self {
        self.lock().echo_username = echo;
        self
    }

    /// Queue a failure for the next call to `endpoint`
    ///
    /// Failures are consumed in order, one per call.
    pub fn fail_next(&self, endpoint: Endpoint, error: TodoError) {
        self.lock()
            .failures
            .entry(endpoint)
            .or_default()
            .push_back(error);
    }

    /// Queue a delay for the next call to `endpoint`
    pub fn delay_next(&self, endpoint: Endpoint, delay: Duration) {
        self.lock()
            .latency
            .entry(endpoint)
            .or_default()
            .push_back(delay);
    }

    /// Every call received so far
    #[must_use]
    pub fn calls(&self) -> Vec<ApiCall> {
        self.lock().calls.clone()
    }

    /// Calls that hit `endpoint`
    #[must_use]
    pub fn calls_to(&self, endpoint: Endpoint) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.endpoint() == endpoint)
            .count()
    }

    /// Current server-side todos
    #[must_use]
    pub fn todos(&self) -> Vec<Todo> {
        self.lock().todos.clone()
    }

    /// Current server-side users
    #[must_use]
    pub fn users(&self) -> Vec<User> {
        self.lock().users.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records the call, then applies any queued latency and failure
    async fn enter(&self, call: ApiCall) -> Result<(), TodoError> {
        let endpoint = call.endpoint();
        let (delay, failure) = {
            let mut tables = self.lock();
            tables.calls.push(call);
            let delay = tables.latency.get_mut(&endpoint).and_then(VecDeque::pop_front);
            let failure = tables.failures.get_mut(&endpoint).and_then(VecDeque::pop_front);
            (delay, failure)
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        failure.map_or(Ok(()), Err)
    }
}

#[async_trait]
impl TodoApi for MockTodoApi {
    async fn fetch_users(&self) -> Result<Vec<User>, TodoError> {
        self.enter(ApiCall::FetchUsers).await?;
        Ok(self.users())
    }

    async fn fetch_todos(&self, owner: Option<UserId>) -> Result<Vec<Todo>, TodoError> {
        self.enter(ApiCall::FetchTodos(owner)).await?;
        Ok(self
            .todos()
            .into_iter()
            .filter(|t| owner.is_none_or(|id| t.owner_id == id))
            .collect())
    }

    async fn set_completed(&self, id: TodoId, completed: bool) -> Result<Todo, TodoError> {
        self.enter(ApiCall::SetCompleted(id, completed)).await?;
        let mut tables = self.lock();
        let todo = tables
            .todos
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(TodoError::NotFound { id })?;
        todo.completed = completed;
        Ok(todo.clone())
    }

    async fn delete_todo(&self, id: TodoId) -> Result<(), TodoError> {
        self.enter(ApiCall::DeleteTodo(id)).await?;
        let mut tables = self.lock();
        let before = tables.todos.len();
        tables.todos.retain(|t| t.id != id);
        if tables.todos.len() == before {
            return Err(TodoError::NotFound { id });
        }
        Ok(())
    }

    async fn add_todo(&self, todo: NewTodo) -> Result<CreatedTodo, TodoError> {
        self.enter(ApiCall::AddTodo(todo.clone())).await?;
        let mut tables = self.lock();

        let owner = match todo.owner() {
            OwnerRef::Username(name) => {
                if let Some(user) = tables.users.iter().find(|u| &u.username == name) {
                    user.clone()
                } else {
                    let user = User::new(tables.next_user_id(), name.clone()).with_name(name.clone());
                    tables.users.push(user.clone());
                    user
                }
            },
            OwnerRef::UserId(id) => tables
                .users
                .iter()
                .find(|u| u.id == *id)
                .cloned()
                .ok_or_else(|| TodoError::http(400, format!("User {id} does not exist")))?,
        };

        let created = Todo::new(tables.next_todo_id(), owner.id, todo.title(), todo.is_completed());
        tables.todos.push(created.clone());

        Ok(CreatedTodo {
            todo: created,
            username: tables.echo_username.then_some(owner.username),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api() -> MockTodoApi {
        MockTodoApi::new()
            .with_users(vec![User::new(UserId::new(1), "u1")])
            .with_todos(vec![
                Todo::new(TodoId::new(1), UserId::new(1), "A", false),
                Todo::new(TodoId::new(2), UserId::new(2), "B", true),
            ])
    }

    #[tokio::test]
    async fn records_calls_in_order() -> Result<(), TodoError> {
        let api = api();
        api.fetch_users().await?;
        api.fetch_todos(Some(UserId::new(1))).await?;

        assert_eq!(
            api.calls(),
            vec![ApiCall::FetchUsers, ApiCall::FetchTodos(Some(UserId::new(1)))]
        );
        Ok(())
    }

    #[tokio::test]
    async fn owner_filter_limits_todos() -> Result<(), TodoError> {
        let todos = api().fetch_todos(Some(UserId::new(2))).await?;
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].id, TodoId::new(2));
        Ok(())
    }

    #[tokio::test]
    async fn queued_failure_is_consumed_once() {
        let api = api();
        api.fail_next(Endpoint::FetchUsers, TodoError::transport("offline"));

        assert!(api.fetch_users().await.is_err());
        assert!(api.fetch_users().await.is_ok());
        assert_eq!(api.calls_to(Endpoint::FetchUsers), 2);
    }

    #[tokio::test]
    async fn delete_missing_todo_is_not_found() {
        let result = api().delete_todo(TodoId::new(99)).await;
        assert_eq!(result, Err(TodoError::NotFound { id: TodoId::new(99) }));
    }

    #[tokio::test]
    async fn add_with_unknown_username_creates_user() -> Result<(), TodoError> {
        let api = api();
        let new = NewTodo::new("  fresh ", OwnerRef::Username("newbie".into()))?;
        let created = api.add_todo(new).await?;

        assert_eq!(created.todo.title, "fresh");
        assert_eq!(created.todo.id, TodoId::new(3));
        assert_eq!(created.username.as_deref(), Some("newbie"));
        assert!(api.users().iter().any(|u| u.username == "newbie" && u.id == created.todo.owner_id));
        Ok(())
    }

    #[tokio::test]
    async fn add_with_unknown_user_id_fails() -> Result<(), TodoError> {
        let new = NewTodo::new("x", OwnerRef::UserId(UserId::new(42)))?;
        let result = api().add_todo(new).await;
        assert!(matches!(result, Err(TodoError::Network { status: Some(400), .. })));
        Ok(())
    }
}
