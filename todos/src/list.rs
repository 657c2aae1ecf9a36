//! Typed facade over the todo list store.

use crate::reducer::{TodosEnvironment, TodosReducer};
use crate::types::{Notification, RequestId, TodosAction, TodosState};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use todo_sections_core::environment::{Clock, SystemClock, TodoApi};
use todo_sections_core::error::TodoError;
use todo_sections_core::filter::{EmptySectionPolicy, FilterType};
use todo_sections_core::model::{NewTodo, OwnerRef, Section, Todo, TodoId, UserId};
use todo_sections_runtime::{Store, StoreConfig, StoreError};
use tokio::sync::{broadcast, watch};

/// Store type backing a [`TodoList`]
pub type TodosStore = Store<TodosState, TodosAction, TodosEnvironment, TodosReducer>;

/// Configuration for a [`TodoList`]
#[derive(Debug, Clone)]
pub struct TodoListConfig {
    /// How the `All` filter treats empty sections
    pub empty_sections: EmptySectionPolicy,
    /// How long to wait for the result of a remote operation
    pub result_timeout: Duration,
    /// How long a notice stays in state
    pub notice_ttl: Duration,
    /// Drop blank-titled and orphaned records before grouping
    pub drop_invalid: bool,
    /// Runtime settings
    pub store: StoreConfig,
}

impl TodoListConfig {
    /// Set the empty-section policy
    #[must_use]
    pub const fn with_empty_sections(mut self, policy: EmptySectionPolicy) -> Self {
        self.empty_sections = policy;
        self
    }

    /// Set the result timeout
    #[must_use]
    pub const fn with_result_timeout(mut self, timeout: Duration) -> Self {
        self.result_timeout = timeout;
        self
    }

    /// Set the notice lifetime
    #[must_use]
    pub const fn with_notice_ttl(mut self, ttl: Duration) -> Self {
        self.notice_ttl = ttl;
        self
    }

    /// Enable the record validation pass
    #[must_use]
    pub const fn with_drop_invalid(mut self, drop_invalid: bool) -> Self {
        self.drop_invalid = drop_invalid;
        self
    }
}

impl Default for TodoListConfig {
    fn default() -> Self {
        Self {
            empty_sections: EmptySectionPolicy::default(),
            result_timeout: Duration::from_secs(30),
            notice_ttl: Duration::from_secs(3),
            drop_invalid: false,
            store: StoreConfig::default(),
        }
    }
}

fn store_error(error: StoreError) -> TodoError {
    TodoError::Unknown(error.to_string())
}

/// Sectioned todo list
///
/// Owns a store running [`TodosReducer`] and exposes each operation as an
/// async method that resolves once the remote call and the reconciliation
/// are done.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use todo_sections::{TodoList, TodoListConfig};
/// use todo_sections_core::filter::FilterType;
/// use todo_sections_core::model::OwnerRef;
/// use todo_sections_http::HttpTodoApi;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let list = TodoList::new(Arc::new(HttpTodoApi::from_env()?), TodoListConfig::default());
/// list.fetch_all().await?;
/// list.add_todo("Buy milk", OwnerRef::Username("Bret".into())).await?;
/// list.set_filter(FilterType::UnDone).await?;
/// for section in list.visible_sections() {
///     println!("{} ({})", section.title, section.len());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct TodoList {
    store: TodosStore,
    notifier: broadcast::Sender<Notification>,
    next_request: Arc<AtomicU64>,
    result_timeout: Duration,
}

impl TodoList {
    /// Creates a list over `api` using the system clock
    #[must_use]
    pub fn new(api: Arc<dyn TodoApi>, config: TodoListConfig) -> Self {
        Self::with_clock(api, Arc::new(SystemClock), config)
    }

    /// Creates a list with an explicit clock
    #[must_use]
    pub fn with_clock(api: Arc<dyn TodoApi>, clock: Arc<dyn Clock>, config: TodoListConfig) -> Self {
        let env = TodosEnvironment::new(api, clock)
            .with_notice_ttl(config.notice_ttl)
            .with_drop_invalid(config.drop_invalid);
        let notifier = env.notifier.clone();
        let store = Store::with_config(
            TodosState::with_policy(config.empty_sections),
            TodosReducer::new(),
            env,
            config.store,
        );

        Self {
            store,
            notifier,
            next_request: Arc::new(AtomicU64::new(1)),
            result_timeout: config.result_timeout,
        }
    }

    /// The underlying store
    #[must_use]
    pub const fn store(&self) -> &TodosStore {
        &self.store
    }

    fn next_request(&self) -> RequestId {
        self.next_request.fetch_add(1, Ordering::Relaxed)
    }

    /// Sends a mutation and waits for its correlated result
    async fn mutate(&self, request: RequestId, action: TodosAction) -> Result<TodosAction, TodoError> {
        self.store
            .send_and_wait_for(
                action,
                move |a| a.result_of() == Some(request),
                self.result_timeout,
            )
            .await
            .map_err(store_error)
    }

    /// Sends a fetch command and waits for the action ending that same load
    ///
    /// Results of other loads running at the same time are ignored, so each
    /// caller sees its own outcome.
    async fn fetch(&self, fetch: RequestId, action: TodosAction) -> Result<(), TodoError> {
        let outcome = self
            .store
            .send_and_wait_for(
                action,
                move |a| a.fetch_id() == Some(fetch),
                self.result_timeout,
            )
            .await
            .map_err(store_error)?;

        match outcome {
            TodosAction::UsersLoaded {
                result: Err(error), ..
            }
            | TodosAction::TodosLoaded {
                result: Err(error), ..
            } => Err(error),
            _ => Ok(()),
        }
    }

    // ========== Fetching ==========

    /// Loads users, then todos, and rebuilds the sections
    ///
    /// # Errors
    ///
    /// Returns the failure of this load. It is also recorded in
    /// [`TodosState::error`] unless a newer load superseded this one.
    pub async fn fetch_all(&self) -> Result<(), TodoError> {
        let fetch = self.next_request();
        self.fetch(fetch, TodosAction::FetchAll { fetch }).await
    }

    /// Reloads todos with the current owner filter
    ///
    /// # Errors
    ///
    /// Returns the failure of this fetch. It is also recorded in
    /// [`TodosState::error`] unless a newer fetch superseded this one.
    pub async fn refresh(&self) -> Result<(), TodoError> {
        let fetch = self.next_request();
        self.fetch(fetch, TodosAction::FetchTodos { fetch }).await
    }

    // ========== Filters ==========

    /// Changes the status filter
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Unknown`] if the store is shutting down.
    pub async fn set_filter(&self, filter: FilterType) -> Result<(), TodoError> {
        self.store
            .send(TodosAction::SetFilter(filter))
            .await
            .map(drop)
            .map_err(store_error)
    }

    /// Changes the owner filter
    ///
    /// Before the initial load this only records the selection. Afterwards it
    /// refetches todos and resolves when the refetch finishes.
    ///
    /// # Errors
    ///
    /// Returns the refetch failure, if one was issued.
    pub async fn set_owner_filter(&self, owner: Option<UserId>) -> Result<(), TodoError> {
        let fetch = self.next_request();
        let action = TodosAction::SetOwnerFilter { owner, fetch };
        if self.snapshot().initialized {
            self.fetch(fetch, action).await
        } else {
            self.store.send(action).await.map(drop).map_err(store_error)
        }
    }

    // ========== Mutations ==========

    /// Creates a todo and appends it to its owner's section
    ///
    /// Title and username are trimmed first.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Validation`] for a blank title or username
    /// without calling the server, or the remote failure otherwise.
    pub async fn add_todo(&self, title: &str, owner: OwnerRef) -> Result<Todo, TodoError> {
        let todo = NewTodo::new(title, owner)?;
        let request = self.next_request();

        match self.mutate(request, TodosAction::AddTodo { request, todo }).await? {
            TodosAction::TodoAdded { result, .. } => result.map(|created| created.todo),
            other => Err(TodoError::Unknown(format!("Unexpected result: {other:?}"))),
        }
    }

    /// Deletes a todo and removes it locally
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::NotFound`] if the server does not know the todo,
    /// or the remote failure otherwise.
    pub async fn delete_todo(&self, id: TodoId) -> Result<(), TodoError> {
        let request = self.next_request();

        match self.mutate(request, TodosAction::DeleteTodo { request, id }).await? {
            TodosAction::TodoDeleted { result, .. } => result,
            other => Err(TodoError::Unknown(format!("Unexpected result: {other:?}"))),
        }
    }

    /// Writes `!current_completed` for a todo and updates it in place
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::NotFound`] if the server does not know the todo,
    /// or the remote failure otherwise.
    pub async fn toggle_todo_status(&self, id: TodoId, current_completed: bool) -> Result<Todo, TodoError> {
        let request = self.next_request();
        let action = TodosAction::ToggleTodoStatus {
            request,
            id,
            completed: current_completed,
        };

        match self.mutate(request, action).await? {
            TodosAction::TodoStatusToggled { result, .. } => result,
            other => Err(TodoError::Unknown(format!("Unexpected result: {other:?}"))),
        }
    }

    /// Collapses or expands a section
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Unknown`] if the store is shutting down.
    pub async fn toggle_section_expanded(&self, title: &str) -> Result<(), TodoError> {
        self.store
            .send(TodosAction::ToggleSectionExpanded {
                title: title.to_string(),
            })
            .await
            .map(drop)
            .map_err(store_error)
    }

    // ========== Observation ==========

    /// Latest state snapshot
    #[must_use]
    pub fn snapshot(&self) -> Arc<TodosState> {
        self.store.snapshot()
    }

    /// Sections under the active status filter
    #[must_use]
    pub fn visible_sections(&self) -> Vec<Section> {
        self.snapshot().visible_sections()
    }

    /// Number of todos under the active status filter
    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.snapshot().visible_count()
    }

    /// Receives every new state snapshot
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<TodosState>> {
        self.store.subscribe_state()
    }

    /// Receives transient success and error notices
    #[must_use]
    pub fn notifications(&self) -> broadcast::Receiver<Notification> {
        self.notifier.subscribe()
    }

    /// Stops accepting operations and waits for running effects
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Unknown`] if effects are still running when
    /// `timeout` expires.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), TodoError> {
        self.store.shutdown(timeout).await.map_err(store_error)
    }
}

impl std::fmt::Debug for TodoList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoList")
            .field("result_timeout", &self.result_timeout)
            .finish_non_exhaustive()
    }
}
