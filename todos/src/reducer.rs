//! Reducer for the sectioned todo list.
//!
//! Fetches are a two-step chain: `FetchAll` loads users, and only
//! `UsersLoaded` issues the todos request. Mutations write remotely first and
//! reconcile the sections when the result action comes back; failures leave
//! the sections untouched.

use crate::types::{NoticeKind, Notification, RequestId, TodosAction, TodosState};
use std::sync::Arc;
use std::time::Duration;
use todo_sections_core::environment::{Clock, TodoApi};
use todo_sections_core::error::TodoError;
use todo_sections_core::grouping::{self, GroupingOptions, UserDirectory};
use todo_sections_core::model::{CreatedTodo, OwnerRef, User, UNKNOWN_OWNER};
use todo_sections_core::{SmallVec, async_effect, delay, effect::Effect, reconcile, reducer::Reducer, smallvec};
use tokio::sync::broadcast;

/// Environment dependencies for the todos reducer
#[derive(Clone)]
pub struct TodosEnvironment {
    /// Remote todo store
    pub api: Arc<dyn TodoApi>,
    /// Clock for error and notice timestamps
    pub clock: Arc<dyn Clock>,
    /// Outlet for transient notices
    pub notifier: broadcast::Sender<Notification>,
    /// How long a notice stays in state
    pub notice_ttl: Duration,
    /// Drop blank-titled and orphaned records before grouping
    pub drop_invalid: bool,
}

impl TodosEnvironment {
    /// Creates an environment with a 3 second notice lifetime
    #[must_use]
    pub fn new(api: Arc<dyn TodoApi>, clock: Arc<dyn Clock>) -> Self {
        let (notifier, _) = broadcast::channel(32);
        Self {
            api,
            clock,
            notifier,
            notice_ttl: Duration::from_secs(3),
            drop_invalid: false,
        }
    }

    /// Sets the notice lifetime
    #[must_use]
    pub const fn with_notice_ttl(mut self, ttl: Duration) -> Self {
        self.notice_ttl = ttl;
        self
    }

    /// Enables the record validation pass
    #[must_use]
    pub const fn with_drop_invalid(mut self, drop_invalid: bool) -> Self {
        self.drop_invalid = drop_invalid;
        self
    }
}

impl std::fmt::Debug for TodosEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodosEnvironment")
            .field("notice_ttl", &self.notice_ttl)
            .field("drop_invalid", &self.drop_invalid)
            .finish_non_exhaustive()
    }
}

/// Reducer for the todo list
#[derive(Clone, Debug, Default)]
pub struct TodosReducer;

type Effects = SmallVec<[Effect<TodosAction>; 4]>;

impl TodosReducer {
    /// Creates a new `TodosReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Issues a todos request for the current owner filter
    fn request_todos(state: &mut TodosState, env: &TodosEnvironment, fetch: RequestId) -> Effect<TodosAction> {
        state.latest_request += 1;
        state.loading = true;
        let request = state.latest_request;
        let owner = state.owner_filter;
        let api = Arc::clone(&env.api);

        tracing::debug!(fetch, request, ?owner, "Requesting todos");
        async_effect! {
            Some(TodosAction::TodosLoaded {
                fetch,
                request,
                result: api.fetch_todos(owner).await,
            })
        }
    }

    /// Records a fetch failure
    fn fetch_failed(state: &mut TodosState, env: &TodosEnvironment, error: &TodoError) -> Effects {
        tracing::warn!(%error, "Fetch failed");
        state.loading = false;
        state.error = Some(error.to_info(env.clock.now()));
        Self::notify(state, env, NoticeKind::Error, error.to_string())
    }

    /// Shows a notice, publishes it and schedules its dismissal
    fn notify(
        state: &mut TodosState,
        env: &TodosEnvironment,
        kind: NoticeKind,
        message: String,
    ) -> Effects {
        state.notice_seq += 1;
        let notice = Notification {
            seq: state.notice_seq,
            kind,
            message,
            at: env.clock.now(),
        };
        state.notice = Some(notice.clone());

        let notifier = env.notifier.clone();
        smallvec![
            async_effect! {
                // No subscribers is fine
                let _ = notifier.send(notice);
                None::<TodosAction>
            },
            delay! {
                duration: env.notice_ttl,
                action: TodosAction::DismissNotice { seq: state.notice_seq }
            },
        ]
    }

    /// Section title for a freshly created todo
    ///
    /// Prefers the server's echo, then the user cache, then the username the
    /// caller asked for.
    fn owner_title(users: &UserDirectory, created: &CreatedTodo, requested: &OwnerRef) -> String {
        if let Some(name) = created.username.as_deref().filter(|n| !n.is_empty()) {
            return name.to_string();
        }
        if let Some(user) = users.get(created.todo.owner_id) {
            return user.username.clone();
        }
        match requested {
            OwnerRef::Username(name) => name.clone(),
            OwnerRef::UserId(_) => UNKNOWN_OWNER.to_string(),
        }
    }

    fn todo_added(
        state: &mut TodosState,
        env: &TodosEnvironment,
        request: RequestId,
        requested: &OwnerRef,
        created: CreatedTodo,
    ) -> Effects {
        let title = Self::owner_title(&state.users, &created, requested);
        let owner_id = created.todo.owner_id;

        if title != UNKNOWN_OWNER && state.users.get(owner_id).is_none() {
            tracing::debug!(%owner_id, username = %title, "Learned implicitly created user");
            state.users = Arc::new(state.users.with_user(User::new(owner_id, title.clone())));
        }

        if state.owner_filter.is_none_or(|owner| owner == owner_id) {
            state.sections = Arc::new(reconcile::append_todo(&state.sections, created.todo, &title));
        }

        tracing::info!(request, section = %title, "Todo added");
        Self::notify(state, env, NoticeKind::Success, "Todo added successfully".to_string())
    }
}

impl Reducer for TodosReducer {
    type State = TodosState;
    type Action = TodosAction;
    type Environment = TodosEnvironment;

    #[allow(clippy::too_many_lines)] // One arm per action
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Fetching ==========
            TodosAction::FetchAll { fetch } => {
                state.loading = true;
                state.error = None;
                let api = Arc::clone(&env.api);
                smallvec![async_effect! {
                    Some(TodosAction::UsersLoaded {
                        fetch,
                        result: api.fetch_users().await,
                    })
                }]
            },

            TodosAction::UsersLoaded {
                fetch,
                result: Ok(users),
            } => {
                tracing::debug!(fetch, users = users.len(), "Users loaded");
                state.users = Arc::new(UserDirectory::from_users(&users));
                smallvec![Self::request_todos(state, env, fetch)]
            },

            TodosAction::UsersLoaded {
                result: Err(error), ..
            } => Self::fetch_failed(state, env, &error),

            TodosAction::FetchTodos { fetch } => {
                state.error = None;
                smallvec![Self::request_todos(state, env, fetch)]
            },

            TodosAction::TodosLoaded { fetch, request, .. } if request != state.latest_request => {
                tracing::warn!(
                    fetch,
                    request,
                    latest = state.latest_request,
                    "Discarding stale todos response"
                );
                SmallVec::new()
            },

            TodosAction::TodosLoaded {
                result: Ok(todos), ..
            } => {
                let options = GroupingOptions {
                    owner: state.owner_filter,
                    drop_invalid: env.drop_invalid,
                };
                state.sections = Arc::new(grouping::group_with_options(&todos, &state.users, options));
                state.loading = false;
                state.error = None;
                state.initialized = true;
                tracing::info!(
                    todos = todos.len(),
                    sections = state.sections.len(),
                    "Todos loaded"
                );
                SmallVec::new()
            },

            TodosAction::TodosLoaded {
                result: Err(error), ..
            } => Self::fetch_failed(state, env, &error),

            // ========== Filters ==========
            TodosAction::SetFilter(filter) => {
                state.filter = filter;
                SmallVec::new()
            },

            TodosAction::SetOwnerFilter { owner, fetch } => {
                state.owner_filter = owner;
                if state.initialized {
                    smallvec![Self::request_todos(state, env, fetch)]
                } else {
                    SmallVec::new()
                }
            },

            // ========== Mutations ==========
            TodosAction::AddTodo { request, todo } => {
                let api = Arc::clone(&env.api);
                let requested = todo.owner().clone();
                smallvec![async_effect! {
                    Some(TodosAction::TodoAdded {
                        request,
                        requested,
                        result: api.add_todo(todo).await,
                    })
                }]
            },

            TodosAction::DeleteTodo { request, id } => {
                let api = Arc::clone(&env.api);
                smallvec![async_effect! {
                    Some(TodosAction::TodoDeleted {
                        request,
                        id,
                        result: api.delete_todo(id).await,
                    })
                }]
            },

            TodosAction::ToggleTodoStatus {
                request,
                id,
                completed,
            } => {
                let api = Arc::clone(&env.api);
                smallvec![async_effect! {
                    Some(TodosAction::TodoStatusToggled {
                        request,
                        id,
                        result: api.set_completed(id, !completed).await,
                    })
                }]
            },

            TodosAction::TodoAdded {
                request,
                requested,
                result,
            } => match result {
                Ok(created) => Self::todo_added(state, env, request, &requested, created),
                Err(error) => {
                    tracing::warn!(request, %error, "Add failed");
                    Self::notify(state, env, NoticeKind::Error, format!("Failed to add todo: {error}"))
                },
            },

            TodosAction::TodoDeleted { request, id, result } => match result {
                Ok(()) => {
                    state.sections = Arc::new(reconcile::remove_todo(&state.sections, id));
                    tracing::info!(request, %id, "Todo deleted");
                    Self::notify(state, env, NoticeKind::Success, "Todo deleted successfully".to_string())
                },
                Err(error) => {
                    tracing::warn!(request, %id, %error, "Delete failed");
                    Self::notify(state, env, NoticeKind::Error, format!("Failed to delete todo: {error}"))
                },
            },

            TodosAction::TodoStatusToggled { request, id, result } => match result {
                Ok(todo) => {
                    state.sections =
                        Arc::new(reconcile::set_completed(&state.sections, id, todo.completed));
                    tracing::info!(request, %id, completed = todo.completed, "Todo status updated");
                    Self::notify(
                        state,
                        env,
                        NoticeKind::Success,
                        "Todo status updated successfully".to_string(),
                    )
                },
                Err(error) => {
                    tracing::warn!(request, %id, %error, "Status update failed");
                    Self::notify(
                        state,
                        env,
                        NoticeKind::Error,
                        format!("Failed to update todo status: {error}"),
                    )
                },
            },

            // ========== Local ==========
            TodosAction::ToggleSectionExpanded { title } => {
                state.sections = Arc::new(reconcile::toggle_expanded(&state.sections, &title));
                SmallVec::new()
            },

            TodosAction::DismissNotice { seq } => {
                if state.notice.as_ref().is_some_and(|n| n.seq == seq) {
                    state.notice = None;
                }
                SmallVec::new()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use todo_sections_core::error::ErrorCode;
    use todo_sections_core::filter::FilterType;
    use todo_sections_core::model::{NewTodo, Section, Todo, TodoId, UserId};
    use todo_sections_testing::{ApiCall, MockTodoApi, ReducerTest, assertions, drain_effects, test_clock};

    fn users() -> Vec<User> {
        vec![User::new(UserId::new(1), "u1"), User::new(UserId::new(2), "u2")]
    }

    fn todos() -> Vec<Todo> {
        vec![
            Todo::new(TodoId::new(1), UserId::new(1), "A", false),
            Todo::new(TodoId::new(2), UserId::new(1), "B", true),
            Todo::new(TodoId::new(3), UserId::new(2), "C", false),
        ]
    }

    fn env_with(api: &MockTodoApi) -> TodosEnvironment {
        TodosEnvironment::new(Arc::new(api.clone()), Arc::new(test_clock()))
    }

    fn env() -> TodosEnvironment {
        env_with(&MockTodoApi::new().with_users(users()).with_todos(todos()))
    }

    fn loaded_state() -> TodosState {
        let directory = UserDirectory::from_users(&users());
        TodosState {
            sections: Arc::new(grouping::group_with_directory(&todos(), &directory)),
            users: Arc::new(directory),
            initialized: true,
            latest_request: 1,
            ..TodosState::default()
        }
    }

    fn section_titles(state: &TodosState) -> Vec<String> {
        state.sections.iter().map(|s| s.title.clone()).collect()
    }

    #[tokio::test]
    async fn fetch_all_requests_users_first() {
        let api = MockTodoApi::new().with_users(users()).with_todos(todos());
        let effects = ReducerTest::new(TodosReducer::new())
            .with_env(env_with(&api))
            .given_state(TodosState::default())
            .when_action(TodosAction::FetchAll { fetch: 3 })
            .then_state(|state| {
                assert!(state.loading);
                assert!(state.error.is_none());
            })
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_future_effect(effects);
            })
            .run_and_take_effects();

        let actions = drain_effects(effects).await;
        assert!(matches!(
            actions.as_slice(),
            [TodosAction::UsersLoaded { fetch: 3, result: Ok(u) }] if u.len() == 2
        ));
        assert_eq!(api.calls(), vec![ApiCall::FetchUsers]);
    }

    #[tokio::test]
    async fn users_loaded_issues_todos_request() {
        let api = MockTodoApi::new().with_users(users()).with_todos(todos());
        let effects = ReducerTest::new(TodosReducer::new())
            .with_env(env_with(&api))
            .given_state(TodosState {
                owner_filter: Some(UserId::new(2)),
                ..TodosState::default()
            })
            .when_action(TodosAction::UsersLoaded {
                fetch: 3,
                result: Ok(users()),
            })
            .then_state(|state| {
                assert_eq!(state.users.len(), 2);
                assert_eq!(state.latest_request, 1);
                assert!(state.loading);
            })
            .run_and_take_effects();

        let actions = drain_effects(effects).await;
        assert!(matches!(
            actions.as_slice(),
            [TodosAction::TodosLoaded { fetch: 3, request: 1, .. }]
        ));
        assert_eq!(api.calls(), vec![ApiCall::FetchTodos(Some(UserId::new(2)))]);
    }

    #[test]
    fn users_failure_sets_error_and_stops() {
        ReducerTest::new(TodosReducer::new())
            .with_env(env())
            .given_state(TodosState {
                loading: true,
                ..TodosState::default()
            })
            .when_action(TodosAction::UsersLoaded {
                fetch: 1,
                result: Err(TodoError::http(404, "HTTP 404: Not Found")),
            })
            .then_state(|state| {
                assert!(!state.loading);
                assert!(!state.initialized);
                let error = state.error.as_ref().map(|e| e.code);
                assert_eq!(error, Some(ErrorCode::Network));
                assert_eq!(state.latest_request, 0);
            })
            .then_effects(|effects| {
                // publish + dismiss, but no todos request
                assertions::assert_effects_count(effects, 2);
                assertions::assert_has_delay_effect(effects);
            })
            .run();
    }

    #[test]
    fn todos_loaded_groups_sections() {
        ReducerTest::new(TodosReducer::new())
            .with_env(env())
            .given_state(TodosState {
                users: Arc::new(UserDirectory::from_users(&users())),
                latest_request: 1,
                loading: true,
                ..TodosState::default()
            })
            .when_action(TodosAction::TodosLoaded {
                fetch: 1,
                request: 1,
                result: Ok(todos()),
            })
            .then_state(|state| {
                assert_eq!(section_titles(state), vec!["u1", "u2"]);
                assert_eq!(state.sections[0].len(), 2);
                assert!(state.sections.iter().all(|s| s.expanded));
                assert!(!state.loading);
                assert!(state.initialized);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn stale_todos_response_is_discarded() {
        ReducerTest::new(TodosReducer::new())
            .with_env(env())
            .given_state(TodosState {
                latest_request: 3,
                loading: true,
                ..loaded_state()
            })
            .when_action(TodosAction::TodosLoaded {
                fetch: 2,
                request: 2,
                result: Ok(Vec::new()),
            })
            .then_state(|state| {
                assert_eq!(state.sections.len(), 2);
                assert!(state.loading);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn owner_filter_before_initialization_only_records() {
        ReducerTest::new(TodosReducer::new())
            .with_env(env())
            .given_state(TodosState::default())
            .when_action(TodosAction::SetOwnerFilter {
                owner: Some(UserId::new(1)),
                fetch: 1,
            })
            .then_state(|state| {
                assert_eq!(state.owner_filter, Some(UserId::new(1)));
                assert_eq!(state.latest_request, 0);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn owner_filter_after_initialization_refetches() {
        ReducerTest::new(TodosReducer::new())
            .with_env(env())
            .given_state(loaded_state())
            .when_action(TodosAction::SetOwnerFilter {
                owner: Some(UserId::new(1)),
                fetch: 1,
            })
            .then_state(|state| {
                assert_eq!(state.latest_request, 2);
                assert!(state.loading);
            })
            .then_effects(assertions::assert_has_future_effect)
            .run();
    }

    #[test]
    fn set_filter_is_local() {
        ReducerTest::new(TodosReducer::new())
            .with_env(env())
            .given_state(loaded_state())
            .when_action(TodosAction::SetFilter(FilterType::Done))
            .then_state(|state| {
                assert_eq!(state.filter, FilterType::Done);
                assert_eq!(state.visible_count(), 1);
                assert_eq!(state.visible_sections().len(), 1);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn toggle_section_expanded_flips_one_section() {
        ReducerTest::new(TodosReducer::new())
            .with_env(env())
            .given_state(loaded_state())
            .when_action(TodosAction::ToggleSectionExpanded { title: "u2".into() })
            .then_state(|state| {
                assert!(state.sections[0].expanded);
                assert!(!state.sections[1].expanded);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn added_todo_appends_to_existing_section() {
        let created = CreatedTodo {
            todo: Todo::new(TodoId::new(4), UserId::new(2), "D", false),
            username: None,
        };
        ReducerTest::new(TodosReducer::new())
            .with_env(env())
            .given_state(loaded_state())
            .when_action(TodosAction::TodoAdded {
                request: 1,
                requested: OwnerRef::UserId(UserId::new(2)),
                result: Ok(created),
            })
            .then_state(|state| {
                assert_eq!(section_titles(state), vec!["u1", "u2"]);
                assert_eq!(state.sections[1].items.last().map(|t| t.id), Some(TodoId::new(4)));
                assert!(matches!(&state.notice, Some(n) if n.kind == NoticeKind::Success));
            })
            .run();
    }

    #[test]
    fn added_todo_for_new_user_creates_section_and_learns_user() {
        let created = CreatedTodo {
            todo: Todo::new(TodoId::new(4), UserId::new(9), "D", false),
            username: None,
        };
        ReducerTest::new(TodosReducer::new())
            .with_env(env())
            .given_state(loaded_state())
            .when_action(TodosAction::TodoAdded {
                request: 1,
                requested: OwnerRef::Username("newbie".into()),
                result: Ok(created),
            })
            .then_state(|state| {
                assert_eq!(section_titles(state), vec!["u1", "u2", "newbie"]);
                assert!(state.sections[2].expanded);
                assert_eq!(state.users.username_of(UserId::new(9)), "newbie");
            })
            .run();
    }

    #[test]
    fn added_todo_outside_owner_filter_is_not_shown() {
        let created = CreatedTodo {
            todo: Todo::new(TodoId::new(4), UserId::new(2), "D", false),
            username: Some("u2".into()),
        };
        ReducerTest::new(TodosReducer::new())
            .with_env(env())
            .given_state(TodosState {
                owner_filter: Some(UserId::new(1)),
                ..loaded_state()
            })
            .when_action(TodosAction::TodoAdded {
                request: 1,
                requested: OwnerRef::UserId(UserId::new(2)),
                result: Ok(created),
            })
            .then_state(|state| {
                assert!(state.find(TodoId::new(4)).is_none());
            })
            .run();
    }

    #[test]
    fn deleted_todo_drops_emptied_section() {
        ReducerTest::new(TodosReducer::new())
            .with_env(env())
            .given_state(loaded_state())
            .when_action(TodosAction::TodoDeleted {
                request: 1,
                id: TodoId::new(3),
                result: Ok(()),
            })
            .then_state(|state| {
                assert_eq!(section_titles(state), vec!["u1"]);
            })
            .run();
    }

    #[test]
    fn failed_delete_leaves_sections_untouched() {
        let before = loaded_state();
        let expected: Vec<Section> = before.sections.as_ref().clone();
        ReducerTest::new(TodosReducer::new())
            .with_env(env())
            .given_state(before)
            .when_action(TodosAction::TodoDeleted {
                request: 1,
                id: TodoId::new(3),
                result: Err(TodoError::NotFound { id: TodoId::new(3) }),
            })
            .then_state(move |state| {
                assert_eq!(state.sections.as_ref(), &expected);
                assert!(state.error.is_none());
                assert!(matches!(&state.notice, Some(n) if n.kind == NoticeKind::Error));
            })
            .then_effects(assertions::assert_has_delay_effect)
            .run();
    }

    #[test]
    fn toggled_status_updates_only_target() {
        let mut updated = todos()[0].clone();
        updated.completed = true;
        ReducerTest::new(TodosReducer::new())
            .with_env(env())
            .given_state(loaded_state())
            .when_action(TodosAction::TodoStatusToggled {
                request: 1,
                id: TodoId::new(1),
                result: Ok(updated),
            })
            .then_state(|state| {
                assert_eq!(state.find(TodoId::new(1)).map(|t| t.completed), Some(true));
                assert_eq!(state.find(TodoId::new(2)).map(|t| t.completed), Some(true));
                assert_eq!(state.find(TodoId::new(3)).map(|t| t.completed), Some(false));
                assert_eq!(section_titles(state), vec!["u1", "u2"]);
                let notice = state.notice.as_ref().map(|n| (n.kind, n.message.as_str()));
                assert_eq!(notice, Some((NoticeKind::Success, "Todo status updated successfully")));
            })
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 2);
                assertions::assert_has_delay_effect(effects);
            })
            .run();
    }

    #[test]
    fn failed_status_update_notice_names_the_operation() {
        ReducerTest::new(TodosReducer::new())
            .with_env(env())
            .given_state(loaded_state())
            .when_action(TodosAction::TodoStatusToggled {
                request: 1,
                id: TodoId::new(1),
                result: Err(TodoError::transport("connection reset")),
            })
            .then_state(|state| {
                assert_eq!(state.find(TodoId::new(1)).map(|t| t.completed), Some(false));
                let message = state.notice.as_ref().map(|n| n.message.clone()).unwrap_or_default();
                assert!(message.starts_with("Failed to update todo status: "), "{message}");
                assert!(message.contains("connection reset"), "{message}");
            })
            .run();
    }

    #[tokio::test]
    async fn toggle_writes_negated_flag() {
        let api = MockTodoApi::new().with_users(users()).with_todos(todos());
        let effects = ReducerTest::new(TodosReducer::new())
            .with_env(env_with(&api))
            .given_state(loaded_state())
            .when_action(TodosAction::ToggleTodoStatus {
                request: 5,
                id: TodoId::new(2),
                completed: true,
            })
            .then_state(|state| {
                // nothing changes until the write succeeds
                assert_eq!(state.find(TodoId::new(2)).map(|t| t.completed), Some(true));
            })
            .run_and_take_effects();

        let actions = drain_effects(effects).await;
        assert!(matches!(
            actions.as_slice(),
            [TodosAction::TodoStatusToggled { request: 5, result: Ok(t), .. }] if !t.completed
        ));
        assert_eq!(api.calls(), vec![ApiCall::SetCompleted(TodoId::new(2), false)]);
    }

    #[tokio::test]
    async fn add_forwards_validated_todo() -> Result<(), TodoError> {
        let api = MockTodoApi::new().with_users(users());
        let todo = NewTodo::new("  buy milk ", OwnerRef::Username("u1".into()))?;
        let effects = ReducerTest::new(TodosReducer::new())
            .with_env(env_with(&api))
            .given_state(loaded_state())
            .when_action(TodosAction::AddTodo { request: 2, todo: todo.clone() })
            .run_and_take_effects();

        let actions = drain_effects(effects).await;
        assert!(matches!(
            actions.as_slice(),
            [TodosAction::TodoAdded { request: 2, result: Ok(c), .. }] if c.todo.title == "buy milk"
        ));
        assert_eq!(api.calls(), vec![ApiCall::AddTodo(todo)]);
        Ok(())
    }

    #[test]
    fn dismiss_only_clears_matching_notice() {
        let notice = Notification {
            seq: 2,
            kind: NoticeKind::Success,
            message: "ok".into(),
            at: test_clock().now(),
        };
        ReducerTest::new(TodosReducer::new())
            .with_env(env())
            .given_state(TodosState {
                notice: Some(notice),
                notice_seq: 2,
                ..TodosState::default()
            })
            .when_action(TodosAction::DismissNotice { seq: 1 })
            .then_state(|state| assert!(state.notice.is_some()))
            .run();
    }
}
