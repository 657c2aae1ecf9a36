//! State and actions of the todo list feature.

use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use todo_sections_core::error::{ErrorInfo, TodoError};
use todo_sections_core::filter::{self, EmptySectionPolicy, FilterType};
use todo_sections_core::grouping::UserDirectory;
use todo_sections_core::model::{CreatedTodo, NewTodo, OwnerRef, Section, Todo, TodoId, User, UserId};

/// Correlates a fetch or mutation with its result action
pub type RequestId = u64;

/// Whether a notice reports success or failure
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    /// A remote write succeeded
    Success,
    /// A fetch or write failed
    Error,
}

/// A transient, user-facing notice
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    /// Sequence number, unique per store
    pub seq: u64,
    /// Success or error
    pub kind: NoticeKind,
    /// Message to show
    pub message: String,
    /// When the notice was raised
    pub at: DateTime<Utc>,
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            NoticeKind::Success => write!(f, "{}", self.message),
            NoticeKind::Error => write!(f, "error: {}", self.message),
        }
    }
}

/// State of the sectioned todo list
///
/// `sections` and `users` are shared copy-on-write: every change installs a
/// fresh `Arc`, so snapshots handed to observers never change under them.
#[derive(Clone, Debug, Default)]
pub struct TodosState {
    /// Base sections as of the last fetch plus reconciled writes
    pub sections: Arc<Vec<Section>>,
    /// User cache used to resolve section titles
    pub users: Arc<UserDirectory>,
    /// A fetch is in flight
    pub loading: bool,
    /// Last fetch failure, cleared by the next successful fetch
    pub error: Option<ErrorInfo>,
    /// Active status filter
    pub filter: FilterType,
    /// Active owner filter
    pub owner_filter: Option<UserId>,
    /// Set once the initial load completed
    pub initialized: bool,
    /// Id of the most recently issued todos request
    pub latest_request: RequestId,
    /// Notice currently on display
    pub notice: Option<Notification>,
    /// Sequence number of the last raised notice
    pub notice_seq: u64,
    /// How the `All` filter treats empty sections
    pub empty_sections: EmptySectionPolicy,
}

impl TodosState {
    /// Empty state with an explicit empty-section policy
    #[must_use]
    pub fn with_policy(empty_sections: EmptySectionPolicy) -> Self {
        Self {
            empty_sections,
            ..Self::default()
        }
    }

    /// Sections as shown under the active status filter
    #[must_use]
    pub fn visible_sections(&self) -> Vec<Section> {
        filter::filter_sections_with(&self.sections, self.filter, self.empty_sections)
    }

    /// Number of todos passing the active status filter
    #[must_use]
    pub fn visible_count(&self) -> usize {
        filter::filter_count(&self.sections, self.filter)
    }

    /// Number of todos passing `filter`, for filter tab badges
    #[must_use]
    pub fn count(&self, filter: FilterType) -> usize {
        filter::filter_count(&self.sections, filter)
    }

    /// Finds a todo in the base sections
    #[must_use]
    pub fn find(&self, id: TodoId) -> Option<&Todo> {
        self.sections.iter().find_map(|s| s.get(id))
    }

    /// Known users in arrival order
    #[must_use]
    pub fn users(&self) -> &[User] {
        self.users.users()
    }
}

/// Actions for the todo list
///
/// Commands come from the [`TodoList`](crate::TodoList) facade; the `*Loaded`
/// and past-tense variants are results fed back by effects.
#[derive(Clone, Debug)]
pub enum TodosAction {
    // ========== Commands ==========
    /// Load users, then todos
    FetchAll {
        /// Correlation id carried by the results of this load
        fetch: RequestId,
    },

    /// Reload todos with the current owner filter
    FetchTodos {
        /// Correlation id
        fetch: RequestId,
    },

    /// Change the status filter
    SetFilter(FilterType),

    /// Change the owner filter; refetches once initialized
    SetOwnerFilter {
        /// New owner filter
        owner: Option<UserId>,
        /// Correlation id of the refetch, if one is issued
        fetch: RequestId,
    },

    /// Create a todo remotely, then append it locally
    AddTodo {
        /// Correlation id
        request: RequestId,
        /// Validated todo
        todo: NewTodo,
    },

    /// Delete a todo remotely, then remove it locally
    DeleteTodo {
        /// Correlation id
        request: RequestId,
        /// Todo to delete
        id: TodoId,
    },

    /// Flip a todo's completion flag remotely, then locally
    ToggleTodoStatus {
        /// Correlation id
        request: RequestId,
        /// Todo to update
        id: TodoId,
        /// Completion flag the caller currently sees
        completed: bool,
    },

    /// Collapse or expand a section (local only)
    ToggleSectionExpanded {
        /// Section title
        title: String,
    },

    /// Hide the notice with this sequence number, if still shown
    DismissNotice {
        /// Notice to dismiss
        seq: u64,
    },

    // ========== Results ==========
    /// Users fetch finished
    UsersLoaded {
        /// Load this result belongs to
        fetch: RequestId,
        /// Fetched users
        result: Result<Vec<User>, TodoError>,
    },

    /// Todos fetch finished
    TodosLoaded {
        /// Load this result belongs to
        fetch: RequestId,
        /// Todos request this result answers, checked against `latest_request`
        request: RequestId,
        /// Fetched todos
        result: Result<Vec<Todo>, TodoError>,
    },

    /// Add finished
    TodoAdded {
        /// Correlation id
        request: RequestId,
        /// Owner as requested, used when the server does not echo a username
        requested: OwnerRef,
        /// Created todo
        result: Result<CreatedTodo, TodoError>,
    },

    /// Delete finished
    TodoDeleted {
        /// Correlation id
        request: RequestId,
        /// Deleted todo
        id: TodoId,
        /// Outcome
        result: Result<(), TodoError>,
    },

    /// Status update finished
    TodoStatusToggled {
        /// Correlation id
        request: RequestId,
        /// Updated todo
        id: TodoId,
        /// Todo as stored remotely
        result: Result<Todo, TodoError>,
    },
}

impl TodosAction {
    /// Correlation id of a mutation result
    #[must_use]
    pub const fn result_of(&self) -> Option<RequestId> {
        match self {
            Self::TodoAdded { request, .. }
            | Self::TodoDeleted { request, .. }
            | Self::TodoStatusToggled { request, .. } => Some(*request),
            _ => None,
        }
    }

    /// Correlation id of the load this action ends
    ///
    /// A failed users fetch ends its load; a successful one does not, since
    /// the todos request follows.
    #[must_use]
    pub const fn fetch_id(&self) -> Option<RequestId> {
        match self {
            Self::UsersLoaded {
                fetch,
                result: Err(_),
            }
            | Self::TodosLoaded { fetch, .. } => Some(*fetch),
            _ => None,
        }
    }
}
