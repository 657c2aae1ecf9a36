//! Todo list grouped into per-user sections.
//!
//! Todos are fetched from a remote store, grouped by owner username, viewed
//! through a status filter, and mutated remotely with the local sections
//! reconciled after each successful write.
//!
//! - [`types`]: state, actions and notices
//! - [`reducer`]: the fetch chain, filters and mutation reconciliation
//! - [`list`]: the [`TodoList`] facade over the store
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use todo_sections::{TodoList, TodoListConfig};
//! use todo_sections_core::model::TodoId;
//! use todo_sections_http::HttpTodoApi;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let list = TodoList::new(Arc::new(HttpTodoApi::from_env()?), TodoListConfig::default());
//! list.fetch_all().await?;
//!
//! // Flip a todo and watch the state change
//! let mut snapshots = list.subscribe();
//! list.toggle_todo_status(TodoId::new(1), false).await?;
//! snapshots.changed().await?;
//! println!("{} open todos", list.snapshot().count(todo_sections_core::FilterType::UnDone));
//! # Ok(())
//! # }
//! ```

pub mod list;
pub mod reducer;
pub mod types;

// Re-export commonly used types
pub use list::{TodoList, TodoListConfig, TodosStore};
pub use reducer::{TodosEnvironment, TodosReducer};
pub use types::{NoticeKind, Notification, RequestId, TodosAction, TodosState};
