//! # Todo Sections Core
//!
//! Core traits, domain types and pure transformations for the Todo Sections
//! workspace.
//!
//! The crate has two halves:
//!
//! - The **architecture** traits shared by every feature: [`Reducer`](reducer::Reducer),
//!   [`Effect`](effect::Effect) and the injected [`environment`] dependencies.
//! - The **section pipeline**: the [`model`] types, [`grouping`] of flat todo
//!   records into per-user sections, the status [`filter`] layer and the
//!   [`reconcile`] helpers that patch sections after a remote write.
//!
//! Everything in the pipeline is a pure function over owned data. I/O lives
//! behind the [`TodoApi`](environment::TodoApi) trait and is only ever
//! executed by the runtime as an effect.
//!
//! ## Example
//!
//! ```
//! use todo_sections_core::filter::{filter_count, FilterType};
//! use todo_sections_core::grouping::group_todos_by_user;
//! use todo_sections_core::model::{Todo, TodoId, User, UserId};
//!
//! let users = vec![User::new(UserId::new(1), "u1"), User::new(UserId::new(2), "u2")];
//! let todos = vec![
//!     Todo::new(TodoId::new(1), UserId::new(1), "A", false),
//!     Todo::new(TodoId::new(2), UserId::new(1), "B", true),
//!     Todo::new(TodoId::new(3), UserId::new(2), "C", false),
//! ];
//!
//! let sections = group_todos_by_user(&todos, &users);
//! assert_eq!(sections.len(), 2);
//! assert_eq!(sections[0].title, "u1");
//! assert_eq!(filter_count(&sections, FilterType::Done), 1);
//! ```

pub use chrono::{DateTime, Utc};
pub use smallvec::{smallvec, SmallVec};

/// Declarative helpers for building effects
#[macro_use]
pub mod effect_macros;

pub mod effect;
pub mod environment;
pub mod error;
pub mod filter;
pub mod grouping;
pub mod model;
pub mod reconcile;
pub mod reducer;

pub use effect::Effect;
pub use environment::{Clock, SystemClock, TodoApi};
pub use error::{ErrorCode, ErrorInfo, TodoError};
pub use filter::{EmptySectionPolicy, FilterType};
pub use grouping::UserDirectory;
pub use model::{CreatedTodo, NewTodo, OwnerRef, Section, Todo, TodoId, User, UserId};
pub use reducer::Reducer;
