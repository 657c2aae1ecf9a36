//! Domain types for todos, users and sections.
//!
//! [`Todo`] and [`User`] mirror the remote records. [`Section`] is derived,
//! never persisted: it groups the todos of one owner under that owner's
//! username.

use crate::error::TodoError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Section title used when a todo's owner is not in the user set
pub const UNKNOWN_OWNER: &str = "Unknown";

/// Accepts an id encoded either as a JSON number or as a numeric string.
///
/// Some backends (the development mock among them) hand out string ids, while
/// todos reference their owner numerically.
fn deserialize_numeric_id<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(u64),
        Text(String),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Number(n) => Ok(n),
        RawId::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid numeric id: {s:?}"))),
    }
}

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            #[doc = concat!("Creates a `", stringify!($name), "` from its raw value")]
            #[must_use]
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            /// Returns the raw numeric value
            #[must_use]
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                deserialize_numeric_id(deserializer).map(Self)
            }
        }
    };
}

numeric_id!(
    /// Unique identifier of a todo, assigned by the remote store
    TodoId
);

numeric_id!(
    /// Unique identifier of a user
    UserId
);

/// A todo record as returned by the remote store
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Unique identifier
    pub id: TodoId,
    /// Owning user
    #[serde(rename = "userId")]
    pub owner_id: UserId,
    /// Title, non-empty
    pub title: String,
    /// Completion flag
    #[serde(default)]
    pub completed: bool,
}

impl Todo {
    /// Creates a todo record
    #[must_use]
    pub fn new(id: TodoId, owner_id: UserId, title: impl Into<String>, completed: bool) -> Self {
        Self {
            id,
            owner_id,
            title: title.into(),
            completed,
        }
    }
}

/// A user record. Read-only reference data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: UserId,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Username, used as the section title
    pub username: String,
}

impl User {
    /// Creates a user whose display name equals its username
    #[must_use]
    pub fn new(id: UserId, username: impl Into<String>) -> Self {
        let username = username.into();
        Self {
            id,
            name: username.clone(),
            username,
        }
    }

    /// Sets the display name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// A titled, ordered group of todos sharing an owner
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Owner username, or [`UNKNOWN_OWNER`]
    pub title: String,
    /// Todos in arrival order
    pub items: Vec<Todo>,
    /// Expand/collapse flag
    pub expanded: bool,
}

impl Section {
    /// Creates an expanded section
    #[must_use]
    pub fn new(title: impl Into<String>, items: Vec<Todo>) -> Self {
        Self {
            title: title.into(),
            items,
            expanded: true,
        }
    }

    /// Number of todos in the section
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the section holds no todos
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Looks up a todo by id
    #[must_use]
    pub fn get(&self, id: TodoId) -> Option<&Todo> {
        self.items.iter().find(|t| t.id == id)
    }

    /// Returns `true` if the section holds the todo
    #[must_use]
    pub fn contains(&self, id: TodoId) -> bool {
        self.get(id).is_some()
    }
}

/// Who a new todo belongs to
///
/// The add endpoint accepts either form. A username with no matching user
/// makes the server create that user.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum OwnerRef {
    /// Owner by username
    Username(String),
    /// Owner by id
    UserId(UserId),
}

impl fmt::Display for OwnerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Username(name) => write!(f, "username {name}"),
            Self::UserId(id) => write!(f, "user #{id}"),
        }
    }
}

/// A validated request to create a todo
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewTodo {
    title: String,
    owner: OwnerRef,
    completed: bool,
}

impl NewTodo {
    /// Validates and normalizes a new todo.
    ///
    /// Title and username are trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Validation`] if the title or username is blank.
    pub fn new(title: &str, owner: OwnerRef) -> Result<Self, TodoError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(TodoError::Validation("Todo title cannot be empty".to_string()));
        }

        let owner = match owner {
            OwnerRef::Username(name) => {
                let name = name.trim();
                if name.is_empty() {
                    return Err(TodoError::Validation("Username cannot be empty".to_string()));
                }
                OwnerRef::Username(name.to_string())
            },
            by_id @ OwnerRef::UserId(_) => by_id,
        };

        Ok(Self {
            title: title.to_string(),
            owner,
            completed: false,
        })
    }

    /// Marks the todo as created already completed
    #[must_use]
    pub const fn completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    /// Normalized title
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Requested owner
    #[must_use]
    pub const fn owner(&self) -> &OwnerRef {
        &self.owner
    }

    /// Initial completion flag
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed
    }
}

/// A todo returned by the add endpoint
///
/// The server may echo the owner's username, which matters when it created
/// the user implicitly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreatedTodo {
    /// The stored todo
    pub todo: Todo,
    /// Owner username, when the server included it
    pub username: Option<String>,
}
