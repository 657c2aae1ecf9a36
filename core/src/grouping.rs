//! Grouping pipeline: flat todo records → per-user sections.
//!
//! Sections come out in first-seen order of the owner usernames while
//! iterating todos, and each section keeps its todos in arrival order. Owners
//! that cannot be resolved are grouped under [`UNKNOWN_OWNER`].

use crate::model::{Section, Todo, TodoId, User, UserId, UNKNOWN_OWNER};
use std::collections::HashMap;

/// Pre-fetched user cache used to resolve todo owners
///
/// Keeps users in the order they were loaded so it can also back a user
/// picker.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserDirectory {
    users: Vec<User>,
    index: HashMap<UserId, usize>,
}

impl UserDirectory {
    /// Creates an empty directory
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a directory from user records. Later duplicates of an id win.
    #[must_use]
    pub fn from_users(users: &[User]) -> Self {
        let mut directory = Self::new();
        for user in users {
            directory.upsert(user.clone());
        }
        directory
    }

    /// Inserts or replaces a user
    pub fn upsert(&mut self, user: User) {
        if let Some(&slot) = self.index.get(&user.id) {
            self.users[slot] = user;
        } else {
            self.index.insert(user.id, self.users.len());
            self.users.push(user);
        }
    }

    /// Returns a copy with the user inserted or replaced
    #[must_use]
    pub fn with_user(&self, user: User) -> Self {
        let mut next = self.clone();
        next.upsert(user);
        next
    }

    /// Looks up a user by id
    #[must_use]
    pub fn get(&self, id: UserId) -> Option<&User> {
        self.index.get(&id).map(|&slot| &self.users[slot])
    }

    /// Looks up a user by username
    #[must_use]
    pub fn find_by_username(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|u| u.username == username)
    }

    /// Resolves the section title for an owner
    #[must_use]
    pub fn username_of(&self, id: UserId) -> &str {
        self.get(id).map_or(UNKNOWN_OWNER, |u| u.username.as_str())
    }

    /// Users in load order
    #[must_use]
    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Number of known users
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Returns `true` if no users are known
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

/// Groups todos by owner username.
///
/// Every todo lands in exactly one section. Empty `todos` yields no sections;
/// empty `users` yields a single [`UNKNOWN_OWNER`] section.
#[must_use]
pub fn group_todos_by_user(todos: &[Todo], users: &[User]) -> Vec<Section> {
    group_with_directory(todos, &UserDirectory::from_users(users))
}

/// Groups todos against a pre-fetched user cache
#[must_use]
pub fn group_with_directory(todos: &[Todo], users: &UserDirectory) -> Vec<Section> {
    group_filtered(todos.iter(), users)
}

/// Groups only the todos owned by `owner`, or all todos when `owner` is `None`.
///
/// Equivalent to grouping everything and keeping the owner's todos afterwards.
#[must_use]
pub fn group_todos_for_owner(
    todos: &[Todo],
    users: &UserDirectory,
    owner: Option<UserId>,
) -> Vec<Section> {
    group_filtered(
        todos
            .iter()
            .filter(|t| owner.is_none_or(|id| t.owner_id == id)),
        users,
    )
}

fn group_filtered<'a>(todos: impl Iterator<Item = &'a Todo>, users: &UserDirectory) -> Vec<Section> {
    let mut sections: Vec<Section> = Vec::new();
    let mut slots: HashMap<&str, usize> = HashMap::new();

    for todo in todos {
        let username = users.username_of(todo.owner_id);
        let slot = *slots.entry(username).or_insert_with(|| {
            sections.push(Section::new(username, Vec::new()));
            sections.len() - 1
        });
        sections[slot].items.push(todo.clone());
    }

    sections
}

/// Why a todo record was rejected by [`validate_records`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RejectReason {
    /// Title is empty or whitespace
    BlankTitle,
    /// Owner id not present in the user set
    UnknownOwner(UserId),
}

/// A todo record rejected by [`validate_records`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rejected {
    /// The offending todo
    pub id: TodoId,
    /// Why it was rejected
    pub reason: RejectReason,
}

/// Outcome of [`validate_records`]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordReport {
    /// Records that passed
    pub valid: Vec<Todo>,
    /// Records that failed, in input order
    pub rejected: Vec<Rejected>,
}

/// Checks todo records for a non-blank title and a known owner
#[must_use]
pub fn validate_records(todos: &[Todo], users: &UserDirectory) -> RecordReport {
    let mut report = RecordReport::default();

    for todo in todos {
        let reason = if todo.title.trim().is_empty() {
            Some(RejectReason::BlankTitle)
        } else if users.get(todo.owner_id).is_none() {
            Some(RejectReason::UnknownOwner(todo.owner_id))
        } else {
            None
        };

        match reason {
            Some(reason) => {
                tracing::warn!(todo_id = %todo.id, ?reason, "Rejected todo record");
                report.rejected.push(Rejected { id: todo.id, reason });
            },
            None => report.valid.push(todo.clone()),
        }
    }

    report
}

/// Knobs for [`group_with_options`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GroupingOptions {
    /// Only group todos owned by this user
    pub owner: Option<UserId>,
    /// Drop records rejected by [`validate_records`] before grouping
    pub drop_invalid: bool,
}

/// Groups todos with an optional owner filter and validation pass
#[must_use]
pub fn group_with_options(
    todos: &[Todo],
    users: &UserDirectory,
    options: GroupingOptions,
) -> Vec<Section> {
    if options.drop_invalid {
        let report = validate_records(todos, users);
        group_todos_for_owner(&report.valid, users, options.owner)
    } else {
        group_todos_for_owner(todos, users, options.owner)
    }
}
