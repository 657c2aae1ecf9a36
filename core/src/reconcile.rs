//! Reconciliation: patching sections after a successful remote write.
//!
//! Each helper takes the current collection and returns a new one. Callers
//! swap the result in as a whole; the input is never modified.

use crate::model::{Section, Todo, TodoId};

/// Appends a todo to the section titled `username`, or pushes a new trailing
/// expanded section for it.
#[must_use]
pub fn append_todo(sections: &[Section], todo: Todo, username: &str) -> Vec<Section> {
    let mut next = sections.to_vec();
    match next.iter_mut().find(|s| s.title == username) {
        Some(section) => section.items.push(todo),
        None => next.push(Section::new(username, vec![todo])),
    }
    next
}

/// Removes the todo from whichever section holds it. A section left without
/// todos is removed as well.
#[must_use]
pub fn remove_todo(sections: &[Section], id: TodoId) -> Vec<Section> {
    sections
        .iter()
        .filter_map(|section| {
            if !section.contains(id) {
                return Some(section.clone());
            }
            let items: Vec<Todo> = section.items.iter().filter(|t| t.id != id).cloned().collect();
            (!items.is_empty()).then(|| Section {
                title: section.title.clone(),
                items,
                expanded: section.expanded,
            })
        })
        .collect()
}

/// Sets the completion flag of one todo, leaving section membership and every
/// other todo untouched.
#[must_use]
pub fn set_completed(sections: &[Section], id: TodoId, completed: bool) -> Vec<Section> {
    let mut next = sections.to_vec();
    if let Some(todo) = next
        .iter_mut()
        .flat_map(|s| s.items.iter_mut())
        .find(|t| t.id == id)
    {
        todo.completed = completed;
    }
    next
}

/// Flips the expanded flag of the section titled `title`
#[must_use]
pub fn toggle_expanded(sections: &[Section], title: &str) -> Vec<Section> {
    sections
        .iter()
        .map(|section| {
            if section.title == title {
                Section {
                    expanded: !section.expanded,
                    ..section.clone()
                }
            } else {
                section.clone()
            }
        })
        .collect()
}

/// Finds a todo and the title of the section holding it
#[must_use]
pub fn find_todo(sections: &[Section], id: TodoId) -> Option<(&str, &Todo)> {
    sections
        .iter()
        .find_map(|s| s.get(id).map(|t| (s.title.as_str(), t)))
}
