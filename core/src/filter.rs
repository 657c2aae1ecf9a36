//! Status filter layer.
//!
//! Derives read-only views over a section collection. Nothing here mutates
//! the base sections.

use crate::model::{Section, Todo};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Completion-status filter
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterType {
    /// Every todo
    #[default]
    All,
    /// Completed todos
    Done,
    /// Open todos
    UnDone,
}

impl FilterType {
    /// All filters in display order
    pub const ALL: [Self; 3] = [Self::All, Self::Done, Self::UnDone];

    /// Returns `true` if a todo with this completion flag passes
    #[must_use]
    pub const fn matches(self, completed: bool) -> bool {
        match self {
            Self::All => true,
            Self::Done => completed,
            Self::UnDone => !completed,
        }
    }

    /// Returns `true` if the todo passes
    #[must_use]
    pub const fn accepts(self, todo: &Todo) -> bool {
        self.matches(todo.completed)
    }

    /// Display name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Done => "Done",
            Self::UnDone => "UnDone",
        }
    }
}

impl fmt::Display for FilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized filter name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown filter: {0:?} (expected All, Done or UnDone)")]
pub struct ParseFilterError(String);

impl FromStr for FilterType {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseFilterError(s.to_string()))
    }
}

/// What to do with sections left without matching todos
///
/// Under `Done`/`UnDone` such sections are always dropped. The policy only
/// decides the `All` case, which can only see an empty section if one was
/// left over transiently.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmptySectionPolicy {
    /// `All` returns every section unchanged
    #[default]
    KeepUnderAll,
    /// `All` drops empty sections as well
    DropAlways,
}

/// Filters each section's todos by status using [`EmptySectionPolicy::KeepUnderAll`]
#[must_use]
pub fn filter_sections(sections: &[Section], filter: FilterType) -> Vec<Section> {
    filter_sections_with(sections, filter, EmptySectionPolicy::default())
}

/// Filters each section's todos by status with an explicit empty-section policy
#[must_use]
pub fn filter_sections_with(
    sections: &[Section],
    filter: FilterType,
    policy: EmptySectionPolicy,
) -> Vec<Section> {
    if filter == FilterType::All {
        return match policy {
            EmptySectionPolicy::KeepUnderAll => sections.to_vec(),
            EmptySectionPolicy::DropAlways => {
                sections.iter().filter(|s| !s.is_empty()).cloned().collect()
            },
        };
    }

    sections
        .iter()
        .filter_map(|section| {
            let items: Vec<Todo> = section
                .items
                .iter()
                .filter(|t| filter.accepts(t))
                .cloned()
                .collect();
            (!items.is_empty()).then(|| Section {
                title: section.title.clone(),
                items,
                expanded: section.expanded,
            })
        })
        .collect()
}

/// Counts todos across all sections that pass the filter
#[must_use]
pub fn filter_count(sections: &[Section], filter: FilterType) -> usize {
    sections
        .iter()
        .flat_map(|s| s.items.iter())
        .filter(|t| filter.accepts(t))
        .count()
}
