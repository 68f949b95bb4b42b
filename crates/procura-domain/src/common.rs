//! Shared traits and presentation enums for procurement records.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Exposes a stable identifier for records fetched from the backing store.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Provides read-only access to a record's display name.
pub trait NamedEntity {
    fn name(&self) -> &str;
}

/// Converts a record into a user-facing display label.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Coarse workflow bucket used to group request statuses on boards and lists.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum StatusGroup {
    #[default]
    ToDo,
    InProgress,
    Done,
}

impl StatusGroup {
    pub const ALL: [StatusGroup; 3] = [
        StatusGroup::ToDo,
        StatusGroup::InProgress,
        StatusGroup::Done,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            StatusGroup::ToDo => "To Do",
            StatusGroup::InProgress => "In Progress",
            StatusGroup::Done => "Done",
        }
    }
}

impl fmt::Display for StatusGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// Re-export common dependencies so consumers can rely on this module as a façade.
pub use chrono;
pub use serde;
pub use uuid;
