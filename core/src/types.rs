//! Row types for the hosted `todos` table.
//!
//! # Design
//! `Todo` is strict: every column is required and typed, so a row the
//! service returns in an unexpected shape fails to decode instead of leaking
//! half-filled values into the list. The mock-server crate defines its own
//! copy of the row; integration tests catch schema drift between the two.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Server-assigned identifier of a todo row. Opaque to this crate apart from
/// being compared for equality and printed into filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(pub Uuid);

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TodoId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(TodoId)
    }
}

/// One row of the `todos` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Insert payload. New rows always start incomplete.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewTodo {
    pub title: String,
    pub is_completed: bool,
}

impl NewTodo {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            is_completed: false,
        }
    }
}

/// Update payload. Only the title is ever changed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TitlePatch {
    pub title: String,
}

/// True when `text` contains something other than whitespace.
pub fn is_meaningful(text: &str) -> bool {
    !text.trim().is_empty()
}
