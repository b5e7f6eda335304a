//! Where remote failures go.
//!
//! The controller never surfaces a failure to the user directly; it reports
//! it to a `Notifier` and leaves its state untouched. `LogNotifier` writes a
//! diagnostic event and nothing else. A front end that wants visible error
//! messages supplies its own notifier without touching the control flow.

use std::fmt;

use tracing::error;

use crate::error::RemoteError;

/// Which remote call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Insert,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::List => "list",
            Operation::Insert => "insert",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub trait Notifier {
    fn remote_failure(&self, operation: Operation, error: &RemoteError);
}

/// Logs every failure at error level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn remote_failure(&self, operation: Operation, error: &RemoteError) {
        error!(operation = %operation, error = %error, "remote store call failed");
    }
}
