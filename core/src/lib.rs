//! Core of a to-do list kept in a hosted `todos` table.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values for the
//! table's REST endpoint without touching the network (host-does-IO
//! pattern). `RemoteTodoStore` pairs that with a host-supplied `Transport`,
//! and `ListController` keeps an in-memory copy of the list in step with
//! the table as the user adds, edits and deletes items.
//!
//! # Design
//! - `TodosTable` is stateless: endpoint and key only.
//! - Each operation is split into `build_*` and `parse_*`, so the I/O
//!   boundary is explicit and testable with canned responses.
//! - `TodoStore` is the seam between the controller and the remote table.
//! - Failures never escape the controller; they go to a `Notifier`.
//! - Row types are defined independently from the mock-server crate;
//!   integration tests catch schema drift.

pub mod client;
pub mod controller;
pub mod error;
pub mod http;
pub mod notify;
pub mod store;
pub mod types;

pub use client::TodosTable;
pub use controller::{EditMode, ListController, ListState};
pub use error::RemoteError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use notify::{LogNotifier, Notifier, Operation};
pub use store::{RemoteTodoStore, TodoStore};
pub use types::{is_meaningful, NewTodo, TitlePatch, Todo, TodoId};
