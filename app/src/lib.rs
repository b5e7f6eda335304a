//! Terminal front end for the hosted to-do list.
//!
//! # Overview
//! Wires a `ListController` to a `RemoteTodoStore` over ureq, renders the
//! list as text and turns typed lines into controller actions. Everything
//! runs on one thread; remote calls run as local tasks so input stays live.

pub mod command;
pub mod config;
pub mod logging;
pub mod session;
pub mod transport;
pub mod view;

pub use config::{ConfigError, StoreConfig};
pub use session::Screen;
pub use transport::UreqTransport;
