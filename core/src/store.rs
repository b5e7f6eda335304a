//! The remote store contract and its HTTP-backed implementation.
//!
//! # Design
//! `TodoStore` is the seam the controller depends on. `RemoteTodoStore`
//! pairs the stateless `TodosTable` with whatever `Transport` the host
//! provides. Each operation is exactly one round trip: no retry, no timeout,
//! no batching.

use async_trait::async_trait;
use tracing::debug;

use crate::client::TodosTable;
use crate::error::RemoteError;
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::types::{NewTodo, TitlePatch, Todo, TodoId};

/// The four operations the list needs from the hosted table.
///
/// Callers must not pass empty or whitespace-only titles; implementations
/// do not check.
#[async_trait(?Send)]
pub trait TodoStore {
    /// Every row, newest `created_at` first.
    async fn list_all_ordered(&self) -> Result<Vec<Todo>, RemoteError>;

    /// Create one incomplete row and return it as stored.
    async fn insert_one(&self, title: &str) -> Result<Todo, RemoteError>;

    /// Set the title of the row with `id`. Success does not imply a row matched.
    async fn update_one_by_id(&self, id: TodoId, title: &str) -> Result<(), RemoteError>;

    /// Remove the row with `id`. Removing an absent id is not an error.
    async fn delete_one_by_id(&self, id: TodoId) -> Result<(), RemoteError>;
}

/// `TodoStore` backed by the hosted REST endpoint.
#[derive(Debug, Clone)]
pub struct RemoteTodoStore<T> {
    table: TodosTable,
    transport: T,
}

impl<T: Transport> RemoteTodoStore<T> {
    pub fn new(table: TodosTable, transport: T) -> Self {
        Self { table, transport }
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, RemoteError> {
        debug!(method = request.method.as_str(), path = %request.path, "sending request");
        let response = self.transport.execute(request).await?;
        debug!(status = response.status, "received response");
        Ok(response)
    }
}

#[async_trait(?Send)]
impl<T: Transport> TodoStore for RemoteTodoStore<T> {
    async fn list_all_ordered(&self) -> Result<Vec<Todo>, RemoteError> {
        let response = self.send(self.table.build_list_all_ordered()).await?;
        self.table.parse_list_all_ordered(response)
    }

    async fn insert_one(&self, title: &str) -> Result<Todo, RemoteError> {
        let request = self.table.build_insert_one(&NewTodo::new(title))?;
        let response = self.send(request).await?;
        self.table.parse_insert_one(response)
    }

    async fn update_one_by_id(&self, id: TodoId, title: &str) -> Result<(), RemoteError> {
        let patch = TitlePatch {
            title: title.to_string(),
        };
        let request = self.table.build_update_one_by_id(id, &patch)?;
        let response = self.send(request).await?;
        self.table.parse_update_one_by_id(response)
    }

    async fn delete_one_by_id(&self, id: TodoId) -> Result<(), RemoteError> {
        let response = self.send(self.table.build_delete_one_by_id(id)).await?;
        self.table.parse_delete_one_by_id(response)
    }
}
