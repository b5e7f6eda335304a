//! Stateless request builder and response parser for the hosted `todos` table.
//!
//! # Design
//! `TodosTable` holds only the endpoint and key and carries no mutable state
//! between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. The requests follow the PostgREST dialect the hosted
//! service exposes under `/rest/v1`.

use serde::Deserialize;
use tracing::warn;

use crate::error::RemoteError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{NewTodo, TitlePatch, Todo, TodoId};

const TABLE: &str = "todos";

/// Request builder and response parser for the `todos` table.
#[derive(Debug, Clone)]
pub struct TodosTable {
    base_url: String,
    api_key: String,
}

/// Error object the hosted service returns alongside non-2xx statuses.
#[derive(Deserialize)]
struct ServiceError {
    message: String,
}

impl TodosTable {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{TABLE}", self.base_url)
    }

    fn auth_headers(&self) -> Vec<(String, String)> {
        vec![
            ("apikey".to_string(), self.api_key.clone()),
            ("authorization".to_string(), format!("Bearer {}", self.api_key)),
        ]
    }

    fn json_headers(&self, prefer: &str) -> Vec<(String, String)> {
        let mut headers = self.auth_headers();
        headers.push(("content-type".to_string(), "application/json".to_string()));
        headers.push(("prefer".to_string(), prefer.to_string()));
        headers
    }

    /// Every row, newest first.
    pub fn build_list_all_ordered(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}?select=*&order=created_at.desc", self.table_url()),
            headers: self.auth_headers(),
            body: None,
        }
    }

    /// Insert one row and ask for it back.
    pub fn build_insert_one(&self, input: &NewTodo) -> Result<HttpRequest, RemoteError> {
        let body = serde_json::to_string(&[input]).map_err(|e| RemoteError::Encode(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}?select=*", self.table_url()),
            headers: self.json_headers("return=representation"),
            body: Some(body),
        })
    }

    pub fn build_update_one_by_id(&self, id: TodoId, input: &TitlePatch) -> Result<HttpRequest, RemoteError> {
        let body = serde_json::to_string(input).map_err(|e| RemoteError::Encode(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Patch,
            path: format!("{}?id=eq.{id}", self.table_url()),
            headers: self.json_headers("return=minimal"),
            body: Some(body),
        })
    }

    pub fn build_delete_one_by_id(&self, id: TodoId) -> HttpRequest {
        let mut headers = self.auth_headers();
        headers.push(("prefer".to_string(), "return=minimal".to_string()));
        HttpRequest {
            method: HttpMethod::Delete,
            path: format!("{}?id=eq.{id}", self.table_url()),
            headers,
            body: None,
        }
    }

    /// Decode a list response. Rows that do not match the table schema are
    /// dropped with a warning; the remaining rows keep the server's order.
    pub fn parse_list_all_ordered(&self, response: HttpResponse) -> Result<Vec<Todo>, RemoteError> {
        check_status(&response)?;
        decode_rows(&response.body)
    }

    /// Decode an insert response into the created row.
    pub fn parse_insert_one(&self, response: HttpResponse) -> Result<Todo, RemoteError> {
        check_status(&response)?;
        decode_rows(&response.body)?
            .into_iter()
            .next()
            .ok_or_else(|| RemoteError::UnexpectedResponse("insert returned no rows".to_string()))
    }

    /// Success means the service accepted the request. Whether a row matched
    /// the id is not checked: with `return=minimal` the service does not say.
    pub fn parse_update_one_by_id(&self, response: HttpResponse) -> Result<(), RemoteError> {
        check_status(&response)
    }

    /// Deleting an id that is already gone is still a success.
    pub fn parse_delete_one_by_id(&self, response: HttpResponse) -> Result<(), RemoteError> {
        check_status(&response)
    }
}

/// Map non-2xx statuses to `RemoteError::Rejected`, preferring the service's
/// own error message over the raw body.
fn check_status(response: &HttpResponse) -> Result<(), RemoteError> {
    if response.is_success() {
        return Ok(());
    }
    let message = serde_json::from_str::<ServiceError>(&response.body)
        .map(|e| e.message)
        .unwrap_or_else(|_| response.body.clone());
    Err(RemoteError::Rejected {
        status: response.status,
        message,
    })
}

fn decode_rows(body: &str) -> Result<Vec<Todo>, RemoteError> {
    let rows: Vec<serde_json::Value> =
        serde_json::from_str(body).map_err(|e| RemoteError::Decode(e.to_string()))?;
    let mut todos = Vec::with_capacity(rows.len());
    for (index, row) in rows.into_iter().enumerate() {
        match serde_json::from_value::<Todo>(row) {
            Ok(todo) => todos.push(todo),
            Err(e) => warn!(index, error = %e, "skipping malformed todo row"),
        }
    }
    Ok(todos)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROW: &str = r#"{"id":"00000000-0000-0000-0000-000000000001","title":"Test","is_completed":false,"created_at":"2024-05-01T10:15:30+00:00"}"#;

    fn table() -> TodosTable {
        TodosTable::new("http://localhost:3000", "anon-key")
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn build_list_orders_newest_first() {
        let req = table().build_list_all_ordered();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(
            req.path,
            "http://localhost:3000/rest/v1/todos?select=*&order=created_at.desc"
        );
        assert!(req.body.is_none());
        assert_eq!(req.header("apikey"), Some("anon-key"));
        assert_eq!(req.header("Authorization"), Some("Bearer anon-key"));
    }

    #[test]
    fn build_insert_sends_single_row_array() {
        let req = table().build_insert_one(&NewTodo::new("Buy milk")).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:3000/rest/v1/todos?select=*");
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.header("prefer"), Some("return=representation"));
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!([{"title": "Buy milk", "is_completed": false}]));
    }

    #[test]
    fn build_update_filters_by_id() {
        let id = TodoId(uuid::Uuid::nil());
        let patch = TitlePatch {
            title: "Updated".to_string(),
        };
        let req = table().build_update_one_by_id(id, &patch).unwrap();
        assert_eq!(req.method, HttpMethod::Patch);
        assert_eq!(
            req.path,
            "http://localhost:3000/rest/v1/todos?id=eq.00000000-0000-0000-0000-000000000000"
        );
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"title": "Updated"}));
    }

    #[test]
    fn build_delete_filters_by_id() {
        let req = table().build_delete_one_by_id(TodoId(uuid::Uuid::nil()));
        assert_eq!(req.method, HttpMethod::Delete);
        assert!(req.path.ends_with("?id=eq.00000000-0000-0000-0000-000000000000"));
        assert!(req.body.is_none());
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let req = TodosTable::new("http://localhost:3000/", "k").build_list_all_ordered();
        assert!(req.path.starts_with("http://localhost:3000/rest/v1/todos?"));
    }

    #[test]
    fn parse_list_success() {
        let todos = table()
            .parse_list_all_ordered(response(200, &format!("[{ROW}]")))
            .unwrap();
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].title, "Test");
    }

    #[test]
    fn parse_list_drops_rows_missing_columns() {
        let body = format!(r#"[{ROW},{{"id":"00000000-0000-0000-0000-000000000002","title":"no timestamp","is_completed":false}}]"#);
        let todos = table().parse_list_all_ordered(response(200, &body)).unwrap();
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].title, "Test");
    }

    #[test]
    fn parse_list_bad_json() {
        let err = table().parse_list_all_ordered(response(200, "not json")).unwrap_err();
        assert!(matches!(err, RemoteError::Decode(_)));
    }

    #[test]
    fn parse_insert_takes_first_row() {
        let todo = table().parse_insert_one(response(201, &format!("[{ROW}]"))).unwrap();
        assert_eq!(todo.title, "Test");
        assert!(!todo.is_completed);
    }

    #[test]
    fn parse_insert_empty_array_is_unexpected() {
        let err = table().parse_insert_one(response(201, "[]")).unwrap_err();
        assert!(matches!(err, RemoteError::UnexpectedResponse(_)));
    }

    #[test]
    fn rejected_status_carries_service_message() {
        let body = r#"{"code":"42501","message":"permission denied for table todos","details":null,"hint":null}"#;
        let err = table().parse_insert_one(response(403, body)).unwrap_err();
        match err {
            RemoteError::Rejected { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "permission denied for table todos");
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[test]
    fn rejected_status_falls_back_to_raw_body() {
        let err = table().parse_delete_one_by_id(response(502, "bad gateway")).unwrap_err();
        assert!(matches!(err, RemoteError::Rejected { status: 502, ref message } if message == "bad gateway"));
    }

    #[test]
    fn update_and_delete_accept_any_2xx() {
        assert!(table().parse_update_one_by_id(response(204, "")).is_ok());
        assert!(table().parse_update_one_by_id(response(200, "[]")).is_ok());
        assert!(table().parse_delete_one_by_id(response(204, "")).is_ok());
    }
}
