//! In-process stand-in for the hosted `todos` table.
//!
//! Serves the slice of the PostgREST dialect the client uses under
//! `/rest/v1/todos`: ordered select, single-row insert with
//! `return=representation`, and `id=eq.<uuid>` filtered update and delete.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, Request, State},
    http::{HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Todo {
    pub id: Uuid,
    pub title: String,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct NewRow {
    pub title: String,
    #[serde(default)]
    pub is_completed: bool,
}

/// PostgREST accepts a single object or an array of objects on insert.
#[derive(Deserialize)]
#[serde(untagged)]
enum InsertBody {
    Many(Vec<NewRow>),
    One(NewRow),
}

#[derive(Deserialize)]
pub struct RowPatch {
    pub title: Option<String>,
    pub is_completed: Option<bool>,
}

/// Query string parameters the table understands. Unknown ones are ignored.
#[derive(Deserialize, Default)]
pub struct TableQuery {
    pub order: Option<String>,
    pub id: Option<String>,
}

/// Rows in insertion order.
pub type Db = Arc<RwLock<Vec<Todo>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Vec::new()));
    Router::new()
        .route(
            "/rest/v1/todos",
            get(select_rows).post(insert_rows).patch(update_rows).delete(delete_rows),
        )
        .layer(middleware::from_fn(require_api_key))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Error in the shape the hosted service returns.
#[derive(Debug)]
pub struct ServiceError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ServiceError {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "code": self.code,
            "message": self.message,
            "details": null,
            "hint": null,
        });
        (self.status, Json(body)).into_response()
    }
}

async fn require_api_key(request: Request, next: Next) -> Response {
    if request.headers().get("apikey").is_none() {
        return ServiceError::new(StatusCode::UNAUTHORIZED, "PGRST301", "No API key found in request").into_response();
    }
    next.run(request).await
}

fn wants_representation(headers: &HeaderMap) -> bool {
    headers
        .get("prefer")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.split(',').any(|p| p.trim() == "return=representation"))
}

/// Parse an `id=eq.<uuid>` filter. Update and delete refuse to run unfiltered.
fn id_filter(query: &TableQuery) -> Result<Uuid, ServiceError> {
    let Some(raw) = query.id.as_deref() else {
        return Err(ServiceError::new(
            StatusCode::BAD_REQUEST,
            "21000",
            "UPDATE and DELETE require a WHERE clause",
        ));
    };
    raw.strip_prefix("eq.")
        .and_then(|v| Uuid::parse_str(v).ok())
        .ok_or_else(|| {
            ServiceError::new(
                StatusCode::BAD_REQUEST,
                "22P02",
                format!("invalid input syntax for type uuid: \"{raw}\""),
            )
        })
}

fn ordered(rows: &[Todo], order: Option<&str>) -> Result<Vec<Todo>, ServiceError> {
    let mut rows = rows.to_vec();
    match order {
        None => {}
        Some("created_at.desc") => {
            rows.reverse();
            rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        }
        Some("created_at.asc") | Some("created_at") => {
            rows.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        }
        Some(other) => {
            return Err(ServiceError::new(
                StatusCode::BAD_REQUEST,
                "PGRST100",
                format!("unsupported order \"{other}\""),
            ))
        }
    }
    Ok(rows)
}

async fn select_rows(
    State(db): State<Db>,
    Query(query): Query<TableQuery>,
) -> Result<Json<Vec<Todo>>, ServiceError> {
    let rows = db.read().await;
    ordered(&rows, query.order.as_deref()).map(Json)
}

async fn insert_rows(State(db): State<Db>, headers: HeaderMap, body: Bytes) -> Response {
    let input = match serde_json::from_slice::<InsertBody>(&body) {
        Ok(InsertBody::Many(rows)) => rows,
        Ok(InsertBody::One(row)) => vec![row],
        Err(e) => return ServiceError::new(StatusCode::BAD_REQUEST, "PGRST102", e.to_string()).into_response(),
    };

    let created: Vec<Todo> = input
        .into_iter()
        .map(|row| Todo {
            id: Uuid::new_v4(),
            title: row.title,
            is_completed: row.is_completed,
            created_at: Utc::now(),
        })
        .collect();
    debug!(count = created.len(), "inserted rows");
    db.write().await.extend(created.iter().cloned());

    if wants_representation(&headers) {
        (StatusCode::CREATED, Json(created)).into_response()
    } else {
        StatusCode::CREATED.into_response()
    }
}

async fn update_rows(
    State(db): State<Db>,
    Query(query): Query<TableQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let id = match id_filter(&query) {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };
    let patch = match serde_json::from_slice::<RowPatch>(&body) {
        Ok(patch) => patch,
        Err(e) => return ServiceError::new(StatusCode::BAD_REQUEST, "PGRST102", e.to_string()).into_response(),
    };

    let mut rows = db.write().await;
    let mut updated = Vec::new();
    for row in rows.iter_mut().filter(|row| row.id == id) {
        if let Some(title) = &patch.title {
            row.title = title.clone();
        }
        if let Some(is_completed) = patch.is_completed {
            row.is_completed = is_completed;
        }
        updated.push(row.clone());
    }
    debug!(%id, matched = updated.len(), "updated rows");

    if wants_representation(&headers) {
        Json(updated).into_response()
    } else {
        StatusCode::NO_CONTENT.into_response()
    }
}

async fn delete_rows(State(db): State<Db>, Query(query): Query<TableQuery>, headers: HeaderMap) -> Response {
    let id = match id_filter(&query) {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };

    let mut rows = db.write().await;
    let (removed, kept): (Vec<Todo>, Vec<Todo>) = rows.drain(..).partition(|row| row.id == id);
    *rows = kept;
    debug!(%id, matched = removed.len(), "deleted rows");

    if wants_representation(&headers) {
        Json(removed).into_response()
    } else {
        StatusCode::NO_CONTENT.into_response()
    }
}
