//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results. Comparing parsed JSON (not raw strings) avoids
//! false negatives from field-ordering differences.

use todolist_core::{
    HttpMethod, HttpRequest, HttpResponse, NewTodo, RemoteError, TitlePatch, Todo, TodoId, TodosTable,
};

const BASE_URL: &str = "http://localhost:3000";

fn table() -> TodosTable {
    TodosTable::new(BASE_URL, "anon-key")
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PATCH" => HttpMethod::Patch,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

/// Compare a built request against the `expected_request` block.
fn assert_request(name: &str, req: &HttpRequest, expected: &serde_json::Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.path, format!("{BASE_URL}{}", expected["path"].as_str().unwrap()), "{name}: path");

    let expected_headers: Vec<(String, String)> = expected["headers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|h| {
            let arr = h.as_array().unwrap();
            (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
        })
        .collect();
    assert_eq!(req.headers, expected_headers, "{name}: headers");

    match expected.get("body") {
        Some(body) => {
            let req_body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
            assert_eq!(&req_body, body, "{name}: body");
        }
        None => assert!(req.body.is_none(), "{name}: body should be None"),
    }
}

fn simulated_response(case: &serde_json::Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

fn assert_error(name: &str, expected: &str, err: RemoteError) {
    match expected {
        "Rejected" => assert!(matches!(err, RemoteError::Rejected { .. }), "{name}: expected Rejected, got {err:?}"),
        "UnexpectedResponse" => assert!(
            matches!(err, RemoteError::UnexpectedResponse(_)),
            "{name}: expected UnexpectedResponse, got {err:?}"
        ),
        other => panic!("{name}: unknown expected_error: {other}"),
    }
}

fn load(raw: &str) -> Vec<serde_json::Value> {
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();
    vectors["cases"].as_array().unwrap().clone()
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[test]
fn list_test_vectors() {
    let t = table();
    for case in load(include_str!("../../test-vectors/list.json")) {
        let name = case["name"].as_str().unwrap();

        assert_request(name, &t.build_list_all_ordered(), &case["expected_request"]);

        let result = t.parse_list_all_ordered(simulated_response(&case));
        if let Some(expected_error) = case.get("expected_error") {
            assert_error(name, expected_error.as_str().unwrap(), result.unwrap_err());
        } else {
            let expected: Vec<Todo> = serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(result.unwrap(), expected, "{name}: parsed result");
        }
    }
}

// ---------------------------------------------------------------------------
// Insert
// ---------------------------------------------------------------------------

#[test]
fn insert_test_vectors() {
    let t = table();
    for case in load(include_str!("../../test-vectors/insert.json")) {
        let name = case["name"].as_str().unwrap();
        let input = NewTodo::new(case["input_title"].as_str().unwrap());

        assert_request(name, &t.build_insert_one(&input).unwrap(), &case["expected_request"]);

        let result = t.parse_insert_one(simulated_response(&case));
        if let Some(expected_error) = case.get("expected_error") {
            assert_error(name, expected_error.as_str().unwrap(), result.unwrap_err());
        } else {
            let expected: Todo = serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(result.unwrap(), expected, "{name}: parsed result");
        }
    }
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[test]
fn update_test_vectors() {
    let t = table();
    for case in load(include_str!("../../test-vectors/update.json")) {
        let name = case["name"].as_str().unwrap();
        let id: TodoId = case["input_id"].as_str().unwrap().parse().unwrap();
        let patch = TitlePatch {
            title: case["input_title"].as_str().unwrap().to_string(),
        };

        assert_request(name, &t.build_update_one_by_id(id, &patch).unwrap(), &case["expected_request"]);

        let result = t.parse_update_one_by_id(simulated_response(&case));
        if let Some(expected_error) = case.get("expected_error") {
            assert_error(name, expected_error.as_str().unwrap(), result.unwrap_err());
        } else {
            assert!(result.is_ok(), "{name}: expected success");
        }
    }
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[test]
fn delete_test_vectors() {
    let t = table();
    for case in load(include_str!("../../test-vectors/delete.json")) {
        let name = case["name"].as_str().unwrap();
        let id: TodoId = case["input_id"].as_str().unwrap().parse().unwrap();

        assert_request(name, &t.build_delete_one_by_id(id), &case["expected_request"]);

        let result = t.parse_delete_one_by_id(simulated_response(&case));
        if let Some(expected_error) = case.get("expected_error") {
            assert_error(name, expected_error.as_str().unwrap(), result.unwrap_err());
        } else {
            assert!(result.is_ok(), "{name}: expected success");
        }
    }
}
