//! Pipeline integration tests.
//!
//! Drive the full classify, normalize, accumulate, and write path with the
//! mock client.

use jupiterone_cli::client::MockQueryClient;
use jupiterone_cli::error::J1Error;
use jupiterone_cli::output::OutputFormat;
use jupiterone_cli::pipeline::{fetch_table, run, QueryRequest};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn relationship_response() -> Value {
    json!({
        "data": [
            {
                "s": {"id": "s1", "entity": {"_id": "s1", "_type": "user"}, "properties": {"displayName": "alice"}},
                "r": {"id": "r1", "relationship": {"_id": "r1", "_class": "ASSIGNED"}},
                "t": {"id": "t1", "entity": {"_id": "t1", "_type": "role"}, "properties": {"displayName": "admin"}}
            },
            {
                "s": {"id": "s2", "entity": {"_id": "s2", "_type": "user"}, "properties": {"displayName": "bob", "mfa": true}},
                "r": {"id": "r2", "relationship": {"_id": "r2", "_class": "ASSIGNED"}},
                "t": {"id": "t2", "entity": {"_id": "t2", "_type": "role"}, "properties": {}}
            }
        ]
    })
}

#[tokio::test]
async fn test_aliased_columns_are_prefixed_by_alias() {
    let client = MockQueryClient::new(relationship_response());
    let request = QueryRequest::new("FIND user AS s THAT ASSIGNED AS r role AS t RETURN s, r, t");
    let table = fetch_table(&client, &request).await.unwrap();

    assert_eq!(table.len(), 2);
    assert_eq!(
        table.columns(),
        &[
            "s._id",
            "s._type",
            "s.displayName",
            "r._id",
            "r._class",
            "t._id",
            "t._type",
            "t.displayName",
            "s.mfa"
        ]
    );
    for column in table.columns() {
        let (alias, suffix) = column.split_once('.').unwrap();
        assert!(["s", "r", "t"].contains(&alias));
        assert!(!suffix.is_empty());
    }
}

#[tokio::test]
async fn test_sparse_rows_render_as_empty_csv_cells() {
    let client = MockQueryClient::new(relationship_response());
    let request = QueryRequest::new("FIND user AS s THAT ASSIGNED AS r role AS t RETURN s, r, t");
    let mut out = Vec::new();

    run(&client, &request, &mut out).await.unwrap();

    let csv = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines,
        vec![
            "s._id,s._type,s.displayName,r._id,r._class,t._id,t._type,t.displayName,s.mfa",
            "s1,user,alice,r1,ASSIGNED,t1,role,admin,",
            "s2,user,bob,r2,ASSIGNED,t2,role,,true",
        ]
    );
}

#[tokio::test]
async fn test_selected_fields_json_lines() {
    let client = MockQueryClient::new(json!({
        "data": [
            {"s.displayName": "alice", "t.displayName": "admin"},
            {"s.displayName": "bob", "t.displayName": null}
        ]
    }));
    let request =
        QueryRequest::new("FIND user AS s THAT ASSIGNED role AS t RETURN s.displayName, t.displayName")
            .with_format(OutputFormat::Json);
    let mut out = Vec::new();

    let rows = run(&client, &request, &mut out).await.unwrap();

    assert_eq!(rows, 2);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "{\"s.displayName\":\"alice\",\"t.displayName\":\"admin\"}\n{\"s.displayName\":\"bob\",\"t.displayName\":null}\n"
    );
}

#[tokio::test]
async fn test_tree_response_for_any_query_text() {
    for query in ["FIND * RETURN TREE", "", "FIND Host AS h RETURN TREE LIMIT 5"] {
        let client = MockQueryClient::new(json!({"vertices": [{"id": "v1"}], "edges": []}));
        let mut out = Vec::new();

        let err = run(&client, &QueryRequest::new(query), &mut out).await.unwrap_err();

        assert!(matches!(err, J1Error::TreeQuery));
        assert_eq!(err.to_string(), "TREE queries are not currently supported by this CLI");
        assert!(out.is_empty());
    }
}

#[tokio::test]
async fn test_empty_result_writes_nothing() {
    let client = MockQueryClient::new(json!({"data": []}));
    let mut out = Vec::new();

    let rows = run(&client, &QueryRequest::new("FIND Nothing"), &mut out).await.unwrap();

    assert_eq!(rows, 0);
    assert!(out.is_empty());
}
