//! Output rendering tests against a mock search server
mod common;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{lastic_with_env, search_response, MockEnvironment, COLOR};

async fn search_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/i/_search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_response()))
        .mount(&server)
        .await;
    server
}

// ============================================================================
// Raw / default / table
// ============================================================================

#[tokio::test]
async fn test_raw_output_is_pretty_json() {
    let server = search_server().await;
    let env = MockEnvironment::new().with_host(&server.address().to_string());

    let r = lastic_with_env(&["get", "-p", "/i/_search", "-o", "raw"], &env);

    assert!(r.success(), "stderr: {}", r.stderr);
    let expected = serde_json::to_string_pretty(&search_response()).unwrap();
    assert_eq!(r.stdout, format!("{}\n", expected));
    assert!(r.stdout.contains("\n  \"took\": 5,"));
}

#[tokio::test]
async fn test_default_output() {
    let server = search_server().await;
    let env = MockEnvironment::new().with_host(&server.address().to_string());

    let r = lastic_with_env(&["get", "-p", "/i/_search"], &env);

    assert!(r.success(), "stderr: {}", r.stderr);
    assert_eq!(
        r.lines(),
        vec![
            "2 results in 5 milliseconds with a max score of 1",
            "_id:1, _score:1",
            r#"{"name":"a"}"#,
        ]
    );
    assert!(!r.stdout.contains(COLOR));
}

#[tokio::test]
async fn test_table_output() {
    let server = search_server().await;
    let env = MockEnvironment::new().with_host(&server.address().to_string());

    let r = lastic_with_env(&["get", "-p", "/i/_search", "-o", "table", "-c", "name"], &env);

    assert!(r.success(), "stderr: {}", r.stderr);
    assert_eq!(r.lines()[0], "2 results in 5 milliseconds with a max score of 1");
    assert_eq!(r.table_rows(), vec![vec!["name".to_string()], vec!["a".to_string()]]);
}

#[tokio::test]
async fn test_table_output_defaults_to_id() {
    let server = search_server().await;
    let env = MockEnvironment::new().with_host(&server.address().to_string());

    let r = lastic_with_env(&["get", "-p", "/i/_search", "-o", "table"], &env);

    assert!(r.success(), "stderr: {}", r.stderr);
    assert_eq!(r.table_rows(), vec![vec!["_id".to_string()], vec!["1".to_string()]]);
}

#[tokio::test]
async fn test_table_with_several_hits() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/people/_search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "took": 3,
            "hits": {"total": 3, "max_score": 2.0, "hits": [
                {"_id": "a1", "_score": 2.0, "_source": {"user": {"name": "Alice"}, "age": 30}},
                {"_id": "b2", "_score": 1.5, "_source": {"user": {"name": "Bob"}}},
                {"_id": "c3", "_score": 1.0, "_source": {"user": {"name": "Cleo"}, "age": 41}}
            ]}
        })))
        .mount(&server)
        .await;
    let env = MockEnvironment::new().with_host(&server.address().to_string());

    let r = lastic_with_env(&["get", "-p", "/people/_search", "-o", "table", "-c", "_id,user.name,age"], &env);

    assert!(r.success(), "stderr: {}", r.stderr);
    assert_eq!(r.lines()[0], "3 results in 3 milliseconds with a max score of 2");
    assert_eq!(
        r.table_rows(),
        vec![
            vec!["_id", "user.name", "age"],
            vec!["a1", "Alice", "30"],
            vec!["b2", "Bob", ""],
            vec!["c3", "Cleo", "41"],
        ]
    );
}

#[tokio::test]
async fn test_saved_output_mode_is_used() {
    let server = search_server().await;
    let env = MockEnvironment::new();
    env.write_config(&format!(
        r#"{{"defaults": {{"host": "{}", "path": "/i/_search", "output": "table", "fields": ["name", "_id"]}}}}"#,
        server.address()
    ));

    let r = lastic_with_env(&["get"], &env);

    assert!(r.success(), "stderr: {}", r.stderr);
    assert_eq!(
        r.table_rows(),
        vec![vec!["name".to_string(), "_id".to_string()], vec!["a".to_string(), "1".to_string()]]
    );
}

// ============================================================================
// Non-search responses
// ============================================================================

#[tokio::test]
async fn test_non_search_json_prints_as_is() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"cluster_name": "dev", "tagline": "You Know, for Search"})),
        )
        .mount(&server)
        .await;
    let env = MockEnvironment::new().with_host(&server.address().to_string());

    let r = lastic_with_env(&["get", "-p", "/"], &env);

    assert!(r.success(), "stderr: {}", r.stderr);
    let printed: serde_json::Value = serde_json::from_str(&r.stdout).unwrap();
    assert_eq!(printed["cluster_name"], "dev");
}

#[tokio::test]
async fn test_text_response_is_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/_cat/indices"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "text/plain; charset=UTF-8")
                .set_body_string("green open users 1 1 42\n"),
        )
        .mount(&server)
        .await;
    let env = MockEnvironment::new().with_host(&server.address().to_string());

    let r = lastic_with_env(&["get", "-p", "/_cat/indices", "-o", "table"], &env);

    assert!(r.success(), "stderr: {}", r.stderr);
    assert_eq!(r.stdout, "green open users 1 1 42\n");
}

#[tokio::test]
async fn test_error_status_is_rendered_not_failed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "error": {"type": "index_not_found_exception"},
            "status": 404
        })))
        .mount(&server)
        .await;
    let env = MockEnvironment::new().with_host(&server.address().to_string());

    let r = lastic_with_env(&["get", "-p", "/missing/_search"], &env);

    assert_eq!(r.exit_code, 0);
    assert!(r.stdout.contains("index_not_found_exception"));
    assert!(r.stderr.contains("404"));
}
