//! Persisted defaults tests
mod common;

use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{lastic_with_env, MockEnvironment};

#[test]
fn test_first_run_creates_config_with_builtins() {
    let env = MockEnvironment::new();
    assert!(!env.config_path().exists());

    let r = lastic_with_env(&["show-defaults"], &env);

    assert!(r.success(), "stderr: {}", r.stderr);
    assert!(env.config_path().exists());
    assert_eq!(
        env.read_config(),
        serde_json::json!({
            "defaults": {
                "method": "GET",
                "host": "localhost",
                "path": "",
                "scheme": "http",
                "body": null,
                "file": null,
                "output": "default",
                "fields": null,
                "aws4": false
            }
        })
    );
    assert!(r.stdout.contains("GET http://localhost"));
    assert!(r.stdout.contains(&env.config_path().display().to_string()));
}

#[test]
fn test_config_file_uses_four_space_indent() {
    let env = MockEnvironment::new();
    lastic_with_env(&["show-defaults"], &env);

    let content = std::fs::read_to_string(env.config_path()).unwrap();
    assert!(content.starts_with("{\n    \"defaults\": {\n        \"method\": \"GET\""));
}

#[test]
fn test_save_then_show_round_trip() {
    let env = MockEnvironment::new();

    let r = lastic_with_env(
        &["save-defaults", "-h", "search.example.com", "-s", "https", "-o", "table", "-c", "name,age", "--aws4"],
        &env,
    );
    assert!(r.success(), "stderr: {}", r.stderr);
    assert!(r.stdout.contains("Defaults saved to"));

    let saved = env.read_config();
    assert_eq!(saved["defaults"]["host"], "search.example.com");
    assert_eq!(saved["defaults"]["scheme"], "https");
    assert_eq!(saved["defaults"]["output"], "table");
    assert_eq!(saved["defaults"]["fields"], serde_json::json!(["name", "age"]));
    assert_eq!(saved["defaults"]["aws4"], true);
    assert_eq!(saved["defaults"]["method"], "GET");

    let r = lastic_with_env(&["show-defaults"], &env);
    assert!(r.success());
    assert!(r.stdout.contains("GET https://search.example.com"));
    assert!(r.stdout.contains("\"host\": \"search.example.com\""));
}

#[test]
fn test_save_defaults_keeps_unspecified_values() {
    let env = MockEnvironment::new();
    lastic_with_env(&["save-defaults", "-h", "es.internal:9200", "-p", "/logs/_search"], &env);
    lastic_with_env(&["save-defaults", "-o", "raw"], &env);

    let saved = env.read_config();
    assert_eq!(saved["defaults"]["host"], "es.internal:9200");
    assert_eq!(saved["defaults"]["path"], "/logs/_search");
    assert_eq!(saved["defaults"]["output"], "raw");
}

#[test]
fn test_invalid_config_is_an_error_and_not_overwritten() {
    let env = MockEnvironment::new();
    env.write_config("{ this is not json");

    let r = lastic_with_env(&["show-defaults"], &env);

    assert_eq!(r.exit_code, 1);
    assert!(r.stdout.contains("** ERROR **"));
    assert!(r.stdout.contains("Config error"));
    assert_eq!(std::fs::read_to_string(env.config_path()).unwrap(), "{ this is not json");
}

#[test]
fn test_legacy_sign_key_and_csv_fields_are_read() {
    let env = MockEnvironment::new();
    env.write_config(r#"{"defaults": {"sign": true, "fields": "a,b", "output": "yaml"}}"#);

    let r = lastic_with_env(&["show-defaults"], &env);

    assert!(r.success(), "stderr: {}", r.stderr);
    assert!(r.stdout.contains("\"aws4\": true"));
    assert!(r.stdout.contains("\"output\": \"default\""));
}

#[tokio::test]
async fn test_saved_body_and_method_are_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users/_search"))
        .and(header("content-type", "application/json"))
        .and(body_string(r#"{"query":{"match_all":{}}}"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"took": 1})))
        .expect(1)
        .mount(&server)
        .await;

    let env = MockEnvironment::new();
    let r = lastic_with_env(
        &[
            "save-defaults",
            "-X",
            "POST",
            "-h",
            &server.address().to_string(),
            "-p",
            "/users/_search",
            "-b",
            r#"{"query":{"match_all":{}}}"#,
        ],
        &env,
    );
    assert!(r.success(), "stderr: {}", r.stderr);

    let r = lastic_with_env(&[], &env);
    assert!(r.success(), "stderr: {}", r.stderr);
}
