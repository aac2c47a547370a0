//! Error handling tests
mod common;

use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{lastic, lastic_with_env, MockEnvironment};

#[tokio::test]
async fn test_missing_body_file_fails_before_dispatch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let env = MockEnvironment::new().with_host(&server.address().to_string());
    let missing = env.home.path().join("no-such-query.json");

    let r = lastic_with_env(&["get", "-p", "/i/_search", "-f", missing.to_str().unwrap()], &env);

    assert_eq!(r.exit_code, 1);
    assert_eq!(r.lines()[0], "** ERROR **");
    assert!(r.stdout.contains("Could not read body file"));
    assert!(r.stdout.contains("no-such-query.json"));
    assert!(r.stdout.starts_with('\n'));
    assert!(r.stdout.ends_with("\n\n"));
}

#[test]
fn test_connection_refused() {
    let env = MockEnvironment::new().with_host("127.0.0.1:1");

    let r = lastic_with_env(&["get", "-p", "/"], &env);

    assert_eq!(r.exit_code, 1);
    assert!(r.stdout.contains("** ERROR **"));
    assert!(r.stdout.contains("Transport error"));
}

#[test]
fn test_malformed_uri_is_transport_error() {
    let env = MockEnvironment::new().with_host("localhost:9200");

    let r = lastic_with_env(&["get", "-p", "no-slash here"], &env);

    assert_eq!(r.exit_code, 1);
    assert!(r.stdout.contains("Transport error"));
}

#[test]
fn test_signing_without_credentials() {
    let env = MockEnvironment::new().with_host("127.0.0.1:1");

    let r = lastic_with_env(&["get", "-p", "/", "--aws4"], &env);

    assert_eq!(r.exit_code, 1);
    assert!(r.stdout.contains("Could not resolve AWS credentials"));
    assert!(r.stdout.contains("environment: not configured"));
}

#[test]
fn test_blank_host_in_config_is_invalid_input() {
    let env = MockEnvironment::new();
    env.write_config(r#"{"defaults": {"host": ""}}"#);

    let r = lastic_with_env(&["get"], &env);

    assert_eq!(r.exit_code, 1);
    assert!(r.stdout.contains("Invalid input"));
}

#[tokio::test]
async fn test_deadline_elapses() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(std::time::Duration::from_secs(3)))
        .mount(&server)
        .await;

    let env = MockEnvironment::new().with_host(&server.address().to_string());
    let r = lastic_with_env(&["get", "-p", "/slow", "--timeout", "0.5"], &env);

    assert_eq!(r.exit_code, 1);
    assert!(r.stdout.contains("** ERROR **"));
}

#[test]
fn test_unknown_flag_exits_with_error() {
    let r = lastic(&["--definitely-not-a-flag"]);
    assert_eq!(r.exit_code, 1);
    assert!(r.stderr.contains("--definitely-not-a-flag"));
}
