//! End-to-end tests against a real listener on an ephemeral port.
//!
//! Each test binds its own server on 127.0.0.1:0, so they run in parallel.
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use futures::future::join_all;
use hostname_server::config::{AppConfig, CACHE_CONTROL_NO_STORE, INTERNAL_ERROR_BODY};
use hostname_server::http::bind;
use hostname_server::resolver::{HostnameResolver, SystemHostname};
use hostname_server::{create_router, AppState};
use reqwest::StatusCode;

/// Start a server in the background and return its address
async fn spawn_server(state: AppState) -> SocketAddr {
    let server = bind("127.0.0.1:0").await.expect("bind ephemeral port");
    let addr = server.local_addr().unwrap();
    tokio::spawn(server.serve(create_router(state)));
    addr
}

async fn spawn_default() -> SocketAddr {
    spawn_server(AppState::new(AppConfig::default(), Arc::new(SystemHostname))).await
}

fn expected_body() -> String {
    let hostname = hostname::get().unwrap().into_string().unwrap();
    format!("You've hit <{hostname}>")
}

struct Broken;

impl HostnameResolver for Broken {
    fn resolve(&self) -> io::Result<String> {
        Err(io::Error::other("hostname unavailable"))
    }
}

#[tokio::test]
async fn get_root_reports_hostname() {
    let addr = spawn_default().await;

    let response = reqwest::get(format!("http://{addr}/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[reqwest::header::CACHE_CONTROL],
        CACHE_CONTROL_NO_STORE
    );
    assert!(response.headers()[reqwest::header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
    assert_eq!(response.text().await.unwrap(), expected_body());
}

#[tokio::test]
async fn post_with_body_gets_identical_response() {
    let addr = spawn_default().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("http://{addr}/anything"))
        .header("content-type", "application/json")
        .body(r#"{"ignored": true}"#)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), expected_body());
}

#[tokio::test]
async fn method_and_path_never_matter() {
    let addr = spawn_default().await;
    let client = reqwest::Client::new();
    let url = format!("http://{addr}/deeply/nested/path?with=query");

    for method in [
        reqwest::Method::PUT,
        reqwest::Method::DELETE,
        reqwest::Method::PATCH,
        reqwest::Method::OPTIONS,
    ] {
        let response = client.request(method.clone(), &url).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{method}");
        assert_eq!(response.text().await.unwrap(), expected_body(), "{method}");
    }
}

#[tokio::test]
async fn ten_concurrent_requests_are_independent() {
    let addr = spawn_default().await;
    let client = reqwest::Client::new();

    let requests = (0..10).map(|i| {
        let client = client.clone();
        async move {
            let response = client
                .get(format!("http://{addr}/req/{i}"))
                .send()
                .await
                .unwrap();
            (response.status(), response.text().await.unwrap())
        }
    });

    let responses = join_all(requests).await;
    assert_eq!(responses.len(), 10);
    for (status, body) in responses {
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, expected_body());
    }
}

#[tokio::test]
async fn lookup_failure_is_500_and_listener_survives() {
    let addr = spawn_server(AppState::new(AppConfig::default(), Arc::new(Broken))).await;

    for _ in 0..3 {
        let response = reqwest::get(format!("http://{addr}/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.text().await.unwrap(), INTERNAL_ERROR_BODY);
    }
}

#[tokio::test]
async fn echo_mode_reports_caller_and_headers() {
    let mut config = AppConfig::default();
    config.whoami.echo_request = true;
    let addr = spawn_server(AppState::new(config, Arc::new(SystemHostname))).await;

    let body = reqwest::Client::new()
        .get(format!("http://{addr}/"))
        .header("x-tutorial", "kubia")
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(body.starts_with(&format!("{} from \"127.0.0.1:", expected_body())));
    assert!(body.contains("\"x-tutorial\" => \"kubia\"\n"));
}

#[tokio::test]
async fn healthy_budget_runs_out() {
    let mut config = AppConfig::default();
    config.whoami.healthy_count = Some(1);
    let addr = spawn_server(AppState::new(config, Arc::new(SystemHostname))).await;

    let first = reqwest::get(format!("http://{addr}/")).await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = reqwest::get(format!("http://{addr}/")).await.unwrap();
    assert_eq!(second.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(second.text().await.unwrap().is_empty());
}
