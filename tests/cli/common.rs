//! Common test utilities for binary tests.
//!
//! Provides a local axum server that answers successive GraphQL requests with
//! canned JSON bodies and records what it received.

use std::collections::VecDeque;
use std::path::Path;
use std::process::Command;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::post;
use axum::Router;
use tokio::sync::oneshot;

/// A request captured by [`StubServer`].
#[derive(Debug, Clone, Default)]
pub struct CapturedRequest {
    /// Header pairs, lowercased names.
    pub headers: Vec<(String, String)>,
    /// Raw request body.
    pub body: String,
}

impl CapturedRequest {
    /// Returns the first header with the given (lowercase) name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Parses the body as JSON.
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("request body is JSON")
    }
}

#[derive(Clone, Default)]
struct StubState {
    responses: Arc<Mutex<VecDeque<(u16, String)>>>,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

/// Pops the next canned response; once they run out every request gets a 500.
async fn graphql(
    State(state): State<StubState>,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
    let captured = CapturedRequest {
        headers: headers
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect(),
        body,
    };
    state.requests.lock().unwrap().push(captured);

    let (status, body) = state
        .responses
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or((500, r#"{"errors":[{"message":"no canned response left"}]}"#.to_string()));
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    (status, [(header::CONTENT_TYPE, "application/json")], body)
}

/// Local GraphQL endpoint serving canned responses in order.
pub struct StubServer {
    pub url: String,
    state: StubState,
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl StubServer {
    /// Starts a server that answers the n-th request with `responses[n]`
    /// (status, body).
    pub fn start(responses: Vec<(u16, String)>) -> Self {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind stub server");
        listener.set_nonblocking(true).unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());

        let state = StubState {
            responses: Arc::new(Mutex::new(responses.into())),
            requests: Arc::default(),
        };
        let app = Router::new()
            .route("/", post(graphql))
            .with_state(state.clone());
        let (shutdown, shutdown_rx) = oneshot::channel::<()>();

        let handle = thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::from_std(listener).unwrap();
                axum::serve(listener, app)
                    .with_graceful_shutdown(async {
                        shutdown_rx.await.ok();
                    })
                    .await
                    .unwrap();
            });
        });

        Self {
            url,
            state,
            shutdown: Some(shutdown),
            handle: Some(handle),
        }
    }

    /// Stops the server and returns the captured requests.
    pub fn finish(mut self) -> Vec<CapturedRequest> {
        self.stop();
        self.state.requests.lock().unwrap().clone()
    }

    fn stop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(handle) = self.handle.take() {
            handle.join().unwrap();
        }
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Wraps `data` the way the GraphQL endpoint returns one queryV1 page.
pub fn page(data: serde_json::Value, cursor: Option<&str>) -> (u16, String) {
    let body = serde_json::json!({
        "data": {"queryV1": {"type": "list", "data": data, "cursor": cursor}}
    });
    (200, body.to_string())
}

/// Runs the CLI binary with the given arguments.
/// Returns (exit code, stdout, stderr).
pub fn run_cli(args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_jupiterone-cli"))
        .args(args)
        .env("RUST_LOG", "off")
        .env_remove("JUPITERONE_ACCOUNT")
        .env_remove("JUPITERONE_API_TOKEN")
        .env_remove("JUPITERONE_API_URL")
        .env("NO_PROXY", "127.0.0.1,localhost")
        .output()
        .expect("Failed to execute command");

    let exit_code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    (exit_code, stdout, stderr)
}

/// Runs a query against `server` with the standard test credentials and no
/// config file.
pub fn run_query(server: &StubServer, query: &str, extra: &[&str]) -> (i32, String, String) {
    run_query_with_config(
        server,
        query,
        Path::new("/nonexistent/jupiterone-cli/config.toml"),
        extra,
    )
}

/// Runs a query against `server` using the config file at `config`.
pub fn run_query_with_config(
    server: &StubServer,
    query: &str,
    config: &Path,
    extra: &[&str],
) -> (i32, String, String) {
    let config = config.to_string_lossy();
    let mut args = vec![
        query,
        "--account-id",
        "acct-1",
        "--token",
        "secret-token",
        "--api-url",
        server.url.as_str(),
        "--config",
        config.as_ref(),
    ];
    args.extend_from_slice(extra);
    run_cli(&args)
}
