#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};
use std::sync::{Arc, Mutex, mpsc};
use std::thread;
use std::time::Duration;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Helper to run schooldesk commands against an isolated config directory
pub struct DeskTest {
    pub temp_dir: TempDir,
    env: Vec<(String, String)>,
}

impl DeskTest {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        DeskTest {
            temp_dir,
            env: Vec::new(),
        }
    }

    /// Point the binary at a test server
    pub fn with_server(server: &TestServer) -> Self {
        Self::new()
            .env("SCHOOLDESK_BASE_URL", &server.url())
            .env("SCHOOLDESK_TOKEN", "test-token")
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.env.push((key.to_string(), value.to_string()));
        self
    }

    pub fn root(&self) -> PathBuf {
        self.temp_dir.path().join(".schooldesk")
    }

    pub fn config_path(&self) -> PathBuf {
        self.root().join("config.yaml")
    }

    pub fn read_config(&self) -> String {
        fs::read_to_string(self.config_path()).expect("Failed to read config")
    }

    pub fn run(&self, args: &[&str]) -> Output {
        let mut command = Command::new(env!("CARGO_BIN_EXE_schooldesk"));
        command
            .args(args)
            .current_dir(self.temp_dir.path())
            .env("SCHOOLDESK_ROOT", self.root())
            .env_remove("SCHOOLDESK_TOKEN")
            .env_remove("SCHOOLDESK_BASE_URL")
            .env_remove("SCHOOLDESK_LOG")
            .stdin(Stdio::null());
        for (key, value) in &self.env {
            command.env(key, value);
        }
        command.output().expect("Failed to execute schooldesk")
    }

    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if !output.status.success() {
            panic!(
                "Command {:?} failed with status {:?}\nstdout: {}\nstderr: {}",
                args,
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    /// Run a command expected to fail and return its stderr
    pub fn run_failure(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            !output.status.success(),
            "Command {:?} should have failed\nstdout: {}",
            args,
            String::from_utf8_lossy(&output.stdout)
        );
        String::from_utf8_lossy(&output.stderr).to_string()
    }
}

/// A request as seen by the test server
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub method: String,
    /// Path including the query string
    pub target: String,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl SeenRequest {
    pub fn path(&self) -> &str {
        self.target.split('?').next().unwrap_or_default()
    }

    pub fn query(&self) -> Vec<(String, String)> {
        let Some((_, query)) = self.target.split_once('?') else {
            return Vec::new();
        };
        url::form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).expect("request body is not JSON")
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(String::as_str)
    }
}

/// Canned response returned by a test server handler
pub struct Reply {
    pub status: u16,
    pub body: String,
    pub delay: Duration,
}

impl Reply {
    pub fn json(status: u16, body: Value) -> Self {
        Self::raw(status, body.to_string())
    }

    pub fn raw(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

type Handler = Arc<dyn Fn(&SeenRequest) -> Reply + Send + Sync>;

#[derive(Clone)]
struct ServerState {
    handler: Handler,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

/// axum server on its own thread and runtime, answering every route with the handler's reply
pub struct TestServer {
    addr: SocketAddr,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

impl TestServer {
    pub fn start(handler: impl Fn(&SeenRequest) -> Reply + Send + Sync + 'static) -> Self {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let state = ServerState {
            handler: Arc::new(handler),
            seen: seen.clone(),
        };
        let app = Router::new().fallback(record_and_reply).with_state(state);
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("test server runtime");
            runtime.block_on(async move {
                let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
                tx.send(listener.local_addr().expect("local addr"))
                    .expect("report address");
                axum::serve(listener, app).await.expect("test server");
            });
        });

        let addr = rx.recv().expect("test server failed to start");
        Self { addr, seen }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }
}

async fn record_and_reply(
    State(state): State<ServerState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request = SeenRequest {
        method: method.to_string(),
        target: uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| uri.path().to_string()),
        headers: headers
            .iter()
            .map(|(name, value)| {
                let value = String::from_utf8_lossy(value.as_bytes()).to_string();
                (name.as_str().to_string(), value)
            })
            .collect(),
        body: String::from_utf8_lossy(&body).to_string(),
    };
    state.seen.lock().unwrap().push(request.clone());
    let reply = (state.handler)(&request);

    if !reply.delay.is_zero() {
        tokio::time::sleep(reply.delay).await;
    }

    let status = StatusCode::from_u16(reply.status).expect("valid status code");
    (status, [(CONTENT_TYPE, "application/json")], reply.body).into_response()
}

/// `count` student records with ids `S{first}`, `S{first + 1}`, ...
pub fn students(first: usize, count: usize) -> Vec<Value> {
    (first..first + count)
        .map(|i| {
            let name = format!("Student {i}");
            serde_json::json!({"id": format!("S{i:03}"), "name": name, "class": "7B"})
        })
        .collect()
}

/// Serve `records` from `/{resource}/showall` honoring offset and limit
pub fn page_of(records: &[Value], request: &SeenRequest) -> Value {
    let query = request.query();
    let param = |name: &str| {
        query
            .iter()
            .find(|(k, _)| k == name)
            .and_then(|(_, v)| v.parse::<usize>().ok())
    };
    let offset = param("offset").unwrap_or(0).min(records.len());
    let limit = param("limit").unwrap_or(10);
    let end = (offset + limit).min(records.len());
    Value::Array(records[offset..end].to_vec())
}
