#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::extract::State;
use axum::http::StatusCode as AxumStatus;
use axum::routing::post;
use axum::{Json, Router};
use reqwest::{Client, Method, StatusCode};
use serde_json::{json, Value};
use tempfile::TempDir;

use formrelay::config::{Config, Environment, TelegramConfig};
use formrelay::notify::{Notifier, NotifyError};

/// How the recording notifier behaves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NotifierMode {
    Configured,
    Unconfigured,
    Failing,
}

/// Notifier double that keeps every message it is asked to send.
pub struct RecordingNotifier {
    mode: NotifierMode,
    sent: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new(mode: NotifierMode) -> Self {
        Self {
            mode,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    fn is_configured(&self) -> bool {
        self.mode != NotifierMode::Unconfigured
    }

    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        if self.mode == NotifierMode::Failing {
            return Err(NotifyError::Unreachable("connection refused".to_string()));
        }
        self.sent.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// A running test server instance with its own data directory.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub notifier: Arc<RecordingNotifier>,
    pub data_file: PathBuf,
    _data_dir: TempDir,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// POST a JSON body, return (body, status).
    pub async fn post_json(&self, path: &str, data: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url(path))
            .json(data)
            .send()
            .await
            .expect("post json failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// POST a raw body with the given content type.
    pub async fn post_raw(&self, path: &str, content_type: &str, body: String) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url(path))
            .header("content-type", content_type)
            .body(body)
            .send()
            .await
            .expect("post raw failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// POST form-urlencoded data, return (body, status).
    pub async fn post_form(&self, path: &str, data: &[(&str, &str)]) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url(path))
            .form(data)
            .send()
            .await
            .expect("post form failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Send `method` with no body.
    pub async fn request(&self, method: Method, path: &str) -> reqwest::Response {
        self.client
            .request(method, self.url(path))
            .send()
            .await
            .expect("request failed")
    }

    /// Wait until the notifier has recorded `count` messages.
    pub async fn wait_for_messages(&self, count: usize) -> Vec<String> {
        for _ in 0..100 {
            let messages = self.notifier.messages();
            if messages.len() >= count {
                return messages;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        self.notifier.messages()
    }
}

pub fn test_config(data_file: PathBuf) -> Config {
    Config {
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        environment: Environment::Production,
        telegram: None,
        cors_origin: "*".to_string(),
        data_file,
        redirect_path: "/otp.html".to_string(),
        max_body_size: 1_048_576,
        trusted_proxies: vec![],
        log_level: "warn".to_string(),
    }
}

pub fn valid_submission() -> Value {
    json!({
        "tarif": "baru",
        "nama": " Budi ",
        "nohp": "0812-3456-7890",
        "saldo": "1.000.000",
    })
}

pub async fn spawn_app(mode: NotifierMode) -> TestApp {
    spawn_app_with(mode, |_| {}).await
}

/// Spawn a test app, letting the caller adjust the config first.
pub async fn spawn_app_with(mode: NotifierMode, adjust: impl FnOnce(&mut Config)) -> TestApp {
    let data_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let data_file = data_dir.path().join("data").join("submissions.json");

    let mut config = test_config(data_file.clone());
    adjust(&mut config);

    let notifier = Arc::new(RecordingNotifier::new(mode));
    let app = formrelay::build_app_with_notifier(config, notifier.clone());

    // Bind to random port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .expect("Server failed");
    });

    TestApp {
        addr,
        client: Client::new(),
        notifier,
        data_file,
        _data_dir: data_dir,
    }
}

/// A stand-in for the Bot API that records payloads and answers with a
/// fixed status and body.
pub struct MockTelegram {
    pub base_url: String,
    pub payloads: Arc<Mutex<Vec<(String, Value)>>>,
}

impl MockTelegram {
    pub fn config(&self) -> TelegramConfig {
        TelegramConfig {
            bot_token: "123:abc".to_string(),
            chat_id: "-100200".to_string(),
            api_base: self.base_url.clone(),
        }
    }
}

#[derive(Clone)]
struct MockState {
    status: AxumStatus,
    reply: Value,
    payloads: Arc<Mutex<Vec<(String, Value)>>>,
}

pub async fn spawn_telegram(status: u16, reply: Value) -> MockTelegram {
    let payloads = Arc::new(Mutex::new(Vec::new()));
    let state = MockState {
        status: AxumStatus::from_u16(status).unwrap(),
        reply,
        payloads: payloads.clone(),
    };

    let app = Router::new()
        .route("/{bot}/sendMessage", post(mock_send_message))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock telegram");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Mock server failed");
    });

    MockTelegram {
        base_url: format!("http://{addr}"),
        payloads,
    }
}

async fn mock_send_message(
    State(state): State<MockState>,
    axum::extract::Path(bot): axum::extract::Path<String>,
    Json(payload): Json<Value>,
) -> (AxumStatus, Json<Value>) {
    state.payloads.lock().unwrap().push((bot, payload));
    (state.status, Json(state.reply.clone()))
}
