//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;

use ping_watchdog::config::{
    TelegramConfig, WatchdogConfig, ENV_ALERT_DEBOUNCE_WINDOW, ENV_ALERT_TIMEOUT,
    ENV_LAST_ALERT_FILE, ENV_LAST_PING_FILE, ENV_PING_INTERVAL, ENV_PING_TIMEOUT,
    ENV_TELEGRAM_API_BASE, ENV_TELEGRAM_CHAT_ID, ENV_TELEGRAM_TOKEN,
};

/// One request captured by the Telegram stub.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    /// First path segment, e.g. `bot123:abc`
    pub bot_segment: String,
    pub query: HashMap<String, String>,
}

#[derive(Clone)]
struct StubState {
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
    status: StatusCode,
    delay: Duration,
}

/// Local stand-in for `https://api.telegram.org`.
pub struct TelegramStub {
    pub base_url: String,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl TelegramStub {
    pub async fn start() -> Self {
        Self::start_with(StatusCode::OK, Duration::ZERO).await
    }

    pub async fn start_with(status: StatusCode, delay: Duration) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            requests: Arc::clone(&requests),
            status,
            delay,
        };

        let app = Router::new()
            .route("/:bot/sendMessage", get(send_message))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            requests,
        }
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn telegram_config(&self, token: Option<&str>, chat_id: Option<&str>) -> TelegramConfig {
        TelegramConfig {
            token: token.map(str::to_string),
            chat_id: chat_id.map(str::to_string),
            api_base: self.base_url.clone(),
        }
    }
}

async fn send_message(
    State(state): State<StubState>,
    Path(bot): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> StatusCode {
    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }
    state.requests.lock().unwrap().push(CapturedRequest {
        bot_segment: bot,
        query,
    });
    state.status
}

/// Environment for a watchdog whose records live in `dir`.
pub fn test_env(dir: &std::path::Path, ping_timeout: u64) -> HashMap<&'static str, String> {
    HashMap::from([
        (ENV_LAST_PING_FILE, dir.join("last_ping.txt").display().to_string()),
        (ENV_LAST_ALERT_FILE, dir.join("last_alert.txt").display().to_string()),
        (ENV_PING_TIMEOUT, ping_timeout.to_string()),
        (ENV_PING_INTERVAL, "1".to_string()),
        (ENV_ALERT_TIMEOUT, "3600".to_string()),
    ])
}

/// Same as [`test_env`] plus Telegram settings pointing at `stub`.
pub fn test_env_with_stub(
    dir: &std::path::Path,
    ping_timeout: u64,
    stub: &TelegramStub,
) -> HashMap<&'static str, String> {
    let mut env = test_env(dir, ping_timeout);
    env.insert(ENV_TELEGRAM_TOKEN, "123:abc".to_string());
    env.insert(ENV_TELEGRAM_CHAT_ID, "-1001".to_string());
    env.insert(ENV_TELEGRAM_API_BASE, stub.base_url.clone());
    env
}

pub fn with_debounce_window(
    mut env: HashMap<&'static str, String>,
    window: &str,
) -> HashMap<&'static str, String> {
    env.insert(ENV_ALERT_DEBOUNCE_WINDOW, window.to_string());
    env
}

pub fn load_config(env: &HashMap<&'static str, String>) -> WatchdogConfig {
    WatchdogConfig::from_lookup(|key| env.get(key).cloned()).unwrap()
}
