//! Shared test utilities and mock infrastructure.

#![allow(dead_code, unused_imports)]

pub mod mock_server;

use app_ducks::config::{Config, ConfigStore};
use app_ducks::env::{Environment, IdleQueue};
use app_ducks::fetch::{FetchClient, FetchError, FetchRequest, FetchResponse};
use app_ducks::intl::{IntlLoader, IntlState, IntlStore};
use app_ducks::modules::ModuleMap;
use app_ducks::store::{Action, Reducer, Store};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::io;
use std::sync::Arc;

pub const MODULE: &str = "my-module";
pub const BUNDLE_URL: &str = "https://cdn.example.com/my-module/1.0.0/my-module.browser.js";
pub const EN_US_URL: &str = "https://cdn.example.com/my-module/1.0.0/en-us/my-module.json";
pub const EN_CA_URL: &str = "https://cdn.example.com/my-module/1.0.0/en-ca/my-module.json";
pub const FR_CA_URL: &str = "https://cdn.example.com/my-module/1.0.0/fr-ca/my-module.json";

/// Scripted reply for one URL.
#[derive(Debug, Clone)]
pub enum MockReply {
    Status { status: u16, status_text: String, body: String },
    NetworkError(String),
}

impl MockReply {
    pub fn json(value: serde_json::Value) -> Self {
        MockReply::Status {
            status: 200,
            status_text: "OK".to_string(),
            body: value.to_string(),
        }
    }

    pub fn status(status: u16, status_text: &str) -> Self {
        MockReply::Status {
            status,
            status_text: status_text.to_string(),
            body: String::new(),
        }
    }
}

/// In-memory [`FetchClient`] answering from a script.
///
/// Each URL replays its queue of replies, repeating the last one. URLs
/// without a script answer 404.
#[derive(Default)]
pub struct MockFetchClient {
    replies: Mutex<HashMap<String, VecDeque<MockReply>>>,
    calls: Mutex<Vec<FetchRequest>>,
}

impl MockFetchClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, url: &str, reply: MockReply) {
        self.replies
            .lock()
            .entry(url.to_string())
            .or_default()
            .push_back(reply);
    }

    pub fn respond_json(&self, url: &str, value: serde_json::Value) {
        self.respond(url, MockReply::json(value));
    }

    /// URLs requested so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().iter().map(|r| r.url.clone()).collect()
    }

    pub fn requests(&self) -> Vec<FetchRequest> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl FetchClient for MockFetchClient {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, FetchError> {
        self.calls.lock().push(request.clone());

        let reply = {
            let mut replies = self.replies.lock();
            match replies.get_mut(&request.url) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        };

        match reply.unwrap_or_else(|| MockReply::status(404, "Not Found")) {
            MockReply::Status {
                status,
                status_text,
                body,
            } => Ok(FetchResponse {
                status,
                status_text,
                url: request.url,
                body,
            }),
            MockReply::NetworkError(message) => Err(FetchError::Network {
                url: request.url,
                message,
            }),
        }
    }
}

pub fn module_map() -> Arc<ModuleMap> {
    Arc::new(ModuleMap::new().with_module(MODULE, BUNDLE_URL))
}

pub fn server_loader(fetch: Arc<MockFetchClient>) -> IntlLoader {
    IntlLoader::new(
        IntlStore::new(IntlState::new("en-US")),
        Environment::server(),
        module_map(),
        fetch,
    )
}

pub fn browser_loader(fetch: Arc<MockFetchClient>, idle: Arc<IdleQueue>) -> IntlLoader {
    browser_loader_with_state(fetch, idle, IntlState::new("en-US"))
}

pub fn browser_loader_with_state(
    fetch: Arc<MockFetchClient>,
    idle: Arc<IdleQueue>,
    state: IntlState,
) -> IntlLoader {
    IntlLoader::new(IntlStore::new(state), Environment::browser(idle), module_map(), fetch)
}

pub fn config_store(edit: impl FnOnce(&mut Config)) -> ConfigStore {
    let mut config = Config::default();
    edit(&mut config);
    ConfigStore::in_memory(config)
}

/// Record the type name of every action dispatched to `store`.
pub fn record_actions<R: Reducer>(store: &Store<R>) -> Arc<Mutex<Vec<&'static str>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    store.subscribe(move |action: &R::Action| sink.lock().push(action.type_name()));
    seen
}

/// Log output captured while the returned guard is alive.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Capture WARN and above on the current thread.
pub fn capture_warnings() -> (LogBuffer, tracing::subscriber::DefaultGuard) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();
    (buffer, tracing::subscriber::set_default(subscriber))
}
