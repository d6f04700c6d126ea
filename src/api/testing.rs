//! Scripted transport for service tests

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::cancel::CancelToken;
use super::client::{ApiClient, HttpRequest, HttpResponse, Method, Transport};
use crate::error::{ApiError, ApiResult};
use crate::session::{KeyValueStore, MemoryStore, SessionStore};

pub const TEST_BASE: &str = "http://test/api";

/// Responses are queued per (method, path) and consumed in order.
/// A request with nothing queued fails as a network error.
#[derive(Default)]
pub struct FakeTransport {
    routes: Mutex<Vec<(Method, String, VecDeque<HttpResponse>)>>,
    sent: Mutex<Vec<HttpRequest>>,
    cancel_on_send: Mutex<Option<CancelToken>>,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a JSON answer; `path` may include a query string
    pub fn on(&self, method: Method, path: &str, status: u16, body: serde_json::Value) {
        self.on_raw(method, path, status, body.to_string().into_bytes());
    }

    pub fn on_raw(&self, method: Method, path: &str, status: u16, body: Vec<u8>) {
        let mut routes = self.routes.lock().unwrap();
        let response = HttpResponse { status, body };
        match routes.iter_mut().find(|(m, p, _)| *m == method && p == path) {
            Some((_, _, queue)) => queue.push_back(response),
            None => routes.push((method, path.to_string(), VecDeque::from([response]))),
        }
    }

    /// Cancel `token` while the next request is in flight
    pub fn cancel_on_send(&self, token: CancelToken) {
        *self.cancel_on_send.lock().unwrap() = Some(token);
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.sent.lock().unwrap().clone()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        let url = format!("{}{}", TEST_BASE, path);
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.url == url)
            .count()
    }

    /// Parsed JSON body of the last request to `path`
    pub fn last_body(&self, method: Method, path: &str) -> Option<serde_json::Value> {
        let url = format!("{}{}", TEST_BASE, path);
        self.requests()
            .into_iter()
            .rev()
            .find(|r| r.method == method && r.url == url)
            .and_then(|r| r.body)
            .and_then(|b| serde_json::from_str(&b).ok())
    }
}

#[async_trait(?Send)]
impl Transport for FakeTransport {
    async fn send(&self, request: HttpRequest) -> ApiResult<HttpResponse> {
        self.sent.lock().unwrap().push(request.clone());
        if let Some(token) = self.cancel_on_send.lock().unwrap().take() {
            token.cancel();
        }

        let path = request.url.strip_prefix(TEST_BASE).unwrap_or(&request.url).to_string();
        let mut routes = self.routes.lock().unwrap();
        routes
            .iter_mut()
            .find(|(m, p, _)| *m == request.method && *p == path)
            .and_then(|(_, _, queue)| queue.pop_front())
            .ok_or_else(|| ApiError::Network(format!("no scripted response for {:?} {}", request.method, path)))
    }
}

/// Memory store whose writes to the listed keys fail, like a full localStorage
pub struct RejectingStore {
    inner: MemoryStore,
    rejected: Vec<&'static str>,
}

impl RejectingStore {
    pub fn session(rejected: &[&'static str], seeded: &[(&str, &str)]) -> SessionStore {
        let inner = MemoryStore::default();
        for (key, value) in seeded {
            inner.set(key, value).unwrap();
        }
        SessionStore::new(Arc::new(Self { inner, rejected: rejected.to_vec() }))
    }
}

impl KeyValueStore for RejectingStore {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> ApiResult<()> {
        if self.rejected.contains(&key) {
            return Err(ApiError::Storage(format!("quota exceeded writing {}", key)));
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) {
        self.inner.remove(key);
    }
}

pub fn client_with(fake: Arc<FakeTransport>) -> ApiClient {
    ApiClient::new(TEST_BASE, fake, SessionStore::memory())
}
