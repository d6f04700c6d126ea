//! HTTP Client Wrapper
//!
//! Attaches the bearer token to every request, passes successes through,
//! and on 401/403 tries one token refresh before purging the session.

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::cancel::CancelToken;
use super::endpoints::{with_query, Endpoint};
use crate::config::AppConfig;
use crate::error::{ApiError, ApiResult};
use crate::session::SessionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Wire-level sender. Futures are not `Send` on wasm32.
#[async_trait(?Send)]
pub trait Transport: Send + Sync {
    /// `Err(Network)` only when no response was received
    async fn send(&self, request: HttpRequest) -> ApiResult<HttpResponse>;
}

/// Browser fetch through reqwest
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self { http: reqwest::Client::new() }
    }
}

#[async_trait(?Send)]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> ApiResult<HttpResponse> {
        let mut builder = match request.method {
            Method::Get => self.http.get(&request.url),
            Method::Post => self.http.post(&request.url),
            Method::Put => self.http.put(&request.url),
            Method::Patch => self.http.patch(&request.url),
            Method::Delete => self.http.delete(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(HttpResponse { status, body: body.to_vec() })
    }
}

pub type UnauthorizedHook = Arc<dyn Fn() + Send + Sync>;

#[derive(Serialize)]
struct RefreshArgs<'a> {
    refresh: &'a str,
}

#[derive(Deserialize)]
struct RefreshedTokens {
    access: String,
    #[serde(default)]
    refresh: Option<String>,
}

fn is_auth_failure(status: u16) -> bool {
    status == 401 || status == 403
}

/// Parse a JSON body; an empty body reads as `null` so `()` and `Option` work
fn parse_body<T: DeserializeOwned>(body: &[u8]) -> ApiResult<T> {
    let body = if body.iter().all(u8::is_ascii_whitespace) { b"null".as_slice() } else { body };
    serde_json::from_slice(body).map_err(|e| ApiError::Parse(e.to_string()))
}

fn encode<B: Serialize + ?Sized>(body: &B) -> ApiResult<String> {
    serde_json::to_string(body).map_err(|e| ApiError::Parse(e.to_string()))
}

#[derive(Clone)]
pub struct ApiClient {
    base_url: Arc<str>,
    transport: Arc<dyn Transport>,
    session: SessionStore,
    on_unauthorized: Option<UnauthorizedHook>,
}

impl ApiClient {
    pub fn new(base_url: &str, transport: Arc<dyn Transport>, session: SessionStore) -> Self {
        Self {
            base_url: Arc::from(base_url.trim_end_matches('/')),
            transport,
            session,
            on_unauthorized: None,
        }
    }

    /// Client for the browser: reqwest transport, configured base URL
    pub fn browser(config: &AppConfig, session: SessionStore) -> Self {
        Self::new(&config.api_base_url, Arc::new(ReqwestTransport::new()), session)
    }

    /// Called after the session has been purged by an authorization failure
    pub fn on_unauthorized(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_unauthorized = Some(Arc::new(hook));
        self
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    // ========================
    // Verbs
    // ========================

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &Endpoint, cancel: &CancelToken) -> ApiResult<T> {
        self.get_with_query(endpoint, &[], cancel).await
    }

    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        query: &[(&str, String)],
        cancel: &CancelToken,
    ) -> ApiResult<T> {
        let path = with_query(&endpoint.path(), query);
        let response = self.execute(Method::Get, endpoint, &path, None, cancel).await?;
        parse_body(&response.body)
    }

    /// Raw body, for file downloads
    pub async fn get_bytes(
        &self,
        endpoint: &Endpoint,
        query: &[(&str, String)],
        cancel: &CancelToken,
    ) -> ApiResult<Vec<u8>> {
        let path = with_query(&endpoint.path(), query);
        let response = self.execute(Method::Get, endpoint, &path, None, cancel).await?;
        Ok(response.body)
    }

    pub async fn post<B, T>(&self, endpoint: &Endpoint, body: &B, cancel: &CancelToken) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::Post, endpoint, &endpoint.path(), Some(encode(body)?), cancel).await
    }

    /// POST without a body (action endpoints)
    pub async fn post_empty<T: DeserializeOwned>(&self, endpoint: &Endpoint, cancel: &CancelToken) -> ApiResult<T> {
        self.send_json(Method::Post, endpoint, &endpoint.path(), None, cancel).await
    }

    pub async fn put<B, T>(&self, endpoint: &Endpoint, body: &B, cancel: &CancelToken) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::Put, endpoint, &endpoint.path(), Some(encode(body)?), cancel).await
    }

    pub async fn patch<B, T>(&self, endpoint: &Endpoint, body: &B, cancel: &CancelToken) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::Patch, endpoint, &endpoint.path(), Some(encode(body)?), cancel).await
    }

    pub async fn delete(&self, endpoint: &Endpoint, cancel: &CancelToken) -> ApiResult<()> {
        self.execute(Method::Delete, endpoint, &endpoint.path(), None, cancel).await?;
        Ok(())
    }

    // ========================
    // Core
    // ========================

    async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &Endpoint,
        path: &str,
        body: Option<String>,
        cancel: &CancelToken,
    ) -> ApiResult<T> {
        let response = self.execute(method, endpoint, path, body, cancel).await?;
        parse_body(&response.body)
    }

    fn build(&self, method: Method, path: &str, body: Option<String>) -> HttpRequest {
        let mut headers = vec![
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Accept".to_string(), "application/json".to_string()),
        ];
        if let Some(token) = self.session.access_token() {
            headers.push(("Authorization".to_string(), format!("Bearer {}", token)));
        }
        HttpRequest {
            method,
            url: format!("{}{}", self.base_url, path),
            headers,
            body,
        }
    }

    async fn execute(
        &self,
        method: Method,
        endpoint: &Endpoint,
        path: &str,
        body: Option<String>,
        cancel: &CancelToken,
    ) -> ApiResult<HttpResponse> {
        let mut refreshed = false;
        loop {
            cancel.check()?;
            debug!(?method, path, "request");
            let result = self.transport.send(self.build(method, path, body.clone())).await;
            // Late responses for an unmounted page are dropped here
            cancel.check()?;
            let response = result?;

            if is_auth_failure(response.status) && !endpoint.is_auth() {
                if !refreshed && self.refresh_access_token().await {
                    refreshed = true;
                    continue;
                }
                self.expire_session(response.status);
                return Err(ApiError::Unauthorized);
            }

            if !response.is_success() {
                debug!(status = response.status, path, "request failed");
                return Err(ApiError::from_response(response.status, &response.body));
            }
            return Ok(response);
        }
    }

    /// One refresh attempt; true when a new access token was stored
    async fn refresh_access_token(&self) -> bool {
        let Some(refresh) = self.session.refresh_token() else {
            return false;
        };
        let Ok(body) = encode(&RefreshArgs { refresh: &refresh }) else {
            return false;
        };
        let request = HttpRequest {
            method: Method::Post,
            url: format!("{}{}", self.base_url, Endpoint::AuthRefresh.path()),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: Some(body),
        };

        let response = match self.transport.send(request).await {
            Ok(r) if r.is_success() => r,
            Ok(r) => {
                warn!(status = r.status, "token refresh rejected");
                return false;
            }
            Err(e) => {
                warn!(error = %e, "token refresh failed");
                return false;
            }
        };
        let tokens: RefreshedTokens = match parse_body(&response.body) {
            Ok(t) => t,
            Err(e) => {
                warn!(error = %e, "token refresh returned an unexpected body");
                return false;
            }
        };
        if self.session.set_access_token(&tokens.access).is_err() {
            return false;
        }
        if let Some(rotated) = tokens.refresh {
            if let Err(e) = self.session.set_refresh_token(&rotated) {
                warn!(error = %e, "rotated refresh token could not be stored");
            }
        }
        info!("access token refreshed");
        true
    }

    fn expire_session(&self, status: u16) {
        warn!(status, "authorization failed; clearing session");
        self.session.clear();
        if let Some(hook) = &self.on_unauthorized {
            hook();
        }
    }
}
