//! Motordesk API client
//!
//! Requests go through a single dispatch path: the current access token is
//! attached, a 401 for an authenticated call runs one refresh-and-replay
//! cycle (see [`refresh`]), and every failure is normalized into
//! [`ApiError`].

pub mod auth;
pub mod motors;
mod refresh;
pub mod users;

use crate::error::ApiError;
use crate::types::Envelope;
use motordesk_core::{MemorySessionStore, Session, SessionStore};
use refresh::RefreshState;
use reqwest::{Method, StatusCode, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

/// Callback invoked when the session is cleared by a failed refresh; the
/// host application routes this to its login entry point.
pub type SessionExpiredHook = Arc<dyn Fn() + Send + Sync>;

/// Motordesk API client
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: reqwest::Client,
    base_url: String,
    store: Arc<dyn SessionStore>,
    /// Live session; the store is the durable copy.
    session: RwLock<Option<Session>>,
    refresh: Mutex<RefreshState>,
    on_session_expired: Option<SessionExpiredHook>,
}

/// One outgoing call, kept re-issuable so a replay after refresh sends the
/// same method, path, query, and body.
#[derive(Debug, Clone)]
pub(crate) struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub(crate) fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub(crate) fn query(mut self, params: Vec<(String, String)>) -> Self {
        self.query = params;
        self
    }

    pub(crate) fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }
}

impl ApiClient {
    /// Create a new client with default configuration
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        Self::builder().base_url(base_url).build()
    }

    /// Create a new client builder
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Snapshot of the current session
    pub async fn session(&self) -> Option<Session> {
        self.inner.session.read().await.clone()
    }

    pub(crate) async fn access_token(&self) -> Option<String> {
        self.inner
            .session
            .read()
            .await
            .as_ref()
            .map(|session| session.access_token.clone())
    }

    /// Issue the request once, with the given token if any. No retry logic
    /// lives here; this is also the replay path after a refresh.
    pub(crate) async fn send(
        &self,
        request: &ApiRequest,
        token: Option<&str>,
    ) -> Result<reqwest::Response, ApiError> {
        let url = format!("{}{}", self.inner.base_url, request.path);
        let mut builder = self.inner.http.request(request.method.clone(), url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        Ok(builder.send().await?)
    }

    /// Send with the live token; on a 401 for an authenticated call, run
    /// one refresh cycle and replay. A second 401 goes back to the caller.
    pub(crate) async fn dispatch(&self, request: ApiRequest) -> Result<reqwest::Response, ApiError> {
        let token = self.access_token().await;
        let response = self.send(&request, token.as_deref()).await?;
        if response.status() != StatusCode::UNAUTHORIZED || token.is_none() {
            return Ok(response);
        }

        debug!(path = %request.path, "access token rejected, joining refresh cycle");
        let token = self.refreshed_token().await?;
        self.send(&request, Some(&token)).await
    }

    /// Execute a request and decode the JSON body
    pub(crate) async fn execute<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<T, ApiError> {
        let response = self.dispatch(request).await?;
        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            Err(ApiError::from_response(response).await)
        }
    }

    /// Execute a request and unwrap the backend's `{ "data": ... }` envelope
    pub(crate) async fn execute_enveloped<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<T, ApiError> {
        let envelope: Envelope<T> = self.execute(request).await?;
        Ok(envelope.data)
    }

    /// GET a JSON resource
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(ApiRequest::new(Method::GET, path)).await
    }

    /// POST a JSON body
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(ApiRequest::new(Method::POST, path).json(body)?)
            .await
    }

    /// PUT a JSON body
    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(ApiRequest::new(Method::PUT, path).json(body)?)
            .await
    }

    /// PATCH a JSON body
    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(ApiRequest::new(Method::PATCH, path).json(body)?)
            .await
    }

    /// DELETE a resource
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(ApiRequest::new(Method::DELETE, path)).await
    }

    pub(crate) async fn install_session(&self, session: Session) -> Result<(), ApiError> {
        self.inner.store.save(&session).await?;
        *self.inner.session.write().await = Some(session);
        Ok(())
    }

    pub(crate) async fn drop_session(&self) -> Result<(), ApiError> {
        *self.inner.session.write().await = None;
        self.inner.store.clear().await?;
        Ok(())
    }
}

/// Builder for ApiClient
#[derive(Default)]
pub struct ApiClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    store: Option<Arc<dyn SessionStore>>,
    on_session_expired: Option<SessionExpiredHook>,
}

impl ApiClientBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Persist sessions through the given store instead of the in-memory
    /// default
    pub fn session_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Invoked when a failed refresh clears the session
    pub fn on_session_expired(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_session_expired = Some(Arc::new(hook));
        self
    }

    /// Build the client
    pub fn build(self) -> Result<ApiClient, ApiError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ApiError::Configuration("base_url is required".into()))?;

        // Ensure base_url ends without a trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();

        let mut builder = reqwest::ClientBuilder::new();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        builder = builder.user_agent(
            self.user_agent
                .unwrap_or_else(|| "motordesk-client/0.1.0".to_string()),
        );
        let http = builder.build()?;

        Ok(ApiClient {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                store: self
                    .store
                    .unwrap_or_else(|| Arc::new(MemorySessionStore::new())),
                session: RwLock::new(None),
                refresh: Mutex::new(RefreshState::new()),
                on_session_expired: self.on_session_expired,
            }),
        })
    }
}
