//! Session-aware HTTP client
//!
//! Wraps `reqwest` with the session concerns every authenticated call shares:
//! - attaches the bearer token, refreshing it first when the `exp` claim says
//!   it is stale
//! - retries exactly once after a 401, behind the single-flight refresh gate
//! - collapses identical concurrent GETs into one network call
//! - clears the session and broadcasts `SessionState::SignedOut` when the
//!   refresh token itself is rejected (the host navigates to login on that
//!   signal)
//!
//! # Example
//!
//! ```rust,no_run
//! use crewdeck_api_client::{ClientConfig, MemoryStore, SessionClient};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = SessionClient::new(
//!     ClientConfig::new("https://api.crewdeck.example"),
//!     Arc::new(MemoryStore::new()),
//! );
//!
//! client.login("ada", "hunter2").await?;
//! let me: serde_json::Value = client.get("/api/auth/users/me/").await?;
//! # Ok(())
//! # }
//! ```

use crate::config::ClientConfig;
use crate::dedup::{signature, DedupCache};
use crate::error::{ApiError, Result};
use crate::pagination::ListPayload;
use crate::refresh::RefreshGate;
use crate::storage::{keys, MemoryStore, SessionStore};
use crate::token::{is_expired, TokenPair};
use bytes::Bytes;
use reqwest::{header, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

const TOKEN_PATH: &str = "/api/auth/token/";
const TOKEN_REFRESH_PATH: &str = "/api/auth/token/refresh/";

/// Observable authentication state of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    SignedIn,
    SignedOut,
}

/// Response snapshot shared between deduplicated callers
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: Bytes,
}

impl RawResponse {
    /// Deserialize the body
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// Session-aware HTTP client for the Crewdeck REST API
#[derive(Clone)]
pub struct SessionClient {
    inner: Arc<Inner>,
}

struct Inner {
    config: ClientConfig,
    http: reqwest::Client,
    store: Arc<dyn SessionStore>,
    dedup: DedupCache<RawResponse>,
    gate: RefreshGate,
    state: watch::Sender<SessionState>,
}

impl SessionClient {
    /// Create a client backed by the given durable store
    pub fn new(config: ClientConfig, store: Arc<dyn SessionStore>) -> Self {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            "X-Requested-With",
            header::HeaderValue::from_static("XMLHttpRequest"),
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to build HTTP client");

        let initial = if store.get(keys::ACCESS_TOKEN).is_some() {
            SessionState::SignedIn
        } else {
            SessionState::SignedOut
        };
        let (state, _) = watch::channel(initial);

        Self {
            inner: Arc::new(Inner {
                dedup: DedupCache::new(Duration::from_millis(config.dedup_window_ms)),
                gate: RefreshGate::new(Duration::from_millis(config.refresh_cooldown_ms)),
                config,
                http,
                store,
                state,
            }),
        }
    }

    /// Create a client with an ephemeral in-memory store
    pub fn with_memory_store(config: ClientConfig) -> Self {
        Self::new(config, Arc::new(MemoryStore::new()))
    }

    /// The durable session store this client writes tokens/selections to
    pub fn storage(&self) -> &Arc<dyn SessionStore> {
        &self.inner.store
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Current authentication state
    pub fn session_state(&self) -> SessionState {
        *self.inner.state.borrow()
    }

    /// Watch authentication state changes. The transition to `SignedOut` is
    /// the cue for the host to navigate to its login entry point.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    /// Exchange credentials for a token pair and persist it
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenPair> {
        let url = self.inner.config.url(TOKEN_PATH);
        let response = self
            .inner
            .http
            .post(&url)
            .json(&serde_json::json!({ "username": username, "password": password }))
            .send()
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::Unauthorized(message));
        }
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::Server { status, message });
        }

        let pair: TokenPair = response.json().await?;
        self.inner.store.set(keys::ACCESS_TOKEN, &pair.access);
        self.inner.store.set(keys::REFRESH_TOKEN, &pair.refresh);
        self.inner.state.send_replace(SessionState::SignedIn);
        Ok(pair)
    }

    /// Destroy the local session: tokens and cached user are removed, the
    /// state channel flips to `SignedOut`. Theme/language and the last
    /// team/space selections survive for the next login.
    pub fn logout(&self) {
        Inner::clear_session(&self.inner);
    }

    /// Issue an HTTP call with the full session treatment.
    ///
    /// GETs are deduplicated by method+url+body signature; mutating verbs
    /// always execute a fresh network call.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Bytes>,
    ) -> Result<RawResponse> {
        let url = self.inner.config.url(path);

        if method == Method::GET {
            let key = signature(&method, &url, body.as_deref());
            let inner = self.inner.clone();
            self.inner
                .dedup
                .get_or_run(&key, move || Inner::execute(inner, method, url, body))
                .await
                .map_err(ApiError::shared)
        } else {
            Inner::execute(self.inner.clone(), method, url, body).await
        }
    }

    /// GET and deserialize
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request(Method::GET, path, None).await?.json()
    }

    /// GET a list endpoint, preserving the envelope shape
    pub async fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<ListPayload<T>> {
        self.request(Method::GET, path, None).await?.json()
    }

    /// POST a JSON body and deserialize the response
    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let bytes = Bytes::from(serde_json::to_vec(body)?);
        self.request(Method::POST, path, Some(bytes)).await?.json()
    }

    /// PATCH a JSON body and deserialize the response
    pub async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let bytes = Bytes::from(serde_json::to_vec(body)?);
        self.request(Method::PATCH, path, Some(bytes)).await?.json()
    }

    /// PUT a JSON body and deserialize the response
    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let bytes = Bytes::from(serde_json::to_vec(body)?);
        self.request(Method::PUT, path, Some(bytes)).await?.json()
    }

    /// DELETE, discarding the (usually empty) body
    pub async fn delete(&self, path: &str) -> Result<()> {
        self.request(Method::DELETE, path, None).await?;
        Ok(())
    }
}

impl Inner {
    /// One request through the session machinery: proactive refresh of a
    /// stale token, the call itself, and a single refresh-then-retry on 401.
    async fn execute(
        inner: Arc<Inner>,
        method: Method,
        url: String,
        body: Option<Bytes>,
    ) -> Result<RawResponse> {
        let mut token = inner.store.get(keys::ACCESS_TOKEN);
        let stale = token
            .as_deref()
            .map(|t| is_expired(t, inner.config.expiry_leeway_secs))
            .unwrap_or(false);
        if stale {
            token = Some(Self::refresh_access(&inner).await?);
        }

        let response = Self::send(&inner, &method, &url, &body, token.as_deref()).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            let fresh = Self::refresh_access(&inner).await?;
            let retried = Self::send(&inner, &method, &url, &body, Some(&fresh)).await?;
            return Self::into_raw(retried).await;
        }

        Self::into_raw(response).await
    }

    async fn send(
        inner: &Arc<Inner>,
        method: &Method,
        url: &str,
        body: &Option<Bytes>,
        token: Option<&str>,
    ) -> Result<reqwest::Response> {
        let mut request = inner.http.request(method.clone(), url);
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        if let Some(body) = body {
            request = request
                .header(header::CONTENT_TYPE, "application/json")
                .body(body.clone());
        }
        Ok(request.send().await?)
    }

    async fn into_raw(response: reqwest::Response) -> Result<RawResponse> {
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::NotFound(message));
        }
        if status == StatusCode::UNAUTHORIZED {
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::Unauthorized(message));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::Server {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.bytes().await?;
        Ok(RawResponse {
            status: status.as_u16(),
            body,
        })
    }

    /// Run the single-flight refresh exchange. Any failure clears the session
    /// and surfaces as `SessionExpired`.
    async fn refresh_access(inner: &Arc<Inner>) -> Result<String> {
        let Some(refresh_token) = inner.store.get(keys::REFRESH_TOKEN) else {
            Self::clear_session(inner);
            return Err(ApiError::SessionExpired);
        };

        let exchange = {
            let inner = inner.clone();
            move || async move {
                let url = inner.config.url(TOKEN_REFRESH_PATH);
                let response = inner
                    .http
                    .post(&url)
                    .json(&serde_json::json!({ "refresh": refresh_token }))
                    .send()
                    .await?;

                if !response.status().is_success() {
                    let status = response.status().as_u16();
                    let message = response.text().await.unwrap_or_default();
                    return Err(ApiError::Server { status, message });
                }

                #[derive(serde::Deserialize)]
                struct Refreshed {
                    access: String,
                }

                let refreshed: Refreshed = response.json().await?;
                inner.store.set(keys::ACCESS_TOKEN, &refreshed.access);
                tracing::debug!("Access token refreshed");
                Ok(refreshed.access)
            }
        };

        match inner.gate.run(exchange).await {
            Ok(access) => Ok(access),
            Err(err) => {
                tracing::warn!("Token refresh failed, clearing session: {}", err);
                Self::clear_session(inner);
                Err(ApiError::SessionExpired)
            }
        }
    }

    fn clear_session(inner: &Arc<Inner>) {
        inner.store.remove(keys::ACCESS_TOKEN);
        inner.store.remove(keys::REFRESH_TOKEN);
        inner.store.remove(keys::CACHED_USER);
        inner.gate.reset();
        inner.dedup.clear();
        inner.state.send_replace(SessionState::SignedOut);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_with_store(store: Arc<MemoryStore>) -> SessionClient {
        SessionClient::new(ClientConfig::new("http://localhost:9"), store)
    }

    #[test]
    fn test_initial_state_follows_stored_token() {
        let store = Arc::new(MemoryStore::new());
        assert_eq!(
            client_with_store(store.clone()).session_state(),
            SessionState::SignedOut
        );

        store.set(keys::ACCESS_TOKEN, "tok");
        assert_eq!(
            client_with_store(store).session_state(),
            SessionState::SignedIn
        );
    }

    #[test]
    fn test_logout_clears_session_keys_only() {
        let store = Arc::new(MemoryStore::new());
        store.set(keys::ACCESS_TOKEN, "tok");
        store.set(keys::REFRESH_TOKEN, "ref");
        store.set(keys::CACHED_USER, "{}");
        store.set(keys::SELECTED_TEAM, "42");
        store.set(keys::THEME, "dark");

        let client = client_with_store(store.clone());
        let watcher = client.subscribe();
        client.logout();

        assert_eq!(store.get(keys::ACCESS_TOKEN), None);
        assert_eq!(store.get(keys::REFRESH_TOKEN), None);
        assert_eq!(store.get(keys::CACHED_USER), None);
        // Preferences and selections survive a logout
        assert_eq!(store.get(keys::SELECTED_TEAM), Some("42".to_string()));
        assert_eq!(store.get(keys::THEME), Some("dark".to_string()));

        assert_eq!(client.session_state(), SessionState::SignedOut);
        assert!(watcher.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_expired_token_without_refresh_token_fails_closed() {
        // Expired access token, no refresh token: the request must fail with
        // SessionExpired without ever touching the network.
        let store = Arc::new(MemoryStore::new());
        store.set(keys::ACCESS_TOKEN, "not-a-decodable-jwt");

        let client = client_with_store(store.clone());
        let err = client
            .get::<serde_json::Value>("/api/core/tasks/")
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::SessionExpired));
        assert_eq!(store.get(keys::ACCESS_TOKEN), None);
        assert_eq!(client.session_state(), SessionState::SignedOut);
    }
}
