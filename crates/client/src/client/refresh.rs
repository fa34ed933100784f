//! Single-flight token refresh
//!
//! At most one refresh call is in flight at any time. A request that sees a
//! 401 while a refresh is underway parks a oneshot sender on the waiter
//! queue and suspends; when the refresh settles, waiters are released in
//! enqueue order, each replaying its own request independently. A failed
//! refresh clears the session everywhere and rejects every waiter.

use super::{ApiClient, ApiRequest};
use crate::error::{ApiError, error_message};
use crate::types::{RefreshRequest, RefreshResponse};
use reqwest::Method;
use tokio::sync::oneshot;
use tracing::{info, warn};

/// Outcome shared with queued waiters: the fresh access token, or the
/// message of the fatal refresh error.
type RefreshOutcome = Result<String, String>;

pub(crate) struct RefreshState {
    refreshing: bool,
    waiters: Vec<oneshot::Sender<RefreshOutcome>>,
}

impl RefreshState {
    pub(crate) fn new() -> Self {
        Self {
            refreshing: false,
            waiters: Vec::new(),
        }
    }
}

impl ApiClient {
    /// Obtain a fresh access token, joining the in-flight refresh if one
    /// exists and starting it otherwise.
    pub(crate) async fn refreshed_token(&self) -> Result<String, ApiError> {
        let waiting = {
            let mut state = self.inner.refresh.lock().await;
            if state.refreshing {
                let (tx, rx) = oneshot::channel();
                state.waiters.push(tx);
                Some(rx)
            } else {
                state.refreshing = true;
                None
            }
        };

        if let Some(rx) = waiting {
            // Suspended until the in-flight refresh settles.
            return match rx.await {
                Ok(Ok(token)) => Ok(token),
                Ok(Err(message)) => Err(ApiError::SessionExpired(message)),
                Err(_) => Err(ApiError::SessionExpired("refresh was abandoned".to_string())),
            };
        }

        let outcome = self.run_refresh().await;

        let waiters = {
            let mut state = self.inner.refresh.lock().await;
            state.refreshing = false;
            std::mem::take(&mut state.waiters)
        };
        // Release in enqueue order; a dropped receiver is a caller that
        // gave up and is not an error here.
        for waiter in waiters {
            let _ = waiter.send(outcome.clone());
        }

        outcome.map_err(ApiError::SessionExpired)
    }

    /// Exactly one refresh call per expiry event. Any failure here is
    /// fatal for the session: rejected token and unreachable endpoint are
    /// treated identically.
    async fn run_refresh(&self) -> RefreshOutcome {
        let refresh_token = {
            let session = self.inner.session.read().await;
            match session.as_ref() {
                Some(session) => session.refresh_token.clone(),
                None => return Err("no session to refresh".to_string()),
            }
        };

        let request = ApiRequest::new(Method::POST, "/v1/auth/refresh")
            .json(&RefreshRequest { refresh_token })
            .map_err(|err| err.to_string())?;

        // The refresh call itself runs unauthenticated and outside the
        // retry machinery.
        let response = match self.send(&request, None).await {
            Ok(response) => response,
            Err(err) => return Err(self.fail_session(err.to_string()).await),
        };

        let status = response.status();
        if !status.is_success() {
            let message = error_message(response).await;
            return Err(self.fail_session(message).await);
        }

        let tokens: RefreshResponse = match response.json().await {
            Ok(tokens) => tokens,
            Err(err) => return Err(self.fail_session(err.to_string()).await),
        };

        let access_token = tokens.access_token.clone();
        {
            let mut slot = self.inner.session.write().await;
            if let Some(session) = slot.as_mut() {
                session.access_token = tokens.access_token;
                session.refresh_token = tokens.refresh_token;
                if let Err(err) = self.inner.store.save(session).await {
                    warn!("failed to persist refreshed session: {err}");
                }
            }
        }
        info!("session tokens refreshed");
        Ok(access_token)
    }

    /// Refresh failed for good: clear the session everywhere and signal
    /// the host application to route to login.
    async fn fail_session(&self, message: String) -> String {
        warn!("session refresh failed: {message}");
        *self.inner.session.write().await = None;
        if let Err(err) = self.inner.store.clear().await {
            warn!("failed to clear stored session: {err}");
        }
        if let Some(hook) = &self.inner.on_session_expired {
            hook();
        }
        message
    }
}
