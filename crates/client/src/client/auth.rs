//! Session lifecycle methods

use super::{ApiClient, ApiRequest};
use crate::error::ApiError;
use crate::types::{LoginRequest, LoginResponse};
use motordesk_core::{Session, User};
use reqwest::Method;
use tracing::debug;

impl ApiClient {
    /// Load a persisted session into the live slot. Returns whether one
    /// was found.
    pub async fn restore_session(&self) -> Result<bool, ApiError> {
        let session = self.inner.store.load().await?;
        let found = session.is_some();
        if found {
            debug!("restored persisted session");
        }
        *self.inner.session.write().await = session;
        Ok(found)
    }

    /// Authenticate and establish a session
    pub async fn login(&self, email: &str, password: &str) -> Result<User, ApiError> {
        let request = ApiRequest::new(Method::POST, "/v1/auth/login").json(&LoginRequest {
            email: email.to_owned(),
            password: password.to_owned(),
        })?;
        let response: LoginResponse = self.execute_enveloped(request).await?;

        let session = Session {
            user: response.user.clone(),
            access_token: response.auth_token,
            refresh_token: response.rf_token,
        };
        self.install_session(session).await?;
        Ok(response.user)
    }

    /// Forget the session. Local only; the backend has no logout endpoint.
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.drop_session().await
    }
}
