//! User and role endpoints

use super::{ApiClient, ApiRequest};
use crate::error::ApiError;
use crate::types::{NewUser, Role};
use motordesk_core::User;
use reqwest::Method;
use serde_json::Value;

impl ApiClient {
    /// List operator accounts
    pub async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        self.execute_enveloped(ApiRequest::new(Method::GET, "/v1/users"))
            .await
    }

    /// Create an operator account
    pub async fn register_user(&self, user: &NewUser) -> Result<Value, ApiError> {
        self.execute(ApiRequest::new(Method::POST, "/v1/users").json(user)?)
            .await
    }

    /// List assignable roles
    pub async fn list_roles(&self) -> Result<Vec<Role>, ApiError> {
        self.execute_enveloped(ApiRequest::new(Method::GET, "/v1/users/roles"))
            .await
    }
}
