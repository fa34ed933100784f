//! Motor endpoints
//!
//! The lifecycle moves mirror the backend's transition routes: a motor is
//! registered In, moved to Overhauling, to Trial with the overhaul report,
//! to Available with its trial readings, to Fault when it fails, and to
//! Out on installation.

use super::{ApiClient, ApiRequest};
use crate::error::ApiError;
use crate::types::{
    Envelope, FaultReport, Motor, MotorQuery, NewMotor, OutReport, OverhaulReport, Page,
    TrialReport,
};
use reqwest::Method;
use serde_json::Value;

impl ApiClient {
    /// List motors, optionally filtered by status and date range
    pub async fn list_motors(&self, query: &MotorQuery) -> Result<Page<Motor>, ApiError> {
        let request = ApiRequest::new(Method::GET, "/v1/motors").query(query.params());
        let envelope: Envelope<Vec<Motor>> = self.execute(request).await?;
        Ok(Page::from(envelope))
    }

    /// Fetch a single motor (QR-scan lookup)
    pub async fn get_motor(&self, id: &str) -> Result<Motor, ApiError> {
        self.execute_enveloped(ApiRequest::new(Method::GET, format!("/v1/motors/{id}")))
            .await
    }

    /// Register a motor at intake
    pub async fn register_motor(&self, motor: &NewMotor) -> Result<Value, ApiError> {
        self.execute(ApiRequest::new(Method::POST, "/v1/motors/in").json(motor)?)
            .await
    }

    /// In -> Overhauling. The transition carries no payload.
    pub async fn move_to_overhauling(&self, id: &str) -> Result<Value, ApiError> {
        let request = ApiRequest::new(
            Method::PATCH,
            format!("/v1/motors/{id}/move-to-overhauling"),
        )
        .json(&serde_json::json!({}))?;
        self.execute(request).await
    }

    /// Overhauling -> Trial, recording the overhaul outcome
    pub async fn move_to_trial(&self, id: &str, report: &OverhaulReport) -> Result<Value, ApiError> {
        let request =
            ApiRequest::new(Method::PATCH, format!("/v1/motors/{id}/move-to-trial")).json(report)?;
        self.execute(request).await
    }

    /// Trial -> Available, recording the electrical readings
    pub async fn move_to_available(&self, id: &str, report: &TrialReport) -> Result<Value, ApiError> {
        let request = ApiRequest::new(Method::PATCH, format!("/v1/motors/{id}/move-to-available"))
            .json(report)?;
        self.execute(request).await
    }

    /// Any serviceable state -> Fault
    pub async fn move_to_fault(&self, id: &str, report: &FaultReport) -> Result<Value, ApiError> {
        let request =
            ApiRequest::new(Method::PATCH, format!("/v1/motors/{id}/move-to-fault")).json(report)?;
        self.execute(request).await
    }

    /// Available -> Out on installation
    pub async fn move_to_out(&self, id: &str, report: &OutReport) -> Result<Value, ApiError> {
        let request =
            ApiRequest::new(Method::PATCH, format!("/v1/motors/{id}/move-to-out")).json(report)?;
        self.execute(request).await
    }

    /// Update an available motor's recorded readings without a transition
    pub async fn record_installation(
        &self,
        id: &str,
        report: &TrialReport,
    ) -> Result<Value, ApiError> {
        let request =
            ApiRequest::new(Method::PATCH, format!("/v1/motors/{id}/motor-out")).json(report)?;
        self.execute(request).await
    }

    /// Dashboard counters, weekly movement series included
    pub async fn analytics(&self) -> Result<Value, ApiError> {
        self.execute_enveloped(ApiRequest::new(Method::GET, "/v1/motors/analytics"))
            .await
    }
}
