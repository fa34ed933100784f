//! Wire types shared by the endpoint methods

use chrono::{DateTime, Utc};
use motordesk_core::User;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Credentials for `POST /v1/auth/login`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login payload inside the response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: User,
    /// Access token (the backend's historical field name)
    pub auth_token: String,
    /// Refresh token
    pub rf_token: String,
}

/// Body of `POST /v1/auth/refresh`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// New token pair returned by a successful refresh
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub access_token: String,
    pub refresh_token: String,
}

/// The backend wraps every payload as `{ "data": ... }`
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
    #[serde(default)]
    pub total: Option<u64>,
}

/// A listed collection plus the row count the dashboard paginates on
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

impl<T> From<Envelope<Vec<T>>> for Page<T> {
    fn from(envelope: Envelope<Vec<T>>) -> Self {
        let total = envelope.total.unwrap_or(envelope.data.len() as u64);
        Self {
            items: envelope.data,
            total,
        }
    }
}

/// Lifecycle position of a motor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MotorStatus {
    In,
    Overhauling,
    Trial,
    Available,
    Fault,
    Out,
}

impl MotorStatus {
    pub const ALL: [Self; 6] = [
        Self::In,
        Self::Overhauling,
        Self::Trial,
        Self::Available,
        Self::Fault,
        Self::Out,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::In => "In",
            Self::Overhauling => "Overhauling",
            Self::Trial => "Trial",
            Self::Available => "Available",
            Self::Fault => "Fault",
            Self::Out => "Out",
        }
    }
}

impl fmt::Display for MotorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MotorStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown motor status: {s}"))
    }
}

/// A motor record as listed by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Motor {
    pub id: String,
    pub current_status: MotorStatus,
    #[serde(default)]
    pub serial_no: Option<String>,
    #[serde(default)]
    pub motor_id: Option<String>,
    #[serde(default)]
    pub eq_code: Option<String>,
    #[serde(default)]
    pub kw: Option<String>,
    #[serde(default)]
    pub rpm: Option<u32>,
    #[serde(default)]
    pub frame: Option<String>,
    #[serde(default)]
    pub amp: Option<String>,
    #[serde(default)]
    pub voltage: Option<String>,
    #[serde(default)]
    pub mounting: Option<String>,
    #[serde(default)]
    pub make: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub bearing_de: Option<String>,
    #[serde(default)]
    pub bearing_nde: Option<String>,
    #[serde(default)]
    pub motor_condition: Option<String>,
    #[serde(default)]
    pub remark: Option<String>,
    #[serde(default)]
    pub parts: Vec<String>,
    #[serde(default)]
    pub in_at_date: Option<String>,
    #[serde(default)]
    pub in_at_time: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Intake registration for `POST /v1/motors/in`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMotor {
    pub serial_no: String,
    pub motor_id: String,
    pub kw: String,
    pub rpm: u32,
    pub frame: String,
    pub amp: String,
    pub voltage: String,
    pub mounting: String,
    pub make: String,
    // The intake form spells the bearing fields upper-case.
    #[serde(rename = "bearing_DE")]
    pub bearing_de: String,
    #[serde(rename = "bearing_NDE")]
    pub bearing_nde: String,
    pub in_at_date: String,
    pub in_at_time: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

/// Overhaul outcome sent with `move-to-trial`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OverhaulReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parts: Option<Vec<String>>,
}

/// Electrical readings recorded when a trial ends
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialReport {
    pub motor_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    pub resistance_ry: f64,
    pub resistance_yb: f64,
    pub resistance_rb: f64,
    pub ir_ph_to_ph: f64,
    pub ir_ph_to_e: f64,
}

/// Fault details sent with `move-to-fault`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FaultReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eq_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parts: Option<Vec<String>>,
}

/// Installation details sent with `move-to-out`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub motor_condition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

/// Filters for `GET /v1/motors`
#[derive(Debug, Clone, Default)]
pub struct MotorQuery {
    pub status: Option<MotorStatus>,
    /// Inclusive lower date bound, `DD-MM-YYYY`
    pub from: Option<String>,
    /// Inclusive upper date bound, `DD-MM-YYYY`
    pub to: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl MotorQuery {
    /// Only motors currently in the given status
    pub fn with_status(status: MotorStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub(crate) fn params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(status) = self.status {
            params.push(("status".to_string(), status.to_string()));
        }
        if let Some(from) = &self.from {
            params.push(("from".to_string(), from.clone()));
        }
        if let Some(to) = &self.to {
            params.push(("to".to_string(), to.clone()));
        }
        if let Some(page) = self.page {
            params.push(("page".to_string(), page.to_string()));
        }
        if let Some(per_page) = self.per_page {
            params.push(("per_page".to_string(), per_page.to_string()));
        }
        params
    }
}

/// New operator account for `POST /v1/users`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub phone: String,
    pub password: String,
    pub display_name: String,
    pub role_id: String,
}

/// Assignable role
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: String,
    pub role: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn motor_status_round_trip() {
        for status in MotorStatus::ALL {
            assert_eq!(status.as_str().parse::<MotorStatus>().unwrap(), status);
        }
        assert_eq!("overhauling".parse::<MotorStatus>().unwrap(), MotorStatus::Overhauling);
        assert!("Scrapped".parse::<MotorStatus>().is_err());
    }

    #[test]
    fn motor_status_serializes_as_wire_name() {
        let json = serde_json::to_string(&MotorStatus::Available).unwrap();
        assert_eq!(json, "\"Available\"");
    }

    #[test]
    fn page_falls_back_to_item_count() {
        let envelope: Envelope<Vec<u8>> =
            serde_json::from_value(serde_json::json!({ "data": [1, 2, 3] })).unwrap();
        let page = Page::from(envelope);
        assert_eq!(page.total, 3);

        let envelope: Envelope<Vec<u8>> =
            serde_json::from_value(serde_json::json!({ "data": [1], "total": 40 })).unwrap();
        assert_eq!(Page::from(envelope).total, 40);
    }

    #[test]
    fn new_motor_spells_bearing_fields_like_the_intake_form() {
        let motor = NewMotor {
            serial_no: "SN-1".into(),
            motor_id: "M-1".into(),
            kw: "75".into(),
            rpm: 1480,
            frame: "315M".into(),
            amp: "132".into(),
            voltage: "415".into(),
            mounting: "B3".into(),
            make: "ABB".into(),
            bearing_de: "6319".into(),
            bearing_nde: "6316".into(),
            in_at_date: "04-08-2026".into(),
            in_at_time: "10:30".into(),
            location: "Kiln".into(),
            remark: None,
        };
        let value = serde_json::to_value(&motor).unwrap();
        assert!(value.get("bearing_DE").is_some());
        assert!(value.get("bearing_NDE").is_some());
        assert!(value.get("remark").is_none());
    }
}
