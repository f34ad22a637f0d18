use serde::{Deserialize, Serialize};

use crate::errors::ErrorCode;
use crate::types::emoji::EmojiRecord;

/// Error body returned by every JSON endpoint.
///
/// `error` stays a plain string so existing clients keep working; `code`
/// carries the machine-readable kind.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: String,
    pub code: ErrorCode,
}

impl ApiErrorResponse {
    pub fn new(error: impl Into<String>, code: ErrorCode) -> Self {
        Self {
            error: error.into(),
            code,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
}

/// Successful generation: exactly one public storage URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub output: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmojiListResponse {
    pub emojis: Vec<EmojiRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub service: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<Vec<HealthCheck>>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl HealthResponse {
    pub fn healthy(service: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Healthy,
            service: service.into(),
            version: version.into(),
            checks: None,
        }
    }

    pub fn with_checks(mut self, checks: Vec<HealthCheck>) -> Self {
        let has_unhealthy = checks.iter().any(|c| c.status == HealthStatus::Unhealthy);
        let has_degraded = checks.iter().any(|c| c.status == HealthStatus::Degraded);

        self.status = if has_unhealthy {
            HealthStatus::Unhealthy
        } else if has_degraded {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        };
        self.checks = Some(checks);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_body_keeps_error_as_string() {
        let body = ApiErrorResponse::new("Unauthorized", ErrorCode::Unauthorized);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["error"], "Unauthorized");
        assert_eq!(json["code"], "unauthorized");
    }

    #[test]
    fn health_degrades_with_its_worst_check() {
        let resp = HealthResponse::healthy("emoji-maker", "0.1.0").with_checks(vec![
            HealthCheck {
                name: "database".into(),
                status: HealthStatus::Healthy,
                message: None,
            },
            HealthCheck {
                name: "storage".into(),
                status: HealthStatus::Degraded,
                message: Some("slow".into()),
            },
        ]);
        assert_eq!(resp.status, HealthStatus::Degraded);
    }
}
