use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    /// Loaded but `initialize()` has not succeeded yet.
    Degraded,
}

/// Point-in-time view of the adapter for host health checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub service: String,
    pub status: HealthStatus,
    pub initialized: bool,
    pub transport: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthReport {
    pub fn new(service: impl Into<String>, transport: impl Into<String>, initialized: bool) -> Self {
        Self {
            service: service.into(),
            status: if initialized {
                HealthStatus::Healthy
            } else {
                HealthStatus::Degraded
            },
            initialized,
            transport: transport.into(),
            timestamp: Utc::now(),
        }
    }
}
