//! Event types Render can deliver.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::WebhookError;

/// A provider event a subscription can listen to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookEventType {
    CertificateRenewed,
    DeployCanceled,
    DeployFailed,
    DeployStarted,
    DeploySucceeded,
    MaintenanceCompleted,
    MaintenanceStarted,
    ServerAvailable,
    ServerFailed,
    ServiceCreated,
    ServiceDeleted,
    ServiceResumed,
    ServiceSuspended,
}

impl WebhookEventType {
    pub const ALL: &'static [WebhookEventType] = &[
        WebhookEventType::CertificateRenewed,
        WebhookEventType::DeployCanceled,
        WebhookEventType::DeployFailed,
        WebhookEventType::DeployStarted,
        WebhookEventType::DeploySucceeded,
        WebhookEventType::MaintenanceCompleted,
        WebhookEventType::MaintenanceStarted,
        WebhookEventType::ServerAvailable,
        WebhookEventType::ServerFailed,
        WebhookEventType::ServiceCreated,
        WebhookEventType::ServiceDeleted,
        WebhookEventType::ServiceResumed,
        WebhookEventType::ServiceSuspended,
    ];

    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            WebhookEventType::CertificateRenewed => "certificate_renewed",
            WebhookEventType::DeployCanceled => "deploy_canceled",
            WebhookEventType::DeployFailed => "deploy_failed",
            WebhookEventType::DeployStarted => "deploy_started",
            WebhookEventType::DeploySucceeded => "deploy_succeeded",
            WebhookEventType::MaintenanceCompleted => "maintenance_completed",
            WebhookEventType::MaintenanceStarted => "maintenance_started",
            WebhookEventType::ServerAvailable => "server_available",
            WebhookEventType::ServerFailed => "server_failed",
            WebhookEventType::ServiceCreated => "service_created",
            WebhookEventType::ServiceDeleted => "service_deleted",
            WebhookEventType::ServiceResumed => "service_resumed",
            WebhookEventType::ServiceSuspended => "service_suspended",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            WebhookEventType::CertificateRenewed => "TLS certificate was renewed",
            WebhookEventType::DeployCanceled => "Deployment was canceled",
            WebhookEventType::DeployFailed => "Deployment failed",
            WebhookEventType::DeployStarted => "Deployment has started",
            WebhookEventType::DeploySucceeded => "Deployment completed successfully",
            WebhookEventType::MaintenanceCompleted => "Scheduled maintenance completed",
            WebhookEventType::MaintenanceStarted => "Scheduled maintenance started",
            WebhookEventType::ServerAvailable => "Server became available after being down",
            WebhookEventType::ServerFailed => "Server failure detected",
            WebhookEventType::ServiceCreated => "New service was created",
            WebhookEventType::ServiceDeleted => "Service was deleted",
            WebhookEventType::ServiceResumed => "Service was resumed from suspended state",
            WebhookEventType::ServiceSuspended => "Service was suspended",
        }
    }

    /// Parse a list of wire names, failing on the first unknown one.
    pub fn parse_list<I, S>(names: I) -> Result<Vec<Self>, WebhookError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names.into_iter().map(|n| n.as_ref().parse()).collect()
    }
}

impl fmt::Display for WebhookEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WebhookEventType {
    type Err = WebhookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        WebhookEventType::ALL
            .iter()
            .copied()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| WebhookError::UnknownEvent(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thirteen_events() {
        assert_eq!(WebhookEventType::ALL.len(), 13);
    }

    #[test]
    fn test_wire_names_match_serde() {
        for event in WebhookEventType::ALL {
            let json = serde_json::to_value(event).unwrap();
            assert_eq!(json, event.as_str());
            assert_eq!(event.as_str().parse::<WebhookEventType>().unwrap(), *event);
        }
    }

    #[test]
    fn test_parse_list() {
        let events = WebhookEventType::parse_list(["deploy_failed", " server_failed "]).unwrap();
        assert_eq!(
            events,
            vec![WebhookEventType::DeployFailed, WebhookEventType::ServerFailed]
        );

        let err = WebhookEventType::parse_list(["deploy_exploded"]).unwrap_err();
        assert_eq!(err.to_string(), "Unknown webhook event: deploy_exploded");
    }
}
