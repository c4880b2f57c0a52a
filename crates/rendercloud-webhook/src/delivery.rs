//! Processing of a single inbound delivery.
//!
//! A delivery starts `Received`, moves to one of `SignatureVerified`,
//! `SignatureRejected` or `VerificationSkipped`, and every delivery that was
//! not rejected ends `Forwarded` with a normalized envelope. Rejections
//! carry no data downstream.

use std::fmt;

use axum::http::{HeaderMap, header::CONTENT_TYPE};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::signature::{SIGNATURE_HEADER, SignatureCheck, verify_signature};

/// Where a delivery is in its processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryState {
    Received,
    SignatureVerified,
    SignatureRejected,
    VerificationSkipped,
    Forwarded,
}

/// Headers of a delivery that matter to processing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryHeaders {
    pub signature: Option<String>,
    pub content_type: Option<String>,
}

impl DeliveryHeaders {
    pub fn from_header_map(headers: &HeaderMap) -> Self {
        let get = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        Self {
            signature: get(SIGNATURE_HEADER),
            content_type: get(CONTENT_TYPE.as_str()),
        }
    }
}

/// Why a delivery was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    SignatureMismatch,
    InvalidFormat,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::SignatureMismatch => f.write_str("Signature verification failed"),
            Rejection::InvalidFormat => f.write_str("Invalid signature format"),
        }
    }
}

/// Final result of processing a delivery.
#[derive(Debug, Clone, PartialEq)]
pub enum DeliveryOutcome {
    Forwarded {
        /// `SignatureVerified` or `VerificationSkipped`.
        verification: DeliveryState,
        envelope: Value,
    },
    Rejected(Rejection),
}

/// A delivery moving through its states.
#[derive(Debug)]
pub struct Delivery {
    body: Value,
    headers: DeliveryHeaders,
    state: DeliveryState,
}

impl Delivery {
    pub fn receive(body: Value, headers: DeliveryHeaders) -> Self {
        Self {
            body,
            headers,
            state: DeliveryState::Received,
        }
    }

    pub fn state(&self) -> DeliveryState {
        self.state
    }

    /// Check the signature.
    ///
    /// Skipped when verification is off, when no secret is stored, or when
    /// the delivery carries no signature header.
    pub fn verify(&mut self, enabled: bool, secret: Option<&str>) -> Result<(), Rejection> {
        let secret = secret.filter(|s| !s.is_empty());
        let signature = self.headers.signature.as_deref().filter(|s| !s.is_empty());

        let (Some(secret), Some(signature), true) = (secret, signature, enabled) else {
            if enabled && secret.is_some() {
                warn!("delivery has no signature header, forwarding unverified");
            }
            self.state = DeliveryState::VerificationSkipped;
            return Ok(());
        };

        match verify_signature(&self.body, secret, signature) {
            SignatureCheck::Valid => {
                self.state = DeliveryState::SignatureVerified;
                Ok(())
            }
            SignatureCheck::Mismatch => {
                self.state = DeliveryState::SignatureRejected;
                Err(Rejection::SignatureMismatch)
            }
            SignatureCheck::InvalidFormat => {
                self.state = DeliveryState::SignatureRejected;
                Err(Rejection::InvalidFormat)
            }
        }
    }

    /// Build the envelope passed downstream. Fields absent from the body or
    /// headers are left out.
    pub fn forward(mut self) -> Value {
        let mut envelope = Map::new();
        if let Value::Object(body) = &mut self.body {
            for key in ["id", "type", "timestamp", "data"] {
                if let Some(value) = body.remove(key) {
                    envelope.insert(key.to_string(), value);
                }
            }
        }

        let mut headers = Map::new();
        if let Some(sig) = self.headers.signature.take() {
            headers.insert(SIGNATURE_HEADER.to_string(), Value::String(sig));
        }
        if let Some(ct) = self.headers.content_type.take() {
            headers.insert(CONTENT_TYPE.as_str().to_string(), Value::String(ct));
        }
        envelope.insert("headers".to_string(), Value::Object(headers));

        self.state = DeliveryState::Forwarded;
        debug!(state = ?self.state, "delivery forwarded");
        Value::Object(envelope)
    }
}

/// Verify a delivery and, unless rejected, normalize it for forwarding.
pub fn process_delivery(
    body: Value,
    headers: DeliveryHeaders,
    verify_signature: bool,
    secret: Option<&str>,
) -> DeliveryOutcome {
    let mut delivery = Delivery::receive(body, headers);
    match delivery.verify(verify_signature, secret) {
        Ok(()) => {
            let verification = delivery.state();
            DeliveryOutcome::Forwarded {
                verification,
                envelope: delivery.forward(),
            }
        }
        Err(rejection) => {
            warn!(reason = %rejection, "delivery rejected");
            DeliveryOutcome::Rejected(rejection)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::compute_signature;
    use serde_json::json;

    fn body() -> Value {
        json!({
            "id": "evt-1",
            "type": "deploy_succeeded",
            "timestamp": "2024-05-01T12:00:00Z",
            "data": {"serviceId": "srv-1"},
            "extra": true,
        })
    }

    fn signed(secret: &str) -> DeliveryHeaders {
        DeliveryHeaders {
            signature: Some(compute_signature(&body(), secret)),
            content_type: Some("application/json".to_string()),
        }
    }

    #[test]
    fn test_valid_signature_forwards() {
        let headers = signed("s3cret");
        let sig = headers.signature.clone().unwrap();

        let outcome = process_delivery(body(), headers, true, Some("s3cret"));
        assert_eq!(
            outcome,
            DeliveryOutcome::Forwarded {
                verification: DeliveryState::SignatureVerified,
                envelope: json!({
                    "id": "evt-1",
                    "type": "deploy_succeeded",
                    "timestamp": "2024-05-01T12:00:00Z",
                    "data": {"serviceId": "srv-1"},
                    "headers": {
                        "x-render-signature": sig,
                        "content-type": "application/json",
                    },
                }),
            }
        );
    }

    #[test]
    fn test_wrong_secret_rejects() {
        let outcome = process_delivery(body(), signed("other"), true, Some("s3cret"));
        assert_eq!(outcome, DeliveryOutcome::Rejected(Rejection::SignatureMismatch));
    }

    #[test]
    fn test_short_signature_is_invalid_format() {
        let headers = DeliveryHeaders {
            signature: Some("deadbeef".to_string()),
            content_type: None,
        };
        let outcome = process_delivery(body(), headers, true, Some("s3cret"));
        assert_eq!(outcome, DeliveryOutcome::Rejected(Rejection::InvalidFormat));
        assert_eq!(Rejection::InvalidFormat.to_string(), "Invalid signature format");
    }

    #[test]
    fn test_verification_disabled_skips() {
        let outcome = process_delivery(body(), signed("other"), false, Some("s3cret"));
        assert!(matches!(
            outcome,
            DeliveryOutcome::Forwarded {
                verification: DeliveryState::VerificationSkipped,
                ..
            }
        ));
    }

    #[test]
    fn test_no_secret_skips() {
        let outcome = process_delivery(body(), signed("other"), true, None);
        assert!(matches!(
            outcome,
            DeliveryOutcome::Forwarded {
                verification: DeliveryState::VerificationSkipped,
                ..
            }
        ));
    }

    #[test]
    fn test_missing_header_with_secret_skips() {
        let outcome = process_delivery(body(), DeliveryHeaders::default(), true, Some("s3cret"));
        let DeliveryOutcome::Forwarded {
            verification,
            envelope,
        } = outcome
        else {
            panic!("expected forwarded delivery");
        };
        assert_eq!(verification, DeliveryState::VerificationSkipped);
        assert_eq!(envelope["headers"], json!({}));
    }

    #[test]
    fn test_state_transitions() {
        let mut delivery = Delivery::receive(body(), signed("s3cret"));
        assert_eq!(delivery.state(), DeliveryState::Received);

        delivery.verify(true, Some("s3cret")).unwrap();
        assert_eq!(delivery.state(), DeliveryState::SignatureVerified);

        let mut rejected = Delivery::receive(body(), signed("other"));
        assert!(rejected.verify(true, Some("s3cret")).is_err());
        assert_eq!(rejected.state(), DeliveryState::SignatureRejected);
    }

    #[test]
    fn test_envelope_omits_absent_fields() {
        let outcome = process_delivery(json!({"id": "evt-2"}), DeliveryHeaders::default(), false, None);
        let DeliveryOutcome::Forwarded { envelope, .. } = outcome else {
            panic!("expected forwarded delivery");
        };
        assert_eq!(envelope, json!({"id": "evt-2", "headers": {}}));
    }

    #[test]
    fn test_headers_from_map() {
        let mut map = HeaderMap::new();
        map.insert("x-render-signature", "abc".parse().unwrap());
        map.insert("content-type", "application/json".parse().unwrap());
        let headers = DeliveryHeaders::from_header_map(&map);
        assert_eq!(headers.signature.as_deref(), Some("abc"));
        assert_eq!(headers.content_type.as_deref(), Some("application/json"));
    }
}
