//! Stripe webhook signature verification.
//!
//! Stripe signs `"{t}.{raw_body}"` with HMAC-SHA256 using the endpoint secret
//! and sends `Stripe-Signature: t=<unix>,v1=<hex>[,v1=<hex>...]`. Any matching
//! `v1` entry within the tolerance window accepts the payload.

use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::errors::{NoemaError, NoemaResult};

type HmacSha256 = Hmac<Sha256>;

/// Maximum age of a signature timestamp, in seconds.
pub const DEFAULT_TOLERANCE_SECS: i64 = 300;

/// Parsed `Stripe-Signature` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    pub timestamp: i64,
    pub v1: Vec<Vec<u8>>,
}

impl SignatureHeader {
    pub fn parse(header: &str) -> NoemaResult<Self> {
        let mut timestamp = None;
        let mut v1 = Vec::new();

        for item in header.split(',') {
            let Some((k, v)) = item.trim().split_once('=') else {
                continue;
            };
            match k {
                "t" => {
                    timestamp = Some(v.parse::<i64>().map_err(|_| {
                        NoemaError::invalid_argument("Unable to extract timestamp and signatures from header")
                    })?)
                }
                "v1" => {
                    if let Ok(sig) = hex::decode(v) {
                        v1.push(sig);
                    }
                }
                _ => {}
            }
        }

        match timestamp {
            Some(timestamp) if !v1.is_empty() => Ok(Self { timestamp, v1 }),
            _ => Err(NoemaError::invalid_argument(
                "Unable to extract timestamp and signatures from header",
            )),
        }
    }
}

/// Verify `payload` against the header at time `now` (unix seconds).
pub fn verify_signature(payload: &[u8], header: &str, secret: &str, tolerance_secs: i64, now: i64) -> NoemaResult<()> {
    let parsed = SignatureHeader::parse(header)?;

    let matched = parsed.v1.iter().any(|sig| {
        let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
            return false;
        };
        mac.update(parsed.timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        mac.verify_slice(sig).is_ok()
    });
    if !matched {
        return Err(NoemaError::invalid_argument(
            "No signatures found matching the expected signature for payload",
        ));
    }

    // Only stale events are rejected; a sender clock running ahead is accepted.
    if tolerance_secs > 0 && now - parsed.timestamp > tolerance_secs {
        return Err(NoemaError::invalid_argument("Timestamp outside the tolerance zone"));
    }
    Ok(())
}

/// Compute the `v1` signature for a payload. Used by tests and by tooling
/// that replays events against a local API.
pub fn sign_payload(payload: &[u8], secret: &str, timestamp: i64) -> NoemaResult<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| NoemaError::invalid_argument("invalid webhook secret"))?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Event types the API reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookEventKind {
    CheckoutSessionCompleted,
    InvoicePaid,
    SubscriptionDeleted,
    Other,
}

impl WebhookEventKind {
    pub fn from_type(t: &str) -> Self {
        match t {
            "checkout.session.completed" => Self::CheckoutSessionCompleted,
            "invoice.paid" => Self::InvoicePaid,
            "customer.subscription.deleted" => Self::SubscriptionDeleted,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl WebhookEvent {
    pub fn kind(&self) -> WebhookEventKind {
        WebhookEventKind::from_type(&self.event_type)
    }
}

/// Verify the signature and parse the event body.
pub fn construct_event(payload: &[u8], header: &str, secret: &str, now: i64) -> NoemaResult<WebhookEvent> {
    verify_signature(payload, header, secret, DEFAULT_TOLERANCE_SECS, now)?;
    serde_json::from_slice(payload)
        .map_err(|e| NoemaError::invalid_argument(format!("invalid event payload: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test";
    const NOW: i64 = 1_700_000_000;
    const BODY: &[u8] = br#"{"id":"evt_1","type":"invoice.paid","data":{"object":{}}}"#;

    fn header_for(body: &[u8], t: i64) -> String {
        format!("t={t},v1={}", sign_payload(body, SECRET, t).unwrap())
    }

    #[test]
    fn valid_signature_yields_event() {
        let ev = construct_event(BODY, &header_for(BODY, NOW), SECRET, NOW + 10).unwrap();
        assert_eq!(ev.id, "evt_1");
        assert_eq!(ev.kind(), WebhookEventKind::InvoicePaid);
    }

    #[test]
    fn any_v1_entry_may_match() {
        let good = sign_payload(BODY, SECRET, NOW).unwrap();
        let header = format!("t={NOW},v1={},v1={good},v0=deadbeef", "00".repeat(32));
        verify_signature(BODY, &header, SECRET, DEFAULT_TOLERANCE_SECS, NOW).unwrap();
    }

    #[test]
    fn modified_body_is_rejected() {
        let header = header_for(BODY, NOW);
        let body = br#"{"id":"evt_2","type":"invoice.paid"}"#;
        assert!(construct_event(body, &header, SECRET, NOW).is_err());
    }

    #[test]
    fn stale_timestamp_is_rejected() {
        let header = header_for(BODY, NOW - 301);
        assert!(verify_signature(BODY, &header, SECRET, DEFAULT_TOLERANCE_SECS, NOW).is_err());
    }

    #[test]
    fn future_timestamp_is_accepted() {
        let header = header_for(BODY, NOW + 3_600);
        verify_signature(BODY, &header, SECRET, DEFAULT_TOLERANCE_SECS, NOW).unwrap();
    }

    #[test]
    fn malformed_header_is_rejected() {
        for h in ["", "t=abc,v1=00", "v1=00", "t=1"] {
            assert!(SignatureHeader::parse(h).is_err(), "{h}");
        }
    }
}
