//! Solana Pay transfer request URIs for subscription payments.
//!
//! Format: `solana:<recipient>?amount=..&spl-token=..&label=..&message=..&memo=..`

use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::errors::{NoemaError, NoemaResult};

pub const DEFAULT_LABEL: &str = "Noema Subscription";
pub const DEFAULT_MESSAGE: &str = "Subscription Payment";
pub const DEFAULT_MEMO: &str = "noema";

/// Body of `POST /api/crypto/solana-pay`.
///
/// `amount` is kept as raw JSON so both `10` and `"10.50"` are accepted and
/// rendered back exactly as sent.
#[derive(Debug, Clone, Deserialize)]
pub struct SolanaPayRequest {
    #[serde(default)]
    pub amount: Value,
    #[serde(default = "default_label")]
    pub label: String,
    #[serde(default = "default_message")]
    pub message: String,
    #[serde(default = "default_memo")]
    pub memo: String,
}

fn default_label() -> String {
    DEFAULT_LABEL.to_string()
}

fn default_message() -> String {
    DEFAULT_MESSAGE.to_string()
}

fn default_memo() -> String {
    DEFAULT_MEMO.to_string()
}

impl SolanaPayRequest {
    pub fn new(amount: impl Into<Value>) -> Self {
        Self {
            amount: amount.into(),
            label: default_label(),
            message: default_message(),
            memo: default_memo(),
        }
    }

    /// Textual amount, validated as a positive finite number.
    pub fn amount_text(&self) -> NoemaResult<String> {
        let text = match &self.amount {
            Value::Number(n) => n.to_string(),
            Value::String(s) => s.trim().to_string(),
            _ => return Err(invalid_amount()),
        };
        match text.parse::<f64>() {
            Ok(v) if v.is_finite() && v > 0.0 => Ok(text),
            _ => Err(invalid_amount()),
        }
    }
}

fn invalid_amount() -> NoemaError {
    NoemaError::invalid_argument("Invalid amount")
}

/// Build the transfer request URI paying `spl_token` to `recipient`.
pub fn build_transfer_url(recipient: &str, spl_token: &str, req: &SolanaPayRequest) -> NoemaResult<String> {
    if recipient.trim().is_empty() {
        return Err(NoemaError::not_configured("RECEIVING_SOLANA_ADDRESS"));
    }
    let amount = req.amount_text()?;

    let mut url = Url::parse(&format!("solana:{recipient}"))
        .map_err(|e| NoemaError::invalid_argument(format!("invalid recipient: {e}")))?;
    url.query_pairs_mut()
        .append_pair("amount", &amount)
        .append_pair("spl-token", spl_token)
        .append_pair("label", &req.label)
        .append_pair("message", &req.message)
        .append_pair("memo", &req.memo);

    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const RECIPIENT: &str = "3oxg7wVtdp9T3sx773SMmws8zrGyAJecqTruaXfiw3mN";
    const MINT: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";

    fn query(u: &str) -> HashMap<String, String> {
        Url::parse(u).unwrap().query_pairs().into_owned().collect()
    }

    #[test]
    fn url_carries_every_parameter() {
        let mut req = SolanaPayRequest::new(25);
        req.label = "Noema Pro".into();
        req.memo = "pro-monthly".into();

        let u = build_transfer_url(RECIPIENT, MINT, &req).unwrap();
        assert!(u.starts_with(&format!("solana:{RECIPIENT}?")));

        let q = query(&u);
        assert_eq!(q["amount"], "25");
        assert_eq!(q["spl-token"], MINT);
        assert_eq!(q["label"], "Noema Pro");
        assert_eq!(q["message"], DEFAULT_MESSAGE);
        assert_eq!(q["memo"], "pro-monthly");
    }

    #[test]
    fn string_amount_is_kept_verbatim() {
        let req = SolanaPayRequest::new("10.50");
        let q = query(&build_transfer_url(RECIPIENT, MINT, &req).unwrap());
        assert_eq!(q["amount"], "10.50");
    }

    #[test]
    fn invalid_amounts_are_rejected() {
        for amount in [Value::Null, Value::from(0), Value::from(-3), Value::from("abc"), Value::from("")] {
            let req = SolanaPayRequest::new(amount);
            assert!(build_transfer_url(RECIPIENT, MINT, &req).is_err());
        }
    }

    #[test]
    fn defaults_apply_when_fields_are_missing() {
        let req: SolanaPayRequest = serde_json::from_str(r#"{"amount": 1}"#).unwrap();
        assert_eq!(req.label, DEFAULT_LABEL);
        assert_eq!(req.memo, DEFAULT_MEMO);
    }
}
