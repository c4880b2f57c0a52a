//! Delivery signatures.
//!
//! Render signs the JSON text of each delivery with HMAC-SHA256 keyed by the
//! subscription secret and sends the lowercase hex digest in
//! `x-render-signature`. The receiver re-serializes the parsed body and
//! signs that text, so object key order must survive parsing (`serde_json`
//! is built with `preserve_order`) and numbers must print the way the
//! sender's JSON encoder prints them (`1.0` and `1e3` become `1` and `1000`).

use std::fmt::Write;

use hmac::{Hmac, Mac};
use serde_json::{Number, Value};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the delivery signature.
pub const SIGNATURE_HEADER: &str = "x-render-signature";

/// Result of comparing a received signature with the expected one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureCheck {
    Valid,
    Mismatch,
    /// The received signature has a different length than a hex digest.
    InvalidFormat,
}

impl SignatureCheck {
    pub fn is_valid(&self) -> bool {
        matches!(self, SignatureCheck::Valid)
    }
}

/// Expected signature of a payload: lowercase hex HMAC-SHA256 of its
/// [`canonical_json`] text.
pub fn compute_signature(payload: &Value, secret: &str) -> String {
    sign(secret, canonical_json(payload).as_bytes())
}

/// Compact JSON text of `value` with numbers printed as JavaScript does.
///
/// Integral floats below 1e21 print without a fraction. Other floats use the
/// shortest round-trip digits, switching to exponent form below 1e-6 and
/// from 1e21 up.
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value);
    out
}

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Number(n) => out.push_str(&js_number(n)),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(out, item);
            }
            out.push(']');
        }
        Value::Object(map) => {
            out.push('{');
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                let _ = write!(out, "{}:", Value::String(key.clone()));
                write_value(out, item);
            }
            out.push('}');
        }
        other => {
            let _ = write!(out, "{}", other);
        }
    }
}

fn js_number(n: &Number) -> String {
    let Some(f) = n.as_f64().filter(|_| n.is_f64()) else {
        return n.to_string();
    };
    if f == 0.0 {
        return "0".to_string();
    }

    let abs = f.abs();
    if f.fract() == 0.0 && abs < 1e21 {
        format!("{:.0}", f)
    } else if (1e-6..1e21).contains(&abs) {
        format!("{}", f)
    } else {
        let exp = format!("{:e}", f);
        match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => {
                format!("{}e+{}", mantissa, power)
            }
            _ => exp,
        }
    }
}

fn sign(secret: &str, bytes: &[u8]) -> String {
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        // HMAC accepts keys of any length.
        Err(_) => return String::new(),
    };
    mac.update(bytes);
    hex::encode(mac.finalize().into_bytes())
}

/// Compare `signature` against the expected signature in constant time.
pub fn verify_signature(payload: &Value, secret: &str, signature: &str) -> SignatureCheck {
    let expected = compute_signature(payload, secret);
    if expected.len() != signature.len() {
        tracing::debug!(
            expected_len = expected.len(),
            got_len = signature.len(),
            "signature length mismatch"
        );
        return SignatureCheck::InvalidFormat;
    }

    if bool::from(expected.as_bytes().ct_eq(signature.as_bytes())) {
        SignatureCheck::Valid
    } else {
        SignatureCheck::Mismatch
    }
}
