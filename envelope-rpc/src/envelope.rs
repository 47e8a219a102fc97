use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::{
    configuration::DEFAULT_SIGN_ALGORITHM, NumericStrings, Result, ServiceConfig, SignerRegistry,
};

/// Seconds since the unix epoch, with microsecond precision.
///
/// The `Display` form is exactly what json serialization writes, so a timestamp can be put
/// into the signing string and into the envelope without the two ever disagreeing.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(f64);

impl Timestamp {
    /// The current wall-clock time.
    pub fn now() -> Self {
        let micros = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_micros())
            .unwrap_or_default();
        Self(micros as f64 / 1_000_000.0)
    }

    /// A fixed timestamp, in fractional seconds.
    pub fn from_secs_f64(seconds: f64) -> Self {
        Self(seconds)
    }

    /// Fractional seconds since the epoch.
    pub fn as_secs_f64(&self) -> f64 {
        self.0
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match serde_json::Number::from_f64(self.0) {
            Some(number) => write!(f, "{number}"),
            None => write!(f, "{}", self.0),
        }
    }
}

/// The signed request sent to a remote service.
///
/// `args` travel with the envelope but are not part of the signed material: two envelopes
/// that differ only in `args` carry the same signature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestEnvelope {
    /// Name of the hash used for `signature`.
    pub algorithm: String,
    /// Caller identity.
    #[serde(rename = "appId", deserialize_with = "string_or_number")]
    pub app_id: String,
    /// Logical service name.
    pub service: String,
    /// `<className>::<methodName>`
    pub call: String,
    /// Positional arguments, unsigned.
    #[serde(default)]
    pub args: Vec<Value>,
    /// When the call was made.
    pub timestamp: Timestamp,
    /// Hash of the signing material.
    #[serde(default)]
    pub signature: String,
}

impl RequestEnvelope {
    /// An unsigned envelope for one call.
    pub fn new(
        config: &ServiceConfig,
        service: &str,
        class_name: &str,
        method: &str,
        args: Vec<Value>,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            algorithm: config.sign_algorithm().to_string(),
            app_id: config.service_id().to_string(),
            service: service.to_string(),
            call: format!("{class_name}::{method}"),
            args,
            timestamp,
            signature: String::new(),
        }
    }

    fn effective_algorithm(&self) -> &str {
        if self.algorithm.is_empty() {
            DEFAULT_SIGN_ALGORITHM
        } else {
            &self.algorithm
        }
    }

    /// The string that gets hashed. Key order is fixed.
    pub fn signing_material(&self, secret: &str) -> String {
        format!(
            "appId={}&algorithm={}&call={}&secret={}&service={}&timestamp={}",
            self.app_id,
            self.effective_algorithm(),
            self.call,
            secret,
            self.service,
            self.timestamp,
        )
    }

    /// Compute and attach the signature.
    pub fn signed(mut self, secret: &str, signers: &SignerRegistry) -> Result<Self> {
        self.signature = signers.sign(self.effective_algorithm(), &self.signing_material(secret))?;
        Ok(self)
    }

    /// Check the attached signature against a secret, as a receiving service would.
    pub fn verify(&self, secret: &str, signers: &SignerRegistry) -> Result<bool> {
        let expected = signers.sign(self.effective_algorithm(), &self.signing_material(secret))?;
        Ok(expected == self.signature)
    }

    /// Serialize for a transport.
    pub fn encode(&self, numeric_strings: NumericStrings) -> Result<String> {
        match numeric_strings {
            NumericStrings::Preserve => Ok(serde_json::to_string(self)?),
            NumericStrings::Coerce => {
                let mut wire = serde_json::to_value(self)?;
                if let Some(fields) = wire.as_object_mut() {
                    for key in ["appId", "args"] {
                        if let Some(field) = fields.get_mut(key) {
                            *field = coerce_numeric_strings(field.take());
                        }
                    }
                }
                Ok(wire.to_string())
            }
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

fn coerce_numeric_strings(value: Value) -> Value {
    match value {
        Value::String(s) => numeric(&s).unwrap_or(Value::String(s)),
        Value::Array(items) => {
            Value::Array(items.into_iter().map(coerce_numeric_strings).collect())
        }
        Value::Object(fields) => Value::Object(
            fields
                .into_iter()
                .map(|(key, value)| (key, coerce_numeric_strings(value)))
                .collect(),
        ),
        other => other,
    }
}

fn numeric(s: &str) -> Option<Value> {
    let plausible = s
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'));
    if s.is_empty() || !plausible {
        return None;
    }
    if let Ok(integer) = s.parse::<i64>() {
        return Some(Value::from(integer));
    }
    s.parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
}
