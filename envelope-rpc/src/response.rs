use serde_json::Value;

use crate::{Error, Result};

/// What a remote service answers with.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEnvelope {
    /// Whether the call succeeded.
    pub ok: bool,
    /// The result, when `ok`.
    pub data: Value,
    /// Failure message, when not `ok`.
    pub error: String,
    /// Optional remote stack trace or other diagnostics.
    pub trace: Option<String>,
}

impl ResponseEnvelope {
    /// Parse a raw response. Anything other than a json object is a protocol error.
    ///
    /// `ok` is read loosely: `true`, non-zero numbers, and non-empty strings other than
    /// `"0"` all count as success.
    pub fn parse(raw: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| Error::protocol(format!("unparseable response: {e}"), raw))?;
        let Value::Object(mut fields) = value else {
            return Err(Error::protocol("response is not an object", raw));
        };

        let ok = fields.get("ok").is_some_and(truthy);
        let data = fields.remove("data").unwrap_or(Value::Null);
        let error = fields.get("error").map(text).unwrap_or_default();
        let trace = fields
            .get("trace")
            .map(text)
            .filter(|trace| !trace.is_empty());
        Ok(Self {
            ok,
            data,
            error,
            trace,
        })
    }

    /// `data` on success, otherwise the remote error. `raw` is the payload this was parsed
    /// from, used when the remote did not say what went wrong.
    pub fn into_result(self, raw: &str) -> Result<Value> {
        if self.ok {
            return Ok(self.data);
        }
        if self.error.is_empty() {
            return Err(Error::RemoteError(format!("exception data:{raw}")));
        }
        let message = match self.trace {
            Some(trace) => format!("{}\n{trace}", self.error),
            None => self.error,
        };
        Err(Error::RemoteError(message))
    }
}

/// Decode a raw response into its data or the error it describes.
pub fn decode(raw: &str) -> Result<Value> {
    ResponseEnvelope::parse(raw)?.into_result(raw)
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

fn text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    #[test]
    fn success_returns_data_verbatim() {
        assert_eq!(
            json!({"x": 1}),
            decode(r#"{"ok":true,"data":{"x":1}}"#).expect("ok")
        );
        assert_eq!(
            json!([1, "two", null]),
            decode(r#"{"ok":1,"data":[1,"two",null]}"#).expect("ok")
        );
    }

    #[test]
    fn success_without_data_is_null() {
        assert_eq!(Value::Null, decode(r#"{"ok":true}"#).expect("ok"));
    }

    #[test]
    fn remote_error_with_trace() {
        match decode(r#"{"ok":false,"error":"bad request","trace":"line 1"}"#) {
            Err(Error::RemoteError(message)) => assert_eq!("bad request\nline 1", message),
            other => panic!("expected remote error, got {other:?}"),
        }
    }

    #[test]
    fn remote_error_ignores_empty_trace() {
        match decode(r#"{"ok":false,"error":"bad request","trace":""}"#) {
            Err(Error::RemoteError(message)) => assert_eq!("bad request", message),
            other => panic!("expected remote error, got {other:?}"),
        }
    }

    #[test]
    fn remote_error_without_message_embeds_payload() {
        let raw = r#"{"ok":false,"trace":"line 1"}"#;
        match decode(raw) {
            Err(Error::RemoteError(message)) => {
                assert_eq!(format!("exception data:{raw}"), message)
            }
            other => panic!("expected remote error, got {other:?}"),
        }
    }

    #[test]
    fn falsy_ok_values() {
        for raw in [
            r#"{"ok":0,"error":"e"}"#,
            r#"{"ok":"0","error":"e"}"#,
            r#"{"ok":"","error":"e"}"#,
            r#"{"ok":null,"error":"e"}"#,
            r#"{"error":"e"}"#,
        ] {
            assert!(matches!(decode(raw), Err(Error::RemoteError(_))), "{raw}");
        }
    }

    #[test]
    fn unparseable_payload_is_a_protocol_error() {
        match decode("<html>502 Bad Gateway</html>") {
            Err(Error::ProtocolError { raw, .. }) => {
                assert_eq!("<html>502 Bad Gateway</html>", raw)
            }
            other => panic!("expected protocol error, got {other:?}"),
        }
    }

    #[test]
    fn non_object_payload_is_a_protocol_error() {
        for raw in ["[1,2]", "true", "\"ok\"", ""] {
            match decode(raw) {
                Err(error @ Error::ProtocolError { .. }) => {
                    assert!(error.to_string().contains(raw), "{error}")
                }
                other => panic!("expected protocol error for {raw:?}, got {other:?}"),
            }
        }
    }
}
