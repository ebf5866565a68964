use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Reply envelope returned by an [`AgentClient`](super::AgentClient).
///
/// Only `success` is structural. Everything under `response.result` is an
/// untrusted, loosely-typed record that the normalizer picks apart.
///
/// Fields of the wrong type decode as absent instead of failing the whole
/// envelope, so a `success: false` reply keeps its `http_status`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentEnvelope {
    #[serde(default, deserialize_with = "lenient_bool")]
    pub success: bool,
    #[serde(
        default,
        deserialize_with = "lenient_response",
        skip_serializing_if = "Option::is_none"
    )]
    pub response: Option<AgentResponse>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentResponse {
    #[serde(default, deserialize_with = "lenient_status")]
    pub status: String,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub result: Value,
}

fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(b) => b,
        Value::String(s) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    })
}

fn lenient_status<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_str().map(|s| s.trim().to_string()).unwrap_or_default())
}

/// Strings pass through, numbers are rendered, `{"detail": ...}` style objects
/// keep their first string field, anything else is absent
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let text = match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(map) => map.into_iter().find_map(|(_, v)| match v {
            Value::String(s) => Some(s),
            _ => None,
        }),
        _ => None,
    };
    Ok(text.filter(|t| !t.trim().is_empty()))
}

fn lenient_response<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<AgentResponse>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    if !value.is_object() {
        return Ok(None);
    }
    serde_json::from_value(value).map(Some).map_err(serde::de::Error::custom)
}

impl AgentEnvelope {
    /// Successful envelope wrapping an arbitrary result record
    pub fn success(result: Value) -> Self {
        Self {
            success: true,
            response: Some(AgentResponse {
                status: "success".to_string(),
                message: None,
                result,
            }),
            error: None,
        }
    }

    /// Transport-level failure, optionally carrying the HTTP status
    pub fn failure(message: impl Into<String>, http_status: Option<u16>) -> Self {
        let message = message.into();
        let result = match http_status {
            Some(status) => serde_json::json!({ "http_status": status }),
            None => Value::Null,
        };
        Self {
            success: false,
            response: Some(AgentResponse {
                status: "error".to_string(),
                message: Some(message.clone()),
                result,
            }),
            error: Some(message),
        }
    }

    /// The inner result record, `Null` when absent
    pub fn result(&self) -> &Value {
        static NULL: Value = Value::Null;
        self.response.as_ref().map(|r| &r.result).unwrap_or(&NULL)
    }
}
