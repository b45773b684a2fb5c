//! Wire types for the `runScript` action

use opsdeck_action::{ActionResult, CallBackParameter};
use serde::{Deserialize, Deserializer, Serialize};

/// Batch request: `{"inputs": [...]}`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RunScriptInputs {
    /// Records to execute, in order.
    #[serde(default)]
    pub inputs: Vec<RunScriptInput>,
}

/// One requested script execution.
///
/// Every field is optional on the wire; [`crate::validate`] decides what is
/// actually required.
#[derive(Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RunScriptInput {
    /// Artifact reference (`s3://bucket/key`, `file:///path`).
    pub endpoint: String,
    /// Correlation id, echoed on the output record.
    pub guid: String,
    /// Second key-derivation token.
    pub seed: String,
    /// Database host.
    pub host: String,
    /// Database user.
    pub user_name: String,
    /// Encrypted password (base64).
    pub password: String,
    /// Default schema, may be empty.
    pub database_name: String,
    /// Port as sent by the caller; accepts a JSON string or number.
    #[serde(deserialize_with = "port_from_string_or_number")]
    pub port: String,
    /// Opaque value returned verbatim.
    pub call_back_parameter: CallBackParameter,
}

impl std::fmt::Debug for RunScriptInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunScriptInput")
            .field("endpoint", &self.endpoint)
            .field("guid", &self.guid)
            .field("seed", &"[REDACTED]")
            .field("host", &self.host)
            .field("user_name", &self.user_name)
            .field("password", &"[REDACTED]")
            .field("database_name", &self.database_name)
            .field("port", &self.port)
            .finish_non_exhaustive()
    }
}

fn port_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Port {
        Text(String),
        Number(u64),
    }

    Ok(match Option::<Port>::deserialize(deserializer)? {
        Some(Port::Text(s)) => s,
        Some(Port::Number(n)) => n.to_string(),
        None => String::new(),
    })
}

/// Batch response: `{"outputs": [...]}`, one record per input, same order.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RunScriptOutputs {
    /// Per-input results.
    #[serde(default)]
    pub outputs: Vec<RunScriptOutput>,
}

/// Result of one input record.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunScriptOutput {
    /// Correlation id copied from the input.
    #[serde(default)]
    pub guid: String,
    /// Error text on failure, empty on success.
    #[serde(default)]
    pub detail: String,
    /// Result code and message.
    #[serde(default)]
    pub result: ActionResult,
    /// Opaque value copied from the input.
    #[serde(default)]
    pub call_back_parameter: CallBackParameter,
}
