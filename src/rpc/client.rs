// DevPanel - rpc/client.rs
//
// The RPC collaborator seam. The transport (HTTP, websocket, unix socket)
// lives outside this crate; the session only depends on this trait and the
// `{data, error}` response envelope convention.

use crate::rpc::commands::CommandSpec;
use crate::util::error::RpcError;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Response envelope shared by every JSON command.
///
/// A truthy `error` means the call failed and `data` must not be trusted.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct RpcResponse {
    /// Command result payload.
    #[serde(default)]
    pub data: Value,

    /// Failure message; `None` (or JSON null) means success.
    #[serde(default)]
    pub error: Option<String>,
}

impl RpcResponse {
    /// Resolve the envelope: `data` on success, `RpcError::Command` when the
    /// error channel is set.
    pub fn into_data(self, command: &CommandSpec) -> Result<Value, RpcError> {
        match self.error {
            Some(message) => Err(RpcError::Command {
                command: command.name.to_string(),
                message,
            }),
            None => Ok(self.data),
        }
    }
}

/// Abstract RPC client the session issues commands through.
///
/// Implementations are synchronous from the session's point of view; the
/// host decides what thread drives the session. Both methods must honour
/// the `CommandSpec` timeout (or the transport default when `None`).
pub trait RpcClient {
    /// Issue a JSON command and return its response envelope.
    ///
    /// A transport-level failure (connection refused, timeout) is an
    /// `RpcError::Transport`; a backend-reported failure travels inside the
    /// returned envelope.
    fn send_command(&self, command: &CommandSpec, payload: Value)
        -> Result<RpcResponse, RpcError>;

    /// Fetch a file-style download (package archive, documentation bundle).
    fn download(&self, command: &CommandSpec, payload: Value) -> Result<(), RpcError>;
}

/// Resolve an envelope and decode its `data` into a typed payload.
pub fn decode_response<T: DeserializeOwned>(
    response: RpcResponse,
    command: &CommandSpec,
) -> Result<T, RpcError> {
    let data = response.into_data(command)?;
    serde_json::from_value(data).map_err(|source| RpcError::Payload {
        command: command.name.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::commands::CHECK_APPLICATION;
    use serde_json::json;

    /// A null error channel resolves to the data payload.
    #[test]
    fn test_success_envelope_yields_data() {
        let response: RpcResponse =
            serde_json::from_value(json!({"data": {"ok": true}, "error": null})).unwrap();
        let data = response.into_data(&CHECK_APPLICATION).unwrap();
        assert_eq!(data, json!({"ok": true}));
    }

    /// A truthy error channel fails the call; data is discarded.
    #[test]
    fn test_error_envelope_yields_command_error() {
        let response: RpcResponse =
            serde_json::from_value(json!({"data": {"ok": true}, "error": "boom"})).unwrap();
        let err = response.into_data(&CHECK_APPLICATION).unwrap_err();
        match err {
            RpcError::Command { command, message } => {
                assert_eq!(command, "check_application");
                assert_eq!(message, "boom");
            }
            other => panic!("expected Command error, got {other:?}"),
        }
    }

    /// Decoding reports the command name on payload-shape mismatches.
    #[test]
    fn test_decode_reports_payload_errors() {
        #[derive(Debug, serde::Deserialize)]
        struct Expected {
            #[allow(dead_code)]
            count: usize,
        }

        let response = RpcResponse {
            data: json!({"count": "not a number"}),
            error: None,
        };
        let err = decode_response::<Expected>(response, &CHECK_APPLICATION).unwrap_err();
        assert!(matches!(err, RpcError::Payload { ref command, .. } if command == "check_application"));
    }

    /// An absent data field defaults to JSON null.
    #[test]
    fn test_missing_data_defaults_to_null() {
        let response: RpcResponse = serde_json::from_value(json!({})).unwrap();
        let data = response.into_data(&CHECK_APPLICATION).unwrap();
        assert!(data.is_null());
    }
}
