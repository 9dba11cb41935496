//! WebSocket message types: client requests and server envelopes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Server → client message envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WsMessage {
    /// Echoed request ID for responses; server-generated for events.
    pub id: String,
    /// Message type discriminator.
    #[serde(rename = "type")]
    pub msg_type: WsMessageType,
    /// ISO-8601 timestamp.
    pub timestamp: DateTime<Utc>,
    /// Variant-specific payload.
    pub payload: serde_json::Value,
}

impl WsMessage {
    /// Builds a message stamped with the current time.
    #[must_use]
    pub fn new(id: String, msg_type: WsMessageType, payload: serde_json::Value) -> Self {
        Self {
            id,
            msg_type,
            timestamp: Utc::now(),
            payload,
        }
    }

    /// Builds an error message with a numeric code.
    #[must_use]
    pub fn error(id: String, code: u16, message: &str) -> Self {
        Self::new(
            id,
            WsMessageType::Error,
            serde_json::json!({ "code": code, "message": message }),
        )
    }
}

/// Discriminator for WebSocket message types.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WsMessageType {
    /// Server → Client response to a command.
    Response,
    /// Server → Client entity change.
    Event,
    /// Server → Client error.
    Error,
}

/// Client → server request: an optional correlation ID plus a command.
#[derive(Debug, Clone, Deserialize)]
pub struct WsRequest {
    /// Echoed back in the response.
    #[serde(default)]
    pub id: String,
    /// The command to run.
    #[serde(flatten)]
    pub command: WsCommand,
}

/// Commands that a client can send over WebSocket.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum WsCommand {
    /// Subscribe to changes of the given entity kinds.
    Subscribe {
        /// Entity kinds (`restaurant`, `drop`, `reservation`, `listing`).
        /// Use `["*"]` for all kinds.
        kinds: Vec<String>,
    },
    /// Unsubscribe from changes of the given entity kinds.
    Unsubscribe {
        /// Entity kinds to drop.
        kinds: Vec<String>,
    },
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn request_without_id_decodes() {
        let Ok(req) =
            serde_json::from_str::<WsRequest>(r#"{"command":"subscribe","kinds":["listing"]}"#)
        else {
            panic!("request should decode");
        };
        assert!(req.id.is_empty());
        assert_eq!(
            req.command,
            WsCommand::Subscribe {
                kinds: vec!["listing".to_string()]
            }
        );
    }

    #[test]
    fn unknown_command_is_rejected() {
        let result = serde_json::from_str::<WsRequest>(r#"{"id":"1","command":"replay"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn message_type_serializes_snake_case() {
        let msg = WsMessage::error("7".to_string(), 400, "bad");
        let Ok(json) = serde_json::to_value(&msg) else {
            panic!("serialize failed");
        };
        assert_eq!(json["type"], "error");
        assert_eq!(json["payload"]["code"], 400);
    }
}
