//! WebSocket connection state machine.
//!
//! Handles the read/write loop for a single WebSocket connection,
//! applying subscription commands and forwarding filtered changes.

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;

use super::messages::{WsCommand, WsMessage, WsMessageType, WsRequest};
use super::subscription::SubscriptionManager;
use crate::domain::{EntityChange, EntityKind};

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Reads commands from the client and applies them.
/// - Forwards matching changes from the [`broadcast::Receiver`] to the client.
pub async fn run_connection(socket: WebSocket, mut change_rx: broadcast::Receiver<EntityChange>) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut subs = SubscriptionManager::new();

    loop {
        tokio::select! {
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let response = handle_text_message(&text, &mut subs);
                        if let Some(resp_json) = response
                            && ws_tx.send(Message::text(resp_json)).await.is_err() {
                                break;
                            }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
            change = change_rx.recv() => {
                match change {
                    Ok(change) => {
                        if !subs.matches(change.kind()) {
                            continue;
                        }
                        let Some(json) = change_message(&change) else {
                            continue;
                        };
                        if ws_tx.send(Message::text(json)).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(lagged = n, "ws client lagged behind change bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    tracing::debug!("ws connection closed");
}

fn change_message(change: &EntityChange) -> Option<String> {
    let payload = serde_json::to_value(change).ok()?;
    let msg = WsMessage::new(
        uuid::Uuid::new_v4().to_string(),
        WsMessageType::Event,
        payload,
    );
    serde_json::to_string(&msg).ok()
}

/// Splits requested kind names into known kinds, the wildcard flag, and
/// unknown names.
fn parse_kinds(names: &[String]) -> (Vec<EntityKind>, bool, Vec<String>) {
    let mut kinds = Vec::new();
    let mut wildcard = false;
    let mut unknown = Vec::new();
    for name in names {
        if name == "*" {
            wildcard = true;
        } else if let Some(kind) = EntityKind::parse(name) {
            kinds.push(kind);
        } else {
            unknown.push(name.clone());
        }
    }
    (kinds, wildcard, unknown)
}

/// Handles a text message from the client, returning an optional JSON response.
fn handle_text_message(text: &str, subs: &mut SubscriptionManager) -> Option<String> {
    let Ok(request) = serde_json::from_str::<WsRequest>(text) else {
        let err = WsMessage::error(String::new(), 400, "malformed or unknown command");
        return serde_json::to_string(&err).ok();
    };

    let (names, subscribe) = match &request.command {
        WsCommand::Subscribe { kinds } => (kinds, true),
        WsCommand::Unsubscribe { kinds } => (kinds, false),
    };
    let (kinds, wildcard, unknown) = parse_kinds(names);
    if !unknown.is_empty() {
        let err = WsMessage::error(
            request.id,
            400,
            &format!("unknown entity kind: {}", unknown.join(", ")),
        );
        return serde_json::to_string(&err).ok();
    }

    if subscribe {
        subs.subscribe(&kinds, wildcard);
    } else {
        subs.unsubscribe(&kinds, wildcard);
    }
    tracing::debug!(
        subscribe,
        kinds = ?subs.kinds(),
        wildcard = subs.is_subscribed_all(),
        "ws subscription updated"
    );

    let response = WsMessage::new(
        request.id,
        WsMessageType::Response,
        serde_json::json!({
            "kinds": subs.kinds(),
            "wildcard": subs.is_subscribed_all(),
        }),
    );
    serde_json::to_string(&response).ok()
}
