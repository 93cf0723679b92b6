/// WebSocket connection handler
///
/// One task per connection, owning both halves of the split socket:
/// - registers the identity and announces it, force-closing any superseded
///   connection under the same username
/// - drains the bounded outbound queue into the socket
/// - routes inbound frames (unicast when a `to` envelope is present,
///   broadcast otherwise) and reports routing errors back to the sender
/// - on exit, removes exactly its own registry entry and announces the
///   disconnect

use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;

use crate::{
    arguments::is_debug_ws_enabled,
    core::RelayError,
    logger::{self, LogTag},
    webserver::state::AppState,
};

use super::message::{routing_target, RelayFrame, ServerEvent};

/// Handle one WebSocket connection for the given identity
pub async fn handle_connection(socket: WebSocket, username: String, state: Arc<AppState>) {
    let registry = Arc::clone(&state.registry);
    let router = state.router.clone();

    // Register before announcing, so the connect notification reflects the
    // post-registration snapshot
    let (handle, mut outbound_rx) = registry.open_connection();
    let conn_id = handle.conn_id();

    if let Some(superseded) = registry.register(&username, handle).await {
        // Overwrite policy: the superseded connection is force-closed. Its
        // own loop drains the close frame, exits, and its cleanup via
        // unregister_exact leaves this replacement entry alone.
        logger::info(
            LogTag::Ws,
            &format!(
                "{} reconnected (conn {}); closing superseded conn {}",
                username,
                conn_id,
                superseded.conn_id()
            ),
        );
        let _ = superseded.try_send(RelayFrame::Close);
    } else {
        logger::info(LogTag::Ws, &format!("{} connected (conn {})", username, conn_id));
    }

    router.notify_connected(&username).await;

    // Split socket
    let (mut ws_tx, mut ws_rx) = socket.split();

    // Main message loop
    loop {
        tokio::select! {
            biased;

            // Queued outbound frames (from broadcasts, unicasts, media results)
            maybe_frame = outbound_rx.recv() => {
                match maybe_frame {
                    Some(RelayFrame::Text(text)) => {
                        if ws_tx.send(Message::Text(text)).await.is_err() {
                            break;
                        }
                    }
                    Some(RelayFrame::Binary(bytes)) => {
                        if ws_tx.send(Message::Binary(bytes)).await.is_err() {
                            break;
                        }
                    }
                    Some(RelayFrame::Close) => {
                        // Superseded by a newer registration
                        let _ = ws_tx.send(Message::Close(None)).await;
                        break;
                    }
                    None => break,
                }
            }

            // Inbound frames from the client
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        if let Err(e) = route_inbound(&state, &username, text).await {
                            report_routing_error(&mut ws_tx, &username, &e).await;
                        }
                    }
                    Some(Ok(Message::Binary(bytes))) => {
                        // Envelope sniffing applies to text frames only;
                        // clients never send targeted binary, so binary is
                        // always broadcast
                        state
                            .router
                            .broadcast_except(&username, RelayFrame::Binary(bytes))
                            .await;
                    }
                    Some(Ok(Message::Ping(payload))) => {
                        if ws_tx.send(Message::Pong(payload)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Pong(_))) => {}
                    Some(Ok(Message::Close(_))) | None => {
                        if is_debug_ws_enabled() {
                            logger::debug(
                                LogTag::Ws,
                                &format!("{} (conn {}): client closed", username, conn_id),
                            );
                        }
                        break;
                    }
                    Some(Err(e)) => {
                        logger::warning(
                            LogTag::Ws,
                            &format!(
                                "{} (conn {}): {}: {}",
                                username,
                                conn_id,
                                RelayError::TransportClosed,
                                e
                            ),
                        );
                        break;
                    }
                }
            }
        }
    }

    // Cleanup: remove only our own entry, and announce the disconnect only
    // if the removal actually happened (a superseded connection finds its
    // entry already owned by the replacement and stays silent)
    if registry.unregister_exact(&username, conn_id).await {
        logger::info(LogTag::Ws, &format!("{} disconnected (conn {})", username, conn_id));
        router.notify_disconnected(&username).await;
    } else if is_debug_ws_enabled() {
        logger::debug(
            LogTag::Ws,
            &format!(
                "{} (conn {}): entry already replaced, no disconnect notification",
                username, conn_id
            ),
        );
    }
}

/// Route one inbound text frame
///
/// A JSON object with a string `to` field is delivered via unicast; anything
/// else is broadcast to everyone except the sender. Broadcast is best-effort
/// and never returns an error; only unicast failures surface to the sender.
async fn route_inbound(state: &Arc<AppState>, sender: &str, text: String) -> Result<(), RelayError> {
    match routing_target(&text) {
        Some(target) => state.router.unicast(&target, RelayFrame::Text(text)).await,
        None => {
            state
                .router
                .broadcast_except(sender, RelayFrame::Text(text))
                .await;
            Ok(())
        }
    }
}

/// Deliver a structured error event back to the sender's own socket
async fn report_routing_error(
    ws_tx: &mut futures::stream::SplitSink<WebSocket, Message>,
    username: &str,
    error: &RelayError,
) {
    logger::warning(
        LogTag::Relay,
        &format!("Routing error for frame from {}: {}", username, error),
    );

    let event = ServerEvent::Error {
        message: error.to_string(),
    };
    if let Ok(json) = event.to_json() {
        let _ = ws_tx.send(Message::Text(json)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apis::MediaServices;
    use crate::config::Config;
    use crate::core::RelayResult;
    use async_trait::async_trait;
    use tokio::sync::mpsc::Receiver;

    struct NoMedia;

    #[async_trait]
    impl MediaServices for NoMedia {
        async fn transcribe(&self, _audio: Vec<u8>, _filename: &str) -> RelayResult<String> {
            Err(RelayError::Config("media disabled in tests".to_string()))
        }

        async fn generate_image(&self, _prompt: &str) -> RelayResult<String> {
            Err(RelayError::Config("media disabled in tests".to_string()))
        }

        async fn followup_ideas(&self, _transcript: &str) -> RelayResult<String> {
            Err(RelayError::Config("media disabled in tests".to_string()))
        }
    }

    fn relay_state() -> Arc<AppState> {
        Arc::new(AppState::with_media(Config::default(), Arc::new(NoMedia)))
    }

    async fn join(state: &Arc<AppState>, identity: &str) -> Receiver<RelayFrame> {
        let (handle, rx) = state.registry.open_connection();
        state.registry.register(identity, handle).await;
        rx
    }

    fn expect_text(frame: Option<RelayFrame>) -> String {
        match frame {
            Some(RelayFrame::Text(text)) => text,
            other => panic!("expected text frame, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_targeted_frame_reaches_target_verbatim() {
        let state = relay_state();
        let mut alice_rx = join(&state, "alice").await;
        let mut bob_rx = join(&state, "bob").await;
        let mut carol_rx = join(&state, "carol").await;

        let raw = r#"{"to":"bob","sdp":"offer-1"}"#.to_string();
        route_inbound(&state, "alice", raw.clone()).await.unwrap();

        // The payload arrives untouched, `to` field included, at the target
        // only
        assert_eq!(expect_text(bob_rx.recv().await), raw);
        assert!(alice_rx.try_recv().is_err());
        assert!(carol_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_untargeted_frame_broadcasts_except_sender() {
        let state = relay_state();
        let mut alice_rx = join(&state, "alice").await;
        let mut bob_rx = join(&state, "bob").await;
        let mut carol_rx = join(&state, "carol").await;

        route_inbound(&state, "alice", "hello everyone".to_string())
            .await
            .unwrap();

        assert_eq!(expect_text(bob_rx.recv().await), "hello everyone");
        assert_eq!(expect_text(carol_rx.recv().await), "hello everyone");
        assert!(alice_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_targeted_frame_to_absent_identity_is_reported() {
        let state = relay_state();
        let mut alice_rx = join(&state, "alice").await;
        let mut bob_rx = join(&state, "bob").await;

        let result = route_inbound(
            &state,
            "alice",
            r#"{"to":"nobody","sdp":"x"}"#.to_string(),
        )
        .await;

        match result {
            Err(RelayError::RecipientNotFound { identity }) => assert_eq!(identity, "nobody"),
            other => panic!("expected RecipientNotFound, got {:?}", other),
        }

        // No broadcast fallback: nothing was delivered anywhere
        assert!(alice_rx.try_recv().is_err());
        assert!(bob_rx.try_recv().is_err());
    }
}
