/// Signal router - delivery policy over the connection registry
///
/// Three delivery modes: broadcast-to-all-except-sender, unicast by
/// identity, and presence notifications. All deliveries go through
/// `try_send` on the recipient's bounded queue, outside the registry lock,
/// so a slow or dead recipient is recorded and skipped instead of stalling
/// anyone else. The router never mutates the registry: closed channels it
/// encounters are left for the owning connection's read loop to clean up.
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::{
    arguments::is_debug_relay_enabled,
    core::{DeliveryFailureReason, RelayError, RelayResult},
    logger::{self, LogTag},
};

use super::message::{RelayFrame, ServerEvent};
use super::registry::ConnectionRegistry;

// ============================================================================
// DELIVERY REPORT
// ============================================================================

/// One failed recipient within a broadcast
#[derive(Debug, Clone)]
pub struct DeliveryFailure {
    pub identity: String,
    pub reason: DeliveryFailureReason,
}

/// Outcome of a broadcast: who got the frame, who did not and why.
///
/// Used for logging and observability only; a partial broadcast is not an
/// error and never aborts the remaining deliveries.
#[derive(Debug, Clone, Default)]
pub struct DeliveryReport {
    pub delivered: usize,
    pub failures: Vec<DeliveryFailure>,
}

impl DeliveryReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

// ============================================================================
// SIGNAL ROUTER
// ============================================================================

/// Delivery-policy layer built on [`ConnectionRegistry`]
#[derive(Clone)]
pub struct SignalRouter {
    registry: Arc<ConnectionRegistry>,
}

impl SignalRouter {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// Deliver a frame to every registered identity except the sender.
    ///
    /// Each delivery is attempted independently; failures are recorded in
    /// the report, never propagated.
    pub async fn broadcast_except(&self, sender: &str, frame: RelayFrame) -> DeliveryReport {
        let snapshot = self.registry.snapshot().await;
        let mut report = DeliveryReport::default();

        for (identity, handle) in snapshot {
            if identity == sender {
                continue;
            }

            match handle.try_send(frame.clone()) {
                Ok(()) => {
                    report.delivered += 1;
                }
                Err(mpsc::error::TrySendError::Full(_)) => {
                    report.failures.push(DeliveryFailure {
                        identity,
                        reason: DeliveryFailureReason::QueueFull,
                    });
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    // Dead connection; its own read loop owns the cleanup.
                    report.failures.push(DeliveryFailure {
                        identity,
                        reason: DeliveryFailureReason::Closed,
                    });
                }
            }
        }

        if is_debug_relay_enabled() {
            logger::debug(
                LogTag::Relay,
                &format!(
                    "Broadcast from {} ({}): delivered={}, failed={}",
                    sender,
                    frame.kind(),
                    report.delivered,
                    report.failures.len()
                ),
            );
        }

        if !report.is_clean() {
            for failure in &report.failures {
                logger::warning(
                    LogTag::Relay,
                    &format!(
                        "Dropped frame for {} during broadcast from {} ({})",
                        failure.identity, sender, failure.reason
                    ),
                );
            }
        }

        report
    }

    /// Deliver a frame to exactly one identity.
    ///
    /// Fails with `RecipientNotFound` when the identity is not registered
    /// and `DeliveryFailed` when it is registered but its queue rejects the
    /// frame. Never falls back to broadcast, never removes entries.
    pub async fn unicast(&self, target: &str, frame: RelayFrame) -> RelayResult<()> {
        let handle = match self.registry.get(target).await {
            Some(handle) => handle,
            None => {
                return Err(RelayError::RecipientNotFound {
                    identity: target.to_string(),
                });
            }
        };

        match handle.try_send(frame) {
            Ok(()) => {
                if is_debug_relay_enabled() {
                    logger::debug(LogTag::Relay, &format!("Unicast delivered to {}", target));
                }
                Ok(())
            }
            Err(mpsc::error::TrySendError::Full(_)) => Err(RelayError::DeliveryFailed {
                identity: target.to_string(),
                reason: DeliveryFailureReason::QueueFull,
            }),
            Err(mpsc::error::TrySendError::Closed(_)) => Err(RelayError::DeliveryFailed {
                identity: target.to_string(),
                reason: DeliveryFailureReason::Closed,
            }),
        }
    }

    /// Announce a newly registered identity to everyone else.
    ///
    /// Call after `register` so the snapshot reflects the post-mutation
    /// state.
    pub async fn notify_connected(&self, identity: &str) -> DeliveryReport {
        self.notify(identity, ServerEvent::UserConnected {
            username: identity.to_string(),
        }).await
    }

    /// Announce a removed identity to everyone still connected.
    ///
    /// Call after `unregister`/`unregister_exact` succeeded, and only once
    /// per closed connection.
    pub async fn notify_disconnected(&self, identity: &str) -> DeliveryReport {
        self.notify(identity, ServerEvent::UserDisconnected {
            username: identity.to_string(),
        }).await
    }

    async fn notify(&self, identity: &str, event: ServerEvent) -> DeliveryReport {
        match event.to_frame() {
            Ok(frame) => self.broadcast_except(identity, frame).await,
            Err(e) => {
                logger::error(
                    LogTag::Relay,
                    &format!("Failed to serialize presence event for {}: {}", identity, e),
                );
                DeliveryReport::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::Receiver;

    async fn connect(
        router: &SignalRouter,
        identity: &str,
    ) -> Receiver<RelayFrame> {
        let (handle, rx) = router.registry().open_connection();
        router.registry().register(identity, handle).await;
        rx
    }

    fn expect_text(frame: Option<RelayFrame>) -> String {
        match frame {
            Some(RelayFrame::Text(text)) => text,
            other => panic!("expected text frame, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_broadcast_excludes_sender() {
        let router = SignalRouter::new(ConnectionRegistry::new(8));
        let mut alice_rx = connect(&router, "alice").await;
        let mut bob_rx = connect(&router, "bob").await;
        let mut carol_rx = connect(&router, "carol").await;

        let report = router
            .broadcast_except("alice", RelayFrame::Text("hello".to_string()))
            .await;

        assert_eq!(report.delivered, 2);
        assert!(report.is_clean());
        assert_eq!(expect_text(bob_rx.recv().await), "hello");
        assert_eq!(expect_text(carol_rx.recv().await), "hello");
        assert!(alice_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_broadcast_isolates_dead_recipient() {
        let router = SignalRouter::new(ConnectionRegistry::new(8));
        let _alice_rx = connect(&router, "alice").await;
        let bob_rx = connect(&router, "bob").await;
        let mut carol_rx = connect(&router, "carol").await;

        // Bob's connection dies without cleaning up its registry entry yet
        drop(bob_rx);

        let report = router
            .broadcast_except("alice", RelayFrame::Text("hello".to_string()))
            .await;

        assert_eq!(report.delivered, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].identity, "bob");
        assert_eq!(report.failures[0].reason, DeliveryFailureReason::Closed);

        // Carol still got the frame
        assert_eq!(expect_text(carol_rx.recv().await), "hello");

        // Broadcast never evicts entries; bob's read loop owns that
        assert!(router.registry().get("bob").await.is_some());
    }

    #[tokio::test]
    async fn test_broadcast_records_full_queue() {
        let router = SignalRouter::new(ConnectionRegistry::new(1));
        let _alice_rx = connect(&router, "alice").await;
        let _bob_rx = connect(&router, "bob").await;

        // First frame fills bob's queue of 1, second is dropped for him
        let first = router
            .broadcast_except("alice", RelayFrame::Text("one".to_string()))
            .await;
        let second = router
            .broadcast_except("alice", RelayFrame::Text("two".to_string()))
            .await;

        assert!(first.is_clean());
        assert_eq!(second.delivered, 0);
        assert_eq!(second.failures.len(), 1);
        assert_eq!(second.failures[0].reason, DeliveryFailureReason::QueueFull);
    }

    #[tokio::test]
    async fn test_unicast_delivers_only_to_target() {
        let router = SignalRouter::new(ConnectionRegistry::new(8));
        let mut alice_rx = connect(&router, "alice").await;
        let mut bob_rx = connect(&router, "bob").await;

        router
            .unicast("bob", RelayFrame::Text("direct".to_string()))
            .await
            .unwrap();

        assert_eq!(expect_text(bob_rx.recv().await), "direct");
        assert!(alice_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_unicast_to_absent_identity() {
        let router = SignalRouter::new(ConnectionRegistry::new(8));
        let mut alice_rx = connect(&router, "alice").await;

        let result = router
            .unicast("carol", RelayFrame::Text("hi".to_string()))
            .await;

        match result {
            Err(RelayError::RecipientNotFound { identity }) => assert_eq!(identity, "carol"),
            other => panic!("expected RecipientNotFound, got {:?}", other),
        }
        // No delivery occurred anywhere
        assert!(alice_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_unicast_to_unwritable_target() {
        let router = SignalRouter::new(ConnectionRegistry::new(8));
        let bob_rx = connect(&router, "bob").await;
        drop(bob_rx);

        let result = router
            .unicast("bob", RelayFrame::Text("hi".to_string()))
            .await;

        match result {
            Err(RelayError::DeliveryFailed { identity, reason }) => {
                assert_eq!(identity, "bob");
                assert_eq!(reason, DeliveryFailureReason::Closed);
            }
            other => panic!("expected DeliveryFailed, got {:?}", other),
        }
        // The entry stays; closure belongs to bob's own read loop
        assert!(router.registry().get("bob").await.is_some());
    }

    #[tokio::test]
    async fn test_rebound_identity_receives_on_new_connection_only() {
        let router = SignalRouter::new(ConnectionRegistry::new(8));
        let _alice_rx = connect(&router, "alice").await;

        let mut old_rx = connect(&router, "bob").await;
        let mut new_rx = connect(&router, "bob").await;

        router
            .unicast("bob", RelayFrame::Text("fresh".to_string()))
            .await
            .unwrap();

        assert_eq!(expect_text(new_rx.recv().await), "fresh");
        assert!(old_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_presence_notifications() {
        let router = SignalRouter::new(ConnectionRegistry::new(8));
        let mut alice_rx = connect(&router, "alice").await;
        let bob_rx = connect(&router, "bob").await;

        let report = router.notify_connected("bob").await;
        assert_eq!(report.delivered, 1);
        assert_eq!(
            expect_text(alice_rx.recv().await),
            r#"{"type":"user_connected","username":"bob"}"#
        );

        // Bob disconnects: unregister first, then notify from the
        // post-removal snapshot
        drop(bob_rx);
        assert!(router.registry().unregister("bob").await);
        let report = router.notify_disconnected("bob").await;
        assert_eq!(report.delivered, 1);
        assert!(report.is_clean());
        assert_eq!(
            expect_text(alice_rx.recv().await),
            r#"{"type":"user_disconnected","username":"bob"}"#
        );

        // Exactly one notification
        assert!(alice_rx.try_recv().is_err());
    }

    /// End-to-end routing scenario: alice and bob connected, alice
    /// broadcasts, bob disconnects, alice is told once.
    #[tokio::test]
    async fn test_two_user_session_flow() {
        let router = SignalRouter::new(ConnectionRegistry::new(8));
        let mut alice_rx = connect(&router, "alice").await;
        let mut bob_rx = connect(&router, "bob").await;

        let report = router
            .broadcast_except("alice", RelayFrame::Text("hello".to_string()))
            .await;
        assert_eq!(report.delivered, 1);
        assert_eq!(expect_text(bob_rx.recv().await), "hello");
        assert!(alice_rx.try_recv().is_err());

        router.registry().unregister("bob").await;
        router.notify_disconnected("bob").await;
        assert_eq!(
            expect_text(alice_rx.recv().await),
            r#"{"type":"user_disconnected","username":"bob"}"#
        );
        assert!(alice_rx.try_recv().is_err());
    }
}
