/// Realtime relay core
///
/// This module implements the connection registry and message router behind
/// the `/ws/:username` endpoint:
/// - `registry`: identity → connection map, the single source of truth for
///   who is online
/// - `router`: delivery policy (broadcast-except-sender, unicast, presence
///   notifications)
/// - `message`: outbound frames, server events, and inbound routing
/// - `connection`: the per-connection task gluing the socket to both

pub mod connection;
pub mod message;
pub mod registry;
pub mod router;

pub use connection::handle_connection;
pub use message::{routing_target, RelayFrame, ServerEvent};
pub use registry::{ConnectionHandle, ConnectionId, ConnectionRegistry};
pub use router::{DeliveryFailure, DeliveryReport, SignalRouter};
