use thiserror::Error;

/// Why a queued delivery to a specific recipient was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryFailureReason {
    /// The recipient's outbound queue is full (slow consumer).
    QueueFull,
    /// The recipient's outbound channel is closed (connection tearing down).
    Closed,
}

impl std::fmt::Display for DeliveryFailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryFailureReason::QueueFull => write!(f, "queue full"),
            DeliveryFailureReason::Closed => write!(f, "channel closed"),
        }
    }
}

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Recipient not found: {identity}")] RecipientNotFound {
        identity: String,
    },

    #[error("Delivery to {identity} failed: {reason}")] DeliveryFailed {
        identity: String,
        reason: DeliveryFailureReason,
    },

    /// Read-loop termination on a transport error; logged by the owning
    /// connection task before it runs its cleanup.
    #[error("Transport closed")] TransportClosed,

    #[error("Configuration error: {0}")] Config(String),

    #[error("IO error: {0}")] Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")] Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")] Http(#[from] reqwest::Error),

    #[error("API error from {provider}: {message}")] Api {
        provider: String,
        message: String,
    },

    #[error("Server error: {0}")] Server(String),
}

impl RelayError {
    /// Whether the operation can sensibly be retried by the caller.
    pub fn is_recoverable(&self) -> bool {
        match self {
            RelayError::Http(_) => true,
            RelayError::Api { .. } => true,
            RelayError::DeliveryFailed {
                reason: DeliveryFailureReason::QueueFull,
                ..
            } => true,
            _ => false,
        }
    }
}

pub type RelayResult<T> = Result<T, RelayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = RelayError::RecipientNotFound {
            identity: "carol".to_string(),
        };
        assert_eq!(err.to_string(), "Recipient not found: carol");

        let err = RelayError::DeliveryFailed {
            identity: "bob".to_string(),
            reason: DeliveryFailureReason::QueueFull,
        };
        assert_eq!(err.to_string(), "Delivery to bob failed: queue full");

        assert_eq!(RelayError::TransportClosed.to_string(), "Transport closed");
    }

    #[test]
    fn test_recoverable_classification() {
        assert!(RelayError::DeliveryFailed {
            identity: "bob".to_string(),
            reason: DeliveryFailureReason::QueueFull,
        }
        .is_recoverable());

        assert!(!RelayError::DeliveryFailed {
            identity: "bob".to_string(),
            reason: DeliveryFailureReason::Closed,
        }
        .is_recoverable());

        assert!(!RelayError::Config("missing api key".to_string()).is_recoverable());
    }
}
