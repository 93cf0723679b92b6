pub mod error;

pub use error::{DeliveryFailureReason, RelayError, RelayResult};
