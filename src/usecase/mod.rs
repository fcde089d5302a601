//! UseCase layer.
//!
//! Business logic of the delivery core, called from the UI layer and
//! operating on the domain layer through its ports.

pub mod error;
pub mod notification;
pub mod send_message;

pub use error::SendMessageError;
pub use notification::{DEFAULT_POLL_INTERVAL, NotificationUseCase};
pub use send_message::SendMessageUseCase;
