//! Value Objects for domain models.
//!
//! Value Objects are immutable objects that represent values in the domain.
//! They are compared by their value, not by identity.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::ValueObjectError;

/// User identifier value object.
///
/// Represents the stable unique identifier of an authenticated user.
/// Identity resolution itself belongs to the user repository; this type
/// only guards the shape of the id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(i64);

impl UserId {
    /// Create a new UserId.
    ///
    /// # Returns
    ///
    /// A Result containing the UserId or an error if the id is not positive
    pub fn new(id: i64) -> Result<Self, ValueObjectError> {
        if id <= 0 {
            return Err(ValueObjectError::UserIdInvalid(id));
        }
        Ok(Self(id))
    }

    /// Get the inner i64 value.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Routing key value object.
///
/// Identifies a user's delivery group in the channel layer. Derivation is
/// pure and deterministic: the same user always maps to the same key, and
/// distinct users map to distinct keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoutingKey(String);

impl RoutingKey {
    /// Derive the routing key for a user's delivery group.
    pub fn for_user(user_id: UserId) -> Self {
        Self(format!("chat_{}", user_id.value()))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoutingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Message body value object.
///
/// Represents the content of a direct message with validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody(String);

impl MessageBody {
    const MAX_LEN: usize = 10_000;

    /// Create a new MessageBody.
    ///
    /// # Returns
    ///
    /// A Result containing the MessageBody or an error if validation fails
    pub fn new(body: String) -> Result<Self, ValueObjectError> {
        if body.is_empty() {
            return Err(ValueObjectError::MessageBodyEmpty);
        }
        let len = body.len();
        if len > Self::MAX_LEN {
            return Err(ValueObjectError::MessageBodyTooLong {
                max: Self::MAX_LEN,
                actual: len,
            });
        }
        Ok(Self(body))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for MessageBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Timestamp value object.
///
/// Represents a Unix timestamp in milliseconds (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Create a new Timestamp.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the inner i64 value.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
