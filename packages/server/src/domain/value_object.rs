//! Value objects used across the slot domain.

use std::fmt;

use uuid::Uuid;

use super::error::ValueObjectError;

/// Best-effort client identity derived from the network origin.
///
/// Not authenticated. Clients behind the same NAT share an identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity(String);

impl Identity {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Free-form text attached to a claim. Opaque to the server, never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload(String);

impl Payload {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::EmptyPayload);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for Payload {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Unix timestamp in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    /// Milliseconds elapsed from `earlier` to `self` (negative if `earlier` is later).
    pub fn millis_since(&self, earlier: Timestamp) -> i64 {
        self.0.saturating_sub(earlier.0)
    }
}

/// Unique handle of one live connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// What a client asks to do with a slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimRequest {
    /// Claim the slot (or refresh an owned claim) with this payload
    Light(Payload),
    /// Release an owned claim
    Release,
}

impl From<Option<String>> for ClaimRequest {
    /// `None` and the empty string both mean release.
    fn from(message: Option<String>) -> Self {
        match message.map(Payload::new) {
            Some(Ok(payload)) => ClaimRequest::Light(payload),
            Some(Err(_)) | None => ClaimRequest::Release,
        }
    }
}

/// A decoded inbound request: which slot, and what to do with it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimCommand {
    pub index: usize,
    pub request: ClaimRequest,
}
