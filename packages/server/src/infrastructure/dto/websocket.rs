//! WebSocket message DTOs.

use serde::{Deserialize, Serialize};

/// Inbound request: `{"i": <slot index>, "message": <string> | null}`
///
/// Both fields are required. `message: null` asks to release the slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimRequestMessage {
    pub i: i64,
    #[serde(deserialize_with = "Option::deserialize")]
    pub message: Option<String>,
}

/// Outbound snapshot: one entry per slot, the payload or `null`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotsMessage(pub Vec<Option<String>>);
