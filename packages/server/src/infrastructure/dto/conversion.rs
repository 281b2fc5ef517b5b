//! Conversion logic between DTOs and domain types.

use thiserror::Error;

use crate::domain::{ClaimCommand, ClaimRequest, SlotSnapshot};
use crate::infrastructure::dto::{
    http::SlotsSummaryDto,
    websocket::{ClaimRequestMessage, SlotsMessage},
};

/// Reasons an inbound frame cannot be turned into a claim command
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Not JSON, missing a field, or a field of the wrong type
    #[error("Malformed claim request: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Slot indices are never negative
    #[error("Slot index {0} is negative")]
    NegativeIndex(i64),

    /// Binary frame that is not UTF-8
    #[error("Binary frame is not valid UTF-8")]
    InvalidUtf8,
}

// ========================================
// DTO → Domain
// ========================================

impl TryFrom<ClaimRequestMessage> for ClaimCommand {
    type Error = DecodeError;

    fn try_from(dto: ClaimRequestMessage) -> Result<Self, Self::Error> {
        let index = usize::try_from(dto.i).map_err(|_| DecodeError::NegativeIndex(dto.i))?;
        Ok(Self {
            index,
            request: ClaimRequest::from(dto.message),
        })
    }
}

/// Decode one inbound text frame into a claim command
pub fn decode_claim_command(text: &str) -> Result<ClaimCommand, DecodeError> {
    let dto: ClaimRequestMessage = serde_json::from_str(text)?;
    ClaimCommand::try_from(dto)
}

/// Decode one inbound binary frame carrying UTF-8 JSON
pub fn decode_claim_command_bytes(bytes: &[u8]) -> Result<ClaimCommand, DecodeError> {
    let text = std::str::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8)?;
    decode_claim_command(text)
}

// ========================================
// Domain → DTO
// ========================================

impl From<&SlotSnapshot> for SlotsMessage {
    fn from(snapshot: &SlotSnapshot) -> Self {
        Self(snapshot.payloads.clone())
    }
}

impl From<SlotSnapshot> for SlotsSummaryDto {
    fn from(snapshot: SlotSnapshot) -> Self {
        Self {
            slot_count: snapshot.len(),
            claimed: snapshot.claimed_count(),
            slots: snapshot.payloads,
        }
    }
}

/// Encode a snapshot as the outbound wire array
pub fn encode_snapshot(snapshot: &SlotSnapshot) -> Result<String, serde_json::Error> {
    serde_json::to_string(&SlotsMessage::from(snapshot))
}
