//! Claim protocol and expiry rules.
//!
//! | current slot          | request | result                                      |
//! |-----------------------|---------|---------------------------------------------|
//! | empty                 | light   | release requester's other slots, then claim |
//! | empty                 | release | no-op                                       |
//! | owned by requester    | light   | replace payload, refresh `claimed_at`       |
//! | owned by requester    | release | clear                                       |
//! | owned by someone else | any     | ignored                                     |
//!
//! The requester's other claims are only released on the empty -> claimed
//! transition. An identity that already holds several slots keeps them when it
//! refreshes one of them.

use std::time::Duration;

use super::{
    entity::{Claim, EvictedClaim, SlotBoard},
    error::SlotError,
    value_object::{ClaimRequest, Identity, Timestamp},
};

/// Apply one request from `identity` to slot `index`.
///
/// Returns `Ok(true)` iff the board changed. Requests against a slot owned by
/// another identity are silently ignored (`Ok(false)`).
///
/// # Errors
///
/// `SlotError::IndexOutOfRange` when `index` is not on the board. The board is
/// left untouched.
pub fn apply_claim(
    board: &mut SlotBoard,
    identity: &Identity,
    index: usize,
    request: ClaimRequest,
    now: Timestamp,
) -> Result<bool, SlotError> {
    let current_owner = board.get(index)?.map(|claim| claim.owner.clone());

    match (current_owner, request) {
        (None, ClaimRequest::Light(payload)) => {
            for owned in board.indices_owned_by(identity) {
                board.set(owned, None)?;
            }
            board.set(index, Some(Claim::new(identity.clone(), payload, now)))?;
            Ok(true)
        }
        (None, ClaimRequest::Release) => Ok(false),
        (Some(owner), ClaimRequest::Light(payload)) if &owner == identity => {
            board.set(index, Some(Claim::new(owner, payload, now)))?;
            Ok(true)
        }
        (Some(owner), ClaimRequest::Release) if &owner == identity => {
            board.set(index, None)?;
            Ok(true)
        }
        (Some(_), _) => Ok(false),
    }
}

/// Clear every claim older than `ttl` at `now`.
///
/// A claim expires when `now - claimed_at > ttl`. Returns the evicted claims in
/// slot order; an empty vector means the board did not change.
pub fn sweep_expired(board: &mut SlotBoard, now: Timestamp, ttl: Duration) -> Vec<EvictedClaim> {
    let ttl_millis = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);

    let expired: Vec<usize> = board
        .claims()
        .filter(|(_, claim)| now.millis_since(claim.claimed_at) > ttl_millis)
        .map(|(index, _)| index)
        .collect();

    expired
        .into_iter()
        .filter_map(|index| match board.set(index, None) {
            Ok(Some(claim)) => Some(EvictedClaim { index, claim }),
            _ => None,
        })
        .collect()
}
