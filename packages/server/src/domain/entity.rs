//! Domain entities: claims, the slot board and live connections.

use super::{
    error::SlotError,
    value_object::{ConnectionId, Identity, Payload, Timestamp},
};

/// Default number of slots on a board
pub const DEFAULT_SLOT_COUNT: usize = 20;

/// A claim occupying one slot
///
/// Holding a `Payload` (never empty) and an `Identity` keeps the rule that a
/// claimed slot always has both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claim {
    pub owner: Identity,
    pub payload: Payload,
    pub claimed_at: Timestamp,
}

impl Claim {
    pub fn new(owner: Identity, payload: Payload, claimed_at: Timestamp) -> Self {
        Self {
            owner,
            payload,
            claimed_at,
        }
    }

    pub fn is_owned_by(&self, identity: &Identity) -> bool {
        &self.owner == identity
    }
}

/// A claim removed by the sweeper, with the slot it was removed from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvictedClaim {
    pub index: usize,
    pub claim: Claim,
}

/// Public, owner-free view of the board at one version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotSnapshot {
    /// Board version this snapshot was taken at
    pub version: u64,
    /// Payload of each slot, `None` for empty slots
    pub payloads: Vec<Option<String>>,
}

impl SlotSnapshot {
    pub fn len(&self) -> usize {
        self.payloads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }

    /// Number of claimed slots
    pub fn claimed_count(&self) -> usize {
        self.payloads.iter().filter(|p| p.is_some()).count()
    }
}

/// Fixed-size ordered sequence of slots, each empty or claimed.
///
/// A plain indexed container: every rule about who may change what lives in
/// `protocol`. The version is bumped on every `set` so snapshots can be
/// ordered.
#[derive(Debug, Clone)]
pub struct SlotBoard {
    slots: Vec<Option<Claim>>,
    version: u64,
}

impl SlotBoard {
    /// Create a board with `slot_count` empty slots
    pub fn new(slot_count: usize) -> Self {
        Self {
            slots: vec![None; slot_count],
            version: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn get(&self, index: usize) -> Result<Option<&Claim>, SlotError> {
        self.slots
            .get(index)
            .map(Option::as_ref)
            .ok_or(SlotError::IndexOutOfRange {
                index,
                len: self.slots.len(),
            })
    }

    /// Replace the content of slot `index`, returning what was there
    pub fn set(&mut self, index: usize, slot: Option<Claim>) -> Result<Option<Claim>, SlotError> {
        let len = self.slots.len();
        let target = self
            .slots
            .get_mut(index)
            .ok_or(SlotError::IndexOutOfRange { index, len })?;
        let previous = std::mem::replace(target, slot);
        self.version += 1;
        Ok(previous)
    }

    /// Indices of every slot currently claimed by `identity`
    pub fn indices_owned_by(&self, identity: &Identity) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| match slot {
                Some(claim) if claim.is_owned_by(identity) => Some(index),
                _ => None,
            })
            .collect()
    }

    /// Iterate over `(index, claim)` for every claimed slot
    pub fn claims(&self) -> impl Iterator<Item = (usize, &Claim)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|claim| (index, claim)))
    }

    pub fn snapshot(&self) -> SlotSnapshot {
        SlotSnapshot {
            version: self.version,
            payloads: self
                .slots
                .iter()
                .map(|slot| slot.as_ref().map(|claim| claim.payload.as_str().to_string()))
                .collect(),
        }
    }
}

impl Default for SlotBoard {
    fn default() -> Self {
        Self::new(DEFAULT_SLOT_COUNT)
    }
}

/// One live client connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub id: ConnectionId,
    pub identity: Identity,
    pub connected_at: Timestamp,
}

impl Connection {
    pub fn new(identity: Identity, connected_at: Timestamp) -> Self {
        Self {
            id: ConnectionId::generate(),
            identity,
            connected_at,
        }
    }
}
