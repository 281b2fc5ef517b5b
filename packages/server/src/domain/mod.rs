//! Domain layer: slots, claims and the rules that govern them.
//!
//! Nothing in this module performs I/O. The traits in `repository` and
//! `message_pusher` are implemented by the infrastructure layer.

pub mod entity;
pub mod error;
pub mod identity;
pub mod message_pusher;
pub mod protocol;
pub mod repository;
pub mod value_object;

pub use entity::{Claim, Connection, EvictedClaim, SlotBoard, SlotSnapshot};
pub use error::{MessagePushError, SlotError, ValueObjectError};
pub use identity::resolve_identity;
pub use message_pusher::{
    BroadcastReport, MessagePusher, PusherChannel, PusherReceiver, pusher_channel,
};
pub use protocol::{apply_claim, sweep_expired};
pub use repository::{ClaimOutcome, SlotRepository, SweepOutcome};
pub use value_object::{ClaimCommand, ClaimRequest, ConnectionId, Identity, Payload, Timestamp};
