//! UseCase layer: one struct per application operation.

mod connect_client;
mod disconnect_client;
mod error;
mod get_slots;
mod submit_claim;
mod sweep_expired;

pub use connect_client::ConnectClientUseCase;
pub use disconnect_client::DisconnectClientUseCase;
pub use error::{ConnectError, DisconnectError, SubmitClaimError};
pub use get_slots::GetSlotsUseCase;
pub use submit_claim::SubmitClaimUseCase;
pub use sweep_expired::{DEFAULT_CLAIM_TTL, SweepExpiredUseCase};
