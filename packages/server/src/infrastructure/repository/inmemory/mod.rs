//! In-memory repository implementations.

pub mod slot;

pub use slot::InMemorySlotRepository;
