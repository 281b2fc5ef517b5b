//! Candle lighting server library.
//!
//! A fixed row of slots ("candles") shared by every connected client. A client
//! lights an empty candle with a message, may rewrite or blow out its own
//! candle, and every change is pushed to all clients as a full snapshot.
//! Candles that are not refreshed within the TTL are blown out by a
//! background sweeper.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
