//! Console client for the Tomoshibi candle server.

pub mod command;
mod domain;
pub mod error;
pub mod formatter;
mod runner;
mod session;
mod ui;

pub use runner::run_client;
