//! Keeper runs for Open Markets Oracle data feeds
//!
//! Each run reads its arguments, values the configured assets, and returns
//! an [`ExecResult`] saying whether calls should be submitted to the oracle.
//! Nothing is written on-chain from here.

pub mod aggregator;
pub mod config;
pub mod consensus;
pub mod decision;
pub mod error;
pub mod floor;
pub mod identity;
pub mod ledger;
pub mod mashup;
pub mod pointers;
pub mod providers;
pub mod secrets;
pub mod types;
pub mod update;

pub use error::MashupError;
pub use types::{CallData, ExecResult, Numeric};
