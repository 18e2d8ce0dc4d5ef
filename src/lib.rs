#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// Typed `(operation, key)` commands and command-stream parsing.
pub mod command;

mod config;
mod error;

/// Events emitted by the table and the [`Observer`] trait that receives
/// them.
pub mod event;

pub mod hash_table;

/// The three-state slot model.
pub mod slot;

/// Tabulation hashing over 64-bit keys.
pub mod tabulation;

pub use command::Command;
pub use command::Op;
pub use config::Config;
pub use config::TOMBSTONE_THRESHOLD;
pub use error::Error;
pub use error::Result;
pub use event::Event;
pub use event::Observer;
#[cfg(any(test, feature = "stats"))]
pub use hash_table::DebugStats;
pub use hash_table::HashTable;
pub use hash_table::Probe;
pub use slot::Slot;
pub use tabulation::TabulationHasher;
