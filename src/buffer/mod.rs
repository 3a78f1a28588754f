//! Crash-safe local buffering of temperature readings.
//!
//! Readings that have not yet been confirmed by the remote store live in a
//! small snapshot file next to the executable. The file is rewritten in
//! full whenever the pending set changes, so at any moment it holds exactly
//! the readings a future run still has to deliver.

pub mod entry;
pub mod store;

// Re-export commonly used items
pub use entry::{Entry, EntryParseError};
pub use store::DurableBuffer;
