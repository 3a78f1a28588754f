//! Remote time-series sink.
//!
//! The drain loop only needs two operations from the remote store, so the
//! store sits behind a narrow trait and the MongoDB client stays in its
//! own adapter.

pub mod mongo;

pub use mongo::MongoSink;

use std::future::Future;

use crate::buffer::Entry;
use crate::error::Result;

/// A remote store that accepts one reading at a time.
pub trait RemoteSink {
    /// Make sure the remote collection exists. Idempotent; called once per
    /// cycle before draining.
    fn ensure_schema(&self) -> impl Future<Output = Result<()>>;

    /// Persist a single reading. Success means the reading is durable on
    /// the remote side and may be dropped from the local buffer.
    fn insert_one(&self, entry: &Entry) -> impl Future<Output = Result<()>>;
}
