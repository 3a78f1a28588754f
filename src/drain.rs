//! Draining pending readings to the remote sink.

use std::collections::VecDeque;

use tracing::debug;

use crate::buffer::{DurableBuffer, Entry};
use crate::error::Result;
use crate::sink::RemoteSink;

/// Drain `pending` into `sink` one reading at a time, oldest first,
/// re-checkpointing the shrinking remainder to `buffer` after every
/// confirmed insert.
///
/// A reading leaves the cursor only after the sink has accepted it, so an
/// insert failure aborts the loop with the failing reading still present
/// in the last checkpoint; the next scheduled run reloads and retries it.
///
/// Returns the number of readings drained.
pub async fn drain<S: RemoteSink>(
    pending: Vec<Entry>,
    sink: &S,
    buffer: &DurableBuffer,
) -> Result<usize> {
    let mut remaining: VecDeque<Entry> = pending.into();
    let total = remaining.len();

    while let Some(entry) = remaining.front() {
        sink.insert_one(entry).await?;
        debug!("persisted reading {}", entry.encode());
        remaining.pop_front();
        buffer.save(remaining.make_contiguous())?;
    }

    Ok(total)
}
