//! Orchestration of one collect-and-drain cycle.

use chrono::{Timelike, Utc};
use chrono_tz::Tz;
use tracing::info;

use crate::buffer::{DurableBuffer, Entry};
use crate::drain::drain;
use crate::error::Result;
use crate::healthcheck::Pinger;
use crate::sensor::{celsius_to_fahrenheit, TemperatureProbe};
use crate::sink::RemoteSink;

/// Runs one logging cycle: load whatever earlier runs left behind, take a
/// fresh reading, checkpoint everything locally, then drain to the remote
/// store and ping the healthcheck.
pub struct Collector<P, S, H> {
    probe: P,
    sink: S,
    pinger: H,
    buffer: DurableBuffer,
    tz: Tz,
}

impl<P, S, H> Collector<P, S, H>
where
    P: TemperatureProbe,
    S: RemoteSink,
    H: Pinger,
{
    /// Assemble a collector from its collaborators.
    pub fn new(probe: P, sink: S, pinger: H, buffer: DurableBuffer, tz: Tz) -> Self {
        Self {
            probe,
            sink,
            pinger,
            buffer,
            tz,
        }
    }

    /// Take one reading: probe in Celsius, store in Fahrenheit, stamped
    /// with the configured timezone.
    pub fn capture(&self) -> Result<Entry> {
        let celsius = self.probe.read_celsius()?;
        let fahrenheit = celsius_to_fahrenheit(celsius);

        let now = Utc::now().with_timezone(&self.tz);
        // second resolution: the sub-second part would not survive the
        // buffer codec
        let now = now.with_nanosecond(0).unwrap_or(now);

        Ok(Entry::new(now, fahrenheit))
    }

    /// Everything owed to the remote store: the buffered backlog plus one
    /// fresh reading, oldest first.
    pub fn collect_pending(&self) -> Result<Vec<Entry>> {
        let mut pending = self.buffer.load()?;
        pending.push(self.capture()?);
        Ok(pending)
    }

    /// Run one full cycle.
    ///
    /// The full pending set is checkpointed before the first remote
    /// attempt, so a crash anywhere past that point loses nothing. The
    /// healthcheck fires only after every reading has been confirmed
    /// remote.
    pub async fn run(&self) -> Result<()> {
        let pending = self.collect_pending()?;
        self.buffer.save(&pending)?;
        info!("checkpointed {} pending reading(s)", pending.len());

        self.sink.ensure_schema().await?;
        let drained = drain(pending, &self.sink, &self.buffer).await?;
        info!("drained {} reading(s) to the remote store", drained);

        self.pinger.ping().await?;
        Ok(())
    }
}
