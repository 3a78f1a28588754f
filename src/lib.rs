//! # templog - Crash-Safe Temperature Logging
//!
//! A small Rust crate for logging one-wire temperature readings from a
//! Raspberry Pi into a remote time-series store, designed to be invoked
//! once per cycle by cron and to never silently lose a reading.
//!
//! ## Features
//!
//! - **Crash-safe local buffer**: readings are checkpointed to disk before
//!   any network attempt and re-checkpointed after every confirmed insert
//! - **Incremental draining**: a failure mid-batch keeps the undelivered
//!   suffix on disk for the next run
//! - **One-wire sensing**: DS18B20-family sensors via the kernel `w1` bus,
//!   with optional USB hub power-cycle recovery
//! - **Liveness beacon**: a healthcheck URL is pinged after each fully
//!   drained cycle
//! - **Library + Binary**: use as a crate or standalone application
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use templog::{Collector, Config, DurableBuffer, HttpPinger, MongoSink, W1Sensor};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_file(Path::new("config.json"))?;
//!     let tz = config.tz()?;
//!
//!     let collector = Collector::new(
//!         W1Sensor::new(config.hub_power_port),
//!         MongoSink::connect(&config).await?,
//!         HttpPinger::new(config.healthcheck_url.clone()),
//!         DurableBuffer::at_default_location(tz)?,
//!         tz,
//!     );
//!     collector.run().await?;
//!     Ok(())
//! }
//! ```

pub mod buffer;
pub mod collector;
pub mod config;
pub mod drain;
pub mod error;
pub mod healthcheck;
pub mod sensor;
pub mod sink;

// Re-export public API
pub use buffer::{DurableBuffer, Entry, EntryParseError};
pub use collector::Collector;
pub use config::Config;
pub use drain::drain;
pub use error::{Result, TemplogError};
pub use healthcheck::{HttpPinger, Pinger};
pub use sensor::{celsius_to_fahrenheit, TemperatureProbe, W1Sensor};
pub use sink::{MongoSink, RemoteSink};

/// File holding not-yet-persisted readings, next to the executable.
///
/// Deliberately not configurable: a crashed run and the run that recovers
/// its readings must agree on this path without consulting anything else.
pub const BUFFER_FILE_NAME: &str = "unsaved_entries.csv";

/// Default configuration file, next to the executable.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Remote database holding the time-series collection.
pub const DATABASE_NAME: &str = "templog";

/// Time-series collection the readings land in.
pub const COLLECTION_NAME: &str = "temperatures";
