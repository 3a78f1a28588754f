//! End-to-end collect-and-drain cycles with mocked collaborators.
//!
//! The probe, sink, and pinger are in-memory doubles; the buffer is a real
//! file in a temp directory, since the crash-safety story lives there.

use std::cell::{Cell, RefCell};
use std::fs;
use std::path::Path;
use std::rc::Rc;

use chrono_tz::Tz;
use templog::{
    Collector, DurableBuffer, Entry, Pinger, RemoteSink, Result, TemperatureProbe, TemplogError,
};

const TZ: Tz = chrono_tz::America::Chicago;

struct FixedProbe {
    celsius: f64,
}

impl TemperatureProbe for FixedProbe {
    fn read_celsius(&self) -> Result<f64> {
        Ok(self.celsius)
    }
}

/// Sink that records accepted readings and fails every insert once a limit
/// is reached.
#[derive(Clone, Default)]
struct RecordingSink {
    inserted: Rc<RefCell<Vec<Entry>>>,
    fail_after: Option<usize>,
}

impl RemoteSink for RecordingSink {
    async fn ensure_schema(&self) -> Result<()> {
        Ok(())
    }

    async fn insert_one(&self, entry: &Entry) -> Result<()> {
        if let Some(limit) = self.fail_after {
            if self.inserted.borrow().len() >= limit {
                return Err(TemplogError::remote_insert_error("store unavailable"));
            }
        }
        self.inserted.borrow_mut().push(entry.clone());
        Ok(())
    }
}

#[derive(Clone, Default)]
struct RecordingPinger {
    pings: Rc<Cell<u32>>,
}

impl Pinger for RecordingPinger {
    async fn ping(&self) -> Result<()> {
        self.pings.set(self.pings.get() + 1);
        Ok(())
    }
}

fn buffer_in(dir: &Path) -> DurableBuffer {
    DurableBuffer::new(dir.join("unsaved_entries.csv"), TZ)
}

#[tokio::test]
async fn fresh_reading_is_drained_and_healthcheck_fires() {
    let dir = tempfile::tempdir().unwrap();
    let sink = RecordingSink::default();
    let pinger = RecordingPinger::default();
    let collector = Collector::new(
        FixedProbe { celsius: 22.5 },
        sink.clone(),
        pinger.clone(),
        buffer_in(dir.path()),
        TZ,
    );

    collector.run().await.unwrap();

    let inserted = sink.inserted.borrow();
    assert_eq!(inserted.len(), 1);
    assert_eq!(inserted[0].temperature, 72.5);
    assert!(buffer_in(dir.path()).load().unwrap().is_empty());
    assert_eq!(pinger.pings.get(), 1);
}

#[tokio::test]
async fn backlog_from_a_failed_run_drains_before_the_fresh_reading() {
    let dir = tempfile::tempdir().unwrap();
    let buffer = buffer_in(dir.path());
    fs::write(buffer.path(), "01-01-2024 10:00:00,70.0\n").unwrap();

    let sink = RecordingSink::default();
    let pinger = RecordingPinger::default();
    let collector = Collector::new(
        FixedProbe { celsius: 20.0 },
        sink.clone(),
        pinger.clone(),
        buffer,
        TZ,
    );

    collector.run().await.unwrap();

    let inserted = sink.inserted.borrow();
    assert_eq!(inserted.len(), 2);
    assert_eq!(inserted[0].temperature, 70.0);
    assert_eq!(inserted[0].encode(), "01-01-2024 10:00:00,70.0");
    assert_eq!(inserted[1].temperature, 68.0);
    assert!(buffer_in(dir.path()).load().unwrap().is_empty());
    assert_eq!(pinger.pings.get(), 1);
}

#[tokio::test]
async fn failed_insert_aborts_the_cycle_and_keeps_the_rest_buffered() {
    let dir = tempfile::tempdir().unwrap();
    let buffer = buffer_in(dir.path());
    fs::write(buffer.path(), "01-01-2024 10:00:00,70.0\n").unwrap();

    let sink = RecordingSink {
        fail_after: Some(1),
        ..Default::default()
    };
    let pinger = RecordingPinger::default();
    let collector = Collector::new(
        FixedProbe { celsius: 30.0 },
        sink.clone(),
        pinger.clone(),
        buffer,
        TZ,
    );

    let result = collector.run().await;

    assert!(matches!(result, Err(TemplogError::RemoteInsert(_))));
    // the backlog entry made it out; the fresh reading did not
    let inserted = sink.inserted.borrow();
    assert_eq!(inserted.len(), 1);
    assert_eq!(inserted[0].temperature, 70.0);
    // the reading whose insert failed is still checkpointed for the next
    // run, never dropped before the sink confirms it
    let remaining = buffer_in(dir.path()).load().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].temperature, 86.0);
    // no healthcheck without a fully drained buffer
    assert_eq!(pinger.pings.get(), 0);
}

#[tokio::test]
async fn malformed_backlog_lines_do_not_poison_the_cycle() {
    let dir = tempfile::tempdir().unwrap();
    let buffer = buffer_in(dir.path());
    fs::write(
        buffer.path(),
        "01-01-2024 10:00:00,70.0\ncorrupted line\n01-01-2024 10:05:00,70.5\n",
    )
    .unwrap();

    let sink = RecordingSink::default();
    let pinger = RecordingPinger::default();
    let collector = Collector::new(
        FixedProbe { celsius: 20.0 },
        sink.clone(),
        pinger.clone(),
        buffer,
        TZ,
    );

    collector.run().await.unwrap();

    let inserted = sink.inserted.borrow();
    assert_eq!(inserted.len(), 3);
    assert_eq!(inserted[0].temperature, 70.0);
    assert_eq!(inserted[1].temperature, 70.5);
    assert_eq!(inserted[2].temperature, 68.0);
    assert_eq!(pinger.pings.get(), 1);
}
