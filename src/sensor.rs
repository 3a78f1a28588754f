//! One-wire temperature probe.
//!
//! Production hardware is a DS18B20-family sensor hanging off a USB
//! one-wire adapter; the kernel `w1` bus exposes it as a directory under
//! `/sys/bus/w1/devices` whose `w1_slave` file carries the raw frame.

use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;

use tracing::{info, warn};

use crate::error::{Result, TemplogError};

/// Where the kernel publishes enumerated one-wire devices.
pub const W1_DEVICES_DIR: &str = "/sys/bus/w1/devices";

/// Family code prefix for DS18B20 thermometers.
const W1_THERM_FAMILY_PREFIX: &str = "28-";

/// How long the bus gets to re-enumerate after a hub power-cycle.
const HUB_SETTLE: Duration = Duration::from_secs(3);

/// Convert a Celsius reading to Fahrenheit.
pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

/// Something that can produce a raw temperature reading.
pub trait TemperatureProbe {
    /// Read the current temperature in degrees Celsius.
    fn read_celsius(&self) -> Result<f64>;
}

/// Probe backed by the kernel one-wire bus.
pub struct W1Sensor {
    devices_dir: PathBuf,
    hub_power_port: Option<u8>,
}

impl W1Sensor {
    /// Probe over the standard sysfs bus location.
    pub fn new(hub_power_port: Option<u8>) -> Self {
        Self::with_devices_dir(W1_DEVICES_DIR, hub_power_port)
    }

    /// Probe over an explicit devices directory.
    pub fn with_devices_dir(devices_dir: impl Into<PathBuf>, hub_power_port: Option<u8>) -> Self {
        Self {
            devices_dir: devices_dir.into(),
            hub_power_port,
        }
    }

    fn read_device(&self) -> Result<f64> {
        let slave_path = self.find_sensor()?;
        let raw = fs::read_to_string(&slave_path)
            .map_err(|e| TemplogError::sensor_error(format!("{}: {}", slave_path.display(), e)))?;
        parse_w1_slave(&raw)
    }

    fn find_sensor(&self) -> Result<PathBuf> {
        let devices = fs::read_dir(&self.devices_dir).map_err(|e| {
            TemplogError::sensor_error(format!(
                "one-wire bus unavailable at {}: {}",
                self.devices_dir.display(),
                e
            ))
        })?;

        for device in devices {
            let device = device?;
            if device
                .file_name()
                .to_string_lossy()
                .starts_with(W1_THERM_FAMILY_PREFIX)
            {
                return Ok(device.path().join("w1_slave"));
            }
        }

        Err(TemplogError::sensor_error(format!(
            "no one-wire thermometer under {}",
            self.devices_dir.display()
        )))
    }
}

impl TemperatureProbe for W1Sensor {
    fn read_celsius(&self) -> Result<f64> {
        match self.read_device() {
            Ok(celsius) => Ok(celsius),
            Err(err) => {
                // A wedged USB adapter sometimes recovers after losing
                // power; try that once if we know which hub port it is on.
                let Some(port) = self.hub_power_port else {
                    return Err(err);
                };
                warn!("sensor read failed ({}), power-cycling hub port {}", err, port);
                if let Err(cycle_err) = power_cycle_hub(port) {
                    warn!("hub power-cycle failed: {}", cycle_err);
                    return Err(err);
                }
                std::thread::sleep(HUB_SETTLE);
                info!("retrying sensor read after hub power-cycle");
                self.read_device()
            }
        }
    }
}

/// Power-cycle a USB hub port via `uhubctl`.
fn power_cycle_hub(port: u8) -> Result<()> {
    let output = Command::new("uhubctl")
        .args(["-a", "cycle", "-p"])
        .arg(port.to_string())
        .output()?;

    if !output.status.success() {
        return Err(TemplogError::sensor_error(format!(
            "uhubctl exited with {}",
            output.status
        )));
    }

    Ok(())
}

/// Parse the two-line frame the kernel renders for a DS18B20.
///
/// ```text
/// 50 01 4b 46 7f ff 0c 10 1c : crc=1c YES
/// 50 01 4b 46 7f ff 0c 10 1c t=21000
/// ```
///
/// The first line must end in `YES` (CRC check passed); the second carries
/// the temperature in millidegrees Celsius.
fn parse_w1_slave(raw: &str) -> Result<f64> {
    let mut lines = raw.lines();

    let crc_line = lines
        .next()
        .ok_or_else(|| TemplogError::sensor_error("empty w1_slave frame"))?;
    if !crc_line.trim_end().ends_with("YES") {
        return Err(TemplogError::sensor_error("sensor CRC check failed"));
    }

    let data_line = lines
        .next()
        .ok_or_else(|| TemplogError::sensor_error("w1_slave frame missing data line"))?;
    let (_, millidegrees) = data_line
        .rsplit_once("t=")
        .ok_or_else(|| TemplogError::sensor_error("w1_slave frame missing t= field"))?;
    let millidegrees: i32 = millidegrees
        .trim()
        .parse()
        .map_err(|_| TemplogError::sensor_error(format!("bad temperature `{}`", millidegrees)))?;

    Ok(f64::from(millidegrees) / 1000.0)
}
