//! templog binary - one buffered logging cycle per invocation.
//!
//! Meant to run from cron; the scheduler provides the cadence and must
//! never overlap two runs, since the local buffer file is not
//! lock-protected.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use templog::{
    celsius_to_fahrenheit, Collector, Config, DurableBuffer, HttpPinger, MongoSink,
    TemperatureProbe, W1Sensor, CONFIG_FILE_NAME,
};
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "templog")]
#[command(about = "Crash-safe one-wire temperature logging for Raspberry Pi")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "Austin Couch")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file (defaults to config.json next to the executable)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one collect-and-drain cycle (default)
    Run,

    /// Print the readings still waiting in the local buffer
    Pending,

    /// Read the sensor once and print the temperature
    Read,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(&cli)?;

    match cli.command.as_ref().unwrap_or(&Commands::Run) {
        Commands::Run => run_command(&cli).await,
        Commands::Pending => pending_command(&cli),
        Commands::Read => read_command(&cli),
    }
}

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let level = if cli.debug {
        Level::DEBUG
    } else if cli.verbose {
        Level::INFO
    } else {
        Level::WARN
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

async fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let config = Config::from_file(&config_path(cli)?)?;
    let tz = config.tz()?;

    let probe = W1Sensor::new(config.hub_power_port);
    let sink = MongoSink::connect(&config).await?;
    let pinger = HttpPinger::new(config.healthcheck_url.clone());
    let buffer = DurableBuffer::at_default_location(tz)?;

    let collector = Collector::new(probe, sink, pinger, buffer, tz);
    collector.run().await?;
    info!("cycle complete");

    Ok(())
}

fn pending_command(cli: &Cli) -> anyhow::Result<()> {
    let config = Config::from_file(&config_path(cli)?)?;
    let buffer = DurableBuffer::at_default_location(config.tz()?)?;

    let pending = buffer.load()?;
    if pending.is_empty() {
        println!("no readings waiting in {}", buffer.path().display());
    } else {
        println!(
            "{} reading(s) waiting in {}:",
            pending.len(),
            buffer.path().display()
        );
        for entry in &pending {
            println!("  {}", entry.encode());
        }
    }

    Ok(())
}

fn read_command(cli: &Cli) -> anyhow::Result<()> {
    let config = Config::from_file(&config_path(cli)?)?;
    let probe = W1Sensor::new(config.hub_power_port);

    let celsius = probe.read_celsius()?;
    println!(
        "{:.3} \u{b0}C / {:.3} \u{b0}F",
        celsius,
        celsius_to_fahrenheit(celsius)
    );

    Ok(())
}

fn config_path(cli: &Cli) -> anyhow::Result<PathBuf> {
    if let Some(path) = &cli.config {
        return Ok(path.clone());
    }
    let exe = std::env::current_exe().context("cannot locate the executable")?;
    Ok(exe
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        use clap::Parser;

        let cli = Cli::try_parse_from(["templog"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
        assert!(!cli.verbose);
        assert!(!cli.debug);
    }

    #[test]
    fn test_cli_parsing() {
        use clap::Parser;

        let cli =
            Cli::try_parse_from(["templog", "--config", "/etc/templog.json", "pending"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/etc/templog.json")));
        assert!(matches!(cli.command, Some(Commands::Pending)));
    }

    #[test]
    fn test_cli_verbosity_flags() {
        use clap::Parser;

        let cli = Cli::try_parse_from(["templog", "-v", "run"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Some(Commands::Run)));
    }
}
