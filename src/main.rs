//! # JoyLink
//!
//! Relay game controller state to a microcontroller over a serial link.
//!
//! Polls a gamepad at a fixed cadence, draws its state in a terminal
//! canvas, transmits each sample as a comma-separated text line, and reads
//! back whatever telemetry lines the peer sends.
//!
//! # Control Flow
//!
//! 1. **Initialization**
//!    - Set up file-backed logging with tracing subscriber
//!    - Load configuration (defaults when no file is given)
//!    - Open the first connected gamepad
//!    - Enumerate serial ports and run the modal port picker
//!    - Open the chosen port at the configured baud rate
//!
//! 2. **Main Loop** (best-effort 50 Hz)
//!    - Drain terminal events; `q`/`Esc`/Ctrl-C request shutdown
//!    - Sample the controller and redraw the visualization
//!    - Attempt one telemetry line read; parse failures are logged and
//!      skipped
//!    - Encode and transmit the sampled state; a transmit failure is fatal
//!    - Sleep for the full loop period (no drift correction)
//!
//! 3. **Shutdown**
//!    - Release the serial port, then restore the terminal, on every exit
//!      path (close request, interrupt, or fatal error)
//!
//! # Errors
//!
//! Returns an error if:
//! - No gamepad is connected
//! - No serial ports exist, or the selection is cancelled
//! - The chosen port cannot be opened
//! - A transmit fails mid-run

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use joylink::config::Config;
use joylink::controller::Controller;
use joylink::frame::{decode_telemetry, encode_frame};
use joylink::ports;
use joylink::serial::SerialLink;
use joylink::telemetry::{JsonlLogger, TelemetryRecord};
use joylink::tui::{SessionStatus, Visualizer};

/// Number of frames between status log messages (~10 s at 50 Hz)
const LOG_INTERVAL_FRAMES: u64 = 500;

/// Log file written next to the binary; the TUI owns the terminal
const LOG_FILE: &str = "joylink.log";

#[derive(Parser)]
#[command(name = "joylink")]
#[command(about = "Relay game controller state to a microcontroller over a serial link")]
struct Cli {
    /// Config file path (defaults are used when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Serial port to use, skipping the interactive picker
    #[arg(short, long)]
    port: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; the guard must outlive the program so buffered
    // lines are flushed on exit
    let file_appender = tracing_appender::rolling::never(".", LOG_FILE);
    let (writer, _guard) = tracing_appender::non_blocking(file_appender);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();

    info!("JoyLink v{} starting...", env!("CARGO_PKG_VERSION"));

    run(cli).await
}

/// Acquire resources, run the loop, release in order
async fn run(cli: Cli) -> Result<()> {
    let config = Config::load_or_default(cli.config.as_deref())?;

    let mut controller = Controller::open()?;
    info!(
        "Controller initialized: {} ({} axes, {} buttons)",
        controller.name(),
        controller.axis_count(),
        controller.button_count()
    );

    // Fails before any dialog when the list is empty
    let available = ports::enumerate_ports()?;

    let mut visualizer = Visualizer::new()?;

    let port = match &cli.port {
        Some(path) => ports::resolve_port_override(&available, path)?.clone(),
        None => visualizer.pick_port(&available)?,
    };

    let mut link = SerialLink::open(&port.port_name, &config.serial)?;
    info!("Using serial port: {}", link.device_path());

    let mut logger = if config.telemetry.log_enabled {
        Some(JsonlLogger::create(
            &config.telemetry.log_dir,
            config.telemetry.max_records_per_file,
            config.telemetry.max_files_to_keep,
        )?)
    } else {
        None
    };

    let result = run_loop(
        &mut controller,
        &mut visualizer,
        &mut link,
        logger.as_mut(),
        &config,
    )
    .await;

    // Release the serial handle first, then the terminal, regardless of how
    // the loop ended
    drop(link);
    visualizer.close()?;

    result?;
    info!("Exiting...");
    Ok(())
}

/// Main control loop
///
/// Runs until a close request, an interrupt, or a fatal error. Each
/// iteration performs exactly one receive attempt and one transmit; a
/// receive failure never suppresses or delays the transmit.
async fn run_loop(
    controller: &mut Controller,
    visualizer: &mut Visualizer,
    link: &mut SerialLink,
    mut logger: Option<&mut JsonlLogger>,
    config: &Config,
) -> joylink::error::Result<()> {
    let period = config.loop_period();
    let mut status = SessionStatus {
        controller: controller.name().to_string(),
        port: link.device_path().to_string(),
        frames_sent: 0,
        last_telemetry: None,
    };

    info!(
        "Entering main loop at {} Hz. Press q or Ctrl+C to exit.",
        config.cadence.rate_hz
    );

    loop {
        if visualizer.poll_close_request()? {
            info!("Close requested, shutting down...");
            break;
        }

        let state = controller.sample();
        visualizer.render(&state, &status)?;

        match link.read_line().await {
            Ok(Some(line)) => match decode_telemetry(&line) {
                Ok(values) => {
                    debug!("Parsed telemetry: {:?}", values);
                    if let Some(ref mut logger) = logger {
                        if let Err(e) = logger.append(&TelemetryRecord::now(values.clone())) {
                            warn!("Failed to log telemetry record: {}", e);
                        }
                    }
                    status.last_telemetry = Some(values);
                }
                Err(e) => warn!("Skipping invalid telemetry line: {}", e),
            },
            Ok(None) => {}
            Err(e) => warn!("Telemetry read failed: {}", e),
        }

        // Transmit failure is fatal and propagates; the receive above has
        // already happened this iteration either way
        let frame = encode_frame(&state);
        link.send_frame(&frame).await?;
        status.frames_sent += 1;

        if status.frames_sent % LOG_INTERVAL_FRAMES == 0 {
            info!("Sent {} frames", status.frames_sent);
        }

        // Fixed post-iteration sleep, no drift correction; the actual rate
        // degrades under load
        tokio::select! {
            _ = sleep(period) => {}
            _ = tokio::signal::ctrl_c() => {
                info!("Received interrupt, shutting down...");
                break;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_interval_constant() {
        // At the default 50 Hz, 500 frames is 10 seconds between status lines
        let seconds = LOG_INTERVAL_FRAMES as f64 / Config::default().cadence.rate_hz as f64;
        assert_eq!(seconds, 10.0);
    }

    #[test]
    fn test_default_period_is_20ms() {
        let period = Config::default().loop_period();
        assert_eq!(period, std::time::Duration::from_millis(20));
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["joylink"]);
        assert!(cli.config.is_none());
        assert!(cli.port.is_none());
        assert_eq!(cli.log_level, "info");
    }

    #[test]
    fn test_cli_port_override() {
        let cli = Cli::parse_from(["joylink", "--port", "/dev/ttyACM0"]);
        assert_eq!(cli.port.as_deref(), Some("/dev/ttyACM0"));
    }
}
