//! # MicroView CLI
//!
//! Command-line interface for drawing on a MicroView.
//!
//! ## Usage
//!
//! ```bash
//! # List available demos
//! microview demo
//!
//! # Run a demo on the device
//! microview --device /dev/ttyUSB0 demo circles
//!
//! # Render a demo to PNG instead of sending it
//! microview --png circles.png demo circles
//!
//! # Draw text, one word per line
//! microview text "Hello From Rust!"
//!
//! # Send raw protocol commands
//! microview send 0,1 9,5,10,15,20
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use microview::{
    MicroViewError, Session, SessionConfig,
    demos,
    preview::PreviewTransport,
    protocol::{ClearMode, commands, decode},
    transport::{SerialTransport, Transport, serial::DEFAULT_DEVICE},
};

/// Scale factor for PNG previews (64x48 is tiny on screen)
const PNG_SCALE: u32 = 8;

/// MicroView - OLED module remote control
#[derive(Parser, Debug)]
#[command(name = "microview")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Serial device path
    #[arg(long, global = true, default_value = DEFAULT_DEVICE)]
    device: String,

    /// Delay after each command in milliseconds (25 is about the minimum)
    #[arg(long, global = true, default_value = "50")]
    delay: u64,

    /// Render to a PNG file instead of sending to the device
    #[arg(long, global = true, value_name = "FILE")]
    png: Option<PathBuf>,

    /// Send BLACK pixels instead of skipping them
    #[arg(long, global = true)]
    black_pixels: bool,

    /// Log every command sent
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a demo drawing (omit the name to list them)
    Demo {
        /// Demo to run
        name: Option<String>,
    },

    /// Draw text, one word per line
    Text {
        /// Text to draw
        text: String,

        /// Pixels between lines
        #[arg(long, default_value_t = demos::DEFAULT_LINE_HEIGHT)]
        line_height: u8,
    },

    /// Clear the screen
    Clear {
        /// Clear controller memory too, not just the page buffer
        #[arg(long)]
        all: bool,
    },

    /// Send raw protocol commands such as "9,5,10,15,20"
    Send {
        /// Commands to send, in order
        #[arg(required = true, value_name = "COMMAND")]
        raw: Vec<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), MicroViewError> {
    if let Commands::Demo { name: None } = &cli.command {
        println!("Available demos:");
        for name in demos::list_demos() {
            println!("  {}", name);
        }
        return Ok(());
    }

    let config = SessionConfig::default()
        .with_delay(Duration::from_millis(cli.delay))
        .write_black_pixels(cli.black_pixels);

    match &cli.png {
        Some(path) => {
            // No hardware pacing needed when rendering locally
            let mut session =
                Session::with_config(PreviewTransport::new(), config.with_delay(Duration::ZERO));
            draw(&cli.command, &mut session)?;
            session.transport()?.save_png(path, PNG_SCALE)?;
            println!("Saved to {}", path.display());
        }
        None => {
            let mut session: Session<SerialTransport> = Session::open(&cli.device, config)?;
            draw(&cli.command, &mut session)?;
            session.close()?;
            println!("Done.");
        }
    }

    Ok(())
}

/// Execute a subcommand against any transport.
fn draw<T: Transport>(command: &Commands, session: &mut Session<T>) -> Result<(), MicroViewError> {
    match command {
        Commands::Demo { name } => {
            if let Some(name) = name {
                println!("Running {} demo...", name);
                demos::run(name, session)?;
            }
        }
        Commands::Text { text, line_height } => {
            demos::draw_words(session, text, *line_height)?;
        }
        Commands::Clear { all } => {
            let mode = if *all { ClearMode::All } else { ClearMode::Page };
            session.run([commands::clear(mode)])?;
        }
        Commands::Send { raw } => {
            let parsed = raw
                .iter()
                .map(|text| decode::parse_command(text.trim()))
                .collect::<Result<Vec<_>, _>>()?;
            session.run(parsed)?;
        }
    }
    Ok(())
}

// ============================================================================
// LOGGING
// ============================================================================

/// Minimal stderr sink for the library's `log` records.
struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}
