//! # Ludivina CLI
//!
//! Runs the printing bot, or talks to the printer directly for hardware
//! checks.
//!
//! ## Usage
//!
//! ```bash
//! # Run the bot
//! TELEGRAM_TOKEN=... ADMIN_TELEGRAM_USER_ID=12345 ludivina run
//!
//! # Print a line of text, signed like a bot message
//! ludivina print --author Ana "Hola abuela"
//!
//! # Check whether the printer is there and has paper
//! ludivina --device /dev/ttyUSB0 status
//! ```
//!
//! Every option can also be set from the environment variable shown in
//! `--help`.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use ludivina::{
    AuthorizedRegistry, Bot, LudivinaError, PrintJob, PrintRequest, PrinterSessions,
    bot::BotSettings,
    printer::{DeviceSettings, Printer, SerialConnector, config::DEFAULT_DEVICE},
    registry::JsonFileStore,
    telegram::Client,
};

/// Ludivina - prints the messages and photos sent to a Telegram bot
#[derive(Parser, Debug)]
#[command(name = "ludivina")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log filter (error, warn, info, debug, trace, or a full directive)
    #[arg(long, env = "LOG_LEVEL", default_value = "info", global = true)]
    log_level: String,

    /// Printer serial device
    #[arg(long, env = "PRINTER_DEVICE", default_value = DEFAULT_DEVICE, global = true)]
    device: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the bot
    Run {
        /// Bot API token
        #[arg(long, env = "TELEGRAM_TOKEN", hide_env_values = true)]
        token: String,

        /// Telegram user id of the admin
        #[arg(long, env = "ADMIN_TELEGRAM_USER_ID", allow_negative_numbers = true)]
        admin: i64,

        /// Seconds each long poll waits for new messages.
        ///
        /// This is the long-poll timeout, not a pause between polls: a new
        /// message is handled as soon as it arrives, and an idle bot makes one
        /// request every interval.
        #[arg(long, env = "POLL_INTERVAL", default_value_t = 30)]
        poll_interval: u64,

        /// File holding the authorized user ids
        #[arg(long, env = "REGISTRY_FILE", default_value = "ludivina.json")]
        registry: PathBuf,
    },

    /// Print a text the same way the bot prints a message
    Print {
        /// Text to print
        text: String,

        /// Name used in the signature
        #[arg(long)]
        author: Option<String>,
    },

    /// Show the printer status
    Status,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(cli.log_level.to_lowercase())
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run(cli) {
        tracing::error!(error = %e.chain(), "ludivina failed");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), LudivinaError> {
    let settings = DeviceSettings::new(&cli.device);
    let head_width = settings.config.width_dots as u32;
    let sessions = PrinterSessions::new(SerialConnector::new(settings));

    match cli.command {
        Commands::Run {
            token,
            admin,
            poll_interval,
            registry,
        } => {
            let registry = Arc::new(AuthorizedRegistry::open(admin, JsonFileStore::new(&registry))?);
            let client = Client::new(token)?;
            let bot = Bot::new(client, registry, Arc::new(sessions)).with_settings(BotSettings {
                head_width,
                ..BotSettings::default()
            });

            info!(device = %cli.device.display(), admin, "ludivina starting");
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(bot.run(Duration::from_secs(poll_interval)))
        }

        Commands::Print { text, author } => {
            let job = PrintJob::prepare(
                PrintRequest::Text {
                    body: text,
                    author,
                    timestamp: Utc::now(),
                },
                head_width,
            )?;
            job.print(&sessions)?;
            println!("Printed successfully!");
            Ok(())
        }

        Commands::Status => {
            match sessions.with_printer(|printer| printer.status()) {
                Ok(status) => {
                    println!("Printer: {}", cli.device.display());
                    println!("Paper: present");
                    println!("Temperature: {}", if status.temperature_ok { "ok" } else { "too high" });
                    println!("Voltage: {}", if status.voltage_ok { "ok" } else { "out of range" });
                }
                Err(LudivinaError::NoPaperLeft) => {
                    println!("Printer: {}", cli.device.display());
                    println!("Paper: none left");
                }
                Err(e) => return Err(e),
            }
            Ok(())
        }
    }
}
