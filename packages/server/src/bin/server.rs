//! Matchmaking and session-relay server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin duelhub-server
//! cargo run --bin duelhub-server -- --host 0.0.0.0 --port 3000 --pairing-mode queue
//! ```

use std::sync::Arc;

use clap::{Parser, ValueEnum};
use duelhub_server::{
    bootstrap::{ServerConfig, build_server},
    domain::{DEFAULT_ROOM_CODE_LENGTH, PairingMode},
};
use duelhub_shared::{logger::setup_logger, time::SystemClock};

/// How players are paired into rooms
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PairingModeArg {
    /// Host shares a generated room code with the opponent
    Code,
    /// First come, first paired
    Queue,
}

impl From<PairingModeArg> for PairingMode {
    fn from(arg: PairingModeArg) -> Self {
        match arg {
            PairingModeArg::Code => PairingMode::Code,
            PairingModeArg::Queue => PairingMode::Queue,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "duelhub-server")]
#[command(about = "Matchmaking and session-relay server for two-player games", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Room pairing mode
    #[arg(long, value_enum, default_value_t = PairingModeArg::Code)]
    pairing_mode: PairingModeArg,

    /// Length of generated room codes
    #[arg(
        long,
        default_value_t = DEFAULT_ROOM_CODE_LENGTH as u16,
        value_parser = clap::value_parser!(u16).range(4..=32)
    )]
    room_code_length: u16,
}

#[tokio::main]
async fn main() {
    setup_logger(env!("CARGO_PKG_NAME"), env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();
    let config = ServerConfig {
        pairing_mode: args.pairing_mode.into(),
        room_code_length: usize::from(args.room_code_length),
    };
    tracing::info!(
        "Pairing mode: {:?}, room code length: {}",
        config.pairing_mode,
        config.room_code_length
    );

    let server = build_server(config, Arc::new(SystemClock));
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
