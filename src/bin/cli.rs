//! resp3string CLI Client
//!
//! Command-line interface for issuing PING, SET and GET to a Redis server.

use clap::{Parser, Subcommand};
use resp3string::{Client, Config, RespError};
use tracing_subscriber::{fmt, EnvFilter};

/// resp3string CLI
#[derive(Parser, Debug)]
#[command(name = "resp3string-cli")]
#[command(about = "Minimal RESP client for Redis-compatible servers")]
#[command(version)]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:6379")]
    server: String,

    /// Connect/read/write timeout in milliseconds (0 = none)
    #[arg(short, long, default_value = "5000")]
    timeout_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ping the server
    Ping {
        /// Optional message the server should echo
        message: Option<String>,
    },

    /// Set a key-value pair
    Set {
        /// The key to set
        key: String,

        /// The value to set
        value: String,
    },

    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,resp3string=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = Config::builder()
        .address(&args.server)
        .connect_timeout_ms(args.timeout_ms)
        .read_timeout_ms(args.timeout_ms)
        .write_timeout_ms(args.timeout_ms)
        .build();

    if let Err(e) = run(&config, args.command) {
        match e {
            RespError::Server(message) => println!("(error) {}", message),
            other => tracing::error!("{}", other),
        }
        std::process::exit(1);
    }
}

fn run(config: &Config, command: Commands) -> resp3string::Result<()> {
    let mut client = Client::connect(config)?;
    tracing::info!("Connected to {}", client.connection().peer_addr());

    match command {
        Commands::Ping { message: None } => {
            client.ping()?;
            println!("PONG");
        }
        Commands::Ping {
            message: Some(message),
        } => {
            client.execute(&resp3string::commands::Ping::with_message(message.clone()))?;
            println!("\"{}\"", message);
        }
        Commands::Set { key, value } => {
            client.set(key, value)?;
            println!("OK");
        }
        Commands::Get { key } => match client.get(key)? {
            Some(value) => println!("\"{}\"", String::from_utf8_lossy(&value)),
            None => println!("(nil)"),
        },
    }

    client.connection_mut().close()
}
