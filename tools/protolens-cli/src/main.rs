mod commands;
mod format;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{decode::DecodeArgs, messages::MessagesArgs, schema::SchemaArgs};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "protolens", about = "Inspect protobuf payloads against a descriptor set")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a payload into a typed value tree
    Decode(DecodeArgs),
    /// List the messages defined in a descriptor set
    Messages(MessagesArgs),
    /// Print the field groupings of a message
    Schema(SchemaArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Decode(args) => args.run(),
        Commands::Messages(args) => args.run(),
        Commands::Schema(args) => args.run(),
    }
}
