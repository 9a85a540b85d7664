//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use taxi_protocol::{RecordKind, Subject};

use crate::tracing::TracingOutputFormat;

/// taxi-inspect - decode and produce taxi-dispatch wire records
#[derive(Debug, Parser)]
#[command(name = "taxi-inspect")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "TAXI_INSPECT_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v', global = true)]
    pub debug: bool,

    /// Log line format (pretty, compact, json)
    #[arg(long, env = "TAXI_INSPECT_LOG_FORMAT", global = true)]
    pub log_format: Option<TracingOutputFormat>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Decode a captured buffer and print it as JSON
    Decode(DecodeArgs),

    /// Build a dispatch message and write its bytes
    EncodeMessage(EncodeMessageArgs),

    /// Print the raw codes of every status family as JSON
    Codes {
        /// Pretty-print JSON
        #[arg(long)]
        pretty: bool,
    },
}

/// Arguments of `decode`.
#[derive(Debug, Args)]
pub struct DecodeArgs {
    /// Record kind held by the input (log, map, message)
    #[arg(long, short, conflicts_with = "topic")]
    pub kind: Option<RecordKind>,

    /// Broker topic the input came from (logs, map, requests)
    #[arg(long, short)]
    pub topic: Option<String>,

    /// Input holds length-prefixed frames rather than one bare record
    #[arg(long)]
    pub framed: bool,

    /// Pretty-print JSON
    #[arg(long)]
    pub pretty: bool,

    /// Input file, or `-` for stdin
    #[arg(default_value = "-")]
    pub input: PathBuf,
}

impl DecodeArgs {
    /// Resolves the record kind from `--kind` or `--topic`.
    pub fn record_kind(&self) -> Option<RecordKind> {
        self.kind
            .or_else(|| self.topic.as_deref().and_then(RecordKind::from_topic))
    }
}

/// Arguments of `encode-message`.
#[derive(Debug, Args)]
pub struct EncodeMessageArgs {
    /// Message as JSON, e.g. {"code":0,"id":"-","taxiId":3,"coord":{"x":4,"y":5}}
    #[arg(long, conflicts_with_all = ["subject", "id", "taxi_id", "x", "y"])]
    pub json: Option<String>,

    /// Subject name (go-to, stop, ...) or wire value
    #[arg(long, short, required_unless_present = "json")]
    pub subject: Option<Subject>,

    /// Addressed customer or location id
    #[arg(long)]
    pub id: Option<String>,

    /// Addressed taxi
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    pub taxi_id: i16,

    /// Target x coordinate
    #[arg(long, requires = "y", allow_negative_numbers = true)]
    pub x: Option<i32>,

    /// Target y coordinate
    #[arg(long, requires = "x", allow_negative_numbers = true)]
    pub y: Option<i32>,

    /// Wrap the bytes in a length-prefixed frame
    #[arg(long)]
    pub framed: bool,

    /// Output file, or `-` for stdout
    #[arg(long, short, default_value = "-")]
    pub output: PathBuf,
}
