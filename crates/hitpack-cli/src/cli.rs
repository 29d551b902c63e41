// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Command-line arguments.

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::fmt;
use std::path::PathBuf;

/// hitpack command line.
#[derive(Parser, Debug)]
#[command(name = "hitpack", author, version, about = "Convert and inspect search response envelopes")]
pub struct Cli {
    /// Raise log verbosity (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Read settings from this JSON file instead of the user config dir
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Re-encode an envelope between the binary and JSON forms
    Convert(ConvertArgs),
    /// Print a summary table of an envelope
    Inspect(InspectArgs),
    /// Write a generated envelope
    Sample(SampleArgs),
}

/// Wire form of an envelope.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Compact binary transport form.
    Binary,
    /// JSON document form.
    Json,
}

impl Format {
    /// Lowercase name as accepted on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Binary => "binary",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Arguments of `hitpack convert`.
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Form of the input
    #[arg(long, value_enum)]
    pub from: Format,

    /// Form of the output
    #[arg(long, value_enum)]
    pub to: Format,

    /// Reject unknown fields in JSON input
    #[arg(long)]
    pub strict: bool,

    /// Indent JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Input file, `-` for stdin
    pub input: PathBuf,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments of `hitpack inspect`.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Form of the input (detected from the first byte when omitted)
    #[arg(long, value_enum)]
    pub format: Option<Format>,

    /// Input file, `-` for stdin
    pub input: PathBuf,
}

/// Arguments of `hitpack sample`.
#[derive(Args, Debug)]
pub struct SampleArgs {
    /// Generator seed; equal seeds produce equal envelopes
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Form of the output
    #[arg(long, value_enum, default_value_t = Format::Json)]
    pub format: Format,

    /// Indent JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
