use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use ceprims_record::Encoding;

use crate::exit::{CliError, CliResult};
use crate::output::OutputFormat;

pub mod decode;
pub mod encode;
pub mod formats;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build an event and print its structured or binary encoding.
    Encode(EncodeArgs),
    /// Decode a structured document or binary headers/body and print the event.
    Decode(DecodeArgs),
    /// List registered structured event formats.
    Formats(FormatsArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Encode(args) => encode::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Formats(args) => formats::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

/// Transport encoding selected on the command line.
#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum Mode {
    Structured,
    Binary,
}

impl From<Mode> for Encoding {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Structured => Encoding::Structured,
            Mode::Binary => Encoding::Binary,
        }
    }
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Event id.
    #[arg(long)]
    pub id: String,
    /// Event source (URI reference).
    #[arg(long)]
    pub source: String,
    /// Event type.
    #[arg(long = "type", value_name = "TYPE")]
    pub ty: String,
    /// Event subject.
    #[arg(long)]
    pub subject: Option<String>,
    /// Event time (RFC 3339).
    #[arg(long)]
    pub time: Option<String>,
    /// Media type of the payload. Defaults to application/json with --json.
    #[arg(long)]
    pub data_content_type: Option<String>,
    /// Schema URI of the payload.
    #[arg(long)]
    pub data_schema: Option<String>,
    /// JSON payload.
    #[arg(long, conflicts_with_all = ["data", "file"])]
    pub json: Option<String>,
    /// Raw string payload.
    #[arg(long, conflicts_with_all = ["json", "file"])]
    pub data: Option<String>,
    /// Read payload from file.
    #[arg(long, conflicts_with_all = ["json", "data"])]
    pub file: Option<PathBuf>,
    /// Extension attribute as name=value (value typed as boolean, integer, or string).
    #[arg(long, value_name = "NAME=VALUE")]
    pub ext: Vec<String>,
    /// Transport encoding.
    #[arg(long, value_enum, default_value = "structured")]
    pub mode: Mode,
    /// Always write the structured payload as data_base64.
    #[arg(long)]
    pub base64: bool,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Structured document, or body in binary mode. Structured mode reads stdin when omitted.
    pub input: Option<PathBuf>,
    /// Transport encoding of the input.
    #[arg(long, value_enum, default_value = "structured")]
    pub mode: Mode,
    /// Binary-mode header as name=value (repeatable).
    #[arg(long, value_name = "NAME=VALUE")]
    pub header: Vec<String>,
}

#[derive(Args, Debug, Default)]
pub struct FormatsArgs {}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Split a `name=value` argument.
pub fn parse_pair<'a>(flag: &str, input: &'a str) -> CliResult<(&'a str, &'a str)> {
    match input.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => Ok((name.trim(), value)),
        _ => Err(CliError::usage(format!(
            "--{flag} expects NAME=VALUE, got {input:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_pair_splits_on_first_equals() {
        assert_eq!(parse_pair("ext", "a=b=c").unwrap(), ("a", "b=c"));
        assert_eq!(parse_pair("ext", " a =").unwrap(), ("a", ""));
    }

    #[test]
    fn parse_pair_rejects_missing_name() {
        assert!(parse_pair("ext", "=x").is_err());
        assert!(parse_pair("header", "novalue").is_err());
    }
}
