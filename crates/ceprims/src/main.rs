mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "ceprims", version, about = "CloudEvents envelope CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "warn", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::Mode;

    #[test]
    fn parses_encode_subcommand() {
        let cli = Cli::try_parse_from([
            "ceprims",
            "encode",
            "--id",
            "e1",
            "--source",
            "/people/p1",
            "--type",
            "AddressChanged",
            "--ext",
            "anumber=10",
            "--ext",
            "astring=aaa",
            "--mode",
            "binary",
        ])
        .expect("encode args should parse");

        match cli.command {
            Command::Encode(args) => {
                assert_eq!(args.ty, "AddressChanged");
                assert_eq!(args.ext, vec!["anumber=10", "astring=aaa"]);
                assert!(matches!(args.mode, Mode::Binary));
            }
            other => panic!("expected encode, got {other:?}"),
        }
    }

    #[test]
    fn rejects_conflicting_payload_args() {
        let err = Cli::try_parse_from([
            "ceprims",
            "encode",
            "--id",
            "e1",
            "--source",
            "/s",
            "--type",
            "t",
            "--json",
            "{\"x\":1}",
            "--data",
            "hello",
        ])
        .expect_err("conflicting args should fail");

        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn encode_requires_type() {
        let err = Cli::try_parse_from(["ceprims", "encode", "--id", "e1", "--source", "/s"])
            .expect_err("missing --type should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn parses_decode_with_headers() {
        let cli = Cli::try_parse_from([
            "ceprims",
            "--format",
            "json",
            "decode",
            "--mode",
            "binary",
            "--header",
            "ce_id=e1",
            "--header",
            "ce_type=t",
        ])
        .expect("decode args should parse");
        match cli.command {
            Command::Decode(args) => assert_eq!(args.header.len(), 2),
            other => panic!("expected decode, got {other:?}"),
        }
    }
}
