mod cmd;
mod exit;
mod logging;
mod output;

use std::time::Duration;

use clap::Parser;

use armrpc_client::config::{DEFAULT_HOST, DEFAULT_PORT};
use armrpc_client::ClientConfig;

use crate::cmd::Command;
use crate::exit::{CliError, CliResult, USAGE};
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "armrpc", version, about = "Robot-arm remote control CLI")]
struct Cli {
    /// Robot server host.
    #[arg(long, env = "ARMRPC_HOST", default_value = DEFAULT_HOST, global = true)]
    host: String,

    /// Robot server port.
    #[arg(long, env = "ARMRPC_PORT", default_value_t = DEFAULT_PORT, global = true)]
    port: u16,

    /// Per-call timeout (e.g. 5s, 500ms). Default: wait indefinitely.
    #[arg(long, value_name = "DURATION", global = true)]
    timeout: Option<String>,

    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = build_config(&cli).and_then(|config| {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(|err| {
                CliError::new(exit::FAILURE, format!("failed to start runtime: {err}"))
            })?;
        runtime.block_on(cmd::run(cli.command, config, format))
    });

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

fn build_config(cli: &Cli) -> CliResult<ClientConfig> {
    let mut config = ClientConfig::new(cli.host.clone(), cli.port);
    if let Some(timeout) = &cli.timeout {
        config = config.with_call_timeout(parse_duration(timeout)?);
    }
    Ok(config)
}

fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        _ => Ok(Duration::from_secs(value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_status_with_endpoint_flags() {
        let cli = Cli::try_parse_from([
            "armrpc",
            "--host",
            "10.0.0.5",
            "--port",
            "9100",
            "status",
        ])
        .expect("status args should parse");

        assert_eq!(cli.host, "10.0.0.5");
        assert_eq!(cli.port, 9100);
        assert!(matches!(cli.command, Command::Status));
    }

    #[test]
    fn parses_move_pose_with_six_values() {
        let cli = Cli::try_parse_from([
            "armrpc", "move-pose", "10", "20", "30", "0", "0", "90", "--offset",
        ])
        .expect("move-pose args should parse");

        match cli.command {
            Command::MovePose(args) => {
                assert_eq!(args.pose, vec![10.0, 20.0, 30.0, 0.0, 0.0, 90.0]);
                assert!(args.offset);
            }
            other => panic!("expected MovePose, got {other:?}"),
        }
    }

    #[test]
    fn rejects_move_pose_with_wrong_arity() {
        let err = Cli::try_parse_from(["armrpc", "move-pose", "10", "20", "30"])
            .expect_err("three pose values should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::WrongNumberOfValues);
    }

    #[test]
    fn parses_align_with_optional_offset() {
        let cli = Cli::try_parse_from([
            "armrpc",
            "align",
            "7",
            "--offset-pose",
            "0",
            "0",
            "50",
            "0",
            "0",
            "0",
        ])
        .expect("align args should parse");

        match cli.command {
            Command::Align(args) => {
                assert_eq!(args.id, 7);
                assert_eq!(args.offset_pose.as_deref(), Some(&[0.0, 0.0, 50.0, 0.0, 0.0, 0.0][..]));
            }
            other => panic!("expected Align, got {other:?}"),
        }
    }

    #[test]
    fn parses_train_with_model_flag() {
        let cli = Cli::try_parse_from([
            "armrpc", "train", "stack", "run-a", "--model", "pi0-fast",
        ])
        .expect("train args should parse");

        match cli.command {
            Command::Train(args) => {
                assert!(matches!(args.model, cmd::ModelArg::Pi0Fast));
            }
            other => panic!("expected Train, got {other:?}"),
        }
    }

    #[test]
    fn parse_duration_seconds_and_millis() {
        assert_eq!(parse_duration("2s").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_duration("150ms").unwrap(), Duration::from_millis(150));
        assert_eq!(parse_duration("3").unwrap(), Duration::from_secs(3));
    }

    #[test]
    fn parse_duration_rejects_invalid_values() {
        assert!(parse_duration("0s").is_err());
        assert!(parse_duration("bad").is_err());
        assert!(parse_duration("").is_err());
    }
}
