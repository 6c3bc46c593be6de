//! Seatek year-to-year outlier CLI.

use clap::{ColorChoice, Parser};
use seatek_cli::logging::{LogConfig, LogFormat, init_logging};
use seatek_cli::{RunConfig, run};
use seatek_model::Thresholds;
use seatek_output::SummaryFormat;
use std::io::{self, IsTerminal};
use tracing::error;
use tracing::level_filters::LevelFilter;

mod cli;
mod summary;

use crate::cli::{Cli, LogFormatArg, LogLevelArg, SummaryFormatArg};
use crate::summary::print_summary;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let config = run_config_from_cli(&cli);
    let exit_code = match run(&config) {
        Ok(outcome) => {
            print_summary(&outcome);
            0
        }
        Err(err) => {
            error!("{err:#}");
            eprintln!("error: {err:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run_config_from_cli(cli: &Cli) -> RunConfig {
    RunConfig {
        input: cli.input.clone(),
        differences_sheet: cli.sheet_summary.clone(),
        method: cli.method,
        thresholds: Thresholds::default()
            .with_abs_threshold(cli.threshold)
            .with_zscore_threshold(cli.zscore)
            .with_iqr_factor(cli.iqr_factor),
        output_dir: cli.output.clone(),
        summary_format: match cli.summary_format {
            SummaryFormatArg::Xlsx => SummaryFormat::Xlsx,
            SummaryFormatArg::Csv => SummaryFormat::Csv,
        },
        plot: !cli.no_plot,
    }
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let level_filter = match cli.log_level {
        Some(LogLevelArg::Error) => LevelFilter::ERROR,
        Some(LogLevelArg::Warn) => LevelFilter::WARN,
        Some(LogLevelArg::Info) => LevelFilter::INFO,
        Some(LogLevelArg::Debug) => LevelFilter::DEBUG,
        Some(LogLevelArg::Trace) => LevelFilter::TRACE,
        None => cli.verbosity.tracing_level_filter(),
    };
    let mut config = LogConfig::default().with_level(level_filter);
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    let format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    let ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
        .with_format(format)
        .with_log_file(cli.log_file.clone())
        .with_ansi(ansi)
}
