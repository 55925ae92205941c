//! Contentkit CLI - Command-line interface for typed content collections
//!
//! This is the main entry point for the Contentkit CLI application, providing
//! commands for validating a site's content tree, describing the registered
//! collection schemas and managing configuration.

mod cli;
mod config;
mod error;
mod handlers;
mod logging;
mod output;

use cli::{Cli, Commands, OutputFormat};
use colored::control;
use config::Config;
use error::Result;
use logging::{timing::Timer, LoggingConfig};
use output::OutputWriter;
use std::process;
use tracing::instrument;

#[tokio::main]
async fn main() {
    // Parse command-line arguments
    let cli = Cli::parse_args();

    // Configuration drives logging and colors, so load it first
    let config = Config::load_with_file(cli.config.as_deref());

    let use_color = cli.use_color()
        && config.as_ref().map(|c| c.output.color).unwrap_or(true);
    control::set_override(use_color);

    if let Err(e) = init_logging(&cli, config.as_ref().ok()) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let result = match config {
        Ok(config) => run(cli, config, use_color).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => {
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}", error::format_error(&e, use_color));

            if e.should_show_help() {
                eprintln!("\nFor more information, try '--help'");
            }

            process::exit(e.exit_code());
        }
    }
}

/// Main application logic
#[instrument(skip(cli, config), fields(command = ?cli.command))]
async fn run(cli: Cli, config: Config, use_color: bool) -> Result<()> {
    let _timer = Timer::new("cli_execution");

    let format = cli
        .output
        .or_else(|| OutputFormat::from_config(&config.output.format))
        .unwrap_or(OutputFormat::Human);
    let mut output = OutputWriter::new(format, use_color, cli.quiet, cli.verbosity_level());

    tracing::info!(
        command = ?cli.command,
        config_source = ?config.source,
        verbosity = cli.verbosity_level(),
        "Executing command"
    );

    match cli.command {
        Commands::Validate(args) => handlers::handle_validate(args, &config, &mut output).await,
        Commands::Collections(args) => handlers::handle_collections(args, &mut output).await,
        Commands::Config(args) => handlers::handle_config(args, &config, &mut output).await,
        Commands::Completions(args) => handlers::handle_completions(args),
    }
}

/// Initialize the logging system
///
/// Precedence, lowest first: defaults, the `[logging]` config section,
/// `RUST_LOG` and `CONTENTKIT_LOG_FORMAT`, then `-v` flags.
fn init_logging(cli: &Cli, config: Option<&Config>) -> Result<()> {
    let verbosity = cli.verbosity_level();
    let mut logging_config = LoggingConfig::from_verbosity(verbosity);

    if let Some(config) = config {
        logging_config.apply_file_settings(&config.logging, verbosity);
    }

    if verbosity == 0 {
        logging_config.merge_with_env();
    }

    // If quiet mode, only log errors
    if cli.quiet {
        logging_config.level = "error".to_string();
        logging_config.console = false;
    }

    logging::init_logging(logging_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from(["contentkit", "collections"]);
        assert_eq!(cli.verbosity_level(), 0);

        let cli = Cli::parse_from(["contentkit", "-vv", "validate", "src/content"]);
        assert_eq!(cli.verbosity_level(), 2);

        let cli = Cli::parse_from(["contentkit", "--quiet", "validate", "src/content"]);
        assert_eq!(cli.verbosity_level(), 0);
    }

    #[test]
    fn test_global_output_flag() {
        let cli = Cli::parse_from(["contentkit", "collections", "--output", "json"]);
        assert_eq!(cli.output, Some(OutputFormat::Json));
    }
}
