//! CLI interface module

pub mod commands;

use std::fmt;

use crate::cli::{AnalyticsCommands, Commands, ConfigCommands};
use crate::services::QrParams;
use commands::{config_generate, mock_analytics, print_qr_url};

#[derive(Debug)]
pub enum CliError {
    ParseError(String),
    CommandError(String),
}

impl CliError {
    /// Format as simple output
    pub fn format_simple(&self) -> String {
        match self {
            CliError::ParseError(msg) => format!("Parse error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    /// Format as colored output
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::ParseError(msg) => {
                format!("{} {}", "Parse error:".yellow().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<crate::errors::BiolinkerError> for CliError {
    fn from(err: crate::errors::BiolinkerError) -> Self {
        if err.is_validation() {
            CliError::ParseError(err.message().to_string())
        } else {
            CliError::CommandError(err.to_string())
        }
    }
}

/// Run a CLI command from clap-parsed input
pub async fn run_cli_command(cmd: Commands) -> Result<(), CliError> {
    match cmd {
        Commands::Config {
            action: ConfigCommands::Generate { output_path, force },
        } => config_generate(output_path, force).await,

        Commands::Qr {
            url,
            size,
            format,
            ecc,
            bg,
            fg,
            margin,
        } => print_qr_url(
            &url,
            QrParams {
                size,
                format,
                ecc,
                bg,
                fg,
                margin,
            },
        ),

        Commands::Analytics {
            action: AnalyticsCommands::Mock { pretty },
        } => mock_analytics(pretty),

        Commands::Serve => Err(CliError::CommandError(
            "serve runs in server mode, not as a CLI command".to_string(),
        )),
    }
}
