//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

/// Biolinker - link-in-bio pages with a dashboard and mock analytics
#[derive(Parser)]
#[command(name = "biolinker")]
#[command(version)]
#[command(about = "A link-in-bio service", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (default when no command is given)
    Serve,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Print the QR image URL for a target
    Qr {
        /// URL encoded into the QR code
        url: String,

        /// Image size in pixels (50-1000)
        #[arg(long)]
        size: Option<u32>,

        /// png, svg, eps or pdf
        #[arg(long)]
        format: Option<String>,

        /// Error correction level: L, M, Q or H
        #[arg(long)]
        ecc: Option<String>,

        /// Background color (#RRGGBB)
        #[arg(long)]
        bg: Option<String>,

        /// Foreground color (#RRGGBB)
        #[arg(long)]
        fg: Option<String>,

        /// Quiet zone in pixels (0-50)
        #[arg(long)]
        margin: Option<u32>,
    },

    /// Mock analytics tools
    Analytics {
        #[command(subcommand)]
        action: AnalyticsCommands,
    },
}

/// Configuration management commands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,

        /// Force overwrite without confirmation
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum AnalyticsCommands {
    /// Print one generated snapshot as JSON
    Mock {
        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },
}
