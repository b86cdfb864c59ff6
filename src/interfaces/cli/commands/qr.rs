//! QR URL command

use colored::Colorize;

use crate::config::get_config;
use crate::interfaces::cli::CliError;
use crate::services::qr::build_qr_url;
use crate::services::{QrOptions, QrParams};

pub fn print_qr_url(url: &str, params: QrParams) -> Result<(), CliError> {
    let options = QrOptions::try_from(params)?;
    let qr_url = build_qr_url(&get_config().qr.service_url, url, &options)?;

    println!("{} {}", "✓".bold().green(), qr_url.blue().underline());
    println!(
        "  {} {}",
        "Download as:".dimmed(),
        options.download_filename(chrono::Utc::now().timestamp_millis())
    );
    Ok(())
}
