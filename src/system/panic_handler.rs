//! Panic hook
//!
//! Server mode prints a colored report with backtrace, CLI mode prints a
//! single line. Both append the full report to `crash.log`.

use std::fs::OpenOptions;
use std::io::Write;
use std::panic;

use chrono::Utc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Server,
    Cli,
}

pub fn install_panic_hook(mode: RunMode) {
    panic::set_hook(Box::new(move |panic_info| {
        let payload = panic_info.payload();
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}:{}", loc.file(), loc.line(), loc.column()))
            .unwrap_or_else(|| "Unknown location".to_string());

        let backtrace = std::backtrace::Backtrace::force_capture();
        let report = CrashReport {
            timestamp: Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            message,
            location,
            backtrace: format!("{:?}", backtrace),
        };

        if let Err(e) = report.append_to("crash.log") {
            eprintln!("Failed to write crash log: {}", e);
        }

        match mode {
            RunMode::Server => report.print_detailed(),
            RunMode::Cli => {
                eprintln!("biolinker panicked: {}", report.message);
                eprintln!("Details saved to crash.log");
            }
        }
    }));
}

struct CrashReport {
    timestamp: String,
    message: String,
    location: String,
    backtrace: String,
}

impl CrashReport {
    fn print_detailed(&self) {
        use colored::Colorize;

        let rule = "═".repeat(51);
        eprintln!();
        eprintln!("{}", rule.red().bold());
        eprintln!("{} {}", "PANIC".red().bold(), self.timestamp.dimmed());
        eprintln!("{}", rule.red().bold());
        eprintln!("{} {}", "Reason:".yellow().bold(), self.message.white());
        eprintln!("{} {}", "Location:".yellow().bold(), self.location.white());
        eprintln!("{}", "Backtrace:".yellow().bold());
        eprintln!("{}", self.backtrace.dimmed());
        eprintln!("{}", "Details saved to crash.log".cyan());
        eprintln!("{}", rule.red().bold());
    }

    fn append_to(&self, path: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;

        writeln!(file, "==== Crash Report - {} ====", self.timestamp)?;
        writeln!(file, "Message: {}", self.message)?;
        writeln!(file, "Location: {}", self.location)?;
        writeln!(file, "Backtrace:\n{}\n", self.backtrace)?;
        Ok(())
    }
}
