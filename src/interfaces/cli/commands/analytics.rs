//! Mock analytics snapshot command

use crate::analytics::generate_snapshot;
use crate::interfaces::cli::CliError;

pub fn mock_analytics(pretty: bool) -> Result<(), CliError> {
    let snapshot = generate_snapshot();
    let json = if pretty {
        serde_json::to_string_pretty(&snapshot)
    } else {
        serde_json::to_string(&snapshot)
    }
    .map_err(|e| CliError::CommandError(format!("Failed to serialize snapshot: {}", e)))?;

    println!("{}", json);
    Ok(())
}
