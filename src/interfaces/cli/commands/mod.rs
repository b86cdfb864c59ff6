//! CLI command implementations

mod analytics;
mod config_gen;
mod qr;

pub use analytics::mock_analytics;
pub use config_gen::config_generate;
pub use qr::print_qr_url;
