pub mod analytics;
pub mod auth;
pub mod dashboard;
pub mod error_code;
pub mod health;
pub mod helpers;
pub mod public;
pub mod qr;
pub mod routes;
pub mod types;

pub use error_code::ErrorCode;
pub use health::AppStartTime;
pub use routes::configure;
pub use types::ApiResponse;
