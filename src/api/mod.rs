//! HTTP surface: JSON API under `/api/v1`, health probes and public pages

pub mod jwt;
pub mod middleware;
pub mod services;

pub use services::configure;
