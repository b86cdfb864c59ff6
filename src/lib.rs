//! Biolinker - a link-in-bio service
//!
//! Public profile pages with click tracking, an authenticated dashboard for
//! managing the profile and its ordered links, a mock analytics dashboard
//! and a QR code helper backed by an external image service.
//!
//! # Features
//! - **server**: HTTP server mode (default)
//! - **cli**: Command-line interface
//!
//! # Architecture
//! - `storage`: sea-orm backed stores for profiles, links, clicks and accounts
//! - `services`: dashboard state container, public pages, auth, QR
//! - `analytics`: mock snapshot generator and live refresher
//! - `api`: HTTP handlers and middleware
//! - `interfaces`: CLI commands
//! - `config`: Configuration management
//! - `runtime`: Application lifecycle and execution modes
//! - `system`: Logging and panic reporting

pub mod analytics;
pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
