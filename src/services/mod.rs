//! Service layer
//!
//! Business logic shared by the HTTP API and the CLI.

pub mod auth;
pub mod dashboard;
pub mod notice;
pub mod public_profile;
pub mod qr;
pub mod sessions;

pub use auth::{AuthGateway, AuthTokens, SignInRequest, SignUpRequest};
pub use dashboard::{DashboardState, DashboardView};
pub use notice::{Notice, NoticeVariant, Operation};
pub use public_profile::{PublicPage, PublicProfileService, SharePayload};
pub use qr::{QrOptions, QrParams, QrService};
pub use sessions::{DashboardSession, DashboardSessions};
