pub mod account;
pub mod link;
pub mod link_analytics;
pub mod profile;

pub use account::Entity as AccountEntity;
pub use link::Entity as LinkEntity;
pub use link_analytics::Entity as LinkAnalyticsEntity;
pub use profile::Entity as ProfileEntity;
