pub mod live;
pub mod mock;

pub use live::LiveRefresher;
pub use mock::{
    AnalyticsSnapshot, conversion_rate, export_filename, generate_snapshot, round1,
    snapshot_from_daily,
};
