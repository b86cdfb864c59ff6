//! Synthetic analytics
//!
//! The dashboard charts are fed with random data. Everything derived from
//! the daily series (totals, conversion rate, breakdown counts) goes
//! through [`snapshot_from_daily`], which is deterministic.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPoint {
    /// 展示用日期，如 "Mar 4"
    pub date: String,
    pub views: u32,
    pub clicks: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownEntry {
    pub label: String,
    pub count: u32,
    pub percentage: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkPerformance {
    pub title: String,
    pub clicks: u32,
    pub views: u32,
    pub ctr: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyPoint {
    pub hour: u8,
    pub views: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub action: String,
    pub timestamp: String,
    pub value: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSnapshot {
    pub generated_at: DateTime<Utc>,
    pub views: u32,
    pub clicks: u32,
    pub conversion_rate: f64,
    pub daily_views: Vec<DailyPoint>,
    pub top_countries: Vec<BreakdownEntry>,
    pub device_types: Vec<BreakdownEntry>,
    pub referrers: Vec<BreakdownEntry>,
    pub link_performance: Vec<LinkPerformance>,
    pub time_ranges: Vec<HourlyPoint>,
    pub recent_activity: Vec<ActivityEntry>,
}

pub const DAYS: usize = 7;
pub const HOURS: usize = 24;

const COUNTRY_SHARES: &[(&str, u32)] = &[
    ("United States", 35),
    ("United Kingdom", 20),
    ("Canada", 15),
    ("Germany", 12),
    ("France", 10),
    ("Others", 8),
];

const DEVICE_SHARES: &[(&str, u32)] = &[("Mobile", 65), ("Desktop", 25), ("Tablet", 10)];

const REFERRER_SHARES: &[(&str, u32)] = &[
    ("Direct", 40),
    ("Instagram", 25),
    ("Twitter", 15),
    ("LinkedIn", 12),
    ("Others", 8),
];

/// (title, click share, view share, ctr)
const LINK_SHARES: &[(&str, u32, u32, u32)] = &[
    ("Portfolio Website", 30, 25, 30),
    ("GitHub Profile", 25, 22, 28),
    ("LinkedIn", 20, 20, 25),
    ("Twitter", 15, 18, 20),
    ("Instagram", 10, 15, 15),
];

const RECENT_ACTIVITY: &[(&str, &str, u32)] = &[
    ("Link Click", "2 min ago", 1),
    ("Profile View", "5 min ago", 3),
    ("Link Click", "12 min ago", 2),
    ("Profile View", "18 min ago", 1),
];

/// 保留一位小数
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// clicks / views 的百分比；views 为 0 时返回 0
pub fn conversion_rate(views: u32, clicks: u32) -> f64 {
    if views == 0 {
        return 0.0;
    }
    round1(f64::from(clicks) / f64::from(views) * 100.0)
}

/// floor(total * pct / 100)，整数运算避免浮点误差
fn share_of(total: u32, pct: u32) -> u32 {
    (u64::from(total) * u64::from(pct) / 100) as u32
}

fn breakdown(total: u32, shares: &[(&str, u32)]) -> Vec<BreakdownEntry> {
    shares
        .iter()
        .map(|(label, pct)| BreakdownEntry {
            label: label.to_string(),
            count: share_of(total, *pct),
            percentage: *pct,
        })
        .collect()
}

/// 从给定的日序列与小时分布推导完整快照
pub fn snapshot_from_daily(
    daily_views: Vec<DailyPoint>,
    time_ranges: Vec<HourlyPoint>,
    generated_at: DateTime<Utc>,
) -> AnalyticsSnapshot {
    let views: u32 = daily_views.iter().map(|d| d.views).sum();
    let clicks: u32 = daily_views.iter().map(|d| d.clicks).sum();

    let link_performance = LINK_SHARES
        .iter()
        .map(|(title, click_pct, view_pct, ctr)| LinkPerformance {
            title: title.to_string(),
            clicks: share_of(clicks, *click_pct),
            views: share_of(views, *view_pct),
            ctr: *ctr,
        })
        .collect();

    let recent_activity = RECENT_ACTIVITY
        .iter()
        .map(|(action, timestamp, value)| ActivityEntry {
            action: action.to_string(),
            timestamp: timestamp.to_string(),
            value: *value,
        })
        .collect();

    AnalyticsSnapshot {
        generated_at,
        views,
        clicks,
        conversion_rate: conversion_rate(views, clicks),
        daily_views,
        top_countries: breakdown(views, COUNTRY_SHARES),
        device_types: breakdown(views, DEVICE_SHARES),
        referrers: breakdown(views, REFERRER_SHARES),
        link_performance,
        time_ranges,
        recent_activity,
    }
}

/// 过去 7 天（含今天）的随机日序列
pub fn random_daily_series(now: DateTime<Utc>) -> Vec<DailyPoint> {
    let today = now.date_naive();
    (0..DAYS)
        .map(|i| {
            let date = today - Duration::days((DAYS - 1 - i) as i64);
            DailyPoint {
                date: date.format("%b %-d").to_string(),
                views: rand::random_range(50..250),
                clicks: rand::random_range(20..120),
            }
        })
        .collect()
}

pub fn random_hourly_series() -> Vec<HourlyPoint> {
    (0..HOURS as u8)
        .map(|hour| HourlyPoint {
            hour,
            views: rand::random_range(10..60),
        })
        .collect()
}

/// 生成一份新的随机快照
pub fn generate_snapshot() -> AnalyticsSnapshot {
    let now = Utc::now();
    snapshot_from_daily(random_daily_series(now), random_hourly_series(), now)
}

/// 导出文件名：analytics-YYYY-MM-DD.json
pub fn export_filename(date: NaiveDate) -> String {
    format!("analytics-{}.json", date.format("%Y-%m-%d"))
}
