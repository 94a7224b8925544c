//! Command handlers, one per actionable intent. Each handler turns its typed
//! payload into a response string and converts its own failures into a
//! user-facing message.

pub mod browser;
pub mod courtesy;
pub mod date_time;
pub mod greet;
pub mod joke;
pub mod location;
pub mod news;
pub mod open_target;
pub mod system_info;
pub mod timer;
pub mod weather;

use std::time::Duration;

use crate::models::SkillSettings;
use crate::utils::Telemetry;

/// Shared dependencies of the network-backed handlers. Secrets are read once
/// at startup and carried here.
pub struct SkillContext {
    pub http: reqwest::Client,
    pub news_api_key: String,
    pub news_source: String,
    pub weather_api_key: String,
    pub log: Telemetry,
}

impl SkillContext {
    pub fn new(settings: &SkillSettings, log: Telemetry) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.http_timeout_secs.max(1)))
            .build()?;
        Ok(Self {
            http,
            news_api_key: settings.news_api_key.clone(),
            news_source: settings.news_source.clone(),
            weather_api_key: settings.weather_api_key.clone(),
            log,
        })
    }
}
