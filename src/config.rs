use dotenv::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use serde_json::{json, Value};
use thiserror::Error;
use url::Url;

use crate::constants::{API_DATE_FORMAT, REPORT_POLL_INTERVAL_SECS};
use crate::models::{DateRange, Platform, ResourceType};

#[derive(Debug)]
pub struct Config {
    pub platform: Platform,
    pub access_token: String,
    /// Empty means every account reachable with the token.
    pub account_ids: Vec<String>,
    pub resource_type: ResourceType,
    pub date_range: DateRange,
    pub output_dir: PathBuf,
    pub poll_interval: Duration,
    pub tiktok_app_id: Option<String>,
    pub tiktok_secret: Option<String>,
    pub tiktok_sandbox: bool,
    pub facebook_base_url: Option<String>,
    pub tiktok_base_url: Option<String>,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable not found: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {name}: {reason}")]
    InvalidValue { name: String, reason: String },
    #[error("Invalid URL in {name}: {reason}")]
    InvalidUrl { name: String, reason: String },
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        let platform_name = required("ADS_PLATFORM")?;
        let platform =
            Platform::parse(&platform_name).ok_or_else(|| invalid("ADS_PLATFORM", "expected facebook or tiktok"))?;

        let access_token = required("ADS_ACCESS_TOKEN")?;

        let account_ids = optional("ADS_ACCOUNT_IDS")
            .map(|ids| {
                ids.split(',')
                    .map(str::trim)
                    .filter(|id| !id.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let resource_type = match optional("ADS_RESOURCE_TYPE") {
            Some(value) => ResourceType::parse(&value)
                .ok_or_else(|| invalid("ADS_RESOURCE_TYPE", "expected campaign, adset or ad"))?,
            None => ResourceType::Campaign,
        };

        let from = parse_date("ADS_DATE_FROM")?;
        let to = parse_date("ADS_DATE_TO")?;
        let date_range = DateRange::new(from, to).map_err(|e| invalid("ADS_DATE_FROM", &e.to_string()))?;

        let output_dir = optional("ADS_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("output"));

        let poll_interval_secs = match optional("ADS_POLL_INTERVAL_SECS") {
            Some(value) => value
                .parse::<u64>()
                .map_err(|e| invalid("ADS_POLL_INTERVAL_SECS", &e.to_string()))?,
            None => REPORT_POLL_INTERVAL_SECS,
        };

        let tiktok_sandbox = match optional("TIKTOK_SANDBOX") {
            Some(value) => value
                .parse::<bool>()
                .map_err(|e| invalid("TIKTOK_SANDBOX", &e.to_string()))?,
            None => false,
        };

        let facebook_base_url = optional_url("FACEBOOK_BASE_URL")?;
        let tiktok_base_url = optional_url("TIKTOK_BASE_URL")?;

        Ok(Self {
            platform,
            access_token,
            account_ids,
            resource_type,
            date_range,
            output_dir,
            poll_interval: Duration::from_secs(poll_interval_secs),
            tiktok_app_id: optional("TIKTOK_APP_ID"),
            tiktok_secret: optional("TIKTOK_SECRET"),
            tiktok_sandbox,
            facebook_base_url,
            tiktok_base_url,
        })
    }

    /// Platform params in the shape the client factory validates.
    pub fn platform_params(&self) -> Option<Value> {
        match self.platform {
            Platform::Facebook => None,
            Platform::TikTok => Some(json!({
                "app_id": self.tiktok_app_id,
                "secret": self.tiktok_secret,
                "sandbox": self.tiktok_sandbox,
            })),
        }
    }
}

fn required(name: &str) -> Result<String, ConfigError> {
    optional(name).ok_or_else(|| ConfigError::MissingEnv(name.to_string()))
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn invalid(name: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_date(name: &str) -> Result<NaiveDate, ConfigError> {
    let value = required(name)?;
    NaiveDate::parse_from_str(value.trim(), API_DATE_FORMAT).map_err(|e| invalid(name, &e.to_string()))
}

fn optional_url(name: &str) -> Result<Option<String>, ConfigError> {
    let Some(value) = optional(name) else {
        return Ok(None);
    };

    // Validate the URL format
    Url::parse(&value).map_err(|e| ConfigError::InvalidUrl {
        name: name.to_string(),
        reason: e.to_string(),
    })?;

    Ok(Some(value))
}
