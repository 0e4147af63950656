use std::time::Duration;

// API Versions
pub const FACEBOOK_API_VERSION: &str = "v18.0";
pub const TIKTOK_API_VERSION: &str = "v1.3";

// API Base URLs
pub const FACEBOOK_BASE_URL: &str = "https://graph.facebook.com";
pub const TIKTOK_BASE_URL_PROD: &str = "https://business-api.tiktok.com/open_api";
pub const TIKTOK_BASE_URL_SANDBOX: &str = "https://sandbox-ads.tiktok.com/open_api";

// Headers
pub const CONTENT_TYPE_HEADER: &str = "Content-Type";
pub const ACCEPT_HEADER: &str = "Accept";
pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const TIKTOK_ACCESS_TOKEN_HEADER: &str = "Access-Token";

// Response gating
pub const VALID_STATUS_CODES: &[u16] = &[200];
pub const TIKTOK_VALID_PAYLOAD_CODES: &[i64] = &[0, 20001];

// Page sizes
pub const FACEBOOK_PAGE_LIMIT: u32 = 100;
pub const TIKTOK_PAGE_SIZE: u32 = 1000;

// Insights report polling
pub const REPORT_POLL_INTERVAL_SECS: u64 = 5;
pub const REPORT_POLL_INTERVAL: Duration = Duration::from_secs(REPORT_POLL_INTERVAL_SECS);
pub const REPORT_COMPLETE_PERCENT: i64 = 100;

pub const REQUEST_TIMEOUT_SECS: u64 = 60;

// Dates
pub const API_DATE_FORMAT: &str = "%Y-%m-%d";

pub const TIKTOK_CONVERSION_ACTION_TYPE: &str = "conversion";

// Facebook API Fields
pub const FB_CAMPAIGN_FIELDS: &[&str] = &[
    "account_id",
    "id",
    "name",
    "effective_status",
    "configured_status",
    "created_time",
    "updated_time",
];
pub const FB_ADSET_FIELDS: &[&str] = &[
    "account_id",
    "campaign_id",
    "id",
    "name",
    "effective_status",
    "configured_status",
    "created_time",
    "updated_time",
];
pub const FB_AD_FIELDS: &[&str] = &[
    "account_id",
    "campaign_id",
    "adset_id",
    "id",
    "name",
    "effective_status",
    "configured_status",
    "created_time",
    "updated_time",
];
pub const FB_ADCREATIVE_FIELDS: &[&str] = &["account_id", "id", "name", "title", "body", "image_url"];

pub const FB_CAMPAIGN_INSIGHTS_FIELDS: &[&str] = &[
    "account_id",
    "account_name",
    "campaign_id",
    "campaign_name",
    "spend",
    "impressions",
    "clicks",
    "ctr",
    "cpm",
    "cpc",
    "reach",
    "actions",
    "conversions",
    "cost_per_conversion",
];
pub const FB_ADSET_INSIGHTS_FIELDS: &[&str] = &[
    "account_id",
    "account_name",
    "campaign_id",
    "campaign_name",
    "adset_id",
    "adset_name",
    "spend",
    "impressions",
    "clicks",
    "ctr",
    "cpm",
    "cpc",
    "reach",
    "actions",
    "conversions",
    "cost_per_conversion",
];
pub const FB_AD_INSIGHTS_FIELDS: &[&str] = &[
    "account_id",
    "account_name",
    "campaign_id",
    "campaign_name",
    "adset_id",
    "adset_name",
    "ad_id",
    "ad_name",
    "spend",
    "impressions",
    "clicks",
    "ctr",
    "cpm",
    "cpc",
    "reach",
    "actions",
    "conversions",
    "cost_per_conversion",
];

// TikTok API Fields
pub const TT_CAMPAIGN_FIELDS: &[&str] = &[
    "advertiser_id",
    "campaign_id",
    "campaign_name",
    "operation_status",
    "secondary_status",
    "create_time",
    "modify_time",
];
pub const TT_ADGROUP_FIELDS: &[&str] = &[
    "advertiser_id",
    "campaign_id",
    "adgroup_id",
    "adgroup_name",
    "operation_status",
    "secondary_status",
    "create_time",
    "modify_time",
];
pub const TT_AD_FIELDS: &[&str] = &[
    "advertiser_id",
    "campaign_id",
    "adgroup_id",
    "ad_id",
    "ad_name",
    "operation_status",
    "secondary_status",
    "create_time",
    "modify_time",
];

pub const TT_CAMPAIGN_INSIGHTS_DIMENSIONS: &[&str] = &["campaign_id", "stat_time_day"];
pub const TT_CAMPAIGN_INSIGHTS_METRICS: &[&str] = &[
    "campaign_name",
    "spend",
    "impressions",
    "clicks",
    "conversion",
    "cost_per_conversion",
    "conversion_rate",
    "ctr",
    "cpm",
    "cpc",
    "reach",
];
pub const TT_ADGROUP_INSIGHTS_DIMENSIONS: &[&str] = &["adgroup_id", "stat_time_day"];
pub const TT_ADGROUP_INSIGHTS_METRICS: &[&str] = &[
    "campaign_id",
    "campaign_name",
    "adgroup_name",
    "spend",
    "impressions",
    "clicks",
    "conversion",
    "cost_per_conversion",
    "conversion_rate",
    "ctr",
    "cpm",
    "cpc",
    "reach",
];
pub const TT_AD_INSIGHTS_DIMENSIONS: &[&str] = &["ad_id", "stat_time_day"];
pub const TT_AD_INSIGHTS_METRICS: &[&str] = &[
    "campaign_id",
    "campaign_name",
    "adgroup_id",
    "adgroup_name",
    "ad_name",
    "spend",
    "impressions",
    "clicks",
    "conversion",
    "cost_per_conversion",
    "conversion_rate",
    "ctr",
    "cpm",
    "cpc",
    "reach",
];
