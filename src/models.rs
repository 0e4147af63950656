use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constants::API_DATE_FORMAT;
use crate::error::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Platform {
    Facebook,
    #[serde(rename = "TIKTOK")]
    TikTok,
}

impl Platform {
    pub fn name(&self) -> &'static str {
        match self {
            Platform::Facebook => "FACEBOOK",
            Platform::TikTok => "TIKTOK",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "facebook" | "fb" => Some(Platform::Facebook),
            "tiktok" | "tt" => Some(Platform::TikTok),
            _ => None,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unified resource level. Serializes as the tag carried by insights rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceType {
    Campaign,
    AdSet,
    Ad,
    AdCreative,
}

impl ResourceType {
    pub fn name(&self) -> &'static str {
        match self {
            ResourceType::Campaign => "CAMPAIGN",
            ResourceType::AdSet => "AD_SET",
            ResourceType::Ad => "AD",
            ResourceType::AdCreative => "AD_CREATIVE",
        }
    }

    /// Lowercase value used as the Facebook `level` and as storage prefix.
    pub fn value(&self) -> &'static str {
        match self {
            ResourceType::Campaign => "campaign",
            ResourceType::AdSet => "adset",
            ResourceType::Ad => "ad",
            ResourceType::AdCreative => "adcreative",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().replace('_', "").as_str() {
            "campaign" => Some(ResourceType::Campaign),
            "adset" | "adgroup" => Some(ResourceType::AdSet),
            "ad" => Some(ResourceType::Ad),
            "adcreative" => Some(ResourceType::AdCreative),
            _ => None,
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// TikTok calls the middle level of the hierarchy an ad group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TikTokResourceType {
    Campaign,
    AdGroup,
    Ad,
}

impl TikTokResourceType {
    pub fn name(&self) -> &'static str {
        match self {
            TikTokResourceType::Campaign => "CAMPAIGN",
            TikTokResourceType::AdGroup => "AD_GROUP",
            TikTokResourceType::Ad => "AD",
        }
    }

    pub fn unified(&self) -> ResourceType {
        match self {
            TikTokResourceType::Campaign => ResourceType::Campaign,
            TikTokResourceType::AdGroup => ResourceType::AdSet,
            TikTokResourceType::Ad => ResourceType::Ad,
        }
    }
}

impl TryFrom<ResourceType> for TikTokResourceType {
    type Error = ClientError;

    fn try_from(resource_type: ResourceType) -> Result<Self, Self::Error> {
        match resource_type {
            ResourceType::Campaign => Ok(TikTokResourceType::Campaign),
            ResourceType::AdSet => Ok(TikTokResourceType::AdGroup),
            ResourceType::Ad => Ok(TikTokResourceType::Ad),
            ResourceType::AdCreative => Err(ClientError::InvalidInput(format!(
                "Resource type {} has no TikTok equivalent",
                resource_type
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeIncrement {
    Day,
    Week,
    Month,
}

impl TimeIncrement {
    pub fn days(&self) -> u32 {
        match self {
            TimeIncrement::Day => 1,
            TimeIncrement::Week => 7,
            TimeIncrement::Month => 30,
        }
    }
}

/// Inclusive date range of an insights query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDateRange")]
pub struct DateRange {
    from: NaiveDate,
    to: NaiveDate,
}

#[derive(Deserialize)]
struct RawDateRange {
    from: NaiveDate,
    to: NaiveDate,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = ClientError;

    fn try_from(raw: RawDateRange) -> Result<Self, Self::Error> {
        DateRange::new(raw.from, raw.to)
    }
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self, ClientError> {
        if from > to {
            return Err(ClientError::InvalidInput(format!(
                "Date range start {} is after its end {}",
                from, to
            )));
        }
        Ok(Self { from, to })
    }

    pub fn since(&self) -> String {
        self.from.format(API_DATE_FORMAT).to_string()
    }

    pub fn until(&self) -> String {
        self.to.format(API_DATE_FORMAT).to_string()
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.since(), self.until())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdAccount {
    /// Facebook numeric account id; TikTok has no equivalent.
    pub id_token: Option<String>,
    pub account_id: String,
    pub account_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignDetails {
    pub account_id: String,
    pub campaign_id: String,
    pub campaign_name: String,
    pub effective_status: String,
    pub configured_status: Option<String>,
    pub created_time: String,
    pub updated_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdSetDetails {
    pub account_id: String,
    pub campaign_id: String,
    pub adset_id: String,
    pub adset_name: String,
    pub effective_status: String,
    pub configured_status: Option<String>,
    pub created_time: String,
    pub updated_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdDetails {
    pub account_id: String,
    pub campaign_id: String,
    pub adset_id: String,
    pub ad_id: String,
    pub ad_name: String,
    pub effective_status: String,
    pub configured_status: Option<String>,
    pub created_time: String,
    pub updated_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdCreativeDetails {
    pub account_id: String,
    pub creative_id: String,
    pub creative_name: Option<String>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageDetails {
    pub image_id: String,
    pub material_id: String,
    pub size: f64,
    pub width: f64,
    pub height: f64,
    pub format: String,
    pub image_url: String,
    pub signature: String,
    pub file_name: String,
    pub create_time: String,
    pub modify_time: String,
    pub displayable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoDetails {
    pub video_id: String,
    pub material_id: String,
    pub duration: f64,
    pub bit_rate: f64,
    pub size: f64,
    pub width: f64,
    pub height: f64,
    pub format: String,
    pub video_cover_url: String,
    pub preview_url: String,
    pub preview_url_expire_time: String,
    pub signature: String,
    pub file_name: String,
    pub create_time: String,
    pub modify_time: String,
    pub displayable: bool,
    pub allow_download: bool,
    pub allowed_placements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionValue {
    pub action_type: String,
    pub value: String,
}

/// Percentage of clicks that converted. `None` when the rate is undefined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionRate {
    pub action_type: String,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceInsightsReport {
    pub account_id: String,
    pub account_name: Option<String>,
    pub resource_type: ResourceType,
    pub campaign_id: String,
    pub campaign_name: String,
    pub adset_id: Option<String>,
    pub adset_name: Option<String>,
    pub ad_id: Option<String>,
    pub ad_name: Option<String>,
    pub spend: String,
    pub impressions: String,
    pub clicks: String,
    pub ctr: Option<String>,
    pub cpm: Option<String>,
    pub cpc: Option<String>,
    pub reach: String,
    pub actions: Option<Vec<ActionValue>>,
    pub conversions: Vec<ActionValue>,
    pub cost_per_conversion: Vec<ActionValue>,
    pub conversion_rate: Vec<ConversionRate>,
    pub date_start: String,
    pub date_stop: String,
}

impl ResourceInsightsReport {
    /// Id of the resource the row aggregates, following its `resource_type`.
    pub fn resource_id(&self) -> Option<&str> {
        match self.resource_type {
            ResourceType::Campaign => Some(self.campaign_id.as_str()),
            ResourceType::AdSet => self.adset_id.as_deref(),
            ResourceType::Ad => self.ad_id.as_deref(),
            ResourceType::AdCreative => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportJobStatus {
    Running,
    Ready,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsightsReportJob {
    pub report_id: String,
    pub status: ReportJobStatus,
    pub percent_complete: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_range_rejects_inverted_bounds() {
        let from = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        let to = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        assert!(matches!(DateRange::new(from, to), Err(ClientError::InvalidInput(_))));
        let range = DateRange::new(to, from).unwrap();
        assert_eq!(range.since(), "2024-03-01");
        assert_eq!(range.until(), "2024-03-02");
    }

    #[test]
    fn deserialized_date_range_keeps_its_bounds_ordered() {
        let inverted = serde_json::from_value::<DateRange>(serde_json::json!({
            "from": "2024-02-01",
            "to": "2024-01-01"
        }));
        let ordered: DateRange = serde_json::from_value(serde_json::json!({
            "from": "2024-01-01",
            "to": "2024-02-01"
        }))
        .unwrap();

        assert!(inverted.unwrap_err().to_string().contains("is after its end"));
        assert_eq!(ordered.until(), "2024-02-01");
    }

    #[test]
    fn time_increments_are_expressed_in_days() {
        assert_eq!(TimeIncrement::Day.days(), 1);
        assert_eq!(TimeIncrement::Week.days(), 7);
        assert_eq!(TimeIncrement::Month.days(), 30);
    }

    #[test]
    fn ad_set_maps_to_tiktok_ad_group() {
        let tiktok = TikTokResourceType::try_from(ResourceType::AdSet).unwrap();
        assert_eq!(tiktok, TikTokResourceType::AdGroup);
        assert_eq!(tiktok.unified(), ResourceType::AdSet);
        assert!(TikTokResourceType::try_from(ResourceType::AdCreative).is_err());
    }

    #[test]
    fn resource_type_serializes_as_unified_tag() {
        assert_eq!(serde_json::to_value(ResourceType::AdSet).unwrap(), "AD_SET");
        assert_eq!(ResourceType::parse("ad_group"), Some(ResourceType::AdSet));
        assert_eq!(Platform::parse("TikTok"), Some(Platform::TikTok));
    }
}
