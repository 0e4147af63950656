//! Accepted Business API payload shapes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct AdvertiserPayload {
    pub advertiser_id: String,
    pub advertiser_name: String,
}

#[derive(Debug, Deserialize)]
pub struct CampaignPayload {
    pub advertiser_id: String,
    pub campaign_id: String,
    pub campaign_name: String,
    pub operation_status: String,
    pub secondary_status: Option<String>,
    pub create_time: String,
    pub modify_time: String,
}

#[derive(Debug, Deserialize)]
pub struct AdGroupPayload {
    pub advertiser_id: String,
    pub campaign_id: String,
    pub adgroup_id: String,
    pub adgroup_name: String,
    pub operation_status: String,
    pub secondary_status: Option<String>,
    pub create_time: String,
    pub modify_time: String,
}

#[derive(Debug, Deserialize)]
pub struct AdPayload {
    pub advertiser_id: String,
    pub campaign_id: String,
    pub adgroup_id: String,
    pub ad_id: String,
    pub ad_name: String,
    pub operation_status: String,
    pub secondary_status: Option<String>,
    pub create_time: String,
    pub modify_time: String,
}

#[derive(Debug, Deserialize)]
pub struct ImagePayload {
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

#[derive(Debug, Deserialize)]
pub struct VideoPayload {
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

#[derive(Debug, Deserialize)]
pub struct CreatedCampaignPayload {
    pub campaign_id: String,
}

#[derive(Debug, Deserialize)]
pub struct CreatedAdGroupPayload {
    pub adgroup_id: String,
}

#[derive(Debug, Deserialize)]
pub struct AdIdsPayload {
    #[serde(default)]
    pub ad_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreatedImagePayload {
    pub image_id: String,
}

#[derive(Debug, Deserialize)]
pub struct CreatedVideoPayload {
    pub video_id: String,
}

// Insights rows arrive as {"metrics": {...}, "dimensions": {...}}.

#[derive(Debug, Deserialize)]
pub struct InsightRow<M, D> {
    pub metrics: M,
    pub dimensions: D,
}

#[derive(Debug, Deserialize)]
pub struct CampaignMetrics {
    pub campaign_name: String,
    pub spend: String,
    pub impressions: String,
    pub clicks: String,
    pub ctr: String,
    pub cpm: String,
    pub cpc: String,
    pub reach: String,
    #[serde(rename = "conversion")]
    pub conversions: String,
    pub cost_per_conversion: String,
    pub conversion_rate: String,
}

#[derive(Debug, Deserialize)]
pub struct AdGroupMetrics {
    #[serde(flatten)]
    pub campaign: CampaignMetrics,
    pub campaign_id: String,
    pub adgroup_name: String,
}

#[derive(Debug, Deserialize)]
pub struct AdMetrics {
    #[serde(flatten)]
    pub adgroup: AdGroupMetrics,
    pub adgroup_id: String,
    pub ad_name: String,
}

#[derive(Debug, Deserialize)]
pub struct CampaignDimensions {
    pub campaign_id: String,
    pub stat_time_day: String,
}

#[derive(Debug, Deserialize)]
pub struct AdGroupDimensions {
    pub adgroup_id: String,
    pub stat_time_day: String,
}

#[derive(Debug, Deserialize)]
pub struct AdDimensions {
    pub ad_id: String,
    pub stat_time_day: String,
}

pub type CampaignInsightRow = InsightRow<CampaignMetrics, CampaignDimensions>;
pub type AdGroupInsightRow = InsightRow<AdGroupMetrics, AdGroupDimensions>;
pub type AdInsightRow = InsightRow<AdMetrics, AdDimensions>;

// Request payloads. Optional fields are only sent when supplied.

#[derive(Debug, Deserialize, Serialize)]
pub struct CampaignCreate {
    pub advertiser_id: String,
    pub campaign_name: String,
    pub objective_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_optimize_on: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_promotion_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_industries: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rf_campaign_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign_product_source: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CampaignUpdate {
    pub advertiser_id: String,
    pub campaign_id: String,
    pub campaign_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_industries: Option<Vec<String>>,
}

/// Targeting, placement and bidding settings shared by ad group creation and update.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct AdGroupSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placement_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placements: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment_disabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pixel_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excluded_audience_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience_rule: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_category_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_groups: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operating_systems: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_types: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_end_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dayparting: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimization_goal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimization_event: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bid_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bid_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversion_bid_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_schedule: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_download_disabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_disabled: Option<bool>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct AdGroupCreate {
    pub advertiser_id: String,
    pub campaign_id: String,
    pub adgroup_name: String,
    pub budget: f64,
    pub budget_mode: String,
    pub schedule_type: String,
    pub schedule_start_time: String,
    pub pacing: String,
    pub billing_event: String,
    #[serde(flatten)]
    pub settings: AdGroupSettings,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct AdGroupUpdate {
    pub advertiser_id: String,
    pub adgroup_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adgroup_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deep_cpa_bid: Option<f64>,
    #[serde(flatten)]
    pub settings: AdGroupSettings,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CreativeCreate {
    pub identity_id: String,
    pub identity_type: String,
    pub ad_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ad_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ad_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_to_action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tiktok_item_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub music_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landing_page_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deeplink: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_pixel_id: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_params: Option<Vec<Map<String, Value>>>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CreativeUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ad_id: Option<String>,
    #[serde(flatten)]
    pub creative: CreativeCreate,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct AdCreate {
    pub advertiser_id: String,
    pub adgroup_id: String,
    pub creatives: Vec<CreativeCreate>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct AdUpdate {
    pub advertiser_id: String,
    pub adgroup_id: String,
    pub creatives: Vec<CreativeUpdate>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct AdStatusUpdate {
    pub advertiser_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ad_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aco_ad_ids: Option<Vec<String>>,
    pub operation_status: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ImageCreate {
    pub advertiser_id: String,
    pub upload_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_signature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ImageUpdate {
    pub advertiser_id: String,
    pub image_id: String,
    pub file_name: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ImageInfoParams {
    pub advertiser_id: String,
    pub image_ids: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct VideoCreate {
    pub advertiser_id: String,
    pub upload_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_signature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_third_party: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flaw_detect: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_fix_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_bind_enabled: Option<bool>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct VideoUpdate {
    pub advertiser_id: String,
    pub video_id: String,
    pub file_name: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct VideoInfoParams {
    pub advertiser_id: String,
    pub video_ids: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{validate, validate_batch};
    use serde_json::json;

    fn ad_row() -> Value {
        json!({
            "metrics": {
                "campaign_id": "c1",
                "campaign_name": "spring",
                "adgroup_id": "g1",
                "adgroup_name": "group",
                "ad_name": "ad",
                "spend": "12.00",
                "impressions": "1000",
                "clicks": "50",
                "conversion": "5",
                "cost_per_conversion": "2.40",
                "conversion_rate": "10.00",
                "ctr": "5.00",
                "cpm": "12.00",
                "cpc": "0.24",
                "reach": "800",
                "extra_metric": "ignored"
            },
            "dimensions": {"ad_id": "a1", "stat_time_day": "2024-01-01 00:00:00"}
        })
    }

    #[test]
    fn ad_insight_row_reads_nested_metrics_and_dimensions() {
        let row: AdInsightRow = validate(&ad_row()).unwrap();

        assert_eq!(row.dimensions.ad_id, "a1");
        assert_eq!(row.metrics.adgroup_id, "g1");
        assert_eq!(row.metrics.adgroup.adgroup_name, "group");
        assert_eq!(row.metrics.adgroup.campaign.conversions, "5");
    }

    #[test]
    fn campaign_level_rows_do_not_satisfy_ad_level_schema() {
        let mut row = ad_row();
        row["dimensions"] = json!({"campaign_id": "c1", "stat_time_day": "2024-01-01 00:00:00"});

        assert!(validate_batch::<CampaignInsightRow>(&[row.clone()]).is_ok());
        assert!(validate_batch::<AdInsightRow>(&[row]).is_err());
    }

    #[test]
    fn adgroup_create_serializes_only_supplied_settings() {
        let create: AdGroupCreate = validate(&json!({
            "advertiser_id": "adv",
            "campaign_id": "c1",
            "adgroup_name": "group",
            "budget": 50.0,
            "budget_mode": "BUDGET_MODE_DAY",
            "schedule_type": "SCHEDULE_FROM_NOW",
            "schedule_start_time": "2024-01-01 00:00:00",
            "pacing": "PACING_MODE_SMOOTH",
            "billing_event": "CPC",
            "location_ids": ["6252001"]
        }))
        .unwrap();

        let body = serde_json::to_value(&create).unwrap();
        assert_eq!(body["location_ids"], json!(["6252001"]));
        assert!(body.get("gender").is_none());
    }
}
