//! Accepted Graph API payload shapes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct AdAccountPayload {
    pub id: String,
    pub account_id: String,
}

#[derive(Debug, Deserialize)]
pub struct CampaignPayload {
    pub account_id: String,
    pub id: String,
    pub name: String,
    pub effective_status: String,
    pub configured_status: String,
    pub created_time: String,
    pub updated_time: String,
}

#[derive(Debug, Deserialize)]
pub struct AdSetPayload {
    pub account_id: String,
    pub campaign_id: String,
    pub id: String,
    pub name: String,
    pub effective_status: String,
    pub configured_status: String,
    pub created_time: String,
    pub updated_time: String,
}

#[derive(Debug, Deserialize)]
pub struct AdPayload {
    pub account_id: String,
    pub campaign_id: String,
    pub adset_id: String,
    pub id: String,
    pub name: String,
    pub effective_status: String,
    pub configured_status: String,
    pub created_time: String,
    pub updated_time: String,
}

#[derive(Debug, Deserialize)]
pub struct AdCreativePayload {
    pub account_id: String,
    pub id: String,
    pub name: Option<String>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReportRunPayload {
    pub report_run_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReportStatusPayload {
    pub async_percent_completion: i64,
    #[serde(default)]
    pub is_running: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActionPayload {
    pub action_type: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct CreatedPayload {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdatedPayload {
    pub success: bool,
}

/// Fields shared by every insights level.
#[derive(Debug, Deserialize)]
pub struct CampaignInsightRow {
    pub account_id: String,
    pub account_name: String,
    pub campaign_id: String,
    pub campaign_name: String,
    pub spend: String,
    pub impressions: String,
    pub clicks: String,
    pub ctr: Option<String>,
    pub cpm: Option<String>,
    pub cpc: Option<String>,
    pub reach: String,
    pub actions: Option<Vec<ActionPayload>>,
    #[serde(default)]
    pub conversions: Vec<ActionPayload>,
    #[serde(default)]
    pub cost_per_conversion: Vec<ActionPayload>,
    pub date_start: String,
    pub date_stop: String,
}

#[derive(Debug, Deserialize)]
pub struct AdSetInsightRow {
    #[serde(flatten)]
    pub campaign: CampaignInsightRow,
    pub adset_id: String,
    pub adset_name: String,
}

#[derive(Debug, Deserialize)]
pub struct AdInsightRow {
    #[serde(flatten)]
    pub adset: AdSetInsightRow,
    pub ad_id: String,
    pub ad_name: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CampaignParams {
    pub name: String,
    pub special_ad_categories: Vec<String>,
    pub objective: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct AdSetParams {
    pub daily_budget: i64,
    pub name: String,
    pub campaign_id: String,
    pub bid_amount: i64,
    pub billing_event: String,
    pub optimization_goal: String,
    pub promoted_object: Map<String, Value>,
    pub targeting: Map<String, Value>,
    pub status: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ObjectStorySpec {
    pub page_id: String,
    pub link_data: Map<String, Value>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct AdCreativeParams {
    pub name: String,
    pub object_story_spec: ObjectStorySpec,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct AdParams {
    pub name: String,
    pub adset_id: String,
    pub creative: Map<String, Value>,
    pub status: String,
}
