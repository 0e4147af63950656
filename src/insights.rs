//! Insights report retrieval.
//!
//! Facebook generates reports asynchronously: a job is created, polled until
//! it is no longer running and fully complete, then its paginated results are
//! fetched. TikTok answers the same question with one paginated call. Both
//! paths end in the same validated, normalized `ResourceInsightsReport` rows.

use std::time::Duration;

use serde_json::Value;
use tracing::{info, warn};

use crate::constants::{
    FB_ADSET_INSIGHTS_FIELDS, FB_AD_INSIGHTS_FIELDS, FB_CAMPAIGN_INSIGHTS_FIELDS, REPORT_COMPLETE_PERCENT,
    TIKTOK_CONVERSION_ACTION_TYPE, TT_ADGROUP_INSIGHTS_DIMENSIONS, TT_ADGROUP_INSIGHTS_METRICS,
    TT_AD_INSIGHTS_DIMENSIONS, TT_AD_INSIGHTS_METRICS, TT_CAMPAIGN_INSIGHTS_DIMENSIONS, TT_CAMPAIGN_INSIGHTS_METRICS,
};
use crate::client::require_id;
use crate::error::ClientError;
use crate::facebook::schemas::{
    ActionPayload, AdInsightRow, AdSetInsightRow, CampaignInsightRow, ReportRunPayload, ReportStatusPayload,
};
use crate::facebook::FacebookApi;
use crate::models::{
    ActionValue, ConversionRate, DateRange, InsightsReportJob, Platform, ReportJobStatus, ResourceInsightsReport,
    ResourceType, TikTokResourceType, TimeIncrement,
};
use crate::tiktok::schemas::{self as tiktok_schemas, AdGroupMetrics, CampaignMetrics};
use crate::tiktok::{ReportQuery, ReportType, ServiceType, TikTokApi};
use crate::validation::{validate, validate_batch};

impl InsightsReportJob {
    pub fn from_status(report_id: &str, status: &ReportStatusPayload) -> Self {
        let ready = !status.is_running && status.async_percent_completion == REPORT_COMPLETE_PERCENT;
        Self {
            report_id: report_id.to_string(),
            status: if ready {
                ReportJobStatus::Ready
            } else {
                ReportJobStatus::Running
            },
            percent_complete: status.async_percent_completion,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == ReportJobStatus::Ready
    }
}

/// Runs the Facebook report job for one account and level.
///
/// Polls every `poll_interval` with no attempt limit; a job that never
/// completes keeps this future pending until the caller drops it.
pub async fn fetch_facebook_insights(
    api: &FacebookApi,
    poll_interval: Duration,
    ad_account_id: &str,
    resource_type: ResourceType,
    range: &DateRange,
) -> Result<Vec<ResourceInsightsReport>, ClientError> {
    require_id(Platform::Facebook, "ad_account_id", ad_account_id)?;
    let fields = facebook_insights_fields(resource_type)?.join(",");
    let context = format!(
        "platform={}, ad_account_id={}, resource_type={}, date_range={}",
        Platform::Facebook,
        ad_account_id,
        resource_type,
        range
    );

    let report = api
        .create_insights_report(ad_account_id, resource_type.value(), &fields, TimeIncrement::Day, range)
        .await
        .map_err(|e| {
            ClientError::provider(
                format!("Unable to create insights report job ({}) through provider", context),
                e,
            )
        })?;
    info!(ad_account_id, resource_type = %resource_type, "Created insights report job");

    let report_id = validate::<ReportRunPayload>(&report)
        .ok()
        .and_then(|payload| payload.report_run_id)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| {
            ClientError::InvalidResponse(format!(
                "Report job id is not received from provider (platform={}, response_data={})",
                Platform::Facebook,
                report
            ))
        })?;

    let job = wait_for_report(api, &report_id, poll_interval).await?;
    info!(report_id = %job.report_id, ad_account_id, "Insights report is ready");

    let rows = api
        .get_insights_report_results(&job.report_id)
        .await
        .map_err(|e| {
            ClientError::provider(
                format!("Unable to get insights report results ({}) through provider", context),
                e,
            )
        })?;

    normalize_facebook_rows(resource_type, &rows).map_err(|reason| {
        ClientError::InvalidResponse(format!(
            "Insights report data is not valid (platform={}, report_id={}, resource_type={}): {}",
            Platform::Facebook,
            job.report_id,
            resource_type,
            reason
        ))
    })
}

async fn wait_for_report(
    api: &FacebookApi,
    report_id: &str,
    poll_interval: Duration,
) -> Result<InsightsReportJob, ClientError> {
    loop {
        let response = api.get_insights_report_status(report_id).await.map_err(|e| {
            ClientError::provider(
                format!(
                    "Unable to get insights report status (platform={}, report_id={}) through provider",
                    Platform::Facebook,
                    report_id
                ),
                e,
            )
        })?;

        let status: ReportStatusPayload = validate(&response).map_err(|e| {
            ClientError::invalid_response(
                format!(
                    "Report status data (platform={}, report_id={}, response_data={})",
                    Platform::Facebook,
                    report_id,
                    response
                ),
                e,
            )
        })?;

        let job = InsightsReportJob::from_status(report_id, &status);
        if job.is_ready() {
            return Ok(job);
        }

        warn!(
            report_id,
            percent_complete = job.percent_complete,
            is_running = status.is_running,
            "Waiting for insights report"
        );
        tokio::time::sleep(poll_interval).await;
    }
}

fn facebook_insights_fields(resource_type: ResourceType) -> Result<&'static [&'static str], ClientError> {
    match resource_type {
        ResourceType::Campaign => Ok(FB_CAMPAIGN_INSIGHTS_FIELDS),
        ResourceType::AdSet => Ok(FB_ADSET_INSIGHTS_FIELDS),
        ResourceType::Ad => Ok(FB_AD_INSIGHTS_FIELDS),
        ResourceType::AdCreative => Err(ClientError::InvalidInput(format!(
            "Insights are not available for resource type {}",
            resource_type
        ))),
    }
}

/// Validates result rows against the level schema, then normalizes them.
fn normalize_facebook_rows(resource_type: ResourceType, rows: &[Value]) -> Result<Vec<ResourceInsightsReport>, String> {
    match resource_type {
        ResourceType::Campaign => validate_batch::<CampaignInsightRow>(rows)
            .map_err(|e| e.to_string())?
            .into_iter()
            .map(|row| normalize_facebook_row(resource_type, row, None, None))
            .collect(),
        ResourceType::AdSet => validate_batch::<AdSetInsightRow>(rows)
            .map_err(|e| e.to_string())?
            .into_iter()
            .map(|row| normalize_facebook_row(resource_type, row.campaign, Some((row.adset_id, row.adset_name)), None))
            .collect(),
        ResourceType::Ad => validate_batch::<AdInsightRow>(rows)
            .map_err(|e| e.to_string())?
            .into_iter()
            .map(|row| {
                normalize_facebook_row(
                    resource_type,
                    row.adset.campaign,
                    Some((row.adset.adset_id, row.adset.adset_name)),
                    Some((row.ad_id, row.ad_name)),
                )
            })
            .collect(),
        ResourceType::AdCreative => Err(format!("no insights schema for {}", resource_type)),
    }
}

fn normalize_facebook_row(
    resource_type: ResourceType,
    row: CampaignInsightRow,
    adset: Option<(String, String)>,
    ad: Option<(String, String)>,
) -> Result<ResourceInsightsReport, String> {
    let conversion_rate = facebook_conversion_rates(&row.clicks, &row.conversions)?;
    let (adset_id, adset_name) = adset.unzip();
    let (ad_id, ad_name) = ad.unzip();

    Ok(ResourceInsightsReport {
        account_id: row.account_id,
        account_name: Some(row.account_name),
        resource_type,
        campaign_id: row.campaign_id,
        campaign_name: row.campaign_name,
        adset_id,
        adset_name,
        ad_id,
        ad_name,
        spend: row.spend,
        impressions: row.impressions,
        clicks: row.clicks,
        ctr: row.ctr,
        cpm: row.cpm,
        cpc: row.cpc,
        reach: row.reach,
        actions: row.actions.map(|actions| actions.into_iter().map(action_value).collect()),
        conversions: row.conversions.into_iter().map(action_value).collect(),
        cost_per_conversion: row.cost_per_conversion.into_iter().map(action_value).collect(),
        conversion_rate,
        date_start: row.date_start,
        date_stop: row.date_stop,
    })
}

/// `value / clicks * 100` per conversion action. Zero clicks yields `None`.
pub fn facebook_conversion_rates(clicks: &str, conversions: &[ActionPayload]) -> Result<Vec<ConversionRate>, String> {
    let clicks: f64 = clicks
        .trim()
        .parse()
        .map_err(|_| format!("clicks value {:?} is not numeric", clicks))?;

    conversions
        .iter()
        .map(|conversion| {
            let value: f64 = conversion.value.trim().parse().map_err(|_| {
                format!(
                    "conversion value {:?} for {} is not numeric",
                    conversion.value, conversion.action_type
                )
            })?;
            Ok(ConversionRate {
                action_type: conversion.action_type.clone(),
                value: (clicks != 0.0).then(|| value / clicks * 100.0),
            })
        })
        .collect()
}

fn action_value(action: ActionPayload) -> ActionValue {
    ActionValue {
        action_type: action.action_type,
        value: action.value,
    }
}

/// Fetches the synchronous TikTok report. `AD_SET` is requested as TikTok's
/// ad group level and tagged back as `AD_SET`.
pub async fn fetch_tiktok_insights(
    api: &TikTokApi,
    advertiser_id: &str,
    resource_type: ResourceType,
    range: &DateRange,
) -> Result<Vec<ResourceInsightsReport>, ClientError> {
    require_id(Platform::TikTok, "advertiser_id", advertiser_id)?;
    let tiktok_type = TikTokResourceType::try_from(resource_type)?;
    let (dimensions, metrics) = tiktok_insights_fields(tiktok_type);
    let service_type = ServiceType::Auction;
    let query = ReportQuery {
        service_type,
        report_type: ReportType::Basic,
        data_level: data_level(service_type, tiktok_type),
        dimensions,
        metrics,
        range: *range,
    };

    let rows = api.get_insights_report(advertiser_id, &query).await.map_err(|e| {
        ClientError::provider(
            format!(
                "Unable to get insights report (platform={}, advertiser_id={}, resource_type={}, date_range={})",
                Platform::TikTok,
                advertiser_id,
                tiktok_type.name(),
                range
            ),
            e,
        )
    })?;

    normalize_tiktok_rows(advertiser_id, tiktok_type, &rows).map_err(|reason| {
        ClientError::InvalidResponse(format!(
            "Insights data is not valid (platform={}, advertiser_id={}, resource_type={}, date_range={}): {}",
            Platform::TikTok,
            advertiser_id,
            tiktok_type.name(),
            range,
            reason
        ))
    })
}

pub fn data_level(service_type: ServiceType, resource_type: TikTokResourceType) -> String {
    let level = match resource_type {
        TikTokResourceType::Campaign => "CAMPAIGN",
        TikTokResourceType::AdGroup => "ADGROUP",
        TikTokResourceType::Ad => "AD",
    };
    format!("{}_{}", service_type.as_str(), level)
}

fn tiktok_insights_fields(resource_type: TikTokResourceType) -> (&'static [&'static str], &'static [&'static str]) {
    match resource_type {
        TikTokResourceType::Campaign => (TT_CAMPAIGN_INSIGHTS_DIMENSIONS, TT_CAMPAIGN_INSIGHTS_METRICS),
        TikTokResourceType::AdGroup => (TT_ADGROUP_INSIGHTS_DIMENSIONS, TT_ADGROUP_INSIGHTS_METRICS),
        TikTokResourceType::Ad => (TT_AD_INSIGHTS_DIMENSIONS, TT_AD_INSIGHTS_METRICS),
    }
}

/// Ids and names that identify a TikTok row beyond its metrics.
struct TikTokRowKeys {
    campaign_id: String,
    adset: Option<(String, String)>,
    ad: Option<(String, String)>,
    stat_time_day: String,
}

fn normalize_tiktok_rows(
    advertiser_id: &str,
    resource_type: TikTokResourceType,
    rows: &[Value],
) -> Result<Vec<ResourceInsightsReport>, String> {
    let unified = resource_type.unified();

    match resource_type {
        TikTokResourceType::Campaign => validate_batch::<tiktok_schemas::CampaignInsightRow>(rows)
            .map_err(|e| e.to_string())?
            .into_iter()
            .map(|row| {
                let keys = TikTokRowKeys {
                    campaign_id: row.dimensions.campaign_id,
                    adset: None,
                    ad: None,
                    stat_time_day: row.dimensions.stat_time_day,
                };
                normalize_tiktok_row(advertiser_id, unified, row.metrics, keys)
            })
            .collect(),
        TikTokResourceType::AdGroup => validate_batch::<tiktok_schemas::AdGroupInsightRow>(rows)
            .map_err(|e| e.to_string())?
            .into_iter()
            .map(|row| {
                let AdGroupMetrics {
                    campaign,
                    campaign_id,
                    adgroup_name,
                } = row.metrics;
                let keys = TikTokRowKeys {
                    campaign_id,
                    adset: Some((row.dimensions.adgroup_id, adgroup_name)),
                    ad: None,
                    stat_time_day: row.dimensions.stat_time_day,
                };
                normalize_tiktok_row(advertiser_id, unified, campaign, keys)
            })
            .collect(),
        TikTokResourceType::Ad => validate_batch::<tiktok_schemas::AdInsightRow>(rows)
            .map_err(|e| e.to_string())?
            .into_iter()
            .map(|row| {
                let adgroup = row.metrics.adgroup;
                let keys = TikTokRowKeys {
                    campaign_id: adgroup.campaign_id,
                    adset: Some((row.metrics.adgroup_id, adgroup.adgroup_name)),
                    ad: Some((row.dimensions.ad_id, row.metrics.ad_name)),
                    stat_time_day: row.dimensions.stat_time_day,
                };
                normalize_tiktok_row(advertiser_id, unified, adgroup.campaign, keys)
            })
            .collect(),
    }
}

fn normalize_tiktok_row(
    advertiser_id: &str,
    resource_type: ResourceType,
    metrics: CampaignMetrics,
    keys: TikTokRowKeys,
) -> Result<ResourceInsightsReport, String> {
    let conversion_rate: f64 = metrics
        .conversion_rate
        .trim()
        .parse()
        .map_err(|_| format!("conversion_rate value {:?} is not numeric", metrics.conversion_rate))?;
    let (adset_id, adset_name) = keys.adset.unzip();
    let (ad_id, ad_name) = keys.ad.unzip();

    Ok(ResourceInsightsReport {
        account_id: advertiser_id.to_string(),
        account_name: None,
        resource_type,
        campaign_id: keys.campaign_id,
        campaign_name: metrics.campaign_name,
        adset_id,
        adset_name,
        ad_id,
        ad_name,
        spend: metrics.spend,
        impressions: metrics.impressions,
        clicks: metrics.clicks,
        ctr: Some(metrics.ctr),
        cpm: Some(metrics.cpm),
        cpc: Some(metrics.cpc),
        reach: metrics.reach,
        actions: None,
        conversions: vec![conversion_action(metrics.conversions)],
        cost_per_conversion: vec![conversion_action(metrics.cost_per_conversion)],
        conversion_rate: vec![ConversionRate {
            action_type: TIKTOK_CONVERSION_ACTION_TYPE.to_string(),
            value: Some(conversion_rate),
        }],
        date_start: keys.stat_time_day.clone(),
        date_stop: keys.stat_time_day,
    })
}

fn conversion_action(value: String) -> ActionValue {
    ActionValue {
        action_type: TIKTOK_CONVERSION_ACTION_TYPE.to_string(),
        value,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;
    use serde_json::json;

    use super::*;
    use crate::transport::testing::ScriptedTransport;
    use crate::transport::HttpMethod;

    fn range() -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
        )
        .unwrap()
    }

    fn facebook_campaign_row(clicks: &str, conversions: Value) -> Value {
        json!({
            "account_id": "123",
            "account_name": "acme",
            "campaign_id": "c1",
            "campaign_name": "spring",
            "spend": "20.50",
            "impressions": "1000",
            "clicks": clicks,
            "ctr": "20",
            "reach": "900",
            "conversions": conversions,
            "cost_per_conversion": [{"action_type": "purchase", "value": "2.05"}],
            "date_start": "2024-01-01",
            "date_stop": "2024-01-01"
        })
    }

    #[tokio::test]
    async fn facebook_job_is_polled_until_complete_then_fetched_once() {
        let transport = Arc::new(ScriptedTransport::new());
        transport
            .push_json(200, json!({"report_run_id": "r1"}))
            .push_json(200, json!({"async_percent_completion": 50, "is_running": true}))
            .push_json(200, json!({"async_percent_completion": 90, "is_running": true}))
            .push_json(200, json!({"async_percent_completion": 100, "is_running": false}))
            .push_json(
                200,
                json!({"data": [facebook_campaign_row("200", json!([{"action_type": "purchase", "value": "10"}]))]}),
            );
        let api = FacebookApi::new(transport.clone(), "token".to_string());

        let reports = fetch_facebook_insights(&api, Duration::ZERO, "act_123", ResourceType::Campaign, &range())
            .await
            .unwrap();

        assert_eq!(transport.count_matching(HttpMethod::Get, "/r1"), 3);
        assert_eq!(transport.count_matching(HttpMethod::Get, "/r1/insights"), 1);
        assert_eq!(reports.len(), 1);
        assert_eq!(
            reports[0].conversion_rate,
            vec![ConversionRate {
                action_type: "purchase".to_string(),
                value: Some(5.0)
            }]
        );
        assert_eq!(reports[0].resource_type, ResourceType::Campaign);
        assert_eq!(reports[0].cpm, None);
    }

    #[tokio::test]
    async fn complete_but_still_running_job_keeps_polling() {
        let transport = Arc::new(ScriptedTransport::new());
        transport
            .push_json(200, json!({"report_run_id": "r1"}))
            .push_json(200, json!({"async_percent_completion": 100, "is_running": true}))
            .push_json(200, json!({"async_percent_completion": 100}))
            .push_json(200, json!({"data": []}));
        let api = FacebookApi::new(transport.clone(), "token".to_string());

        let reports = fetch_facebook_insights(&api, Duration::ZERO, "act_1", ResourceType::Ad, &range())
            .await
            .unwrap();

        assert!(reports.is_empty());
        assert_eq!(transport.count_matching(HttpMethod::Get, "/r1"), 2);
    }

    #[tokio::test]
    async fn missing_report_run_id_is_invalid_response() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(200, json!({"id": "not-a-job"}));
        let api = FacebookApi::new(transport.clone(), "token".to_string());

        let err = fetch_facebook_insights(&api, Duration::ZERO, "act_1", ResourceType::Campaign, &range())
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::InvalidResponse(_)));
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn status_without_completion_is_invalid_response() {
        let transport = Arc::new(ScriptedTransport::new());
        transport
            .push_json(200, json!({"report_run_id": "r1"}))
            .push_json(200, json!({"is_running": false}));
        let api = FacebookApi::new(transport, "token".to_string());

        let err = fetch_facebook_insights(&api, Duration::ZERO, "act_1", ResourceType::Campaign, &range())
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn one_invalid_result_row_fails_the_whole_report() {
        let transport = Arc::new(ScriptedTransport::new());
        let mut broken = facebook_campaign_row("10", json!([]));
        broken.as_object_mut().unwrap().remove("date_stop");
        transport
            .push_json(200, json!({"report_run_id": "r1"}))
            .push_json(200, json!({"async_percent_completion": 100, "is_running": false}))
            .push_json(200, json!({"data": [facebook_campaign_row("10", json!([])), broken]}));
        let api = FacebookApi::new(transport, "token".to_string());

        let err = fetch_facebook_insights(&api, Duration::ZERO, "act_1", ResourceType::Campaign, &range())
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn provider_failure_while_fetching_results_is_provider_error() {
        let transport = Arc::new(ScriptedTransport::new());
        transport
            .push_json(200, json!({"report_run_id": "r1"}))
            .push_json(200, json!({"async_percent_completion": 100, "is_running": false}))
            .push_json(500, json!({"error": "boom"}));
        let api = FacebookApi::new(transport, "token".to_string());

        let err = fetch_facebook_insights(&api, Duration::ZERO, "act_1", ResourceType::AdSet, &range())
            .await
            .unwrap_err();

        match err {
            ClientError::Provider { source, .. } => assert_eq!(source.status_code(), Some(500)),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn zero_clicks_leaves_conversion_rate_undefined() {
        let conversions = vec![ActionPayload {
            action_type: "lead".to_string(),
            value: "3".to_string(),
        }];

        let rates = facebook_conversion_rates("0", &conversions).unwrap();

        assert_eq!(rates[0].value, None);
        assert!(facebook_conversion_rates("n/a", &conversions).is_err());
    }

    #[tokio::test]
    async fn tiktok_ad_set_request_uses_ad_group_level_and_returns_ad_set_rows() {
        let transport = Arc::new(ScriptedTransport::new());
        let row = |id: &str| {
            json!({
                "metrics": {
                    "campaign_id": "c1",
                    "campaign_name": "spring",
                    "adgroup_name": format!("group {}", id),
                    "spend": "10.00",
                    "impressions": "500",
                    "clicks": "25",
                    "conversion": "5",
                    "cost_per_conversion": "2.00",
                    "conversion_rate": "20.00",
                    "ctr": "5.00",
                    "cpm": "20.00",
                    "cpc": "0.40",
                    "reach": "450"
                },
                "dimensions": {"adgroup_id": id, "stat_time_day": "2024-01-01 00:00:00"}
            })
        };
        transport.push_json(
            200,
            json!({
                "code": 0,
                "message": "OK",
                "data": {"list": [row("g1"), row("g2")], "page_info": {"page": 1, "total_page": 1}}
            }),
        );
        let api = TikTokApi::new(transport.clone(), "token".to_string(), false);

        let reports = fetch_tiktok_insights(&api, "adv1", ResourceType::AdSet, &range())
            .await
            .unwrap();

        let request = &transport.requests()[0];
        assert_eq!(request.query_param("data_level"), Some("AUCTION_ADGROUP"));
        assert_eq!(request.query_param("service_type"), Some("AUCTION"));
        assert_eq!(request.query_param("report_type"), Some("BASIC"));
        assert_eq!(reports.len(), 2);
        assert!(reports.iter().all(|r| r.resource_type == ResourceType::AdSet));
        assert_eq!(reports[0].adset_id.as_deref(), Some("g1"));
        assert_eq!(reports[0].adset_name.as_deref(), Some("group g1"));
        assert_eq!(reports[0].account_id, "adv1");
        assert_eq!(reports[0].date_start, reports[0].date_stop);
        assert_eq!(
            reports[0].conversions,
            vec![ActionValue {
                action_type: "conversion".to_string(),
                value: "5".to_string()
            }]
        );
        assert_eq!(reports[0].conversion_rate[0].value, Some(20.0));
        assert_eq!(serde_json::to_value(&reports[0]).unwrap()["resource_type"], "AD_SET");
    }

    #[tokio::test]
    async fn blank_account_id_is_rejected_before_any_request() {
        let transport = Arc::new(ScriptedTransport::new());
        let facebook = FacebookApi::new(transport.clone(), "token".to_string());
        let tiktok = TikTokApi::new(transport.clone(), "token".to_string(), false);

        let facebook_err = fetch_facebook_insights(&facebook, Duration::ZERO, "", ResourceType::Campaign, &range())
            .await
            .unwrap_err();
        let tiktok_err = fetch_tiktok_insights(&tiktok, "  ", ResourceType::Ad, &range())
            .await
            .unwrap_err();

        assert!(matches!(facebook_err, ClientError::InvalidInput(message) if message.contains("ad_account_id")));
        assert!(matches!(tiktok_err, ClientError::InvalidInput(message) if message.contains("advertiser_id")));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn tiktok_non_numeric_conversion_rate_is_invalid_response() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(
            200,
            json!({
                "code": 0,
                "message": "OK",
                "data": {
                    "list": [{
                        "metrics": {
                            "campaign_name": "spring",
                            "spend": "1.00",
                            "impressions": "10",
                            "clicks": "1",
                            "conversion": "1",
                            "cost_per_conversion": "1.00",
                            "conversion_rate": "-",
                            "ctr": "10.00",
                            "cpm": "100.00",
                            "cpc": "1.00",
                            "reach": "10"
                        },
                        "dimensions": {"campaign_id": "c1", "stat_time_day": "2024-01-01 00:00:00"}
                    }],
                    "page_info": {"page": 1, "total_page": 1}
                }
            }),
        );
        let api = TikTokApi::new(transport, "token".to_string(), false);

        let err = fetch_tiktok_insights(&api, "adv1", ResourceType::Campaign, &range())
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::InvalidResponse(message) if message.contains("conversion_rate")));
    }

    #[tokio::test]
    async fn creative_level_insights_are_rejected_before_any_request() {
        let transport = Arc::new(ScriptedTransport::new());
        let api = TikTokApi::new(transport.clone(), "token".to_string(), false);

        let err = fetch_tiktok_insights(&api, "adv1", ResourceType::AdCreative, &range())
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::InvalidInput(_)));
        assert!(transport.requests().is_empty());
    }
}
