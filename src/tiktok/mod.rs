mod client;
pub mod schemas;

pub use client::{TikTokClient, TikTokParams};

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::constants::{
    ACCEPT_HEADER, CONTENT_TYPE_HEADER, CONTENT_TYPE_JSON, TIKTOK_ACCESS_TOKEN_HEADER, TIKTOK_API_VERSION,
    TIKTOK_BASE_URL_PROD, TIKTOK_BASE_URL_SANDBOX, TIKTOK_PAGE_SIZE, TIKTOK_VALID_PAYLOAD_CODES, VALID_STATUS_CODES,
};
use crate::error::GatewayError;
use crate::models::DateRange;
use crate::transport::{HttpMethod, HttpRequest, HttpTransport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceType {
    Auction,
    Reservation,
}

impl ServiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Auction => "AUCTION",
            ServiceType::Reservation => "RESERVATION",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportType {
    Auction,
    Basic,
}

impl ReportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::Auction => "AUCTION",
            ReportType::Basic => "BASIC",
        }
    }
}

/// Everything the integrated report endpoint needs besides the advertiser.
#[derive(Debug, Clone)]
pub struct ReportQuery<'a> {
    pub service_type: ServiceType,
    pub report_type: ReportType,
    pub data_level: String,
    pub dimensions: &'a [&'a str],
    pub metrics: &'a [&'a str],
    pub range: DateRange,
}

/// Business API gateway. Each response envelope is `{code, message, data}`
/// and `code` is checked even when the HTTP status is 200.
pub struct TikTokApi {
    transport: Arc<dyn HttpTransport>,
    access_token: String,
    base_url: String,
}

impl TikTokApi {
    pub fn new(transport: Arc<dyn HttpTransport>, access_token: String, sandbox: bool) -> Self {
        let root = if sandbox {
            TIKTOK_BASE_URL_SANDBOX
        } else {
            TIKTOK_BASE_URL_PROD
        };
        Self {
            transport,
            access_token,
            base_url: format!("{}/{}", root, TIKTOK_API_VERSION),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get_ad_accounts(&self, app_id: &str, secret: &str) -> Result<Vec<Value>, GatewayError> {
        let data = self
            .request(
                HttpMethod::Get,
                "oauth2/advertiser/get/",
                vec![
                    ("app_id".to_string(), app_id.to_string()),
                    ("secret".to_string(), secret.to_string()),
                ],
                None,
            )
            .await?;
        take_list(data)
    }

    pub async fn get_advertiser_campaigns(
        &self,
        advertiser_id: &str,
        fields: &[&str],
    ) -> Result<Vec<Value>, GatewayError> {
        self.get_paginated("campaign/get/", fields_query(advertiser_id, fields)).await
    }

    pub async fn get_advertiser_adgroups(
        &self,
        advertiser_id: &str,
        fields: &[&str],
    ) -> Result<Vec<Value>, GatewayError> {
        self.get_paginated("adgroup/get/", fields_query(advertiser_id, fields)).await
    }

    pub async fn get_advertiser_ads(&self, advertiser_id: &str, fields: &[&str]) -> Result<Vec<Value>, GatewayError> {
        self.get_paginated("ad/get/", fields_query(advertiser_id, fields)).await
    }

    pub async fn create_ads(&self, body: Value) -> Result<Value, GatewayError> {
        self.post("ad/create/", body).await
    }

    pub async fn update_ads(&self, body: Value) -> Result<Value, GatewayError> {
        self.post("ad/update/", body).await
    }

    pub async fn update_ads_status(&self, body: Value) -> Result<Value, GatewayError> {
        self.post("ad/status/update/", body).await
    }

    pub async fn create_campaign(&self, body: Value) -> Result<Value, GatewayError> {
        self.post("campaign/create/", body).await
    }

    pub async fn update_campaign(&self, body: Value) -> Result<Value, GatewayError> {
        self.post("campaign/update/", body).await
    }

    pub async fn create_adgroup(&self, body: Value) -> Result<Value, GatewayError> {
        self.post("adgroup/create/", body).await
    }

    pub async fn update_adgroup(&self, body: Value) -> Result<Value, GatewayError> {
        self.post("adgroup/update/", body).await
    }

    pub async fn upload_image(&self, body: Value) -> Result<Value, GatewayError> {
        self.post("file/image/ad/upload/", body).await
    }

    pub async fn update_image_name(&self, body: Value) -> Result<Value, GatewayError> {
        self.post("file/image/ad/update/", body).await
    }

    pub async fn get_images_info(&self, query: Vec<(String, String)>) -> Result<Vec<Value>, GatewayError> {
        let data = self.request(HttpMethod::Get, "file/image/ad/info/", query, None).await?;
        take_list(data)
    }

    pub async fn upload_video(&self, body: Value) -> Result<Value, GatewayError> {
        self.post("file/video/ad/upload/", body).await
    }

    pub async fn update_video_name(&self, body: Value) -> Result<Value, GatewayError> {
        self.post("file/video/ad/update/", body).await
    }

    pub async fn get_videos_info(&self, query: Vec<(String, String)>) -> Result<Vec<Value>, GatewayError> {
        let data = self.request(HttpMethod::Get, "file/video/ad/info/", query, None).await?;
        take_list(data)
    }

    pub async fn get_insights_report(
        &self,
        advertiser_id: &str,
        query: &ReportQuery<'_>,
    ) -> Result<Vec<Value>, GatewayError> {
        let params = vec![
            ("advertiser_id".to_string(), advertiser_id.to_string()),
            ("service_type".to_string(), query.service_type.as_str().to_string()),
            ("report_type".to_string(), query.report_type.as_str().to_string()),
            ("data_level".to_string(), query.data_level.clone()),
            ("dimensions".to_string(), json_list(query.dimensions)),
            ("metrics".to_string(), json_list(query.metrics)),
            ("start_date".to_string(), query.range.since()),
            ("end_date".to_string(), query.range.until()),
        ];
        self.get_paginated("report/integrated/get/", params).await
    }

    async fn post(&self, endpoint: &str, body: Value) -> Result<Value, GatewayError> {
        self.request(HttpMethod::Post, endpoint, Vec::new(), Some(body)).await
    }

    /// Walks `page_info` until `page >= total_page`.
    async fn get_paginated(
        &self,
        endpoint: &str,
        mut params: Vec<(String, String)>,
    ) -> Result<Vec<Value>, GatewayError> {
        params.push(("page_size".to_string(), TIKTOK_PAGE_SIZE.to_string()));
        let mut all_data = Vec::new();

        loop {
            let mut data = self.request(HttpMethod::Get, endpoint, params.clone(), None).await?;
            let page = page_info_field(&data, "page")?;
            let total_page = page_info_field(&data, "total_page")?;

            match data.get_mut("list").map(Value::take) {
                None | Some(Value::Null) => {}
                Some(Value::Array(items)) => all_data.extend(items),
                Some(other) => {
                    return Err(GatewayError::InvalidEnvelope(format!(
                        "expected `list` to be a list, found {}",
                        other
                    )))
                }
            }

            if page >= total_page {
                break;
            }

            debug!(endpoint, page, total_page, "Fetching next page");
            params.retain(|(key, _)| key != "page");
            params.push(("page".to_string(), (page + 1).to_string()));
        }

        Ok(all_data)
    }

    async fn request(
        &self,
        method: HttpMethod,
        endpoint: &str,
        query: Vec<(String, String)>,
        body: Option<Value>,
    ) -> Result<Value, GatewayError> {
        let mut request = HttpRequest::new(method, format!("{}/{}", self.base_url, endpoint));
        request.query = query;
        request.body = body;
        request.headers = vec![
            (TIKTOK_ACCESS_TOKEN_HEADER.to_string(), self.access_token.clone()),
            (ACCEPT_HEADER.to_string(), CONTENT_TYPE_JSON.to_string()),
            (CONTENT_TYPE_HEADER.to_string(), CONTENT_TYPE_JSON.to_string()),
        ];

        let response = self.transport.execute(request).await?;
        if !VALID_STATUS_CODES.contains(&response.status) {
            return Err(GatewayError::BadResponseCode {
                status: response.status,
                body: response.body,
            });
        }

        let mut envelope: Value =
            serde_json::from_str(&response.body).map_err(|e| GatewayError::InvalidEnvelope(e.to_string()))?;
        let payload_code = envelope
            .get("code")
            .and_then(Value::as_i64)
            .ok_or_else(|| GatewayError::InvalidEnvelope("missing payload `code`".to_string()))?;

        if !TIKTOK_VALID_PAYLOAD_CODES.contains(&payload_code) {
            return Err(GatewayError::BadPayloadCode {
                status: response.status,
                payload_code,
                body: response.body,
            });
        }

        Ok(envelope.get_mut("data").map(Value::take).unwrap_or(Value::Null))
    }
}

fn fields_query(advertiser_id: &str, fields: &[&str]) -> Vec<(String, String)> {
    vec![
        ("advertiser_id".to_string(), advertiser_id.to_string()),
        ("fields".to_string(), json_list(fields)),
    ]
}

fn json_list(items: &[&str]) -> String {
    Value::from(items.to_vec()).to_string()
}

fn page_info_field(data: &Value, field: &str) -> Result<i64, GatewayError> {
    data.get("page_info")
        .and_then(|info| info.get(field))
        .and_then(Value::as_i64)
        .ok_or_else(|| GatewayError::InvalidEnvelope(format!("missing `page_info.{}`", field)))
}

fn take_list(mut data: Value) -> Result<Vec<Value>, GatewayError> {
    match data.get_mut("list").map(Value::take) {
        Some(Value::Array(items)) => Ok(items),
        _ => Err(GatewayError::InvalidEnvelope("missing `data.list`".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::testing::ScriptedTransport;
    use serde_json::json;

    fn api(transport: Arc<ScriptedTransport>) -> TikTokApi {
        TikTokApi::new(transport, "token".to_string(), false)
    }

    fn page(items: Value, page: i64, total_page: i64) -> Value {
        json!({
            "code": 0,
            "message": "OK",
            "data": {"list": items, "page_info": {"page": page, "total_page": total_page}}
        })
    }

    #[tokio::test]
    async fn ok_http_status_with_rejected_payload_code_is_an_error() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(200, json!({"code": 40001, "message": "No permission", "data": {}}));

        let err = api(transport).create_campaign(json!({})).await.unwrap_err();

        assert_eq!(err.status_code(), Some(200));
        assert_eq!(err.payload_code(), Some(40001));
    }

    #[tokio::test]
    async fn code_20001_is_accepted() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(200, json!({"code": 20001, "message": "partial", "data": {"campaign_id": "1"}}));

        let data = api(transport).create_campaign(json!({})).await.unwrap();

        assert_eq!(data["campaign_id"], "1");
    }

    #[tokio::test]
    async fn pagination_follows_page_counters() {
        let transport = Arc::new(ScriptedTransport::new());
        transport
            .push_json(200, page(json!([{"ad_id": "1"}]), 1, 3))
            .push_json(200, page(json!([{"ad_id": "2"}]), 2, 3))
            .push_json(200, page(json!([{"ad_id": "3"}]), 3, 3));

        let ads = api(transport.clone()).get_advertiser_ads("adv", &["ad_id"]).await.unwrap();

        assert_eq!(ads.len(), 3);
        let requests = transport.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0].query_param("page_size"), Some("1000"));
        assert_eq!(requests[0].query_param("page"), None);
        assert_eq!(requests[2].query_param("page"), Some("3"));
        assert_eq!(requests[0].query_param("fields"), Some(r#"["ad_id"]"#));
        assert!(requests[0]
            .headers
            .contains(&("Access-Token".to_string(), "token".to_string())));
    }

    #[tokio::test]
    async fn listing_without_page_info_is_an_invalid_envelope() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(200, json!({"code": 0, "message": "OK", "data": {"list": [{"ad_id": "1"}]}}));

        let err = api(transport).get_advertiser_ads("adv", &["ad_id"]).await.unwrap_err();

        assert!(matches!(err, GatewayError::InvalidEnvelope(message) if message.contains("page_info.page")));
    }

    #[tokio::test]
    async fn report_query_carries_service_and_report_type() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(200, page(json!([]), 1, 1));
        let range = DateRange::new(
            chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            chrono::NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
        )
        .unwrap();
        let query = ReportQuery {
            service_type: ServiceType::Reservation,
            report_type: ReportType::Auction,
            data_level: "RESERVATION_AD".to_string(),
            dimensions: &["ad_id"],
            metrics: &["spend"],
            range,
        };

        let rows = api(transport.clone()).get_insights_report("adv", &query).await.unwrap();

        assert!(rows.is_empty());
        let request = &transport.requests()[0];
        assert_eq!(request.query_param("service_type"), Some("RESERVATION"));
        assert_eq!(request.query_param("report_type"), Some("AUCTION"));
        assert_eq!(request.query_param("start_date"), Some("2024-03-01"));
        assert_eq!(request.query_param("dimensions"), Some(r#"["ad_id"]"#));
    }

    #[tokio::test]
    async fn sandbox_flag_selects_sandbox_host() {
        let transport = Arc::new(ScriptedTransport::new());
        let sandbox = TikTokApi::new(transport.clone(), "t".to_string(), true);
        let prod = TikTokApi::new(transport, "t".to_string(), false);

        assert!(sandbox.base_url().starts_with("https://sandbox-ads.tiktok.com"));
        assert!(prod.base_url().starts_with("https://business-api.tiktok.com"));
    }
}
