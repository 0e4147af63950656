mod client;
pub mod schemas;

pub use client::FacebookClient;

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::debug;

use crate::constants::{FACEBOOK_API_VERSION, FACEBOOK_BASE_URL, FACEBOOK_PAGE_LIMIT, VALID_STATUS_CODES};
use crate::error::GatewayError;
use crate::models::{DateRange, TimeIncrement};
use crate::transport::{HttpMethod, HttpRequest, HttpTransport};

/// Graph API gateway. Every call carries the access token and page limit.
pub struct FacebookApi {
    transport: Arc<dyn HttpTransport>,
    access_token: String,
    base_url: String,
}

impl FacebookApi {
    pub fn new(transport: Arc<dyn HttpTransport>, access_token: String) -> Self {
        Self {
            transport,
            access_token,
            base_url: format!("{}/{}", FACEBOOK_BASE_URL, FACEBOOK_API_VERSION),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub async fn get_accounts(&self) -> Result<Vec<Value>, GatewayError> {
        self.get_paginated("me/adaccounts", Vec::new()).await
    }

    pub async fn get_resource_details(&self, resource_id: &str, fields: &str) -> Result<Value, GatewayError> {
        self.request(HttpMethod::Get, resource_id, vec![("fields".to_string(), fields.to_string())])
            .await
    }

    pub async fn create_insights_report(
        &self,
        ad_account: &str,
        level: &str,
        fields: &str,
        time_increment: TimeIncrement,
        range: &DateRange,
    ) -> Result<Value, GatewayError> {
        let time_range = json!({ "since": range.since(), "until": range.until() });
        let params = vec![
            ("level".to_string(), level.to_string()),
            ("fields".to_string(), fields.to_string()),
            ("time_increment".to_string(), time_increment.days().to_string()),
            ("time_range".to_string(), time_range.to_string()),
        ];

        self.request(HttpMethod::Post, &format!("{}/insights", ad_account), params)
            .await
    }

    pub async fn get_insights_report_status(&self, report_id: &str) -> Result<Value, GatewayError> {
        self.request(HttpMethod::Get, report_id, Vec::new()).await
    }

    pub async fn get_insights_report_results(&self, report_id: &str) -> Result<Vec<Value>, GatewayError> {
        self.get_paginated(&format!("{}/insights", report_id), Vec::new())
            .await
    }

    pub async fn get_account_campaigns(&self, ad_account: &str, fields: &str) -> Result<Vec<Value>, GatewayError> {
        self.get_account_edge(ad_account, "campaigns", fields).await
    }

    pub async fn get_account_adsets(&self, ad_account: &str, fields: &str) -> Result<Vec<Value>, GatewayError> {
        self.get_account_edge(ad_account, "adsets", fields).await
    }

    pub async fn get_account_ads(&self, ad_account: &str, fields: &str) -> Result<Vec<Value>, GatewayError> {
        self.get_account_edge(ad_account, "ads", fields).await
    }

    pub async fn get_account_adcreatives(&self, ad_account: &str, fields: &str) -> Result<Vec<Value>, GatewayError> {
        self.get_account_edge(ad_account, "adcreatives", fields).await
    }

    pub async fn create_campaign(
        &self,
        ad_account: &str,
        params: Vec<(String, String)>,
    ) -> Result<Value, GatewayError> {
        self.create_on_edge(ad_account, "campaigns", params).await
    }

    pub async fn create_adset(&self, ad_account: &str, params: Vec<(String, String)>) -> Result<Value, GatewayError> {
        self.create_on_edge(ad_account, "adsets", params).await
    }

    pub async fn create_adcreative(
        &self,
        ad_account: &str,
        params: Vec<(String, String)>,
    ) -> Result<Value, GatewayError> {
        self.create_on_edge(ad_account, "adcreatives", params).await
    }

    pub async fn create_ad(&self, ad_account: &str, params: Vec<(String, String)>) -> Result<Value, GatewayError> {
        self.create_on_edge(ad_account, "ads", params).await
    }

    /// Campaigns, ad sets, creatives and ads are all updated by posting to their id.
    pub async fn update_resource(
        &self,
        resource_id: &str,
        params: Vec<(String, String)>,
    ) -> Result<Value, GatewayError> {
        self.request(HttpMethod::Post, resource_id, params).await
    }

    async fn get_account_edge(&self, ad_account: &str, edge: &str, fields: &str) -> Result<Vec<Value>, GatewayError> {
        self.get_paginated(
            &format!("{}/{}", ad_account, edge),
            vec![("fields".to_string(), fields.to_string())],
        )
        .await
    }

    async fn create_on_edge(
        &self,
        ad_account: &str,
        edge: &str,
        params: Vec<(String, String)>,
    ) -> Result<Value, GatewayError> {
        self.request(HttpMethod::Post, &format!("{}/{}", ad_account, edge), params)
            .await
    }

    /// Follows `paging.cursors.after` until it disappears or a page comes back empty.
    async fn get_paginated(
        &self,
        endpoint: &str,
        mut params: Vec<(String, String)>,
    ) -> Result<Vec<Value>, GatewayError> {
        let mut all_data = Vec::new();

        loop {
            let page = self.request(HttpMethod::Get, endpoint, params.clone()).await?;
            let data = match page.get("data") {
                None | Some(Value::Null) => Vec::new(),
                Some(Value::Array(items)) => items.clone(),
                Some(other) => {
                    return Err(GatewayError::InvalidEnvelope(format!(
                        "expected `data` to be a list, found {}",
                        other
                    )))
                }
            };
            let page_was_empty = data.is_empty();
            all_data.extend(data);

            let after = page
                .pointer("/paging/cursors/after")
                .and_then(Value::as_str)
                .filter(|cursor| !cursor.is_empty());

            match after {
                Some(cursor) if !page_was_empty => {
                    debug!(endpoint, fetched = all_data.len(), "Fetching next page");
                    params.retain(|(key, _)| key != "after");
                    params.push(("after".to_string(), cursor.to_string()));
                }
                _ => break,
            }
        }

        Ok(all_data)
    }

    async fn request(
        &self,
        method: HttpMethod,
        endpoint: &str,
        params: Vec<(String, String)>,
    ) -> Result<Value, GatewayError> {
        let mut request = HttpRequest::new(method, format!("{}/{}", self.base_url, endpoint));
        request.query = vec![
            ("access_token".to_string(), self.access_token.clone()),
            ("limit".to_string(), FACEBOOK_PAGE_LIMIT.to_string()),
        ];
        request.query.extend(params);

        let response = self.transport.execute(request).await?;
        if !VALID_STATUS_CODES.contains(&response.status) {
            return Err(GatewayError::BadResponseCode {
                status: response.status,
                body: response.body,
            });
        }

        serde_json::from_str(&response.body).map_err(|e| GatewayError::InvalidEnvelope(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::testing::ScriptedTransport;

    fn api(transport: Arc<ScriptedTransport>) -> FacebookApi {
        FacebookApi::new(transport, "token".to_string())
    }

    #[tokio::test]
    async fn pagination_collects_pages_in_order_until_cursor_is_absent() {
        let transport = Arc::new(ScriptedTransport::new());
        transport
            .push_json(200, json!({"data": [{"id": "1"}, {"id": "2"}], "paging": {"cursors": {"after": "c1"}}}))
            .push_json(200, json!({"data": [{"id": "3"}], "paging": {"cursors": {"after": "c2"}}}))
            .push_json(200, json!({"data": [{"id": "4"}], "paging": {"cursors": {}}}));

        let accounts = api(transport.clone()).get_accounts().await.unwrap();

        let ids: Vec<_> = accounts.iter().map(|a| a["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4"]);

        let requests = transport.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0].query_param("after"), None);
        assert_eq!(requests[1].query_param("after"), Some("c1"));
        assert_eq!(requests[2].query_param("after"), Some("c2"));
        assert_eq!(requests[0].query_param("limit"), Some("100"));
        assert_eq!(requests[0].query_param("access_token"), Some("token"));
    }

    #[tokio::test]
    async fn pagination_stops_on_empty_page_even_with_cursor() {
        let transport = Arc::new(ScriptedTransport::new());
        transport
            .push_json(200, json!({"data": [{"id": "1"}], "paging": {"cursors": {"after": "c1"}}}))
            .push_json(200, json!({"data": [], "paging": {"cursors": {"after": "c2"}}}));

        let rows = api(transport.clone())
            .get_account_campaigns("act_1", "id,name")
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(transport.requests().len(), 2);
        assert!(transport.requests()[0].url.ends_with("/v18.0/act_1/campaigns"));
    }

    #[tokio::test]
    async fn non_success_status_is_reported_with_code() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(400, json!({"error": {"message": "bad"}}));

        let err = api(transport).get_insights_report_status("r1").await.unwrap_err();

        assert_eq!(err.status_code(), Some(400));
    }

    #[tokio::test]
    async fn insights_report_is_created_with_time_range() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(200, json!({"report_run_id": "r1"}));
        let range = DateRange::new(
            chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            chrono::NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        )
        .unwrap();

        api(transport.clone())
            .create_insights_report("act_1", "campaign", "spend", TimeIncrement::Day, &range)
            .await
            .unwrap();

        let request = &transport.requests()[0];
        assert_eq!(request.method, HttpMethod::Post);
        assert!(request.url.ends_with("act_1/insights"));
        assert_eq!(request.query_param("time_increment"), Some("1"));
        assert_eq!(
            request.query_param("time_range"),
            Some(r#"{"since":"2024-01-01","until":"2024-01-31"}"#)
        );
    }
}
