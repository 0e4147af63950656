use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::schemas::{
    AdAccountPayload, AdCreativeParams, AdCreativePayload, AdParams, AdPayload, AdSetParams, AdSetPayload,
    CampaignParams, CampaignPayload, CreatedPayload, UpdatedPayload,
};
use super::FacebookApi;
use crate::client::{require_id, AdsClient};
use crate::constants::{FB_ADCREATIVE_FIELDS, FB_ADSET_FIELDS, FB_AD_FIELDS, FB_CAMPAIGN_FIELDS, REPORT_POLL_INTERVAL};
use crate::error::ClientError;
use crate::insights;
use crate::models::{
    AdAccount, AdCreativeDetails, AdDetails, AdSetDetails, CampaignDetails, DateRange, Platform,
    ResourceInsightsReport, ResourceType,
};
use crate::validation::{to_query_params, validate, validate_batch};

const PLATFORM: Platform = Platform::Facebook;

pub struct FacebookClient {
    api: FacebookApi,
    poll_interval: Duration,
}

impl FacebookClient {
    pub fn new(api: FacebookApi) -> Self {
        Self {
            api,
            poll_interval: REPORT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

/// Validates caller input against a request schema and encodes it as query parameters.
fn request_params<T>(details: &Value, what: &str) -> Result<Vec<(String, String)>, ClientError>
where
    T: DeserializeOwned + Serialize,
{
    let context = || format!("{} (platform={}, details={})", what, PLATFORM, details);
    let params: T = validate(details).map_err(|e| ClientError::invalid_input(context(), e))?;
    to_query_params(&params).map_err(|e| ClientError::invalid_input(context(), e))
}

fn update_params(details: &Value, what: &str) -> Result<Vec<(String, String)>, ClientError> {
    to_query_params(details).map_err(|e| {
        ClientError::invalid_input(format!("{} (platform={}, details={})", what, PLATFORM, details), e)
    })
}

fn details_fields(fields: &[&str]) -> String {
    fields.join(",")
}

fn created_id(response: &Value, what: &str) -> Result<String, ClientError> {
    validate::<CreatedPayload>(response)
        .map(|created| created.id)
        .map_err(|e| {
            ClientError::invalid_response(
                format!("Created {} data (platform={}, response_data={})", what, PLATFORM, response),
                e,
            )
        })
}

fn update_succeeded(response: &Value, what: &str) -> Result<bool, ClientError> {
    validate::<UpdatedPayload>(response)
        .map(|updated| updated.success)
        .map_err(|e| {
            ClientError::invalid_response(
                format!("Updated {} data (platform={}, response_data={})", what, PLATFORM, response),
                e,
            )
        })
}

fn validated_list<T: DeserializeOwned>(
    response: &[Value],
    what: &str,
    ad_account_id: &str,
) -> Result<Vec<T>, ClientError> {
    validate_batch(response).map_err(|e| {
        ClientError::invalid_response(
            format!("{} data fetched (platform={}, ad_account_id={})", what, PLATFORM, ad_account_id),
            e,
        )
    })
}

fn creative_details(payload: AdCreativePayload) -> AdCreativeDetails {
    AdCreativeDetails {
        account_id: payload.account_id,
        creative_id: payload.id,
        creative_name: payload.name,
        title: payload.title,
        body: payload.body,
        image_url: payload.image_url,
    }
}

#[async_trait]
impl AdsClient for FacebookClient {
    fn platform(&self) -> Platform {
        PLATFORM
    }

    async fn get_account_ids(&self) -> Result<Vec<AdAccount>, ClientError> {
        let response = self.api.get_accounts().await.map_err(|e| {
            ClientError::provider(format!("Unable to fetch account ids (platform={})", PLATFORM), e)
        })?;

        let accounts: Vec<AdAccountPayload> = validate_batch(&response).map_err(|e| {
            ClientError::invalid_response(format!("Account data fetched (platform={})", PLATFORM), e)
        })?;

        Ok(accounts
            .into_iter()
            .map(|account| AdAccount {
                id_token: Some(account.account_id),
                account_id: account.id,
                account_name: None,
            })
            .collect())
    }

    async fn get_account_campaigns_details(&self, ad_account_id: &str) -> Result<Vec<CampaignDetails>, ClientError> {
        require_id(PLATFORM, "ad_account_id", ad_account_id)?;
        let response = self
            .api
            .get_account_campaigns(ad_account_id, &details_fields(FB_CAMPAIGN_FIELDS))
            .await
            .map_err(|e| {
                ClientError::provider(
                    format!(
                        "Unable to fetch campaign details (platform={}, ad_account_id={}) through provider",
                        PLATFORM, ad_account_id
                    ),
                    e,
                )
            })?;

        let campaigns: Vec<CampaignPayload> = validated_list(&response, "Campaign details", ad_account_id)?;
        Ok(campaigns
            .into_iter()
            .map(|campaign| CampaignDetails {
                account_id: campaign.account_id,
                campaign_id: campaign.id,
                campaign_name: campaign.name,
                effective_status: campaign.effective_status,
                configured_status: Some(campaign.configured_status),
                created_time: campaign.created_time,
                updated_time: campaign.updated_time,
            })
            .collect())
    }

    async fn get_account_adsets_details(&self, ad_account_id: &str) -> Result<Vec<AdSetDetails>, ClientError> {
        require_id(PLATFORM, "ad_account_id", ad_account_id)?;
        let response = self
            .api
            .get_account_adsets(ad_account_id, &details_fields(FB_ADSET_FIELDS))
            .await
            .map_err(|e| {
                ClientError::provider(
                    format!(
                        "Unable to fetch adset details (platform={}, ad_account_id={}) through provider",
                        PLATFORM, ad_account_id
                    ),
                    e,
                )
            })?;

        let adsets: Vec<AdSetPayload> = validated_list(&response, "Adset details", ad_account_id)?;
        Ok(adsets
            .into_iter()
            .map(|adset| AdSetDetails {
                account_id: adset.account_id,
                campaign_id: adset.campaign_id,
                adset_id: adset.id,
                adset_name: adset.name,
                effective_status: adset.effective_status,
                configured_status: Some(adset.configured_status),
                created_time: adset.created_time,
                updated_time: adset.updated_time,
            })
            .collect())
    }

    async fn get_account_ads_details(&self, ad_account_id: &str) -> Result<Vec<AdDetails>, ClientError> {
        require_id(PLATFORM, "ad_account_id", ad_account_id)?;
        let response = self
            .api
            .get_account_ads(ad_account_id, &details_fields(FB_AD_FIELDS))
            .await
            .map_err(|e| {
                ClientError::provider(
                    format!(
                        "Unable to fetch ad details (platform={}, ad_account_id={}) through provider",
                        PLATFORM, ad_account_id
                    ),
                    e,
                )
            })?;

        let ads: Vec<AdPayload> = validated_list(&response, "Ad details", ad_account_id)?;
        Ok(ads
            .into_iter()
            .map(|ad| AdDetails {
                account_id: ad.account_id,
                campaign_id: ad.campaign_id,
                adset_id: ad.adset_id,
                ad_id: ad.id,
                ad_name: ad.name,
                effective_status: ad.effective_status,
                configured_status: Some(ad.configured_status),
                created_time: ad.created_time,
                updated_time: ad.updated_time,
            })
            .collect())
    }

    async fn get_account_ad_creatives(&self, ad_account_id: &str) -> Result<Vec<AdCreativeDetails>, ClientError> {
        require_id(PLATFORM, "ad_account_id", ad_account_id)?;
        let response = self
            .api
            .get_account_adcreatives(ad_account_id, &details_fields(FB_ADCREATIVE_FIELDS))
            .await
            .map_err(|e| {
                ClientError::provider(
                    format!(
                        "Unable to fetch ad creative details (platform={}, ad_account_id={}) through provider",
                        PLATFORM, ad_account_id
                    ),
                    e,
                )
            })?;

        let creatives: Vec<AdCreativePayload> = validated_list(&response, "Ad creatives", ad_account_id)?;
        Ok(creatives.into_iter().map(creative_details).collect())
    }

    async fn get_ad_creative(&self, ad_creative_id: &str) -> Result<AdCreativeDetails, ClientError> {
        require_id(PLATFORM, "ad_creative_id", ad_creative_id)?;
        let response = self
            .api
            .get_resource_details(ad_creative_id, &details_fields(FB_ADCREATIVE_FIELDS))
            .await
            .map_err(|e| {
                ClientError::provider(
                    format!(
                        "Unable to fetch ad creative details (platform={}, ad_creative_id={}) through provider",
                        PLATFORM, ad_creative_id
                    ),
                    e,
                )
            })?;

        let creative: AdCreativePayload = validate(&response).map_err(|e| {
            ClientError::invalid_response(
                format!(
                    "Ad creative data (platform={}, ad_creative_id={}, response_data={})",
                    PLATFORM, ad_creative_id, response
                ),
                e,
            )
        })?;
        Ok(creative_details(creative))
    }

    async fn get_insights(
        &self,
        ad_account_id: &str,
        resource_type: ResourceType,
        range: &DateRange,
    ) -> Result<Vec<ResourceInsightsReport>, ClientError> {
        insights::fetch_facebook_insights(&self.api, self.poll_interval, ad_account_id, resource_type, range).await
    }

    async fn create_campaign(&self, ad_account_id: &str, campaign_details: Value) -> Result<String, ClientError> {
        require_id(PLATFORM, "ad_account_id", ad_account_id)?;
        let params = request_params::<CampaignParams>(&campaign_details, "campaign details")?;
        let response = self.api.create_campaign(ad_account_id, params).await.map_err(|e| {
            ClientError::provider(
                format!(
                    "Unable to create campaign (platform={}, ad_account_id={}, campaign_details={})",
                    PLATFORM, ad_account_id, campaign_details
                ),
                e,
            )
        })?;
        created_id(&response, "campaign")
    }

    async fn update_campaign(
        &self,
        _ad_account_id: &str,
        campaign_id: &str,
        campaign_details: Value,
    ) -> Result<bool, ClientError> {
        require_id(PLATFORM, "campaign_id", campaign_id)?;
        let params = update_params(&campaign_details, "campaign details")?;
        let response = self.api.update_resource(campaign_id, params).await.map_err(|e| {
            ClientError::provider(
                format!(
                    "Unable to update campaign (platform={}, campaign_id={}, campaign_details={})",
                    PLATFORM, campaign_id, campaign_details
                ),
                e,
            )
        })?;
        update_succeeded(&response, "campaign")
    }

    async fn create_adset(&self, ad_account_id: &str, adset_details: Value) -> Result<String, ClientError> {
        require_id(PLATFORM, "ad_account_id", ad_account_id)?;
        let params = request_params::<AdSetParams>(&adset_details, "adset details")?;
        let response = self.api.create_adset(ad_account_id, params).await.map_err(|e| {
            ClientError::provider(
                format!(
                    "Unable to create adset (platform={}, ad_account_id={}, adset_details={})",
                    PLATFORM, ad_account_id, adset_details
                ),
                e,
            )
        })?;
        created_id(&response, "adset")
    }

    async fn update_adset(
        &self,
        _ad_account_id: &str,
        adset_id: &str,
        adset_details: Value,
    ) -> Result<bool, ClientError> {
        require_id(PLATFORM, "adset_id", adset_id)?;
        let params = update_params(&adset_details, "adset details")?;
        let response = self.api.update_resource(adset_id, params).await.map_err(|e| {
            ClientError::provider(
                format!(
                    "Unable to update adset (platform={}, adset_id={}, adset_details={})",
                    PLATFORM, adset_id, adset_details
                ),
                e,
            )
        })?;
        update_succeeded(&response, "adset")
    }

    async fn create_adcreative(&self, ad_account_id: &str, adcreative_details: Value) -> Result<String, ClientError> {
        require_id(PLATFORM, "ad_account_id", ad_account_id)?;
        let params = request_params::<AdCreativeParams>(&adcreative_details, "adcreative details")?;
        let response = self.api.create_adcreative(ad_account_id, params).await.map_err(|e| {
            ClientError::provider(
                format!(
                    "Unable to create adcreative (platform={}, ad_account_id={}, adcreative_details={})",
                    PLATFORM, ad_account_id, adcreative_details
                ),
                e,
            )
        })?;
        created_id(&response, "adcreative")
    }

    async fn update_adcreative(&self, adcreative_id: &str, adcreative_details: Value) -> Result<bool, ClientError> {
        require_id(PLATFORM, "adcreative_id", adcreative_id)?;
        let params = update_params(&adcreative_details, "adcreative details")?;
        let response = self.api.update_resource(adcreative_id, params).await.map_err(|e| {
            ClientError::provider(
                format!(
                    "Unable to update adcreative (platform={}, adcreative_id={}, adcreative_details={})",
                    PLATFORM, adcreative_id, adcreative_details
                ),
                e,
            )
        })?;
        update_succeeded(&response, "adcreative")
    }

    async fn create_ad(&self, ad_account_id: &str, ad_details: Value) -> Result<String, ClientError> {
        require_id(PLATFORM, "ad_account_id", ad_account_id)?;
        let params = request_params::<AdParams>(&ad_details, "ad details")?;
        let response = self.api.create_ad(ad_account_id, params).await.map_err(|e| {
            ClientError::provider(
                format!(
                    "Unable to create ad (platform={}, ad_account_id={}, ad_details={})",
                    PLATFORM, ad_account_id, ad_details
                ),
                e,
            )
        })?;
        created_id(&response, "ad")
    }

    /// Facebook has no batch endpoint; each ad in the list is created in turn.
    async fn create_ads(&self, ad_account_id: &str, ads_details: Value) -> Result<Vec<String>, ClientError> {
        require_id(PLATFORM, "ad_account_id", ad_account_id)?;
        let Value::Array(ads) = ads_details else {
            return Err(ClientError::InvalidInput(format!(
                "Ads details must be a list (platform={}, ads_details={})",
                PLATFORM, ads_details
            )));
        };

        let mut created_ids = Vec::with_capacity(ads.len());
        for ad_details in ads {
            created_ids.push(self.create_ad(ad_account_id, ad_details).await?);
        }
        Ok(created_ids)
    }

    async fn update_ad(&self, ad_id: &str, ad_details: Value) -> Result<bool, ClientError> {
        require_id(PLATFORM, "ad_id", ad_id)?;
        let params = update_params(&ad_details, "ad details")?;
        let response = self.api.update_resource(ad_id, params).await.map_err(|e| {
            ClientError::provider(
                format!(
                    "Unable to update ad (platform={}, ad_id={}, ad_details={})",
                    PLATFORM, ad_id, ad_details
                ),
                e,
            )
        })?;
        update_succeeded(&response, "ad")
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::transport::testing::ScriptedTransport;
    use crate::transport::HttpMethod;

    fn client(transport: Arc<ScriptedTransport>) -> FacebookClient {
        FacebookClient::new(FacebookApi::new(transport, "token".to_string())).with_poll_interval(Duration::ZERO)
    }

    #[tokio::test]
    async fn account_ids_swap_numeric_and_prefixed_ids() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(200, json!({"data": [{"id": "act_42", "account_id": "42"}]}));

        let accounts = client(transport).get_account_ids().await.unwrap();

        assert_eq!(
            accounts,
            vec![AdAccount {
                id_token: Some("42".to_string()),
                account_id: "act_42".to_string(),
                account_name: None,
            }]
        );
    }

    #[tokio::test]
    async fn ad_details_carry_the_adset_id() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(
            200,
            json!({"data": [{
                "account_id": "42",
                "campaign_id": "c1",
                "adset_id": "s1",
                "id": "a1",
                "name": "ad",
                "effective_status": "ACTIVE",
                "configured_status": "PAUSED",
                "created_time": "2024-01-01T00:00:00+0000",
                "updated_time": "2024-01-02T00:00:00+0000"
            }]}),
        );

        let ads = client(transport.clone()).get_account_ads_details("act_42").await.unwrap();

        assert_eq!(ads[0].adset_id, "s1");
        assert_eq!(ads[0].ad_id, "a1");
        assert_eq!(ads[0].configured_status.as_deref(), Some("PAUSED"));
        assert!(transport.requests()[0]
            .query_param("fields")
            .unwrap()
            .contains("adset_id"));
    }

    #[tokio::test]
    async fn invalid_campaign_payload_is_rejected_before_any_request() {
        let transport = Arc::new(ScriptedTransport::new());

        let err = client(transport.clone())
            .create_campaign("act_1", json!({"name": "spring"}))
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::InvalidInput(_)));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn blank_identifiers_are_rejected_before_any_request() {
        let transport = Arc::new(ScriptedTransport::new());
        let client = client(transport.clone());
        let range = DateRange::new(
            chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
        )
        .unwrap();

        let insights = client.get_insights("", ResourceType::Campaign, &range).await.unwrap_err();
        let update = client.update_ad("", json!({"status": "PAUSED"})).await.unwrap_err();
        let creative = client.get_ad_creative(" ").await.unwrap_err();

        assert!(matches!(insights, ClientError::InvalidInput(message) if message.contains("ad_account_id")));
        assert!(matches!(update, ClientError::InvalidInput(message) if message.contains("ad_id")));
        assert!(matches!(creative, ClientError::InvalidInput(message) if message.contains("ad_creative_id")));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn create_adset_encodes_nested_params_as_json() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(200, json!({"id": "s9"}));

        let id = client(transport.clone())
            .create_adset(
                "act_1",
                json!({
                    "daily_budget": 1000,
                    "name": "set",
                    "campaign_id": "c1",
                    "bid_amount": 2,
                    "billing_event": "IMPRESSIONS",
                    "optimization_goal": "REACH",
                    "promoted_object": {"page_id": "p1"},
                    "targeting": {"geo_locations": {"countries": ["US"]}},
                    "status": "PAUSED"
                }),
            )
            .await
            .unwrap();

        assert_eq!(id, "s9");
        let request = &transport.requests()[0];
        assert_eq!(request.method, HttpMethod::Post);
        assert!(request.url.ends_with("act_1/adsets"));
        assert_eq!(
            request.query_param("targeting"),
            Some(r#"{"geo_locations":{"countries":["US"]}}"#)
        );
        assert_eq!(request.query_param("daily_budget"), Some("1000"));
    }

    #[tokio::test]
    async fn create_ads_creates_each_ad_in_order() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(200, json!({"id": "a1"})).push_json(200, json!({"id": "a2"}));
        let ad = |name: &str| {
            json!({"name": name, "adset_id": "s1", "creative": {"creative_id": "cr1"}, "status": "PAUSED"})
        };

        let ids = client(transport.clone())
            .create_ads("act_1", json!([ad("first"), ad("second")]))
            .await
            .unwrap();

        assert_eq!(ids, vec!["a1".to_string(), "a2".to_string()]);
        assert_eq!(transport.count_matching(HttpMethod::Post, "act_1/ads"), 2);
    }

    #[tokio::test]
    async fn update_ad_reports_provider_success_flag() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(200, json!({"success": true}));

        let updated = client(transport.clone())
            .update_ad("a1", json!({"status": "PAUSED"}))
            .await
            .unwrap();

        assert!(updated);
        assert_eq!(transport.requests()[0].query_param("status"), Some("PAUSED"));
    }

    #[tokio::test]
    async fn tiktok_only_operations_are_invalid_input() {
        let transport = Arc::new(ScriptedTransport::new());

        let err = client(transport)
            .update_image_name("act_1", "img", "name")
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::InvalidInput(message) if message.contains("FACEBOOK")));
    }
}
