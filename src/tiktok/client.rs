use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use super::schemas::{
    AdCreate, AdGroupCreate, AdGroupPayload, AdGroupUpdate, AdIdsPayload, AdPayload, AdStatusUpdate, AdUpdate,
    AdvertiserPayload, CampaignCreate, CampaignPayload, CampaignUpdate, CreatedAdGroupPayload, CreatedCampaignPayload,
    CreatedImagePayload, CreatedVideoPayload, ImageCreate, ImageInfoParams, ImagePayload, ImageUpdate, VideoCreate,
    VideoInfoParams, VideoPayload, VideoUpdate,
};
use super::TikTokApi;
use crate::client::{require_id, AdsClient};
use crate::constants::{TT_ADGROUP_FIELDS, TT_AD_FIELDS, TT_CAMPAIGN_FIELDS};
use crate::error::{ClientError, GatewayError};
use crate::insights;
use crate::models::{
    AdAccount, AdDetails, AdSetDetails, CampaignDetails, DateRange, ImageDetails, Platform, ResourceInsightsReport,
    ResourceType, VideoDetails,
};
use crate::validation::{to_query_params, validate, validate_batch};

const PLATFORM: Platform = Platform::TikTok;

/// App credentials TikTok needs on top of the access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TikTokParams {
    pub app_id: String,
    pub secret: String,
    pub sandbox: bool,
}

impl TikTokParams {
    /// `app_id` and `secret` must be strings. `sandbox` may be omitted, but
    /// when present it must be a boolean.
    pub fn from_value(params: Option<&Value>) -> Result<Self, ClientError> {
        let params = params.and_then(Value::as_object).ok_or_else(|| {
            ClientError::InvalidInput(format!(
                "Parameters app_id and secret are required for platform {}",
                PLATFORM
            ))
        })?;

        let app_id = required_string(params, "app_id")?;
        let secret = required_string(params, "secret")?;
        let sandbox = match params.get("sandbox") {
            None | Some(Value::Null) => false,
            Some(Value::Bool(sandbox)) => *sandbox,
            Some(other) => {
                return Err(ClientError::InvalidInput(format!(
                    "sandbox must be a boolean value in params, found {}",
                    other
                )))
            }
        };

        Ok(Self { app_id, secret, sandbox })
    }
}

fn required_string(params: &Map<String, Value>, key: &str) -> Result<String, ClientError> {
    params
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ClientError::InvalidInput(format!("{} must exist and be a string in params", key)))
}

pub struct TikTokClient {
    api: TikTokApi,
    params: TikTokParams,
}

impl TikTokClient {
    pub fn new(api: TikTokApi, params: TikTokParams) -> Self {
        Self { api, params }
    }
}

/// Merges the identifiers the client owns into caller-supplied details.
fn with_ids(details: Value, ids: &[(&str, &str)]) -> Result<Value, ClientError> {
    let Value::Object(mut map) = details else {
        return Err(ClientError::InvalidInput(format!(
            "Details must be an object (platform={}, details={})",
            PLATFORM, details
        )));
    };
    for (key, value) in ids {
        require_id(PLATFORM, key, value)?;
        map.insert(key.to_string(), Value::String(value.to_string()));
    }
    Ok(Value::Object(map))
}

/// Validates a request against its schema and returns the JSON body to post.
fn request_body<T>(details: &Value, what: &str, advertiser_id: &str) -> Result<Value, ClientError>
where
    T: DeserializeOwned + Serialize,
{
    let context = || format!("{} (platform={}, advertiser_id={}, details={})", what, PLATFORM, advertiser_id, details);
    let request: T = validate(details).map_err(|e| ClientError::invalid_input(context(), e))?;
    serde_json::to_value(&request)
        .map_err(|e| ClientError::InvalidInput(format!("Failed to encode {}: {}", context(), e)))
}

fn response_as<T: DeserializeOwned>(response: &Value, what: &str, advertiser_id: &str) -> Result<T, ClientError> {
    validate(response).map_err(|e| {
        ClientError::invalid_response(
            format!(
                "{} data (platform={}, advertiser_id={}, response_data={})",
                what, PLATFORM, advertiser_id, response
            ),
            e,
        )
    })
}

fn validated_list<T: DeserializeOwned>(
    response: &[Value],
    what: &str,
    advertiser_id: &str,
) -> Result<Vec<T>, ClientError> {
    validate_batch(response).map_err(|e| {
        ClientError::invalid_response(
            format!("{} data (platform={}, advertiser_id={})", what, PLATFORM, advertiser_id),
            e,
        )
    })
}

fn provider_error(action: &str, advertiser_id: &str, details: &Value, e: GatewayError) -> ClientError {
    ClientError::provider(
        format!(
            "Unable to {} (platform={}, advertiser_id={}, details={})",
            action, PLATFORM, advertiser_id, details
        ),
        e,
    )
}

fn succeeded(response: &Value) -> bool {
    match response {
        Value::Null => false,
        Value::Object(map) => !map.is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => true,
    }
}

#[async_trait]
impl AdsClient for TikTokClient {
    fn platform(&self) -> Platform {
        PLATFORM
    }

    async fn get_account_ids(&self) -> Result<Vec<AdAccount>, ClientError> {
        let response = self
            .api
            .get_ad_accounts(&self.params.app_id, &self.params.secret)
            .await
            .map_err(|e| {
                ClientError::provider(
                    format!(
                        "Unable to fetch account ids (platform={}, app_id={})",
                        PLATFORM, self.params.app_id
                    ),
                    e,
                )
            })?;

        let advertisers: Vec<AdvertiserPayload> = validate_batch(&response).map_err(|e| {
            ClientError::invalid_response(
                format!("Account data fetched (platform={}, app_id={})", PLATFORM, self.params.app_id),
                e,
            )
        })?;

        Ok(advertisers
            .into_iter()
            .map(|advertiser| AdAccount {
                id_token: None,
                account_id: advertiser.advertiser_id,
                account_name: Some(advertiser.advertiser_name),
            })
            .collect())
    }

    async fn get_account_campaigns_details(&self, ad_account_id: &str) -> Result<Vec<CampaignDetails>, ClientError> {
        require_id(PLATFORM, "advertiser_id", ad_account_id)?;
        let response = self
            .api
            .get_advertiser_campaigns(ad_account_id, TT_CAMPAIGN_FIELDS)
            .await
            .map_err(|e| {
                ClientError::provider(
                    format!(
                        "Unable to fetch campaign details (platform={}, advertiser_id={}) through provider",
                        PLATFORM, ad_account_id
                    ),
                    e,
                )
            })?;

        let campaigns: Vec<CampaignPayload> = validated_list(&response, "Campaign details", ad_account_id)?;
        Ok(campaigns
            .into_iter()
            .map(|campaign| CampaignDetails {
                account_id: campaign.advertiser_id,
                campaign_id: campaign.campaign_id,
                campaign_name: campaign.campaign_name,
                effective_status: campaign.operation_status,
                configured_status: campaign.secondary_status,
                created_time: campaign.create_time,
                updated_time: campaign.modify_time,
            })
            .collect())
    }

    async fn get_account_adsets_details(&self, ad_account_id: &str) -> Result<Vec<AdSetDetails>, ClientError> {
        require_id(PLATFORM, "advertiser_id", ad_account_id)?;
        let response = self
            .api
            .get_advertiser_adgroups(ad_account_id, TT_ADGROUP_FIELDS)
            .await
            .map_err(|e| {
                ClientError::provider(
                    format!(
                        "Unable to fetch adgroup details (platform={}, advertiser_id={}) through provider",
                        PLATFORM, ad_account_id
                    ),
                    e,
                )
            })?;

        let adgroups: Vec<AdGroupPayload> = validated_list(&response, "Adgroup details", ad_account_id)?;
        Ok(adgroups
            .into_iter()
            .map(|adgroup| AdSetDetails {
                account_id: adgroup.advertiser_id,
                campaign_id: adgroup.campaign_id,
                adset_id: adgroup.adgroup_id,
                adset_name: adgroup.adgroup_name,
                effective_status: adgroup.operation_status,
                configured_status: adgroup.secondary_status,
                created_time: adgroup.create_time,
                updated_time: adgroup.modify_time,
            })
            .collect())
    }

    async fn get_account_ads_details(&self, ad_account_id: &str) -> Result<Vec<AdDetails>, ClientError> {
        require_id(PLATFORM, "advertiser_id", ad_account_id)?;
        let response = self
            .api
            .get_advertiser_ads(ad_account_id, TT_AD_FIELDS)
            .await
            .map_err(|e| {
                ClientError::provider(
                    format!(
                        "Unable to fetch ad details (platform={}, advertiser_id={}) through provider",
                        PLATFORM, ad_account_id
                    ),
                    e,
                )
            })?;

        let ads: Vec<AdPayload> = validated_list(&response, "Ad details", ad_account_id)?;
        Ok(ads
            .into_iter()
            .map(|ad| AdDetails {
                account_id: ad.advertiser_id,
                campaign_id: ad.campaign_id,
                adset_id: ad.adgroup_id,
                ad_id: ad.ad_id,
                ad_name: ad.ad_name,
                effective_status: ad.operation_status,
                configured_status: ad.secondary_status,
                created_time: ad.create_time,
                updated_time: ad.modify_time,
            })
            .collect())
    }

    async fn get_insights(
        &self,
        ad_account_id: &str,
        resource_type: ResourceType,
        range: &DateRange,
    ) -> Result<Vec<ResourceInsightsReport>, ClientError> {
        insights::fetch_tiktok_insights(&self.api, ad_account_id, resource_type, range).await
    }

    async fn create_campaign(&self, ad_account_id: &str, campaign_details: Value) -> Result<String, ClientError> {
        let details = with_ids(campaign_details, &[("advertiser_id", ad_account_id)])?;
        let body = request_body::<CampaignCreate>(&details, "campaign details", ad_account_id)?;
        let response = self
            .api
            .create_campaign(body)
            .await
            .map_err(|e| provider_error("create campaign", ad_account_id, &details, e))?;

        let created: CreatedCampaignPayload = response_as(&response, "Created campaign", ad_account_id)?;
        Ok(created.campaign_id)
    }

    async fn update_campaign(
        &self,
        ad_account_id: &str,
        campaign_id: &str,
        campaign_details: Value,
    ) -> Result<bool, ClientError> {
        let details = with_ids(
            campaign_details,
            &[("advertiser_id", ad_account_id), ("campaign_id", campaign_id)],
        )?;
        let body = request_body::<CampaignUpdate>(&details, "campaign details", ad_account_id)?;
        let response = self
            .api
            .update_campaign(body)
            .await
            .map_err(|e| provider_error("update campaign", ad_account_id, &details, e))?;
        Ok(succeeded(&response))
    }

    async fn create_adset(&self, ad_account_id: &str, adset_details: Value) -> Result<String, ClientError> {
        let details = with_ids(adset_details, &[("advertiser_id", ad_account_id)])?;
        let body = request_body::<AdGroupCreate>(&details, "adgroup details", ad_account_id)?;
        let response = self
            .api
            .create_adgroup(body)
            .await
            .map_err(|e| provider_error("create adgroup", ad_account_id, &details, e))?;

        let created: CreatedAdGroupPayload = response_as(&response, "Created adgroup", ad_account_id)?;
        Ok(created.adgroup_id)
    }

    async fn update_adset(
        &self,
        ad_account_id: &str,
        adset_id: &str,
        adset_details: Value,
    ) -> Result<bool, ClientError> {
        let details = with_ids(adset_details, &[("advertiser_id", ad_account_id), ("adgroup_id", adset_id)])?;
        let body = request_body::<AdGroupUpdate>(&details, "adgroup details", ad_account_id)?;
        let response = self
            .api
            .update_adgroup(body)
            .await
            .map_err(|e| provider_error("update adgroup", ad_account_id, &details, e))?;
        Ok(succeeded(&response))
    }

    async fn create_ads(&self, ad_account_id: &str, ads_details: Value) -> Result<Vec<String>, ClientError> {
        let mut details = with_ids(ads_details, &[("advertiser_id", ad_account_id)])?;
        if let Some(map) = details.as_object_mut() {
            if let Some(adset_id) = map.remove("adset_id") {
                map.insert("adgroup_id".to_string(), adset_id);
            }
        }

        let body = request_body::<AdCreate>(&details, "ad details", ad_account_id)?;
        let response = self
            .api
            .create_ads(body)
            .await
            .map_err(|e| provider_error("create ads", ad_account_id, &details, e))?;

        let created: AdIdsPayload = response_as(&response, "Created ads", ad_account_id)?;
        Ok(created.ad_ids)
    }

    async fn update_ads(&self, ad_account_id: &str, adgroup_id: &str, ad_details: Value) -> Result<bool, ClientError> {
        let details = with_ids(ad_details, &[("advertiser_id", ad_account_id), ("adgroup_id", adgroup_id)])?;
        let body = request_body::<AdUpdate>(&details, "ad details", ad_account_id)?;
        let response = self
            .api
            .update_ads(body)
            .await
            .map_err(|e| provider_error("update ads", ad_account_id, &details, e))?;
        Ok(succeeded(&response))
    }

    async fn update_ads_status(&self, ad_account_id: &str, ads_status_details: Value) -> Result<bool, ClientError> {
        let details = with_ids(ads_status_details, &[("advertiser_id", ad_account_id)])?;
        let body = request_body::<AdStatusUpdate>(&details, "ads status details", ad_account_id)?;
        let response = self
            .api
            .update_ads_status(body)
            .await
            .map_err(|e| provider_error("update ads status", ad_account_id, &details, e))?;

        let updated: AdIdsPayload = response_as(&response, "Updated ads status", ad_account_id)?;
        Ok(!updated.ad_ids.is_empty())
    }

    async fn create_image(&self, ad_account_id: &str, image_details: Value) -> Result<String, ClientError> {
        let details = with_ids(image_details, &[("advertiser_id", ad_account_id)])?;
        let body = request_body::<ImageCreate>(&details, "image details", ad_account_id)?;
        let response = self
            .api
            .upload_image(body)
            .await
            .map_err(|e| provider_error("create image", ad_account_id, &details, e))?;

        let created: CreatedImagePayload = response_as(&response, "Created image", ad_account_id)?;
        Ok(created.image_id)
    }

    async fn update_image_name(
        &self,
        ad_account_id: &str,
        image_id: &str,
        image_name: &str,
    ) -> Result<bool, ClientError> {
        require_id(PLATFORM, "advertiser_id", ad_account_id)?;
        require_id(PLATFORM, "image_id", image_id)?;
        let details = serde_json::json!({
            "advertiser_id": ad_account_id,
            "image_id": image_id,
            "file_name": image_name,
        });
        let body = request_body::<ImageUpdate>(&details, "image details", ad_account_id)?;
        let response = self
            .api
            .update_image_name(body)
            .await
            .map_err(|e| provider_error("update image name", ad_account_id, &details, e))?;
        Ok(succeeded(&response))
    }

    async fn get_images_info(
        &self,
        ad_account_id: &str,
        image_ids: &[String],
    ) -> Result<Vec<ImageDetails>, ClientError> {
        require_id(PLATFORM, "advertiser_id", ad_account_id)?;
        let params = ImageInfoParams {
            advertiser_id: ad_account_id.to_string(),
            image_ids: image_ids.to_vec(),
        };
        let query = to_query_params(&params).map_err(|e| ClientError::invalid_input("image info params", e))?;
        let response = self.api.get_images_info(query).await.map_err(|e| {
            ClientError::provider(
                format!(
                    "Unable to get image details (platform={}, advertiser_id={}, image_ids={:?})",
                    PLATFORM, ad_account_id, image_ids
                ),
                e,
            )
        })?;

        let images: Vec<ImagePayload> = validated_list(&response, "Image details", ad_account_id)?;
        Ok(images
            .into_iter()
            .map(|image| ImageDetails {
                image_id: image.image_id,
                material_id: image.material_id,
                size: image.size,
                width: image.width,
                height: image.height,
                format: image.format,
                image_url: image.image_url,
                signature: image.signature,
                file_name: image.file_name,
                create_time: image.create_time,
                modify_time: image.modify_time,
                displayable: image.displayable,
            })
            .collect())
    }

    async fn create_video(&self, ad_account_id: &str, video_details: Value) -> Result<String, ClientError> {
        let details = with_ids(video_details, &[("advertiser_id", ad_account_id)])?;
        let body = request_body::<VideoCreate>(&details, "video details", ad_account_id)?;
        let response = self
            .api
            .upload_video(body)
            .await
            .map_err(|e| provider_error("create video", ad_account_id, &details, e))?;

        // Uploads answer with a list holding the single created video.
        let created = match &response {
            Value::Array(items) => items.first().cloned().unwrap_or(Value::Null),
            other => other.clone(),
        };
        let created: CreatedVideoPayload = response_as(&created, "Created video", ad_account_id)?;
        Ok(created.video_id)
    }

    async fn update_video_name(
        &self,
        ad_account_id: &str,
        video_id: &str,
        video_name: &str,
    ) -> Result<bool, ClientError> {
        require_id(PLATFORM, "advertiser_id", ad_account_id)?;
        require_id(PLATFORM, "video_id", video_id)?;
        let details = serde_json::json!({
            "advertiser_id": ad_account_id,
            "video_id": video_id,
            "file_name": video_name,
        });
        let body = request_body::<VideoUpdate>(&details, "video details", ad_account_id)?;
        let response = self
            .api
            .update_video_name(body)
            .await
            .map_err(|e| provider_error("update video name", ad_account_id, &details, e))?;
        Ok(succeeded(&response))
    }

    async fn get_videos_info(
        &self,
        ad_account_id: &str,
        video_ids: &[String],
    ) -> Result<Vec<VideoDetails>, ClientError> {
        require_id(PLATFORM, "advertiser_id", ad_account_id)?;
        let params = VideoInfoParams {
            advertiser_id: ad_account_id.to_string(),
            video_ids: video_ids.to_vec(),
        };
        let query = to_query_params(&params).map_err(|e| ClientError::invalid_input("video info params", e))?;
        let response = self.api.get_videos_info(query).await.map_err(|e| {
            ClientError::provider(
                format!(
                    "Unable to get video details (platform={}, advertiser_id={}, video_ids={:?})",
                    PLATFORM, ad_account_id, video_ids
                ),
                e,
            )
        })?;

        let videos: Vec<VideoPayload> = validated_list(&response, "Video details", ad_account_id)?;
        Ok(videos
            .into_iter()
            .map(|video| VideoDetails {
                video_id: video.video_id,
                material_id: video.material_id,
                duration: video.duration,
                bit_rate: video.bit_rate,
                size: video.size,
                width: video.width,
                height: video.height,
                format: video.format,
                video_cover_url: video.video_cover_url,
                preview_url: video.preview_url,
                preview_url_expire_time: video.preview_url_expire_time,
                signature: video.signature,
                file_name: video.file_name,
                create_time: video.create_time,
                modify_time: video.modify_time,
                displayable: video.displayable,
                allow_download: video.allow_download,
                allowed_placements: video.allowed_placements,
            })
            .collect())
    }
}
