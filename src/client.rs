use async_trait::async_trait;
use serde_json::Value;

use crate::error::ClientError;
use crate::models::{
    AdAccount, AdCreativeDetails, AdDetails, AdSetDetails, CampaignDetails, DateRange, ImageDetails, Platform,
    ResourceInsightsReport, ResourceType, VideoDetails,
};

/// Operations shared by every ad platform.
///
/// Create and update payloads are caller-supplied JSON objects, validated
/// against the platform's request schema before anything is sent. Operations
/// a platform does not offer fail with `ClientError::InvalidInput`.
#[async_trait]
pub trait AdsClient: Send + Sync {
    fn platform(&self) -> Platform;

    async fn get_account_ids(&self) -> Result<Vec<AdAccount>, ClientError>;

    async fn get_account_campaigns_details(&self, ad_account_id: &str) -> Result<Vec<CampaignDetails>, ClientError>;

    async fn get_account_adsets_details(&self, ad_account_id: &str) -> Result<Vec<AdSetDetails>, ClientError>;

    async fn get_account_ads_details(&self, ad_account_id: &str) -> Result<Vec<AdDetails>, ClientError>;

    async fn get_account_ad_creatives(&self, _ad_account_id: &str) -> Result<Vec<AdCreativeDetails>, ClientError> {
        Err(unsupported(self.platform(), "get_account_ad_creatives"))
    }

    async fn get_ad_creative(&self, _ad_creative_id: &str) -> Result<AdCreativeDetails, ClientError> {
        Err(unsupported(self.platform(), "get_ad_creative"))
    }

    async fn get_insights(
        &self,
        ad_account_id: &str,
        resource_type: ResourceType,
        range: &DateRange,
    ) -> Result<Vec<ResourceInsightsReport>, ClientError>;

    async fn create_campaign(&self, ad_account_id: &str, campaign_details: Value) -> Result<String, ClientError>;

    async fn update_campaign(
        &self,
        ad_account_id: &str,
        campaign_id: &str,
        campaign_details: Value,
    ) -> Result<bool, ClientError>;

    async fn create_adset(&self, ad_account_id: &str, adset_details: Value) -> Result<String, ClientError>;

    async fn update_adset(
        &self,
        ad_account_id: &str,
        adset_id: &str,
        adset_details: Value,
    ) -> Result<bool, ClientError>;

    async fn create_adcreative(&self, _ad_account_id: &str, _adcreative_details: Value) -> Result<String, ClientError> {
        Err(unsupported(self.platform(), "create_adcreative"))
    }

    async fn update_adcreative(&self, _adcreative_id: &str, _adcreative_details: Value) -> Result<bool, ClientError> {
        Err(unsupported(self.platform(), "update_adcreative"))
    }

    async fn create_ad(&self, _ad_account_id: &str, _ad_details: Value) -> Result<String, ClientError> {
        Err(unsupported(self.platform(), "create_ad"))
    }

    async fn create_ads(&self, ad_account_id: &str, ads_details: Value) -> Result<Vec<String>, ClientError>;

    async fn update_ad(&self, _ad_id: &str, _ad_details: Value) -> Result<bool, ClientError> {
        Err(unsupported(self.platform(), "update_ad"))
    }

    async fn update_ads(
        &self,
        _ad_account_id: &str,
        _adgroup_id: &str,
        _ad_details: Value,
    ) -> Result<bool, ClientError> {
        Err(unsupported(self.platform(), "update_ads"))
    }

    async fn update_ads_status(&self, _ad_account_id: &str, _ads_status_details: Value) -> Result<bool, ClientError> {
        Err(unsupported(self.platform(), "update_ads_status"))
    }

    async fn create_image(&self, _ad_account_id: &str, _image_details: Value) -> Result<String, ClientError> {
        Err(unsupported(self.platform(), "create_image"))
    }

    async fn update_image_name(
        &self,
        _ad_account_id: &str,
        _image_id: &str,
        _image_name: &str,
    ) -> Result<bool, ClientError> {
        Err(unsupported(self.platform(), "update_image_name"))
    }

    async fn get_images_info(
        &self,
        _ad_account_id: &str,
        _image_ids: &[String],
    ) -> Result<Vec<ImageDetails>, ClientError> {
        Err(unsupported(self.platform(), "get_images_info"))
    }

    async fn create_video(&self, _ad_account_id: &str, _video_details: Value) -> Result<String, ClientError> {
        Err(unsupported(self.platform(), "create_video"))
    }

    async fn update_video_name(
        &self,
        _ad_account_id: &str,
        _video_id: &str,
        _video_name: &str,
    ) -> Result<bool, ClientError> {
        Err(unsupported(self.platform(), "update_video_name"))
    }

    async fn get_videos_info(
        &self,
        _ad_account_id: &str,
        _video_ids: &[String],
    ) -> Result<Vec<VideoDetails>, ClientError> {
        Err(unsupported(self.platform(), "get_videos_info"))
    }
}

fn unsupported(platform: Platform, operation: &str) -> ClientError {
    ClientError::InvalidInput(format!("Operation {} is not supported on platform {}", operation, platform))
}

/// Rejects a blank identifier before it ends up in a provider URL.
pub(crate) fn require_id(platform: Platform, name: &str, value: &str) -> Result<(), ClientError> {
    if value.trim().is_empty() {
        return Err(ClientError::InvalidInput(format!(
            "{} must not be empty (platform={})",
            name, platform
        )));
    }
    Ok(())
}
