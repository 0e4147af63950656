use tracing::info;

use super::ServiceError;
use crate::client::AdsClient;
use crate::models::{
    AdCreativeDetails, AdDetails, AdSetDetails, CampaignDetails, DateRange, ImageDetails, ResourceInsightsReport,
    ResourceType, VideoDetails,
};

pub async fn get_account_ids(client: &dyn AdsClient) -> Result<Vec<String>, ServiceError> {
    let accounts = client.get_account_ids().await.map_err(ServiceError::Export)?;
    info!(platform = %client.platform(), count = accounts.len(), "Fetched ad account ids");

    Ok(accounts.into_iter().map(|account| account.account_id).collect())
}

pub async fn get_campaigns_details(
    client: &dyn AdsClient,
    account_ids: &[String],
) -> Result<Vec<CampaignDetails>, ServiceError> {
    let mut campaigns = Vec::new();
    for account_id in account_ids {
        let details = client
            .get_account_campaigns_details(account_id)
            .await
            .map_err(ServiceError::Export)?;
        campaigns.extend(details);
    }

    info!(platform = %client.platform(), accounts = account_ids.len(), count = campaigns.len(), "Fetched campaigns");
    Ok(campaigns)
}

pub async fn get_adsets_details(
    client: &dyn AdsClient,
    account_ids: &[String],
) -> Result<Vec<AdSetDetails>, ServiceError> {
    let mut adsets = Vec::new();
    for account_id in account_ids {
        let details = client
            .get_account_adsets_details(account_id)
            .await
            .map_err(ServiceError::Export)?;
        adsets.extend(details);
    }

    info!(platform = %client.platform(), accounts = account_ids.len(), count = adsets.len(), "Fetched adsets");
    Ok(adsets)
}

pub async fn get_ads_details(client: &dyn AdsClient, account_ids: &[String]) -> Result<Vec<AdDetails>, ServiceError> {
    let mut ads = Vec::new();
    for account_id in account_ids {
        let details = client
            .get_account_ads_details(account_id)
            .await
            .map_err(ServiceError::Export)?;
        ads.extend(details);
    }

    info!(platform = %client.platform(), accounts = account_ids.len(), count = ads.len(), "Fetched ads");
    Ok(ads)
}

/// Collects one insights report per account. The first failing account
/// aborts the whole export.
pub async fn get_insights_by_resource_type(
    client: &dyn AdsClient,
    account_ids: &[String],
    resource_type: ResourceType,
    range: &DateRange,
) -> Result<Vec<ResourceInsightsReport>, ServiceError> {
    let mut reports = Vec::new();
    for account_id in account_ids {
        let rows = client
            .get_insights(account_id, resource_type, range)
            .await
            .map_err(ServiceError::Export)?;
        info!(
            platform = %client.platform(),
            account_id = %account_id,
            resource_type = %resource_type,
            rows = rows.len(),
            "Fetched insights"
        );
        reports.extend(rows);
    }

    Ok(reports)
}

/// Lists the creatives of every account, or fetches only `asset_ids` when
/// any are given.
pub async fn get_ad_creatives(
    client: &dyn AdsClient,
    account_ids: &[String],
    asset_ids: &[String],
) -> Result<Vec<AdCreativeDetails>, ServiceError> {
    if !asset_ids.is_empty() {
        let mut creatives = Vec::with_capacity(asset_ids.len());
        for asset_id in asset_ids {
            let creative = client
                .get_ad_creative(asset_id)
                .await
                .map_err(ServiceError::Export)?;
            creatives.push(creative);
        }
        return Ok(creatives);
    }

    let mut creatives = Vec::new();
    for account_id in account_ids {
        let account_creatives = client
            .get_account_ad_creatives(account_id)
            .await
            .map_err(ServiceError::Export)?;
        creatives.extend(account_creatives);
    }

    info!(platform = %client.platform(), accounts = account_ids.len(), count = creatives.len(), "Fetched ad creatives");
    Ok(creatives)
}

pub async fn get_ad_creatives_list(
    client: &dyn AdsClient,
    account_ids: &[String],
) -> Result<Vec<String>, ServiceError> {
    let creatives = get_ad_creatives(client, account_ids, &[]).await?;
    Ok(creatives.into_iter().map(|creative| creative.creative_id).collect())
}

pub async fn get_images_details(
    client: &dyn AdsClient,
    advertiser_id: &str,
    image_ids: &[String],
) -> Result<Vec<ImageDetails>, ServiceError> {
    let images = client
        .get_images_info(advertiser_id, image_ids)
        .await
        .map_err(ServiceError::Assets)?;

    info!(
        platform = %client.platform(),
        advertiser_id,
        image_ids = ?image_ids,
        count = images.len(),
        "Got images info"
    );
    Ok(images)
}

pub async fn get_videos_details(
    client: &dyn AdsClient,
    advertiser_id: &str,
    video_ids: &[String],
) -> Result<Vec<VideoDetails>, ServiceError> {
    let videos = client
        .get_videos_info(advertiser_id, video_ids)
        .await
        .map_err(ServiceError::Assets)?;

    info!(
        platform = %client.platform(),
        advertiser_id,
        video_ids = ?video_ids,
        count = videos.len(),
        "Got videos info"
    );
    Ok(videos)
}
