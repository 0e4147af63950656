use serde_json::Value;
use tracing::info;

use super::ServiceError;
use crate::client::AdsClient;

pub async fn create_campaign(
    client: &dyn AdsClient,
    ad_account_id: &str,
    campaign_details: Value,
) -> Result<String, ServiceError> {
    let campaign_id = client
        .create_campaign(ad_account_id, campaign_details)
        .await
        .map_err(ServiceError::Import)?;

    info!(platform = %client.platform(), campaign_id = %campaign_id, "Created campaign");
    Ok(campaign_id)
}

pub async fn update_campaign(
    client: &dyn AdsClient,
    ad_account_id: &str,
    campaign_id: &str,
    campaign_details: Value,
) -> Result<bool, ServiceError> {
    let updated = client
        .update_campaign(ad_account_id, campaign_id, campaign_details)
        .await
        .map_err(ServiceError::Import)?;

    info!(platform = %client.platform(), campaign_id, success = updated, "Updated campaign");
    Ok(updated)
}

pub async fn create_ad_set(
    client: &dyn AdsClient,
    ad_account_id: &str,
    adset_details: Value,
) -> Result<String, ServiceError> {
    let adset_id = client
        .create_adset(ad_account_id, adset_details)
        .await
        .map_err(ServiceError::Import)?;

    info!(platform = %client.platform(), adset_id = %adset_id, "Created adset");
    Ok(adset_id)
}

pub async fn update_ad_set(
    client: &dyn AdsClient,
    ad_account_id: &str,
    adset_id: &str,
    adset_details: Value,
) -> Result<bool, ServiceError> {
    let updated = client
        .update_adset(ad_account_id, adset_id, adset_details)
        .await
        .map_err(ServiceError::Import)?;

    info!(platform = %client.platform(), adset_id, success = updated, "Updated adset");
    Ok(updated)
}

pub async fn create_ads(
    client: &dyn AdsClient,
    ad_account_id: &str,
    ads_details: Value,
) -> Result<Vec<String>, ServiceError> {
    let ad_ids = client
        .create_ads(ad_account_id, ads_details)
        .await
        .map_err(ServiceError::Import)?;

    info!(platform = %client.platform(), ad_ids = ?ad_ids, "Created ads");
    Ok(ad_ids)
}
