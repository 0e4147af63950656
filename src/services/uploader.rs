use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use super::ServiceError;
use crate::models::{AdCreativeDetails, ResourceInsightsReport, ResourceType};
use crate::storage::{asset_key, details_key, insights_key, BlobStorage, StorageError};
use crate::transport::HttpTransport;

/// Stores all details of one resource level as a single pretty-printed document.
pub async fn upload_resource_details<T: Serialize>(
    storage: &dyn BlobStorage,
    resource_details: &[T],
    resource_type: ResourceType,
    date_created: NaiveDate,
) -> Result<String, ServiceError> {
    let body = serde_json::to_string_pretty(resource_details).map_err(StorageError::from)?;
    Ok(storage
        .put(&details_key(resource_type, date_created), body.into_bytes())
        .await?)
}

/// Stores each insights row under its resource id and reporting day.
pub async fn upload_resource_insights(
    storage: &dyn BlobStorage,
    resources_insights: &[ResourceInsightsReport],
    resource_type: ResourceType,
    date_created: NaiveDate,
) -> Result<Vec<String>, ServiceError> {
    let mut paths = Vec::with_capacity(resources_insights.len());
    for row in resources_insights {
        let resource_id = row
            .resource_id()
            .ok_or_else(|| StorageError::MissingResourceId(resource_type.value().to_string()))?;
        let key = insights_key(resource_type, resource_id, date_created, &row.date_start);
        let body = serde_json::to_string_pretty(row).map_err(StorageError::from)?;
        paths.push(storage.put(&key, body.into_bytes()).await?);
    }

    Ok(paths)
}

/// Downloads each creative's image and stores it next to the creative id.
/// Creatives without an image are skipped.
pub async fn upload_facebook_ad_creatives(
    storage: &dyn BlobStorage,
    transport: &dyn HttpTransport,
    ad_creatives: &[AdCreativeDetails],
    date_created: NaiveDate,
) -> Result<Vec<String>, ServiceError> {
    let mut paths = Vec::new();
    for creative in ad_creatives {
        let Some(image_url) = creative.image_url.as_deref().filter(|url| !url.is_empty()) else {
            debug!(creative_id = %creative.creative_id, "Creative has no image, skipping");
            continue;
        };

        let image = transport
            .download(image_url)
            .await
            .map_err(|source| ServiceError::Download {
                url: image_url.to_string(),
                source,
            })?;
        let key = asset_key(ResourceType::AdCreative, &creative.creative_id, date_created);
        paths.push(storage.put(&key, image).await?);
    }

    info!(creatives = ad_creatives.len(), uploaded = paths.len(), "Uploaded ad creative assets");
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::models::CampaignDetails;
    use crate::storage::LocalStorage;
    use crate::transport::testing::ScriptedTransport;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 6).unwrap()
    }

    fn creative(id: &str, image_url: Option<&str>) -> AdCreativeDetails {
        AdCreativeDetails {
            account_id: "42".to_string(),
            creative_id: id.to_string(),
            creative_name: Some(format!("creative {}", id)),
            title: None,
            body: None,
            image_url: image_url.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn details_are_stored_as_one_document_per_level() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());
        let campaigns = vec![CampaignDetails {
            account_id: "act_42".to_string(),
            campaign_id: "c1".to_string(),
            campaign_name: "spring".to_string(),
            effective_status: "ACTIVE".to_string(),
            configured_status: None,
            created_time: "2024-01-01T00:00:00+0000".to_string(),
            updated_time: "2024-01-02T00:00:00+0000".to_string(),
        }];

        let path = upload_resource_details(&storage, &campaigns, ResourceType::Campaign, day())
            .await
            .unwrap();

        assert!(path.ends_with("campaign/date_created=2024-05-06/details.json"));
        let stored: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(stored, json!([serde_json::to_value(&campaigns[0]).unwrap()]));
    }

    #[tokio::test]
    async fn creative_images_are_downloaded_and_rows_without_image_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());
        let transport = ScriptedTransport::new();
        transport.push_text(200, "image-bytes");
        let creatives = vec![
            creative("cr1", Some("https://cdn.test/cr1.png")),
            creative("cr2", None),
            creative("cr3", Some("")),
        ];

        let paths = upload_facebook_ad_creatives(&storage, &transport, &creatives, day())
            .await
            .unwrap();

        assert_eq!(paths.len(), 1);
        let stored = std::fs::read(
            dir.path()
                .join("adcreative/adcreative=cr1/date_created=2024-05-06/asset.png"),
        )
        .unwrap();
        assert_eq!(stored, b"image-bytes".to_vec());
        assert_eq!(transport.requests().len(), 1);
        assert!(!dir.path().join("adcreative/adcreative=cr2").exists());
    }

    #[tokio::test]
    async fn failed_image_download_stops_the_upload() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());
        let transport = ScriptedTransport::new();
        transport.push_text(403, "denied");

        let err = upload_facebook_ad_creatives(
            &storage,
            &transport,
            &[creative("cr1", Some("https://cdn.test/cr1.png"))],
            day(),
        )
        .await
        .unwrap_err();

        match err {
            ServiceError::Download { url, source } => {
                assert_eq!(url, "https://cdn.test/cr1.png");
                assert_eq!(source.status_code(), Some(403));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
