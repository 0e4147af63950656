use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;
use tracing::debug;

use crate::constants::API_DATE_FORMAT;
use crate::models::ResourceType;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Unable to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Unable to serialize data: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Row has no {0} id to build its storage key")]
    MissingResourceId(String),
}

/// Destination for serialized export results.
#[async_trait]
pub trait BlobStorage: Send + Sync {
    /// Stores `body` under `key` and returns where it landed.
    async fn put(&self, key: &str, body: Vec<u8>) -> Result<String, StorageError>;
}

/// Writes blobs as files below a root directory.
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl BlobStorage for LocalStorage {
    async fn put(&self, key: &str, body: Vec<u8>) -> Result<String, StorageError> {
        let path = self.root.join(key);
        let location = path.display().to_string();
        let io_error = |source| StorageError::Io {
            path: location.clone(),
            source,
        };

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(io_error)?;
        }
        tokio::fs::write(&path, body).await.map_err(io_error)?;

        debug!(path = %location, "Stored blob");
        Ok(location)
    }
}

pub fn details_key(resource_type: ResourceType, date_created: NaiveDate) -> String {
    format!(
        "{}/date_created={}/details.json",
        resource_type.value(),
        date_created.format(API_DATE_FORMAT)
    )
}

pub fn insights_key(
    resource_type: ResourceType,
    resource_id: &str,
    date_created: NaiveDate,
    date_start: &str,
) -> String {
    let resource = resource_type.value();
    format!(
        "{}/{}={}/date_created={}/performance_{}.json",
        resource,
        resource,
        resource_id,
        date_created.format(API_DATE_FORMAT),
        date_start
    )
}

pub fn asset_key(resource_type: ResourceType, resource_id: &str, date_created: NaiveDate) -> String {
    let resource = resource_type.value();
    format!(
        "{}/{}={}/date_created={}/asset.png",
        resource,
        resource,
        resource_id,
        date_created.format(API_DATE_FORMAT)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
    }

    #[test]
    fn keys_follow_partitioned_layout() {
        assert_eq!(details_key(ResourceType::AdSet, day()), "adset/date_created=2024-02-29/details.json");
        assert_eq!(
            insights_key(ResourceType::Ad, "a1", day(), "2024-02-28"),
            "ad/ad=a1/date_created=2024-02-29/performance_2024-02-28.json"
        );
        assert_eq!(
            asset_key(ResourceType::AdCreative, "cr1", day()),
            "adcreative/adcreative=cr1/date_created=2024-02-29/asset.png"
        );
    }

    #[tokio::test]
    async fn local_storage_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());

        let path = storage
            .put("campaign/date_created=2024-02-29/details.json", b"[]".to_vec())
            .await
            .unwrap();

        assert!(path.ends_with("details.json"));
        let written =
            std::fs::read_to_string(dir.path().join("campaign/date_created=2024-02-29/details.json")).unwrap();
        assert_eq!(written, "[]");
    }
}
