//! Account-level workflows built on top of a platform client.
//!
//! `exporter` pulls details, insights and assets out of a platform,
//! `importer` pushes new or changed resources into it, and `uploader`
//! persists exported data to blob storage.

pub mod exporter;
pub mod importer;
pub mod uploader;

use thiserror::Error;

use crate::error::{ClientError, GatewayError};
use crate::storage::StorageError;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Export failed: {0}")]
    Export(#[source] ClientError),
    #[error("Import failed: {0}")]
    Import(#[source] ClientError),
    #[error("Ad assets request failed: {0}")]
    Assets(#[source] ClientError),
    #[error("Unable to download asset {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: GatewayError,
    },
    #[error("Upload failed: {0}")]
    Upload(#[from] StorageError),
}
