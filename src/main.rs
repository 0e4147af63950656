use std::error::Error;

use ads_manager::config::Config;
use ads_manager::services::{exporter, uploader};
use ads_manager::storage::LocalStorage;
use ads_manager::ClientFactory;
use chrono::Utc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = Config::from_env()?;

    let mut factory = ClientFactory::new()?.with_poll_interval(config.poll_interval);
    if let Some(base_url) = &config.facebook_base_url {
        factory = factory.with_facebook_base_url(base_url.as_str());
    }
    if let Some(base_url) = &config.tiktok_base_url {
        factory = factory.with_tiktok_base_url(base_url.as_str());
    }

    let params = config.platform_params();
    let client = factory.build(config.platform, &config.access_token, params.as_ref())?;

    let account_ids = if config.account_ids.is_empty() {
        exporter::get_account_ids(client.as_ref()).await?
    } else {
        config.account_ids.clone()
    };

    let reports =
        exporter::get_insights_by_resource_type(client.as_ref(), &account_ids, config.resource_type, &config.date_range)
            .await?;

    // Export
    let storage = LocalStorage::new(&config.output_dir);
    let paths = uploader::upload_resource_insights(
        &storage,
        &reports,
        config.resource_type,
        Utc::now().date_naive(),
    )
    .await?;

    info!(
        platform = %config.platform,
        accounts = account_ids.len(),
        rows = reports.len(),
        files = paths.len(),
        output_dir = %storage.root().display(),
        "Insights export finished"
    );

    Ok(())
}
