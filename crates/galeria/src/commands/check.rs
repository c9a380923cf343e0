//! Probe the collection API.

use std::path::Path;

use anyhow::{Context, Result};
use galeria_api::{artwork, build_artwork, CollectionClient};

use crate::config::load_config;

/// Run the check command: fetch one artwork and print its mapped record.
pub async fn run(config_path: &Path, id: &str) -> Result<()> {
    let config = load_config(config_path)?;
    let client = CollectionClient::new(config.api.upstream.clone());

    tracing::info!("Fetching {id} from {}", client.base_url());

    let record = client
        .fetch_artwork(id)
        .await
        .with_context(|| format!("Failed to fetch artwork {id}"))?;
    let display_record = build_artwork(&record);

    tracing::info!("Title: {}", artwork::title(&display_record).unwrap_or("(none)"));
    if let Some(author) = artwork::author(&display_record) {
        tracing::info!("Author: {author}");
    }
    tracing::info!(
        "Thumbnail: {}",
        artwork::thumbnail(&display_record).unwrap_or("(none)")
    );

    Ok(())
}
