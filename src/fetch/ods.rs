use anyhow::{Context, Result};
use reqwest::Client;
use tracing::debug;

/// Download one register attachment and return its bytes. The spreadsheets
/// are a few megabytes at most, so they are held in memory rather than
/// staged on disk.
pub async fn download_ods(client: &Client, url: &str) -> Result<Vec<u8>> {
    let resp = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("GET {} failed", url))?
        .error_for_status()
        .with_context(|| format!("Non-success status {}", url))?;

    let bytes = resp
        .bytes()
        .await
        .with_context(|| format!("Reading body of {}", url))?;

    debug!("downloaded {} ({} bytes)", url, bytes.len());
    Ok(bytes.to_vec())
}
