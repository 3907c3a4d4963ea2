use anyhow::{Context, Result};
use reqwest::Client;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, warn};
use url::Url;

/// HMRC publication page listing the register spreadsheets.
pub static CASC_PUBLICATION_URL: &str =
    "https://www.gov.uk/government/publications/community-amateur-sports-clubs-casc-registered-with-hmrc--2";

const MAX_RETRIES: u32 = 3;
const INITIAL_BACKOFF_MS: u64 = 1_000;

async fn get_text_core(client: &Client, url: &Url) -> Result<String> {
    debug!("Fetching text from {}", url);
    Ok(client
        .get(url.clone())
        .send()
        .await
        .with_context(|| format!("GET {} failed", url))?
        .error_for_status()
        .with_context(|| format!("Non-success status {}", url))?
        .text()
        .await
        .with_context(|| format!("Reading text from {}", url))?)
}

async fn get_text_with_retry(client: &Client, url: &Url) -> Result<String> {
    let mut attempts = 0;
    loop {
        match get_text_core(client, url).await {
            Ok(text) => return Ok(text),
            Err(e) if attempts < MAX_RETRIES => {
                attempts += 1;
                let backoff = INITIAL_BACKOFF_MS * 2u64.pow(attempts - 1);
                warn!(%url, attempt = attempts, delay_ms = backoff, error = %e, "Retrying");
                sleep(Duration::from_millis(backoff)).await;
            }
            Err(e) => {
                error!(%url, error = %e, "Exhausted retries");
                return Err(e);
            }
        }
    }
}

/// Fetch the publication page and return absolute URLs of its `.ods`
/// attachments, in page order with repeats removed.
pub async fn fetch_register_urls(client: &Client, page_url: &str) -> Result<Vec<String>> {
    let selector = Selector::parse(r#"a[href$=".ods"]"#)
        .expect("CSS selector for ODS links should be valid");

    let base = Url::parse(page_url).with_context(|| format!("parsing page URL {}", page_url))?;
    let html = get_text_with_retry(client, &base).await?;

    let doc = Html::parse_document(&html);
    let mut seen = HashSet::new();
    let links = doc
        .select(&selector)
        .filter_map(|e| e.value().attr("href"))
        .filter_map(|href| base.join(href).ok())
        .map(|u| u.to_string())
        .filter(|u| seen.insert(u.clone()))
        .collect::<Vec<_>>();

    debug!("found {} register attachments on {}", links.len(), page_url);
    Ok(links)
}
