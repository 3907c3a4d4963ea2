use anyhow::{Context, Result};
use reqwest::Client;
use std::collections::HashSet;
use tracing::{info, warn};

use crate::fetch;
use crate::loader::{self, LoadCounts};
use crate::lookup::IdLookup;
use crate::normalize::normalize_record;
use crate::record::{CascRecord, RawRecord};

pub struct PipelineOptions {
    /// Publication page to scrape for `.ods` attachments.
    pub page_url: String,
    /// Prefix for derived organisation ids.
    pub prefix: String,
    /// Rewrite single-case organisation names into title case.
    pub titlecase: bool,
    /// Curated id replacements applied after derivation.
    pub id_lookup: IdLookup,
}

/// Scrape the register end to end: discover attachments, download each one,
/// normalize its rows and derive ids, keeping the first record seen per id.
///
/// The attachments overlap, so repeats of an id are suppressed here — after
/// normalization, never inside it — and the count is always surfaced in the
/// log. Record order follows page order, then source row order.
pub async fn fetch_cascs(client: &Client, opts: &PipelineOptions) -> Result<Vec<CascRecord>> {
    let urls = fetch::urls::fetch_register_urls(client, &opts.page_url).await?;
    if urls.is_empty() {
        warn!("no .ods attachments found on {}", opts.page_url);
    }

    let mut ids_seen: HashSet<String> = HashSet::new();
    let mut records = Vec::new();
    let mut totals = LoadCounts::ZERO;
    let mut duplicates = 0u64;

    for url in &urls {
        let bytes = fetch::ods::download_ods(client, url).await?;
        let (rows, counts) = loader::load_ods_rows(&bytes)
            .with_context(|| format!("loading register sheet from {}", url))?;
        if rows.is_empty() {
            warn!("{} contained no register rows", url);
        }
        totals.add(counts);

        duplicates += fold_rows(&mut records, &mut ids_seen, &rows, opts);
        info!(url = %url, rows = counts.rows, skipped = counts.skipped, "attachment processed");
    }

    if totals.skipped > 0 {
        warn!(
            "skipped {} non-register rows across {} attachments",
            totals.skipped,
            urls.len()
        );
    }
    if duplicates > 0 {
        warn!("suppressed {} records with already-seen ids", duplicates);
    }
    info!("scraped {} cascs", records.len());

    Ok(records)
}

/// Normalize one attachment's rows into `records`, resolving curated ids and
/// skipping ids already seen. Returns how many rows were suppressed.
fn fold_rows(
    records: &mut Vec<CascRecord>,
    ids_seen: &mut HashSet<String>,
    rows: &[RawRecord],
    opts: &PipelineOptions,
) -> u64 {
    let mut duplicates = 0u64;
    for raw in rows {
        let mut record = normalize_record(raw, &opts.prefix, opts.titlecase);
        record.id = opts.id_lookup.resolve(record.id);
        if !ids_seen.insert(record.id.clone()) {
            duplicates += 1;
            continue;
        }
        records.push(record);
    }
    duplicates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orgid::ORG_ID_PREFIX;

    fn options() -> PipelineOptions {
        PipelineOptions {
            page_url: String::new(),
            prefix: ORG_ID_PREFIX.to_string(),
            titlecase: false,
            id_lookup: IdLookup::default(),
        }
    }

    fn row(name: &str, postcode: &str) -> RawRecord {
        let mut raw = RawRecord::new();
        raw.push("Organisation Name", name);
        raw.push("Postcode", postcode);
        raw
    }

    #[test]
    fn repeats_across_attachments_are_suppressed_and_counted() {
        let opts = options();
        let mut records = Vec::new();
        let mut ids_seen = HashSet::new();

        let first = vec![
            row("Abbey Road Sports Club", "NW8 9AY"),
            row("Kirkby Wanderers", "L32 1TZ"),
        ];
        let second = vec![
            row("Abbey Road Sports Club", "NW8 9AY"),
            row("New Entrant Bowls Club", "NE1 1NE"),
        ];

        let dupes = fold_rows(&mut records, &mut ids_seen, &first, &opts)
            + fold_rows(&mut records, &mut ids_seen, &second, &opts);

        assert_eq!(dupes, 1);
        assert_eq!(records.len(), 3);
        // First occurrence wins and order is preserved.
        assert_eq!(records[0].id, "GB-CASC-59ca5031");
        assert_eq!(
            records[2].organisation_name.as_deref(),
            Some("New Entrant Bowls Club")
        );
    }

    #[test]
    fn identical_rows_within_one_attachment_collapse_too() {
        let opts = options();
        let mut records = Vec::new();
        let mut ids_seen = HashSet::new();

        let rows = vec![
            row("Abbey Road Sports Club", "NW8 9AY"),
            row("Abbey Road Sports Club", "NW8 9AY"),
        ];
        let dupes = fold_rows(&mut records, &mut ids_seen, &rows, &opts);
        assert_eq!(dupes, 1);
        assert_eq!(records.len(), 1);
    }
}
