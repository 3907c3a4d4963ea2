use anyhow::{Context, Result};
use std::{
    collections::{BTreeMap, BTreeSet},
    fs::File,
    io::BufWriter,
    path::Path,
};
use tracing::info;

use crate::record::CascRecord;

/// Canonical column order of the CSV artifact.
pub static CSV_HEADER: &[&str] = &["id", "organisation_name", "address", "postcode", "active"];

/// Write the CSV artifact: the canonical header row, then one row per
/// record in the order given. Zero records still produce the header.
pub fn write_csv(path: impl AsRef<Path>, records: &[CascRecord]) -> Result<()> {
    let path = path.as_ref();
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;

    writer
        .write_record(CSV_HEADER)
        .with_context(|| format!("writing header to {}", path.display()))?;
    for record in records {
        writer
            .serialize(record)
            .with_context(|| format!("writing record to {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("flushing {}", path.display()))?;

    info!("wrote {} records to {}", records.len(), path.display());
    Ok(())
}

/// Write the JSON artifact: an array of objects in the order given.
pub fn write_json(path: impl AsRef<Path>, records: &[CascRecord]) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), records)
        .with_context(|| format!("writing {}", path.display()))?;

    info!("wrote {} records to {}", records.len(), path.display());
    Ok(())
}

/// Write the `id1,id2,name` report of organisation names carried by exactly
/// two distinct ids. Pairs like these are the raw material for the curated
/// id lookup.
pub fn write_name_match(path: impl AsRef<Path>, records: &[CascRecord]) -> Result<()> {
    let path = path.as_ref();

    let mut ids_by_name: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for record in records {
        if let Some(name) = record.organisation_name.as_deref() {
            ids_by_name.entry(name).or_default().insert(&record.id);
        }
    }

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer
        .write_record(["id1", "id2", "name"])
        .with_context(|| format!("writing header to {}", path.display()))?;

    let mut pairs = 0usize;
    for (name, ids) in &ids_by_name {
        if ids.len() != 2 {
            continue;
        }
        let mut ids = ids.iter();
        let (id1, id2) = (ids.next().unwrap(), ids.next().unwrap());
        writer
            .write_record([*id1, *id2, *name])
            .with_context(|| format!("writing record to {}", path.display()))?;
        pairs += 1;
    }
    writer
        .flush()
        .with_context(|| format!("flushing {}", path.display()))?;

    info!("wrote {} name collisions to {}", pairs, path.display());
    Ok(())
}
