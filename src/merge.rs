use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::{fs::File, io::BufReader, path::Path};

use crate::record::CascRecord;

/// A previously published dataset. JSON files were historically written as
/// `{"cascs": [...]}`, so both that envelope and a bare array are accepted.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Dataset {
    Records(Vec<CascRecord>),
    Envelope { cascs: Vec<CascRecord> },
}

/// Load a previous snapshot from CSV or JSON, selected by extension.
pub fn load_previous(path: impl AsRef<Path>) -> Result<Vec<CascRecord>> {
    let path = path.as_ref();
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("csv") => load_csv(path),
        Some("json") => load_json(path),
        _ => bail!(
            "previous dataset {} must end in .csv or .json",
            path.display()
        ),
    }
}

fn load_csv(path: &Path) -> Result<Vec<CascRecord>> {
    let file =
        File::open(path).with_context(|| format!("opening previous dataset {}", path.display()))?;
    let mut reader = csv::Reader::from_reader(BufReader::new(file));
    let mut records = Vec::new();
    for row in reader.deserialize() {
        records.push(row.with_context(|| format!("parsing previous dataset {}", path.display()))?);
    }
    Ok(records)
}

fn load_json(path: &Path) -> Result<Vec<CascRecord>> {
    let file =
        File::open(path).with_context(|| format!("opening previous dataset {}", path.display()))?;
    let dataset: Dataset = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing previous dataset {}", path.display()))?;
    Ok(match dataset {
        Dataset::Records(records) | Dataset::Envelope { cascs: records } => records,
    })
}

/// Overlay freshly scraped records on a previous snapshot.
///
/// Prior records are carried over with `active = false`; a fresh record with
/// the same id replaces its predecessor outright. The merged set is sorted
/// by organisation name (falling back to id for nameless records, then id as
/// tiebreak), matching the ordering of the published dataset.
pub fn merge(previous: Vec<CascRecord>, fresh: Vec<CascRecord>) -> Vec<CascRecord> {
    let mut by_id: std::collections::HashMap<String, CascRecord> = previous
        .into_iter()
        .map(|mut record| {
            record.active = false;
            (record.id.clone(), record)
        })
        .collect();

    for record in fresh {
        by_id.insert(record.id.clone(), record);
    }

    let mut merged: Vec<CascRecord> = by_id.into_values().collect();
    merged.sort_by(|a, b| (sort_key(a), &a.id).cmp(&(sort_key(b), &b.id)));
    merged
}

fn sort_key(record: &CascRecord) -> &str {
    record
        .organisation_name
        .as_deref()
        .unwrap_or(record.id.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn record(id: &str, name: Option<&str>) -> CascRecord {
        CascRecord {
            id: id.to_string(),
            organisation_name: name.map(str::to_string),
            address: None,
            postcode: None,
            active: true,
        }
    }

    #[test]
    fn carried_over_records_become_inactive_and_fresh_ones_win() {
        let previous = vec![
            record("GB-CASC-aaaaaaaa", Some("Alpha Rowing Club")),
            record("GB-CASC-bbbbbbbb", Some("Bravo Bowls Club")),
        ];
        let fresh = vec![record("GB-CASC-bbbbbbbb", Some("Bravo Bowls Club"))];

        let merged = merge(previous, fresh);
        assert_eq!(merged.len(), 2);

        let alpha = merged
            .iter()
            .find(|r| r.id == "GB-CASC-aaaaaaaa")
            .unwrap();
        assert!(!alpha.active);

        let bravo = merged
            .iter()
            .find(|r| r.id == "GB-CASC-bbbbbbbb")
            .unwrap();
        assert!(bravo.active);
    }

    #[test]
    fn merged_output_is_sorted_by_name_with_nameless_records_on_id() {
        let merged = merge(
            vec![record("GB-CASC-dddddddd", Some("Zulu Karate Club"))],
            vec![
                record("GB-CASC-cccccccc", None),
                record("GB-CASC-aaaaaaaa", Some("Alpha Rowing Club")),
            ],
        );
        let ids: Vec<&str> = merged.iter().map(|r| r.id.as_str()).collect();
        // "Alpha..." < "GB-CASC-cccccccc" < "Zulu..." in lexicographic order.
        assert_eq!(
            ids,
            ["GB-CASC-aaaaaaaa", "GB-CASC-cccccccc", "GB-CASC-dddddddd"]
        );
    }

    #[test]
    fn json_envelope_and_bare_array_both_load() {
        let dir = tempfile::tempdir().unwrap();

        let bare = dir.path().join("bare.json");
        std::fs::write(
            &bare,
            r#"[{"id":"GB-CASC-aaaaaaaa","organisation_name":"A","address":null,"postcode":null,"active":true}]"#,
        )
        .unwrap();
        assert_eq!(load_previous(&bare).unwrap().len(), 1);

        let envelope = dir.path().join("envelope.json");
        std::fs::write(
            &envelope,
            r#"{"cascs":[{"id":"GB-CASC-aaaaaaaa","organisation_name":"A","address":null,"postcode":null,"active":true}]}"#,
        )
        .unwrap();
        assert_eq!(load_previous(&envelope).unwrap().len(), 1);
    }

    #[test]
    fn csv_snapshot_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("previous.csv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "id,organisation_name,address,postcode,active").unwrap();
        writeln!(file, "GB-CASC-aaaaaaaa,Alpha Rowing Club,,AA1 1AA,true").unwrap();
        drop(file);

        let records = load_previous(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].address, None);
        assert_eq!(records[0].postcode.as_deref(), Some("AA1 1AA"));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        assert!(load_previous("previous.ods").is_err());
    }
}
