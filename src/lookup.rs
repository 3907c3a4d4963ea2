use anyhow::{Context, Result};
use serde::Deserialize;
use std::{collections::HashMap, fs::File, path::Path};
use tracing::info;

/// Manually curated identifier replacements, keyed by the freshly derived
/// id. Used to pin a club to its previously published id after a rename or
/// relocation changed the derived one.
#[derive(Debug, Default)]
pub struct IdLookup {
    map: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct LookupRow {
    new_id: String,
    old_id: String,
}

impl IdLookup {
    /// Load a `new_id,old_id` CSV.
    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("opening id lookup {}", path.display()))?;
        let mut reader = csv::Reader::from_reader(file);

        let mut map = HashMap::new();
        for row in reader.deserialize() {
            let row: LookupRow =
                row.with_context(|| format!("parsing id lookup {}", path.display()))?;
            map.insert(row.new_id, row.old_id);
        }

        info!("loaded {} id lookups from {}", map.len(), path.display());
        Ok(Self { map })
    }

    /// Replace a derived id with its curated counterpart, if one is listed.
    pub fn resolve(&self, id: String) -> String {
        match self.map.get(&id) {
            Some(curated) => curated.clone(),
            None => id,
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn resolves_listed_ids_and_passes_through_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cascs_id_lookup.csv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "new_id,old_id").unwrap();
        writeln!(file, "GB-CASC-59ca5031,GB-CASC-00000001").unwrap();
        drop(file);

        let lookup = IdLookup::from_csv(&path).unwrap();
        assert_eq!(lookup.len(), 1);
        assert_eq!(
            lookup.resolve("GB-CASC-59ca5031".to_string()),
            "GB-CASC-00000001"
        );
        assert_eq!(
            lookup.resolve("GB-CASC-35b16ef3".to_string()),
            "GB-CASC-35b16ef3"
        );
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(IdLookup::from_csv("/nonexistent/lookup.csv").is_err());
    }
}
