use serde::{Deserialize, Serialize};

/// One spreadsheet row as `(source column, trimmed value)` pairs in source
/// column order. Cells that trim to nothing are omitted, so a blank cell and
/// a missing cell look identical to consumers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    columns: Vec<(String, String)>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column/value pair, keeping insertion order.
    pub fn push(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.columns.push((column.into(), value.into()));
    }

    /// Value of the first column with this exact name, if present.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Canonical, output-ready representation of one club.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CascRecord {
    pub id: String,
    pub organisation_name: Option<String>,
    pub address: Option<String>,
    pub postcode: Option<String>,
    /// Whether the club appears in the current publication. Only records
    /// carried over from a merged previous snapshot are inactive.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}
