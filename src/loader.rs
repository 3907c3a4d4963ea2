use anyhow::{anyhow, Context, Result};
use calamine::{Data, Ods, Range, Reader};
use std::io::Cursor;
use tracing::debug;

use crate::record::RawRecord;

/// Register rows span at least this many cells; anything narrower is
/// publication preamble or notes.
const MIN_ROW_CELLS: usize = 6;

/// Counters for one loaded sheet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadCounts {
    pub rows: u64,
    pub skipped: u64,
}

impl LoadCounts {
    pub const ZERO: Self = LoadCounts { rows: 0, skipped: 0 };

    /// Add another LoadCounts into `self`, saturating on overflow.
    pub fn add(&mut self, other: LoadCounts) {
        self.rows = self.rows.saturating_add(other.rows);
        self.skipped = self.skipped.saturating_add(other.skipped);
    }
}

/// Parse the first sheet of an ODS workbook into ordered raw rows.
pub fn load_ods_rows(bytes: &[u8]) -> Result<(Vec<RawRecord>, LoadCounts)> {
    let mut workbook =
        Ods::new(Cursor::new(bytes.to_vec())).context("opening ODS workbook")?;

    let sheet = workbook
        .sheet_names()
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("workbook has no sheets"))?;
    debug!(sheet = %sheet, "reading register sheet");

    let range = workbook
        .worksheet_range(&sheet)
        .with_context(|| format!("reading sheet {:?}", sheet))?;

    Ok(rows_from_range(&range))
}

/// Walk a cell range: skip narrow rows (counted), take the first wide row as
/// the header, and zip every later wide row against it. Cells are
/// stringified and trimmed; blank cells are dropped so they read as absent.
pub fn rows_from_range(range: &Range<Data>) -> (Vec<RawRecord>, LoadCounts) {
    let mut headers: Option<Vec<String>> = None;
    let mut records = Vec::new();
    let mut counts = LoadCounts::ZERO;

    for row in range.rows() {
        let width = row
            .iter()
            .rposition(|cell| !matches!(cell, Data::Empty))
            .map(|idx| idx + 1)
            .unwrap_or(0);
        if width < MIN_ROW_CELLS {
            counts.skipped += 1;
            continue;
        }

        let cells: Vec<String> = row[..width].iter().map(cell_to_string).collect();

        match &headers {
            None => headers = Some(cells),
            Some(header_row) => {
                let mut record = RawRecord::new();
                for (column, value) in header_row.iter().zip(cells) {
                    if !column.is_empty() && !value.is_empty() {
                        record.push(column.clone(), value);
                    }
                }
                records.push(record);
                counts.rows += 1;
            }
        }
    }

    (records, counts)
}

/// Render one cell the way it appears in the published register. Numeric
/// cells holding whole numbers lose the spreadsheet's trailing `.0`.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        other => other.to_string().trim().to_string(),
    }
}
