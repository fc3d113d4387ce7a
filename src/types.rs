use crate::util::{completion_rate, format_plain};
use serde::Serialize;
use std::fmt;

pub const ZONE: &str = "Zone";
pub const CLIENT_NAME: &str = "Client Name";
pub const ORDER_STATUS: &str = "Order Status";
pub const STATE: &str = "State";
pub const TIER: &str = "Tier";
pub const CANCELLED: &str = "Cancelled";
pub const COMPLETED: &str = "Completed";
pub const HOLD: &str = "HOLD";
pub const PENDING: &str = "Pending";
pub const GRAND_TOTAL: &str = "Grand Total";
pub const COMPLETION: &str = "Completion%";

/// A single scalar read from the input file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Empty,
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn is_missing(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Number(n) => n.is_nan(),
            CellValue::Text(_) => false,
        }
    }

    /// Render the cell as a trimmed string. Missing cells become `""`.
    pub fn to_key_string(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Number(n) if n.is_nan() => String::new(),
            CellValue::Number(n) => format_plain(*n),
            CellValue::Text(s) => s.trim().to_string(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Number(n) => f.write_str(&format_plain(*n)),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

/// Rows as read from a file: trimmed column names and one cell per column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl RawTable {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        RawTable {
            columns: columns
                .into_iter()
                .map(|c| c.as_ref().trim().to_string())
                .collect(),
            rows: Vec::new(),
        }
    }

    /// Build a table from plain strings; blank strings become [`CellValue::Empty`].
    pub fn from_text_rows(columns: &[&str], rows: &[&[&str]]) -> Self {
        let mut table = RawTable::new(columns);
        for row in rows {
            table.push_row(
                row.iter()
                    .map(|s| {
                        if s.is_empty() {
                            CellValue::Empty
                        } else {
                            CellValue::Text(s.to_string())
                        }
                    })
                    .collect(),
            );
        }
        table
    }

    /// Append a record. Short records are padded with empty cells and long
    /// ones truncated to the header width.
    pub fn push_row(&mut self, mut row: Vec<CellValue>) {
        row.resize(self.columns.len(), CellValue::Empty);
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StatusCategory {
    Cancelled,
    Completed,
    Hold,
    Pending,
    /// Any status outside the alias table, kept under its trimmed label.
    Other(String),
}

impl StatusCategory {
    pub fn label(&self) -> &str {
        match self {
            StatusCategory::Cancelled => CANCELLED,
            StatusCategory::Completed => COMPLETED,
            StatusCategory::Hold => HOLD,
            StatusCategory::Pending => PENDING,
            StatusCategory::Other(label) => label,
        }
    }
}

/// Per-status counts. `extra` lines up with the owning table's
/// `extra_statuses` labels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub cancelled: u64,
    pub completed: u64,
    pub hold: u64,
    pub pending: u64,
    pub extra: Vec<u64>,
}

impl StatusCounts {
    pub fn with_extra(extra_len: usize) -> Self {
        StatusCounts {
            extra: vec![0; extra_len],
            ..Default::default()
        }
    }

    pub fn bump_extra(&mut self, idx: usize) {
        if idx >= self.extra.len() {
            self.extra.resize(idx + 1, 0);
        }
        self.extra[idx] += 1;
    }

    /// Add `other` column-wise into `self`.
    pub fn accumulate(&mut self, other: &StatusCounts) {
        self.cancelled += other.cancelled;
        self.completed += other.completed;
        self.hold += other.hold;
        self.pending += other.pending;
        if other.extra.len() > self.extra.len() {
            self.extra.resize(other.extra.len(), 0);
        }
        for (acc, n) in self.extra.iter_mut().zip(&other.extra) {
            *acc += n;
        }
    }

    pub fn grand_total(&self) -> u64 {
        self.cancelled + self.completed + self.hold + self.pending + self.extra.iter().sum::<u64>()
    }

    /// Completed over Grand Total as a 0..=1 fraction.
    pub fn completion(&self) -> f64 {
        completion_rate(self.completed, self.grand_total())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientSummaryRow {
    pub zone: String,
    pub client_name: String,
    pub state: Option<String>,
    pub tier: Option<String>,
    pub counts: StatusCounts,
}

impl ClientSummaryRow {
    pub fn grand_total(&self) -> u64 {
        self.counts.grand_total()
    }

    pub fn completion(&self) -> f64 {
        self.counts.completion()
    }
}

/// Zone x client breakdown. `has_state`/`has_tier` record whether the
/// source table carried those columns at all.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientSummary {
    pub extra_statuses: Vec<String>,
    pub has_state: bool,
    pub has_tier: bool,
    pub rows: Vec<ClientSummaryRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ZoneSummaryRow {
    pub zone: String,
    pub counts: StatusCounts,
}

impl ZoneSummaryRow {
    pub fn grand_total(&self) -> u64 {
        self.counts.grand_total()
    }

    pub fn completion(&self) -> f64 {
        self.counts.completion()
    }
}

/// Zone rollup. The last row is always the synthetic "Grand Total" row.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneSummary {
    pub extra_statuses: Vec<String>,
    pub rows: Vec<ZoneSummaryRow>,
}

impl ZoneSummary {
    /// Rows for real zones, without the trailing total.
    pub fn zone_rows(&self) -> &[ZoneSummaryRow] {
        match self.rows.split_last() {
            Some((_, zones)) => zones,
            None => &[],
        }
    }

    pub fn grand_total_row(&self) -> Option<&ZoneSummaryRow> {
        self.rows.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_string_trims_and_drops_integral_fraction() {
        assert_eq!(CellValue::Text("  North ".into()).to_key_string(), "North");
        assert_eq!(CellValue::Number(5.0).to_key_string(), "5");
        assert_eq!(CellValue::Number(2.5).to_key_string(), "2.5");
        assert_eq!(CellValue::Empty.to_key_string(), "");
        assert_eq!(CellValue::Number(f64::NAN).to_key_string(), "");
    }

    #[test]
    fn push_row_pads_to_header_width() {
        let mut table = RawTable::new([" Zone ", "Client Name", "Order Status"]);
        table.push_row(vec![CellValue::Text("N".into())]);
        assert_eq!(table.columns()[0], "Zone");
        assert_eq!(table.rows()[0].len(), 3);
        assert_eq!(table.rows()[0][2], CellValue::Empty);
    }

    #[test]
    fn counts_include_extra_statuses_in_grand_total() {
        let mut counts = StatusCounts::with_extra(1);
        counts.completed = 2;
        counts.pending = 1;
        counts.bump_extra(0);
        assert_eq!(counts.grand_total(), 4);
        assert!((counts.completion() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn empty_counts_have_zero_completion() {
        let counts = StatusCounts::default();
        assert_eq!(counts.grand_total(), 0);
        assert_eq!(counts.completion(), 0.0);
    }

    #[test]
    fn accumulate_widens_extra_columns() {
        let mut total = StatusCounts::default();
        let mut row = StatusCounts::with_extra(2);
        row.cancelled = 1;
        row.bump_extra(1);
        total.accumulate(&row);
        total.accumulate(&row);
        assert_eq!(total.cancelled, 2);
        assert_eq!(total.extra, vec![0, 2]);
    }
}
