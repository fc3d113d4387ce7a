//! Display-ready tables for the JSON response and the workbook.
//!
//! [`to_export_rows`] is the only place Completion% is turned from a
//! fraction into a percentage. Both serialization paths go through it.
use crate::types::{
    CellValue, ClientSummary, RawTable, StatusCounts, ZoneSummary, CANCELLED, CLIENT_NAME, COMPLETED,
    COMPLETION, GRAND_TOTAL, HOLD, PENDING, STATE, TIER, ZONE,
};
use crate::util::{format_plain, to_percent};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// A summary cell before export formatting.
#[derive(Debug, Clone, PartialEq)]
pub enum SummaryCell {
    Text(String),
    Attribute(Option<String>),
    Count(u64),
    /// Completion as a 0..=1 fraction.
    Fraction(f64),
}

/// A table that can be laid out as named columns of [`SummaryCell`]s.
pub trait SummaryTable {
    fn headers(&self) -> Vec<String>;
    fn cells(&self) -> Vec<Vec<SummaryCell>>;
}

fn count_headers(extra: &[String]) -> impl Iterator<Item = String> + '_ {
    [CANCELLED, COMPLETED, HOLD, PENDING, GRAND_TOTAL, COMPLETION]
        .into_iter()
        .map(str::to_string)
        .chain(extra.iter().cloned())
}

fn count_cells(counts: &StatusCounts) -> impl Iterator<Item = SummaryCell> + '_ {
    [
        SummaryCell::Count(counts.cancelled),
        SummaryCell::Count(counts.completed),
        SummaryCell::Count(counts.hold),
        SummaryCell::Count(counts.pending),
        SummaryCell::Count(counts.grand_total()),
        SummaryCell::Fraction(counts.completion()),
    ]
    .into_iter()
    .chain(counts.extra.iter().map(|n| SummaryCell::Count(*n)))
}

impl SummaryTable for ClientSummary {
    fn headers(&self) -> Vec<String> {
        let mut headers = vec![ZONE.to_string(), CLIENT_NAME.to_string()];
        if self.has_state {
            headers.push(STATE.to_string());
        }
        if self.has_tier {
            headers.push(TIER.to_string());
        }
        headers.extend(count_headers(&self.extra_statuses));
        headers
    }

    fn cells(&self) -> Vec<Vec<SummaryCell>> {
        self.rows
            .iter()
            .map(|row| {
                let mut cells = vec![
                    SummaryCell::Text(row.zone.clone()),
                    SummaryCell::Text(row.client_name.clone()),
                ];
                if self.has_state {
                    cells.push(SummaryCell::Attribute(row.state.clone()));
                }
                if self.has_tier {
                    cells.push(SummaryCell::Attribute(row.tier.clone()));
                }
                cells.extend(count_cells(&row.counts));
                cells
            })
            .collect()
    }
}

impl SummaryTable for ZoneSummary {
    fn headers(&self) -> Vec<String> {
        std::iter::once(ZONE.to_string())
            .chain(count_headers(&self.extra_statuses))
            .collect()
    }

    fn cells(&self) -> Vec<Vec<SummaryCell>> {
        self.rows
            .iter()
            .map(|row| {
                std::iter::once(SummaryCell::Text(row.zone.clone()))
                    .chain(count_cells(&row.counts))
                    .collect()
            })
            .collect()
    }
}

/// A formatted cell, ready for JSON or a worksheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExportValue {
    Empty,
    Integer(u64),
    Number(f64),
    Text(String),
}

impl ExportValue {
    pub fn to_display(&self) -> String {
        match self {
            ExportValue::Empty => String::new(),
            ExportValue::Integer(n) => n.to_string(),
            ExportValue::Number(n) => format_plain(*n),
            ExportValue::Text(s) => s.clone(),
        }
    }
}

impl From<&CellValue> for ExportValue {
    fn from(cell: &CellValue) -> Self {
        match cell {
            CellValue::Empty => ExportValue::Empty,
            CellValue::Number(n) if n.is_nan() => ExportValue::Empty,
            CellValue::Number(n) => ExportValue::Number(*n),
            CellValue::Text(s) => ExportValue::Text(s.clone()),
        }
    }
}

/// Headers plus rows of [`ExportValue`]s. Serializes as an array of
/// records whose keys follow the header order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<ExportValue>>,
}

impl ExportTable {
    /// The input table as-is, for the "Raw" sheet.
    pub fn from_raw(raw: &RawTable) -> Self {
        ExportTable {
            headers: raw.columns().to_vec(),
            rows: raw
                .rows()
                .iter()
                .map(|row| row.iter().map(ExportValue::from).collect())
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Value of `column` in row `row`, if both exist.
    pub fn get(&self, row: usize, column: &str) -> Option<&ExportValue> {
        let idx = self.headers.iter().position(|h| h == column)?;
        self.rows.get(row)?.get(idx)
    }
}

impl Serialize for ExportTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct Record<'a>(&'a [String], &'a [ExportValue]);

        impl Serialize for Record<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(Some(self.0.len()))?;
                for (key, value) in self.0.iter().zip(self.1) {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }

        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for row in &self.rows {
            seq.serialize_element(&Record(&self.headers, row))?;
        }
        seq.end()
    }
}

/// Format a summary for output: counts as integers, missing attributes as
/// empty, Completion% scaled to 0..=100 and rounded to two decimals.
pub fn to_export_rows<T: SummaryTable + ?Sized>(table: &T) -> ExportTable {
    let rows = table
        .cells()
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|cell| match cell {
                    SummaryCell::Text(s) => ExportValue::Text(s),
                    SummaryCell::Attribute(Some(s)) => ExportValue::Text(s),
                    SummaryCell::Attribute(None) => ExportValue::Empty,
                    SummaryCell::Count(n) => ExportValue::Integer(n),
                    SummaryCell::Fraction(f) => ExportValue::Number(to_percent(f)),
                })
                .collect()
        })
        .collect();
    ExportTable {
        headers: table.headers(),
        rows,
    }
}

/// Body returned to a caller after a successful upload.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryResponse {
    pub client_summary: ExportTable,
    pub zone_summary: ExportTable,
    pub report_key: String,
}

impl SummaryResponse {
    pub fn new(clients: &ClientSummary, zones: &ZoneSummary, report_key: impl Into<String>) -> Self {
        SummaryResponse {
            client_summary: to_export_rows(clients),
            zone_summary: to_export_rows(zones),
            report_key: report_key.into(),
        }
    }
}
