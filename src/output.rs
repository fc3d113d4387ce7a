use crate::error::Result;
use crate::export::{to_export_rows, ExportTable, ExportValue};
use crate::types::{ClientSummary, RawTable, ZoneSummary};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use serde::Serialize;
use std::path::Path;
use tabled::{builder::Builder, settings::Style};

pub const RAW_SHEET: &str = "Raw";
pub const CLIENT_SHEET: &str = "Client Summary";
pub const ZONE_SHEET: &str = "Zone Summary";

pub fn write_csv(path: &Path, table: &ExportTable) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(&table.headers)?;
    for row in &table.rows {
        wtr.write_record(row.iter().map(ExportValue::to_display))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

fn write_sheet(
    sheet: &mut Worksheet,
    name: &str,
    table: &ExportTable,
    header_format: &Format,
) -> std::result::Result<(), XlsxError> {
    sheet.set_name(name)?;
    for (col, header) in table.headers.iter().enumerate() {
        let col = u16::try_from(col).map_err(|_| XlsxError::RowColumnLimitError)?;
        sheet.write_string_with_format(0, col, header, header_format)?;
    }
    for (idx, row) in table.rows.iter().enumerate() {
        let r = u32::try_from(idx + 1).map_err(|_| XlsxError::RowColumnLimitError)?;
        for (col, value) in row.iter().enumerate() {
            let col = u16::try_from(col).map_err(|_| XlsxError::RowColumnLimitError)?;
            match value {
                ExportValue::Empty => {}
                ExportValue::Integer(n) => {
                    sheet.write_number(r, col, *n as f64)?;
                }
                ExportValue::Number(n) => {
                    sheet.write_number(r, col, *n)?;
                }
                ExportValue::Text(s) => {
                    sheet.write_string(r, col, s)?;
                }
            }
        }
    }
    Ok(())
}

/// Build the downloadable workbook: the input as read, then both summaries
/// formatted through [`to_export_rows`].
pub fn build_workbook(raw: &RawTable, clients: &ClientSummary, zones: &ZoneSummary) -> Result<Vec<u8>> {
    let header_format = Format::new().set_bold();
    let mut workbook = Workbook::new();

    let sheets = [
        (RAW_SHEET, ExportTable::from_raw(raw)),
        (CLIENT_SHEET, to_export_rows(clients)),
        (ZONE_SHEET, to_export_rows(zones)),
    ];
    for (name, table) in &sheets {
        let sheet = workbook.add_worksheet();
        write_sheet(sheet, name, table, &header_format)?;
    }

    Ok(workbook.save_to_buffer()?)
}

/// Markdown rendering of the first `max_rows` rows, or `None` when there is
/// nothing to show.
pub fn render_preview(table: &ExportTable, max_rows: usize) -> Option<String> {
    if table.is_empty() || max_rows == 0 {
        return None;
    }
    let mut builder = Builder::default();
    builder.push_record(table.headers.iter().cloned());
    for row in table.rows.iter().take(max_rows) {
        builder.push_record(row.iter().map(ExportValue::to_display));
    }
    let mut rendered = builder.build();
    rendered.with(Style::markdown());
    Some(rendered.to_string())
}

pub fn preview_table_rows(table: &ExportTable, max_rows: usize) {
    match render_preview(table, max_rows) {
        Some(table_str) => println!("{}\n", table_str),
        None => println!("(no rows)\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{read_table, SourceFormat};
    use crate::reports::compute_summaries;
    use crate::types::CellValue;

    fn sample() -> RawTable {
        RawTable::from_text_rows(
            &["zone", "client", "status"],
            &[
                &["N", "Acme", "completed"],
                &["N", "Acme", "pending"],
                &["S", "Beta", "hold"],
            ],
        )
    }

    #[test]
    fn workbook_starts_with_raw_sheet() {
        let raw = sample();
        let (clients, zones) = compute_summaries(&raw).unwrap();
        let bytes = build_workbook(&raw, &clients, &zones).unwrap();
        assert!(bytes.starts_with(b"PK"));

        let reread = read_table(&bytes, SourceFormat::Xlsx).unwrap();
        assert_eq!(reread.columns(), raw.columns());
        assert_eq!(reread.len(), 3);
        assert_eq!(reread.rows()[2][2], CellValue::Text("hold".into()));
    }

    #[test]
    fn preview_is_markdown_and_limited() {
        let raw = sample();
        let (clients, _) = compute_summaries(&raw).unwrap();
        let rendered = render_preview(&to_export_rows(&clients), 1).unwrap();
        assert!(rendered.contains("| Zone"));
        assert!(rendered.contains("Acme"));
        assert!(!rendered.contains("Beta"));
        assert!(render_preview(&ExportTable::default(), 5).is_none());
    }

    #[test]
    fn csv_export_writes_scaled_completion() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clients.csv");
        let raw = sample();
        let (clients, _) = compute_summaries(&raw).unwrap();
        write_csv(&path, &to_export_rows(&clients)).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("Zone,Client Name,Cancelled,Completed,HOLD,Pending,Grand Total,Completion%")
        );
        assert_eq!(lines.next(), Some("N,Acme,0,1,0,1,2,50"));
    }
}
