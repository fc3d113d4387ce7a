use crate::error::{ReportError, Result};
use crate::types::{CellValue, RawTable};
use calamine::{Data, Range, Reader, Xls, Xlsx};
use csv::ReaderBuilder;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;
use tracing::{debug, info};

/// Field spellings read as missing in delimited text. Every other field is
/// kept verbatim as text so identifiers like `007` survive.
const NA_TOKENS: [&str; 11] = [
    "", "NA", "N/A", "n/a", "NaN", "nan", "NULL", "null", "None", "#N/A", "<NA>",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Xlsx,
    Xls,
}

impl SourceFormat {
    pub fn from_extension(ext: &str) -> Result<Self> {
        match ext.trim_start_matches('.').to_lowercase().as_str() {
            "csv" => Ok(SourceFormat::Csv),
            "xlsx" => Ok(SourceFormat::Xlsx),
            "xls" => Ok(SourceFormat::Xls),
            _ => Err(ReportError::UnsupportedFormat(format!(".{}", ext.trim_start_matches('.')))),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        Self::from_extension(ext)
    }
}

/// Read the file at `path`, picking the parser from its extension.
pub fn load_table(path: &Path) -> Result<RawTable> {
    let format = SourceFormat::from_path(path)?;
    let file = BufReader::new(File::open(path)?);
    let table = match format {
        SourceFormat::Csv => read_csv(file)?,
        SourceFormat::Xlsx | SourceFormat::Xls => read_spreadsheet(file, format)?,
    };
    info!(
        path = %path.display(),
        rows = table.len(),
        columns = table.columns().len(),
        "loaded table"
    );
    Ok(table)
}

/// Parse an in-memory upload.
pub fn read_table(bytes: &[u8], format: SourceFormat) -> Result<RawTable> {
    match format {
        SourceFormat::Csv => read_csv(bytes),
        SourceFormat::Xlsx | SourceFormat::Xls => read_spreadsheet(Cursor::new(bytes), format),
    }
}

fn parse_field(field: &str) -> CellValue {
    if NA_TOKENS.contains(&field) {
        return CellValue::Empty;
    }
    CellValue::Text(field.to_string())
}

fn header_name(raw: &str, idx: usize) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        format!("column_{}", idx + 1)
    } else {
        trimmed.to_string()
    }
}

/// Stream delimited text record by record. The first record is the header.
fn read_csv<R: Read>(reader: R) -> Result<RawTable> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers: Vec<String> = rdr
        .headers()?
        .iter()
        .enumerate()
        .map(|(idx, h)| header_name(h, idx))
        .collect();
    let mut table = RawTable::new(headers);
    for result in rdr.records() {
        let record = result?;
        table.push_row(record.iter().map(parse_field).collect());
    }
    debug!(rows = table.len(), "parsed delimited text");
    Ok(table)
}

fn spreadsheet_err<E: fmt::Display>(e: E) -> ReportError {
    ReportError::Spreadsheet(e.to_string())
}

fn first_sheet<RS, R>(mut workbook: R) -> Result<Range<Data>>
where
    RS: Read + Seek,
    R: Reader<RS>,
    R::Error: fmt::Display,
{
    workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ReportError::Spreadsheet("workbook has no worksheets".to_string()))?
        .map_err(spreadsheet_err)
}

fn cell_from_data(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) if s.is_empty() => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        other => CellValue::Text(other.to_string()),
    }
}

/// Read the first worksheet; its first row supplies the column names.
fn read_spreadsheet<RS: Read + Seek>(reader: RS, format: SourceFormat) -> Result<RawTable> {
    let range = match format {
        SourceFormat::Xls => first_sheet::<RS, _>(Xls::new(reader).map_err(spreadsheet_err)?)?,
        _ => first_sheet::<RS, _>(Xlsx::new(reader).map_err(spreadsheet_err)?)?,
    };

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header) => header
            .iter()
            .enumerate()
            .map(|(idx, cell)| header_name(&cell.to_string(), idx))
            .collect(),
        None => Vec::new(),
    };
    let mut table = RawTable::new(headers);
    for row in rows {
        table.push_row(row.iter().map(cell_from_data).collect());
    }
    debug!(rows = table.len(), "parsed worksheet");
    Ok(table)
}
