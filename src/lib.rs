//! Order status summaries by zone and client.
//!
//! [`compute_summaries`] turns a raw order table into a zone x client
//! status breakdown plus a zone rollup; [`to_export_rows`] formats either
//! for a JSON response or a workbook sheet.
pub mod cache;
pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod loader;
pub mod normalize;
pub mod output;
pub mod reports;
pub mod types;
pub mod util;

pub use error::{ReportError, Result};
pub use export::{to_export_rows, ExportTable, SummaryResponse};
pub use filter::ClientFilter;
pub use reports::{client_summary, compute_summaries, zone_rollup};
pub use types::{ClientSummary, RawTable, ZoneSummary};
