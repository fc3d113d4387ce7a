//! Column aliasing, schema checks and status mapping.
//!
//! Turns a [`RawTable`] into typed [`OrderRecord`]s keyed by canonical
//! column names. Nothing here counts or groups.
use crate::error::{ReportError, Result, REQUIRED_COLUMNS};
use crate::types::{
    CellValue, RawTable, StatusCategory, CLIENT_NAME, ORDER_STATUS, STATE, TIER, ZONE,
};
use tracing::{debug, warn};

/// Canonical name for a known alias, matched case-insensitively on the
/// trimmed raw name.
pub fn canonical_alias(raw: &str) -> Option<&'static str> {
    match raw.trim().to_lowercase().as_str() {
        "zone" => Some(ZONE),
        "client" | "client_name" => Some(CLIENT_NAME),
        "order_status" | "status" => Some(ORDER_STATUS),
        "state" => Some(STATE),
        "tier" => Some(TIER),
        _ => None,
    }
}

/// Map every column to its canonical name; unknown columns pass through
/// trimmed but otherwise unchanged.
pub fn canonical_columns(columns: &[String]) -> Vec<String> {
    columns
        .iter()
        .map(|c| match canonical_alias(c) {
            Some(name) => name.to_string(),
            None => c.trim().to_string(),
        })
        .collect()
}

impl StatusCategory {
    /// Lower-case and trim, then look the value up in the alias table.
    /// Unknown values keep their trimmed original spelling.
    pub fn from_raw(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.to_lowercase().as_str() {
            "cancelled" | "canceled" => StatusCategory::Cancelled,
            "complete" | "completed" => StatusCategory::Completed,
            "hold" => StatusCategory::Hold,
            "pending" => StatusCategory::Pending,
            _ => StatusCategory::Other(trimmed.to_string()),
        }
    }
}

/// Positions of the canonical columns inside a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub zone: usize,
    pub client_name: usize,
    pub order_status: usize,
    pub state: Option<usize>,
    pub tier: Option<usize>,
}

impl ColumnMap {
    /// Resolve canonical columns, failing with every missing required name.
    pub fn resolve(columns: &[String]) -> Result<Self> {
        let canonical = canonical_columns(columns);
        let find = |name: &str| {
            let mut hits = canonical.iter().enumerate().filter(|(_, c)| *c == name);
            let first = hits.next().map(|(idx, _)| idx);
            if hits.next().is_some() {
                warn!(column = name, "several input columns map to the same name, using the first");
            }
            first
        };

        let zone = find(ZONE);
        let client_name = find(CLIENT_NAME);
        let order_status = find(ORDER_STATUS);
        match (zone, client_name, order_status) {
            (Some(zone), Some(client_name), Some(order_status)) => Ok(ColumnMap {
                zone,
                client_name,
                order_status,
                state: find(STATE),
                tier: find(TIER),
            }),
            _ => {
                let missing = REQUIRED_COLUMNS
                    .iter()
                    .zip([zone, client_name, order_status])
                    .filter(|(_, idx)| idx.is_none())
                    .map(|(name, _)| name.to_string())
                    .collect();
                Err(ReportError::SchemaValidation { missing })
            }
        }
    }
}

/// One order after coercion.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRecord {
    pub zone: String,
    pub client_name: String,
    pub status: StatusCategory,
    pub state: Option<String>,
    pub tier: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedTable {
    pub records: Vec<OrderRecord>,
    pub has_state: bool,
    pub has_tier: bool,
}

fn optional_attr(row: &[CellValue], idx: Option<usize>) -> Option<String> {
    let cell = row.get(idx?)?;
    if cell.is_missing() {
        None
    } else {
        Some(cell.to_key_string())
    }
}

/// Validate the schema and coerce every row of `table` into an [`OrderRecord`].
pub fn normalize_records(table: &RawTable) -> Result<NormalizedTable> {
    let map = ColumnMap::resolve(table.columns())?;
    debug!(?map, "resolved canonical columns");

    let key = |row: &[CellValue], idx: usize| {
        row.get(idx)
            .map(CellValue::to_key_string)
            .unwrap_or_default()
    };

    let records = table
        .rows()
        .iter()
        .map(|row| OrderRecord {
            zone: key(row, map.zone),
            client_name: key(row, map.client_name),
            status: StatusCategory::from_raw(&key(row, map.order_status)),
            state: optional_attr(row, map.state),
            tier: optional_attr(row, map.tier),
        })
        .collect();

    Ok(NormalizedTable {
        records,
        has_state: map.state.is_some(),
        has_tier: map.tier.is_some(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(cols: &[&str]) -> Vec<String> {
        cols.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn aliases_are_case_insensitive() {
        assert_eq!(
            canonical_columns(&names(&["ZONE", "client_name", "Status", "tier", "Amount"])),
            names(&["Zone", "Client Name", "Order Status", "Tier", "Amount"])
        );
        assert_eq!(canonical_alias("Client"), Some(CLIENT_NAME));
        assert_eq!(canonical_alias("Order Status"), None);
    }

    #[test]
    fn missing_columns_are_all_reported() {
        let err = ColumnMap::resolve(&names(&["Zone", "Notes"])).unwrap_err();
        match err {
            ReportError::SchemaValidation { missing } => {
                assert_eq!(missing, names(&["Client Name", "Order Status"]));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn first_duplicate_column_wins() {
        let map = ColumnMap::resolve(&names(&["status", "Zone", "client", "Order Status"])).unwrap();
        assert_eq!(map.order_status, 0);
        assert_eq!(map.state, None);
    }

    #[test]
    fn status_mapping_ignores_case_and_padding() {
        assert_eq!(StatusCategory::from_raw("Completed "), StatusCategory::Completed);
        assert_eq!(StatusCategory::from_raw("completed"), StatusCategory::Completed);
        assert_eq!(StatusCategory::from_raw("COMPLETE"), StatusCategory::Completed);
        assert_eq!(StatusCategory::from_raw("canceled"), StatusCategory::Cancelled);
        assert_eq!(StatusCategory::from_raw(" Hold"), StatusCategory::Hold);
        assert_eq!(
            StatusCategory::from_raw("  In Transit "),
            StatusCategory::Other("In Transit".to_string())
        );
    }

    #[test]
    fn missing_keys_coerce_to_empty_strings() {
        let table = RawTable::from_text_rows(
            &["zone", "client", "status", "State"],
            &[&["", " Acme ", "pending", ""], &["S", "Beta", "", "TX"]],
        );
        let normalized = normalize_records(&table).unwrap();
        assert!(normalized.has_state);
        assert!(!normalized.has_tier);

        let first = &normalized.records[0];
        assert_eq!(first.zone, "");
        assert_eq!(first.client_name, "Acme");
        assert_eq!(first.status, StatusCategory::Pending);
        assert_eq!(first.state, None);

        let second = &normalized.records[1];
        assert_eq!(second.status, StatusCategory::Other(String::new()));
        assert_eq!(second.state.as_deref(), Some("TX"));
    }
}
