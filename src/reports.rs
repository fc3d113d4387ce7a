use crate::error::Result;
use crate::normalize::{normalize_records, NormalizedTable};
use crate::types::{
    ClientSummary, ClientSummaryRow, RawTable, StatusCategory, StatusCounts, ZoneSummary,
    ZoneSummaryRow, CANCELLED, CLIENT_NAME, COMPLETED, COMPLETION, GRAND_TOTAL, HOLD, PENDING,
    STATE, TIER, ZONE,
};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info, warn};

/// Column names the summary tables always use for their own data.
const RESERVED_HEADERS: [&str; 10] = [
    ZONE,
    CLIENT_NAME,
    STATE,
    TIER,
    CANCELLED,
    COMPLETED,
    HOLD,
    PENDING,
    GRAND_TOTAL,
    COMPLETION,
];

/// Column header for an extra status. Labels clashing with a fixed header
/// or an earlier extra column get ` (status)` appended until unique.
fn extra_status_header(label: &str, taken: &[String]) -> String {
    let mut header = label.to_string();
    while RESERVED_HEADERS.contains(&header.as_str()) || taken.contains(&header) {
        header.push_str(" (status)");
    }
    header
}

/// Normalize `table`, count statuses per (Zone, Client Name) and roll the
/// result up by zone.
pub fn compute_summaries(table: &RawTable) -> Result<(ClientSummary, ZoneSummary)> {
    let normalized = normalize_records(table)?;
    if normalized.records.is_empty() {
        warn!("input has no data rows, summaries will be all zero");
    }
    let clients = client_summary(&normalized);
    let zones = zone_rollup(&clients);
    info!(
        records = normalized.records.len(),
        clients = clients.rows.len(),
        zones = zones.zone_rows().len(),
        "computed summaries"
    );
    Ok((clients, zones))
}

/// Count orders per (Zone, Client Name) in one pass over `table`.
///
/// Rows come out sorted by zone then client. Statuses outside the four
/// canonical ones become extra columns in first-seen order, zero-filled on
/// every row, renamed when they clash with a fixed column. State and Tier
/// keep the first non-missing value seen for the key.
pub fn client_summary(table: &NormalizedTable) -> ClientSummary {
    #[derive(Default)]
    struct Acc {
        counts: StatusCounts,
        state: Option<String>,
        tier: Option<String>,
    }

    let mut extra_statuses: Vec<String> = Vec::new();
    let mut extra_index: HashMap<String, usize> = HashMap::new();
    let mut map: BTreeMap<(String, String), Acc> = BTreeMap::new();

    for r in &table.records {
        let acc = map
            .entry((r.zone.clone(), r.client_name.clone()))
            .or_default();
        match &r.status {
            StatusCategory::Cancelled => acc.counts.cancelled += 1,
            StatusCategory::Completed => acc.counts.completed += 1,
            StatusCategory::Hold => acc.counts.hold += 1,
            StatusCategory::Pending => acc.counts.pending += 1,
            StatusCategory::Other(_) => {
                let label = r.status.label();
                let idx = *extra_index.entry(label.to_string()).or_insert_with(|| {
                    let header = extra_status_header(label, &extra_statuses);
                    if header != label {
                        warn!(
                            status = label,
                            column = %header,
                            "status clashes with a summary column, renamed"
                        );
                    }
                    extra_statuses.push(header);
                    extra_statuses.len() - 1
                });
                acc.counts.bump_extra(idx);
            }
        }
        if acc.state.is_none() {
            acc.state = r.state.clone();
        }
        if acc.tier.is_none() {
            acc.tier = r.tier.clone();
        }
    }
    debug!(groups = map.len(), extra = ?extra_statuses, "grouped orders");

    let width = extra_statuses.len();
    let rows = map
        .into_iter()
        .map(|((zone, client_name), mut acc)| {
            acc.counts.extra.resize(width, 0);
            ClientSummaryRow {
                zone,
                client_name,
                state: acc.state,
                tier: acc.tier,
                counts: acc.counts,
            }
        })
        .collect();

    ClientSummary {
        extra_statuses,
        has_state: table.has_state,
        has_tier: table.has_tier,
        rows,
    }
}

/// Sum client rows by zone and append a "Grand Total" row.
///
/// Completion% on every output row is recomputed from the summed counts.
/// Depends only on `clients`, so a filtered client table can be rolled up
/// again directly.
pub fn zone_rollup(clients: &ClientSummary) -> ZoneSummary {
    let width = clients.extra_statuses.len();
    let mut by_zone: BTreeMap<&str, StatusCounts> = BTreeMap::new();
    for row in &clients.rows {
        by_zone
            .entry(row.zone.as_str())
            .or_insert_with(|| StatusCounts::with_extra(width))
            .accumulate(&row.counts);
    }

    let mut total = StatusCounts::with_extra(width);
    let mut rows: Vec<ZoneSummaryRow> = Vec::with_capacity(by_zone.len() + 1);
    for (zone, counts) in by_zone {
        total.accumulate(&counts);
        rows.push(ZoneSummaryRow {
            zone: zone.to_string(),
            counts,
        });
    }
    rows.push(ZoneSummaryRow {
        zone: GRAND_TOTAL.to_string(),
        counts: total,
    });

    ZoneSummary {
        extra_statuses: clients.extra_statuses.clone(),
        rows,
    }
}
