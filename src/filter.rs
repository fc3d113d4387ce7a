use crate::types::{ClientSummary, ClientSummaryRow};
use crate::util::to_percent;

/// Row filter over a client summary. Unset criteria match everything.
///
/// Filtering never touches a zone rollup; roll the filtered table up again
/// with [`crate::reports::zone_rollup`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientFilter {
    pub zone: Option<String>,
    pub client: Option<String>,
    pub state: Option<String>,
    /// Minimum Completion% on the 0..=100 scale.
    pub min_completion_pct: Option<f64>,
    pub cancelled_only: bool,
}

impl ClientFilter {
    pub fn is_empty(&self) -> bool {
        self.zone.is_none()
            && self.client.is_none()
            && self.state.is_none()
            && self.min_completion_pct.is_none()
            && !self.cancelled_only
    }

    pub fn matches(&self, row: &ClientSummaryRow) -> bool {
        if let Some(zone) = &self.zone {
            if &row.zone != zone {
                return false;
            }
        }
        if let Some(client) = &self.client {
            if &row.client_name != client {
                return false;
            }
        }
        if let Some(state) = &self.state {
            if row.state.as_ref() != Some(state) {
                return false;
            }
        }
        if let Some(min) = self.min_completion_pct {
            if to_percent(row.completion()) < min {
                return false;
            }
        }
        !(self.cancelled_only && row.counts.cancelled == 0)
    }

    /// Copy of `table` holding only matching rows. Column layout is kept.
    pub fn apply(&self, table: &ClientSummary) -> ClientSummary {
        ClientSummary {
            extra_statuses: table.extra_statuses.clone(),
            has_state: table.has_state,
            has_tier: table.has_tier,
            rows: table
                .rows
                .iter()
                .filter(|row| self.matches(row))
                .cloned()
                .collect(),
        }
    }
}
