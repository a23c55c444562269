// Per-sub-metric collection result

use serde::{Deserialize, Serialize};

/// Outcome of one sub-metric collection within a tick.
///
/// `Unavailable` means the metric family cannot be measured on this host
/// (e.g. no GPU driver) and renders as an explicit "no data" placeholder;
/// `Failed` is a transient collection error for this tick only. The two are
/// deliberately distinct so consumers never confuse "truly zero" with
/// "not measured".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "camelCase")]
pub enum Metric<T> {
    Ready(T),
    Unavailable,
    Failed(String),
}

impl<T> Metric<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Metric::Ready(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Metric::Ready(_))
    }

    /// Collapse an `anyhow` collection result into a tick-level metric.
    pub fn from_result(result: anyhow::Result<T>) -> Self {
        match result {
            Ok(v) => Metric::Ready(v),
            Err(e) => Metric::Failed(e.to_string()),
        }
    }
}
