// Whole-system network throughput model

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkRates {
    pub download_mbps: f64,
    pub upload_mbps: f64,
}
