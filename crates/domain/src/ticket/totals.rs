use serde::{Deserialize, Serialize};

/// Identifier of the singleton running-totals record.
pub const TOTALS_RECORD_ID: &str = "TOTALS";

/// Running weight totals, incremented atomically on every ticket creation.
///
/// Deletes and updates leave the record untouched, so the totals reflect
/// everything ever weighed in rather than the current table contents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WeightTotals {
    #[serde(rename = "totalPesoBruto")]
    pub total_peso_bruto: f64,
    #[serde(rename = "totalPesoLiquido")]
    pub total_peso_liquido: f64,
}
