// src/models/report.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const NO_RECORDS_MESSAGE: &str = "There are no records available for the specified date.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommissionSummary {
    #[schema(example = 17.35)]
    pub total: Decimal,
    #[schema(example = 5.78)]
    pub order_average: Decimal,
}

// O relatório do dia, na ordem em que o cliente espera os campos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    #[schema(example = 3)]
    pub customers: u64,
    #[schema(example = 7.0)]
    pub total_discount_amount: Decimal,
    #[schema(example = 10)]
    pub items: u64,
    #[schema(example = 41.0)]
    pub order_total_avg: Decimal,
    #[schema(example = 0.15)]
    pub discount_rate_avg: Decimal,
    pub commissions: CommissionSummary,
}

// Resultado de pedir o relatório de um dia.
#[derive(Debug, Clone, PartialEq)]
pub enum DailyReport {
    Report(Metrics),
    NoRecords,
}
