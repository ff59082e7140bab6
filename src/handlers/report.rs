// src/handlers/report.rs

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use serde_json::json;
use utoipa::IntoParams;

use crate::{
    common::error::AppError,
    config::AppState,
    models::report::{DailyReport, Metrics, NO_RECORDS_MESSAGE},
};

/// Aceita só `YYYY-MM-DD` com quatro, dois e dois dígitos, e uma data que existe no calendário.
pub fn parse_report_date(value: &str) -> Option<NaiveDate> {
    let well_formed = value.len() == 10
        && value
            .bytes()
            .enumerate()
            .all(|(i, b)| if i == 4 || i == 7 { b == b'-' } else { b.is_ascii_digit() });

    if !well_formed {
        return None;
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

// A data é validada uma única vez, aqui: valor inválido vira rejeição da Query.
fn deserialize_report_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_report_date(&raw)
        .map(Some)
        .ok_or_else(|| serde::de::Error::custom(format!("data fora do formato YYYY-MM-DD: '{raw}'")))
}

// ---
// Query: ?date=YYYY-MM-DD
// ---
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReportQuery {
    /// Dia do relatório
    #[serde(default, deserialize_with = "deserialize_report_date")]
    #[param(value_type = Option<String>, format = Date, example = "2019-08-01")]
    pub date: Option<NaiveDate>,
}

// GET /
#[utoipa::path(
    get,
    path = "/",
    tag = "Report",
    responses(
        (status = 200, description = "Mensagem de boas-vindas")
    )
)]
pub async fn root() -> impl IntoResponse {
    Json(json!({ "message": "Hello World" }))
}

// GET /get_report/?date=YYYY-MM-DD
#[utoipa::path(
    get,
    path = "/get_report/",
    tag = "Report",
    params(ReportQuery),
    responses(
        (status = 200, description = "Relatório do dia, ou a mensagem de dia sem registros", body = Metrics),
        (status = 400, description = "Data ausente ou fora do formato YYYY-MM-DD"),
        (status = 503, description = "Tabelas de dados indisponíveis")
    )
)]
pub async fn get_report(
    State(app_state): State<AppState>,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> Result<Response, AppError> {
    // Data mal formada (rejeição da Query) e data ausente recebem a mesma resposta 400.
    let Query(query) = query.map_err(|_| AppError::InvalidDateFormat)?;
    let date = query.date.ok_or(AppError::InvalidDateFormat)?;

    let report = app_state.report_service.get_daily_report(date).await?;

    let response = match report {
        DailyReport::Report(metrics) => (StatusCode::OK, Json(metrics)).into_response(),
        DailyReport::NoRecords => (StatusCode::OK, Json(NO_RECORDS_MESSAGE)).into_response(),
    };

    Ok(response)
}
