// src/services/report_service.rs

use chrono::NaiveDate;

use crate::{
    common::error::AppError,
    db::DatasetRepository,
    models::report::DailyReport,
    services::report_builder,
};

#[derive(Clone)]
pub struct ReportService {
    repo: DatasetRepository,
}

impl ReportService {
    pub fn new(repo: DatasetRepository) -> Self {
        Self { repo }
    }

    /// Carrega as tabelas, filtra pelo dia e monta o relatório.
    /// Dia sem pedidos não é erro: devolve `DailyReport::NoRecords`.
    pub async fn get_daily_report(&self, date: NaiveDate) -> Result<DailyReport, AppError> {
        let dataset = self.repo.load_async().await?;
        let view = dataset.filter_to_date(date);

        if view.is_empty() {
            tracing::info!("Nenhum pedido em {}", date);
            return Ok(DailyReport::NoRecords);
        }

        let metrics = report_builder::build_report(&view)?;

        tracing::info!(
            orders = view.orders.len(),
            order_lines = view.order_lines.len(),
            "Relatório de {} gerado",
            view.date
        );

        Ok(DailyReport::Report(metrics))
    }
}
