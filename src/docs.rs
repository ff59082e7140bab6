// src/docs.rs

use utoipa::OpenApi;
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Report ---
        handlers::report::root,
        handlers::report::get_report,
    ),
    components(
        schemas(
            models::report::Metrics,
            models::report::CommissionSummary,
        )
    ),
    tags(
        (name = "Report", description = "Relatório diário de vendas, descontos e comissões")
    )
)]
pub struct ApiDoc;
