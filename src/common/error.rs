// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Erros da camada de dados (leitura das tabelas CSV)
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Tabela '{table}' indisponível: {source}")]
    DataUnavailable {
        table: &'static str,
        #[source]
        source: csv::Error,
    },

    #[error("Tabela '{table}' sem a coluna obrigatória '{column}'")]
    MissingColumn {
        table: &'static str,
        column: &'static str,
    },

    #[error("Timestamp mal formatado: '{0}'")]
    MalformedTimestamp(String),
}

// Erros da agregação do relatório
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReportError {
    #[error("Divisão por zero ao calcular '{metric}'")]
    DivisionByZeroInAggregate { metric: &'static str },

    #[error("Estouro numérico ao calcular '{metric}'")]
    Overflow { metric: &'static str },
}

// Nosso tipo de erro para a camada HTTP, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Formato de data inválido")]
    InvalidDateFormat,

    #[error("Dados indisponíveis: {0}")]
    DataUnavailable(#[from] DatasetError),

    #[error("Erro ao montar o relatório: {0}")]
    ReportError(#[from] ReportError),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // O cliente precisa saber como corrigir a data, então devolvemos um exemplo.
            AppError::InvalidDateFormat => {
                let body = Json(json!({
                    "error": "Invalid date format",
                    "message": "Date is in the wrong format, please retry with YYYY-MM-DD.",
                    "example": "2023-01-31",
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            ref e @ AppError::DataUnavailable(_) => {
                tracing::error!("Fonte de dados indisponível: {}", e);
                (StatusCode::SERVICE_UNAVAILABLE, "Report data is currently unavailable.")
            }

            // Todos os outros erros (ReportError, InternalServerError) viram 500.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "An unexpected error occurred.")
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
