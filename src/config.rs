// src/config.rs

use crate::{db::DatasetRepository, services::report_service::ReportService};
use anyhow::Context;
use std::{env, net::SocketAddr, path::PathBuf};

const DEFAULT_BIND_ADDR: ([u8; 4], u16) = ([0, 0, 0, 0], 8000);

#[derive(Clone)]
pub struct AppState {
    pub report_service: ReportService,
}

impl AppState {
    pub fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let data_dir = PathBuf::from(env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()));

        if !data_dir.is_dir() {
            // Não impede o servidor de subir: cada requisição responde 503 até os arquivos existirem.
            tracing::warn!("⚠️ Diretório de dados {} não encontrado", data_dir.display());
        }

        Ok(Self::from_data_dir(data_dir))
    }

    // Monta o gráfico de dependências a partir do diretório dos CSVs
    pub fn from_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        let repo = DatasetRepository::new(data_dir);
        tracing::info!("✅ Tabelas serão lidas de {}", repo.data_dir().display());

        Self {
            report_service: ReportService::new(repo),
        }
    }
}

/// Endereço do servidor, lido de `BIND_ADDR` (padrão `0.0.0.0:8000`).
pub fn bind_addr() -> anyhow::Result<SocketAddr> {
    parse_bind_addr(env::var("BIND_ADDR").ok())
}

fn parse_bind_addr(value: Option<String>) -> anyhow::Result<SocketAddr> {
    match value {
        Some(addr) => addr
            .parse()
            .with_context(|| format!("BIND_ADDR inválido: {addr}")),
        None => Ok(SocketAddr::from(DEFAULT_BIND_ADDR)),
    }
}
