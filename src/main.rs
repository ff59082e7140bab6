//src/main.rs

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod models;
mod services;

use crate::config::AppState;
use crate::docs::ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // O .env precisa ser lido antes do logger para o RUST_LOG valer.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let app_state = AppState::new()?;

    let listener = TcpListener::bind(config::bind_addr()?).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);

    axum::serve(listener, app(app_state)).await?;

    Ok(())
}

// Combina tudo no router principal
fn app(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::report::root))
        .route("/api/health", get(|| async { "OK" }))
        // O cliente antigo chama com a barra no final.
        .route("/get_report/", get(handlers::report::get_report))
        .route("/get_report", get(handlers::report::get_report))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state)
}
