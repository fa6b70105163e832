use std::sync::Arc;

use anyhow::Context;
use todo_web::application::todo_service::TodoServiceImpl;
use todo_web::config::Config;
use todo_web::domain::repository::TodoRepository;
use todo_web::http::routing::{self, todos};
use todo_web::http::view::View;
use todo_web::infrastructure::sqlite_repo::SqliteTodoRepository;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;
    let repo = SqliteTodoRepository::connect_with_logging(&config.database_url, config.sql_debug).await?;
    repo.init().await.context("cannot create schema")?;
    let view = View::new(config.deadline_offset).context("cannot parse templates")?;

    let service = TodoServiceImpl::new(repo);
    let todos_router = todos::router(todos::AppState {
        service,
        view: Arc::new(view),
        deadline_offset: config.deadline_offset,
    });
    let router = routing::app(todos_router);

    let addr = config.bind_addr;
    tracing::info!(%addr, sql_debug = config.sql_debug, "listening");
    axum::serve(tokio::net::TcpListener::bind(addr).await?, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal::ctrl_c;
    let _ = ctrl_c().await;
    tracing::info!("shutdown");
}
