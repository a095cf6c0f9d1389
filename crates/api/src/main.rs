use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use hotcoffee_api::app::{self, services};
use hotcoffee_api::cli::Cli;
use hotcoffee_infra::{DatabaseConfig, db};

#[tokio::main]
async fn main() {
    hotcoffee_observability::init();

    let cli = Cli::parse();
    let Some(port) = cli.listen_port() else {
        eprintln!("Invalid port");
        std::process::exit(1);
    };

    if let Err(e) = run(port, cli.in_memory).await {
        tracing::error!(error = %format!("{e:#}"), "failed to start program");
        std::process::exit(1);
    }
}

async fn run(port: u16, in_memory: bool) -> anyhow::Result<()> {
    let services = if in_memory {
        services::build_in_memory_services()
    } else {
        let config = DatabaseConfig::from_env().context("failed to read database configuration")?;
        let pool = db::connect(&config)
            .await
            .with_context(|| format!("failed to connect to {}", config.redacted_url()))?;
        services::build_persistent_services(pool)
    };

    let app = app::build_app(Arc::new(services));

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("failed to bind 0.0.0.0:{port}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
