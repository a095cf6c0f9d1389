//! Database adapters (connection pool).

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::config::DatabaseConfig;

const MAX_CONNECTIONS: u32 = 10;

/// Open a pool and verify the server answers before handing it out.
#[tracing::instrument(skip(config), fields(database = %config.redacted_url()), err)]
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect_with(config.connect_options())
        .await?;

    ping(&pool).await?;
    tracing::info!("connected to postgres");
    Ok(pool)
}

pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await.map(|_| ())
}
