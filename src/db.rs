use std::time::Duration;

use anyhow::Context;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

use crate::config::AppConfig;

const CREATE_USERS_TABLE: &str = "\
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    birthDate TEXT NOT NULL,
    fullName TEXT NOT NULL
)";

/// One-time store setup: verify the primary is reachable, open the local
/// replica file and make sure the schema exists.
///
/// Every failure here is fatal to startup; the service cannot operate
/// without its store. Replication of the local file to the primary is
/// operated outside this process.
pub async fn connect(config: &AppConfig) -> anyhow::Result<SqlitePool> {
    info!(
        db_name = %config.db_name,
        primary_url = %config.primary_url,
        token_len = config.auth_token.len(),
        "store configuration"
    );

    probe_primary(config)
        .await
        .context("primary store is unreachable")?;

    std::fs::create_dir_all(&config.data_dir)
        .with_context(|| format!("create data dir {}", config.data_dir.display()))?;
    let path = config.data_dir.join(&config.db_name);
    info!(path = %path.display(), "opening local replica");

    let options = SqliteConnectOptions::new()
        .filename(&path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await
        .context("open local replica database")?;

    ensure_schema(&pool).await?;
    info!("database ready");

    Ok(pool)
}

/// Idempotent schema bootstrap; calling it on an already-initialized store
/// is a no-op.
pub async fn ensure_schema(pool: &SqlitePool) -> anyhow::Result<()> {
    sqlx::query(CREATE_USERS_TABLE)
        .execute(pool)
        .await
        .context("create users table")?;
    Ok(())
}

/// Liveness check against the primary endpoint, bounded at 30 seconds.
///
/// The primary sits behind a `libsql://` or `https://` URL and answers
/// `/health` without touching data.
async fn probe_primary(config: &AppConfig) -> anyhow::Result<()> {
    let base = config.primary_url.replacen("libsql://", "https://", 1);
    let url = format!("{}/health", base.trim_end_matches('/'));

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .context("build probe client")?;

    let response = client
        .get(&url)
        .bearer_auth(&config.auth_token)
        .send()
        .await
        .with_context(|| format!("ping {url}"))?;

    if !response.status().is_success() {
        anyhow::bail!("primary answered {} on {url}", response.status());
    }
    Ok(())
}
