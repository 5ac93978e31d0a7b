use crate::config::AppConfig;
use crate::geoip::{IpApiClient, IpLookup};
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
    pub geoip: Arc<dyn IpLookup>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let db = crate::db::connect(&config).await?;

        let geoip = Arc::new(IpApiClient::new(&config.ip_api_url)?) as Arc<dyn IpLookup>;

        Ok(Self { db, config, geoip })
    }

    pub fn from_parts(db: SqlitePool, config: Arc<AppConfig>, geoip: Arc<dyn IpLookup>) -> Self {
        Self { db, config, geoip }
    }
}
