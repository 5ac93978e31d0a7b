use std::path::PathBuf;

use anyhow::bail;

/// Runtime configuration, loaded once at startup.
///
/// The store triple (`DB_NAME`, `PRIMARY_URL`, `AUTH_TOKEN`) is required;
/// a missing or empty value is a startup failure, not something the service
/// can recover from later.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_name: String,
    pub primary_url: String,
    pub auth_token: String,
    pub data_dir: PathBuf,
    pub ip_api_url: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let db_name = required("DB_NAME")?;
        let primary_url = required("PRIMARY_URL")?;
        let auth_token = required("AUTH_TOKEN")?;

        let data_dir = std::env::var("DATA_DIR")
            .unwrap_or_else(|_| "./data".into())
            .into();
        let ip_api_url = std::env::var("IP_API_URL")
            .unwrap_or_else(|_| "https://api.ipquery.io".into());

        Ok(Self {
            db_name,
            primary_url,
            auth_token,
            data_dir,
            ip_api_url,
        })
    }
}

fn required(name: &str) -> anyhow::Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => bail!("required environment variable {name} is not set"),
    }
}
