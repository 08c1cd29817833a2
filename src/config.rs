use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    /// Base URL embedded in verification links sent to new accounts.
    pub verification_base_url: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let max_connections = std::env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);
        let verification_base_url = std::env::var("VERIFICATION_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8080/verify".into());
        Ok(Self {
            database_url,
            max_connections,
            verification_base_url,
        })
    }
}
