use std::net::IpAddr;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env_required("DATABASE_URL")?;

        let host: IpAddr = env_or("ACCOUNTD_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid ACCOUNTD_HOST: {e}"))?;

        let port: u16 = env_or("ACCOUNTD_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid ACCOUNTD_PORT: {e}"))?;

        let log_level = env_or("ACCOUNTD_LOG_LEVEL", "info");

        Ok(Config {
            database_url,
            host,
            port,
            log_level,
        })
    }
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
