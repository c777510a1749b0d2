use anyhow::Result;
use dotenvy::dotenv;
use serde::Deserialize;
use std::env;

#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    pub server: ServerConfig,
    pub accounts_api: AccountsApiConfig,
    pub service_name: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Deserialize, Clone, Debug)]
pub struct AccountsApiConfig {
    /// Base URL of the accounts REST API this service fronts.
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let host = env::var("BACKOFFICE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("BACKOFFICE_PORT")
            .unwrap_or_else(|_| "8085".to_string())
            .parse()?;

        let base_url =
            env::var("ACCOUNTS_API_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
        let timeout_seconds = env::var("ACCOUNTS_API_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()?;

        Ok(Self {
            server: ServerConfig { host, port },
            accounts_api: AccountsApiConfig {
                base_url,
                timeout_seconds,
            },
            service_name: "accounts-backoffice".to_string(),
        })
    }
}
