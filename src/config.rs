use std::net::SocketAddr;

use anyhow::Context;

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,
    pub omdb_api_key: Option<String>,
    pub omdb_base_url: String,
    pub omdb_rps: u32,
    pub admin_api_key: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 =
            std::env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().context("PORT")?;

        let omdb_api_key = std::env::var("OMDB_API_KEY").ok().filter(|s| !s.trim().is_empty());
        let omdb_base_url = std::env::var("OMDB_BASE_URL")
            .unwrap_or_else(|_| "http://www.omdbapi.com".to_string());

        let omdb_rps: u32 =
            std::env::var("OMDB_RPS").ok().and_then(|s| s.parse().ok()).unwrap_or(4);

        let admin_api_key =
            std::env::var("ADMIN_API_KEY").unwrap_or_else(|_| "letmein".to_string());

        Ok(Self {
            addr: format!("{host}:{port}").parse().context("HOST/PORT")?,
            database_url: database_url_from_env(),
            omdb_api_key,
            omdb_base_url,
            omdb_rps,
            admin_api_key,
        })
    }
}

// DATABASE_URL wins outright; DB_* parts assemble a Postgres URL for managed
// deployments; otherwise fall back to a local sqlite file.
fn database_url_from_env() -> String {
    if let Ok(url) = std::env::var("DATABASE_URL") {
        return url;
    }

    if let Ok(db_host) = std::env::var("DB_HOST") {
        let db_user = std::env::var("DB_USER").unwrap_or_else(|_| "postgres".to_string());
        let db_pass = std::env::var("DB_PASS").unwrap_or_else(|_| "".to_string());
        let db_name = std::env::var("DB_NAME").unwrap_or_else(|_| "movies_api".to_string());
        return format!("postgres://{db_user}:{db_pass}@{db_host}/{db_name}");
    }

    "sqlite://movies.db?mode=rwc".to_string()
}
