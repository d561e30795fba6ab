use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => AppEnv::Development,
            _ => AppEnv::Production,
        }
    }

    pub fn is_development(self) -> bool {
        self == AppEnv::Development
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub env: AppEnv,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests don't touch
    /// the process environment.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = match lookup("DATABASE_URL") {
            Some(url) => url,
            None => database_url_from_parts(&lookup)?,
        };

        let env = lookup("APP_ENV")
            .or_else(|| lookup("FLASK_ENV"))
            .map(|v| AppEnv::parse(&v))
            .unwrap_or(AppEnv::Production);

        let port = match lookup("APP_PORT") {
            Some(v) => v.parse::<u16>().context("APP_PORT must be a port number")?,
            None => 8080,
        };

        Ok(Self {
            database_url,
            db_max_connections: lookup("DB_MAX_CONNECTIONS")
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(10),
            env,
            host: lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
        })
    }
}

fn database_url_from_parts<F>(lookup: &F) -> anyhow::Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let host = lookup("DB_HOST").unwrap_or_else(|| "localhost".into());
    let port = lookup("DB_PORT").unwrap_or_else(|| "5432".into());
    let user = lookup("DB_USER").context("DATABASE_URL or DB_USER must be set")?;
    let name = lookup("DB_NAME").context("DATABASE_URL or DB_NAME must be set")?;

    let mut url = url::Url::parse(&format!("postgres://{host}:{port}"))
        .context("DB_HOST/DB_PORT do not form a valid address")?;
    url.set_path(&format!("/{name}"));
    url.set_username(&user)
        .map_err(|_| anyhow::anyhow!("DB_USER cannot be used in a connection url"))?;
    if let Some(password) = lookup("DB_PASSWORD") {
        url.set_password(Some(&password))
            .map_err(|_| anyhow::anyhow!("DB_PASSWORD cannot be used in a connection url"))?;
    }
    Ok(url.to_string())
}
