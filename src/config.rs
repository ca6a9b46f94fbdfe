use anyhow::Context;
use std::str::FromStr;

const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

#[derive(Debug)]
pub struct Config {
    database_url: String,
    server_host: String,
    server_port: u16,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = load_env("DATABASE_URL")?;
        let server_host = load_env_or("SERVER_HOST", DEFAULT_SERVER_HOST.to_string())?;
        let server_port = load_env("SERVER_PORT")?;
        Ok(Self {
            database_url,
            server_host,
            server_port,
        })
    }

    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    #[must_use]
    pub fn server_host(&self) -> &str {
        &self.server_host
    }

    #[must_use]
    pub const fn server_port(&self) -> u16 {
        self.server_port
    }
}

fn load_env<T>(key: &str) -> anyhow::Result<T>
where
    T: FromStr,
    <T as FromStr>::Err: std::error::Error + Send + Sync + 'static,
{
    let val =
        std::env::var(key).with_context(|| format!("Failed to load environment variable {key}"))?;
    val.parse::<T>()
        .with_context(|| format!("Failed to parse environment variable {key}"))
}

fn load_env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    <T as FromStr>::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(val) => val
            .parse::<T>()
            .with_context(|| format!("Failed to parse environment variable {key}")),
        Err(std::env::VarError::NotPresent) => Ok(default),
        Err(err) => {
            Err(err).with_context(|| format!("Failed to load environment variable {key}"))
        }
    }
}
