// src/config.rs
use crate::error::{AppError, AppResult};
use std::{net::SocketAddr, path::PathBuf, time::Duration};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_BLOB_PATH: &str = "db/db.json";
const DEFAULT_SEED_PATH: &str = "data/db.seed.json";
const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Configuração lida das variáveis de ambiente.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    /// Documento JSON persistido com a coleção de operações.
    pub blob_path: PathBuf,
    /// Semente usada enquanto o blob ainda não existe.
    pub seed_path: PathBuf,
    /// Base da API consumida pelo cliente HTTP.
    pub api_base_url: String,
    pub http_timeout: Duration,
}

impl Config {
    /// Lê o ambiente do processo; o `.env` já foi carregado em `main`.
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Constrói a configuração a partir de uma função de consulta (facilita testes).
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let bind_raw = get("BIND_ADDR", DEFAULT_BIND_ADDR);
        let bind_addr = bind_raw
            .parse::<SocketAddr>()
            .map_err(|e| AppError::Config(format!("BIND_ADDR inválido '{}': {}", bind_raw, e)))?;

        let timeout_raw = get("HTTP_TIMEOUT_SECS", &DEFAULT_HTTP_TIMEOUT_SECS.to_string());
        let timeout_secs = timeout_raw.parse::<u64>().map_err(|e| {
            AppError::Config(format!("HTTP_TIMEOUT_SECS inválido '{}': {}", timeout_raw, e))
        })?;

        Ok(Config {
            bind_addr,
            blob_path: PathBuf::from(get("BLOB_PATH", DEFAULT_BLOB_PATH)),
            seed_path: PathBuf::from(get("SEED_PATH", DEFAULT_SEED_PATH)),
            api_base_url: get("API_BASE_URL", DEFAULT_API_BASE_URL),
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.blob_path, PathBuf::from("db/db.json"));
        assert_eq!(config.http_timeout, Duration::from_secs(30));
    }

    #[test]
    fn overrides_from_environment() {
        let config = Config::from_lookup(lookup(&[
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("BLOB_PATH", "/tmp/ops.json"),
            ("HTTP_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.blob_path, PathBuf::from("/tmp/ops.json"));
        assert_eq!(config.http_timeout, Duration::from_secs(5));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            Config::from_lookup(lookup(&[("BIND_ADDR", "porta-errada")])),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[("HTTP_TIMEOUT_SECS", "-1")])),
            Err(AppError::Config(_))
        ));
    }
}
