//! Configuración del servidor.
//!
//! Se carga `.env` (si existe) y luego las variables de entorno:
//! `SCULPTOR_BIND`, `PORT`, `SCULPTOR_CATALOG`, `SCULPTOR_DATA_DIR`,
//! `SCULPTOR_STRATEGY` y `SCULPTOR_SEED`.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

use crate::models::SelectionStrategy;

pub const DEFAULT_BIND: &str = "127.0.0.1:8080";
pub const DEFAULT_CATALOG: &str = "catalog.json";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid bind address '{0}'")]
    InvalidBind(String),

    #[error("invalid PORT '{0}'")]
    InvalidPort(String),

    #[error("invalid SCULPTOR_STRATEGY: {0}")]
    InvalidStrategy(String),

    #[error("invalid SCULPTOR_SEED '{0}'")]
    InvalidSeed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub bind: SocketAddr,
    /// Nombre o ruta del catálogo (se resuelve con `catalog::resolve_catalog_path`).
    pub catalog: String,
    pub data_dir: Option<PathBuf>,
    /// Estrategia por defecto cuando la solicitud no indica una.
    pub strategy: SelectionStrategy,
    /// Semilla fija para despliegues que necesiten planes reproducibles.
    pub seed: Option<u64>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenv::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Construye la configuración desde una función de búsqueda (inyectable en tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_raw = get("SCULPTOR_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let mut bind: SocketAddr = bind_raw.parse().map_err(|_| ConfigError::InvalidBind(bind_raw.clone()))?;
        if let Some(port) = get("PORT") {
            let p: u16 = port.parse().map_err(|_| ConfigError::InvalidPort(port.clone()))?;
            bind.set_port(p);
        }

        let strategy = match get("SCULPTOR_STRATEGY") {
            Some(s) => s.parse().map_err(ConfigError::InvalidStrategy)?,
            None => SelectionStrategy::default(),
        };

        let seed = match get("SCULPTOR_SEED") {
            Some(s) => Some(s.parse::<u64>().map_err(|_| ConfigError::InvalidSeed(s.clone()))?),
            None => None,
        };

        Ok(AppConfig {
            bind,
            catalog: get("SCULPTOR_CATALOG").unwrap_or_else(|| DEFAULT_CATALOG.to_string()),
            data_dir: get("SCULPTOR_DATA_DIR").map(PathBuf::from),
            strategy,
            seed,
        })
    }
}
