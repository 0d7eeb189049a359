//! Errores de sesión y configuración.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session store io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("session record is not valid json: {0}")]
    Corrupt(#[from] serde_json::Error),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing config key {0}")]
    Missing(String),
    #[error("invalid value for {key}: {value}")]
    Invalid { key: String, value: String },
}
