//! Resolución de configuración por nombre.
//! `EnvConfig` lee el entorno del proceso tras cargar `.env` una sola vez;
//! las claves no secretas tienen default, los secretos no.

use std::collections::HashMap;
use std::env;
use std::str::FromStr;

use dotenvy::dotenv;
use once_cell::sync::Lazy;

use crate::error::ConfigError;

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

/// Forzar carga temprana de .env desde aplicaciones externas si se desea.
pub fn init_dotenv() {
    Lazy::force(&DOTENV_LOADED);
}

pub const GOOGLE_API_KEY: &str = "GOOGLE_API_KEY";
pub const GEMINI_API_URL: &str = "GEMINI_API_URL";
pub const DIET_ENDPOINT: &str = "DIET_ENDPOINT";
pub const DIABETES_ENDPOINT: &str = "DIABETES_ENDPOINT";
pub const INFERENCE_TIMEOUT_SECS: &str = "INFERENCE_TIMEOUT_SECS";
pub const SESSION_FILE: &str = "SESSION_FILE";
/// Bases candidatas de los clasificadores de imagen, separadas por comas.
pub const IMAGE_SERVERS: &str = "IMAGE_SERVERS";

const DEFAULTS: &[(&str, &str)] =
    &[(GEMINI_API_URL, "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent"),
      (INFERENCE_TIMEOUT_SECS, "30")];

pub trait ConfigProvider: Send + Sync {
    fn get(&self, name: &str) -> Option<String>;

    fn require(&self, name: &str) -> Result<String, ConfigError> {
        self.get(name)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::Missing(name.to_string()))
    }

    /// Lista separada por comas, sin entradas vacías.
    fn get_list(&self, name: &str) -> Vec<String> {
        self.get(name)
            .map(|raw| {
                raw.split(',')
                   .map(str::trim)
                   .filter(|s| !s.is_empty())
                   .map(str::to_string)
                   .collect()
            })
            .unwrap_or_default()
    }

    /// Entero sin signo; ausente es `Ok(None)`, mal formado es error.
    fn get_u64(&self, name: &str) -> Result<Option<u64>, ConfigError> {
        parse_value(name, self.get(name))
    }
}

fn parse_value<T: FromStr>(name: &str, raw: Option<String>) -> Result<Option<T>, ConfigError> {
    match raw {
        None => Ok(None),
        Some(value) => value.trim()
                            .parse()
                            .map(Some)
                            .map_err(|_| ConfigError::Invalid { key: name.to_string(),
                                                                value }),
    }
}

#[derive(Debug, Clone, Default)]
pub struct EnvConfig;

impl EnvConfig {
    pub fn from_env() -> Self {
        init_dotenv();
        Self
    }

    pub fn default_for(name: &str) -> Option<&'static str> {
        DEFAULTS.iter().find(|(k, _)| *k == name).map(|(_, v)| *v)
    }
}

impl ConfigProvider for EnvConfig {
    fn get(&self, name: &str) -> Option<String> {
        env::var(name).ok()
                      .or_else(|| Self::default_for(name).map(str::to_string))
    }
}

/// Config en memoria para tests y para el CLI con overrides.
#[derive(Debug, Clone, Default)]
pub struct StaticConfig {
    values: HashMap<String, String>,
}

impl StaticConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.values.insert(name.to_string(), value.to_string());
        self
    }
}

impl ConfigProvider for StaticConfig {
    fn get(&self, name: &str) -> Option<String> {
        self.values.get(name).cloned()
    }
}
