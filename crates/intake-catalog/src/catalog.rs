//! Registro ordenado de wizards y resolución de endpoints.
use std::sync::Arc;
use std::time::Duration;

use indexmap::IndexMap;
use intake_domain::WizardDefinition;
use intake_inference::{EndpointConfig, InferenceResult, RequestShape, DEFAULT_TIMEOUT};
use intake_persistence::config::{GEMINI_API_URL, GOOGLE_API_KEY, INFERENCE_TIMEOUT_SECS};
use intake_persistence::ConfigProvider;
use log::debug;

use crate::error::CatalogError;
use crate::wizards;

/// Destino de las respuestas de un wizard.
#[derive(Debug, Clone, PartialEq)]
pub enum Backend {
    /// `generateContent` de Gemini; URL y API key desde config.
    Gemini,
    /// Backend REST propio; la URL sale de la clave de config indicada.
    Rest { url_key: &'static str },
}

#[derive(Debug, Clone)]
pub struct WizardSpec {
    pub definition: Arc<WizardDefinition>,
    pub title: &'static str,
    pub shape: RequestShape,
    pub backend: Backend,
    /// Contenido que el usuario puede aceptar si la inferencia falla.
    pub fallback: Option<InferenceResult>,
}

impl WizardSpec {
    pub fn id(&self) -> &str {
        &self.definition.id
    }

    /// Resuelve el endpoint con la config dada. Falta de URL o de API key es
    /// un `ConfigError::Missing`.
    pub fn endpoint(&self, config: &dyn ConfigProvider) -> Result<EndpointConfig, CatalogError> {
        let timeout = config.get_u64(INFERENCE_TIMEOUT_SECS)?
                            .map(Duration::from_secs)
                            .unwrap_or(DEFAULT_TIMEOUT);
        let endpoint = match &self.backend {
            Backend::Gemini => {
                let url = config.require(GEMINI_API_URL)?;
                let key = config.require(GOOGLE_API_KEY)?;
                EndpointConfig::new(self.id(), &url).gemini(&key)
            }
            Backend::Rest { url_key } => EndpointConfig::new(self.id(), &config.require(url_key)?),
        };
        let endpoint = endpoint.with_shape(self.shape.clone()).with_timeout(timeout);
        endpoint.validate()?;
        debug!("endpoint resolved wizard={} url={}", self.id(), endpoint.url);
        Ok(endpoint)
    }
}

#[derive(Debug, Clone)]
pub struct Catalog {
    entries: IndexMap<String, WizardSpec>,
}

impl Catalog {
    /// Los cuatro wizards de la app, en el orden del menú de salud.
    pub fn builtin() -> Result<Self, CatalogError> {
        let specs = [wizards::fever_flu::spec()?,
                     wizards::diet_planner::spec()?,
                     wizards::diabetes_monitor::spec()?,
                     wizards::sleep_companion::spec()?];
        Ok(Self::from_specs(specs))
    }

    pub fn from_specs(specs: impl IntoIterator<Item = WizardSpec>) -> Self {
        let entries = specs.into_iter().map(|s| (s.id().to_string(), s)).collect();
        Self { entries }
    }

    pub fn get(&self, id: &str) -> Result<&WizardSpec, CatalogError> {
        self.entries
            .get(id)
            .ok_or_else(|| CatalogError::UnknownWizard(id.to_string()))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &WizardSpec> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
