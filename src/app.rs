//! `IntakeApp`: une catálogo, configuración y cliente HTTP.
//!
//! Un único `InferenceClient` (un pool de conexiones reqwest) se comparte
//! entre todos los wizards; cada `start` crea una sesión nueva con su propio
//! `WizardHandle`.
use std::sync::Arc;

use intake_catalog::{Catalog, WizardSpec};
use intake_core::{Wizard, WizardHandle};
use intake_inference::{EndpointClient, InferenceClient, InferenceTransport, ReqwestTransport};
use intake_persistence::ConfigProvider;
use log::info;

use crate::error::AppError;

pub struct IntakeApp<T: InferenceTransport = ReqwestTransport> {
    catalog: Catalog,
    config: Arc<dyn ConfigProvider>,
    client: Arc<InferenceClient<T>>,
}

impl IntakeApp<ReqwestTransport> {
    /// Catálogo incorporado y cliente reqwest.
    pub fn new(config: Arc<dyn ConfigProvider>) -> Result<Self, AppError> {
        Ok(Self::with_client(Catalog::builtin()?, config, InferenceClient::new()?))
    }
}

impl<T: InferenceTransport + 'static> IntakeApp<T> {
    pub fn with_client(catalog: Catalog, config: Arc<dyn ConfigProvider>, client: InferenceClient<T>) -> Self {
        Self { catalog,
               config,
               client: Arc::new(client) }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Abre una sesión del wizard `id`. Falla antes de crear nada si el
    /// endpoint no se puede resolver.
    pub fn start(&self, id: &str) -> Result<WizardHandle, AppError> {
        let spec = self.catalog.get(id)?;
        let endpoint = spec.endpoint(self.config.as_ref())?;
        let service = Arc::new(EndpointClient::new(Arc::clone(&self.client), endpoint));
        let wizard = Wizard::new(Arc::clone(&spec.definition), spec.shape.clone());
        info!("wizard session started id={} session={}", id, wizard.session_id());
        Ok(WizardHandle::new(wizard, service))
    }

    /// Acepta el contenido estático del wizard en un handle que falló.
    pub fn accept_fallback(&self, id: &str, handle: &WizardHandle) -> Result<(), AppError> {
        let spec: &WizardSpec = self.catalog.get(id)?;
        let fallback = spec.fallback.clone().ok_or_else(|| AppError::NoFallback(id.to_string()))?;
        handle.accept_fallback(fallback)?;
        Ok(())
    }
}
