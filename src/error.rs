//! Errores de la fachada.

use intake_catalog::CatalogError;
use intake_core::WizardError;
use intake_inference::InferenceError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AppError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Inference(#[from] InferenceError),
    #[error(transparent)]
    Wizard(#[from] WizardError),
    #[error("wizard '{0}' has no static fallback")]
    NoFallback(String),
}
