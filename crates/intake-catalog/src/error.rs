use intake_domain::DefinitionError;
use intake_inference::InferenceError;
use intake_persistence::ConfigError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CatalogError {
    #[error("unknown wizard '{0}'")]
    UnknownWizard(String),
    #[error(transparent)]
    Definition(#[from] DefinitionError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Endpoint(#[from] InferenceError),
}
