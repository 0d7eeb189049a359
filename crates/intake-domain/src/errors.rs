//! Errores del dominio del wizard.
//!
//! `ValidationError` siempre es recuperable: se muestra junto al campo y nunca
//! llega a la capa de red. `DefinitionError` sólo aparece al construir una
//! definición inválida (error del programador, no del usuario).
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Serialize, Deserialize)]
pub enum ValidationError {
    #[error("answer required for '{key}'")]
    Required { key: String },
    #[error("'{value}' is not a valid choice for '{key}'")]
    InvalidChoice { key: String, value: String },
    #[error("'{value}' is not a number (question '{key}')")]
    NotANumber { key: String, value: String },
    #[error("{value} is outside [{min}, {max}] for '{key}'")]
    OutOfRange { key: String, value: f64, min: f64, max: f64 },
    #[error("step '{step_id}' is incomplete, missing: {}", missing.join(", "))]
    IncompleteStep { step_id: String, missing: Vec<String> },
    #[error("question '{key}' does not belong to the current step")]
    UnknownQuestion { key: String },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    #[error("wizard '{0}' has no steps")]
    NoSteps(String),
    #[error("step '{0}' has no questions")]
    EmptyStep(String),
    #[error("duplicate step id '{0}'")]
    DuplicateStep(String),
    #[error("duplicate question key '{0}'")]
    DuplicateKey(String),
    #[error("select question '{0}' needs at least one option")]
    MissingOptions(String),
    #[error("question '{0}' declares options but is not a select")]
    UnexpectedOptions(String),
    #[error("invalid bounds on question '{0}'")]
    InvalidBounds(String),
}
