//! Errores devueltos por las operaciones del wizard. Son valores: nada aquí
//! desenrolla más allá del límite del wizard.
use intake_domain::ValidationError;
use intake_inference::InferenceError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum WizardError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Inference(#[from] InferenceError),
    #[error("cannot {action} while wizard is {state}")]
    InvalidTransition { action: &'static str, state: &'static str },
}

impl WizardError {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, WizardError::Inference(InferenceError::AlreadyInFlight))
    }
}
