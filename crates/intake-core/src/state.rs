//! Estado etiquetado del wizard.
//!
//! Reemplaza el conjunto de flags independientes (`isLoading`,
//! `showResults`, `currentStep`) por un único valor. Transiciones válidas:
//! - `InProgress(i)` -> `InProgress(i±1)` | `Completed`
//! - `Completed` -> `Submitting` | `InProgress(last)`
//! - `Submitting` -> `Succeeded` | `Failed` | `Completed` (cancelación)
//! - `Failed` -> `Submitting` (retry) | `Succeeded` (fallback) | `InProgress(last)`
//! - cualquiera -> `InProgress(0)` (reset)
use intake_inference::{InferenceError, InferenceResult};

#[derive(Debug, Clone, PartialEq)]
pub enum WizardState {
    InProgress { index: usize },
    /// Todos los pasos validados; listo para enviar.
    Completed,
    Submitting { generation: u64 },
    Failed { error: InferenceError },
    Succeeded { result: InferenceResult },
}

impl WizardState {
    pub fn name(&self) -> &'static str {
        match self {
            WizardState::InProgress { .. } => "in_progress",
            WizardState::Completed => "completed",
            WizardState::Submitting { .. } => "submitting",
            WizardState::Failed { .. } => "failed",
            WizardState::Succeeded { .. } => "succeeded",
        }
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, WizardState::Submitting { .. })
    }

    pub fn result(&self) -> Option<&InferenceResult> {
        match self {
            WizardState::Succeeded { result } => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&InferenceError> {
        match self {
            WizardState::Failed { error } => Some(error),
            _ => None,
        }
    }
}
