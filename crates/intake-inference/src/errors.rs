//! Errores de inferencia. Todos son reintentables desde la UI; ninguno
//! invalida las respuestas ya capturadas.
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InferenceError {
    #[error("inference request timed out")]
    Timeout,
    #[error("transport error: {0}")]
    Transport(String),
    #[error("endpoint answered HTTP {0}")]
    Http(u16),
    #[error("response could not be normalized")]
    UnparsableResponse { raw: String },
    #[error("an inference request is already in flight")]
    AlreadyInFlight,
    #[error("backend rejected the request: {message}")]
    Rejected { message: String },
    #[error("invalid endpoint configuration: {0}")]
    InvalidEndpoint(String),
}

impl InferenceError {
    /// Texto crudo disponible para mostrar como fallback (sólo en
    /// `UnparsableResponse`).
    pub fn raw_text(&self) -> Option<&str> {
        match self {
            InferenceError::UnparsableResponse { raw } => Some(raw),
            _ => None,
        }
    }
}
