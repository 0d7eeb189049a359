//! Tipos de evento del wizard y estructura `WizardEvent`.
//!
//! Cada transición del `Wizard` emite un evento a un `EventStore`
//! append-only. El log permite auditar una sesión (qué se respondió, cuándo se
//! envió, qué nivel de normalización resolvió la respuesta) sin inspeccionar
//! el estado mutable.
use chrono::{DateTime, Utc};
use intake_domain::ValidationError;
use intake_inference::{InferenceError, NormalizationTier, ResultSource};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WizardEventKind {
    /// Primer evento de toda sesión.
    Started { wizard_id: String, definition_hash: String, step_count: usize },
    AnswerRecorded { step_index: usize, key: String },
    /// La respuesta no se almacenó; el estado no cambió.
    AnswerRejected { step_index: usize, key: String, error: ValidationError },
    StepAdvanced { from: usize, to: usize },
    StepRetreated { from: usize, to: usize },
    StepsCompleted,
    SubmissionStarted { generation: u64, fingerprint: String },
    SubmissionSucceeded { generation: u64, tier: NormalizationTier, source: ResultSource, items: usize },
    SubmissionFailed { generation: u64, error: InferenceError },
    SubmissionCancelled { generation: u64 },
    /// Llegó un resultado de una generación que ya no está en vuelo.
    StaleResultDiscarded { generation: u64 },
    FallbackAccepted,
    Reset,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WizardEvent {
    pub seq: u64, // asignado por el store (orden append)
    pub session_id: Uuid,
    pub kind: WizardEventKind,
    pub ts: DateTime<Utc>,
}
