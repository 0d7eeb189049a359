//! Máquina de estados síncrona del wizard.
//!
//! `Wizard` no hace IO. La fase de envío se parte en dos: `begin_submission`
//! entrega un `Submission` (ticket con generación, request, token de
//! cancelación y fingerprint) y `complete` aplica el resultado sólo si ese
//! ticket sigue siendo el vigente. Quien ejecuta la llamada remota entre ambos
//! pasos es el `WizardHandle`.
use std::sync::Arc;

use intake_domain::hashing::hash_value;
use intake_domain::{validate, Answers, Step, ValidationError, WizardDefinition};
use intake_inference::{InferenceError, InferenceRequest, InferenceResult, RequestShape, ResultSource};
use log::{debug, warn};
use serde_json::json;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::constants::WIZARD_ENGINE_VERSION;
use crate::errors::WizardError;
use crate::event::{EventStore, InMemoryEventStore, WizardEvent, WizardEventKind};
use crate::state::WizardState;

/// Resultado de un `advance` que no falló.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Moved { to: usize },
    /// Era el último paso: el wizard quedó en `Completed`.
    Completed,
}

/// Si `complete` aplicó el resultado o lo descartó por obsoleto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Applied,
    Stale,
}

/// Ticket de un envío en vuelo.
#[derive(Debug, Clone)]
pub struct Submission {
    pub generation: u64,
    pub request: InferenceRequest,
    /// blake3 de (versión, definition_hash, request).
    pub fingerprint: String,
    pub cancel: CancellationToken,
}

#[derive(Debug)]
pub struct Wizard<E = InMemoryEventStore>
    where E: EventStore
{
    session_id: Uuid,
    definition: Arc<WizardDefinition>,
    shape: RequestShape,
    state: WizardState,
    answers: Answers,
    generation: u64,
    in_flight: Option<CancellationToken>,
    events: E,
}

impl Wizard<InMemoryEventStore> {
    /// Crea un wizard con log de eventos en memoria.
    pub fn new(definition: Arc<WizardDefinition>, shape: RequestShape) -> Self {
        Self::with_store(definition, shape, InMemoryEventStore::default())
    }
}

impl<E> Wizard<E> where E: EventStore
{
    pub fn with_store(definition: Arc<WizardDefinition>, shape: RequestShape, events: E) -> Self {
        let mut wizard = Self { session_id: Uuid::new_v4(),
                                definition,
                                shape,
                                state: WizardState::InProgress { index: 0 },
                                answers: Answers::new(),
                                generation: 0,
                                in_flight: None,
                                events };
        let kind = WizardEventKind::Started { wizard_id: wizard.definition.id.clone(),
                                              definition_hash: wizard.definition.definition_hash.clone(),
                                              step_count: wizard.definition.len() };
        wizard.record(kind);
        wizard
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn definition(&self) -> &WizardDefinition {
        &self.definition
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn answers(&self) -> &Answers {
        &self.answers
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn events(&self) -> Vec<WizardEvent> {
        self.events.list(self.session_id)
    }

    /// Paso visible. Fuera de `InProgress` es el último paso.
    pub fn current_index(&self) -> usize {
        match self.state {
            WizardState::InProgress { index } => index,
            _ => self.definition.last_index(),
        }
    }

    pub fn current_step(&self) -> Option<&Step> {
        self.definition.step(self.current_index())
    }

    /// Progreso de 0 a 100 según el paso visible.
    pub fn progress_percent(&self) -> f64 {
        let last = self.definition.last_index();
        if last == 0 {
            return 100.0;
        }
        self.current_index() as f64 / last as f64 * 100.0
    }

    /// Registra la respuesta a `key` en el paso actual. Un rechazo no modifica
    /// nada salvo el log.
    pub fn answer(&mut self, key: &str, raw: &str) -> Result<(), WizardError> {
        let index = self.require_in_progress("answer")?;
        let outcome = match self.definition.step(index).and_then(|s| s.find(key)) {
            Some(question) => validate(question, raw),
            None => Err(ValidationError::UnknownQuestion { key: key.to_string() }),
        };
        match outcome {
            Ok(value) => {
                self.answers.insert(key, value);
                self.record(WizardEventKind::AnswerRecorded { step_index: index,
                                                              key: key.to_string() });
                Ok(())
            }
            Err(error) => {
                debug!("answer rejected key={} err={}", key, error);
                self.record(WizardEventKind::AnswerRejected { step_index: index,
                                                              key: key.to_string(),
                                                              error: error.clone() });
                Err(error.into())
            }
        }
    }

    /// Claves requeridas del paso actual que aún no tienen respuesta.
    pub fn missing_keys(&self) -> Vec<String> {
        match self.state {
            WizardState::InProgress { index } => self.definition
                                                     .step(index)
                                                     .map(|s| {
                                                         s.required_keys()
                                                          .filter(|k| !self.answers.contains(k))
                                                          .map(str::to_string)
                                                          .collect()
                                                     })
                                                     .unwrap_or_default(),
            _ => Vec::new(),
        }
    }

    pub fn can_advance(&self) -> bool {
        matches!(self.state, WizardState::InProgress { .. }) && self.missing_keys().is_empty()
    }

    pub fn advance(&mut self) -> Result<Advance, WizardError> {
        let index = self.require_in_progress("advance")?;
        let missing = self.missing_keys();
        if !missing.is_empty() {
            let step_id = self.definition.step(index).map(|s| s.id.clone()).unwrap_or_default();
            return Err(ValidationError::IncompleteStep { step_id, missing }.into());
        }
        if index < self.definition.last_index() {
            let to = index + 1;
            self.state = WizardState::InProgress { index: to };
            self.record(WizardEventKind::StepAdvanced { from: index, to });
            Ok(Advance::Moved { to })
        } else {
            self.state = WizardState::Completed;
            self.record(WizardEventKind::StepsCompleted);
            Ok(Advance::Completed)
        }
    }

    /// Retrocede un paso. Nunca falla; en el primer paso (o en vuelo) no hace nada.
    pub fn retreat(&mut self) -> usize {
        let from = self.current_index();
        let to = match self.state {
            WizardState::InProgress { index } if index > 0 => index - 1,
            WizardState::Completed | WizardState::Failed { .. } => from,
            _ => return from,
        };
        self.state = WizardState::InProgress { index: to };
        self.record(WizardEventKind::StepRetreated { from, to });
        to
    }

    /// Vuelve a `InProgress(0)` sin respuestas. Cancela cualquier envío en vuelo.
    pub fn reset(&mut self) {
        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
        self.generation += 1;
        self.answers.clear();
        self.state = WizardState::InProgress { index: 0 };
        self.record(WizardEventKind::Reset);
    }

    /// `Completed | Failed` -> `Submitting`.
    pub fn begin_submission(&mut self) -> Result<Submission, WizardError> {
        match self.state {
            WizardState::Completed | WizardState::Failed { .. } => {}
            WizardState::Submitting { .. } => return Err(InferenceError::AlreadyInFlight.into()),
            ref other => {
                return Err(WizardError::InvalidTransition { action: "submit",
                                                            state: other.name() })
            }
        }
        self.generation += 1;
        let request = self.shape.build(&self.answers);
        let fingerprint = hash_value(&json!({
                                         "engine_version": WIZARD_ENGINE_VERSION,
                                         "definition_hash": self.definition.definition_hash,
                                         "request": request.to_json(),
                                     }));
        let cancel = CancellationToken::new();
        self.in_flight = Some(cancel.clone());
        self.state = WizardState::Submitting { generation: self.generation };
        self.record(WizardEventKind::SubmissionStarted { generation: self.generation,
                                                         fingerprint: fingerprint.clone() });
        Ok(Submission { generation: self.generation,
                        request,
                        fingerprint,
                        cancel })
    }

    /// Reenvía con las respuestas retenidas. Sólo desde `Failed`.
    pub fn retry(&mut self) -> Result<Submission, WizardError> {
        match self.state {
            WizardState::Failed { .. } => self.begin_submission(),
            WizardState::Submitting { .. } => Err(InferenceError::AlreadyInFlight.into()),
            ref other => Err(WizardError::InvalidTransition { action: "retry",
                                                              state: other.name() }),
        }
    }

    /// Aplica el resultado de `ticket` si sigue vigente.
    pub fn complete(&mut self,
                    ticket: &Submission,
                    outcome: Result<InferenceResult, InferenceError>)
                    -> Applied {
        let current = matches!(self.state, WizardState::Submitting { generation } if generation == ticket.generation);
        if !current {
            warn!("discarding stale result generation={} current={}", ticket.generation, self.generation);
            self.record(WizardEventKind::StaleResultDiscarded { generation: ticket.generation });
            return Applied::Stale;
        }
        self.in_flight = None;
        match outcome {
            Ok(result) => {
                self.record(WizardEventKind::SubmissionSucceeded { generation: ticket.generation,
                                                                   tier: result.tier,
                                                                   source: result.source,
                                                                   items: result.items.len() });
                self.state = WizardState::Succeeded { result };
            }
            Err(error) => {
                self.record(WizardEventKind::SubmissionFailed { generation: ticket.generation,
                                                                error: error.clone() });
                self.state = WizardState::Failed { error };
            }
        }
        Applied::Applied
    }

    /// Cancela el envío en vuelo y vuelve a `Completed` con las respuestas
    /// intactas. Devuelve `false` si no había nada en vuelo.
    pub fn cancel(&mut self) -> bool {
        let WizardState::Submitting { generation } = self.state else {
            return false;
        };
        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
        self.state = WizardState::Completed;
        self.record(WizardEventKind::SubmissionCancelled { generation });
        true
    }

    /// `Failed` -> `Succeeded` con contenido estático. El resultado queda
    /// marcado como `Fallback` aunque venga con otra fuente.
    pub fn accept_fallback(&mut self, mut result: InferenceResult) -> Result<(), WizardError> {
        if !matches!(self.state, WizardState::Failed { .. }) {
            return Err(WizardError::InvalidTransition { action: "accept fallback",
                                                        state: self.state.name() });
        }
        result.source = ResultSource::Fallback;
        self.state = WizardState::Succeeded { result };
        self.record(WizardEventKind::FallbackAccepted);
        Ok(())
    }

    fn require_in_progress(&self, action: &'static str) -> Result<usize, WizardError> {
        match self.state {
            WizardState::InProgress { index } => Ok(index),
            WizardState::Submitting { .. } => Err(InferenceError::AlreadyInFlight.into()),
            ref other => Err(WizardError::InvalidTransition { action,
                                                              state: other.name() }),
        }
    }

    fn record(&mut self, kind: WizardEventKind) {
        let ev = self.events.append_kind(self.session_id, kind);
        debug!("wizard event session={} seq={} kind={:?}", ev.session_id, ev.seq, ev.kind);
    }
}
