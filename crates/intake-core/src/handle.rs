//! Driver async del wizard.
//!
//! `WizardHandle` es el único dueño del `Wizard` (`Arc<Mutex<_>>`). El lock se
//! toma para cada transición síncrona y se suelta antes de esperar la
//! inferencia; la llamada remota compite con el token de cancelación del
//! ticket en un `tokio::select!`.
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use intake_domain::{Answers, Step};
use intake_inference::{InferenceError, InferenceResult, InferenceService};
use log::{debug, info};

use crate::errors::WizardError;
use crate::event::{EventStore, InMemoryEventStore, WizardEvent};
use crate::state::WizardState;
use crate::wizard::{Advance, Applied, Submission, Wizard};

/// Lo que ocurrió tras un `advance`/`retry` del handle.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Se movió a otro paso sin enviar nada.
    Moved { to: usize },
    Succeeded(InferenceResult),
    Failed(InferenceError),
    /// El envío se canceló (navegación o reset) antes de terminar.
    Cancelled,
    /// La respuesta llegó cuando el ticket ya no era vigente.
    Discarded,
}

pub struct WizardHandle<E = InMemoryEventStore>
    where E: EventStore
{
    wizard: Arc<Mutex<Wizard<E>>>,
    service: Arc<dyn InferenceService>,
}

impl<E> Clone for WizardHandle<E> where E: EventStore
{
    fn clone(&self) -> Self {
        Self { wizard: Arc::clone(&self.wizard),
               service: Arc::clone(&self.service) }
    }
}

impl<E> WizardHandle<E> where E: EventStore
{
    pub fn new(wizard: Wizard<E>, service: Arc<dyn InferenceService>) -> Self {
        Self { wizard: Arc::new(Mutex::new(wizard)),
               service }
    }

    fn lock(&self) -> MutexGuard<'_, Wizard<E>> {
        self.wizard.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> WizardState {
        self.lock().state().clone()
    }

    pub fn answers(&self) -> Answers {
        self.lock().answers().clone()
    }

    pub fn current_index(&self) -> usize {
        self.lock().current_index()
    }

    /// Copia del paso visible, para saber qué claves se pueden responder.
    pub fn current_step(&self) -> Option<Step> {
        self.lock().current_step().cloned()
    }

    pub fn can_advance(&self) -> bool {
        self.lock().can_advance()
    }

    pub fn events(&self) -> Vec<WizardEvent> {
        self.lock().events()
    }

    pub fn answer(&self, key: &str, raw: &str) -> Result<(), WizardError> {
        self.lock().answer(key, raw)
    }

    pub fn retreat(&self) -> usize {
        self.lock().retreat()
    }

    pub fn reset(&self) {
        self.lock().reset()
    }

    /// Navegación fuera del wizard: cancela lo que esté en vuelo.
    pub fn cancel(&self) -> bool {
        self.lock().cancel()
    }

    pub fn accept_fallback(&self, result: InferenceResult) -> Result<(), WizardError> {
        self.lock().accept_fallback(result)
    }

    /// Avanza un paso; en el último, completa y envía.
    pub async fn advance(&self) -> Result<Transition, WizardError> {
        let submission = {
            let mut wizard = self.lock();
            match wizard.advance()? {
                Advance::Moved { to } => return Ok(Transition::Moved { to }),
                Advance::Completed => wizard.begin_submission()?,
            }
        };
        Ok(self.run(submission).await)
    }

    /// Envía desde `Completed` (p.ej. tras una cancelación).
    pub async fn submit(&self) -> Result<Transition, WizardError> {
        let submission = self.lock().begin_submission()?;
        Ok(self.run(submission).await)
    }

    pub async fn retry(&self) -> Result<Transition, WizardError> {
        let submission = self.lock().retry()?;
        Ok(self.run(submission).await)
    }

    async fn run(&self, submission: Submission) -> Transition {
        debug!("submission generation={} fingerprint={}", submission.generation, submission.fingerprint);
        let outcome = tokio::select! {
            biased;
            _ = submission.cancel.cancelled() => None,
            outcome = self.service.infer(submission.request.clone()) => Some(outcome),
        };
        let Some(outcome) = outcome else {
            info!("submission generation={} cancelled", submission.generation);
            return Transition::Cancelled;
        };
        let mut wizard = self.lock();
        match wizard.complete(&submission, outcome) {
            Applied::Stale => Transition::Discarded,
            Applied::Applied => match wizard.state() {
                WizardState::Succeeded { result } => Transition::Succeeded(result.clone()),
                WizardState::Failed { error } => Transition::Failed(error.clone()),
                _ => Transition::Discarded,
            },
        }
    }
}
