//! IntakeFlow Rust Library
//!
//! Fachada del workspace:
//! - `intake_domain`: preguntas, respuestas y validación pura.
//! - `intake_core`: máquina de estados del wizard y su driver async.
//! - `intake_inference`: cliente remoto y normalización en niveles.
//! - `intake_persistence`: sesión de usuario y configuración.
//! - `intake_catalog`: los wizards concretos.
//!
//! `IntakeApp` arma todo a partir de un `ConfigProvider`.

pub mod app;
pub mod error;

pub use app::IntakeApp;
pub use error::AppError;

pub use intake_catalog::{Backend, Catalog, WizardSpec};
pub use intake_core::{Transition, Wizard, WizardError, WizardEvent, WizardEventKind, WizardHandle, WizardState};
pub use intake_domain::{AnswerValue, Answers, Question, QuestionKind, Step, ValidationError, WizardDefinition};
pub use intake_inference::{EndpointConfig, InferenceError, InferenceResult, NormalizationTier, ResultItem,
                           ResultSource};
pub use intake_persistence::{ConfigProvider, EnvConfig, SessionManager, StaticConfig, UserSession};
