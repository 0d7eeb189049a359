//! intake-domain: modelo de preguntas, pasos y validación del wizard de
//! intake clínico.
//!
//! No hace IO. Todo lo que vive aquí es puro y determinista:
//! - `question`: definición tipada de una pregunta (`Boolean`, `SingleSelect`,
//!   `Number`, `Text`).
//! - `answer`: valores validados y el mapa plano de respuestas.
//! - `validation`: la función `validate(question, raw)`.
//! - `definition`: `Step` + `WizardDefinition` con su builder.
//! - `hashing`: JSON canónico + blake3 para fingerprints de definiciones.
pub mod answer;
pub mod definition;
pub mod errors;
pub mod hashing;
pub mod question;
pub mod validation;

pub use answer::{AnswerValue, Answers, BOOLEAN_NO, BOOLEAN_YES};
pub use definition::{Step, WizardDefinition, WizardDefinitionBuilder};
pub use errors::{DefinitionError, ValidationError};
pub use question::{NumberBounds, Question, QuestionKind};
pub use validation::validate;
