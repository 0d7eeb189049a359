//! intake-core: máquina de estados del wizard de intake (F1).
//!
//! - `Wizard`: máquina síncrona y pura respecto a IO. Sostiene la definición,
//!   el estado etiquetado (`WizardState`) y las respuestas.
//! - `WizardHandle`: driver async. Hace la única suspensión del sistema (la
//!   llamada de inferencia) sin mantener el lock tomado durante el `.await`.
//! - `event`: log append-only de transiciones, por sesión.
pub mod constants;
pub mod errors;
pub mod event;
pub mod handle;
pub mod state;
pub mod wizard;

pub use errors::WizardError;
pub use event::{EventStore, InMemoryEventStore, WizardEvent, WizardEventKind};
pub use handle::{Transition, WizardHandle};
pub use state::WizardState;
pub use wizard::{Advance, Applied, Submission, Wizard};
