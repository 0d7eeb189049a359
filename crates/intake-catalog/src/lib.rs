//! intake-catalog: los wizards concretos de la app de salud.
//!
//! Cada wizard declara su definición, la forma del request, a qué backend va
//! y (opcionalmente) contenido estático de respaldo. Hosts y secretos se
//! resuelven desde un `ConfigProvider` al pedir el endpoint, nunca aquí.
pub mod catalog;
pub mod error;
pub mod wizards;

pub use catalog::{Backend, Catalog, WizardSpec};
pub use error::CatalogError;
