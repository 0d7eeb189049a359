//! blake3 sobre JSON canónico.
//!
//! Dos usos en el workspace:
//! - `WizardDefinition::definition_hash`: id del wizard más, por paso, su id
//!   y las claves de sus preguntas en orden. Textos, placeholders y opciones
//!   no entran, así que reescribir un prompt no cambia el hash.
//! - fingerprint de cada submission (`intake-core`): versión del motor,
//!   `definition_hash` y el request saliente ya construido.
use blake3::Hasher;
use serde_json::Value;

use super::to_canonical_json;

/// Hex del blake3 de `input`.
pub fn hash_str(input: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(input.as_bytes());
    hasher.finalize().to_hex().to_string()
}

pub fn hash_value(value: &Value) -> String {
    hash_str(&to_canonical_json(value))
}
