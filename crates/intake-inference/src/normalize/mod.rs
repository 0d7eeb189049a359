//! Pipeline de normalización en capas.
//!
//! 1. `direct`: parseo JSON del cuerpo completo.
//! 2. `embedded`: primer substring balanceado `{...}` / `[...]` que parsee y
//!    sea estructurado (objeto, o arreglo con algún objeto). Un `[1]` de una
//!    cita en prosa no cuenta.
//! 3. `line_fallback`: líneas `Etiqueta (NN%): descripción`.
//! 4. Si nada produce contenido: `InferenceError::UnparsableResponse` con el
//!    texto crudo. Nunca se devuelve un resultado vacío como éxito.
//!
//! Un JSON que parsea pero no trae contenido reconocible cae al siguiente
//! nivel. Un objeto `{"success": false}` corta el pipeline con `Rejected`.
mod extract;
mod lines;
mod schema;

use log::debug;

use crate::errors::InferenceError;
use crate::result::{InferenceResult, NormalizationTier, ResultSource};

pub use extract::balanced_candidates;
pub use lines::parse_scored_lines;
pub use schema::{map_value, Mapped};

pub fn normalize(text: &str) -> Result<InferenceResult, InferenceError> {
    if let Some(result) = direct(text)? {
        return Ok(result);
    }
    if let Some(result) = embedded(text)? {
        return Ok(result);
    }
    if let Some(result) = line_fallback(text) {
        return Ok(result);
    }
    debug!("normalization exhausted all tiers ({} bytes)", text.len());
    Err(InferenceError::UnparsableResponse { raw: text.to_string() })
}

/// Nivel 1: el cuerpo completo es JSON.
pub fn direct(text: &str) -> Result<Option<InferenceResult>, InferenceError> {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(text.trim()) else {
        return Ok(None);
    };
    Ok(map_value(&value)?.map(|m| m.into_result(text, NormalizationTier::Direct)))
}

/// Nivel 2: JSON incrustado en prosa (típico de respuestas LLM).
pub fn embedded(text: &str) -> Result<Option<InferenceResult>, InferenceError> {
    for value in balanced_candidates(text).filter(is_structured) {
        if let Some(mapped) = map_value(&value)? {
            return Ok(Some(mapped.into_result(text, NormalizationTier::Embedded)));
        }
    }
    Ok(None)
}

fn is_structured(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Object(_) => true,
        serde_json::Value::Array(entries) => entries.iter().any(serde_json::Value::is_object),
        _ => false,
    }
}

/// Nivel 3: extracción por líneas.
pub fn line_fallback(text: &str) -> Option<InferenceResult> {
    let items = parse_scored_lines(text);
    let first = items.first()?;
    Some(InferenceResult { primary_label: first.label.clone(),
                           confidence_percent: None,
                           items,
                           raw: text.to_string(),
                           source: ResultSource::Live,
                           tier: NormalizationTier::LineFallback })
}
