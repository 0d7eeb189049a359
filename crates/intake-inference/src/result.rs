//! Contrato entre el cliente y la presentación: `InferenceResult`.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultItem {
    pub label: String,
    #[serde(default)]
    pub detail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl ResultItem {
    pub fn new(label: &str, detail: &str, score: Option<f64>) -> Self {
        Self { label: label.to_string(),
               detail: detail.to_string(),
               score }
    }
}

/// Origen del resultado: respuesta real del backend o contenido estático de
/// respaldo. La UI debe poder distinguirlos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultSource {
    Live,
    Fallback,
}

/// Nivel del pipeline de normalización que produjo el resultado.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizationTier {
    Direct,
    Embedded,
    LineFallback,
    Static,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceResult {
    pub primary_label: String,
    /// Siempre en `[0, 100]` cuando está presente.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_percent: Option<f64>,
    pub items: Vec<ResultItem>,
    /// Payload sin procesar, para depuración o display de respaldo.
    pub raw: String,
    pub source: ResultSource,
    pub tier: NormalizationTier,
}

impl InferenceResult {
    /// Resultado estático de respaldo, marcado explícitamente como tal.
    pub fn fallback(primary_label: &str, items: Vec<ResultItem>) -> Self {
        Self { primary_label: primary_label.to_string(),
               confidence_percent: None,
               items,
               raw: String::new(),
               source: ResultSource::Fallback,
               tier: NormalizationTier::Static }
    }

    pub fn is_live(&self) -> bool {
        self.source == ResultSource::Live
    }
}
