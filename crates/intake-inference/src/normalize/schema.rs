//! Mapeo "consultivo" de JSON arbitrario a la forma normalizada.
//!
//! Cada backend usa su propio esquema (`possibilities`, `predictions`,
//! `confidence_percentage`, listas de recomendaciones...). Aquí no se exige
//! ninguno: se buscan claves conocidas en orden de preferencia y se acepta lo
//! que aparezca.
use serde_json::{Map, Value};

use crate::confidence::{confidence_from_value, score_from_value};
use crate::errors::InferenceError;
use crate::result::{InferenceResult, NormalizationTier, ResultItem, ResultSource};

const LIST_KEYS: &[&str] = &["possibilities", "items", "predictions", "results", "conditions", "recommendations",
                             "meals", "schedules", "nutrients"];
const LABEL_KEYS: &[&str] = &["condition", "label", "name", "prediction", "class", "title", "meal", "food"];
const DETAIL_KEYS: &[&str] = &["description", "detail", "details", "explanation", "reason"];
const SCORE_KEYS: &[&str] = &["probability", "score", "confidence", "confidence_percentage", "percentage"];
const PRIMARY_KEYS: &[&str] = &["primary_diagnosis", "primary_label", "prediction", "label", "condition", "risk_level",
                                "plan_summary", "summary"];
const CONFIDENCE_KEYS: &[&str] = &["confidence_percentage", "confidence", "probability"];

/// Resultado intermedio del mapeo, antes de fijar `raw` y `tier`.
#[derive(Debug, Clone, PartialEq)]
pub struct Mapped {
    pub primary_label: String,
    pub confidence_percent: Option<f64>,
    pub items: Vec<ResultItem>,
}

impl Mapped {
    pub fn into_result(self, raw: &str, tier: NormalizationTier) -> InferenceResult {
        InferenceResult { primary_label: self.primary_label,
                          confidence_percent: self.confidence_percent,
                          items: self.items,
                          raw: raw.to_string(),
                          source: ResultSource::Live,
                          tier }
    }
}

/// `Ok(None)` cuando el valor no trae contenido reconocible.
pub fn map_value(value: &Value) -> Result<Option<Mapped>, InferenceError> {
    match value {
        Value::Array(entries) => Ok(from_items(map_items(entries), None, None)),
        Value::Object(obj) => map_object(obj),
        _ => Ok(None),
    }
}

fn map_object(obj: &Map<String, Value>) -> Result<Option<Mapped>, InferenceError> {
    if obj.get("success") == Some(&Value::Bool(false)) {
        let message = first_string(obj, &["message", "error", "detail"]).unwrap_or_else(|| "unknown error".to_string());
        return Err(InferenceError::Rejected { message });
    }
    let items = object_items(obj);
    let primary = first_string(obj, PRIMARY_KEYS);
    let confidence = CONFIDENCE_KEYS.iter()
                                    .filter_map(|k| obj.get(*k))
                                    .find_map(confidence_from_value);
    Ok(from_items(items, primary, confidence))
}

fn from_items(items: Vec<ResultItem>, primary: Option<String>, confidence: Option<f64>) -> Option<Mapped> {
    let primary_label = primary.or_else(|| items.first().map(|i| i.label.clone()))?;
    Some(Mapped { primary_label,
                  confidence_percent: confidence,
                  items })
}

/// Lista principal del objeto: primero claves conocidas, luego el primer
/// arreglo de objetos, y por último arreglos de strings agrupados por clave
/// (p.ej. `{"precautions": [...], "treatments": [...]}`).
fn object_items(obj: &Map<String, Value>) -> Vec<ResultItem> {
    if let Some(entries) = LIST_KEYS.iter().find_map(|k| obj.get(*k).and_then(Value::as_array)) {
        return map_items(entries);
    }
    if let Some(entries) = obj.values()
                              .filter_map(Value::as_array)
                              .find(|arr| !arr.is_empty() && arr.iter().all(Value::is_object))
    {
        return map_items(entries);
    }
    obj.iter()
       .filter_map(|(k, v)| v.as_array().map(|arr| (k, arr)))
       .flat_map(|(k, arr)| arr.iter().filter_map(Value::as_str).map(move |s| ResultItem::new(k, s, None)))
       .collect()
}

fn map_items(entries: &[Value]) -> Vec<ResultItem> {
    entries.iter().enumerate().map(|(idx, v)| map_item(idx, v)).collect()
}

// Nunca descarta entradas: una entrada sin etiqueta reconocible recibe "#n".
fn map_item(idx: usize, value: &Value) -> ResultItem {
    match value {
        Value::Object(obj) => {
            let label = first_string(obj, LABEL_KEYS).or_else(|| obj.values().find_map(|v| v.as_str().map(str::to_string)))
                                                     .unwrap_or_else(|| format!("#{}", idx + 1));
            let detail = first_string(obj, DETAIL_KEYS).unwrap_or_else(|| remaining_fields(obj));
            let score = SCORE_KEYS.iter().find_map(|k| obj.get(*k).and_then(|v| item_score(k, v)));
            ResultItem { label, detail, score }
        }
        Value::String(s) => ResultItem::new(s, "", None),
        other => ResultItem::new(&other.to_string(), "", None),
    }
}

/// `confidence*` de un item puede venir como fracción; el resto de claves de
/// score ya son porcentajes.
fn item_score(key: &str, value: &Value) -> Option<f64> {
    if key.starts_with("confidence") {
        confidence_from_value(value)
    } else {
        score_from_value(value)
    }
}

/// Campos escalares que no son etiqueta ni score, como `k: v; k: v`.
fn remaining_fields(obj: &Map<String, Value>) -> String {
    obj.iter()
       .filter(|(k, _)| !LABEL_KEYS.contains(&k.as_str()) && !SCORE_KEYS.contains(&k.as_str()))
       .filter_map(|(k, v)| match v {
           Value::String(s) => Some(format!("{k}: {s}")),
           Value::Number(n) => Some(format!("{k}: {n}")),
           Value::Bool(b) => Some(format!("{k}: {b}")),
           Value::Array(arr) if arr.iter().all(Value::is_string) => {
               let joined: Vec<&str> = arr.iter().filter_map(Value::as_str).collect();
               Some(format!("{k}: {}", joined.join(", ")))
           }
           _ => None,
       })
       .collect::<Vec<_>>()
       .join("; ")
}

fn first_string(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .find_map(|v| v.as_str().map(str::trim).filter(|s| !s.is_empty()).map(str::to_string))
}
