//! Valores de respuesta ya validados y el mapa plano `key -> valor`.
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Centinelas aceptados por las preguntas `Boolean`.
pub const BOOLEAN_YES: &str = "yes";
pub const BOOLEAN_NO: &str = "no";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl AnswerValue {
    /// Representación JSON para cuerpos REST. Los números enteros finitos se
    /// emiten como enteros (`34`, no `34.0`).
    pub fn to_json(&self) -> Value {
        match self {
            AnswerValue::Bool(b) => Value::Bool(*b),
            AnswerValue::Text(s) => Value::String(s.clone()),
            AnswerValue::Number(n) => {
                if n.is_finite() && n.fract() == 0.0 && n.abs() < 9.0e15 {
                    Value::from(*n as i64)
                } else {
                    serde_json::Number::from_f64(*n).map(Value::Number).unwrap_or(Value::Null)
                }
            }
        }
    }

    /// Representación textual para plantillas de prompt: los booleanos se
    /// vuelven `yes`/`no`, igual que los centinelas de entrada.
    pub fn render(&self) -> String {
        match self {
            AnswerValue::Bool(true) => BOOLEAN_YES.to_string(),
            AnswerValue::Bool(false) => BOOLEAN_NO.to_string(),
            AnswerValue::Text(s) => s.clone(),
            AnswerValue::Number(_) => self.to_json().to_string(),
        }
    }
}

/// Mapa plano de respuestas. El orden de inserción es irrelevante; se usa
/// `BTreeMap` para que serialización y fingerprints sean deterministas.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Answers(BTreeMap<String, AnswerValue>);

impl Answers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str, value: AnswerValue) -> Option<AnswerValue> {
        self.0.insert(key.to_string(), value)
    }

    pub fn get(&self, key: &str) -> Option<&AnswerValue> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AnswerValue)> {
        self.0.iter()
    }

    /// Objeto JSON plano `{key: valor}`.
    pub fn to_json(&self) -> Value {
        Value::Object(self.0.iter().map(|(k, v)| (k.clone(), v.to_json())).collect())
    }
}
