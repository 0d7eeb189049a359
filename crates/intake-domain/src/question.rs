//! Definición tipada de una pregunta del wizard.
//!
//! El `prompt` y el `placeholder` son opacos para el core: sólo los consume la
//! capa de presentación. Lo que importa aquí es `key` (nombre del campo en el
//! mapa final de respuestas), `kind` y las reglas de validación asociadas.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    Boolean,
    SingleSelect,
    Number,
    Text,
}

/// Límites numéricos inclusivos `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumberBounds {
    pub min: f64,
    pub max: f64,
}

impl NumberBounds {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn is_well_formed(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub key: String,
    pub prompt: String,
    pub kind: QuestionKind,
    /// Sólo para `SingleSelect`; vacío en el resto.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    /// Sólo para `Number`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<NumberBounds>,
    #[serde(default = "default_required")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

fn default_required() -> bool {
    true
}

impl Question {
    fn new(key: &str, prompt: &str, kind: QuestionKind) -> Self {
        Self { key: key.to_string(),
               prompt: prompt.to_string(),
               kind,
               options: Vec::new(),
               constraints: None,
               required: true,
               placeholder: None }
    }

    pub fn boolean(key: &str, prompt: &str) -> Self {
        Self::new(key, prompt, QuestionKind::Boolean)
    }

    pub fn select<I, S>(key: &str, prompt: &str, options: I) -> Self
        where I: IntoIterator<Item = S>,
              S: Into<String>
    {
        let mut q = Self::new(key, prompt, QuestionKind::SingleSelect);
        q.options = options.into_iter().map(Into::into).collect();
        q
    }

    pub fn number(key: &str, prompt: &str) -> Self {
        Self::new(key, prompt, QuestionKind::Number)
    }

    pub fn text(key: &str, prompt: &str) -> Self {
        Self::new(key, prompt, QuestionKind::Text)
    }

    /// Fija límites inclusivos (sólo tiene efecto en preguntas `Number`).
    pub fn bounded(mut self, min: f64, max: f64) -> Self {
        self.constraints = Some(NumberBounds::new(min, max));
        self
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn with_placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = Some(placeholder.to_string());
        self
    }
}
