//! Pasos y definición inmutable de un wizard.
//!
//! Un `WizardDefinition` se construye una vez (vía `WizardDefinitionBuilder`)
//! y luego sólo se lee. El builder valida la forma completa de la definición
//! antes de entregarla: pasos no vacíos, claves únicas en todo el wizard,
//! opciones sólo en selects, límites bien formados.
//!
//! ```ignore
//! let def = WizardDefinition::builder("fever_flu")
//!     .step(Step::new("basic_info").question(Question::number("age", "Age?").bounded(1.0, 120.0)))
//!     .build()?;
//! ```
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashSet;

use crate::errors::DefinitionError;
use crate::hashing::hash_value;
use crate::question::{Question, QuestionKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub id: String,
    /// Pistas de presentación opacas (título, icono, color). El core no las usa.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub questions: Vec<Question>,
}

impl Step {
    pub fn new(id: &str) -> Self {
        Self { id: id.to_string(),
               title: None,
               icon: None,
               color: None,
               questions: Vec::new() }
    }

    pub fn titled(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn icon(mut self, icon: &str, color: &str) -> Self {
        self.icon = Some(icon.to_string());
        self.color = Some(color.to_string());
        self
    }

    pub fn question(mut self, question: Question) -> Self {
        self.questions.push(question);
        self
    }

    pub fn find(&self, key: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.key == key)
    }

    pub fn required_keys(&self) -> impl Iterator<Item = &str> {
        self.questions.iter().filter(|q| q.required).map(|q| q.key.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WizardDefinition {
    pub id: String,
    pub steps: Vec<Step>,
    pub definition_hash: String,
}

impl WizardDefinition {
    pub fn builder(id: &str) -> WizardDefinitionBuilder {
        WizardDefinitionBuilder { id: id.to_string(),
                                  steps: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    pub fn step(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    /// Busca una pregunta en cualquier paso.
    pub fn question(&self, key: &str) -> Option<&Question> {
        self.steps.iter().find_map(|s| s.find(key))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().flat_map(|s| s.questions.iter().map(|q| q.key.as_str()))
    }
}

#[derive(Debug, Clone)]
pub struct WizardDefinitionBuilder {
    id: String,
    steps: Vec<Step>,
}

impl WizardDefinitionBuilder {
    pub fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub fn build(self) -> Result<WizardDefinition, DefinitionError> {
        if self.steps.is_empty() {
            return Err(DefinitionError::NoSteps(self.id));
        }
        let mut step_ids = HashSet::new();
        let mut keys = HashSet::new();
        for step in &self.steps {
            if !step_ids.insert(step.id.as_str()) {
                return Err(DefinitionError::DuplicateStep(step.id.clone()));
            }
            if step.questions.is_empty() {
                return Err(DefinitionError::EmptyStep(step.id.clone()));
            }
            for q in &step.questions {
                if !keys.insert(q.key.as_str()) {
                    return Err(DefinitionError::DuplicateKey(q.key.clone()));
                }
                check_question(q)?;
            }
        }
        // El hash cubre la estructura (ids y claves en orden), no los textos.
        let shape: Vec<_> = self.steps
                                .iter()
                                .map(|s| json!({ "id": s.id, "keys": s.questions.iter().map(|q| &q.key).collect::<Vec<_>>() }))
                                .collect();
        let definition_hash = hash_value(&json!({ "wizard": self.id, "steps": shape }));
        Ok(WizardDefinition { id: self.id,
                              steps: self.steps,
                              definition_hash })
    }
}

fn check_question(q: &Question) -> Result<(), DefinitionError> {
    match q.kind {
        QuestionKind::SingleSelect if q.options.is_empty() => Err(DefinitionError::MissingOptions(q.key.clone())),
        QuestionKind::SingleSelect => Ok(()),
        _ if !q.options.is_empty() => Err(DefinitionError::UnexpectedOptions(q.key.clone())),
        QuestionKind::Number => match q.constraints {
            Some(b) if !b.is_well_formed() => Err(DefinitionError::InvalidBounds(q.key.clone())),
            _ => Ok(()),
        },
        _ => Ok(()),
    }
}
