//! Smart Sleep & Bedtime Companion: edad y profesión, horarios sugeridos por
//! Gemini. Trae horarios estáticos como respaldo.
use std::sync::Arc;

use intake_domain::{Question, Step, WizardDefinition};
use intake_inference::{InferenceResult, RequestShape, ResultItem};

use crate::catalog::{Backend, WizardSpec};
use crate::error::CatalogError;

pub const ID: &str = "sleep_companion";

pub const PROMPT: &str = "You are a sleep specialist. Suggest five daily sleep schedules for a {{age}} year old \
{{profession}}. Format your response as a JSON array named 'schedules', each with 'name', 'wake_up', 'sleep' and \
'description'.";

// (name, wake up, sleep, description)
const SCHEDULES: [(&str, &str, &str, &str); 5] =
    [("🌅 Early Bird", "6:00 AM", "10:00 PM", "Perfect for maximizing productivity"),
     ("😴 Relaxed Morning", "8:00 AM", "11:00 PM", "Balanced routine for better sleep"),
     ("📚 Study Focused", "7:00 AM", "12:00 AM", "Optimized for study sessions"),
     ("⚖️ Balanced Day", "7:30 AM", "11:30 PM", "Well-rounded daily routine"),
     ("🛋️ Weekend Vibes", "9:00 AM", "1:00 AM", "Relaxed schedule for rest days")];

pub fn definition() -> Result<WizardDefinition, CatalogError> {
    let def = WizardDefinition::builder(ID)
        .step(Step::new("about_you").titled("About You")
                                    .icon("moon", "#6366F1")
                                    .question(Question::number("age", "Age").bounded(1.0, 100.0))
                                    .question(Question::text("profession", "Profession")
                                                  .with_placeholder("e.g. Student, Nurse, Engineer")))
        .build()?;
    Ok(def)
}

pub fn fallback() -> InferenceResult {
    let items = SCHEDULES.iter()
                         .map(|(name, wake, sleep, description)| {
                             ResultItem::new(name, &format!("wake {wake}, sleep {sleep}. {description}"), None)
                         })
                         .collect();
    InferenceResult::fallback("Suggested sleep schedules", items)
}

pub fn spec() -> Result<WizardSpec, CatalogError> {
    Ok(WizardSpec { definition: Arc::new(definition()?),
                    title: "Smart Sleep & Bedtime Companion",
                    shape: RequestShape::prompt(PROMPT),
                    backend: Backend::Gemini,
                    fallback: Some(fallback()) })
}
