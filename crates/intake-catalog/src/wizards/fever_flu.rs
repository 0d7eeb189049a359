//! Fever & Flu Symptom Checker: seis pasos, diagnóstico diferencial vía Gemini.
use std::sync::Arc;

use intake_domain::{Question, Step, WizardDefinition};
use intake_inference::RequestShape;

use crate::catalog::{Backend, WizardSpec};
use crate::error::CatalogError;

pub const ID: &str = "fever_flu";

pub const PROMPT: &str = "You are a general specialist. Given the following patient symptoms, provide a list of all \
possible diagnoses with probability scores (out of 100, distributed across all possibilities) and a brief \
explanation for each. Format your response as a JSON array named 'possibilities', each with 'condition', \
'probability', and 'description'. Symptoms: {{answers}}";

pub fn definition() -> Result<WizardDefinition, CatalogError> {
    let def = WizardDefinition::builder(ID)
        .step(Step::new("basic_info").titled("Basic Information")
                                     .icon("person", "#3B82F6")
                                     .question(Question::number("age", "Age").bounded(1.0, 120.0)
                                                                             .with_placeholder("Enter your age"))
                                     .question(Question::select("gender", "Gender", ["male", "female", "other"])))
        .step(Step::new("fever_symptoms").titled("Fever")
                                         .icon("thermometer", "#EF4444")
                                         .question(Question::select("fever",
                                                                    "Current temperature",
                                                                    ["Normal (98.6°F)",
                                                                     "99-100°F",
                                                                     "101-102°F",
                                                                     "103°F+",
                                                                     "Not measured"])))
        .step(Step::new("respiratory_symptoms").titled("Respiratory Symptoms")
                                               .icon("cloud", "#06B6D4")
                                               .question(Question::boolean("cold", "Runny or blocked nose?"))
                                               .question(Question::select("sneezing",
                                                                          "Sneezing",
                                                                          ["none", "occasional", "frequent",
                                                                           "very frequent"]))
                                               .question(Question::select("cough",
                                                                          "Cough",
                                                                          ["none", "dry cough", "wet cough",
                                                                           "persistent cough"])))
        .step(Step::new("other_symptoms").titled("Other Symptoms")
                                         .icon("medical", "#8B5CF6")
                                         .question(Question::boolean("sore_throat", "Sore throat?"))
                                         .question(Question::boolean("headache", "Headache?"))
                                         .question(Question::select("fatigue",
                                                                    "Fatigue",
                                                                    ["normal", "mild fatigue", "moderate fatigue",
                                                                     "severe fatigue"])))
        .step(Step::new("serious_symptoms").titled("Serious Symptoms")
                                           .icon("warning", "#F59E0B")
                                           .question(Question::boolean("breathing_difficulty",
                                                                       "Difficulty breathing?"))
                                           .question(Question::boolean("loss_of_smell_taste",
                                                                       "Loss of smell or taste?"))
                                           .question(Question::boolean("diarrhea", "Diarrhea?")))
        .step(Step::new("duration_vaccination").titled("Duration & Vaccination")
                                               .icon("calendar", "#10B981")
                                               .question(Question::number("symptom_duration_days",
                                                                          "Days with symptoms").bounded(0.0, 60.0))
                                               .question(Question::boolean("vaccinated", "Vaccinated?"))
                                               .question(Question::select("covid_test_result",
                                                                          "COVID test result",
                                                                          ["not tested", "positive", "negative",
                                                                           "pending results"])))
        .build()?;
    Ok(def)
}

pub fn spec() -> Result<WizardSpec, CatalogError> {
    Ok(WizardSpec { definition: Arc::new(definition()?),
                    title: "Fever & Flu Symptom Checker",
                    shape: RequestShape::prompt(PROMPT),
                    backend: Backend::Gemini,
                    fallback: None })
}
