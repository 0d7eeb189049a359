//! Diabetes & Glucose Risk Monitor: un único formulario de ocho medidas
//! clínicas enviado como mapa plano al clasificador REST.
use std::sync::Arc;

use intake_domain::{Question, Step, WizardDefinition};
use intake_inference::RequestShape;
use intake_persistence::config::DIABETES_ENDPOINT;

use crate::catalog::{Backend, WizardSpec};
use crate::error::CatalogError;

pub const ID: &str = "diabetes_monitor";

// (key, prompt, placeholder, min, max)
// Límites físicos; el placeholder sólo sugiere el rango habitual del modelo.
const MEASURES: [(&str, &str, &str, f64, f64); 8] =
    [("pregnancies", "Pregnancies", "Number of pregnancies", 0.0, 30.0),
     ("glucose", "Glucose Level", "mg/dL (70-200)", 0.0, 1000.0),
     ("bloodpressure", "Blood Pressure", "mmHg (60-140)", 0.0, 300.0),
     ("skinthickness", "Skin Thickness", "mm (10-50)", 0.0, 100.0),
     ("insulin", "Insulin Level", "μU/mL (15-276)", 0.0, 1000.0),
     ("bmi", "BMI", "Body Mass Index (15-50)", 0.0, 100.0),
     ("dpf", "Diabetes Pedigree Function", "0.078-2.42", 0.0, 10.0),
     ("age", "Age", "Years (21-81)", 1.0, 120.0)];

pub fn definition() -> Result<WizardDefinition, CatalogError> {
    let step = MEASURES.iter()
                       .fold(Step::new("clinical_measurements").titled("Health Metrics")
                                                               .icon("water", "#DC2626"),
                             |step, (key, prompt, placeholder, min, max)| {
                                 step.question(Question::number(key, prompt).bounded(*min, *max)
                                                                            .with_placeholder(placeholder))
                             });
    Ok(WizardDefinition::builder(ID).step(step).build()?)
}

pub fn spec() -> Result<WizardSpec, CatalogError> {
    Ok(WizardSpec { definition: Arc::new(definition()?),
                    title: "Diabetes & Glucose Risk Monitor",
                    shape: RequestShape::FieldMap,
                    backend: Backend::Rest { url_key: DIABETES_ENDPOINT },
                    fallback: None })
}
