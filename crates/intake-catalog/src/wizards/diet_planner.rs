//! Daily Diet & Nutrition Planner: cuatro pasos, backend REST de nutrición.
use std::sync::Arc;

use intake_domain::{Question, Step, WizardDefinition};
use intake_inference::RequestShape;
use intake_persistence::config::DIET_ENDPOINT;

use crate::catalog::{Backend, WizardSpec};
use crate::error::CatalogError;

pub const ID: &str = "diet_planner";

const DIETS: [&str; 11] = ["Non-Vegetarian", "Vegetarian", "Vegan", "Plant-Based", "Mediterranean", "Keto", "Paleo",
                           "Low-Carb", "Gluten-Free", "Pescatarian", "Flexitarian"];
const ACTIVITY: [&str; 5] = ["Sedentary", "Light", "Moderate", "Active", "Very Active"];
const DISEASES: [&str; 11] = ["None", "Diabetes", "Hypertension", "Heart Disease", "GERD", "IBS", "Celiac", "Obesity",
                              "Thyroid", "Iron Deficiency", "B12 Deficiency"];
const ALLERGIES: [&str; 10] = ["None", "Peanuts", "Tree Nuts", "Milk", "Eggs", "Soy", "Fish", "Shellfish", "Wheat",
                               "Multiple"];
const GOALS: [&str; 6] = ["Weight Loss", "Maintenance", "Weight Gain", "Muscle Gain", "Better Health",
                          "Athletic Performance"];

pub fn definition() -> Result<WizardDefinition, CatalogError> {
    let def = WizardDefinition::builder(ID)
        .step(Step::new("body").titled("Body Measurements")
                               .icon("body", "#10B981")
                               .question(Question::number("age", "Age").bounded(1.0, 120.0)
                                                                       .with_placeholder("Enter your age"))
                               .question(Question::number("weight", "Weight (kg)").bounded(20.0, 300.0)
                                                                                  .with_placeholder("Enter your weight"))
                               .question(Question::number("height", "Height (cm)").bounded(50.0, 250.0)
                                                                                  .with_placeholder("Enter your height")))
        .step(Step::new("preferences").titled("Preferences")
                                      .icon("restaurant", "#F59E0B")
                                      .question(Question::select("gender", "Gender", ["Male", "Female"]))
                                      .question(Question::select("diet_preference", "Diet preference", DIETS)))
        .step(Step::new("activity").titled("Activity")
                                   .icon("walk", "#3B82F6")
                                   .question(Question::select("activity_level", "Activity level", ACTIVITY))
                                   .question(Question::number("weekly_activity", "Active days per week")
                                                 .bounded(0.0, 7.0)
                                                 .with_placeholder("How many days per week?")))
        .step(Step::new("health").titled("Health & Goals")
                                 .icon("heart", "#EF4444")
                                 .question(Question::select("disease", "Condition", DISEASES))
                                 .question(Question::select("allergies", "Allergies", ALLERGIES))
                                 .question(Question::select("health_goal", "Goal", GOALS)))
        .build()?;
    Ok(def)
}

pub fn spec() -> Result<WizardSpec, CatalogError> {
    Ok(WizardSpec { definition: Arc::new(definition()?),
                    title: "Daily Diet & Nutrition Planner",
                    shape: RequestShape::FieldMap,
                    backend: Backend::Rest { url_key: DIET_ENDPOINT },
                    fallback: None })
}
