//! Demo: recorre el wizard de fiebre/gripe con respuestas fijas.
//!
//! Sin la feature `live_demo` la inferencia se resuelve localmente con una
//! respuesta enlatada estilo Gemini (texto con JSON embebido), pasando por el
//! mismo pipeline de normalización. Con `live_demo` se usa el endpoint real
//! configurado en `.env` (`GOOGLE_API_KEY`, `GEMINI_API_URL`).
use std::sync::Arc;

use intakeflow_rust::{Catalog, Transition, Wizard, WizardHandle};

const ANSWERS: &[(&str, &str)] = &[("age", "34"),
                                   ("gender", "female"),
                                   ("fever", "101-102°F"),
                                   ("cold", "yes"),
                                   ("sneezing", "occasional"),
                                   ("cough", "dry cough"),
                                   ("sore_throat", "yes"),
                                   ("headache", "yes"),
                                   ("fatigue", "moderate fatigue"),
                                   ("breathing_difficulty", "no"),
                                   ("loss_of_smell_taste", "no"),
                                   ("diarrhea", "no"),
                                   ("symptom_duration_days", "3"),
                                   ("vaccinated", "yes"),
                                   ("covid_test_result", "negative")];

#[cfg(not(feature = "live_demo"))]
mod offline {
    use async_trait::async_trait;
    use intake_inference::{normalize, InferenceError, InferenceRequest, InferenceResult, InferenceService};

    const CANNED: &str = "Here is the assessment:\n```json\n{\"possibilities\": [\
        {\"condition\": \"Influenza\", \"probability\": 55, \"description\": \"Fever, cough and fatigue.\"},\
        {\"condition\": \"Common cold\", \"probability\": 30, \"description\": \"Mild upper respiratory signs.\"},\
        {\"condition\": \"COVID-19\", \"probability\": 15, \"description\": \"Negative test lowers likelihood.\"}]}\n```";

    pub struct OfflineService;

    #[async_trait]
    impl InferenceService for OfflineService {
        async fn infer(&self, request: InferenceRequest) -> Result<InferenceResult, InferenceError> {
            log::debug!("offline prompt: {}", request.as_text());
            normalize(CANNED)
        }
    }
}

fn print_outcome(outcome: &Transition) {
    match outcome {
        Transition::Succeeded(result) => {
            println!("Diagnóstico principal: {} ({:?}, {:?})", result.primary_label, result.source, result.tier);
            for item in &result.items {
                let score = item.score.map(|s| format!("{s:.0}%")).unwrap_or_else(|| "-".to_string());
                println!("  - {:<14} {:>4}  {}", item.label, score, item.detail);
            }
        }
        Transition::Failed(e) => println!("Inferencia fallida: {e}"),
        other => println!("Resultado: {other:?}"),
    }
}

async fn drive(handle: &WizardHandle) -> Result<Transition, intakeflow_rust::WizardError> {
    loop {
        let Some(step) = handle.current_step() else { return Ok(Transition::Cancelled) };
        for question in &step.questions {
            let Some((_, raw)) = ANSWERS.iter().find(|(key, _)| *key == question.key) else {
                eprintln!("sin respuesta de demo para '{}'", question.key);
                continue;
            };
            handle.answer(&question.key, raw)?;
        }
        match handle.advance().await? {
            Transition::Moved { to } => println!("-> paso {}", to + 1),
            other => return Ok(other),
        }
    }
}

#[tokio::main]
async fn main() {
    let catalog = match Catalog::builtin() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("catálogo inválido: {e}");
            std::process::exit(1);
        }
    };
    println!("Wizards disponibles: {}", catalog.ids().collect::<Vec<_>>().join(", "));

    #[cfg(not(feature = "live_demo"))]
    let handle = {
        let Ok(spec) = catalog.get("fever_flu") else { return };
        WizardHandle::new(Wizard::new(spec.definition.clone(), spec.shape.clone()), Arc::new(offline::OfflineService))
    };

    #[cfg(feature = "live_demo")]
    let handle = {
        let config = Arc::new(intakeflow_rust::EnvConfig::from_env());
        let app = match intakeflow_rust::IntakeApp::new(config) {
            Ok(app) => app,
            Err(e) => {
                eprintln!("config: {e}");
                std::process::exit(1);
            }
        };
        match app.start("fever_flu") {
            Ok(h) => h,
            Err(e) => {
                eprintln!("config: {e}");
                std::process::exit(1);
            }
        }
    };

    match drive(&handle).await {
        Ok(outcome) => print_outcome(&outcome),
        Err(e) => eprintln!("wizard: {e}"),
    }
    println!("Eventos registrados: {}", handle.events().len());
}
