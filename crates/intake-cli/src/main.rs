use std::process::exit;
use std::sync::Arc;
use std::time::Duration;

use intake_catalog::{Catalog, WizardSpec};
use intake_core::{Transition, Wizard, WizardError, WizardHandle};
use intake_domain::{WizardDefinition, BOOLEAN_NO, BOOLEAN_YES};
use intake_inference::{EndpointClient, ImageUpload, InferenceClient, InferenceResult, DEFAULT_TIMEOUT};
use intake_persistence::config::{IMAGE_SERVERS, INFERENCE_TIMEOUT_SECS, SESSION_FILE};
use intake_persistence::{ConfigProvider, EnvConfig, FileSessionStore, Role, SessionManager, UserSession};
use serde_json::Value;

const USAGE: &str = "Uso:
  intake-cli list
  intake-cli show <wizard>
  intake-cli run <wizard> --answers <file.json> [--fallback]
  intake-cli classify <predict|analyze> --image <file> [--server <url>]...
  intake-cli login --role <patient|doctor|pharmacy> --email <EMAIL> [--name <NAME>]
  intake-cli whoami
  intake-cli logout";

// Códigos de salida
const EXIT_USAGE: i32 = 2;
const EXIT_VALIDATION: i32 = 3;
const EXIT_INFERENCE: i32 = 4;
const EXIT_CONFIG: i32 = 5;

fn usage() -> ! {
    eprintln!("{USAGE}");
    exit(EXIT_USAGE);
}

fn fail(code: i32, msg: impl std::fmt::Display) -> ! {
    eprintln!("[intake] {msg}");
    exit(code);
}

/// Valor de `--flag <valor>` si está presente.
fn flag(args: &[String], name: &str) -> Option<String> {
    args.iter().position(|a| a == name).and_then(|i| args.get(i + 1)).cloned()
}

#[tokio::main]
async fn main() {
    // Cargar .env si existe (API key, endpoints)
    let _ = dotenvy::dotenv();
    let args: Vec<String> = std::env::args().collect();
    let Some(command) = args.get(1) else { usage() };
    let config = EnvConfig::from_env();
    let catalog = Catalog::builtin().unwrap_or_else(|e| fail(EXIT_CONFIG, e));

    match command.as_str() {
        "list" => {
            for spec in catalog.iter() {
                println!("{:<18} {} ({} steps)", spec.id(), spec.title, spec.definition.len());
            }
        }
        "show" => {
            let id = args.get(2).unwrap_or_else(|| usage());
            let spec = catalog.get(id).unwrap_or_else(|e| fail(EXIT_USAGE, e));
            match serde_json::to_string_pretty(spec.definition.as_ref()) {
                Ok(json) => println!("{json}"),
                Err(e) => fail(EXIT_CONFIG, e),
            }
        }
        "run" => {
            let id = args.get(2).unwrap_or_else(|| usage());
            let path = flag(&args, "--answers").unwrap_or_else(|| usage());
            let allow_fallback = args.iter().any(|a| a == "--fallback");
            let spec = catalog.get(id).unwrap_or_else(|e| fail(EXIT_USAGE, e));
            let answers = read_answers(&path);
            let result = run(spec, &config, &answers, allow_fallback).await;
            match serde_json::to_string_pretty(&result) {
                Ok(json) => println!("{json}"),
                Err(e) => fail(EXIT_INFERENCE, e),
            }
        }
        "classify" => {
            let route = args.get(2).filter(|r| !r.starts_with("--")).unwrap_or_else(|| usage());
            let path = flag(&args, "--image").unwrap_or_else(|| usage());
            let result = classify(&config, route, &path, &servers(&args, &config)).await;
            match serde_json::to_string_pretty(&result) {
                Ok(json) => println!("{json}"),
                Err(e) => fail(EXIT_INFERENCE, e),
            }
        }
        "login" => {
            let role = match flag(&args, "--role").as_deref() {
                Some("patient") => Role::Patient,
                Some("doctor") => Role::Doctor,
                Some("pharmacy") => Role::Pharmacy,
                _ => usage(),
            };
            let email = flag(&args, "--email").unwrap_or_else(|| usage());
            let mut session = UserSession::new(role, &email).via("cli");
            if let Some(name) = flag(&args, "--name") {
                session = session.named(&name);
            }
            let session = sessions(&config).login(session).unwrap_or_else(|e| fail(EXIT_CONFIG, e));
            println!("Welcome {}!", session.display_name());
        }
        "whoami" => {
            let name = sessions(&config).display_name().unwrap_or_else(|e| fail(EXIT_CONFIG, e));
            println!("{name}");
        }
        "logout" => sessions(&config).logout().unwrap_or_else(|e| fail(EXIT_CONFIG, e)),
        _ => usage(),
    }
}

/// Bases de `--server` (repetible); si no hay, las de `IMAGE_SERVERS`.
fn servers(args: &[String], config: &dyn ConfigProvider) -> Vec<String> {
    let given: Vec<String> = args.windows(2)
                                 .filter(|w| w[0] == "--server")
                                 .map(|w| w[1].clone())
                                 .collect();
    if given.is_empty() {
        config.get_list(IMAGE_SERVERS)
    } else {
        given
    }
}

async fn classify(config: &dyn ConfigProvider, route: &str, path: &str, bases: &[String]) -> InferenceResult {
    if bases.is_empty() {
        fail(EXIT_CONFIG, format!("no image servers: pass --server or set {IMAGE_SERVERS}"));
    }
    let bytes = std::fs::read(path).unwrap_or_else(|e| fail(EXIT_USAGE, format!("{path}: {e}")));
    let file_name = std::path::Path::new(path).file_name()
                                              .and_then(|n| n.to_str())
                                              .unwrap_or("image.jpg");
    let timeout = match config.get_u64(INFERENCE_TIMEOUT_SECS) {
        Ok(Some(secs)) => Duration::from_secs(secs),
        Ok(None) => DEFAULT_TIMEOUT,
        Err(e) => fail(EXIT_CONFIG, e),
    };
    let client = InferenceClient::new().unwrap_or_else(|e| fail(EXIT_CONFIG, e));
    client.classify_image(bases, route, &ImageUpload::jpeg(file_name, bytes), timeout)
          .await
          .unwrap_or_else(|e| fail(EXIT_INFERENCE, e))
}

fn sessions(config: &EnvConfig) -> SessionManager<FileSessionStore> {
    let path = config.require(SESSION_FILE).unwrap_or_else(|e| fail(EXIT_CONFIG, e));
    let store = FileSessionStore::open(&path).unwrap_or_else(|e| fail(EXIT_CONFIG, e));
    SessionManager::new(store)
}

fn read_answers(path: &str) -> serde_json::Map<String, Value> {
    let text = std::fs::read_to_string(path).unwrap_or_else(|e| fail(EXIT_USAGE, format!("{path}: {e}")));
    match serde_json::from_str(&text) {
        Ok(Value::Object(map)) => map,
        Ok(_) => fail(EXIT_USAGE, format!("{path}: expected a JSON object of answers")),
        Err(e) => fail(EXIT_USAGE, format!("{path}: {e}")),
    }
}

/// Claves del archivo que no corresponden a ninguna pregunta del wizard.
fn unknown_keys(definition: &WizardDefinition, answers: &serde_json::Map<String, Value>) -> Vec<String> {
    answers.keys()
           .filter(|key| definition.question(key).is_none())
           .cloned()
           .collect()
}

/// Texto crudo tal como lo teclearía el usuario.
fn raw_input(value: &Value) -> String {
    match value {
        Value::Bool(true) => BOOLEAN_YES.to_string(),
        Value::Bool(false) => BOOLEAN_NO.to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Recorre el wizard paso a paso con las respuestas del archivo.
async fn run(spec: &WizardSpec,
             config: &dyn ConfigProvider,
             answers: &serde_json::Map<String, Value>,
             allow_fallback: bool)
             -> InferenceResult {
    let endpoint = spec.endpoint(config).unwrap_or_else(|e| fail(EXIT_CONFIG, e));
    let client = InferenceClient::new().unwrap_or_else(|e| fail(EXIT_CONFIG, e));
    let service = Arc::new(EndpointClient::new(Arc::new(client), endpoint));
    let handle = WizardHandle::new(Wizard::new(spec.definition.clone(), spec.shape.clone()), service);
    for key in unknown_keys(&spec.definition, answers) {
        eprintln!("[intake] warning: '{key}' is not a question of {}; ignored", spec.id());
    }

    loop {
        let Some(step) = handle.current_step() else { fail(EXIT_VALIDATION, "wizard has no steps") };
        for question in &step.questions {
            if let Some(value) = answers.get(&question.key) {
                if let Err(e) = handle.answer(&question.key, &raw_input(value)) {
                    fail(EXIT_VALIDATION, e);
                }
            }
        }
        let transition = match handle.advance().await {
            Ok(t) => t,
            Err(e @ WizardError::Validation(_)) => fail(EXIT_VALIDATION, e),
            Err(e) => fail(EXIT_INFERENCE, e),
        };
        match transition {
            Transition::Moved { .. } => continue,
            Transition::Succeeded(result) => return result,
            Transition::Failed(error) => {
                let Some(fallback) = spec.fallback.clone().filter(|_| allow_fallback) else {
                    fail(EXIT_INFERENCE, error)
                };
                eprintln!("[intake] {error}; using static content");
                if let Err(e) = handle.accept_fallback(fallback) {
                    fail(EXIT_INFERENCE, e);
                }
                return handle.state().result().cloned().unwrap_or_else(|| fail(EXIT_INFERENCE, error));
            }
            Transition::Cancelled | Transition::Discarded => fail(EXIT_INFERENCE, "submission did not complete"),
        }
    }
}
