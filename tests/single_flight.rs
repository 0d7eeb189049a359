//! Una sola inferencia en vuelo por wizard, también con backend real.
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::routing::post;
use axum::{Json, Router};
use intake_inference::{InferenceRequest, InferenceService};
use intake_persistence::config::DIABETES_ENDPOINT;
use intakeflow_rust::{Catalog, InferenceError, InferenceResult, IntakeApp, StaticConfig, Transition, Wizard,
                      WizardEventKind, WizardHandle, WizardState};
use serde_json::json;

const MEASURES: [(&str, &str); 8] = [("pregnancies", "1"),
                                     ("glucose", "85"),
                                     ("bloodpressure", "66"),
                                     ("skinthickness", "29"),
                                     ("insulin", "94"),
                                     ("bmi", "26.6"),
                                     ("dpf", "0.351"),
                                     ("age", "31")];

fn fill(handle: &WizardHandle) {
    for (key, raw) in MEASURES {
        handle.answer(key, raw).unwrap();
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_advances_hit_backend_once() {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let router = Router::new().route("/predict",
                                     post(move || {
                                         let counter = counter.clone();
                                         async move {
                                             counter.fetch_add(1, Ordering::SeqCst);
                                             tokio::time::sleep(Duration::from_millis(300)).await;
                                             Json(json!({"success": true, "prediction": "Low risk", "confidence": 0.91}))
                                         }
                                     }));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });

    let config = StaticConfig::new().with(DIABETES_ENDPOINT, &format!("{base}/predict"));
    let app = IntakeApp::new(Arc::new(config)).unwrap();
    let handle = app.start("diabetes_monitor").unwrap();
    fill(&handle);

    let (a, b) = tokio::join!(handle.advance(), handle.advance());
    let outcomes = [a, b];
    let succeeded = outcomes.iter().filter(|o| matches!(o, Ok(Transition::Succeeded(_)))).count();
    let rejected = outcomes.iter().filter(|o| matches!(o, Err(e) if e.is_in_flight())).count();
    assert_eq!((succeeded, rejected), (1, 1));
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    let result = handle.state().result().cloned().unwrap();
    assert_eq!(result.primary_label, "Low risk");
    assert_eq!(result.confidence_percent, Some(91.0));
}

/// Servicio que nunca responde hasta que se le cancela.
struct Hanging;

#[async_trait]
impl InferenceService for Hanging {
    async fn infer(&self, _request: InferenceRequest) -> Result<InferenceResult, InferenceError> {
        std::future::pending().await
    }
}

#[tokio::test]
async fn reset_during_submission_cancels_and_resubmits_cleanly() {
    let catalog = Catalog::builtin().unwrap();
    let spec = catalog.get("diabetes_monitor").unwrap();
    let handle = WizardHandle::new(Wizard::new(spec.definition.clone(), spec.shape.clone()), Arc::new(Hanging));
    fill(&handle);

    let pending = tokio::spawn({
        let handle = handle.clone();
        async move { handle.advance().await }
    });
    while !handle.state().is_submitting() {
        tokio::task::yield_now().await;
    }
    handle.reset();
    let outcome = tokio::time::timeout(Duration::from_secs(1), pending).await.unwrap().unwrap();
    assert_eq!(outcome.unwrap(), Transition::Cancelled);
    assert_eq!(handle.state(), WizardState::InProgress { index: 0 });
    assert!(handle.answers().is_empty());

    let kinds: Vec<_> = handle.events().into_iter().map(|e| e.kind).collect();
    assert!(matches!(kinds.last(), Some(WizardEventKind::Reset)));
}

struct Echo;

#[async_trait]
impl InferenceService for Echo {
    async fn infer(&self, request: InferenceRequest) -> Result<InferenceResult, InferenceError> {
        intake_inference::normalize(&request.to_json().to_string())
    }
}

#[test]
fn blocking_driver_sees_same_transitions() {
    let catalog = Catalog::builtin().unwrap();
    let spec = catalog.get("diabetes_monitor").unwrap();
    let handle = WizardHandle::new(Wizard::new(spec.definition.clone(), spec.shape.clone()), Arc::new(Echo));
    assert!(tokio_test::block_on(handle.advance()).is_err());
    fill(&handle);
    let transition = tokio_test::assert_ok!(tokio_test::block_on(handle.advance()));
    // el eco de un mapa plano de números no tiene contenido reconocible
    assert!(matches!(transition, Transition::Failed(InferenceError::UnparsableResponse { .. })));
    assert_eq!(handle.answers().len(), MEASURES.len());
}
