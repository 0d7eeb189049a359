use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use intake_core::{Transition, Wizard, WizardError, WizardEventKind, WizardHandle, WizardState};
use intake_domain::{AnswerValue, Question, Step, ValidationError, WizardDefinition};
use intake_inference::{InferenceError, InferenceRequest, InferenceResult, InferenceService, NormalizationTier,
                       RequestShape, ResultItem, ResultSource};
use tokio::sync::Notify;

/// Servicio falso: espera `gate` (si existe) y devuelve `outcome`.
struct StubService {
    calls: AtomicUsize,
    gate: Option<Arc<Notify>>,
    outcome: Result<InferenceResult, InferenceError>,
}

impl StubService {
    fn ok() -> Self {
        Self { calls: AtomicUsize::new(0),
               gate: None,
               outcome: Ok(flu()) }
    }

    fn failing(error: InferenceError) -> Self {
        Self { calls: AtomicUsize::new(0),
               gate: None,
               outcome: Err(error) }
    }

    fn gated(gate: Arc<Notify>) -> Self {
        Self { calls: AtomicUsize::new(0),
               gate: Some(gate),
               outcome: Ok(flu()) }
    }
}

#[async_trait]
impl InferenceService for StubService {
    async fn infer(&self, _request: InferenceRequest) -> Result<InferenceResult, InferenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.outcome.clone()
    }
}

fn flu() -> InferenceResult {
    InferenceResult { primary_label: "Flu".into(),
                      confidence_percent: Some(62.0),
                      items: vec![ResultItem::new("Flu", "likely viral infection", Some(62.0))],
                      raw: "{}".into(),
                      source: ResultSource::Live,
                      tier: NormalizationTier::Direct }
}

fn definition() -> Arc<WizardDefinition> {
    Arc::new(WizardDefinition::builder("fever_flu")
                 .step(Step::new("basic_info").question(Question::number("age", "Age").bounded(1.0, 120.0)))
                 .step(Step::new("fever_symptoms").question(Question::select("feverLevel",
                                                                            "Fever",
                                                                            ["Normal (98.6°F)", "101-102°F"])))
                 .build()
                 .unwrap())
}

fn handle(service: Arc<StubService>) -> WizardHandle {
    WizardHandle::new(Wizard::new(definition(), RequestShape::FieldMap), service)
}

async fn fill(h: &WizardHandle) {
    h.answer("age", "34").unwrap();
    assert_eq!(h.advance().await.unwrap(), Transition::Moved { to: 1 });
    h.answer("feverLevel", "101-102°F").unwrap();
}

#[tokio::test]
async fn out_of_range_then_valid_answer_moves_forward() {
    let h = handle(Arc::new(StubService::ok()));
    let err = h.answer("age", "150").unwrap_err();
    assert!(matches!(err, WizardError::Validation(ValidationError::OutOfRange { .. })));
    assert!(h.answers().is_empty());
    h.answer("age", "34").unwrap();
    assert_eq!(h.advance().await.unwrap(), Transition::Moved { to: 1 });
    assert_eq!(h.current_index(), 1);
}

#[tokio::test]
async fn current_step_follows_navigation() {
    let h = handle(Arc::new(StubService::ok()));
    let keys = |h: &WizardHandle| -> Vec<String> {
        h.current_step().map(|s| s.questions.iter().map(|q| q.key.clone()).collect()).unwrap_or_default()
    };
    assert_eq!(keys(&h), vec!["age"]);
    h.answer("age", "34").unwrap();
    h.advance().await.unwrap();
    assert_eq!(keys(&h), vec!["feverLevel"]);
    h.retreat();
    assert_eq!(h.current_step().map(|s| s.id), Some("basic_info".to_string()));
}

#[tokio::test]
async fn advance_never_moves_without_completion() {
    let h = handle(Arc::new(StubService::ok()));
    assert!(!h.can_advance());
    assert!(h.advance().await.is_err());
    assert_eq!(h.current_index(), 0);
    h.answer("age", "34").unwrap();
    assert!(h.can_advance());
    h.advance().await.unwrap();
    assert!(!h.can_advance());
    assert!(h.advance().await.is_err());
    assert_eq!(h.current_index(), 1);
}

#[tokio::test]
async fn final_advance_submits_and_succeeds() {
    let service = Arc::new(StubService::ok());
    let h = handle(service.clone());
    fill(&h).await;
    match h.advance().await.unwrap() {
        Transition::Succeeded(result) => assert_eq!(result.items[0].label, "Flu"),
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(service.calls.load(Ordering::SeqCst), 1);
    let kinds: Vec<_> = h.events().into_iter().map(|e| e.kind).collect();
    assert!(kinds.iter().any(|k| matches!(k, WizardEventKind::SubmissionStarted { generation: 1, .. })));
    assert!(kinds.iter().any(|k| matches!(k, WizardEventKind::SubmissionSucceeded { items: 1, .. })));
}

#[tokio::test]
async fn timeout_keeps_answers_and_reset_still_works() {
    let h = handle(Arc::new(StubService::failing(InferenceError::Timeout)));
    fill(&h).await;
    let before = h.answers();
    assert_eq!(h.advance().await.unwrap(), Transition::Failed(InferenceError::Timeout));
    assert_eq!(h.answers(), before);
    assert_eq!(h.state(), WizardState::Failed { error: InferenceError::Timeout });
    h.reset();
    assert_eq!(h.state(), WizardState::InProgress { index: 0 });
    assert!(h.answers().is_empty());
}

#[tokio::test]
async fn retreat_on_first_step_is_noop() {
    let h = handle(Arc::new(StubService::ok()));
    assert_eq!(h.retreat(), 0);
    assert_eq!(h.state(), WizardState::InProgress { index: 0 });
}

#[tokio::test]
async fn navigation_never_clears_answers() {
    let h = handle(Arc::new(StubService::ok()));
    fill(&h).await;
    for _ in 0..3 {
        h.retreat();
        h.advance().await.unwrap();
    }
    h.retreat();
    h.retreat();
    let answers = h.answers();
    assert_eq!(answers.get("age"), Some(&AnswerValue::Number(34.0)));
    assert_eq!(answers.get("feverLevel"), Some(&AnswerValue::Text("101-102°F".into())));
}

#[tokio::test]
async fn second_submission_is_rejected_while_first_in_flight() {
    let gate = Arc::new(Notify::new());
    let service = Arc::new(StubService::gated(gate.clone()));
    let h = handle(service.clone());
    fill(&h).await;

    let first = tokio::spawn({
        let h = h.clone();
        async move { h.advance().await }
    });
    while !h.state().is_submitting() {
        tokio::task::yield_now().await;
    }

    let second = h.advance().await.unwrap_err();
    assert!(second.is_in_flight());
    assert!(h.answer("age", "40").unwrap_err().is_in_flight());

    gate.notify_one();
    let first = first.await.unwrap().unwrap();
    assert!(matches!(first, Transition::Succeeded(_)));
    assert_eq!(service.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn cancel_discards_late_result() {
    let gate = Arc::new(Notify::new());
    let h = handle(Arc::new(StubService::gated(gate.clone())));
    fill(&h).await;

    let pending = tokio::spawn({
        let h = h.clone();
        async move { h.advance().await }
    });
    while !h.state().is_submitting() {
        tokio::task::yield_now().await;
    }
    assert!(h.cancel());
    let outcome = tokio::time::timeout(Duration::from_secs(1), pending).await.unwrap().unwrap().unwrap();
    assert_eq!(outcome, Transition::Cancelled);
    assert_eq!(h.state(), WizardState::Completed);
    assert_eq!(h.answers().len(), 2);
}

#[tokio::test]
async fn retry_after_failure_then_fallback() {
    let h = handle(Arc::new(StubService::failing(InferenceError::Http(502))));
    fill(&h).await;
    assert_eq!(h.advance().await.unwrap(), Transition::Failed(InferenceError::Http(502)));
    assert_eq!(h.retry().await.unwrap(), Transition::Failed(InferenceError::Http(502)));

    let fallback = InferenceResult::fallback("Common cold", vec![ResultItem::new("Common cold", "Rest", None)]);
    h.accept_fallback(fallback).unwrap();
    match h.state() {
        WizardState::Succeeded { result } => assert_eq!(result.source, ResultSource::Fallback),
        other => panic!("unexpected {other:?}"),
    }
}
