//! Cliente real (reqwest) contra un servidor axum local.
use axum::extract::Multipart;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use intake_inference::{EndpointConfig, ImageUpload, InferenceClient, InferenceError, InferenceRequest, NormalizationTier};
use serde_json::{json, Map, Value};
use std::time::Duration;

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn fields() -> InferenceRequest {
    let mut map = Map::new();
    map.insert("glucose".into(), json!(148));
    map.insert("bmi".into(), json!(33.6));
    InferenceRequest::Fields(map)
}

#[tokio::test]
async fn rest_endpoint_round_trip() {
    let app = Router::new().route("/predict",
                                  post(|Json(body): Json<Value>| async move {
                                      // el backend ve el mapa plano tal cual
                                      assert_eq!(body["glucose"], json!(148));
                                      Json(json!({"success": true, "prediction": "High risk", "confidence": 0.87}))
                                  }));
    let base = serve(app).await;
    let client = InferenceClient::new().unwrap();
    let ep = EndpointConfig::new("diabetes", &format!("{base}/predict"));
    let result = client.infer(&fields(), &ep).await.unwrap();
    assert_eq!(result.primary_label, "High risk");
    assert_eq!(result.tier, NormalizationTier::Direct);
    assert!((result.confidence_percent.unwrap() - 87.0).abs() < 1e-9);
}

#[tokio::test]
async fn slow_endpoint_times_out() {
    let app = Router::new().route("/predict",
                                  post(|| async {
                                      tokio::time::sleep(Duration::from_secs(5)).await;
                                      Json(json!({"prediction": "late"}))
                                  }));
    let base = serve(app).await;
    let client = InferenceClient::new().unwrap();
    let ep = EndpointConfig::new("slow", &format!("{base}/predict")).with_timeout(Duration::from_millis(200));
    assert_eq!(client.infer(&fields(), &ep).await.unwrap_err(), InferenceError::Timeout);
}

#[tokio::test]
async fn server_error_is_http_status() {
    let app = Router::new().route("/predict", post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }));
    let base = serve(app).await;
    let client = InferenceClient::new().unwrap();
    let ep = EndpointConfig::new("broken", &format!("{base}/predict"));
    assert_eq!(client.infer(&fields(), &ep).await.unwrap_err(), InferenceError::Http(500));
}

#[tokio::test]
async fn refused_connection_is_transport_error() {
    // puerto reservado y liberado: nadie escucha ahí
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    let client = InferenceClient::new().unwrap();
    let ep = EndpointConfig::new("gone", &format!("http://127.0.0.1:{port}/predict"));
    assert!(matches!(client.infer(&fields(), &ep).await, Err(InferenceError::Transport(_))));
}

#[tokio::test]
async fn probe_finds_status_route() {
    let app = Router::new().route("/status", get(|| async { Json(json!({"status": "ok"})) }));
    let base = serve(app).await;
    let client = InferenceClient::new().unwrap();
    let found = client.probe(&["http://127.0.0.1:9/".to_string(), base.clone()], Duration::from_secs(2))
                      .await
                      .unwrap();
    assert_eq!(found, base);
}

#[tokio::test]
async fn image_is_uploaded_as_file_field() {
    let app = Router::new().route("/status", get(|| async { Json(json!({"status": "ok"})) }))
                           .route("/predict",
                                  post(|mut form: Multipart| async move {
                                      let field = form.next_field().await.unwrap().unwrap();
                                      assert_eq!(field.name(), Some("file"));
                                      assert_eq!(field.file_name(), Some("skin_image.jpg"));
                                      assert_eq!(field.content_type(), Some("image/jpeg"));
                                      let bytes = field.bytes().await.unwrap();
                                      assert_eq!(bytes.to_vec(), vec![0xFF, 0xD8, 0xFF]);
                                      Json(json!({"prediction": "Eczema", "confidence_percentage": "88.50%"}))
                                  }));
    let base = serve(app).await;
    let client = InferenceClient::new().unwrap();
    let image = ImageUpload::jpeg("skin_image.jpg", vec![0xFF, 0xD8, 0xFF]);
    let result = client.classify_image(&[base], "predict", &image, Duration::from_secs(2)).await.unwrap();
    assert_eq!(result.primary_label, "Eczema");
    assert_eq!(result.confidence_percent, Some(88.5));
    assert_eq!(result.tier, NormalizationTier::Direct);
}
