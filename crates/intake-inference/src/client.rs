//! Cliente de inferencia: una llamada, sin reintentos automáticos.
//!
//! La política de reintento pertenece al llamador (botón "Retry" en la UI);
//! aquí cada `infer` es exactamente un POST.
use async_trait::async_trait;
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;

use crate::endpoint::{EndpointConfig, ImageUpload, InferenceRequest};
use crate::errors::InferenceError;
use crate::normalize::normalize;
use crate::result::InferenceResult;
use crate::transport::{InferenceTransport, ReqwestTransport};

#[derive(Debug, Clone)]
pub struct InferenceClient<T: InferenceTransport = ReqwestTransport> {
    transport: T,
}

impl InferenceClient<ReqwestTransport> {
    pub fn new() -> Result<Self, InferenceError> {
        Ok(Self { transport: ReqwestTransport::new()? })
    }
}

impl<T: InferenceTransport> InferenceClient<T> {
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn infer(&self, request: &InferenceRequest, endpoint: &EndpointConfig) -> Result<InferenceResult, InferenceError> {
        endpoint.validate()?;
        let body = endpoint.envelope.body_for(request);
        debug!("POST {} ({})", endpoint.name, endpoint.url);
        let response = self.transport
                           .post_json(&endpoint.url, &endpoint.query(), &body, endpoint.timeout)
                           .await?;
        if !response.is_success() {
            warn!("{} answered HTTP {}", endpoint.name, response.status);
            return Err(InferenceError::Http(response.status));
        }
        let text = endpoint.envelope.unwrap_body(&response.body)?;
        let mut result = normalize(&text)?;
        info!("{}: normalized {} item(s) via {:?}", endpoint.name, result.items.len(), result.tier);
        result.raw = response.body;
        Ok(result)
    }

    /// Sondea `{base}/status` en orden y devuelve la primera base que
    /// responde 2xx. Si ninguna responde, devuelve el último error visto.
    pub async fn probe(&self, bases: &[String], timeout: Duration) -> Result<String, InferenceError> {
        let mut last = InferenceError::InvalidEndpoint("no candidate base urls".to_string());
        for base in bases {
            let url = format!("{}/status", base.trim_end_matches('/'));
            match self.transport.get(&url, timeout).await {
                Ok(resp) if resp.is_success() => {
                    info!("reachable inference server: {base}");
                    return Ok(base.clone());
                }
                Ok(resp) => last = InferenceError::Http(resp.status),
                Err(e) => {
                    debug!("probe {url} failed: {e}");
                    last = e;
                }
            }
        }
        Err(last)
    }

    /// Clasificación de imagen: localiza un servidor vivo con `probe` y envía
    /// la imagen a `{base}/{route}` (`predict` para piel/ojos, `analyze` para
    /// platos). La respuesta pasa por la misma normalización que `infer`, así
    /// que `prediction` + `confidence_percentage` dan etiqueta y confianza.
    pub async fn classify_image(&self,
                                bases: &[String],
                                route: &str,
                                image: &ImageUpload,
                                timeout: Duration)
                                -> Result<InferenceResult, InferenceError> {
        let base = self.probe(bases, timeout).await?;
        let url = format!("{}/{}", base.trim_end_matches('/'), route.trim_start_matches('/'));
        let endpoint = EndpointConfig::new("image", &url).with_timeout(timeout);
        endpoint.validate()?;
        debug!("POST image {} ({} bytes) to {url}", image.file_name, image.bytes.len());
        let response = self.transport.post_image(&url, image, timeout).await?;
        if !response.is_success() {
            warn!("image classifier answered HTTP {}", response.status);
            return Err(InferenceError::Http(response.status));
        }
        let mut result = normalize(&response.body)?;
        info!("image classified as {} ({:?}%)", result.primary_label, result.confidence_percent);
        result.raw = response.body;
        Ok(result)
    }
}

/// Lo único que el wizard necesita de la capa de inferencia.
#[async_trait]
pub trait InferenceService: Send + Sync {
    async fn infer(&self, request: InferenceRequest) -> Result<InferenceResult, InferenceError>;
}

/// Cliente ligado a un endpoint concreto (uno por wizard).
#[derive(Debug, Clone)]
pub struct EndpointClient<T: InferenceTransport = ReqwestTransport> {
    client: Arc<InferenceClient<T>>,
    endpoint: EndpointConfig,
}

impl<T: InferenceTransport> EndpointClient<T> {
    pub fn new(client: Arc<InferenceClient<T>>, endpoint: EndpointConfig) -> Self {
        Self { client, endpoint }
    }

    pub fn endpoint(&self) -> &EndpointConfig {
        &self.endpoint
    }
}

#[async_trait]
impl<T: InferenceTransport> InferenceService for EndpointClient<T> {
    async fn infer(&self, request: InferenceRequest) -> Result<InferenceResult, InferenceError> {
        self.client.infer(&request, &self.endpoint).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::RequestShape;
    use crate::result::NormalizationTier;
    use crate::transport::TransportResponse;
    use serde_json::Value;
    use std::sync::Mutex;

    /// Transporte fijo que registra lo que recibe.
    struct Canned {
        status: u16,
        body: String,
        seen: Mutex<Vec<(String, Vec<(String, String)>, Value)>>,
    }

    impl Canned {
        fn new(status: u16, body: &str) -> Self {
            Self { status,
                   body: body.to_string(),
                   seen: Mutex::new(Vec::new()) }
        }
    }

    #[async_trait]
    impl InferenceTransport for Canned {
        async fn post_json(&self,
                           url: &str,
                           query: &[(String, String)],
                           body: &Value,
                           _timeout: Duration)
                           -> Result<TransportResponse, InferenceError> {
            self.seen.lock().unwrap().push((url.to_string(), query.to_vec(), body.clone()));
            Ok(TransportResponse { status: self.status,
                                   body: self.body.clone() })
        }

        async fn post_image(&self, url: &str, image: &ImageUpload, _timeout: Duration) -> Result<TransportResponse, InferenceError> {
            self.seen.lock().unwrap().push((url.to_string(), Vec::new(), Value::from(image.file_name.clone())));
            Ok(TransportResponse { status: self.status,
                                   body: self.body.clone() })
        }

        async fn get(&self, url: &str, _timeout: Duration) -> Result<TransportResponse, InferenceError> {
            if url.contains("good") {
                Ok(TransportResponse { status: 200, body: "{}".into() })
            } else if url.contains("down") {
                Err(InferenceError::Transport("connection refused".into()))
            } else {
                Ok(TransportResponse { status: 503, body: String::new() })
            }
        }
    }

    #[tokio::test]
    async fn non_success_status_maps_to_http() {
        let client = InferenceClient::with_transport(Canned::new(502, "bad gateway"));
        let ep = EndpointConfig::new("diet", "http://localhost:5003/predict");
        let err = client.infer(&InferenceRequest::Prompt("x".into()), &ep).await.unwrap_err();
        assert_eq!(err, InferenceError::Http(502));
    }

    #[tokio::test]
    async fn gemini_request_carries_key_and_contents() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"```json\n{\"possibilities\":[{\"condition\":\"Flu\",\"probability\":\"62%\"}]}\n```"}]}}]}"#;
        let client = InferenceClient::with_transport(Canned::new(200, body));
        let ep = EndpointConfig::new("fever", "https://gemini.test/generate").gemini("k-123")
                                                                            .with_shape(RequestShape::prompt("Symptoms: {{answers}}"));
        let result = client.infer(&InferenceRequest::Prompt("Symptoms: {}".into()), &ep).await.unwrap();
        assert_eq!(result.tier, NormalizationTier::Embedded);
        assert_eq!(result.items[0].score, Some(62.0));
        assert_eq!(result.raw, body);
        let seen = client.transport().seen.lock().unwrap();
        assert_eq!(seen[0].1, vec![("key".to_string(), "k-123".to_string())]);
        assert_eq!(seen[0].2.pointer("/contents/0/parts/0/text").and_then(Value::as_str), Some("Symptoms: {}"));
    }

    #[tokio::test]
    async fn invalid_endpoint_never_hits_transport() {
        let client = InferenceClient::with_transport(Canned::new(200, "{}"));
        let ep = EndpointConfig::new("bad", "not-a-url");
        assert!(matches!(client.infer(&InferenceRequest::Prompt("x".into()), &ep).await,
                         Err(InferenceError::InvalidEndpoint(_))));
        assert!(client.transport().seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn probe_returns_first_reachable_base() {
        let client = InferenceClient::with_transport(Canned::new(200, "{}"));
        let bases = vec!["http://down:5002".to_string(), "http://busy:5002".to_string(), "http://good:5002/".to_string()];
        let found = client.probe(&bases, Duration::from_secs(1)).await.unwrap();
        assert_eq!(found, "http://good:5002/");
        let err = client.probe(&bases[..2], Duration::from_secs(1)).await.unwrap_err();
        assert_eq!(err, InferenceError::Http(503));
    }

    #[tokio::test]
    async fn image_goes_to_first_live_server() {
        let client = InferenceClient::with_transport(Canned::new(200, r#"{"prediction":"Acne","confidence_percentage":"92.00%"}"#));
        let bases = vec!["http://down:5002".to_string(), "http://good:5002/".to_string()];
        let image = ImageUpload::jpeg("skin_image.jpg", vec![0xFF, 0xD8]);
        let result = client.classify_image(&bases, "/predict", &image, Duration::from_secs(1)).await.unwrap();
        assert_eq!(result.primary_label, "Acne");
        assert_eq!(result.confidence_percent, Some(92.0));
        let seen = client.transport().seen.lock().unwrap();
        assert_eq!(seen[0].0, "http://good:5002/predict");
    }

    #[tokio::test]
    async fn image_without_live_server_is_not_sent() {
        let client = InferenceClient::with_transport(Canned::new(200, "{}"));
        let image = ImageUpload::jpeg("eye.jpg", vec![1]);
        let err = client.classify_image(&["http://down:5003".to_string()], "predict", &image, Duration::from_secs(1))
                        .await
                        .unwrap_err();
        assert!(matches!(err, InferenceError::Transport(_)));
        assert!(client.transport().seen.lock().unwrap().is_empty());
    }
}
