//! Capa HTTP detrás de un trait, para poder sustituirla en tests.
use async_trait::async_trait;
use log::{debug, warn};
use serde_json::Value;
use std::time::Duration;

use crate::endpoint::ImageUpload;
use crate::errors::InferenceError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait InferenceTransport: Send + Sync {
    /// POST con cuerpo JSON. Debe distinguir `Timeout` de `Transport`.
    async fn post_json(&self,
                       url: &str,
                       query: &[(String, String)],
                       body: &Value,
                       timeout: Duration)
                       -> Result<TransportResponse, InferenceError>;

    /// POST multipart con la imagen en el campo `file`.
    async fn post_image(&self, url: &str, image: &ImageUpload, timeout: Duration) -> Result<TransportResponse, InferenceError>;

    /// GET simple (sondeo de `/status`).
    async fn get(&self, url: &str, timeout: Duration) -> Result<TransportResponse, InferenceError>;
}

/// Transporte real sobre `reqwest`. El timeout se aplica por llamada y cubre
/// envío + lectura del cuerpo.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, InferenceError> {
        let client = reqwest::Client::builder().build()
                                               .map_err(|e| InferenceError::Transport(e.to_string()))?;
        Ok(Self { client })
    }

    async fn execute(&self, request: reqwest::RequestBuilder, timeout: Duration) -> Result<TransportResponse, InferenceError> {
        let call = async {
            let response = request.send().await.map_err(map_reqwest_error)?;
            let status = response.status().as_u16();
            let body = response.text().await.map_err(map_reqwest_error)?;
            Ok::<_, InferenceError>(TransportResponse { status, body })
        };
        match tokio::time::timeout(timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                warn!("request exceeded {}ms", timeout.as_millis());
                Err(InferenceError::Timeout)
            }
        }
    }
}

fn map_reqwest_error(e: reqwest::Error) -> InferenceError {
    if e.is_timeout() {
        InferenceError::Timeout
    } else {
        debug!("transport failure: {e}");
        InferenceError::Transport(e.to_string())
    }
}

#[async_trait]
impl InferenceTransport for ReqwestTransport {
    async fn post_json(&self,
                       url: &str,
                       query: &[(String, String)],
                       body: &Value,
                       timeout: Duration)
                       -> Result<TransportResponse, InferenceError> {
        let request = self.client.post(url).query(query).json(body);
        self.execute(request, timeout).await
    }

    async fn post_image(&self, url: &str, image: &ImageUpload, timeout: Duration) -> Result<TransportResponse, InferenceError> {
        let part = reqwest::multipart::Part::bytes(image.bytes.clone()).file_name(image.file_name.clone())
                                                                      .mime_str(&image.mime)
                                                                      .map_err(|e| InferenceError::Transport(e.to_string()))?;
        let form = reqwest::multipart::Form::new().part("file", part);
        let request = self.client
                          .post(url)
                          .header(reqwest::header::ACCEPT, "application/json")
                          .multipart(form);
        self.execute(request, timeout).await
    }

    async fn get(&self, url: &str, timeout: Duration) -> Result<TransportResponse, InferenceError> {
        let request = self.client.get(url).header(reqwest::header::ACCEPT, "application/json");
        self.execute(request, timeout).await
    }
}
