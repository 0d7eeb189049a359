//! Configuración de endpoint y construcción del request saliente.
//!
//! La forma del request (mapa plano o prompt) es propiedad del endpoint y se
//! fija al configurar el cliente, nunca por request.
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::{json, Map, Value};
use std::time::Duration;

use intake_domain::Answers;

use crate::errors::InferenceError;

/// Timeout por defecto de una llamada de inferencia.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{\{\s*([A-Za-z0-9_]+)\s*\}\}").expect("static regex"));

/// Cómo se serializan las respuestas hacia el backend.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestShape {
    /// Objeto JSON plano `{key: valor}` (backends REST de clasificación).
    FieldMap,
    /// Prompt en lenguaje natural. `{{key}}` se sustituye por la respuesta
    /// renderizada y `{{answers}}` por el JSON de todas las respuestas.
    PromptTemplate { template: String },
}

impl RequestShape {
    pub fn prompt(template: &str) -> Self {
        RequestShape::PromptTemplate { template: template.to_string() }
    }

    pub fn build(&self, answers: &Answers) -> InferenceRequest {
        match self {
            RequestShape::FieldMap => match answers.to_json() {
                Value::Object(map) => InferenceRequest::Fields(map),
                _ => InferenceRequest::Fields(Map::new()),
            },
            RequestShape::PromptTemplate { template } => {
                let rendered = PLACEHOLDER.replace_all(template, |caps: &Captures| {
                                              let name = &caps[1];
                                              if name == "answers" {
                                                  answers.to_json().to_string()
                                              } else {
                                                  answers.get(name).map(|v| v.render()).unwrap_or_default()
                                              }
                                          });
                InferenceRequest::Prompt(rendered.into_owned())
            }
        }
    }
}

/// Cómo viene envuelta la respuesta útil dentro del cuerpo HTTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseEnvelope {
    /// El cuerpo es el payload.
    Plain,
    /// API `generateContent`: el payload es
    /// `candidates[0].content.parts[0].text`.
    Gemini,
}

impl ResponseEnvelope {
    /// Extrae el texto a normalizar desde el cuerpo HTTP.
    pub fn unwrap_body(&self, body: &str) -> Result<String, InferenceError> {
        match self {
            ResponseEnvelope::Plain => Ok(body.to_string()),
            ResponseEnvelope::Gemini => {
                let parsed: Value = serde_json::from_str(body).map_err(|_| InferenceError::UnparsableResponse { raw: body.to_string() })?;
                if let Some(message) = parsed.pointer("/error/message").and_then(Value::as_str) {
                    return Err(InferenceError::Rejected { message: message.to_string() });
                }
                parsed.pointer("/candidates/0/content/parts/0/text")
                      .and_then(Value::as_str)
                      .map(str::to_string)
                      .ok_or_else(|| InferenceError::UnparsableResponse { raw: body.to_string() })
            }
        }
    }

    /// Cuerpo JSON del POST para un request dado.
    pub fn body_for(&self, request: &InferenceRequest) -> Value {
        match (self, request) {
            (ResponseEnvelope::Gemini, request) => json!({
                "contents": [{ "role": "user", "parts": [{ "text": request.as_text() }] }]
            }),
            (ResponseEnvelope::Plain, InferenceRequest::Fields(map)) => Value::Object(map.clone()),
            (ResponseEnvelope::Plain, InferenceRequest::Prompt(text)) => json!({ "prompt": text }),
        }
    }
}

/// Payload saliente.
#[derive(Debug, Clone, PartialEq)]
pub enum InferenceRequest {
    Fields(Map<String, Value>),
    Prompt(String),
}

impl InferenceRequest {
    pub fn to_json(&self) -> Value {
        match self {
            InferenceRequest::Fields(map) => Value::Object(map.clone()),
            InferenceRequest::Prompt(text) => Value::String(text.clone()),
        }
    }

    pub fn as_text(&self) -> String {
        match self {
            InferenceRequest::Fields(map) => Value::Object(map.clone()).to_string(),
            InferenceRequest::Prompt(text) => text.clone(),
        }
    }
}

/// Imagen para los clasificadores de visión; viaja como campo `file` de un
/// formulario multipart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn jpeg(file_name: &str, bytes: Vec<u8>) -> Self {
        Self { file_name: file_name.to_string(),
               mime: "image/jpeg".to_string(),
               bytes }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EndpointConfig {
    /// Nombre lógico (para logs).
    pub name: String,
    pub url: String,
    pub shape: RequestShape,
    pub envelope: ResponseEnvelope,
    /// Se envía como parámetro de query `key` (convención de Gemini).
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl EndpointConfig {
    pub fn new(name: &str, url: &str) -> Self {
        Self { name: name.to_string(),
               url: url.to_string(),
               shape: RequestShape::FieldMap,
               envelope: ResponseEnvelope::Plain,
               api_key: None,
               timeout: DEFAULT_TIMEOUT }
    }

    pub fn with_shape(mut self, shape: RequestShape) -> Self {
        self.shape = shape;
        self
    }

    /// Endpoint Gemini `generateContent` con su API key.
    pub fn gemini(mut self, api_key: &str) -> Self {
        self.envelope = ResponseEnvelope::Gemini;
        self.api_key = Some(api_key.to_string());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn validate(&self) -> Result<(), InferenceError> {
        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Err(InferenceError::InvalidEndpoint(format!("{}: url must be http(s), got '{}'", self.name, self.url)));
        }
        if self.timeout.is_zero() {
            return Err(InferenceError::InvalidEndpoint(format!("{}: timeout must be positive", self.name)));
        }
        if self.envelope == ResponseEnvelope::Gemini && self.api_key.as_deref().map_or(true, str::is_empty) {
            return Err(InferenceError::InvalidEndpoint(format!("{}: gemini endpoint without api key", self.name)));
        }
        Ok(())
    }

    pub fn query(&self) -> Vec<(String, String)> {
        self.api_key
            .iter()
            .map(|k| ("key".to_string(), k.clone()))
            .collect()
    }
}
