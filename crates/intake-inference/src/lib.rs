//! intake-inference: cliente de inferencia remota.
//!
//! Convierte las respuestas acumuladas de un wizard en una llamada HTTP POST
//! (REST plano o prompt para un LLM) y normaliza la respuesta, que puede ser
//! JSON bien formado, JSON incrustado en prosa o texto libre, al contrato
//! `InferenceResult` que consume la presentación.
//!
//! Módulos:
//! - `endpoint`: configuración por endpoint (URL, forma del request, sobre de
//!   respuesta, timeout) y construcción de `InferenceRequest`.
//! - `transport`: trait `InferenceTransport` + implementación reqwest.
//! - `client`: `InferenceClient::infer` / `probe` / `classify_image` y
//!   `EndpointClient`.
//! - `normalize`: pipeline de tres niveles (directo, incrustado, por líneas).
//! - `confidence`: parseo único de confianza (`"94.56%"` o fracción `0..1`).
pub mod client;
pub mod confidence;
pub mod endpoint;
pub mod errors;
pub mod normalize;
pub mod result;
pub mod transport;

pub use client::{EndpointClient, InferenceClient, InferenceService};
pub use confidence::{confidence_from_value, parse_confidence, score_from_value};
pub use endpoint::{EndpointConfig, ImageUpload, InferenceRequest, RequestShape, ResponseEnvelope, DEFAULT_TIMEOUT};
pub use errors::InferenceError;
pub use normalize::normalize;
pub use result::{InferenceResult, NormalizationTier, ResultItem, ResultSource};
pub use transport::{InferenceTransport, ReqwestTransport, TransportResponse};
