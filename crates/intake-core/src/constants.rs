//! Constantes del core.

/// Versión lógica de la máquina de estados. Entra en el fingerprint de cada
/// submission, así que cambiarla invalida fingerprints previos.
pub const WIZARD_ENGINE_VERSION: &str = "W1.0";
