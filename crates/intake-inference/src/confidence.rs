//! Parseo de valores de confianza.
//!
//! Un único punto de entrada para las dos representaciones que devuelven los
//! backends: string porcentual (`"94.56%"`) y fracción (`0.9456`). La
//! presencia del `%` final decide la interpretación. Sin `%`, un número en
//! `[0, 1]` es fracción y uno en `(1, 100]` ya es porcentaje. Lo que queda
//! fuera de `[0, 100]` se descarta.
//!
//! Los scores por item (`probability`, `score`, `percentage` dentro de una
//! lista) van por `score_from_value`: ya son porcentajes, así que `1` es 1%.
use serde_json::Value;

pub fn parse_confidence(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let percent = match trimmed.strip_suffix('%') {
        Some(number) => number.trim().parse::<f64>().ok()?,
        None => scale_plain(trimmed.parse::<f64>().ok()?),
    };
    in_range(percent)
}

/// Variante sobre JSON: strings pasan por `parse_confidence`, números por la
/// misma regla de escala.
pub fn confidence_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) => parse_confidence(s),
        Value::Number(n) => n.as_f64().map(scale_plain).and_then(in_range),
        _ => None,
    }
}

/// Score de un item de lista: el número se toma como porcentaje tal cual.
pub fn score_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            let number = trimmed.strip_suffix('%').unwrap_or(trimmed);
            number.trim().parse::<f64>().ok().and_then(in_range)
        }
        Value::Number(n) => n.as_f64().and_then(in_range),
        _ => None,
    }
}

fn scale_plain(x: f64) -> f64 {
    if (0.0..=1.0).contains(&x) {
        x * 100.0
    } else {
        x
    }
}

fn in_range(percent: f64) -> Option<f64> {
    (percent.is_finite() && (0.0..=100.0).contains(&percent)).then_some(percent)
}
