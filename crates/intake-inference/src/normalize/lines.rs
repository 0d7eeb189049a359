//! Nivel de respaldo: líneas con formato `Etiqueta (NN%): descripción`.
use once_cell::sync::Lazy;
use regex::Regex;

use crate::confidence::parse_confidence;
use crate::result::ResultItem;

// Admite viñetas (`-`, `*`, `•`, `1.`) y negritas markdown alrededor de la etiqueta.
static SCORED_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:[-*•]\s+|\d+[.)]\s+)?(?:\*\*)?(.+?)(?:\*\*)?\s*\(\s*(\d{1,3}(?:\.\d+)?)\s*%\s*\)\s*:\s*(.*)$")
        .expect("static regex")
});

pub fn parse_scored_lines(text: &str) -> Vec<ResultItem> {
    text.lines()
        .filter_map(|line| SCORED_LINE.captures(line))
        .map(|caps| {
            let label = caps.get(1).map(|m| m.as_str().trim()).unwrap_or_default();
            let score = caps.get(2).and_then(|m| parse_confidence(&format!("{}%", m.as_str())));
            let detail = caps.get(3).map(|m| m.as_str().trim()).unwrap_or_default();
            ResultItem::new(label, detail, score)
        })
        .filter(|item| !item.label.is_empty())
        .collect()
}
