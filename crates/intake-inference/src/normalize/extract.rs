//! Búsqueda de substrings JSON balanceados dentro de texto libre.
use std::collections::BTreeMap;

use serde_json::Value;

/// Devuelve, en orden de aparición, cada substring balanceado `{...}` o
/// `[...]` que parsea como JSON. Respeta strings y escapes, así que llaves
/// dentro de literales no rompen el balance.
pub fn balanced_candidates(text: &str) -> impl Iterator<Item = Value> + '_ {
    balanced_spans(text).into_iter()
                        .filter_map(move |(start, end)| serde_json::from_str::<Value>(&text[start..end]).ok())
}

/// `(inicio, fin exclusivo)` de cada bloque que cierra, ordenados por inicio.
///
/// Un barrido desde una apertura resuelve también todas las aperturas que
/// anida fuera de strings, así que el texto se recorre casi siempre una sola
/// vez. Sólo las aperturas que quedaron dentro de un literal requieren su
/// propio barrido.
fn balanced_spans(text: &str) -> Vec<(usize, usize)> {
    let mut resolved: BTreeMap<usize, Option<usize>> = BTreeMap::new();
    for (start, c) in text.char_indices() {
        if (c == '{' || c == '[') && !resolved.contains_key(&start) {
            sweep(text, start, &mut resolved);
        }
    }
    resolved.into_iter()
            .filter_map(|(start, end)| end.map(|end| (start, end)))
            .collect()
}

/// Recorre desde `start` hasta que su bloque cierra, registrando el cierre
/// (o `None`) de cada apertura anidada. Un cierre desparejado invalida todas
/// las aperturas pendientes.
fn sweep(text: &str, start: usize, resolved: &mut BTreeMap<usize, Option<usize>>) {
    let mut stack: Vec<(char, usize)> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;
    for (offset, c) in text[start..].char_indices() {
        let at = start + offset;
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => stack.push(('}', at)),
            '[' => stack.push((']', at)),
            '}' | ']' => match stack.pop() {
                Some((close, open)) if close == c => {
                    resolved.insert(open, Some(at + c.len_utf8()));
                    if stack.is_empty() {
                        return;
                    }
                }
                Some((_, open)) => {
                    resolved.insert(open, None);
                    break;
                }
                None => break,
            },
            _ => {}
        }
    }
    for (_, open) in stack {
        resolved.insert(open, None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn finds_object_in_prose() {
        let found: Vec<Value> = balanced_candidates("answer: {\"a\": [1, 2]} done").collect();
        assert_eq!(found.first(), Some(&json!({"a": [1, 2]})));
    }

    #[test]
    fn braces_inside_strings_do_not_close() {
        let found: Vec<Value> = balanced_candidates(r#"x {"t": "}{"} y"#).collect();
        assert_eq!(found.first(), Some(&json!({"t": "}{"})));
    }

    #[test]
    fn skips_non_json_blocks() {
        let found: Vec<Value> = balanced_candidates("{not json} then [3]").collect();
        assert_eq!(found.first(), Some(&json!([3])));
    }

    #[test]
    fn unbalanced_text_yields_nothing() {
        assert_eq!(balanced_candidates("{\"a\": 1").count(), 0);
        assert_eq!(balanced_candidates("{\"a\": [1}").count(), 0);
    }

    #[test]
    fn nested_blocks_are_reported_outer_first() {
        let found: Vec<Value> = balanced_candidates(r#"[ {"a": 1} ] and {"b": [2]}"#).collect();
        assert_eq!(found, vec![json!([{"a": 1}]), json!({"a": 1}), json!({"b": [2]}), json!([2])]);
    }

    #[test]
    fn inner_block_survives_unclosed_outer() {
        let found: Vec<Value> = balanced_candidates(r#"[ {"a": 1} and then nothing"#).collect();
        assert_eq!(found, vec![json!({"a": 1})]);
    }

    #[test]
    fn opener_inside_a_literal_still_gets_its_own_scan() {
        // el `[` dentro de "x [" se evalúa por separado: `[1]` es su bloque
        let found: Vec<Value> = balanced_candidates(r#"{"t": "x [1] y"}"#).collect();
        assert_eq!(found, vec![json!({"t": "x [1] y"}), json!([1])]);
    }

    #[test]
    fn long_runs_of_openers_scan_quickly() {
        let text = format!("{} then prose {{\"ok\": true}}", "[".repeat(60_000));
        let started = std::time::Instant::now();
        let found: Vec<Value> = balanced_candidates(&text).collect();
        assert!(started.elapsed() < std::time::Duration::from_secs(2));
        assert_eq!(found, vec![json!({"ok": true})]);
    }
}
