//! Validación de una respuesta cruda contra su pregunta.
//!
//! Función pura: mismo `(question, raw)` => mismo resultado, sin efectos.
use crate::answer::{AnswerValue, BOOLEAN_NO, BOOLEAN_YES};
use crate::errors::ValidationError;
use crate::question::{Question, QuestionKind};

pub fn validate(question: &Question, raw: &str) -> Result<AnswerValue, ValidationError> {
    let key = || question.key.clone();
    match question.kind {
        QuestionKind::Boolean => match raw {
            BOOLEAN_YES => Ok(AnswerValue::Bool(true)),
            BOOLEAN_NO => Ok(AnswerValue::Bool(false)),
            other => Err(ValidationError::InvalidChoice { key: key(),
                                                          value: other.to_string() }),
        },
        QuestionKind::SingleSelect => {
            if question.options.iter().any(|o| o == raw) {
                Ok(AnswerValue::Text(raw.to_string()))
            } else {
                Err(ValidationError::InvalidChoice { key: key(),
                                                     value: raw.to_string() })
            }
        }
        QuestionKind::Number => {
            let value = raw.trim()
                           .parse::<f64>()
                           .ok()
                           .filter(|v| v.is_finite())
                           .ok_or_else(|| ValidationError::NotANumber { key: key(),
                                                                        value: raw.to_string() })?;
            match question.constraints {
                Some(bounds) if !bounds.contains(value) => Err(ValidationError::OutOfRange { key: key(),
                                                                                             value,
                                                                                             min: bounds.min,
                                                                                             max: bounds.max }),
                _ => Ok(AnswerValue::Number(value)),
            }
        }
        QuestionKind::Text => {
            let trimmed = raw.trim();
            if trimmed.is_empty() && question.required {
                Err(ValidationError::Required { key: key() })
            } else {
                Ok(AnswerValue::Text(trimmed.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boolean_accepts_only_sentinels() {
        let q = Question::boolean("cold", "Runny nose?");
        assert_eq!(validate(&q, "yes"), Ok(AnswerValue::Bool(true)));
        assert_eq!(validate(&q, "no"), Ok(AnswerValue::Bool(false)));
        assert!(matches!(validate(&q, "Yes"), Err(ValidationError::InvalidChoice { .. })));
        assert!(matches!(validate(&q, ""), Err(ValidationError::InvalidChoice { .. })));
    }

    #[test]
    fn select_requires_membership() {
        let q = Question::select("gender", "Gender?", ["male", "female", "other"]);
        assert_eq!(validate(&q, "female"), Ok(AnswerValue::Text("female".into())));
        assert_eq!(validate(&q, "unknown"),
                   Err(ValidationError::InvalidChoice { key: "gender".into(),
                                                        value: "unknown".into() }));
    }

    #[test]
    fn number_parses_and_checks_bounds_inclusively() {
        let q = Question::number("age", "Age?").bounded(1.0, 120.0);
        assert_eq!(validate(&q, " 34 "), Ok(AnswerValue::Number(34.0)));
        assert_eq!(validate(&q, "1"), Ok(AnswerValue::Number(1.0)));
        assert_eq!(validate(&q, "120"), Ok(AnswerValue::Number(120.0)));
        assert!(matches!(validate(&q, "150"), Err(ValidationError::OutOfRange { .. })));
        assert!(matches!(validate(&q, "abc"), Err(ValidationError::NotANumber { .. })));
        assert!(matches!(validate(&q, "NaN"), Err(ValidationError::NotANumber { .. })));
        assert!(matches!(validate(&q, "inf"), Err(ValidationError::NotANumber { .. })));
    }

    #[test]
    fn unbounded_number_accepts_any_finite_value() {
        let q = Question::number("insulin", "Insulin?");
        assert_eq!(validate(&q, "-3.5"), Ok(AnswerValue::Number(-3.5)));
    }

    #[test]
    fn text_required_only_when_marked() {
        let required = Question::text("profession", "Profession?");
        let optional = Question::text("notes", "Notes").optional();
        assert_eq!(validate(&required, "   "), Err(ValidationError::Required { key: "profession".into() }));
        assert_eq!(validate(&optional, ""), Ok(AnswerValue::Text(String::new())));
        assert_eq!(validate(&required, " nurse "), Ok(AnswerValue::Text("nurse".into())));
    }
}
