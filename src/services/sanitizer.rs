//! Turns whatever the text-generation backend returned into a valid
//! [`Classification`]. Every input maps to a result; nothing here fails.

use serde_json::{Map, Value};

use crate::models::{Classification, Intent, Request};
use crate::utils::Telemetry;

const FENCE: &str = "```";

pub struct OutputSanitizer {
    log: Telemetry,
}

impl OutputSanitizer {
    pub fn new(log: Telemetry) -> Self {
        Self { log }
    }

    pub fn sanitize(&self, raw: &str) -> Classification {
        let cleaned = strip_fences(raw);

        let data: Value = match serde_json::from_str(&cleaned) {
            Ok(data) => data,
            Err(e) => {
                log::warn!(
                    target: self.log.target(),
                    "Invalid JSON from LLM ({}), falling back to unknown intent",
                    e
                );
                log::debug!(target: self.log.target(), "Raw LLM output: {}", raw);
                return Classification::unknown();
            }
        };
        log::debug!(target: self.log.target(), "Parsed LLM JSON output: {}", data);

        let Value::Object(mut data) = data else {
            log::warn!(
                target: self.log.target(),
                "LLM output is not a JSON object, falling back to unknown intent"
            );
            return Classification::unknown();
        };

        let intent = match data.get("intent") {
            None => Some(Intent::Unknown),
            Some(Value::String(label)) => Intent::from_label(label),
            Some(_) => None,
        };
        let Some(intent) = intent else {
            log::warn!(
                target: self.log.target(),
                "Intent {} is not an allowed intent, falling back to unknown intent",
                data.get("intent").map(Value::to_string).unwrap_or_default()
            );
            return Classification::unknown();
        };

        let entities = match data.remove("entities") {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        };

        let confidence = match data.get("confidence") {
            None => 0.0,
            Some(value) => coerce_confidence(value).unwrap_or_else(|| {
                log::debug!(target: self.log.target(), "Invalid confidence value from LLM: {}", value);
                0.0
            }),
        };

        let classification = Classification::new(Request::from_entities(intent, &entities), confidence);
        log::info!(
            target: self.log.target(),
            "Intent classified | intent={} confidence={:.2} request={:?}",
            classification.intent(),
            classification.confidence,
            classification.request
        );
        classification
    }
}

/// Trims the text and removes a surrounding markdown code fence, with or
/// without a language tag on the opening line.
pub fn strip_fences(raw: &str) -> String {
    let trimmed = raw.trim();
    if !trimmed.starts_with(FENCE) {
        return trimmed.to_string();
    }

    let mut lines: Vec<&str> = trimmed.lines().skip(1).collect();
    if lines.last().map(|l| l.trim() == FENCE).unwrap_or(false) {
        lines.pop();
    }
    lines.join("\n").trim().to_string()
}

fn coerce_confidence(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    if number.is_nan() {
        return None;
    }
    Some(number.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{InfoType, OpenTarget};

    fn sanitize(raw: &str) -> Classification {
        OutputSanitizer::new(Telemetry::root()).sanitize(raw)
    }

    #[test]
    fn test_malformed_inputs_collapse_to_unknown() {
        let cases = [
            "",
            "   ",
            "Sure! Here is the classification you asked for.",
            r#"{"intent": "joke", "entities": {}, "confidence": 0.9"#,
            r#"[{"intent": "joke"}]"#,
            "42",
            "\"joke\"",
            "null",
            "true",
        ];
        for raw in cases {
            assert_eq!(sanitize(raw), Classification::unknown(), "input: {:?}", raw);
        }
    }

    #[test]
    fn test_well_formed_object_passes_through() {
        let result = sanitize(r#"{"intent":"joke","entities":{},"confidence":0.9}"#);
        assert_eq!(result.request, Request::Joke);
        assert_eq!(result.confidence, 0.9);
    }

    #[test]
    fn test_fenced_output_is_unwrapped() {
        let result = sanitize("```json\n{\"intent\":\"joke\",\"entities\":{},\"confidence\":0.9}\n```");
        assert_eq!(result, Classification::new(Request::Joke, 0.9));

        let bare = sanitize("  ```\n{\"intent\":\"news\",\"confidence\":0.8}\n```  ");
        assert_eq!(bare, Classification::new(Request::News, 0.8));
    }

    #[test]
    fn test_unclosed_fence_still_parses() {
        let result = sanitize("```json\n{\"intent\":\"exit\",\"entities\":{},\"confidence\":1}");
        assert_eq!(result, Classification::new(Request::Exit, 1.0));
    }

    #[test]
    fn test_hallucinated_intent_discards_everything() {
        for raw in [
            r#"{"intent":"play_music","entities":{"query":"despacito"},"confidence":0.99}"#,
            r#"{"intent":"JOKE","entities":{},"confidence":0.99}"#,
            r#"{"intent":7,"entities":{},"confidence":0.99}"#,
            r#"{"intent":null,"entities":{},"confidence":0.99}"#,
        ] {
            assert_eq!(sanitize(raw), Classification::unknown(), "input: {}", raw);
        }
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        assert_eq!(sanitize(r#"{"confidence": 0.95}"#), Classification::new(Request::Unknown, 0.95));
        assert_eq!(sanitize(r#"{"intent": "joke"}"#), Classification::new(Request::Joke, 0.0));
    }

    #[test]
    fn test_confidence_is_clamped_or_zeroed() {
        let confidence = |value: &str| {
            sanitize(&format!(r#"{{"intent":"news","entities":{{}},"confidence":{}}}"#, value)).confidence
        };
        assert_eq!(confidence("-5"), 0.0);
        assert_eq!(confidence("1.7"), 1.0);
        assert_eq!(confidence("\"high\""), 0.0);
        assert_eq!(confidence("\"0.75\""), 0.75);
        assert_eq!(confidence("null"), 0.0);
        assert_eq!(confidence("true"), 0.0);
        assert_eq!(confidence("[0.9]"), 0.0);
        assert_eq!(confidence("0.6"), 0.6);
    }

    #[test]
    fn test_non_object_entities_become_empty() {
        let result = sanitize(r#"{"intent":"search","entities":["python"],"confidence":0.9}"#);
        assert_eq!(result.request, Request::Search { query: None });

        let result = sanitize(r#"{"intent":"date_time","entities":null,"confidence":0.9}"#);
        assert_eq!(result.request, Request::DateTime(InfoType::ALL.to_vec()));
    }

    #[test]
    fn test_entities_are_typed_at_the_boundary() {
        let result = sanitize(
            r#"{"intent":"opening_app_or_url","entities":{"type":"url","name":"github","url":"https://github.com","extra":1},"confidence":0.93}"#,
        );
        assert_eq!(
            result.request,
            Request::OpenTarget(OpenTarget::Url {
                name: Some("github".to_string()),
                url: Some("https://github.com".to_string()),
            })
        );

        let result = sanitize(r#"{"intent":"timer","entities":{"duration":300},"confidence":0.95}"#);
        assert_eq!(result.request, Request::Timer { duration: Some(300) });
    }

    #[test]
    fn test_strip_fences_leaves_plain_text_alone() {
        assert_eq!(strip_fences("  {\"a\": 1}\n"), "{\"a\": 1}");
        assert_eq!(strip_fences("```"), "");
    }
}
