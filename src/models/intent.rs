use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Closed vocabulary of command intents. The wire label of each variant is the
/// snake_case name the classification backend is asked to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    DateTime,
    Joke,
    Location,
    News,
    Weather,
    Search,
    Youtube,
    OpeningAppOrUrl,
    SystemInfo,
    Timer,
    Courtesy,
    Exit,
    Unknown,
}

impl Intent {
    pub const ALL: [Intent; 13] = [
        Intent::DateTime,
        Intent::Joke,
        Intent::Location,
        Intent::News,
        Intent::Weather,
        Intent::Search,
        Intent::Youtube,
        Intent::OpeningAppOrUrl,
        Intent::SystemInfo,
        Intent::Timer,
        Intent::Courtesy,
        Intent::Exit,
        Intent::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::DateTime => "date_time",
            Intent::Joke => "joke",
            Intent::Location => "location",
            Intent::News => "news",
            Intent::Weather => "weather",
            Intent::Search => "search",
            Intent::Youtube => "youtube",
            Intent::OpeningAppOrUrl => "opening_app_or_url",
            Intent::SystemInfo => "system_info",
            Intent::Timer => "timer",
            Intent::Courtesy => "courtesy",
            Intent::Exit => "exit",
            Intent::Unknown => "unknown",
        }
    }

    /// Exact, case-sensitive whitelist lookup.
    pub fn from_label(label: &str) -> Option<Intent> {
        Intent::ALL.into_iter().find(|intent| intent.as_str() == label)
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InfoType {
    Time,
    Date,
    Day,
}

impl InfoType {
    pub const ALL: [InfoType; 3] = [InfoType::Time, InfoType::Date, InfoType::Day];

    fn parse(tag: &str) -> Option<InfoType> {
        match tag.trim().to_lowercase().as_str() {
            "time" => Some(InfoType::Time),
            "date" => Some(InfoType::Date),
            "day" => Some(InfoType::Day),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Battery,
    Cpu,
    Memory,
    Storage,
    Uptime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceQuery {
    Missing,
    Supported(Resource),
    Unsupported(String),
}

impl ResourceQuery {
    fn parse(tag: &str) -> ResourceQuery {
        let tag = tag.trim().to_lowercase();
        match tag.as_str() {
            "" => ResourceQuery::Missing,
            "battery" => ResourceQuery::Supported(Resource::Battery),
            "cpu" => ResourceQuery::Supported(Resource::Cpu),
            "memory" | "ram" => ResourceQuery::Supported(Resource::Memory),
            "storage" | "disk" => ResourceQuery::Supported(Resource::Storage),
            "uptime" => ResourceQuery::Supported(Resource::Uptime),
            _ => ResourceQuery::Unsupported(tag),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenTarget {
    App {
        name: Option<String>,
        executable: Option<String>,
    },
    Url {
        name: Option<String>,
        url: Option<String>,
    },
    /// `type` was missing or neither `app` nor `url`.
    Invalid,
}

/// Validated entity payload, one variant per [`Intent`]. Only the keys an
/// intent declares survive extraction; everything else is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    DateTime(Vec<InfoType>),
    Joke,
    Location,
    News,
    Weather { location: Option<String> },
    Search { query: Option<String> },
    Youtube { query: Option<String> },
    OpenTarget(OpenTarget),
    SystemInfo(ResourceQuery),
    Timer { duration: Option<i64> },
    Courtesy,
    Exit,
    Unknown,
}

impl Request {
    pub fn intent(&self) -> Intent {
        match self {
            Request::DateTime(_) => Intent::DateTime,
            Request::Joke => Intent::Joke,
            Request::Location => Intent::Location,
            Request::News => Intent::News,
            Request::Weather { .. } => Intent::Weather,
            Request::Search { .. } => Intent::Search,
            Request::Youtube { .. } => Intent::Youtube,
            Request::OpenTarget(_) => Intent::OpeningAppOrUrl,
            Request::SystemInfo(_) => Intent::SystemInfo,
            Request::Timer { .. } => Intent::Timer,
            Request::Courtesy => Intent::Courtesy,
            Request::Exit => Intent::Exit,
            Request::Unknown => Intent::Unknown,
        }
    }

    /// Builds the typed payload for `intent` from an already object-shaped
    /// entity map.
    pub fn from_entities(intent: Intent, entities: &Map<String, Value>) -> Request {
        match intent {
            Intent::DateTime => Request::DateTime(info_types(entities.get("info_type"))),
            Intent::Joke => Request::Joke,
            Intent::Location => Request::Location,
            Intent::News => Request::News,
            Intent::Weather => Request::Weather {
                location: text(entities.get("location")),
            },
            Intent::Search => Request::Search {
                query: text(entities.get("query")),
            },
            Intent::Youtube => Request::Youtube {
                query: text(entities.get("query")),
            },
            Intent::OpeningAppOrUrl => Request::OpenTarget(open_target(entities)),
            Intent::SystemInfo => Request::SystemInfo(match entities.get("resource") {
                Some(Value::String(tag)) => ResourceQuery::parse(tag),
                _ => ResourceQuery::Missing,
            }),
            Intent::Timer => Request::Timer {
                duration: duration_seconds(entities.get("duration")),
            },
            Intent::Courtesy => Request::Courtesy,
            Intent::Exit => Request::Exit,
            Intent::Unknown => Request::Unknown,
        }
    }
}

/// Sanitized output of one classification round.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub request: Request,
    /// Always within `[0.0, 1.0]`.
    pub confidence: f64,
}

impl Classification {
    pub fn new(request: Request, confidence: f64) -> Self {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        Self { request, confidence }
    }

    /// The `(unknown, {}, 0.0)` fallback.
    pub fn unknown() -> Self {
        Self {
            request: Request::Unknown,
            confidence: 0.0,
        }
    }

    pub fn intent(&self) -> Intent {
        self.request.intent()
    }
}

fn text(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

fn info_types(value: Option<&Value>) -> Vec<InfoType> {
    let mut found: Vec<InfoType> = match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().and_then(InfoType::parse))
            .collect(),
        Some(Value::String(tag)) => InfoType::parse(tag).into_iter().collect(),
        _ => Vec::new(),
    };

    if found.is_empty() {
        return InfoType::ALL.to_vec();
    }
    found.sort();
    found.dedup();
    found
}

fn open_target(entities: &Map<String, Value>) -> OpenTarget {
    let name = text(entities.get("name"));
    match entities.get("type").and_then(Value::as_str).map(str::trim) {
        Some("app") => OpenTarget::App {
            name,
            executable: text(entities.get("executable")),
        },
        Some("url") => OpenTarget::Url {
            name,
            url: text(entities.get("url")),
        },
        _ => OpenTarget::Invalid,
    }
}

// Integral numbers, finite floats (truncated) and integer strings count as a
// duration; anything else is treated as absent.
fn duration_seconds(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entities(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_whitelist_has_thirteen_distinct_labels() {
        let mut labels: Vec<&str> = Intent::ALL.iter().map(Intent::as_str).collect();
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), 13);
        for intent in Intent::ALL {
            assert_eq!(Intent::from_label(intent.as_str()), Some(intent));
        }
        assert_eq!(Intent::from_label("Joke"), None);
        assert_eq!(Intent::from_label("weather_report"), None);
    }

    #[test]
    fn test_serde_label_matches_as_str() {
        for intent in Intent::ALL {
            let encoded = serde_json::to_value(intent).unwrap();
            assert_eq!(encoded, json!(intent.as_str()));
        }
    }

    #[test]
    fn test_info_type_keeps_requested_subset_in_order() {
        let request = Request::from_entities(
            Intent::DateTime,
            &entities(json!({"info_type": ["day", "date", "date"]})),
        );
        assert_eq!(request, Request::DateTime(vec![InfoType::Date, InfoType::Day]));
    }

    #[test]
    fn test_info_type_defaults_to_everything() {
        for raw in [json!({}), json!({"info_type": []}), json!({"info_type": ["weekday"]})] {
            let request = Request::from_entities(Intent::DateTime, &entities(raw));
            assert_eq!(request, Request::DateTime(InfoType::ALL.to_vec()));
        }
    }

    #[test]
    fn test_timer_duration_shapes() {
        let parse = |raw: Value| match Request::from_entities(Intent::Timer, &entities(raw)) {
            Request::Timer { duration } => duration,
            other => panic!("unexpected request {:?}", other),
        };
        assert_eq!(parse(json!({"duration": 300})), Some(300));
        assert_eq!(parse(json!({"duration": 12.9})), Some(12));
        assert_eq!(parse(json!({"duration": " 45 "})), Some(45));
        assert_eq!(parse(json!({"duration": -5})), Some(-5));
        assert_eq!(parse(json!({"duration": "5 minutes"})), None);
        assert_eq!(parse(json!({"duration": true})), None);
        assert_eq!(parse(json!({})), None);
    }

    #[test]
    fn test_undeclared_entities_are_dropped() {
        let request = Request::from_entities(
            Intent::Joke,
            &entities(json!({"query": "knock knock", "duration": 5})),
        );
        assert_eq!(request, Request::Joke);
    }

    #[test]
    fn test_resource_aliases_and_unsupported() {
        let parse = |raw: Value| Request::from_entities(Intent::SystemInfo, &entities(raw));
        assert_eq!(
            parse(json!({"resource": " RAM "})),
            Request::SystemInfo(ResourceQuery::Supported(Resource::Memory))
        );
        assert_eq!(
            parse(json!({"resource": "gpu"})),
            Request::SystemInfo(ResourceQuery::Unsupported("gpu".to_string()))
        );
        assert_eq!(parse(json!({"resource": 3})), Request::SystemInfo(ResourceQuery::Missing));
    }

    #[test]
    fn test_open_target_variants() {
        let parse = |raw: Value| Request::from_entities(Intent::OpeningAppOrUrl, &entities(raw));
        assert_eq!(
            parse(json!({"type": "app", "name": "calculator", "executable": "calc"})),
            Request::OpenTarget(OpenTarget::App {
                name: Some("calculator".to_string()),
                executable: Some("calc".to_string()),
            })
        );
        assert_eq!(
            parse(json!({"type": "url", "name": "imdb"})),
            Request::OpenTarget(OpenTarget::Url {
                name: Some("imdb".to_string()),
                url: None,
            })
        );
        assert_eq!(parse(json!({"name": "chrome"})), Request::OpenTarget(OpenTarget::Invalid));
    }

    #[test]
    fn test_classification_clamps_confidence() {
        assert_eq!(Classification::new(Request::Joke, 1.7).confidence, 1.0);
        assert_eq!(Classification::new(Request::Joke, -5.0).confidence, 0.0);
        assert_eq!(Classification::new(Request::Joke, f64::NAN).confidence, 0.0);
    }
}
