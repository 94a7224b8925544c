use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub version: String,
    pub ai: AISettings,
    pub skills: SkillSettings,
    pub speech: SpeechSettings,
    pub logging: LoggingSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: "1.0.0".to_string(),
            ai: AISettings::default(),
            skills: SkillSettings::default(),
            speech: SpeechSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    Gemini,
    Nvidia,
}

impl Provider {
    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::Gemini => "gemini-2.5-flash",
            Provider::Nvidia => "moonshotai/kimi-k2-instruct-0905",
        }
    }

    pub fn api_key_env(&self) -> &'static str {
        match self {
            Provider::Gemini => "GEMINI_API_KEY",
            Provider::Nvidia => "NVIDIA_API_KEY",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AISettings {
    pub provider: Provider,
    pub api_key: String,
    /// Empty means the provider's default model.
    pub model: String,
    pub timeout_secs: u64,
    pub temperature: f32,
}

impl AISettings {
    pub fn model_name(&self) -> &str {
        let model = self.model.trim();
        if model.is_empty() {
            self.provider.default_model()
        } else {
            model
        }
    }
}

impl Default for AISettings {
    fn default() -> Self {
        Self {
            provider: Provider::Gemini,
            api_key: String::new(),
            model: String::new(),
            timeout_secs: 10,
            temperature: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillSettings {
    pub news_api_key: String,
    pub news_source: String,
    pub weather_api_key: String,
    pub http_timeout_secs: u64,
}

impl Default for SkillSettings {
    fn default() -> Self {
        Self {
            news_api_key: String::new(),
            news_source: "bbc-news".to_string(),
            weather_api_key: String::new(),
            http_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechSettings {
    pub enabled: bool,
    /// External text-to-speech program, invoked as `<program> -s <rate> <text>`
    /// (e.g. `espeak`). Empty disables audio and leaves the console echo only.
    pub tts_program: String,
    pub rate: u32,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            tts_program: String::new(),
            rate: 170,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub file: Option<String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: Some("logs/assistly.log".to_string()),
        }
    }
}
