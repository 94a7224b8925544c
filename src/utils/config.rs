use std::path::Path;

use thiserror::Error;

use crate::models::Settings;

pub const DEFAULT_SETTINGS_PATH: &str = "config/settings.json";

const ENV_NEWS_API_KEY: &str = "NEWS_API_KEY";
const ENV_WEATHER_API_KEY: &str = "WEATHER_API_KEY";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

pub fn load_dotenv() {
    let _ = dotenvy::dotenv();
}

pub fn key_from_env(name: &str) -> Option<String> {
    std::env::var(name).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

pub fn resolve_key(explicit_key: &str, env_name: &str) -> String {
    let trimmed = explicit_key.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }
    key_from_env(env_name).unwrap_or_default()
}

pub fn apply_env_defaults(settings: &mut Settings) {
    settings.ai.api_key = resolve_key(&settings.ai.api_key, settings.ai.provider.api_key_env());
    settings.skills.news_api_key = resolve_key(&settings.skills.news_api_key, ENV_NEWS_API_KEY);
    settings.skills.weather_api_key =
        resolve_key(&settings.skills.weather_api_key, ENV_WEATHER_API_KEY);
}

/// Reads the settings file if it exists (defaults otherwise), then fills empty
/// secrets from the environment.
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    let mut settings = if path.exists() {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str::<Settings>(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?
    } else {
        Settings::default()
    };
    apply_env_defaults(&mut settings);
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_key_is_trimmed_and_kept() {
        assert_eq!(resolve_key("  abc  ", "ASSISTLY_TEST_UNSET_KEY"), "abc");
    }

    #[test]
    fn test_missing_everything_is_empty() {
        assert_eq!(resolve_key("", "ASSISTLY_TEST_UNSET_KEY"), "");
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let settings = load_settings(Path::new("does/not/exist/settings.json")).unwrap();
        assert_eq!(settings.ai.timeout_secs, 10);
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    fn test_malformed_file_is_reported() {
        let dir = std::env::temp_dir().join(format!("assistly-config-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = load_settings(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
