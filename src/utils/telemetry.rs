use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::Context;

use crate::models::LoggingSettings;

const ROOT_TARGET: &str = "assistly";

/// Logging handle handed to each component at construction. Components log
/// under their own target instead of picking one up from the call site.
#[derive(Debug, Clone)]
pub struct Telemetry {
    target: String,
}

impl Telemetry {
    pub fn root() -> Self {
        Self {
            target: ROOT_TARGET.to_string(),
        }
    }

    pub fn child(&self, component: &str) -> Self {
        Self {
            target: format!("{}::{}", self.target, component),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }
}

/// Installs the process-wide `env_logger` backend. `RUST_LOG` overrides the
/// configured level; when a log file is configured it replaces stderr.
pub fn init_logging(settings: &LoggingSettings, level_override: Option<&str>) -> anyhow::Result<()> {
    let level = level_override.unwrap_or(&settings.level);
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level));

    builder
        .filter_module("reqwest", log::LevelFilter::Warn)
        .filter_module("hyper_util", log::LevelFilter::Warn)
        .format(|buf, record| {
            writeln!(
                buf,
                "{} | {} | {} | {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                record.args()
            )
        });

    if let Some(path) = settings.file.as_deref().filter(|p| !p.trim().is_empty()) {
        let path = Path::new(path);
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create log directory {}", dir.display()))?;
        }
        let file = File::create(path)
            .with_context(|| format!("failed to open log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.try_init().context("logger already initialized")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_targets_nest() {
        let router = Telemetry::root().child("router");
        assert_eq!(router.target(), "assistly::router");
        assert_eq!(router.child("timer").target(), "assistly::router::timer");
    }
}
