use std::io::ErrorKind;
use std::process::{Command, Stdio};

use crate::models::OpenTarget;

pub fn open_target(target: &OpenTarget) -> String {
    match target {
        OpenTarget::App { name, executable } => {
            let Some(executable) = executable.as_deref() else {
                return "No executable provided.".to_string();
            };
            let name = name.as_deref().unwrap_or(executable);
            launch_app(name, executable)
        }
        OpenTarget::Url { name, url } => {
            let Some(url) = url.as_deref() else {
                return "No URL provided.".to_string();
            };
            match open::that(url) {
                Ok(()) => format!("Navigating to {}.", name.as_deref().unwrap_or(url)),
                Err(e) => {
                    log::warn!("Failed to open url {}: {}", url, e);
                    "Could not open the browser.".to_string()
                }
            }
        }
        OpenTarget::Invalid => "Invalid Request.".to_string(),
    }
}

fn launch_app(name: &str, executable: &str) -> String {
    match spawn_executable(executable) {
        Ok(()) => format!("Opening {}.", name),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            format!("Application '{}' is not installed or not found.", executable)
        }
        Err(e) => {
            log::error!("Failed to open application {}: {}", executable, e);
            "Failed to open application.".to_string()
        }
    }
}

fn spawn_executable(executable: &str) -> std::io::Result<()> {
    let mut command = if cfg!(target_os = "windows") {
        let mut command = Command::new("cmd");
        command.args(["/C", "start", "", executable]);
        command
    } else {
        Command::new(executable)
    };
    command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
}
