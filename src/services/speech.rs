use std::process::{Command, Stdio};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::models::SpeechSettings;
use crate::utils::Telemetry;

/// Output channel shared by the command loop and every running countdown.
/// Implementations must tolerate concurrent callers and must not fail.
pub trait Speaker: Send + Sync {
    fn speak(&self, text: &str);
}

/// Console echo plus optional text-to-speech through an external program.
pub struct Speech {
    tts_program: Option<String>,
    rate: u32,
    // Serializes rendering so overlapping utterances never interleave.
    lock: Mutex<()>,
    log: Telemetry,
}

impl Speech {
    pub fn new(settings: &SpeechSettings, log: Telemetry) -> Self {
        let tts_program = Some(settings.tts_program.trim().to_string())
            .filter(|p| settings.enabled && !p.is_empty());
        log::debug!(
            target: log.target(),
            "Speech initialized | tts={:?} rate={}",
            tts_program,
            settings.rate
        );
        Self {
            tts_program,
            rate: settings.rate,
            lock: Mutex::new(()),
            log,
        }
    }

    fn render(&self, program: &str, text: &str) -> std::io::Result<()> {
        let status = Command::new(program)
            .arg("-s")
            .arg(self.rate.to_string())
            .arg(text)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()?;
        if status.success() {
            Ok(())
        } else {
            Err(std::io::Error::other(format!("{} exited with {}", program, status)))
        }
    }
}

impl Speaker for Speech {
    fn speak(&self, text: &str) {
        let _guard = self.lock.lock();
        log::info!(target: self.log.target(), "Speaking: {}", text);
        println!("Assistly: {}", text);

        if let Some(program) = &self.tts_program {
            if let Err(e) = self.render(program, text) {
                log::warn!(
                    target: self.log.target(),
                    "Text-to-speech failed ({}), text output only",
                    e
                );
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Heard {
    Command(String),
    NotUnderstood,
    /// Input is exhausted; the loop should stop.
    Closed,
}

/// Stand-in for speech recognition: anything that yields one command at a time.
#[async_trait]
pub trait CommandSource: Send {
    async fn next_command(&mut self) -> Heard;
}

/// Reads commands typed on stdin, one per line.
pub struct ConsoleInput {
    lines: Lines<BufReader<Stdin>>,
    log: Telemetry,
}

impl ConsoleInput {
    pub fn new(log: Telemetry) -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
            log,
        }
    }
}

#[async_trait]
impl CommandSource for ConsoleInput {
    async fn next_command(&mut self) -> Heard {
        log::info!(target: self.log.target(), "Listening...");
        match self.lines.next_line().await {
            Ok(Some(line)) => recognize(&line),
            Ok(None) => Heard::Closed,
            Err(e) => {
                log::error!(target: self.log.target(), "Unexpected error reading input: {}", e);
                Heard::NotUnderstood
            }
        }
    }
}

/// Normalizes one line of input the way the recognizer reports transcripts:
/// trimmed and lowercase, blank meaning not understood.
pub fn recognize(line: &str) -> Heard {
    let command = line.trim().to_lowercase();
    if command.is_empty() {
        Heard::NotUnderstood
    } else {
        Heard::Command(command)
    }
}
