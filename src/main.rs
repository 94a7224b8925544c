mod commands;
mod models;
mod services;
mod utils;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;

use commands::SkillContext;
use services::classifier::IntentEngine;
use services::countdown::CountdownScheduler;
use services::dispatcher::{Router, GOODBYE};
use services::speech::{CommandSource, ConsoleInput, Heard, Speaker, Speech};
use utils::Telemetry;

#[derive(Parser, Debug)]
#[command(name = "assistly", version, about = "Natural-language command assistant")]
struct Cli {
    /// Settings file (JSON)
    #[arg(long, default_value = utils::config::DEFAULT_SETTINGS_PATH)]
    config: PathBuf,

    /// Handle a single command and exit once any timer it started has fired
    #[arg(long, value_name = "COMMAND")]
    once: Option<String>,

    /// Print replies without text-to-speech
    #[arg(long)]
    no_speech: bool,

    /// Log level, overrides the settings file
    #[arg(long)]
    log_level: Option<String>,
}

struct Assistant {
    engine: IntentEngine,
    router: Router,
    speaker: Arc<dyn Speaker>,
}

impl Assistant {
    async fn handle(&self, command: &str) -> String {
        let classification = self.engine.classify(command).await;
        self.router.route(classification).await
    }

    async fn say(&self, text: String) {
        let speaker = self.speaker.clone();
        if let Err(e) = tokio::task::spawn_blocking(move || speaker.speak(&text)).await {
            log::error!("Speech task failed: {}", e);
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    utils::config::load_dotenv();
    let mut settings = utils::config::load_settings(&cli.config)
        .with_context(|| format!("Failed to load settings from {}", cli.config.display()))?;
    if cli.no_speech {
        settings.speech.enabled = false;
    }
    utils::telemetry::init_logging(&settings.logging, cli.log_level.as_deref())?;

    let root = Telemetry::root();
    log::info!(
        target: root.target(),
        "Starting assistly v{} | provider={:?} model={}",
        env!("CARGO_PKG_VERSION"),
        settings.ai.provider,
        settings.ai.model_name()
    );

    let llm = services::llm_client::build_generator(&settings.ai, root.child("llm"))
        .context("Failed to initialize the text-generation backend")?;
    let skills = SkillContext::new(&settings.skills, root.child("skills"))
        .context("Failed to build the HTTP client for skills")?;
    let scheduler = CountdownScheduler::new(root.child("countdown"));
    let speaker: Arc<dyn Speaker> = Arc::new(Speech::new(&settings.speech, root.child("speech")));

    let assistant = Assistant {
        engine: IntentEngine::new(llm, root.child("classifier")),
        router: Router::new(skills, scheduler.clone(), speaker.clone(), root.child("router")),
        speaker,
    };

    if let Some(command) = cli.once {
        let reply = assistant.handle(&command.trim().to_lowercase()).await;
        assistant.say(reply).await;
        while scheduler.pending() > 0 {
            tokio::time::sleep(Duration::from_millis(250)).await;
        }
        return Ok(());
    }

    assistant.say(commands::greet::greet().to_string()).await;

    let mut input = ConsoleInput::new(root.child("input"));
    loop {
        let command = match input.next_command().await {
            Heard::Command(command) => command,
            Heard::NotUnderstood => {
                println!("Sorry, didn't catch that.");
                continue;
            }
            Heard::Closed => {
                log::info!(target: root.target(), "Input closed, shutting down");
                break;
            }
        };

        println!("{}", command);

        let reply = assistant.handle(&command).await;
        let done = reply == GOODBYE;
        assistant.say(reply).await;
        if done {
            break;
        }
    }

    Ok(())
}
