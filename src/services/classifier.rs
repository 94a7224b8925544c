use std::sync::Arc;

use crate::models::{Classification, Intent};
use crate::services::llm_client::TextGenerator;
use crate::services::sanitizer::OutputSanitizer;
use crate::utils::Telemetry;

const INTENT_DEFINITIONS: &str = r#"===== INTENT DEFINITIONS =====
You must classify the input into EXACTLY ONE of these intents:

1. "date_time" - User asks about the current time, date, or day of the week
Examples: "what time is it", "what's the date", "what day is today", "time and date please"

2. "joke" - User requests a joke or something funny
Examples: "tell me a joke", "say something funny", "make me laugh"

3. "location" - User asks where they currently are
Examples: "where am i", "what city am i in", "find my location"

4. "news" - User requests current news, headlines, or recent events
Examples: "what's happening", "news today", "tell me the headlines"

5. "weather" - User asks about weather conditions, temperature, or forecast
Examples: "what's the weather", "will it rain", "temperature in Delhi"

6. "search" - User wants to search for information on the internet
Examples: "search for python tutorials", "look up quantum physics", "google elon musk"

7. "youtube" - User wants to play, search, or open something on YouTube
Examples: "play despacito", "open youtube", "search songs on youtube"

8. "opening_app_or_url" - User wants to open a desktop application or a website
Apps: "open chrome", "launch calculator", "start notepad", "open terminal"
Websites: "open facebook", "go to google", "open reddit", "visit imdb website"

KEY DISTINCTIONS:
- "play [song]" or "search on youtube" -> youtube
- "open [app name]" or "launch [program]" -> opening_app_or_url
- "search for [topic]" -> search
- "go to [website]" or "open [site] website" -> opening_app_or_url

9. "system_info" - User asks about computer status: battery, CPU, memory/RAM, storage/disk, or uptime
Examples: "what's my battery level", "check cpu usage", "how much ram is free", "check disk space", "how long has my computer been on"

10. "timer" - User wants a timer or countdown for a specific duration
Examples: "set a timer for 30 seconds", "timer for 5 minutes", "remind me in 3 minutes", "countdown 20 seconds"

11. "courtesy" - User expresses gratitude or polite acknowledgment, not a request for action
Examples: "thank you", "thanks a lot", "appreciate it", "cheers"
- "thanks, now search for X" -> search (the thanks is incidental)

12. "exit" - User wants to quit, stop, or exit the assistant
Examples: "exit", "quit", "stop", "close", "shutdown"

13. "unknown" - Input matches none of the above, is gibberish, empty, or unclear
Examples: "loxacvreb", "asdfgh", "", "what is love"
"#;

const ENTITY_RULES: &str = r#"===== ENTITY EXTRACTION RULES =====
Extract ONLY these entities, and only for the intent they belong to:

- "date_time": {"info_type": [...]} - an ARRAY with ONLY the parts the user asked for, drawn from "time", "date", "day"
  "what time is it" -> {"info_type": ["time"]}
  "what's the date" -> {"info_type": ["date"]}
  "what day is it" -> {"info_type": ["day"]}
  "time and date" -> {"info_type": ["time", "date"]}
  "what's today" -> {"info_type": ["date", "day"]}
  If it is unclear which parts are wanted -> {"info_type": ["time", "date", "day"]}

- "weather": {"location": "city or place"} - only if the user names a place
  "weather in Mumbai" -> {"location": "Mumbai"}

- "search" and "youtube": {"query": "search terms, song or video title"}
  "search for python" -> {"query": "python"}
  "play despacito" -> {"query": "despacito"}

- "system_info": {"resource": one of "battery", "cpu", "memory", "storage", "uptime"}
  RAM maps to "memory"; disk, drive or hard drive maps to "storage"

- "timer": {"duration": seconds_as_integer}
  ALWAYS convert to SECONDS yourself: seconds x1, minutes x60, hours x3600; sum mixed units
  "timer 5 minutes" -> {"duration": 300}
  "countdown 3 mins" -> {"duration": 180}
  "timer for 1 hour" -> {"duration": 3600}
  Maximum is 3600. If the total exceeds 3600, still classify as timer with {"duration": 3600}
  Never return text such as "5 minutes". If no duration is given, omit the entity and use confidence 0.6-0.7

- "opening_app_or_url":
  Apps: {"type": "app", "name": "app_name", "executable": "short executable name, no .exe"}
    "launch calculator" -> {"type": "app", "name": "calculator", "executable": "calc"}
    "open terminal" -> {"type": "app", "name": "terminal", "executable": "cmd"}
  Websites: {"type": "url", "name": "site_name", "url": "full https:// URL"}
    "go to imdb" -> {"type": "url", "name": "imdb", "url": "https://imdb.com"}
  Desktop software -> app; online services and social media -> url

DO NOT extract entities for joke, location, news, courtesy, exit, or unknown.
DO NOT invent entities that are not in the user input.
"#;

const CONFIDENCE_RULES: &str = r#"===== CONFIDENCE SCORING RULES =====
0.95-1.0: perfect match with specific details ("set timer for 5 minutes", "check battery level", "thank you")
0.85-0.94: clear intent with some details ("open facebook", "what's my cpu", "what's the date")
0.70-0.84: clear intent, no details ("what's the news", "tell me a joke", "what's today")
0.50-0.69: ambiguous, could match multiple intents ("what's happening", "show me")
0.30-0.49: very unclear or partially matching ("time weather")
0.10-0.29: gibberish ("loxacvreb")
0.0-0.09: empty or only special characters ("")
If unsure between two intents, pick the most likely one and lower the confidence.
"#;

const EXAMPLES: &str = r#"===== EXAMPLES =====
Input: "what's the weather in Mumbai"
Output: {"intent": "weather", "entities": {"location": "Mumbai"}, "confidence": 0.95}
Input: "tell me a joke"
Output: {"intent": "joke", "entities": {}, "confidence": 0.9}
Input: "play despacito"
Output: {"intent": "youtube", "entities": {"query": "despacito"}, "confidence": 0.92}
Input: "open chrome"
Output: {"intent": "opening_app_or_url", "entities": {"type": "app", "name": "chrome", "executable": "chrome"}, "confidence": 0.95}
Input: "open facebook website"
Output: {"intent": "opening_app_or_url", "entities": {"type": "url", "name": "facebook", "url": "https://facebook.com"}, "confidence": 0.93}
Input: "how much ram is free"
Output: {"intent": "system_info", "entities": {"resource": "memory"}, "confidence": 0.92}
Input: "set a 10 minute timer"
Output: {"intent": "timer", "entities": {"duration": 600}, "confidence": 0.94}
Input: "thank you"
Output: {"intent": "courtesy", "entities": {}, "confidence": 0.98}
Input: "what's the date"
Output: {"intent": "date_time", "entities": {"info_type": ["date"]}, "confidence": 0.97}
Input: "what's the time and date"
Output: {"intent": "date_time", "entities": {"info_type": ["time", "date"]}, "confidence": 0.95}
Input: "loxacvreb"
Output: {"intent": "unknown", "entities": {}, "confidence": 0.15}
Input: ""
Output: {"intent": "unknown", "entities": {}, "confidence": 0.0}
"#;

/// Builds the instruction prompt for one command. The command is embedded as
/// a JSON string literal so quotes in it cannot terminate the prompt's own
/// quoting.
pub fn build_prompt(command: &str) -> String {
    let quoted = serde_json::to_string(command).unwrap_or_else(|_| "\"\"".to_string());
    let labels = Intent::ALL
        .iter()
        .map(Intent::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "You are a precise intent classification system.\n\
         Your ONLY job is to classify user input into predefined categories.\n\n\
         USER INPUT: {quoted}\n\n\
         {INTENT_DEFINITIONS}\n\
         {ENTITY_RULES}\n\
         {CONFIDENCE_RULES}\n\
         ===== OUTPUT FORMAT =====\n\
         Respond with ONLY a single line of valid JSON with exactly these fields:\n\
         {{\"intent\": \"one_of_the_13_intents\", \"entities\": {{}}, \"confidence\": 0.85}}\n\n\
         ===== STRICT RULES =====\n\
         1. intent MUST be one of: {labels}\n\
         2. DO NOT create new intent names\n\
         3. DO NOT add explanations, comments, or any text outside the JSON\n\
         4. DO NOT use markdown code blocks\n\
         5. entities MUST be an object, never null or an array\n\
         6. confidence MUST be a number between 0.0 and 1.0\n\
         7. Empty input = unknown intent with confidence 0.0\n\n\
         {EXAMPLES}\n\
         Now classify this input: {quoted}\n"
    )
}

/// Classifies free-form commands through the text-generation backend.
pub struct IntentEngine {
    llm: Arc<dyn TextGenerator>,
    sanitizer: OutputSanitizer,
    log: Telemetry,
}

impl IntentEngine {
    pub fn new(llm: Arc<dyn TextGenerator>, log: Telemetry) -> Self {
        log::debug!(target: log.target(), "Intent engine initialized");
        Self {
            llm,
            sanitizer: OutputSanitizer::new(log.child("sanitizer")),
            log,
        }
    }

    pub async fn classify(&self, command: &str) -> Classification {
        let prompt = build_prompt(command);
        log::debug!(target: self.log.target(), "Classifying command: {}", command);

        let raw = match self.llm.generate(&prompt).await {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!(
                    target: self.log.target(),
                    "LLM call failed ({}), falling back to unknown intent",
                    e
                );
                return Classification::unknown();
            }
        };

        if raw.trim().is_empty() {
            log::warn!(
                target: self.log.target(),
                "LLM response is empty, falling back to unknown intent"
            );
            return Classification::unknown();
        }

        self.sanitizer.sanitize(&raw)
    }
}
