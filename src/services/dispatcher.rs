//! Confidence-gated routing of a classification to exactly one handler.

use std::sync::Arc;

use crate::commands::{
    browser, courtesy, date_time, joke, location, news, open_target, system_info, timer, weather,
    SkillContext,
};
use crate::models::{Classification, Request};
use crate::services::countdown::CountdownScheduler;
use crate::services::speech::Speaker;
use crate::utils::Telemetry;

pub const CONFIDENCE_THRESHOLD: f64 = 0.6;
pub const CLARIFICATION: &str = "I'm not sure what you meant. Could you rephrase?";
pub const GOODBYE: &str = "Goodbye";

pub struct Router {
    skills: SkillContext,
    scheduler: CountdownScheduler,
    speaker: Arc<dyn Speaker>,
    log: Telemetry,
}

impl Router {
    pub fn new(
        skills: SkillContext,
        scheduler: CountdownScheduler,
        speaker: Arc<dyn Speaker>,
        log: Telemetry,
    ) -> Self {
        Self {
            skills,
            scheduler,
            speaker,
            log,
        }
    }

    pub async fn route(&self, classification: Classification) -> String {
        let intent = classification.intent();
        if classification.confidence < CONFIDENCE_THRESHOLD {
            log::info!(
                target: self.log.target(),
                "Confidence {:.2} below threshold for {}, asking to rephrase",
                classification.confidence,
                intent
            );
            return CLARIFICATION.to_string();
        }

        log::info!(
            target: self.log.target(),
            "Routing {} (confidence {:.2})",
            intent,
            classification.confidence
        );

        match classification.request {
            Request::DateTime(info) => date_time::get_date_time(&info),
            Request::Joke => joke::get_joke(),
            Request::Location => location::get_location(&self.skills).await,
            Request::News => news::get_news(&self.skills).await,
            Request::Weather { location } => {
                weather::get_weather(&self.skills, location.as_deref()).await
            }
            Request::Search { query } => browser::search_google(query.as_deref()),
            Request::Youtube { query } => browser::youtube_player(query.as_deref()),
            Request::OpenTarget(target) => open_target::open_target(&target),
            Request::SystemInfo(query) => {
                match tokio::task::spawn_blocking(move || system_info::get_system_info(&query)).await
                {
                    Ok(reply) => reply,
                    Err(e) => {
                        log::error!(target: self.log.target(), "System info task failed: {}", e);
                        "I could not retrieve system information.".to_string()
                    }
                }
            }
            Request::Timer { duration } => {
                timer::run_timer(&self.scheduler, duration, self.speaker.clone())
            }
            Request::Courtesy => courtesy::handle_courtesy(),
            Request::Exit => GOODBYE.to_string(),
            Request::Unknown => CLARIFICATION.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::courtesy::RESPONSES;
    use crate::commands::joke::JOKES;
    use crate::models::{InfoType, ResourceQuery, SkillSettings};
    use crate::services::classifier::IntentEngine;
    use crate::services::llm_client::{LlmError, TextGenerator};
    use async_trait::async_trait;

    struct Silent;

    impl Speaker for Silent {
        fn speak(&self, _text: &str) {}
    }

    fn router() -> (Router, CountdownScheduler) {
        let scheduler = CountdownScheduler::new(Telemetry::root());
        let skills = SkillContext::new(&SkillSettings::default(), Telemetry::root()).unwrap();
        let router = Router::new(skills, scheduler.clone(), Arc::new(Silent), Telemetry::root());
        (router, scheduler)
    }

    fn classified(request: Request, confidence: f64) -> Classification {
        Classification::new(request, confidence)
    }

    #[tokio::test]
    async fn test_low_confidence_never_reaches_a_handler() {
        let (router, scheduler) = router();
        for request in [Request::Exit, Request::Joke, Request::Timer { duration: Some(10) }] {
            assert_eq!(router.route(classified(request, 0.59)).await, CLARIFICATION);
        }
        assert_eq!(scheduler.pending(), 0);
    }

    #[tokio::test]
    async fn test_threshold_is_inclusive() {
        let (router, _) = router();
        let reply = router.route(classified(Request::Joke, 0.6)).await;
        assert!(JOKES.contains(&reply.as_str()));
    }

    #[tokio::test]
    async fn test_fixed_replies() {
        let (router, _) = router();
        assert_eq!(router.route(classified(Request::Unknown, 1.0)).await, CLARIFICATION);
        assert_eq!(router.route(classified(Request::Exit, 0.95)).await, GOODBYE);
        assert_eq!(
            router
                .route(classified(Request::SystemInfo(ResourceQuery::Missing), 0.9))
                .await,
            "No resource was queried."
        );
        let reply = router.route(classified(Request::Courtesy, 0.9)).await;
        assert!(RESPONSES.contains(&reply.as_str()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_starts_a_countdown() {
        let (router, scheduler) = router();
        let reply = router
            .route(classified(Request::Timer { duration: Some(3600) }, 0.9))
            .await;
        assert_eq!(reply, "Timer started for 3600 seconds");
        assert_eq!(scheduler.pending(), 1);

        let reply = router
            .route(classified(Request::Timer { duration: Some(3601) }, 0.9))
            .await;
        assert_eq!(reply, "Sorry, I can only set timers up to one hour.");
        assert_eq!(scheduler.pending(), 1);
    }

    struct FixedGenerator(Option<&'static str>);

    #[async_trait]
    impl TextGenerator for FixedGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
            self.0.map(str::to_string).ok_or(LlmError::Timeout)
        }
    }

    #[tokio::test]
    async fn test_date_command_end_to_end() {
        let engine = IntentEngine::new(
            Arc::new(FixedGenerator(Some(
                r#"{"intent":"date_time","confidence":0.95,"entities":{"info_type":["date"]}}"#,
            ))),
            Telemetry::root(),
        );
        let classification = engine.classify("what's the date").await;
        assert_eq!(classification.request, Request::DateTime(vec![InfoType::Date]));

        let (router, _) = router();
        let reply = router.route(classification).await;
        assert!(reply.starts_with("Today's date is "), "{}", reply);
        assert!(reply.ends_with('.') && !reply.ends_with(".."));
    }

    #[tokio::test]
    async fn test_backend_timeout_asks_to_rephrase() {
        let engine = IntentEngine::new(Arc::new(FixedGenerator(None)), Telemetry::root());
        let classification = engine.classify("set a timer").await;
        assert_eq!(classification.confidence, 0.0);

        let (router, _) = router();
        assert_eq!(router.route(classification).await, CLARIFICATION);
    }
}
