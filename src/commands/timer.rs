use std::sync::Arc;

use crate::services::countdown::{CountdownScheduler, TimerError};
use crate::services::speech::Speaker;

const INVALID_DURATION: &str = "Invalid timer duration.";

pub fn run_timer(scheduler: &CountdownScheduler, duration: Option<i64>, sink: Arc<dyn Speaker>) -> String {
    let Some(seconds) = duration else {
        return INVALID_DURATION.to_string();
    };
    match scheduler.start(seconds, sink) {
        Ok(ticket) => ticket.acknowledgement(),
        Err(TimerError::InvalidDuration) => INVALID_DURATION.to_string(),
        Err(TimerError::ExceedsMaximum { .. }) => {
            "Sorry, I can only set timers up to one hour.".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::Telemetry;

    struct Silent;

    impl Speaker for Silent {
        fn speak(&self, _text: &str) {}
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_replies() {
        let scheduler = CountdownScheduler::new(Telemetry::root());
        let sink: Arc<dyn Speaker> = Arc::new(Silent);

        assert_eq!(run_timer(&scheduler, None, sink.clone()), "Invalid timer duration.");
        assert_eq!(run_timer(&scheduler, Some(0), sink.clone()), "Invalid timer duration.");
        assert_eq!(
            run_timer(&scheduler, Some(3601), sink.clone()),
            "Sorry, I can only set timers up to one hour."
        );
        assert_eq!(scheduler.pending(), 0);

        assert_eq!(run_timer(&scheduler, Some(3600), sink), "Timer started for 3600 seconds");
        assert_eq!(scheduler.pending(), 1);
    }
}
