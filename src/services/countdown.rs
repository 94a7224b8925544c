//! Fire-and-forget countdown timers.
//!
//! Each accepted countdown becomes one detached tokio task that sleeps for the
//! requested duration and then announces completion on the shared speaker.
//! Started countdowns cannot be cancelled, queried or joined: the ticket
//! returned by [`CountdownScheduler::start`] only identifies the countdown.
//! The scheduler keeps a count of pending countdowns and nothing else.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use uuid::Uuid;

use crate::services::speech::Speaker;
use crate::utils::Telemetry;

pub const MAX_TIMER_SECONDS: i64 = 3600;
pub const TIMER_FINISHED: &str = "Timer finished.";

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerError {
    #[error("timer duration must be a positive number of seconds")]
    InvalidDuration,

    #[error("timer duration exceeds the maximum of {max} seconds")]
    ExceedsMaximum { max: i64 },
}

/// Acknowledgement for a started countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownTicket {
    pub id: Uuid,
    pub seconds: u64,
}

impl CountdownTicket {
    pub fn acknowledgement(&self) -> String {
        format!("Timer started for {} seconds", self.seconds)
    }
}

#[derive(Clone)]
pub struct CountdownScheduler {
    pending: Arc<AtomicUsize>,
    log: Telemetry,
}

impl CountdownScheduler {
    pub fn new(log: Telemetry) -> Self {
        Self {
            pending: Arc::new(AtomicUsize::new(0)),
            log,
        }
    }

    pub fn validate(seconds: i64) -> Result<u64, TimerError> {
        if seconds <= 0 {
            return Err(TimerError::InvalidDuration);
        }
        if seconds > MAX_TIMER_SECONDS {
            return Err(TimerError::ExceedsMaximum {
                max: MAX_TIMER_SECONDS,
            });
        }
        Ok(seconds as u64)
    }

    /// Starts a countdown and returns without waiting for it. Must be called
    /// from within a tokio runtime.
    pub fn start(&self, seconds: i64, sink: Arc<dyn Speaker>) -> Result<CountdownTicket, TimerError> {
        let seconds = Self::validate(seconds)?;
        let ticket = CountdownTicket {
            id: Uuid::new_v4(),
            seconds,
        };

        self.pending.fetch_add(1, Ordering::SeqCst);
        let pending = self.pending.clone();
        let log = self.log.clone();

        // Detached on purpose: dropping the JoinHandle leaves no way to abort.
        drop(tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(seconds)).await;
            pending.fetch_sub(1, Ordering::SeqCst);
            log::info!(target: log.target(), "Countdown {} finished after {}s", ticket.id, seconds);

            // Speech rendering blocks, keep it off the async workers.
            if let Err(e) = tokio::task::spawn_blocking(move || sink.speak(TIMER_FINISHED)).await {
                log::error!(target: log.target(), "Countdown {} failed to announce: {}", ticket.id, e);
            }
        }));

        log::info!(target: self.log.target(), "Countdown {} started for {}s", ticket.id, seconds);
        Ok(ticket)
    }

    /// Countdowns started and not yet elapsed.
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }
}
