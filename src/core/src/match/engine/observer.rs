use crate::error::RuntimeEventError;
use crate::r#match::events::MatchEvent;
use crate::r#match::result::MatchResult;
use crate::r#match::Score;
use log::error;
use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

pub type ObserverResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Called for every fired event with the minute and the score after the event.
pub type EventObserver = Box<dyn FnMut(&MatchEvent, u8, Score) -> ObserverResult + Send>;

pub type CompletionCallback = Box<dyn FnOnce(&MatchResult) + Send>;

/// Registered callbacks of one session. Failures are logged and swallowed so a
/// misbehaving observer cannot stop the match.
#[derive(Default)]
pub struct ObserverSet {
    event_observers: Vec<EventObserver>,
    completion_callbacks: Vec<CompletionCallback>,
}

impl ObserverSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_event_observer(&mut self, observer: EventObserver) {
        self.event_observers.push(observer);
    }

    pub fn add_completion_callback(&mut self, callback: CompletionCallback) {
        self.completion_callbacks.push(callback);
    }

    pub fn notify(&mut self, event: &MatchEvent, score: Score) -> Vec<RuntimeEventError> {
        let mut failures = Vec::new();

        for observer in self.event_observers.iter_mut() {
            let outcome = catch_unwind(AssertUnwindSafe(|| observer(event, event.minute, score)));

            let message = match outcome {
                Ok(Ok(())) => continue,
                Ok(Err(e)) => e.to_string(),
                Err(panic) => panic_message(panic),
            };

            let failure = RuntimeEventError {
                kind: event.kind(),
                minute: event.minute,
                message,
            };
            error!("{}", failure);
            failures.push(failure);
        }

        failures
    }

    /// Runs and drops every completion callback registered so far.
    pub fn complete(&mut self, result: &MatchResult) {
        for callback in self.completion_callbacks.drain(..) {
            run_completion(callback, result);
        }
    }
}

pub fn run_completion(callback: CompletionCallback, result: &MatchResult) {
    if let Err(panic) = catch_unwind(AssertUnwindSafe(|| callback(result))) {
        error!("completion callback failed: {}", panic_message(panic));
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        String::from(*message)
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        String::from("observer panicked")
    }
}
