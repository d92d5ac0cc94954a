//! Prompt/response exchange with the completion service
//!
//! Submits a [`Conversation`] and retries transient failures according to a
//! [`RetryPolicy`] until a reply arrives, a permanent error occurs, or the
//! policy runs out of attempts or time.

mod error;
mod retry;
mod service;
mod types;

pub use error::ExchangeError;
pub use retry::{Clock, RetryPolicy, SystemClock};
pub use service::{ApiKey, CompletionService, HttpCompletionService};
pub use types::{parse_completion, ChatRequest, CompletionOutcome};

use crate::domain::{Conversation, DEFAULT_MAX_TOKENS};

pub struct Exchange<S, C = SystemClock> {
    service: S,
    model: String,
    max_tokens: u32,
    policy: RetryPolicy,
    clock: C,
}

impl<S: CompletionService> Exchange<S> {
    pub fn new(service: S, model: impl Into<String>, policy: RetryPolicy) -> Self {
        Self {
            service,
            model: model.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            policy,
            clock: SystemClock,
        }
    }
}

impl<S: CompletionService, C: Clock> Exchange<S, C> {
    pub fn with_clock<C2: Clock>(self, clock: C2) -> Exchange<S, C2> {
        Exchange {
            service: self.service,
            model: self.model,
            max_tokens: self.max_tokens,
            policy: self.policy,
            clock,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Send `system` and `user`, followed by `extra_turns` alternating
    /// assistant/user, and return the first choice's text.
    pub fn generate_response<T: AsRef<str>>(
        &self,
        system: &str,
        user: &str,
        extra_turns: &[T],
    ) -> Result<String, ExchangeError> {
        self.complete(&Conversation::new(system, user, extra_turns))
    }

    pub fn complete(&self, conversation: &Conversation) -> Result<String, ExchangeError> {
        let request =
            ChatRequest::new(self.model.clone(), conversation.clone()).with_max_tokens(self.max_tokens);
        self.send_with_retry(&request)
    }

    fn send_with_retry(&self, request: &ChatRequest) -> Result<String, ExchangeError> {
        let started = self.clock.now();
        let limit = self.policy.attempt_limit();
        let mut attempt = 0u32;

        loop {
            attempt += 1;

            let err = match self.attempt(request) {
                Ok(reply) => {
                    if attempt > 1 {
                        tracing::info!("Received response after {} attempts", attempt);
                    }
                    return Ok(reply);
                }
                Err(err) if !err.is_transient() => return Err(err),
                Err(err) => err,
            };

            if attempt >= limit {
                return Err(ExchangeError::RetriesExhausted { attempts: attempt, last: Box::new(err) });
            }

            let delay = self.policy.apply_jitter(self.policy.delay_for(attempt));
            if let Some(max_elapsed) = self.policy.max_elapsed {
                let elapsed = self.clock.now().saturating_duration_since(started);
                if elapsed.saturating_add(delay) > max_elapsed {
                    return Err(ExchangeError::DeadlineExceeded {
                        elapsed,
                        attempts: attempt,
                        last: Box::new(err),
                    });
                }
            }

            tracing::warn!(
                "Failed to generate response (attempt {}/{}): {}. Retrying in {:?}",
                attempt,
                limit,
                err,
                delay
            );
            self.clock.sleep(delay);
        }
    }

    fn attempt(&self, request: &ChatRequest) -> Result<String, ExchangeError> {
        let body = self.service.send(request)?;
        parse_completion(&body).into_result()
    }
}
