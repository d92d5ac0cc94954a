//! Chat-completions request and response shapes

use serde::{Deserialize, Serialize};

use super::ExchangeError;
use crate::domain::{Conversation, DEFAULT_MAX_TOKENS};

/// Body of a chat-completions request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Conversation,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl ChatRequest {
    /// Deterministic decoding (temperature 0) with the default token ceiling.
    pub fn new(model: impl Into<String>, messages: Conversation) -> Self {
        Self { model: model.into(), messages, max_tokens: DEFAULT_MAX_TOKENS, temperature: 0.0 }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Validated shape of a completion response body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// Text of the first choice's message
    Success(String),
    EmptyChoices,
    MalformedPayload(String),
}

impl CompletionOutcome {
    pub fn into_result(self) -> Result<String, ExchangeError> {
        match self {
            CompletionOutcome::Success(text) => Ok(text),
            CompletionOutcome::EmptyChoices => Err(ExchangeError::EmptyChoices),
            CompletionOutcome::MalformedPayload(reason) => {
                Err(ExchangeError::MalformedPayload(reason))
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Classify a raw response body.
pub fn parse_completion(body: &str) -> CompletionOutcome {
    let response: ChatResponse = match serde_json::from_str(body) {
        Ok(response) => response,
        Err(err) => return CompletionOutcome::MalformedPayload(err.to_string()),
    };

    match response.choices.into_iter().next() {
        None => CompletionOutcome::EmptyChoices,
        Some(Choice { message: ChoiceMessage { content: Some(text) } }) => {
            CompletionOutcome::Success(text)
        }
        Some(_) => {
            CompletionOutcome::MalformedPayload("first choice has no message content".to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Conversation;

    #[test]
    fn request_serializes_to_chat_completions_shape() {
        let request = ChatRequest::new("gpt-4o", Conversation::new("sys", "hello", &["hi", "again"]));
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "model": "gpt-4o",
                "messages": [
                    {"role": "system", "content": "sys"},
                    {"role": "user", "content": "hello"},
                    {"role": "assistant", "content": "hi"},
                    {"role": "user", "content": "again"}
                ],
                "max_tokens": 1500,
                "temperature": 0.0
            })
        );
    }

    #[test]
    fn first_choice_content_is_returned() {
        let body = r#"{"id":"x","choices":[
            {"index":0,"message":{"role":"assistant","content":"Check line 3."}},
            {"index":1,"message":{"role":"assistant","content":"ignored"}}
        ]}"#;
        assert_eq!(parse_completion(body), CompletionOutcome::Success("Check line 3.".into()));
    }

    #[test]
    fn empty_choices_are_distinguished() {
        assert_eq!(parse_completion(r#"{"choices":[]}"#), CompletionOutcome::EmptyChoices);
    }

    #[test]
    fn unexpected_shapes_are_malformed() {
        assert!(matches!(parse_completion("not json"), CompletionOutcome::MalformedPayload(_)));
        assert!(matches!(
            parse_completion(r#"{"error":{"message":"nope"}}"#),
            CompletionOutcome::MalformedPayload(_)
        ));
        assert!(matches!(
            parse_completion(r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#),
            CompletionOutcome::MalformedPayload(_)
        ));
    }

    #[test]
    fn outcome_maps_onto_errors() {
        assert_eq!(CompletionOutcome::Success("ok".into()).into_result().unwrap(), "ok");
        assert!(matches!(
            CompletionOutcome::EmptyChoices.into_result(),
            Err(ExchangeError::EmptyChoices)
        ));
    }
}
