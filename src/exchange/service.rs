//! Completion service seam and its HTTP implementation

use reqwest::blocking::Client;
use std::fmt;
use std::time::Duration;

use super::{ChatRequest, ExchangeError};

/// Something that accepts a chat request and returns the raw response body.
///
/// Non-2xx responses are reported as [`ExchangeError::Status`].
pub trait CompletionService {
    fn send(&self, request: &ChatRequest) -> Result<String, ExchangeError>;
}

impl<T: CompletionService + ?Sized> CompletionService for &T {
    fn send(&self, request: &ChatRequest) -> Result<String, ExchangeError> {
        (**self).send(request)
    }
}

/// Bearer credential for the completion service
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Read the credential once from the named environment variable.
    ///
    /// An empty value counts as missing.
    pub fn from_env(var: &str) -> Result<Self, ExchangeError> {
        match std::env::var(var) {
            Ok(value) if !value.trim().is_empty() => Ok(Self(value.trim().to_string())),
            _ => Err(ExchangeError::MissingCredential { var: var.to_string() }),
        }
    }

    fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// OpenAI-compatible `POST {api_base}/chat/completions` client
#[derive(Debug, Clone)]
pub struct HttpCompletionService {
    client: Client,
    endpoint: String,
    api_key: ApiKey,
}

impl HttpCompletionService {
    pub fn new(api_base: &str, api_key: ApiKey, timeout: Duration) -> Result<Self, ExchangeError> {
        let client = Client::builder().timeout(timeout).build()?;
        let endpoint = format!("{}/chat/completions", api_base.trim_end_matches('/'));

        Ok(Self { client, endpoint, api_key })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl CompletionService for HttpCompletionService {
    fn send(&self, request: &ChatRequest) -> Result<String, ExchangeError> {
        tracing::debug!(
            "Sending {} messages to {} (model {})",
            request.messages.len(),
            self.endpoint,
            request.model
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.api_key.expose())
            .json(request)
            .send()?;

        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            return Err(ExchangeError::Status { status: status.as_u16(), body });
        }

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Conversation;

    fn request() -> ChatRequest {
        ChatRequest::new("gpt-4o", Conversation::new::<&str>("sys", "hello", &[]))
    }

    fn service(server: &mockito::ServerGuard) -> HttpCompletionService {
        HttpCompletionService::new(&server.url(), ApiKey::new("sk-test"), Duration::from_secs(5))
            .unwrap()
    }

    #[test]
    fn posts_request_with_bearer_credential() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "model": "gpt-4o",
                "max_tokens": 1500,
                "temperature": 0.0
            })))
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"hi"}}]}"#)
            .create();

        let body = service(&server).send(&request()).unwrap();

        mock.assert();
        assert!(body.contains("\"hi\""));
    }

    #[test]
    fn non_success_status_is_reported_with_body() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .with_body("slow down")
            .create();

        let err = service(&server).send(&request()).unwrap_err();

        assert!(err.is_transient());
        assert!(matches!(
            err,
            ExchangeError::Status { status: 429, ref body } if body == "slow down"
        ));
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let service = HttpCompletionService::new(
            "https://api.example.test/v1/",
            ApiKey::new("k"),
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(service.endpoint(), "https://api.example.test/v1/chat/completions");
    }

    #[test]
    fn api_key_debug_is_redacted() {
        assert_eq!(format!("{:?}", ApiKey::new("sk-secret")), "ApiKey(***)");
    }

    #[test]
    fn missing_credential_names_the_variable() {
        let err = ApiKey::from_env("REPO_DEBUGGER_TEST_UNSET_KEY").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Credential environment variable REPO_DEBUGGER_TEST_UNSET_KEY is not set"
        );
    }
}
