/*!
 * Mock provider implementations for testing.
 *
 * The mock speaks the chat completions request/response types so it can be
 * plugged straight into the translation client:
 * - `MockProvider::echo()` - returns the user payload unchanged
 * - `MockProvider::uppercase()` - returns the user payload uppercased
 * - `MockProvider::failing()` - always fails with an API error
 * - `MockProvider::scripted(...)` - replays a fixed sequence of outcomes
 */

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use async_trait::async_trait;
use parking_lot::Mutex;

use crate::errors::ProviderError;
use crate::providers::Provider;
use crate::providers::openai::{ChatRequest, ChatResponse};

/// Behavior mode for the mock provider once its script is used up
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Return the user payload unchanged
    Echo,
    /// Return the user payload uppercased
    Uppercase,
    /// Fail every Nth request, echo otherwise
    Intermittent { fail_every: usize },
    /// Always fail with an error
    Failing,
    /// Return an empty content field
    Empty,
    /// Return empty content with the uppercased payload in the reasoning field
    ReasoningOnly,
    /// Return the payload with `finish_reason = "length"`
    Truncated,
    /// Echo after a delay
    Slow { delay_ms: u64 },
}

/// Mock provider for testing translation behavior
#[derive(Debug, Clone)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Outcomes replayed before falling back to `behavior`
    script: Arc<Mutex<VecDeque<Result<ChatResponse, ProviderError>>>>,
    /// Every request received, in order
    requests: Arc<Mutex<Vec<ChatRequest>>>,
    /// Request counter shared between clones
    request_count: Arc<AtomicUsize>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            script: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            request_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a mock that echoes the payload
    pub fn echo() -> Self {
        Self::new(MockBehavior::Echo)
    }

    /// Create a mock that uppercases the payload
    pub fn uppercase() -> Self {
        Self::new(MockBehavior::Uppercase)
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock that returns empty content
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Create a mock that replays `outcomes` first, then echoes
    pub fn scripted(outcomes: Vec<Result<ChatResponse, ProviderError>>) -> Self {
        let provider = Self::echo();
        provider.script.lock().extend(outcomes);
        provider
    }

    /// Number of requests received so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Copy of every request received so far
    pub fn recorded_requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().clone()
    }

    /// User payloads of every request received so far
    pub fn recorded_payloads(&self) -> Vec<String> {
        self.requests
            .lock()
            .iter()
            .filter_map(|r| r.message_for("user").map(str::to_string))
            .collect()
    }
}

#[async_trait]
impl Provider for MockProvider {
    type Request = ChatRequest;
    type Response = ChatResponse;

    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        let payload = request.message_for("user").unwrap_or_default().to_string();
        self.requests.lock().push(request);

        if let Some(outcome) = self.script.lock().pop_front() {
            return outcome;
        }

        let usage = (payload.len() as u64, (payload.len() / 2) as u64);
        match self.behavior {
            MockBehavior::Echo => Ok(ChatResponse::with_content(payload).usage(usage.0, usage.1)),

            MockBehavior::Uppercase => {
                Ok(ChatResponse::with_content(payload.to_uppercase()).usage(usage.0, usage.1))
            }

            MockBehavior::Intermittent { fail_every } => {
                if fail_every > 0 && count % fail_every == fail_every - 1 {
                    Err(ProviderError::ApiError {
                        message: format!("Simulated intermittent failure (request #{})", count + 1),
                        status_code: 503,
                    })
                } else {
                    Ok(ChatResponse::with_content(payload))
                }
            }

            MockBehavior::Failing => Err(ProviderError::ApiError {
                message: "Simulated provider failure".to_string(),
                status_code: 500,
            }),

            MockBehavior::Empty => Ok(ChatResponse::with_content(String::new())),

            MockBehavior::ReasoningOnly => Ok(ChatResponse::with_reasoning(format!(
                "The user wants this translated.\nTranslation: {}",
                payload.to_uppercase()
            ))),

            MockBehavior::Truncated => {
                Ok(ChatResponse::with_content(payload).finish_reason("length"))
            }

            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
                Ok(ChatResponse::with_content(payload))
            }
        }
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        match self.behavior {
            MockBehavior::Failing => Err(ProviderError::ConnectionError(
                "Simulated connection failure".to_string(),
            )),
            _ => Ok(()),
        }
    }

    fn extract_text(response: &ChatResponse) -> String {
        response.choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default()
    }
}
