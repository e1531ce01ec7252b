/*!
 * Translation client.
 *
 * Wraps a chat-completions provider with role-scoped prompts, bounded output
 * length, linear retry backoff, the reasoning-field fallback and a per-run
 * cache. The orchestrator talks to it through the `Translator` trait.
 */

use std::sync::Arc;
use std::time::{Duration, Instant};
use async_trait::async_trait;
use log::{debug, warn};
use parking_lot::Mutex;

use crate::app_config::TranslationConfig;
use crate::errors::TranslationError;
use crate::providers::Provider;
use crate::providers::openai::{ChatRequest, ChatResponse, ChatUsage};
use super::cache::TranslationCache;
use super::prompts::{self, ContentKind};
use super::reasoning;

/// Smallest output budget granted to any call
const MIN_OUTPUT_TOKENS: u32 = 256;

/// Something that can translate content for the orchestrator
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate one piece of protected content into `target_language`
    async fn translate(
        &self,
        kind: ContentKind,
        content: &str,
        target_language: &str,
    ) -> Result<String, TranslationError>;

    /// Send a marker-delimited combined payload with the previous error embedded
    async fn troubleshoot(
        &self,
        payload: &str,
        target_language: &str,
        previous_error: &str,
    ) -> Result<String, TranslationError>;
}

/// Token usage statistics for tracking API consumption
#[derive(Debug, Clone)]
pub struct TokenUsageStats {
    /// Number of prompt tokens
    pub prompt_tokens: u64,

    /// Number of completion tokens
    pub completion_tokens: u64,

    /// Total number of tokens
    pub total_tokens: u64,

    /// Number of provider calls made
    pub requests: u64,

    /// Start time of token tracking
    pub start_time: Instant,

    /// Total time spent on API requests
    pub api_duration: Duration,

    /// Model name
    pub model: String,
}

impl TokenUsageStats {
    /// Create new token usage stats for a model
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            prompt_tokens: 0,
            completion_tokens: 0,
            total_tokens: 0,
            requests: 0,
            start_time: Instant::now(),
            api_duration: Duration::from_secs(0),
            model: model.into(),
        }
    }

    /// Record one provider call
    pub fn record(&mut self, usage: Option<&ChatUsage>, duration: Duration) {
        self.requests += 1;
        self.api_duration += duration;

        if let Some(usage) = usage {
            self.prompt_tokens += usage.prompt_tokens;
            self.completion_tokens += usage.completion_tokens;
            self.total_tokens += if usage.total_tokens > 0 {
                usage.total_tokens
            } else {
                usage.prompt_tokens + usage.completion_tokens
            };
        }
    }

    /// Calculate tokens per minute rate
    pub fn tokens_per_minute(&self) -> f64 {
        let duration_minutes = if self.api_duration.as_secs_f64() > 0.0 {
            self.api_duration.as_secs_f64() / 60.0
        } else {
            self.start_time.elapsed().as_secs_f64() / 60.0
        };

        if duration_minutes > 0.0 {
            self.total_tokens as f64 / duration_minutes
        } else {
            0.0
        }
    }

    /// Generate a summary of token usage
    pub fn summary(&self) -> String {
        format!(
            "Token Usage Summary:\n\
             Model: {}\n\
             Requests: {}\n\
             Prompt tokens: {}\n\
             Completion tokens: {}\n\
             Total tokens: {}\n\
             Elapsed time: {:.2} minutes\n\
             API request time: {:.2} minutes\n\
             Tokens per minute: {:.2}",
            self.model,
            self.requests,
            self.prompt_tokens,
            self.completion_tokens,
            self.total_tokens,
            self.start_time.elapsed().as_secs_f64() / 60.0,
            self.api_duration.as_secs_f64() / 60.0,
            self.tokens_per_minute()
        )
    }
}

/// Translation client over a chat-completions provider
#[derive(Debug)]
pub struct TranslationClient<P> {
    /// Backend provider
    provider: P,

    /// Client configuration
    config: TranslationConfig,

    /// Language every request translates from
    source_language: String,

    /// Successful translations of this run
    cache: TranslationCache,

    /// Accumulated token usage
    usage: Arc<Mutex<TokenUsageStats>>,
}

impl<P> TranslationClient<P>
where
    P: Provider<Request = ChatRequest, Response = ChatResponse>,
{
    /// Create a new client
    pub fn new(provider: P, config: TranslationConfig, source_language: impl Into<String>) -> Self {
        let usage = TokenUsageStats::new(config.model.clone());
        let cache = TranslationCache::new(config.cache_enabled);
        Self {
            provider,
            config,
            source_language: source_language.into(),
            cache,
            usage: Arc::new(Mutex::new(usage)),
        }
    }

    /// Snapshot of the accumulated token usage
    pub fn usage(&self) -> TokenUsageStats {
        self.usage.lock().clone()
    }

    /// The translation cache
    pub fn cache(&self) -> &TranslationCache {
        &self.cache
    }

    /// The underlying provider
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Test the connection to the provider
    pub async fn test_connection(&self) -> Result<(), TranslationError> {
        self.provider.test_connection().await?;
        Ok(())
    }

    /// Output budget for a payload
    ///
    /// Roughly one token per four characters of input, tripled for target
    /// languages with denser tokenisation, within `[256, max_output_tokens]`.
    pub fn max_tokens_for(&self, payload: &str) -> u32 {
        let chars = payload.chars().count() as u32;
        let estimate = chars.saturating_mul(3) / 4 + MIN_OUTPUT_TOKENS;
        estimate.clamp(MIN_OUTPUT_TOKENS, self.config.max_output_tokens.max(MIN_OUTPUT_TOKENS))
    }

    /// Run one prompt through the provider with retries
    async fn complete_with_retry(
        &self,
        system: &str,
        payload: &str,
    ) -> Result<String, TranslationError> {
        let attempts = self.config.max_retries.max(1);
        let ceiling = self.config.max_output_tokens.max(MIN_OUTPUT_TOKENS);
        let mut max_tokens = self.max_tokens_for(payload);
        let mut last_error = String::new();

        for attempt in 1..=attempts {
            match self.attempt(system, payload, max_tokens).await {
                Ok(text) => return Ok(text),
                Err(e) => {
                    warn!("Translation attempt {}/{} failed: {}", attempt, attempts, e);
                    if matches!(e, TranslationError::Truncated) {
                        max_tokens = max_tokens.saturating_mul(2).min(ceiling);
                        debug!("Raising output budget to {} tokens", max_tokens);
                    }
                    last_error = e.to_string();

                    if attempt < attempts {
                        let delay = self.config.retry_delay_ms.saturating_mul(attempt as u64);
                        tokio::time::sleep(Duration::from_millis(delay)).await;
                    }
                }
            }
        }

        Err(TranslationError::RetriesExhausted { attempts, last_error })
    }

    /// A single provider call and response extraction
    async fn attempt(
        &self,
        system: &str,
        payload: &str,
        max_tokens: u32,
    ) -> Result<String, TranslationError> {
        let request = ChatRequest::new(self.config.model.clone())
            .add_message("system", system)
            .add_message("user", payload)
            .temperature(self.config.temperature)
            .max_tokens(max_tokens);

        let start = Instant::now();
        let response = match self.provider.complete(request).await {
            Ok(response) => {
                self.usage.lock().record(response.usage.as_ref(), start.elapsed());
                response
            }
            Err(e) => {
                self.usage.lock().record(None, start.elapsed());
                return Err(e.into());
            }
        };

        if response.choices.is_empty() {
            return Err(TranslationError::EmptyResponse);
        }

        let content = P::extract_text(&response);
        if !content.trim().is_empty() {
            if response.is_truncated() {
                return Err(TranslationError::Truncated);
            }
            return Ok(clean_reply(&content));
        }

        match response.reasoning().filter(|r| !r.trim().is_empty()) {
            Some(reasoning_text) => match reasoning::extract_from_reasoning(reasoning_text, payload) {
                Some(found) => Ok(found),
                None if response.is_truncated() => Err(TranslationError::Truncated),
                None => Err(TranslationError::ExtractionFailure(
                    "no labeled, arrow-marked or quoted candidate".to_string(),
                )),
            },
            None if response.is_truncated() => Err(TranslationError::Truncated),
            None => Err(TranslationError::EmptyResponse),
        }
    }
}

#[async_trait]
impl<P> Translator for TranslationClient<P>
where
    P: Provider<Request = ChatRequest, Response = ChatResponse>,
{
    async fn translate(
        &self,
        kind: ContentKind,
        content: &str,
        target_language: &str,
    ) -> Result<String, TranslationError> {
        if content.trim().is_empty() {
            return Ok(content.to_string());
        }

        if let Some(cached) = self.cache.get(kind, content, target_language) {
            return Ok(cached);
        }

        let system = prompts::system_prompt(kind, &self.source_language, target_language);
        let reply = self.complete_with_retry(&system, content).await?;
        let translated = unwrap_fence(&reply, content);

        self.cache.store(kind, content, target_language, &translated);
        Ok(translated)
    }

    async fn troubleshoot(
        &self,
        payload: &str,
        target_language: &str,
        previous_error: &str,
    ) -> Result<String, TranslationError> {
        let system = prompts::troubleshoot_prompt(&self.source_language, target_language, previous_error);
        self.complete_with_retry(&system, payload).await
    }
}

/// Drop leading blank lines and trailing whitespace, keep leading indentation
fn clean_reply(reply: &str) -> String {
    reply
        .trim_end()
        .trim_start_matches(['\n', '\r'])
        .to_string()
}

/// Strip a code fence wrapped around the whole reply when the input had none
pub fn unwrap_fence(reply: &str, source: &str) -> String {
    let trimmed = reply.trim();
    if source.trim_start().starts_with("```")
        || !trimmed.starts_with("```")
        || !trimmed.ends_with("```")
        || trimmed.matches("```").count() != 2
    {
        return reply.to_string();
    }

    let inner = &trimmed[3..trimmed.len() - 3];
    // Opening line may carry a language tag
    let body = match inner.find('\n') {
        Some(idx) => &inner[idx + 1..],
        None => inner,
    };
    body.trim_end().to_string()
}
