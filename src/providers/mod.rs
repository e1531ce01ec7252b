/*!
 * Provider implementations for the translation backend.
 *
 * - OpenAI: any OpenAI-compatible chat completions endpoint
 * - Mock: scripted provider used by tests and benchmarks
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Common trait for all LLM providers
///
/// The translation client only depends on this trait, so a provider can be
/// swapped for a scripted one without touching the retry or extraction logic.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// The request type for this provider
    type Request: Send + Sync;

    /// The response type for this provider
    type Response: Send + Sync;

    /// Complete a request using this provider
    ///
    /// # Arguments
    /// * `request` - The request to complete
    ///
    /// # Returns
    /// * `Result<Self::Response, ProviderError>` - The response from the provider or an error
    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError>;

    /// Test the connection to the provider
    async fn test_connection(&self) -> Result<(), ProviderError>;

    /// Extract the primary text from the provider response
    fn extract_text(response: &Self::Response) -> String;
}

pub mod openai;
pub mod mock;
