/*!
 * Tests for the translation client over the mock provider
 */

use doctrans::app_config::TranslationConfig;
use doctrans::errors::{ProviderError, TranslationError};
use doctrans::providers::mock::{MockBehavior, MockProvider};
use doctrans::providers::openai::ChatResponse;
use doctrans::translation::{ContentKind, TranslationClient, Translator};

fn test_config() -> TranslationConfig {
    TranslationConfig {
        max_retries: 3,
        retry_delay_ms: 0,
        ..TranslationConfig::default()
    }
}

/// Test that usage from every response is accumulated
#[tokio::test]
async fn test_translate_withUsage_shouldAccumulateTokenStats() {
    let provider = MockProvider::scripted(vec![
        Ok(ChatResponse::with_content("Ajouter un filigrane").usage(40, 10)),
        Ok(ChatResponse::with_content("Tamponner chaque page").usage(30, 12)),
    ]);
    let client = TranslationClient::new(provider, test_config(), "en");

    client.translate(ContentKind::FrontMatterField, "Add Watermark", "fr").await.unwrap();
    client.translate(ContentKind::FrontMatterField, "Stamp every page", "fr").await.unwrap();

    let usage = client.usage();
    assert_eq!(usage.requests, 2);
    assert_eq!(usage.prompt_tokens, 70);
    assert_eq!(usage.completion_tokens, 22);
    assert_eq!(usage.total_tokens, 92);
    assert!(usage.summary().contains("92"));
}

/// Test that the same text in another language is not served from the cache
#[tokio::test]
async fn test_translate_withDifferentLanguages_shouldCallProviderForEach() {
    let provider = MockProvider::uppercase();
    let client = TranslationClient::new(provider.clone(), test_config(), "en");

    let fr = client.translate(ContentKind::Heading, "## Install", "fr").await.unwrap();
    let de = client.translate(ContentKind::Heading, "## Install", "de").await.unwrap();
    let fr_again = client.translate(ContentKind::Heading, "## Install", "fr").await.unwrap();

    assert_eq!(fr, "## INSTALL");
    assert_eq!(de, fr);
    assert_eq!(fr_again, fr);
    assert_eq!(provider.request_count(), 2);
}

/// Test that troubleshooting replies bypass the cache and embed the previous error
#[tokio::test]
async fn test_troubleshoot_calledTwice_shouldReachProviderTwice() {
    let provider = MockProvider::echo();
    let client = TranslationClient::new(provider.clone(), test_config(), "en");
    let payload = "=== FRONTMATTER ===\ntitle: Add Watermark\n=== END ===";

    client.troubleshoot(payload, "hy", "Provider error: timeout").await.unwrap();
    client.troubleshoot(payload, "hy", "Provider error: timeout").await.unwrap();

    assert_eq!(provider.request_count(), 2);
    let system = provider.recorded_requests()[0].message_for("system").unwrap_or_default().to_string();
    assert!(system.contains("Provider error: timeout"));
}

/// Test that an empty reply is never accepted as a translation
#[tokio::test]
async fn test_translate_withEmptyReplies_shouldExhaustRetries() {
    let client = TranslationClient::new(MockProvider::empty(), test_config(), "en");

    let result = client.translate(ContentKind::Paragraph, "Do X.", "fr").await;

    match result {
        Err(TranslationError::RetriesExhausted { attempts, .. }) => assert_eq!(attempts, 3),
        other => panic!("expected exhausted retries, got {:?}", other),
    }
    assert!(client.cache().is_empty());
}

/// Test the connection check against the provider
#[tokio::test]
async fn test_testConnection_withFailingProvider_shouldReturnProviderError() {
    let client = TranslationClient::new(MockProvider::failing(), test_config(), "en");
    let result = client.test_connection().await;
    assert!(matches!(result, Err(TranslationError::Provider(ProviderError::ConnectionError(_)))));

    let client = TranslationClient::new(MockProvider::echo(), test_config(), "en");
    assert!(client.test_connection().await.is_ok());
}

/// Test the client from synchronous code
#[test]
fn test_translate_fromBlockingContext_shouldUseReasoningFallback() {
    let client = TranslationClient::new(MockProvider::new(MockBehavior::ReasoningOnly), test_config(), "en");

    let translated = tokio_test::block_on(client.translate(ContentKind::Paragraph, "Save the file.", "fr"));

    tokio_test::assert_ok!(&translated);
    assert_eq!(translated.unwrap(), "SAVE THE FILE.");
}
