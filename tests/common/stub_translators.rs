/*!
 * Stub translators for orchestrator tests
 *
 * None of these make network calls. They implement the `Translator` seam
 * directly so tests control exactly which calls fail.
 */

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use async_trait::async_trait;

use doctrans::errors::{ProviderError, TranslationError};
use doctrans::translation::{ContentKind, Translator};

fn api_failure(language: &str) -> TranslationError {
    TranslationError::RetriesExhausted {
        attempts: 3,
        last_error: ProviderError::ApiError {
            status_code: 503,
            message: format!("{} is overloaded", language),
        }
        .to_string(),
    }
}

/// Uppercases everything it is given
#[derive(Debug, Default)]
pub struct UppercaseTranslator;

#[async_trait]
impl Translator for UppercaseTranslator {
    async fn translate(&self, _kind: ContentKind, content: &str, _target_language: &str) -> Result<String, TranslationError> {
        Ok(content.to_uppercase())
    }

    async fn troubleshoot(&self, payload: &str, _target_language: &str, _previous_error: &str) -> Result<String, TranslationError> {
        Ok(payload.to_uppercase())
    }
}

/// Fails every call for the listed languages, uppercases for the others
#[derive(Debug, Default)]
pub struct FailingLanguageTranslator {
    failing: Vec<String>,
}

impl FailingLanguageTranslator {
    pub fn new(failing: &[&str]) -> Self {
        Self {
            failing: failing.iter().map(|l| l.to_string()).collect(),
        }
    }
}

#[async_trait]
impl Translator for FailingLanguageTranslator {
    async fn translate(&self, _kind: ContentKind, content: &str, target_language: &str) -> Result<String, TranslationError> {
        if self.failing.iter().any(|l| l == target_language) {
            return Err(api_failure(target_language));
        }
        Ok(content.to_uppercase())
    }

    async fn troubleshoot(&self, payload: &str, target_language: &str, _previous_error: &str) -> Result<String, TranslationError> {
        if self.failing.iter().any(|l| l == target_language) {
            return Err(api_failure(target_language));
        }
        Ok(payload.to_uppercase())
    }
}

/// Regular calls always fail; the troubleshooting call succeeds
#[derive(Debug, Default)]
pub struct TroubleshootOnlyTranslator {
    pub translate_calls: AtomicUsize,
    pub troubleshoot_calls: AtomicUsize,
    pub previous_errors: Mutex<Vec<String>>,
}

#[async_trait]
impl Translator for TroubleshootOnlyTranslator {
    async fn translate(&self, _kind: ContentKind, _content: &str, target_language: &str) -> Result<String, TranslationError> {
        self.translate_calls.fetch_add(1, Ordering::SeqCst);
        Err(api_failure(target_language))
    }

    async fn troubleshoot(&self, payload: &str, _target_language: &str, previous_error: &str) -> Result<String, TranslationError> {
        self.troubleshoot_calls.fetch_add(1, Ordering::SeqCst);
        self.previous_errors.lock().unwrap().push(previous_error.to_string());
        Ok(payload.to_uppercase())
    }
}

/// Records every payload and echoes it back
#[derive(Debug, Default)]
pub struct SpyTranslator {
    pub payloads: Mutex<Vec<(ContentKind, String)>>,
}

impl SpyTranslator {
    pub fn payloads(&self) -> Vec<(ContentKind, String)> {
        self.payloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl Translator for SpyTranslator {
    async fn translate(&self, kind: ContentKind, content: &str, _target_language: &str) -> Result<String, TranslationError> {
        self.payloads.lock().unwrap().push((kind, content.to_string()));
        Ok(content.to_string())
    }

    async fn troubleshoot(&self, payload: &str, _target_language: &str, _previous_error: &str) -> Result<String, TranslationError> {
        Ok(payload.to_string())
    }
}
