/*!
 * Translation pipeline for markdown articles.
 *
 * - `orchestrator`: per-article, per-language driver with retries
 * - `troubleshoot`: marker-delimited last-resort fallback
 */

pub mod orchestrator;
pub mod troubleshoot;

// Re-export types used externally
pub use orchestrator::{ArticleTranslator, ProgressCallback, TranslationResult};
