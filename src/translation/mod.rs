/*!
 * Translation of markdown articles using an LLM provider.
 *
 * - `placeholders`: protection of code, directives and URLs around each call
 * - `prompts`: role-scoped instruction templates
 * - `reasoning`: fallback decoder for reasoning-only replies
 * - `cache`: per-run memo of successful translations
 * - `client`: the translation client and the `Translator` trait
 * - `pipeline`: the article orchestrator and troubleshooting fallback
 */

// Re-export main types for easier usage
pub use self::client::{TokenUsageStats, TranslationClient, Translator};
pub use self::pipeline::{ArticleTranslator, TranslationResult};
pub use self::placeholders::{PlaceholderMap, PlaceholderProtector, ProtectedText};
pub use self::prompts::ContentKind;

// Submodules
pub mod cache;
pub mod client;
pub mod pipeline;
pub mod placeholders;
pub mod prompts;
pub mod reasoning;
