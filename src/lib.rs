/*!
 * # doctrans
 *
 * Translates documentation-site markdown articles into many languages with an
 * LLM and validates the structural fidelity of the results.
 *
 * ## Features
 *
 * - Front matter and body segmentation with code, gist and shortcode passthrough
 * - Placeholder protection of code, directives and URLs around every call
 * - OpenAI-compatible chat completions client with retries and a reasoning-field fallback
 * - Per-language retries with exponential backoff and a troubleshooting fallback
 * - Structural validation of translated articles against their source
 *
 * ## Architecture
 *
 * - `app_config`: Configuration management
 * - `document`: Markdown document model, patterns and segmenter
 * - `translation`: Placeholders, prompts, client and the article pipeline
 * - `validation`: Structural comparison of source and target articles
 * - `manifest`: Task manifest model
 * - `report`: Processing and validation reports
 * - `file_utils`: File system operations
 * - `app_controller`: Translate and validate runs
 * - `language_utils`: Supported target languages
 * - `providers`: Chat completions clients
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod document;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod manifest;
pub mod providers;
pub mod report;
pub mod translation;
pub mod validation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use document::{Document, Segment, SegmentKind};
pub use errors::{AppError, DocumentError, ProviderError, TranslationError};
pub use manifest::{Article, Platform, TaskManifest, TranslationTask};
pub use report::{ProcessingReport, ValidationReport};
pub use translation::{ArticleTranslator, TranslationClient, TranslationResult, Translator};
pub use validation::{Severity, StructuralValidator, ValidationFinding};
