/*!
 * Prompt construction for translation requests.
 *
 * Role-scoped instructions per content kind, plus the troubleshooting prompt
 * used as the last-resort fallback.
 */

pub mod templates;

pub use templates::{ContentKind, system_prompt, troubleshoot_prompt};
