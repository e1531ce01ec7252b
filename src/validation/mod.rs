/*!
 * Structural validation of translated articles.
 *
 * - `structure`: gist, code block, heading, URL and technical term checks
 * - `frontmatter`: required and technical front-matter field checks
 * - `service`: the validator and its findings
 */

pub mod frontmatter;
pub mod service;
pub mod structure;

// Re-export main types
pub use service::{Severity, StructuralValidator, ValidationFinding, passed};
