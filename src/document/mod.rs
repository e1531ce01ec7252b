/*!
 * Document modeling for markdown articles.
 *
 * - `patterns`: line classification and the regexes shared with validation
 * - `segmenter`: front-matter split and body segmentation
 * - `frontmatter`: key-value view and in-place field replacement
 * - `model`: Document and Segment types
 */

pub mod frontmatter;
pub mod model;
pub mod patterns;
pub mod segmenter;

// Re-export types used by other modules
pub use frontmatter::{FieldUpdates, FrontMatter};
pub use model::{Document, Segment, SegmentKind};
pub use segmenter::parse;
