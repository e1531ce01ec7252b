/*!
 * Tests for the segmenter and the placeholder protector
 */

use doctrans::document::patterns::{count_headings, count_list_items, extract_code_blocks};
use doctrans::document::{parse, SegmentKind};
use doctrans::errors::DocumentError;
use doctrans::translation::PlaceholderProtector;
use crate::common::WATERMARK_ARTICLE;

const SAMPLES: &[&str] = &[
    "Use `Document.save()` and read https://docs.example.com/pdf/java/.",
    "Embed {{< gist aspose 42 >}} then {{% alert %}}note{{% /alert %}} and {{ .Title }}.",
    "Before\n```csharp\nvar doc = new Document(\"a.pdf\");\n```\nAfter `x` at http://a.b/c?d=1",
    "No protected spans at all.",
    "Link [docs](https://example.com/a_b) and `inline` and ```\nunterminated",
];

/// Test that extraction followed by restoration gives back the exact input
#[test]
fn test_placeholderRoundTrip_withSampleTexts_shouldReproduceInput() {
    for sample in SAMPLES {
        let protected = PlaceholderProtector::extract(sample);
        assert_eq!(PlaceholderProtector::restore(&protected.text, &protected.map), *sample);
    }
}

/// Test that protected text carries no code, shortcodes or URLs
#[test]
fn test_extract_withWatermarkArticle_shouldHideEveryProtectedSpan() {
    let protected = PlaceholderProtector::extract(WATERMARK_ARTICLE);

    assert!(!protected.text.contains("{{<"));
    assert!(!protected.text.contains("new Watermark"));
    assert!(!protected.text.contains("https://"));
    assert!(!protected.text.contains("`Document`"));
    assert!(protected.map.missing_in(&protected.text).is_empty());
}

/// Test that reassembling a parsed article keeps its structure counts
#[test]
fn test_parse_thenToMarkdown_shouldKeepStructureCounts() {
    let document = parse(WATERMARK_ARTICLE).unwrap();
    let rendered = document.to_markdown();

    assert_eq!(count_headings(&rendered), count_headings(WATERMARK_ARTICLE));
    assert_eq!(extract_code_blocks(&rendered), extract_code_blocks(WATERMARK_ARTICLE));
    assert_eq!(count_list_items(&rendered), count_list_items(WATERMARK_ARTICLE));
}

/// Test the segment kinds of the sample article
#[test]
fn test_parse_withWatermarkArticle_shouldTypeEverySegment() {
    let document = parse(WATERMARK_ARTICLE).unwrap();
    let kinds: Vec<SegmentKind> = document.sections.iter().map(|s| s.kind).collect();

    assert_eq!(
        kinds,
        vec![SegmentKind::Heading, SegmentKind::ShortcodeRef, SegmentKind::Code, SegmentKind::List]
    );
    assert_eq!(document.translatable_sections().count(), 2);
    assert_eq!(document.front_matter_view().get("title"), Some("Add Watermark to PDF"));
}

/// Test that a body without front matter is rejected
#[test]
fn test_parse_withoutFrontMatter_shouldBeMalformed() {
    let result = parse("## Heading\nBody only");
    assert!(matches!(result, Err(DocumentError::MalformedDocument(_))));
}
