/*!
 * Structural validation scenarios and validate runs
 */

use anyhow::Result;

use doctrans::app_config::Config;
use doctrans::app_controller::Controller;
use doctrans::manifest::TaskManifest;
use doctrans::report::ValidationReport;
use doctrans::validation::{Severity, StructuralValidator, passed};

use crate::common::{self, WATERMARK_ARTICLE};

const TWO_BLOCKS: &str = "---\ntitle: \"Merge PDF\"\ndescription: Merge files\nproducts: pdf\n---\n\n## Merge\nCall merge.\n\n```java\nPdfMerger merger = new PdfMerger();\n```\n\nThen save.\n\n```java\nmerger.save(\"out.pdf\");\n```";

/// Test that a dropped code block gives exactly one error and fails the run
#[test]
fn test_validate_withDroppedCodeBlock_shouldReportOneError() {
    let target = TWO_BLOCKS.replace("\n\n```java\nmerger.save(\"out.pdf\");\n```", "");

    let findings = StructuralValidator::new().validate(TWO_BLOCKS, &target);
    let errors: Vec<_> = findings.iter().filter(|f| f.severity == Severity::Error).collect();

    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("Code block count mismatch"));

    let report = ValidationReport::from_findings(findings);
    assert!(!report.summary.validation_passed);
    assert_eq!(report.summary.total_errors, 1);
}

/// Test that an identical target yields no findings at all
#[test]
fn test_validate_withIdenticalTarget_shouldBeClean() {
    let validator = StructuralValidator::new();
    for article in [TWO_BLOCKS, WATERMARK_ARTICLE] {
        assert!(validator.validate(article, article).is_empty());
    }
}

/// Test that soft degradation passes with warnings
#[test]
fn test_validate_withChangedHeadingAndWeight_shouldOnlyWarn() {
    let target = WATERMARK_ARTICLE
        .replace("weight: 10", "weight: 11")
        .replace("## Step 1", "Schritt 1");

    let findings = StructuralValidator::new().validate(WATERMARK_ARTICLE, &target);

    assert_eq!(findings.len(), 2);
    assert!(findings.iter().all(|f| f.severity == Severity::Warning));
    assert!(passed(&findings));
}

/// Test that required front matter is checked on both sides of the pair
#[test]
fn test_validate_withoutDescriptionOrProducts_shouldFail() {
    let validator = StructuralValidator::new();

    let no_description = TWO_BLOCKS.replace("description: Merge files\n", "");
    let findings = validator.validate(&no_description, &no_description);
    assert_eq!(findings.len(), 2);
    assert!(findings.iter().all(|f| f.severity == Severity::Error && f.message.contains("'description'")));

    let no_products = TWO_BLOCKS.replace("products: pdf\n", "");
    let findings = validator.validate(TWO_BLOCKS, &no_products);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].severity, Severity::Error);
    assert!(findings[0].message.contains("'products' is missing in target"));
    assert!(!passed(&findings));
}

/// Test validating every output of a manifest, with one output missing
#[test]
fn test_validateManifest_withMissingOutput_shouldWarn() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    let task = common::create_task(root, "merge.md", TWO_BLOCKS, &["fr", "de"])?;
    common::create_test_file(root, "fr/pdf/java/merge.md", &TWO_BLOCKS.replace("Call merge.", "Appelez merge."))?;

    let mut config = Config::default();
    config.pipeline.content_root = root.to_path_buf();
    let controller = Controller::with_config(config)?;
    let manifest = TaskManifest {
        tasks: vec![task],
        ..serde_json::from_str("{}")?
    };

    let report = controller.validate_manifest(&manifest);

    assert_eq!(report.results.len(), 1);
    assert_eq!(report.results[0].language, "de");
    assert_eq!(report.results[0].severity, Severity::Warning);
    assert!(report.passed());
    Ok(())
}

/// Test validating a pair of files and writing the report
#[test]
fn test_validatePair_withReportPath_shouldWriteJson() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    let source = common::create_test_file(root, "en/pdf/java/merge.md", TWO_BLOCKS)?;
    let target = common::create_test_file(root, "fr/pdf/java/merge.md", &TWO_BLOCKS.replace("```java\nPdfMerger", "```java\n// PdfMerger"))?;
    let report_path = root.join("validation-report.json");

    let controller = Controller::with_config(Config::default())?;
    let report = controller.validate_pair(&source, &target, Some(&report_path))?;

    assert!(report.passed());
    assert_eq!(report.summary.total_warnings, 1);
    assert_eq!(report.results[0].language, "fr");

    let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&report_path)?)?;
    assert_eq!(json["summary"]["validationPassed"], true);
    assert_eq!(json["results"][0]["severity"], "warning");
    Ok(())
}

/// Test validating two mirrored directories
#[test]
fn test_validatePair_withDirectories_shouldPairFilesByRelativePath() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    common::create_test_file(root, "en/pdf/java/merge.md", TWO_BLOCKS)?;
    common::create_test_file(root, "en/pdf/java/watermark/add.md", WATERMARK_ARTICLE)?;
    common::create_test_file(root, "en/pdf/java/notes.txt", "not an article")?;
    let broken = TWO_BLOCKS.replace("\n\n```java\nmerger.save(\"out.pdf\");\n```", "");
    common::create_test_file(root, "ja/pdf/java/merge.md", &broken)?;

    let controller = Controller::with_config(Config::default())?;
    let report = controller.validate_pair(&root.join("en/pdf/java"), &root.join("ja/pdf/java"), None)?;

    assert!(!report.passed());
    assert_eq!(report.summary.total_errors, 1);
    assert_eq!(report.summary.total_warnings, 1);
    assert!(report.results.iter().all(|f| f.language == "ja"));
    assert!(report.results.iter().any(|f| f.article == "watermark/add.md" && f.severity == Severity::Warning));
    Ok(())
}
