/*!
 * Front-matter checks for translated articles.
 */

use crate::app_config::ValidationConfig;
use crate::document::FrontMatter;
use super::service::Severity;

/// Which article of the pair an issue was found in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Source,
    Target,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Source => write!(f, "source"),
            Side::Target => write!(f, "target"),
        }
    }
}

/// Types of front-matter issues
#[derive(Debug, Clone, PartialEq)]
pub enum FrontMatterIssue {
    /// A required field is missing or empty on one side
    MissingRequiredField {
        field: String,
        side: Side,
    },
    /// No product identifier at all on one side
    MissingProductIdentifier {
        side: Side,
    },
    /// A technical field differs from the source
    TechnicalFieldChanged {
        field: String,
        source: String,
        target: Option<String>,
    },
}

impl FrontMatterIssue {
    /// Severity of the issue
    pub fn severity(&self) -> Severity {
        match self {
            Self::MissingRequiredField { .. } | Self::MissingProductIdentifier { .. } => Severity::Error,
            Self::TechnicalFieldChanged { .. } => Severity::Warning,
        }
    }

    /// Human-readable description
    pub fn message(&self) -> String {
        match self {
            Self::MissingRequiredField { field, side } => {
                format!("Required front-matter field '{}' is missing in {}", field, side)
            }
            Self::MissingProductIdentifier { side } => {
                format!("No product identifier in {} front matter", side)
            }
            Self::TechnicalFieldChanged { field, source, target: Some(target) } => format!(
                "Technical front-matter field '{}' changed: '{}' -> '{}'",
                field, source, target
            ),
            Self::TechnicalFieldChanged { field, target: None, .. } => {
                format!("Technical front-matter field '{}' is missing in target", field)
            }
        }
    }
}

fn has_value(view: &FrontMatter, field: &str) -> bool {
    view.raw(field)
        .is_some_and(|raw| !raw.trim().is_empty() && raw.trim() != "\"\"")
}

/// Compare two front-matter blocks
///
/// Required fields must carry a value on both sides. At least one product
/// identifier must exist on both sides, and every identifier of the source
/// must survive in the target.
pub fn check_front_matter(source: &str, target: &str, config: &ValidationConfig) -> Vec<FrontMatterIssue> {
    let source_view = FrontMatter::parse(source);
    let target_view = FrontMatter::parse(target);
    let mut issues = Vec::new();

    for field in &config.required_fields {
        for (side, view) in [(Side::Source, &source_view), (Side::Target, &target_view)] {
            if !has_value(view, field) {
                issues.push(FrontMatterIssue::MissingRequiredField { field: field.clone(), side });
            }
        }
    }

    if !config.product_fields.is_empty() {
        let source_products: Vec<&String> = config
            .product_fields
            .iter()
            .filter(|field| has_value(&source_view, field))
            .collect();
        if source_products.is_empty() {
            issues.push(FrontMatterIssue::MissingProductIdentifier { side: Side::Source });
        }
        if !config.product_fields.iter().any(|field| has_value(&target_view, field)) {
            issues.push(FrontMatterIssue::MissingProductIdentifier { side: Side::Target });
        } else {
            for field in source_products {
                if !has_value(&target_view, field) {
                    issues.push(FrontMatterIssue::MissingRequiredField { field: field.clone(), side: Side::Target });
                }
            }
        }
    }

    for field in &config.technical_fields {
        let Some(source_raw) = source_view.raw(field) else {
            continue;
        };
        let target_raw = target_view.raw(field);
        // Absence of a product identifier is already an error
        if target_raw.is_none() && config.product_fields.contains(field) {
            continue;
        }
        if target_raw != Some(source_raw) {
            issues.push(FrontMatterIssue::TechnicalFieldChanged {
                field: field.clone(),
                source: source_raw.to_string(),
                target: target_raw.map(str::to_string),
            });
        }
    }

    issues
}
