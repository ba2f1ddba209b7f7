//! Technical debt estimate in hours.
//!
//! The hour weights are a flat placeholder policy kept stable so reports
//! stay comparable between runs.

use crate::core::{DebtCategory, HotSpot, QualityReport, TechnicalDebt};

pub const HOURS_PER_COMPLEXITY_POINT: f64 = 2.0;
pub const HOURS_PER_DOC_ISSUE: f64 = 1.5;
pub const TEST_HOURS_PER_COMPLEXITY_POINT: f64 = 1.5;
/// Hotspots described under Code Organization
pub const LISTED_HOTSPOTS: usize = 3;

pub const CODE_ORGANIZATION: &str = "Code Organization";
pub const DOCUMENTATION: &str = "Documentation";
pub const TESTING: &str = "Testing";

fn category(name: &str, hours: f64, issues: Vec<String>) -> DebtCategory {
    DebtCategory {
        name: name.to_string(),
        hours,
        percentage: 0,
        issues,
    }
}

/// Hours per category, then each category's share of the total.
pub fn estimate_debt(hotspots: &[HotSpot], quality: &QualityReport) -> TechnicalDebt {
    let complexity_sum: f64 = hotspots.iter().map(|h| f64::from(h.complexity)).sum();
    let mut categories = Vec::new();

    if !hotspots.is_empty() {
        let issues = hotspots
            .iter()
            .take(LISTED_HOTSPOTS)
            .map(|h| format!("Complex code in {} (complexity: {})", h.file, h.complexity))
            .collect();
        categories.push(category(
            CODE_ORGANIZATION,
            complexity_sum * HOURS_PER_COMPLEXITY_POINT,
            issues,
        ));
    }

    let doc_issues = quality.metrics.documentation_issues;
    if doc_issues > 0 {
        categories.push(category(
            DOCUMENTATION,
            doc_issues as f64 * HOURS_PER_DOC_ISSUE,
            vec!["Missing or incomplete documentation".to_string()],
        ));
    }

    categories.push(category(
        TESTING,
        complexity_sum * TEST_HOURS_PER_COMPLEXITY_POINT,
        vec!["Insufficient test coverage for complex code".to_string()],
    ));

    let total_hours: f64 = categories.iter().map(|c| c.hours).sum();
    if total_hours > 0.0 {
        for c in &mut categories {
            // halves go to the even neighbour: 82.5 -> 82, 7.5 -> 8
            c.percentage = (c.hours * 100.0 / total_hours).round_ties_even() as u32;
        }
    }

    TechnicalDebt {
        total_hours,
        categories,
    }
}
