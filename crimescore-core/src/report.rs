//! District risk report rendering
//!
//! Turns a trained year's labels and scores into consumer-facing rows for
//! map-coloring code and seed scripts.
//!
//! Global invariants enforced:
//! - Deterministic ordering (score ascending, then district id)
//! - Rendering never mutates engine state

use serde::{Deserialize, Serialize};

use crate::labels::RiskLevel;

/// One district's risk tier and security score for a trained year
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct DistrictRiskReport {
    pub district_id: String,
    pub year: i32,
    pub level: RiskLevel,
    /// 0-100, higher is safer
    pub score: u8,
}

/// Sort reports deterministically: least safe first, ties broken by id.
pub fn sort_reports(mut reports: Vec<DistrictRiskReport>) -> Vec<DistrictRiskReport> {
    reports.sort_by(|a, b| {
        a.score
            .cmp(&b.score)
            .then_with(|| a.district_id.cmp(&b.district_id))
    });
    reports
}

/// Render reports as text output
pub fn render_text(reports: &[DistrictRiskReport]) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "{:<8} {:<8} {:<20}\n",
        "SCORE", "LEVEL", "DISTRICT"
    ));
    for report in reports {
        output.push_str(&format!(
            "{:<8} {:<8} {:<20}\n",
            report.score,
            report.level.as_str(),
            report.district_id,
        ));
    }
    output
}

/// Render reports as JSON output
pub fn render_json(reports: &[DistrictRiskReport]) -> String {
    serde_json::to_string_pretty(reports).unwrap_or_else(|_| "[]".to_string())
}
