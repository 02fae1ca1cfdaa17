//! Reporting and output generation
//!
//! Global invariants enforced:
//! - Deterministic ranking (ties broken by composite score, then id)
//! - Byte-for-byte identical output across runs

use crate::classify::{Quadrant, Tier};
use crate::dimensions::DimensionScores;
use crate::Initiative;
use serde::{Deserialize, Serialize};

/// Everything the engine derives for one initiative
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Evaluation {
    #[serde(flatten)]
    pub scores: DimensionScores,
    pub composite_score: f64,
    pub final_score: f64,
    pub quadrant: Quadrant,
    pub tier: Tier,
    pub critical_dependencies: usize,
}

/// Ranked evaluation of an initiative
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct InitiativeReport {
    pub rank: usize,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub evaluation: Evaluation,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub missing_criteria: Vec<String>,
}

impl InitiativeReport {
    /// Create an unranked report; ranks are assigned by [`rank_reports`]
    pub fn new(
        initiative: &Initiative,
        evaluation: Evaluation,
        missing_criteria: Vec<String>,
    ) -> Self {
        InitiativeReport {
            rank: 0,
            id: initiative.id.clone(),
            name: initiative.name.clone(),
            evaluation,
            missing_criteria,
        }
    }
}

/// Sort reports deterministically and assign 1-based ranks
pub fn rank_reports(mut reports: Vec<InitiativeReport>) -> Vec<InitiativeReport> {
    reports.sort_by(|a, b| {
        // 1. Final score descending
        b.evaluation
            .final_score
            .partial_cmp(&a.evaluation.final_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            // 2. Composite score descending
            .then_with(|| {
                b.evaluation
                    .composite_score
                    .partial_cmp(&a.evaluation.composite_score)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            // 3. Id ascending
            .then_with(|| a.id.cmp(&b.id))
    });
    for (i, report) in reports.iter_mut().enumerate() {
        report.rank = i + 1;
    }
    reports
}

/// Render reports as text output
pub fn render_text(reports: &[InitiativeReport]) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{:<5} {:<12} {:>6} {:>6} {:>4} {:>4} {:>4} {:>4} {:>4} {:>4} {:<17} {:<11} {}\n",
        "RANK",
        "ID",
        "FINAL",
        "COMP",
        "D1",
        "D2",
        "D3",
        "D4",
        "D5",
        "D6",
        "QUADRANT",
        "TIER",
        "NAME"
    ));

    for report in reports {
        let e = &report.evaluation;
        let name = report.name.as_deref().unwrap_or("-");
        output.push_str(&format!(
            "{:<5} {:<12} {:>6.1} {:>6.1} {:>4} {:>4} {:>4} {:>4} {:>4} {:>4} {:<17} {:<11} {}\n",
            report.rank,
            truncate_or_pad(&report.id, 12),
            e.final_score,
            e.composite_score,
            e.scores.d1,
            e.scores.d2,
            e.scores.d3,
            e.scores.d4,
            e.scores.d5,
            e.scores.d6,
            e.quadrant.as_str(),
            e.tier.as_str(),
            name
        ));
    }

    output
}

/// Render reports as JSON output
pub fn render_json(reports: &[InitiativeReport]) -> String {
    serde_json::to_string_pretty(reports).unwrap_or_else(|_| "[]".to_string())
}

/// Truncate or pad string to fixed width
fn truncate_or_pad(s: &str, width: usize) -> String {
    if s.chars().count() > width {
        let kept: String = s.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        format!("{:<width$}", s, width = width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::CriteriaValues;

    fn report(id: &str, composite: f64, final_score: f64) -> InitiativeReport {
        let evaluation = Evaluation {
            scores: DimensionScores::default(),
            composite_score: composite,
            final_score,
            quadrant: Quadrant::Moonshot,
            tier: Tier::Contingent,
            critical_dependencies: 0,
        };
        InitiativeReport::new(&Initiative::new(id, CriteriaValues::new()), evaluation, Vec::new())
    }

    #[test]
    fn test_rank_by_final_then_composite_then_id() {
        let ranked = rank_reports(vec![
            report("PET-003", 70.0, 60.0),
            report("PET-002", 72.0, 61.2),
            report("PET-004", 71.0, 60.0),
            report("PET-001", 70.0, 60.0),
        ]);
        let order: Vec<(&str, usize)> = ranked.iter().map(|r| (r.id.as_str(), r.rank)).collect();
        assert_eq!(
            order,
            vec![("PET-002", 1), ("PET-004", 2), ("PET-001", 3), ("PET-003", 4)]
        );
    }

    #[test]
    fn test_json_flattens_evaluation() {
        let reports = rank_reports(vec![report("PET-001", 64.0, 54.4)]);
        let value: serde_json::Value = serde_json::from_str(&render_json(&reports)).unwrap();
        let first = &value[0];
        assert_eq!(first["rank"], 1);
        assert_eq!(first["d1"], 0);
        assert_eq!(first["final_score"], 54.4);
        assert_eq!(first["quadrant"], "moonshot");
        assert_eq!(first["tier"], "contingent");
        assert!(first.get("name").is_none());
        assert!(first.get("missing_criteria").is_none());
    }

    #[test]
    fn test_render_text_has_header_and_rows() {
        let reports = rank_reports(vec![report("PET-001", 64.0, 54.4)]);
        let text = render_text(&reports);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("RANK"));
        assert!(lines[1].contains("54.4"));
        assert!(lines[1].contains("moonshot"));
    }

    #[test]
    fn test_truncate_or_pad() {
        assert_eq!(truncate_or_pad("PET-1", 8), "PET-1   ");
        assert_eq!(truncate_or_pad("INITIATIVE-LONG-ID", 12), "INITIATIV...");
    }
}
