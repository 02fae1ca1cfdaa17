//! Dossier core library - six-dimension initiative scoring, quadrant/tier
//! classification and portfolio balance validation

#![deny(warnings)]

// Global invariants enforced in this crate:
// - Every dimension score is an integer in [0, 100]
// - Composite and final scores are non-negative and rounded to one decimal
// - Scores, quadrant and tier are always assigned together
// - The portfolio snapshot is built once per batch and only read afterwards
// - Malformed criteria degrade to defaults and never fail scoring
// - Identical input yields byte-for-byte identical output

pub mod catalogue;
pub mod classify;
pub mod composite;
pub mod config;
pub mod criteria;
pub mod dimensions;
pub mod error;
pub mod numeric;
pub mod portfolio;
pub mod report;

pub use classify::{Quadrant, Tier};
pub use composite::{QuadrantModifiers, Scenario, ScoringWeights};
pub use config::ResolvedConfig;
pub use criteria::CriteriaValues;
pub use dimensions::DimensionScores;
pub use error::ScoringError;
pub use portfolio::{BalanceReport, PortfolioSnapshot};
pub use report::{rank_reports, render_json, render_text, Evaluation, InitiativeReport};

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A single portfolio initiative and, once scored, its evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Initiative {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, alias = "criteriaValues")]
    pub criteria_values: CriteriaValues,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<Evaluation>,
}

impl Initiative {
    pub fn new(id: impl Into<String>, criteria_values: CriteriaValues) -> Self {
        Initiative {
            id: id.into(),
            name: None,
            criteria_values,
            evaluation: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Weights and modifiers used for one scoring run
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoringSettings {
    pub scenario: Scenario,
    pub weights: ScoringWeights,
    pub quadrant_modifiers: QuadrantModifiers,
}

impl ScoringSettings {
    /// Scenario weights with the default quadrant modifiers
    pub fn for_scenario(scenario: Scenario) -> Self {
        ScoringSettings {
            scenario,
            weights: scenario.weights(),
            quadrant_modifiers: QuadrantModifiers::default(),
        }
    }

    /// Build settings from custom weights, rejecting vectors that do not sum to 1.0
    pub fn new(
        scenario: Scenario,
        weights: ScoringWeights,
        quadrant_modifiers: QuadrantModifiers,
    ) -> Result<Self, ScoringError> {
        weights.validate()?;
        Ok(ScoringSettings {
            scenario,
            weights,
            quadrant_modifiers,
        })
    }
}

pub struct ReportOptions {
    pub min_final_score: Option<f64>,
    pub top_n: Option<usize>,
}

/// Evaluate one initiative's criteria against a portfolio snapshot
pub fn evaluate_initiative(
    criteria: &CriteriaValues,
    snapshot: &PortfolioSnapshot,
    settings: &ScoringSettings,
) -> Evaluation {
    let scores = dimensions::score_dimensions(criteria, snapshot);
    let composite = composite::composite_score(&scores, &settings.weights);
    let quadrant = classify::assign_quadrant(scores.d1, scores.d2);
    let final_score = composite::final_score(composite, quadrant, &settings.quadrant_modifiers);
    let tier = classify::tier_for(criteria, final_score);

    Evaluation {
        scores,
        composite_score: composite,
        final_score,
        quadrant,
        tier,
        critical_dependencies: criteria.critical_dependency_count(),
    }
}

/// Score every initiative and store the evaluation on it
///
/// Fails only when the collection is empty.
pub fn score_in_place(
    initiatives: &mut [Initiative],
    settings: &ScoringSettings,
) -> Result<(), ScoringError> {
    let snapshot = PortfolioSnapshot::new(initiatives)?;
    initiatives.par_iter_mut().for_each(|initiative| {
        initiative.evaluation = Some(evaluate_initiative(
            &initiative.criteria_values,
            &snapshot,
            settings,
        ));
    });
    Ok(())
}

/// Score a batch and return ranked, filtered reports
pub fn score_portfolio(
    initiatives: &[Initiative],
    settings: &ScoringSettings,
    options: ReportOptions,
) -> Result<Vec<InitiativeReport>, ScoringError> {
    let snapshot = PortfolioSnapshot::new(initiatives)?;

    let reports: Vec<InitiativeReport> = initiatives
        .par_iter()
        .map(|initiative| {
            let criteria = &initiative.criteria_values;
            let evaluation = evaluate_initiative(criteria, &snapshot, settings);
            let missing = catalogue::missing_required(criteria)
                .into_iter()
                .map(str::to_string)
                .collect();
            InitiativeReport::new(initiative, evaluation, missing)
        })
        .collect();

    let incomplete = reports
        .iter()
        .filter(|r| !r.missing_criteria.is_empty())
        .count();
    if incomplete > 0 {
        tracing::warn!(
            incomplete,
            total = reports.len(),
            "initiatives missing required criteria were scored with defaults"
        );
    }
    tracing::info!(
        initiatives = reports.len(),
        scenario = %settings.scenario,
        "scored portfolio"
    );

    let ranked = rank_reports(reports);

    // Apply min_final_score filter if specified
    let filtered: Vec<InitiativeReport> = match options.min_final_score {
        Some(min) => ranked
            .into_iter()
            .filter(|r| r.evaluation.final_score >= min)
            .collect(),
        None => ranked,
    };

    // Apply top_n filter if specified
    let final_reports = if let Some(top_n) = options.top_n {
        filtered.into_iter().take(top_n).collect()
    } else {
        filtered
    };

    Ok(final_reports)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BatchDocument {
    List(Vec<Initiative>),
    Wrapped { initiatives: Vec<Initiative> },
}

/// Parse a batch document: an array of initiatives or `{"initiatives": [...]}`
pub fn parse_initiatives(json: &str) -> Result<Vec<Initiative>> {
    let doc: BatchDocument = serde_json::from_str(json)
        .context("expected an array of initiatives or an object with an \"initiatives\" array")?;
    Ok(match doc {
        BatchDocument::List(list) => list,
        BatchDocument::Wrapped { initiatives } => initiatives,
    })
}

/// Load a batch document from disk
pub fn load_initiatives(path: &Path) -> Result<Vec<Initiative>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read initiatives file: {}", path.display()))?;
    let initiatives = parse_initiatives(&content)
        .with_context(|| format!("failed to parse initiatives file: {}", path.display()))?;
    tracing::debug!(path = %path.display(), count = initiatives.len(), "loaded initiatives");
    Ok(initiatives)
}
