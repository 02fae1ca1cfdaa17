//! Portfolio snapshot and allocation balance validation
//!
//! Global invariants enforced:
//! - The snapshot is computed once per batch and never mutated afterwards
//! - Validation is read-only and never blocks scoring
//! - Deterministic bucket ordering (declaration order of the enums)

use crate::criteria::{Engine, PortfolioCategory};
use crate::error::ScoringError;
use crate::Initiative;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Allowed deviation from a target share, in percentage points
pub const BALANCE_TOLERANCE_PCT: f64 = 2.0;

/// Target share of a category, in percent
pub fn category_target(category: PortfolioCategory) -> f64 {
    match category {
        PortfolioCategory::CoreIncremental => 60.0,
        PortfolioCategory::CoreDisruptive => 15.0,
        PortfolioCategory::NonCoreIncremental => 15.0,
        PortfolioCategory::NonCoreDisruptive => 10.0,
    }
}

/// Target share of an engine, in percent
pub fn engine_target(engine: Engine) -> f64 {
    match engine {
        Engine::E1SustainGrow => 60.0,
        Engine::E2ExpandInorganically => 25.0,
        Engine::E3BaseOilIntegration => 15.0,
    }
}

/// Read-only aggregate view of the whole initiative collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortfolioSnapshot {
    total: usize,
    /// Engine counts where a missing alignment counts as E1
    balance_engines: BTreeMap<Engine, usize>,
    /// Engine counts of explicitly declared alignments only
    declared_engines: BTreeMap<Engine, usize>,
    categories: BTreeMap<PortfolioCategory, usize>,
}

impl PortfolioSnapshot {
    /// Count engines and categories across the collection
    ///
    /// Fails with [`ScoringError::InvalidInput`] on an empty collection,
    /// since every share computed from it would divide by zero.
    pub fn new(initiatives: &[Initiative]) -> Result<Self, ScoringError> {
        if initiatives.is_empty() {
            return Err(ScoringError::InvalidInput(
                "portfolio snapshot requires at least one initiative".to_string(),
            ));
        }

        let mut balance_engines = BTreeMap::new();
        let mut declared_engines = BTreeMap::new();
        let mut categories = BTreeMap::new();

        for initiative in initiatives {
            let criteria = &initiative.criteria_values;
            if let Some(engine) = criteria.balance_engine() {
                *balance_engines.entry(engine).or_insert(0) += 1;
            }
            if let Some(engine) = criteria.declared_engine() {
                *declared_engines.entry(engine).or_insert(0) += 1;
            }
            if let Some(category) = criteria.portfolio_category() {
                *categories.entry(category).or_insert(0) += 1;
            }
        }

        Ok(PortfolioSnapshot {
            total: initiatives.len(),
            balance_engines,
            declared_engines,
            categories,
        })
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Fraction (0..=1) of initiatives on `engine`, for the D6 balance score
    pub fn engine_share(&self, engine: Engine) -> f64 {
        count(&self.balance_engines, engine) as f64 / self.total as f64
    }

    pub fn declared_engine_count(&self, engine: Engine) -> usize {
        count(&self.declared_engines, engine)
    }

    pub fn category_count(&self, category: PortfolioCategory) -> usize {
        count(&self.categories, category)
    }

    fn percent(&self, n: usize) -> f64 {
        n as f64 * 100.0 / self.total as f64
    }
}

fn count<K: Ord>(map: &BTreeMap<K, usize>, key: K) -> usize {
    map.get(&key).copied().unwrap_or(0)
}

/// Status of a single allocation bucket
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct BucketStatus {
    pub bucket: String,
    pub count: usize,
    pub actual: f64,
    pub target: f64,
    pub min: f64,
    pub max: f64,
    pub in_range: bool,
}

impl BucketStatus {
    fn new(bucket: &str, count: usize, actual: f64, target: f64) -> Self {
        let min = target - BALANCE_TOLERANCE_PCT;
        let max = target + BALANCE_TOLERANCE_PCT;
        BucketStatus {
            bucket: bucket.to_string(),
            count,
            actual,
            target,
            min,
            max,
            in_range: actual >= min && actual <= max,
        }
    }
}

/// Category and engine distribution against target bands
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct BalanceReport {
    pub total: usize,
    pub category: Vec<BucketStatus>,
    pub engine: Vec<BucketStatus>,
}

impl BalanceReport {
    pub fn is_balanced(&self) -> bool {
        self.out_of_range().next().is_none()
    }

    pub fn out_of_range(&self) -> impl Iterator<Item = &BucketStatus> {
        self.category
            .iter()
            .chain(self.engine.iter())
            .filter(|b| !b.in_range)
    }

    pub fn bucket(&self, name: &str) -> Option<&BucketStatus> {
        self.category
            .iter()
            .chain(self.engine.iter())
            .find(|b| b.bucket == name)
    }
}

/// Compare the snapshot's distribution to the target allocation bands
pub fn validate_balance(snapshot: &PortfolioSnapshot) -> BalanceReport {
    let category = PortfolioCategory::ALL
        .into_iter()
        .map(|c| {
            let n = snapshot.category_count(c);
            BucketStatus::new(c.as_str(), n, snapshot.percent(n), category_target(c))
        })
        .collect();

    let engine = Engine::ALL
        .into_iter()
        .map(|e| {
            let n = snapshot.declared_engine_count(e);
            BucketStatus::new(e.as_str(), n, snapshot.percent(n), engine_target(e))
        })
        .collect();

    let report = BalanceReport {
        total: snapshot.total(),
        category,
        engine,
    };
    tracing::debug!(
        total = report.total,
        out_of_range = report.out_of_range().count(),
        "validated portfolio balance"
    );
    report
}

/// Build a snapshot and validate it in one step
pub fn validate_portfolio_balance(
    initiatives: &[Initiative],
) -> Result<BalanceReport, ScoringError> {
    Ok(validate_balance(&PortfolioSnapshot::new(initiatives)?))
}

/// Render a balance report as aligned text
pub fn render_balance_text(report: &BalanceReport) -> String {
    let mut output = String::new();
    output.push_str(&format!("Portfolio balance ({} initiatives)\n", report.total));

    for (title, buckets) in [("Category", &report.category), ("Engine", &report.engine)] {
        output.push('\n');
        output.push_str(&format!(
            "{:<26} {:>6} {:>8} {:>8} {:>13} {}\n",
            title.to_uppercase(),
            "COUNT",
            "ACTUAL",
            "TARGET",
            "BAND",
            "STATUS"
        ));
        for b in buckets.iter() {
            output.push_str(&format!(
                "{:<26} {:>6} {:>7.1}% {:>7.1}% {:>5.0}%-{:>4.0}%  {}\n",
                b.bucket,
                b.count,
                b.actual,
                b.target,
                b.min,
                b.max,
                if b.in_range { "ok" } else { "OUT OF RANGE" }
            ));
        }
    }
    output
}
