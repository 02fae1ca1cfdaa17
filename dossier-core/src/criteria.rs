//! Typed, lenient view over an initiative's criteria values
//!
//! Criteria arrive as a free-form JSON map keyed by criterion name. The
//! engine only reads a handful of keys; every accessor here degrades to a
//! documented default instead of failing on missing or malformed values.

use crate::numeric::FinancialProjection;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Criterion keys read by the scoring engine
pub mod keys {
    pub const FINANCIAL_PROJECTIONS: &str = "financial_projections";
    pub const PROBLEM_STATEMENT: &str = "problem_statement";
    pub const STAKEHOLDER_IMPACT: &str = "stakeholder_impact";
    pub const STRATEGIC_RATIONALE: &str = "strategic_rationale";
    pub const TRL_LEVEL: &str = "trl_level";
    pub const RESOURCE_AVAILABILITY: &str = "resource_availability";
    pub const TIMELINE: &str = "timeline";
    pub const PREREQUISITES: &str = "prerequisites";
    pub const BCG_I2I_DIMENSIONS: &str = "bcg_i2i_dimensions";
    pub const ARAMCO_RESPONSE: &str = "aramco_response";
    pub const COMPETITIVE_ANALYSIS: &str = "competitive_analysis";
    pub const MIRA_INTEGRATION: &str = "mira_integration";
    pub const ENGINE_CONTRIBUTION_STRENGTH: &str = "engine_contribution_strength";
    pub const THREE_ENGINES_ALIGNMENT: &str = "three_engines_alignment";
    pub const STRATEGIC_COHERENCE: &str = "strategic_coherence";
    pub const PRIORITY: &str = "priority";
    pub const PORTFOLIO_CATEGORY: &str = "portfolio_category";
}

/// The three strategic growth engines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Engine {
    E1SustainGrow,
    E2ExpandInorganically,
    E3BaseOilIntegration,
}

impl Engine {
    pub const ALL: [Engine; 3] = [
        Engine::E1SustainGrow,
        Engine::E2ExpandInorganically,
        Engine::E3BaseOilIntegration,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Engine::E1SustainGrow => "e1_sustain_grow",
            Engine::E2ExpandInorganically => "e2_expand_inorganically",
            Engine::E3BaseOilIntegration => "e3_base_oil_integration",
        }
    }

    pub fn parse(raw: &str) -> Option<Engine> {
        Engine::ALL.into_iter().find(|e| e.as_str() == raw)
    }
}

/// Portfolio allocation category (60-15-15-10 framework)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortfolioCategory {
    CoreIncremental,
    CoreDisruptive,
    NonCoreIncremental,
    NonCoreDisruptive,
}

impl PortfolioCategory {
    pub const ALL: [PortfolioCategory; 4] = [
        PortfolioCategory::CoreIncremental,
        PortfolioCategory::CoreDisruptive,
        PortfolioCategory::NonCoreIncremental,
        PortfolioCategory::NonCoreDisruptive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PortfolioCategory::CoreIncremental => "core_incremental",
            PortfolioCategory::CoreDisruptive => "core_disruptive",
            PortfolioCategory::NonCoreIncremental => "non_core_incremental",
            PortfolioCategory::NonCoreDisruptive => "non_core_disruptive",
        }
    }

    pub fn parse(raw: &str) -> Option<PortfolioCategory> {
        PortfolioCategory::ALL.into_iter().find(|c| c.as_str() == raw)
    }
}

/// Start/end dates and delivery confidence (criterion #26)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timeline {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub confidence: Option<String>,
}

impl Timeline {
    pub fn is_high_confidence(&self) -> bool {
        self.confidence.as_deref() == Some("high")
    }

    pub fn is_low_confidence(&self) -> bool {
        self.confidence.as_deref() == Some("low")
    }
}

/// One entry of the prerequisites list (criterion #28)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prerequisite {
    pub name: Option<String>,
    pub criticality: Option<String>,
}

impl Prerequisite {
    /// Criticality labels are matched exactly, as authored in the dossier form
    pub fn is_critical(&self) -> bool {
        self.criticality.as_deref() == Some("Critical")
    }
}

/// Gain assumed for a selected BCG dimension that carries none
pub const DEFAULT_BCG_GAIN: f64 = 3.0;

/// A selected BCG i2i dimension with its expected gain (criterion #10)
#[derive(Debug, Clone, PartialEq)]
pub struct BcgDimension {
    pub code: Option<String>,
    pub gain: f64,
}

/// MiRA data-platform integration settings (criterion #27)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MiraIntegration {
    /// 0 when MiRA is not used
    pub layer: i64,
    pub depth: Option<String>,
    pub multiple_layers: bool,
    pub monetization_clarity: Option<String>,
}

/// Strategic coherence checklist (feeds D6)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StrategicCoherence {
    pub ceo_priority: bool,
    pub aramco_address: bool,
    pub bcg_i2i: bool,
    pub vision_fit: bool,
}

impl StrategicCoherence {
    pub fn checks_passed(&self) -> usize {
        [self.ceo_priority, self.aramco_address, self.bcg_i2i, self.vision_fit]
            .iter()
            .filter(|c| **c)
            .count()
    }
}

/// Raw criteria values of one initiative
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CriteriaValues(Map<String, Value>);

impl CriteriaValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(map: Map<String, Value>) -> Self {
        CriteriaValues(map)
    }

    /// Builder-style insert, mostly for tests and fixtures
    pub fn with(mut self, key: &str, value: Value) -> Self {
        self.0.insert(key.to_string(), value);
        self
    }

    pub fn insert(&mut self, key: &str, value: Value) {
        self.0.insert(key.to_string(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// True when the key holds a value that counts as filled in
    pub fn is_present(&self, key: &str) -> bool {
        self.get(key).map(truthy).unwrap_or(false)
    }

    /// Free text of a criterion, empty when absent or not a string
    pub fn text(&self, key: &str) -> &str {
        self.get(key).and_then(Value::as_str).unwrap_or("")
    }

    /// Enumerated code of a criterion (strings, or numbers rendered as text)
    pub fn code(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn financial_projection(&self) -> Option<FinancialProjection> {
        let record = self.get(keys::FINANCIAL_PROJECTIONS)?.as_object()?;
        let flow = |v: &Value| as_number(v).unwrap_or(0.0);

        // Either a map of year offset to cash flow, or a list indexed by year offset
        let years = match record.get("years")? {
            Value::Object(by_year) => by_year
                .iter()
                .map(|(year, cash_flow)| (year.clone(), flow(cash_flow)))
                .collect(),
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(offset, cash_flow)| (offset.to_string(), flow(cash_flow)))
                .collect(),
            _ => return None,
        };

        Some(FinancialProjection {
            wacc: record.get("wacc").and_then(as_number),
            years,
        })
    }

    /// Technology readiness level, accepted as a number or numeric string
    pub fn trl_level(&self) -> Option<i64> {
        self.get(keys::TRL_LEVEL).and_then(as_integer)
    }

    /// Number of distinct resource-availability items checked, at most 4
    pub fn resource_count(&self) -> usize {
        let count = match self.get(keys::RESOURCE_AVAILABILITY) {
            Some(Value::Array(items)) => items
                .iter()
                .filter(|v| truthy(v))
                .map(|v| match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<BTreeSet<_>>()
                .len(),
            Some(Value::Object(flags)) => flags.values().filter(|v| truthy(v)).count(),
            _ => 0,
        };
        count.min(4)
    }

    pub fn timeline(&self) -> Timeline {
        let Some(record) = self.get(keys::TIMELINE).and_then(Value::as_object) else {
            return Timeline::default();
        };
        Timeline {
            start_date: string_field(record, "start_date"),
            end_date: string_field(record, "end_date"),
            confidence: string_field(record, "confidence"),
        }
    }

    pub fn prerequisites(&self) -> Vec<Prerequisite> {
        let Some(items) = self.get(keys::PREREQUISITES).and_then(Value::as_array) else {
            return Vec::new();
        };
        items
            .iter()
            .map(|item| match item {
                Value::Object(record) => Prerequisite {
                    name: string_field(record, "name"),
                    criticality: string_field(record, "criticality"),
                },
                Value::String(name) => Prerequisite {
                    name: Some(name.clone()),
                    criticality: None,
                },
                _ => Prerequisite::default(),
            })
            .collect()
    }

    /// Count of prerequisites flagged `Critical` (criterion #34)
    pub fn critical_dependency_count(&self) -> usize {
        self.prerequisites().iter().filter(|p| p.is_critical()).count()
    }

    /// Selected BCG dimensions
    ///
    /// Accepts a list of `{value, gain}` records or bare codes, or an object
    /// mapping dimension code to gain. A missing or zero gain counts as
    /// [`DEFAULT_BCG_GAIN`].
    pub fn bcg_dimensions(&self) -> Vec<BcgDimension> {
        match self.get(keys::BCG_I2I_DIMENSIONS) {
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::Object(record) => BcgDimension {
                        code: string_field(record, "value")
                            .or_else(|| string_field(record, "dimension")),
                        gain: gain_or_default(record.get("gain")),
                    },
                    Value::String(code) => BcgDimension {
                        code: Some(code.clone()),
                        gain: DEFAULT_BCG_GAIN,
                    },
                    _ => BcgDimension {
                        code: None,
                        gain: DEFAULT_BCG_GAIN,
                    },
                })
                .collect(),
            Some(Value::Object(by_code)) => by_code
                .iter()
                .map(|(code, gain)| BcgDimension {
                    code: Some(code.clone()),
                    gain: gain_or_default(Some(gain)),
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn mira_integration(&self) -> MiraIntegration {
        let Some(record) = self.get(keys::MIRA_INTEGRATION).and_then(Value::as_object) else {
            return MiraIntegration::default();
        };
        MiraIntegration {
            layer: record.get("layer").and_then(as_integer).unwrap_or(0),
            depth: string_field(record, "depth"),
            multiple_layers: record.get("multiple_layers").map(truthy).unwrap_or(false),
            monetization_clarity: string_field(record, "monetization_clarity"),
        }
    }

    pub fn strategic_coherence(&self) -> StrategicCoherence {
        let Some(record) = self.get(keys::STRATEGIC_COHERENCE).and_then(Value::as_object) else {
            return StrategicCoherence::default();
        };
        let flag = |name: &str| record.get(name).map(truthy).unwrap_or(false);
        StrategicCoherence {
            ceo_priority: flag("ceo_priority"),
            aramco_address: flag("aramco_address"),
            bcg_i2i: flag("bcg_i2i"),
            vision_fit: flag("vision_fit"),
        }
    }

    /// Declared engine alignment; `None` when absent or unrecognised
    pub fn declared_engine(&self) -> Option<Engine> {
        self.get(keys::THREE_ENGINES_ALIGNMENT)
            .and_then(Value::as_str)
            .and_then(Engine::parse)
    }

    /// Engine used for balance scoring: absent alignments count as E1
    pub fn balance_engine(&self) -> Option<Engine> {
        match self.get(keys::THREE_ENGINES_ALIGNMENT) {
            None | Some(Value::Null) => Some(Engine::E1SustainGrow),
            Some(Value::String(s)) if s.is_empty() => Some(Engine::E1SustainGrow),
            Some(other) => other.as_str().and_then(Engine::parse),
        }
    }

    pub fn portfolio_category(&self) -> Option<PortfolioCategory> {
        self.get(keys::PORTFOLIO_CATEGORY)
            .and_then(Value::as_str)
            .and_then(PortfolioCategory::parse)
    }

    pub fn is_critical_priority(&self) -> bool {
        self.get(keys::PRIORITY).and_then(Value::as_str) == Some("critical")
    }
}

/// Whether a value counts as "filled in": non-null, non-zero, non-empty
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|f| f.is_finite())
}

fn as_integer(value: &Value) -> Option<i64> {
    as_number(value).map(|f| f.trunc() as i64)
}

fn string_field(record: &Map<String, Value>, name: &str) -> Option<String> {
    match record.get(name)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

fn gain_or_default(value: Option<&Value>) -> f64 {
    match value.and_then(as_number) {
        Some(g) if g != 0.0 => g,
        _ => DEFAULT_BCG_GAIN,
    }
}
