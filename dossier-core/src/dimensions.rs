//! Six-dimension scoring (D1-D6)
//!
//! Each scorer maps one initiative's criteria to an integer in [0, 100].
//! D6 additionally reads the batch's [`PortfolioSnapshot`].
//!
//! Global invariants enforced:
//! - Every score is clamped to [0, 100] before rounding
//! - Keyword heuristics are plain case-insensitive substring matches
//! - No scorer reads anything but its arguments

use crate::criteria::{keys, CriteriaValues, Engine};
use crate::numeric::{months_between, npv};
use crate::portfolio::{engine_target, PortfolioSnapshot};
use serde::{Deserialize, Serialize};

/// Scores for all six dimensions of one initiative
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionScores {
    pub d1: u32,
    pub d2: u32,
    pub d3: u32,
    pub d4: u32,
    pub d5: u32,
    pub d6: u32,
}

impl DimensionScores {
    pub fn as_array(&self) -> [u32; 6] {
        [self.d1, self.d2, self.d3, self.d4, self.d5, self.d6]
    }
}

/// Score every dimension for one initiative
pub fn score_dimensions(
    criteria: &CriteriaValues,
    snapshot: &PortfolioSnapshot,
) -> DimensionScores {
    DimensionScores {
        d1: strategic_impact(criteria),
        d2: execution_feasibility(criteria),
        d3: bcg_advancement(criteria),
        d4: competitive_response(criteria),
        d5: mira_integration(criteria),
        d6: engines_alignment(criteria, snapshot),
    }
}

fn clamp_score(raw: f64) -> u32 {
    raw.clamp(0.0, 100.0).round() as u32
}

/// A set of interchangeable phrases worth a fixed number of points
struct PhraseGroup {
    phrases: &'static [&'static str],
    points: u32,
}

impl PhraseGroup {
    const fn new(phrases: &'static [&'static str], points: u32) -> Self {
        PhraseGroup { phrases, points }
    }

    /// `text` must already be lowercased
    fn matches(&self, text: &str) -> bool {
        self.phrases.iter().any(|p| text.contains(p))
    }
}

fn phrase_points(text: &str, groups: &[PhraseGroup]) -> u32 {
    groups
        .iter()
        .filter(|g| g.matches(text))
        .map(|g| g.points)
        .sum()
}

// ─── D1: Strategic Impact ───────────────────────────────────────────

const PROBLEM_SEVERITY: &[PhraseGroup] = &[
    PhraseGroup::new(&["sar", "million"], 3),
    PhraseGroup::new(&["critical", "urgent"], 2),
];

const STAKEHOLDER_REACH: &[PhraseGroup] = &[
    PhraseGroup::new(&["ceo", "executive"], 2),
    PhraseGroup::new(&["customer"], 2),
];

const STRATEGIC_ALIGNMENT: &[PhraseGroup] = &[PhraseGroup::new(&["vision", "strategy"], 1)];

/// NPV ladder for the quantitative half of D1
pub fn npv_bucket(npv: f64) -> u32 {
    if npv > 100_000_000.0 {
        95
    } else if npv > 50_000_000.0 {
        85
    } else if npv > 20_000_000.0 {
        75
    } else if npv > 5_000_000.0 {
        65
    } else {
        55
    }
}

/// Qualitative impact points (0..=10) from the business-case texts
pub fn qualitative_impact(criteria: &CriteriaValues) -> u32 {
    let problem = criteria.text(keys::PROBLEM_STATEMENT).to_lowercase();
    let stakeholders = criteria.text(keys::STAKEHOLDER_IMPACT).to_lowercase();
    let rationale = criteria.text(keys::STRATEGIC_RATIONALE).to_lowercase();

    phrase_points(&problem, PROBLEM_SEVERITY)
        + phrase_points(&stakeholders, STAKEHOLDER_REACH)
        + phrase_points(&rationale, STRATEGIC_ALIGNMENT)
}

/// D1 = NPV bucket * 0.6 + qualitative points * 4
pub fn strategic_impact(criteria: &CriteriaValues) -> u32 {
    let quant = npv_bucket(npv(criteria.financial_projection().as_ref()));
    let qual = qualitative_impact(criteria);
    clamp_score(quant as f64 * 0.6 + qual as f64 * 4.0)
}

// ─── D2: Execution Feasibility ──────────────────────────────────────

const TRL_WEIGHT: f64 = 0.30;
const RESOURCE_WEIGHT: f64 = 0.25;
const TIMELINE_WEIGHT: f64 = 0.25;
const DEPENDENCY_WEIGHT: f64 = 0.20;

/// Number of items on the resource-availability checklist
pub const RESOURCE_CHECKLIST_SIZE: usize = 4;

pub fn trl_score(level: Option<i64>) -> u32 {
    match level {
        Some(9) => 95,
        Some(8) => 90,
        Some(7) => 85,
        Some(6) => 80,
        Some(5) => 75,
        Some(4) => 65,
        Some(3) => 60,
        Some(2) => 55,
        Some(1) => 50,
        _ => 70,
    }
}

pub fn resource_score(selected: usize) -> f64 {
    (selected.min(RESOURCE_CHECKLIST_SIZE) as f64 / RESOURCE_CHECKLIST_SIZE as f64) * 100.0
}

pub fn timeline_score(months: i32, high_confidence: bool, low_confidence: bool) -> u32 {
    if months <= 4 && high_confidence {
        90
    } else if months <= 6 && !low_confidence {
        80
    } else if months <= 12 && !low_confidence {
        70
    } else {
        60
    }
}

pub fn dependency_score(critical: usize, total: usize) -> u32 {
    match critical {
        0 if total <= 3 => 90,
        0 if total <= 5 => 80,
        1 => 70,
        2 => 60,
        _ => 50,
    }
}

/// D2 = TRL 30% + resources 25% + timeline 25% + dependencies 20%
pub fn execution_feasibility(criteria: &CriteriaValues) -> u32 {
    let timeline = criteria.timeline();
    let months = months_between(timeline.start_date.as_deref(), timeline.end_date.as_deref());
    let prerequisites = criteria.prerequisites();
    let critical = prerequisites.iter().filter(|p| p.is_critical()).count();

    let raw = trl_score(criteria.trl_level()) as f64 * TRL_WEIGHT
        + resource_score(criteria.resource_count()) * RESOURCE_WEIGHT
        + timeline_score(
            months,
            timeline.is_high_confidence(),
            timeline.is_low_confidence(),
        ) as f64
            * TIMELINE_WEIGHT
        + dependency_score(critical, prerequisites.len()) as f64 * DEPENDENCY_WEIGHT;

    clamp_score(raw)
}

// ─── D3: BCG i2i Advancement ────────────────────────────────────────

pub fn breadth_bonus(count: usize) -> f64 {
    if count >= 7 {
        20.0
    } else if count >= 5 {
        10.0
    } else {
        0.0
    }
}

/// D3 = dimensions * 10 + average gain * 5 + breadth bonus; 0 with no dimensions
pub fn bcg_advancement(criteria: &CriteriaValues) -> u32 {
    let dimensions = criteria.bcg_dimensions();
    if dimensions.is_empty() {
        return 0;
    }

    let count = dimensions.len();
    let avg_gain = dimensions.iter().map(|d| d.gain).sum::<f64>() / count as f64;
    clamp_score(count as f64 * 10.0 + avg_gain * 5.0 + breadth_bonus(count))
}

// ─── D4: Aramco Competitive Response ────────────────────────────────
//
// Keyword stand-in for the AI-assisted reading of the competitive texts.
// The analyst validates the suggestion; the engine only needs it stable.

const STANCE_BASELINE: u32 = 50;

const DEFENSIVE: &[PhraseGroup] = &[
    PhraseGroup::new(&["protect", "retain"], 10),
    PhraseGroup::new(&["defend", "prevent"], 10),
    PhraseGroup::new(&["customer retention", "loyalty"], 10),
    PhraseGroup::new(&["switching cost"], 10),
];

const OFFENSIVE: &[PhraseGroup] = &[
    PhraseGroup::new(&["lead", "first-mover"], 10),
    PhraseGroup::new(&["cannot replicate", "unique"], 10),
    PhraseGroup::new(&["capability gap", "advantage"], 10),
    PhraseGroup::new(&["mira", "data"], 10),
];

const LONG_REPLICATION: PhraseGroup = PhraseGroup::new(&["36 month", "3 year"], 10);
const MEDIUM_REPLICATION: PhraseGroup = PhraseGroup::new(&["24 month", "2 year"], 5);

/// Bonus for how long competitors would need to replicate the capability
fn replication_bonus(text: &str) -> u32 {
    if LONG_REPLICATION.matches(text) {
        LONG_REPLICATION.points
    } else if MEDIUM_REPLICATION.matches(text) {
        MEDIUM_REPLICATION.points
    } else {
        0
    }
}

/// Defensive and offensive stance scores, each capped at 100
pub fn competitive_stances(criteria: &CriteriaValues) -> (u32, u32) {
    let text = format!(
        "{} {}",
        criteria.text(keys::ARAMCO_RESPONSE),
        criteria.text(keys::COMPETITIVE_ANALYSIS)
    )
    .to_lowercase();

    let defensive = STANCE_BASELINE + phrase_points(&text, DEFENSIVE);
    let offensive = STANCE_BASELINE + phrase_points(&text, OFFENSIVE) + replication_bonus(&text);
    (defensive.min(100), offensive.min(100))
}

/// D4 = mean of the capped defensive and offensive stances
pub fn competitive_response(criteria: &CriteriaValues) -> u32 {
    let (defensive, offensive) = competitive_stances(criteria);
    clamp_score((defensive + offensive) as f64 / 2.0)
}

// ─── D5: MiRA Integration ───────────────────────────────────────────

pub fn mira_layer_score(layer: i64) -> i64 {
    match layer {
        1 => 30,
        2 => 50,
        3 => 70,
        4 => 90,
        _ => 0,
    }
}

fn depth_modifier(depth: Option<&str>) -> i64 {
    match depth {
        Some("low") => -10,
        Some("high") => 10,
        _ => 0,
    }
}

fn monetization_modifier(clarity: Option<&str>) -> i64 {
    match clarity {
        Some("yes") => 0,
        Some("partial") => -10,
        _ => -20,
    }
}

/// D5 = layer base + depth + multi-layer bonus + layer-4 monetization clarity
pub fn mira_integration(criteria: &CriteriaValues) -> u32 {
    let mira = criteria.mira_integration();
    if mira.layer == 0 {
        return 0;
    }

    let mut raw = mira_layer_score(mira.layer) + depth_modifier(mira.depth.as_deref());
    if mira.multiple_layers {
        raw += 5;
    }
    if mira.layer == 4 {
        raw += monetization_modifier(mira.monetization_clarity.as_deref());
    }
    clamp_score(raw as f64)
}

// ─── D6: Three Engines Alignment ────────────────────────────────────

const CONTRIBUTION_WEIGHT: f64 = 0.40;
const BALANCE_WEIGHT: f64 = 0.35;
const COHERENCE_WEIGHT: f64 = 0.25;

pub fn contribution_score(strength: Option<&str>) -> u32 {
    match strength {
        Some("critical") => 95,
        Some("strong") => 85,
        Some("solid") => 75,
        Some("moderate") => 65,
        Some("weak") => 55,
        _ => 70,
    }
}

/// Reward initiatives on under-allocated engines, penalise over-allocated ones
pub fn balance_score(engine: Engine, snapshot: &PortfolioSnapshot) -> f64 {
    let gap = engine_target(engine) / 100.0 - snapshot.engine_share(engine);
    if gap > 0.0 {
        85.0 + (gap * 100.0).min(15.0)
    } else {
        70.0 - (gap.abs() * 100.0).min(20.0)
    }
}

/// D6 = contribution 40% + portfolio balance 35% + strategic coherence 25%
pub fn engines_alignment(criteria: &CriteriaValues, snapshot: &PortfolioSnapshot) -> u32 {
    let strength = criteria.code(keys::ENGINE_CONTRIBUTION_STRENGTH);
    let engine = criteria.balance_engine().unwrap_or(Engine::E1SustainGrow);
    let coherence = criteria.strategic_coherence().checks_passed() as f64 / 4.0 * 100.0;

    let raw = contribution_score(strength.as_deref()) as f64 * CONTRIBUTION_WEIGHT
        + balance_score(engine, snapshot) * BALANCE_WEIGHT
        + coherence * COHERENCE_WEIGHT;
    clamp_score(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Initiative;
    use serde_json::{json, Value};

    fn criteria(value: Value) -> CriteriaValues {
        serde_json::from_value(value).unwrap()
    }

    fn snapshot_of(engines: &[&str]) -> PortfolioSnapshot {
        let initiatives: Vec<Initiative> = engines
            .iter()
            .enumerate()
            .map(|(i, e)| {
                Initiative::new(
                    format!("I-{}", i),
                    CriteriaValues::new().with("three_engines_alignment", json!(e)),
                )
            })
            .collect();
        PortfolioSnapshot::new(&initiatives).unwrap()
    }

    #[test]
    fn test_d1_reference_projection_without_qualitative_signal() {
        let c = criteria(json!({
            "financial_projections": {
                "wacc": 0.12,
                "years": {"0": -1000000, "1": 500000, "2": 500000, "3": 500000}
            }
        }));
        assert_eq!(strategic_impact(&c), 33);
    }

    #[test]
    fn test_d1_npv_ladder() {
        assert_eq!(npv_bucket(150_000_000.0), 95);
        assert_eq!(npv_bucket(100_000_000.0), 85);
        assert_eq!(npv_bucket(60_000_000.0), 85);
        assert_eq!(npv_bucket(25_000_000.0), 75);
        assert_eq!(npv_bucket(6_000_000.0), 65);
        assert_eq!(npv_bucket(5_000_000.0), 55);
        assert_eq!(npv_bucket(-1.0), 55);
    }

    #[test]
    fn test_d1_projection_years_as_list() {
        let c = criteria(json!({
            "financial_projections": {
                "wacc": 0.12,
                "years": [-1000000, 60000000, 60000000]
            }
        }));
        // about 100.4M, top NPV bucket
        assert_eq!(npv_bucket(npv(c.financial_projection().as_ref())), 95);
        assert_eq!(strategic_impact(&c), 57);
    }

    #[test]
    fn test_d1_full_qualitative_signal() {
        let c = criteria(json!({
            "financial_projections": {"years": {"1": 200000000}},
            "problem_statement": "Losing SAR 40 MILLION a year; urgent fix needed",
            "stakeholder_impact": "Executive team and every Customer segment",
            "strategic_rationale": "Core to the 2030 Vision"
        }));
        assert_eq!(qualitative_impact(&c), 10);
        // 95 * 0.6 + 40 = 97
        assert_eq!(strategic_impact(&c), 97);
    }

    #[test]
    fn test_d1_phrase_groups_count_once() {
        let c = criteria(json!({"problem_statement": "sar million sar million critical urgent"}));
        assert_eq!(qualitative_impact(&c), 5);
    }

    #[test]
    fn test_d2_best_case_with_light_dependencies() {
        let c = criteria(json!({
            "trl_level": 9,
            "resource_availability": ["team", "budget", "sponsor", "skills"],
            "timeline": {
                "start_date": "2025-01-01",
                "end_date": "2025-04-01",
                "confidence": "high"
            },
            "prerequisites": [{"criticality": "High"}, {"criticality": "Medium"}]
        }));
        // 28.5 + 25 + 22.5 + 90 * 0.2
        assert_eq!(execution_feasibility(&c), 94);
    }

    #[test]
    fn test_d2_four_non_critical_prerequisites() {
        let c = criteria(json!({
            "trl_level": 9,
            "resource_availability": ["team", "budget", "sponsor", "skills"],
            "timeline": {
                "start_date": "2025-01-01",
                "end_date": "2025-04-01",
                "confidence": "high"
            },
            "prerequisites": [{}, {}, {}, {}]
        }));
        // 28.5 + 25 + 22.5 + 16
        assert_eq!(execution_feasibility(&c), 92);
    }

    #[test]
    fn test_d2_defaults() {
        // TRL 70 * 0.3 + 0 + 12-month default timeline 70 * 0.25 + 90 * 0.2
        assert_eq!(execution_feasibility(&CriteriaValues::new()), 57);
    }

    #[test]
    fn test_d2_timeline_tiers() {
        assert_eq!(timeline_score(4, true, false), 90);
        assert_eq!(timeline_score(4, false, false), 80);
        assert_eq!(timeline_score(5, true, false), 80);
        assert_eq!(timeline_score(6, false, true), 60);
        assert_eq!(timeline_score(12, false, false), 70);
        assert_eq!(timeline_score(13, true, false), 60);
    }

    #[test]
    fn test_d2_dependency_tiers() {
        assert_eq!(dependency_score(0, 0), 90);
        assert_eq!(dependency_score(0, 3), 90);
        assert_eq!(dependency_score(0, 5), 80);
        assert_eq!(dependency_score(0, 6), 50);
        assert_eq!(dependency_score(1, 9), 70);
        assert_eq!(dependency_score(2, 2), 60);
        assert_eq!(dependency_score(3, 3), 50);
    }

    #[test]
    fn test_d3_empty_is_zero() {
        assert_eq!(bcg_advancement(&CriteriaValues::new()), 0);
        assert_eq!(bcg_advancement(&criteria(json!({"bcg_i2i_dimensions": []}))), 0);
    }

    #[test]
    fn test_d3_breadth_bonus() {
        let dims = |n: usize| {
            let list: Vec<Value> = (0..n)
                .map(|i| json!({"value": format!("d{}", i + 1), "gain": 4}))
                .collect();
            criteria(json!({ "bcg_i2i_dimensions": list }))
        };
        assert_eq!(bcg_advancement(&dims(1)), 30);
        assert_eq!(bcg_advancement(&dims(4)), 60);
        assert_eq!(bcg_advancement(&dims(5)), 80);
        assert_eq!(bcg_advancement(&dims(7)), 100);
        assert_eq!(bcg_advancement(&dims(10)), 100);
    }

    #[test]
    fn test_d4_baseline() {
        assert_eq!(competitive_response(&CriteriaValues::new()), 50);
    }

    #[test]
    fn test_d4_stances_capped_independently() {
        let c = criteria(json!({
            "aramco_response": "Protect and defend share, build loyalty, raise switching costs",
            "competitive_analysis": "Unique data advantage; we lead and they need 36 months"
        }));
        let (defensive, offensive) = competitive_stances(&c);
        assert_eq!(defensive, 90);
        assert_eq!(offensive, 100);
        assert_eq!(competitive_response(&c), 95);
    }

    #[test]
    fn test_d4_replication_bonus_tiers() {
        let long = criteria(json!({"competitive_analysis": "3 years or 24 months"}));
        assert_eq!(competitive_stances(&long).1, 60);
        let medium = criteria(json!({"aramco_response": "about 2 years"}));
        assert_eq!(competitive_stances(&medium).1, 55);
        assert_eq!(competitive_response(&medium), 53);
    }

    #[test]
    fn test_d5_absent_layer_is_zero() {
        assert_eq!(mira_integration(&CriteriaValues::new()), 0);
        let c = criteria(json!({"mira_integration": {"layer": 0, "depth": "high"}}));
        assert_eq!(mira_integration(&c), 0);
    }

    #[test]
    fn test_d5_modifiers() {
        let c = criteria(json!({
            "mira_integration": {"layer": 3, "depth": "high", "multiple_layers": true}
        }));
        assert_eq!(mira_integration(&c), 85);

        let c = criteria(json!({"mira_integration": {"layer": 1, "depth": "low"}}));
        assert_eq!(mira_integration(&c), 20);

        let c = criteria(json!({"mira_integration": {"layer": "2"}}));
        assert_eq!(mira_integration(&c), 50);
    }

    #[test]
    fn test_d5_layer_four_monetization() {
        let layer4 = |clarity: Value| {
            criteria(json!({"mira_integration": {
                "layer": 4,
                "depth": "high",
                "multiple_layers": true,
                "monetization_clarity": clarity
            }}))
        };
        assert_eq!(mira_integration(&layer4(json!("yes"))), 100);
        assert_eq!(mira_integration(&layer4(json!("partial"))), 95);
        assert_eq!(mira_integration(&layer4(json!("no"))), 85);
        assert_eq!(mira_integration(&layer4(Value::Null)), 85);
    }

    #[test]
    fn test_d6_balance_under_and_over_allocated() {
        // e2 is 1 of 10 (10%) against a 25% target: gap 15 points
        let mut engines = vec!["e1_sustain_grow"; 9];
        engines.push("e2_expand_inorganically");
        let snapshot = snapshot_of(&engines);
        assert!((balance_score(Engine::E2ExpandInorganically, &snapshot) - 100.0).abs() < 1e-9);
        // e1 is 90% against 60%: penalty capped at 20
        assert!((balance_score(Engine::E1SustainGrow, &snapshot) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_d6_exact_target_is_neutral() {
        let mut engines = vec!["e1_sustain_grow"; 3];
        engines.extend(["e2_expand_inorganically", "e3_base_oil_integration"]);
        let snapshot = snapshot_of(&engines);
        assert!((balance_score(Engine::E1SustainGrow, &snapshot) - 70.0).abs() < 1e-9);
    }

    #[test]
    fn test_d6_full_alignment() {
        let snapshot = snapshot_of(&[
            "e1_sustain_grow",
            "e1_sustain_grow",
            "e3_base_oil_integration",
        ]);
        let c = criteria(json!({
            "engine_contribution_strength": "critical",
            "three_engines_alignment": "e3_base_oil_integration",
            "strategic_coherence": {
                "ceo_priority": true,
                "aramco_address": true,
                "bcg_i2i": true,
                "vision_fit": true
            }
        }));
        // e3 share 33% vs 15% target: 70 - 18.33; 38 + 18.17 + 25
        assert_eq!(engines_alignment(&c, &snapshot), 81);
    }

    #[test]
    fn test_d6_unknown_engine_scores_as_e1() {
        let snapshot = snapshot_of(&["e1_sustain_grow", "e2_expand_inorganically", "e9"]);
        // the unknown alignment is left out of the engine counts
        assert!((snapshot.engine_share(Engine::E1SustainGrow) - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(snapshot.declared_engine_count(Engine::E1SustainGrow), 1);

        let unknown = criteria(json!({"three_engines_alignment": "e9"}));
        let e1 = criteria(json!({"three_engines_alignment": "e1_sustain_grow"}));
        // e1 at 33% against 60%: 70 * 0.4 + (85 + 15) * 0.35
        assert_eq!(engines_alignment(&unknown, &snapshot), 63);
        assert_eq!(
            engines_alignment(&unknown, &snapshot),
            engines_alignment(&e1, &snapshot)
        );
    }

    #[test]
    fn test_d6_defaults() {
        let snapshot = snapshot_of(&["e2_expand_inorganically"]);
        // strength 70 * 0.4 + (85 + 15) * 0.35 + 0
        assert_eq!(engines_alignment(&CriteriaValues::new(), &snapshot), 63);
    }
}
