//! Quadrant and tier classification
//!
//! Global invariants enforced:
//! - Quadrant is a pure function of (D1, D2); thresholds are inclusive
//! - Tier rules are evaluated in a fixed order, first match wins

use crate::criteria::CriteriaValues;
use serde::{Deserialize, Serialize};
use std::fmt;

/// D1 at or above this counts as high impact
pub const IMPACT_THRESHOLD: u32 = 75;
/// D2 at or above this counts as high feasibility
pub const FEASIBILITY_THRESHOLD: u32 = 80;
/// Critical prerequisites at which the dependency override kicks in
pub const CATASTROPHIC_DEPENDENCY_COUNT: usize = 3;

/// Impact vs feasibility matrix position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quadrant {
    QuickWin,         // high impact, high feasibility
    PushHarder,       // low impact, high feasibility
    Transformational, // high impact, low feasibility
    Moonshot,         // low impact, low feasibility
}

impl Quadrant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Quadrant::QuickWin => "quick_win",
            Quadrant::PushHarder => "push_harder",
            Quadrant::Transformational => "transformational",
            Quadrant::Moonshot => "moonshot",
        }
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Year-1 delivery tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tier {
    /// Catastrophic dependency or critical mandate with a strong score
    #[serde(rename = "1a")]
    T1a,
    /// Quick-win
    #[serde(rename = "1b")]
    T1b,
    /// Foundation
    #[serde(rename = "1c")]
    T1c,
    /// Strategic
    #[serde(rename = "1d")]
    T1d,
    /// Positioning
    #[serde(rename = "2")]
    T2,
    #[serde(rename = "contingent")]
    Contingent,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::T1a => "1a",
            Tier::T1b => "1b",
            Tier::T1c => "1c",
            Tier::T1d => "1d",
            Tier::T2 => "2",
            Tier::Contingent => "contingent",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn assign_quadrant(d1: u32, d2: u32) -> Quadrant {
    match (d1 >= IMPACT_THRESHOLD, d2 >= FEASIBILITY_THRESHOLD) {
        (true, true) => Quadrant::QuickWin,
        (false, true) => Quadrant::PushHarder,
        (true, false) => Quadrant::Transformational,
        (false, false) => Quadrant::Moonshot,
    }
}

/// Assign a tier from dependency criticality, priority and final score
pub fn assign_tier(
    critical_dependencies: usize,
    critical_priority: bool,
    final_score: f64,
) -> Tier {
    if critical_dependencies >= CATASTROPHIC_DEPENDENCY_COUNT {
        return Tier::T1a;
    }

    if critical_priority {
        return if final_score >= 80.0 {
            Tier::T1a
        } else {
            Tier::T1b
        };
    }

    if final_score >= 80.0 {
        Tier::T1b
    } else if final_score >= 70.0 {
        Tier::T1c
    } else if final_score >= 60.0 {
        Tier::T1d
    } else if final_score >= 50.0 {
        Tier::T2
    } else {
        Tier::Contingent
    }
}

/// Tier for an initiative's criteria and final score
pub fn tier_for(criteria: &CriteriaValues, final_score: f64) -> Tier {
    assign_tier(
        criteria.critical_dependency_count(),
        criteria.is_critical_priority(),
        final_score,
    )
}
