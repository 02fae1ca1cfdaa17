//! Composite and final score computation
//!
//! Global invariants enforced:
//! - Scenario weight vectors sum to 1.0
//! - Composite and final scores are rounded to one decimal and never negative

use crate::classify::Quadrant;
use crate::dimensions::DimensionScores;
use crate::error::ScoringError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tolerance used when checking that a weight vector sums to 1.0
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Named weighting scenario; they differ only in the D1/D2 trade-off
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scenario {
    /// Balanced impact and feasibility
    #[default]
    A,
    /// Impact-leaning
    B,
    /// Feasibility-leaning
    C,
}

impl Scenario {
    pub const ALL: [Scenario; 3] = [Scenario::A, Scenario::B, Scenario::C];

    pub fn as_str(&self) -> &'static str {
        match self {
            Scenario::A => "A",
            Scenario::B => "B",
            Scenario::C => "C",
        }
    }

    pub fn weights(&self) -> ScoringWeights {
        ScoringWeights::for_scenario(*self)
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scenario {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(Scenario::A),
            "B" => Ok(Scenario::B),
            "C" => Ok(Scenario::C),
            other => Err(ScoringError::InvalidInput(format!(
                "unknown scenario '{}' (expected A, B or C)",
                other
            ))),
        }
    }
}

/// Weight per dimension
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub d1: f64,
    pub d2: f64,
    pub d3: f64,
    pub d4: f64,
    pub d5: f64,
    pub d6: f64,
}

impl ScoringWeights {
    pub fn for_scenario(scenario: Scenario) -> Self {
        let (d1, d2) = match scenario {
            Scenario::A => (0.25, 0.25),
            Scenario::B => (0.30, 0.20),
            Scenario::C => (0.20, 0.30),
        };
        ScoringWeights {
            d1,
            d2,
            d3: 0.15,
            d4: 0.15,
            d5: 0.10,
            d6: 0.10,
        }
    }

    pub fn as_array(&self) -> [f64; 6] {
        [self.d1, self.d2, self.d3, self.d4, self.d5, self.d6]
    }

    pub fn sum(&self) -> f64 {
        self.as_array().iter().sum()
    }

    /// Reject negative weights and vectors that do not sum to 1.0
    pub fn validate(&self) -> Result<(), ScoringError> {
        for (i, w) in self.as_array().iter().enumerate() {
            if !w.is_finite() || *w < 0.0 {
                return Err(ScoringError::InvalidWeights(format!(
                    "d{} must be a non-negative number (got {})",
                    i + 1,
                    w
                )));
            }
        }
        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ScoringError::InvalidWeights(format!(
                "weights must sum to 1.0 (got {})",
                sum
            )));
        }
        Ok(())
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        ScoringWeights::for_scenario(Scenario::default())
    }
}

/// Multiplicative factor applied to the composite score per quadrant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuadrantModifiers {
    pub quick_win: f64,
    pub push_harder: f64,
    pub transformational: f64,
    pub moonshot: f64,
}

impl QuadrantModifiers {
    pub fn for_quadrant(&self, quadrant: Quadrant) -> f64 {
        match quadrant {
            Quadrant::QuickWin => self.quick_win,
            Quadrant::PushHarder => self.push_harder,
            Quadrant::Transformational => self.transformational,
            Quadrant::Moonshot => self.moonshot,
        }
    }
}

impl Default for QuadrantModifiers {
    fn default() -> Self {
        QuadrantModifiers {
            quick_win: 0.95,
            push_harder: 0.90,
            transformational: 1.00,
            moonshot: 0.85,
        }
    }
}

/// Round to one decimal place
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Weighted sum of the six dimension scores, rounded to one decimal
pub fn composite_score(scores: &DimensionScores, weights: &ScoringWeights) -> f64 {
    let raw: f64 = scores
        .as_array()
        .iter()
        .zip(weights.as_array())
        .map(|(score, weight)| *score as f64 * weight)
        .sum();
    round1(raw.max(0.0))
}

/// Composite score adjusted by the quadrant modifier, rounded to one decimal
pub fn final_score(composite: f64, quadrant: Quadrant, modifiers: &QuadrantModifiers) -> f64 {
    round1((composite * modifiers.for_quadrant(quadrant)).max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(values: [u32; 6]) -> DimensionScores {
        DimensionScores {
            d1: values[0],
            d2: values[1],
            d3: values[2],
            d4: values[3],
            d5: values[4],
            d6: values[5],
        }
    }

    #[test]
    fn test_scenario_weights_sum_to_one() {
        for scenario in Scenario::ALL {
            let w = scenario.weights();
            assert!((w.sum() - 1.0).abs() < 1e-9, "scenario {} sums to {}", scenario, w.sum());
            w.validate().unwrap();
        }
    }

    #[test]
    fn test_scenarios_trade_d1_against_d2() {
        let a = Scenario::A.weights();
        let b = Scenario::B.weights();
        let c = Scenario::C.weights();
        assert!(b.d1 > a.d1 && a.d1 > c.d1);
        assert!(c.d2 > a.d2 && a.d2 > b.d2);
        assert_eq!(a.d3, b.d3);
        assert_eq!(b.d6, c.d6);
    }

    #[test]
    fn test_scenario_parse() {
        assert_eq!("b".parse::<Scenario>().unwrap(), Scenario::B);
        assert_eq!(" C ".parse::<Scenario>().unwrap(), Scenario::C);
        assert!("D".parse::<Scenario>().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_vectors() {
        let mut w = ScoringWeights::default();
        w.d1 = 0.5;
        assert!(matches!(w.validate(), Err(ScoringError::InvalidWeights(_))));

        let mut w = ScoringWeights::default();
        w.d5 = -0.1;
        w.d6 = 0.3;
        assert!(w.validate().is_err());
    }

    #[test]
    fn test_composite_is_weighted_sum_rounded() {
        let s = scores([80, 70, 60, 50, 30, 70]);
        // 20 + 17.5 + 9 + 7.5 + 3 + 7
        assert_eq!(composite_score(&s, &Scenario::A.weights()), 64.0);

        let s = scores([77, 81, 43, 65, 50, 62]);
        // 19.25 + 20.25 + 6.45 + 9.75 + 5 + 6.2 = 66.9
        assert_eq!(composite_score(&s, &Scenario::A.weights()), 66.9);

        let s = scores([100, 100, 100, 100, 100, 100]);
        for scenario in Scenario::ALL {
            assert_eq!(composite_score(&s, &scenario.weights()), 100.0);
        }
        assert_eq!(composite_score(&scores([0; 6]), &ScoringWeights::default()), 0.0);
    }

    #[test]
    fn test_composite_scenario_b() {
        let s = scores([90, 50, 40, 60, 20, 70]);
        // 27 + 10 + 6 + 9 + 2 + 7
        assert_eq!(composite_score(&s, &Scenario::B.weights()), 61.0);
    }

    #[test]
    fn test_final_score_applies_modifier() {
        let m = QuadrantModifiers::default();
        assert_eq!(final_score(80.0, Quadrant::QuickWin, &m), 76.0);
        assert_eq!(final_score(80.0, Quadrant::PushHarder, &m), 72.0);
        assert_eq!(final_score(80.0, Quadrant::Transformational, &m), 80.0);
        assert_eq!(final_score(80.0, Quadrant::Moonshot, &m), 68.0);
        assert_eq!(final_score(61.3, Quadrant::Moonshot, &m), 52.1);
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(61.04), 61.0);
        assert_eq!(round1(61.06), 61.1);
        assert_eq!(round1(0.0), 0.0);
    }
}
