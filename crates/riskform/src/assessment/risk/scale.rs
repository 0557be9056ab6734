use serde::{Deserialize, Serialize};
use std::fmt;

/// How probable a risk is, in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Likelihood {
    Rare,
    Unlikely,
    Possible,
    Likely,
    AlmostCertain,
}

impl Likelihood {
    pub const ALL: [Likelihood; 5] = [
        Likelihood::Rare,
        Likelihood::Unlikely,
        Likelihood::Possible,
        Likelihood::Likely,
        Likelihood::AlmostCertain,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Likelihood::Rare => "rare",
            Likelihood::Unlikely => "unlikely",
            Likelihood::Possible => "possible",
            Likelihood::Likely => "likely",
            Likelihood::AlmostCertain => "almost_certain",
        }
    }

    /// One step down the scale, clamped at [`Likelihood::Rare`].
    pub fn step_down(self) -> Self {
        Self::ALL[(self as usize).saturating_sub(1)]
    }
}

impl fmt::Display for Likelihood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How severe a risk is if it materialises, in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Consequence {
    Minor,
    Medium,
    Major,
}

impl Consequence {
    pub const ALL: [Consequence; 3] = [Consequence::Minor, Consequence::Medium, Consequence::Major];

    pub fn as_str(&self) -> &'static str {
        match self {
            Consequence::Minor => "minor",
            Consequence::Medium => "medium",
            Consequence::Major => "major",
        }
    }

    /// One step down the scale, clamped at [`Consequence::Minor`].
    pub fn step_down(self) -> Self {
        Self::ALL[(self as usize).saturating_sub(1)]
    }
}

impl fmt::Display for Consequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Displayed severity of a risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    NotApplicable,
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 4] = [
        RiskLevel::NotApplicable,
        RiskLevel::Low,
        RiskLevel::Medium,
        RiskLevel::High,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::NotApplicable => "not_applicable",
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::NotApplicable => "Not applicable",
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

use RiskLevel::{High, Low, Medium};

/// Rows follow [`Likelihood::ALL`], columns follow [`Consequence::ALL`].
const RISK_MATRIX: [[RiskLevel; 3]; 5] = [
    [Low, Low, Medium],
    [Low, Medium, Medium],
    [Medium, Medium, High],
    [Medium, High, High],
    [High, High, High],
];

/// Combine a likelihood and a consequence into a level.
pub fn resolve(likelihood: Likelihood, consequence: Consequence) -> RiskLevel {
    RISK_MATRIX[likelihood as usize][consequence as usize]
}

/// Like [`resolve`], but an incomplete pair is [`RiskLevel::NotApplicable`].
pub fn resolve_partial(likelihood: Option<Likelihood>, consequence: Option<Consequence>) -> RiskLevel {
    match (likelihood, consequence) {
        (Some(likelihood), Some(consequence)) => resolve(likelihood, consequence),
        _ => RiskLevel::NotApplicable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Consequence as C;

    #[test]
    fn matrix_matches_published_table() {
        assert_eq!(resolve(Likelihood::Rare, C::Minor), Low);
        assert_eq!(resolve(Likelihood::Rare, C::Major), Medium);
        assert_eq!(resolve(Likelihood::Unlikely, C::Medium), Medium);
        assert_eq!(resolve(Likelihood::Possible, C::Major), High);
        assert_eq!(resolve(Likelihood::Likely, C::Minor), Medium);
        assert_eq!(resolve(Likelihood::AlmostCertain, C::Minor), High);
    }

    #[test]
    fn matrix_never_yields_not_applicable() {
        for likelihood in Likelihood::ALL {
            for consequence in C::ALL {
                assert_ne!(resolve(likelihood, consequence), RiskLevel::NotApplicable);
            }
        }
    }

    #[test]
    fn matrix_is_monotonic_in_both_dimensions() {
        for likelihood in Likelihood::ALL {
            for pair in C::ALL.windows(2) {
                assert!(resolve(likelihood, pair[0]) <= resolve(likelihood, pair[1]));
            }
        }
        for consequence in C::ALL {
            for pair in Likelihood::ALL.windows(2) {
                assert!(resolve(pair[0], consequence) <= resolve(pair[1], consequence));
            }
        }
    }

    #[test]
    fn incomplete_pair_is_not_applicable() {
        assert_eq!(resolve_partial(Some(Likelihood::Likely), None), RiskLevel::NotApplicable);
        assert_eq!(resolve_partial(None, Some(C::Major)), RiskLevel::NotApplicable);
        assert_eq!(resolve_partial(Some(Likelihood::Likely), Some(C::Major)), High);
    }

    #[test]
    fn step_down_clamps_at_the_bottom() {
        assert_eq!(Likelihood::Likely.step_down(), Likelihood::Possible);
        assert_eq!(Likelihood::Rare.step_down(), Likelihood::Rare);
        assert_eq!(C::Major.step_down(), C::Medium);
        assert_eq!(C::Minor.step_down(), C::Minor);
    }

    #[test]
    fn scales_serialize_as_snake_case() {
        let json = serde_json::to_string(&Likelihood::AlmostCertain).expect("serializes");
        assert_eq!(json, "\"almost_certain\"");
        let level: RiskLevel = serde_json::from_str("\"not_applicable\"").expect("parses");
        assert_eq!(level, RiskLevel::NotApplicable);
    }
}
