use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, fmt};

use crate::error::CoreError;

/// Risk tier derived from a 0-100 score. Ordered by ascending threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Safe,
    Caution,
    Warning,
    Danger,
}

impl RiskTier {
    pub const DANGER_THRESHOLD: u8 = 75;
    pub const WARNING_THRESHOLD: u8 = 50;
    pub const CAUTION_THRESHOLD: u8 = 30;

    /// Classify a score. Thresholds are inclusive lower bounds.
    pub const fn from_score(score: u8) -> Self {
        if score >= Self::DANGER_THRESHOLD {
            RiskTier::Danger
        } else if score >= Self::WARNING_THRESHOLD {
            RiskTier::Warning
        } else if score >= Self::CAUTION_THRESHOLD {
            RiskTier::Caution
        } else {
            RiskTier::Safe
        }
    }

    /// Lowest score that lands in this tier.
    pub const fn threshold(&self) -> u8 {
        match self {
            RiskTier::Safe => 0,
            RiskTier::Caution => Self::CAUTION_THRESHOLD,
            RiskTier::Warning => Self::WARNING_THRESHOLD,
            RiskTier::Danger => Self::DANGER_THRESHOLD,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Safe => "safe",
            RiskTier::Caution => "caution",
            RiskTier::Warning => "warning",
            RiskTier::Danger => "danger",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskTier::Safe => "안전",
            RiskTier::Caution => "주의",
            RiskTier::Warning => "경고",
            RiskTier::Danger => "위험",
        }
    }

    /// Map color used by the frontend.
    pub fn color(&self) -> &'static str {
        match self {
            RiskTier::Safe => "#2196F3",
            RiskTier::Caution => "#FFEB3B",
            RiskTier::Warning => "#FF9800",
            RiskTier::Danger => "#F44336",
        }
    }

    pub fn is_elevated(&self) -> bool {
        matches!(self, RiskTier::Warning | RiskTier::Danger)
    }

    pub const fn all() -> &'static [RiskTier] {
        &[RiskTier::Safe, RiskTier::Caution, RiskTier::Warning, RiskTier::Danger]
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for RiskTier {
    type Error = CoreError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "safe" => Ok(RiskTier::Safe),
            "caution" => Ok(RiskTier::Caution),
            "warning" => Ok(RiskTier::Warning),
            "danger" => Ok(RiskTier::Danger),
            _ => Err(CoreError::UnknownRiskTier(value.to_string())),
        }
    }
}

/// Vulnerability class whose perceived risk is scaled up from the base score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetGroup {
    #[default]
    General,
    Elderly,
    Child,
    #[serde(alias = "outdoor")]
    OutdoorWorker,
}

impl TargetGroup {
    /// Multiplier as an integer percentage, so adjustment stays exact.
    pub const fn multiplier_percent(&self) -> u32 {
        match self {
            TargetGroup::General => 100,
            TargetGroup::Elderly => 130,
            TargetGroup::Child => 125,
            TargetGroup::OutdoorWorker => 120,
        }
    }

    pub fn multiplier(&self) -> f64 {
        f64::from(self.multiplier_percent()) / 100.0
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetGroup::General => "general",
            TargetGroup::Elderly => "elderly",
            TargetGroup::Child => "child",
            TargetGroup::OutdoorWorker => "outdoor_worker",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TargetGroup::General => "일반 시민",
            TargetGroup::Elderly => "노인",
            TargetGroup::Child => "아동",
            TargetGroup::OutdoorWorker => "야외근로자",
        }
    }

    /// Audience description used when prompting a text-generation service.
    pub fn description(&self) -> &'static str {
        match self {
            TargetGroup::General => "일반 시민",
            TargetGroup::Elderly => "65세 이상 노인",
            TargetGroup::Child => "어린이 (12세 이하)",
            TargetGroup::OutdoorWorker => "야외 근로자",
        }
    }

    pub const fn all() -> &'static [TargetGroup] {
        &[
            TargetGroup::General,
            TargetGroup::Elderly,
            TargetGroup::Child,
            TargetGroup::OutdoorWorker,
        ]
    }
}

impl fmt::Display for TargetGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TargetGroup {
    type Error = CoreError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.trim().to_lowercase();

        match lower.as_str() {
            "general" => Ok(TargetGroup::General),
            "elderly" => Ok(TargetGroup::Elderly),
            "child" => Ok(TargetGroup::Child),
            "outdoor_worker" | "outdoor" => Ok(TargetGroup::OutdoorWorker),
            _ => Err(CoreError::UnknownTargetGroup(value.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_boundaries() {
        assert_eq!(RiskTier::from_score(0), RiskTier::Safe);
        assert_eq!(RiskTier::from_score(29), RiskTier::Safe);
        assert_eq!(RiskTier::from_score(30), RiskTier::Caution);
        assert_eq!(RiskTier::from_score(49), RiskTier::Caution);
        assert_eq!(RiskTier::from_score(50), RiskTier::Warning);
        assert_eq!(RiskTier::from_score(74), RiskTier::Warning);
        assert_eq!(RiskTier::from_score(75), RiskTier::Danger);
        assert_eq!(RiskTier::from_score(100), RiskTier::Danger);
    }

    #[test]
    fn tiers_are_ordered_by_threshold() {
        let tiers = RiskTier::all();
        for pair in tiers.windows(2) {
            assert!(pair[0] < pair[1]);
            assert!(pair[0].threshold() < pair[1].threshold());
        }
        for tier in tiers {
            assert_eq!(RiskTier::from_score(tier.threshold()), *tier);
        }
    }

    #[test]
    fn tier_as_str_roundtrip() {
        for tier in RiskTier::all() {
            let parsed = RiskTier::try_from(tier.as_str()).expect("roundtrip should succeed");
            assert_eq!(*tier, parsed);
        }
    }

    #[test]
    fn target_as_str_roundtrip() {
        for target in TargetGroup::all() {
            let parsed = TargetGroup::try_from(target.as_str()).expect("roundtrip should succeed");
            assert_eq!(*target, parsed);
        }
    }

    #[test]
    fn outdoor_alias_is_accepted() {
        assert_eq!(TargetGroup::try_from("outdoor").unwrap(), TargetGroup::OutdoorWorker);
        assert_eq!(TargetGroup::try_from(" Elderly ").unwrap(), TargetGroup::Elderly);

        let parsed: TargetGroup = serde_json::from_str("\"outdoor\"").unwrap();
        assert_eq!(parsed, TargetGroup::OutdoorWorker);
    }

    #[test]
    fn unknown_target_group_error() {
        let err = TargetGroup::try_from("teenager").unwrap_err();
        assert_eq!(err, CoreError::UnknownTargetGroup("teenager".into()));
    }

    #[test]
    fn multipliers_match_table() {
        assert_eq!(TargetGroup::General.multiplier(), 1.0);
        assert_eq!(TargetGroup::Elderly.multiplier(), 1.3);
        assert_eq!(TargetGroup::Child.multiplier(), 1.25);
        assert_eq!(TargetGroup::OutdoorWorker.multiplier(), 1.2);
    }

    #[test]
    fn tier_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&RiskTier::Warning).unwrap(), "\"warning\"");
        assert_eq!(RiskTier::Danger.label(), "위험");
        assert_eq!(RiskTier::Safe.color(), "#2196F3");
    }
}
