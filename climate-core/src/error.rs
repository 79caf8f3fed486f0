use thiserror::Error;

/// Typed failures surfaced to callers of the core.
///
/// Scoring itself never fails; these cover lookups that must be validated
/// before an observation is scored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("Region not found: '{0}'. Run `climate regions` to list supported districts.")]
    RegionNotFound(String),

    #[error("Region '{0}' appears more than once in the input.")]
    DuplicateRegion(String),

    #[error(
        "Unknown target group '{0}'. Supported groups: general, elderly, child, outdoor_worker."
    )]
    UnknownTargetGroup(String),

    #[error("Unknown risk tier '{0}'. Supported tiers: safe, caution, warning, danger.")]
    UnknownRiskTier(String),
}
