//! Core library for the Gyeonggi perceived climate risk map.
//!
//! This crate defines:
//! - The climate scoring engine (apparent temperature, 0-100 score, risk tiers)
//! - Target-group adjustment for vulnerable populations
//! - District metadata, action guides and explanation generation
//! - Configuration handling
//!
//! It is used by `climate-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod explain;
pub mod guide;
pub mod model;
pub mod region;
pub mod risk;
pub mod score;

pub use config::{Config, TextGenerationConfig};
pub use error::CoreError;
pub use explain::{Explainer, ExplainRequest, explainer_from_config};
pub use model::{ClimateObservation, ClimateReport, Explanation, ScoreResult, rank_regions};
pub use region::{Region, find_region, regions};
pub use risk::{RiskTier, TargetGroup};
pub use score::{adjust_score_for_target, apparent_temperature, climate_score, score_observation};
