//! Perceived climate score.
//!
//! Six capped sub-scores are summed into a 0-100 score (higher is riskier):
//! apparent temperature 40, PM10 20, PM2.5 15, humidity 10, UV index 10 and
//! surface-air temperature difference 5.

use serde::Serialize;
use tracing::debug;

use crate::{
    model::{ClimateObservation, ScoreResult},
    risk::{RiskTier, TargetGroup},
};

/// Wind speed assumed when none was observed, m/s.
pub const DEFAULT_WIND_SPEED: f64 = 2.0;

pub const APPARENT_TEMPERATURE_CAP: f64 = 40.0;
pub const PM10_CAP: f64 = 20.0;
pub const PM25_CAP: f64 = 15.0;
pub const HUMIDITY_CAP: f64 = 10.0;
pub const UV_INDEX_CAP: f64 = 10.0;
pub const SURFACE_CAP: f64 = 5.0;

/// Feels-like temperature in °C.
///
/// Below 27 °C a wind correction is applied; from 27 °C up a simplified heat
/// index, rounded to one decimal.
pub fn apparent_temperature(temperature: f64, humidity: f64, wind_speed: f64) -> f64 {
    if temperature < 27.0 {
        return temperature - 0.7 * wind_speed;
    }

    let vapour = humidity / 100.0 * 6.105 * (17.27 * temperature / (237.7 + temperature)).exp();
    let heat_index = temperature + 0.33 * vapour - 4.0;

    (heat_index * 10.0).round() / 10.0
}

/// Per-factor contributions before summing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FactorBreakdown {
    pub apparent_temperature: f64,
    pub pm10: f64,
    pub pm25: f64,
    pub humidity: f64,
    pub uv_index: f64,
    pub surface: f64,
}

impl FactorBreakdown {
    pub fn total(&self) -> f64 {
        self.apparent_temperature + self.pm10 + self.pm25 + self.humidity + self.uv_index + self.surface
    }
}

/// Clamp a sub-score into `[0, max]`; NaN contributes nothing.
fn cap(value: f64, max: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, max) }
}

pub fn apparent_temperature_score(apparent: f64) -> f64 {
    let raw = if apparent >= 41.0 {
        40.0
    } else if apparent >= 35.0 {
        30.0 + (apparent - 35.0) * 1.67
    } else if apparent >= 31.0 {
        20.0 + (apparent - 31.0) * 2.5
    } else if apparent >= 27.0 {
        10.0 + (apparent - 27.0) * 2.5
    } else {
        apparent - 17.0
    };

    cap(raw, APPARENT_TEMPERATURE_CAP)
}

pub fn pm10_score(pm10: f64) -> f64 {
    let raw = if pm10 >= 151.0 {
        20.0
    } else if pm10 >= 81.0 {
        15.0 + (pm10 - 81.0) * 0.07
    } else if pm10 >= 31.0 {
        5.0 + (pm10 - 31.0) * 0.2
    } else {
        pm10 / 6.0
    };

    cap(raw, PM10_CAP)
}

pub fn pm25_score(pm25: f64) -> f64 {
    let raw = if pm25 >= 76.0 {
        15.0
    } else if pm25 >= 36.0 {
        10.0 + (pm25 - 36.0) * 0.125
    } else if pm25 >= 16.0 {
        5.0 + (pm25 - 16.0) * 0.25
    } else {
        pm25 / 3.0
    };

    cap(raw, PM25_CAP)
}

/// Bands are checked in priority order; the first match wins.
pub fn humidity_score(humidity: f64) -> f64 {
    if humidity >= 80.0 || humidity <= 20.0 {
        10.0
    } else if humidity >= 70.0 || humidity <= 30.0 {
        6.0
    } else if humidity >= 60.0 || humidity <= 40.0 {
        3.0
    } else {
        0.0
    }
}

pub fn uv_index_score(uv: f64) -> f64 {
    let raw = if uv >= 11.0 {
        10.0
    } else if uv >= 8.0 {
        7.0 + (uv - 8.0)
    } else if uv >= 6.0 {
        4.0 + (uv - 6.0) * 1.5
    } else if uv >= 3.0 {
        (uv - 3.0) * 1.33
    } else {
        0.0
    };

    cap(raw, UV_INDEX_CAP)
}

/// Scored on how much hotter the ground is than the air.
pub fn surface_score(surface_temperature: f64, temperature: f64) -> f64 {
    let diff = surface_temperature - temperature;

    if diff >= 15.0 {
        5.0
    } else if diff >= 10.0 {
        3.0
    } else if diff >= 5.0 {
        1.0
    } else {
        0.0
    }
}

pub fn factor_scores(observation: &ClimateObservation) -> FactorBreakdown {
    FactorBreakdown {
        apparent_temperature: apparent_temperature_score(observation.resolved_apparent_temperature()),
        pm10: pm10_score(observation.pm10_or_default()),
        pm25: pm25_score(observation.pm25_or_default()),
        humidity: humidity_score(observation.humidity_or_default()),
        uv_index: uv_index_score(observation.uv_index_or_default()),
        surface: surface_score(
            observation.surface_temperature_or_default(),
            observation.temperature_or_default(),
        ),
    }
}

/// Score an observation: floor of the summed sub-scores, clamped to 0-100.
pub fn climate_score(observation: &ClimateObservation) -> (u8, RiskTier) {
    let breakdown = factor_scores(observation);
    let total = breakdown.total();
    let score = cap(total.floor(), 100.0) as u8;
    let tier = RiskTier::from_score(score);

    debug!(?breakdown, total, score, %tier, "scored observation");

    (score, tier)
}

/// `min(100, floor(base_score * multiplier))`.
pub fn adjust_score_for_target(base_score: u8, target: TargetGroup) -> u8 {
    let adjusted = u32::from(base_score) * target.multiplier_percent() / 100;
    adjusted.min(100) as u8
}

/// Score an observation, adjusting for `target` when one was requested.
///
/// `risk_tier` follows the displayed score; the base tier stays available
/// through [`ScoreResult::base_tier`].
pub fn score_observation(observation: &ClimateObservation, target: Option<TargetGroup>) -> ScoreResult {
    let (base_score, base_tier) = climate_score(observation);

    match target {
        Some(target) => {
            let adjusted = adjust_score_for_target(base_score, target);
            ScoreResult {
                base_score,
                adjusted_score: Some(adjusted),
                risk_tier: RiskTier::from_score(adjusted),
            }
        }
        None => ScoreResult {
            base_score,
            adjusted_score: None,
            risk_tier: base_tier,
        },
    }
}
