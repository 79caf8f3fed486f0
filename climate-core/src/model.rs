use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::CoreError,
    region::{Region, find_region},
    risk::{RiskTier, TargetGroup},
    score,
};

pub const DEFAULT_TEMPERATURE: f64 = 25.0;
pub const DEFAULT_APPARENT_TEMPERATURE: f64 = 25.0;
pub const DEFAULT_HUMIDITY: f64 = 50.0;
pub const DEFAULT_PM10: f64 = 30.0;
pub const DEFAULT_PM25: f64 = 15.0;
pub const DEFAULT_UV_INDEX: f64 = 6.0;
/// Surface temperature defaults to air temperature plus this offset.
pub const DEFAULT_SURFACE_OFFSET: f64 = 5.0;

/// One weather / air-quality reading for a district.
///
/// Every field is optional; the resolved accessors apply the scoring defaults,
/// so partial data from any source can be scored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClimateObservation {
    /// Air temperature, °C.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Feels-like temperature, °C.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apparent_temperature: Option<f64>,
    /// Relative humidity, %.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,
    /// µg/m³
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pm10: Option<f64>,
    /// µg/m³
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pm25: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uv_index: Option<f64>,
    /// Land surface temperature, °C.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surface_temperature: Option<f64>,
    /// m/s
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind_speed: Option<f64>,
    /// mm
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precipitation: Option<f64>,
}

impl ClimateObservation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_temperature(mut self, value: f64) -> Self {
        self.temperature = Some(value);
        self
    }

    pub fn with_apparent_temperature(mut self, value: f64) -> Self {
        self.apparent_temperature = Some(value);
        self
    }

    pub fn with_humidity(mut self, value: f64) -> Self {
        self.humidity = Some(value);
        self
    }

    pub fn with_pm10(mut self, value: f64) -> Self {
        self.pm10 = Some(value);
        self
    }

    pub fn with_pm25(mut self, value: f64) -> Self {
        self.pm25 = Some(value);
        self
    }

    pub fn with_uv_index(mut self, value: f64) -> Self {
        self.uv_index = Some(value);
        self
    }

    pub fn with_surface_temperature(mut self, value: f64) -> Self {
        self.surface_temperature = Some(value);
        self
    }

    pub fn with_wind_speed(mut self, value: f64) -> Self {
        self.wind_speed = Some(value);
        self
    }

    pub fn with_precipitation(mut self, value: f64) -> Self {
        self.precipitation = Some(value);
        self
    }

    pub fn temperature_or_default(&self) -> f64 {
        self.temperature.unwrap_or(DEFAULT_TEMPERATURE)
    }

    /// Explicit apparent temperature if present, otherwise estimated from
    /// temperature, humidity and wind. Falls back to the default when there is
    /// no air temperature to estimate from.
    pub fn resolved_apparent_temperature(&self) -> f64 {
        if let Some(apparent) = self.apparent_temperature {
            return apparent;
        }

        match self.temperature {
            Some(t) => score::apparent_temperature(
                t,
                self.humidity_or_default(),
                self.wind_speed.unwrap_or(score::DEFAULT_WIND_SPEED),
            ),
            None => DEFAULT_APPARENT_TEMPERATURE,
        }
    }

    pub fn humidity_or_default(&self) -> f64 {
        self.humidity.unwrap_or(DEFAULT_HUMIDITY)
    }

    pub fn pm10_or_default(&self) -> f64 {
        self.pm10.unwrap_or(DEFAULT_PM10)
    }

    pub fn pm25_or_default(&self) -> f64 {
        self.pm25.unwrap_or(DEFAULT_PM25)
    }

    pub fn uv_index_or_default(&self) -> f64 {
        self.uv_index.unwrap_or(DEFAULT_UV_INDEX)
    }

    pub fn surface_temperature_or_default(&self) -> f64 {
        self.surface_temperature
            .unwrap_or_else(|| self.temperature_or_default() + DEFAULT_SURFACE_OFFSET)
    }
}

/// Base score, optional target-adjusted score and the tier of whichever is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    #[serde(rename = "score")]
    pub base_score: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adjusted_score: Option<u8>,
    pub risk_tier: RiskTier,
}

impl ScoreResult {
    /// Adjusted score when a target was requested, otherwise the base score.
    pub fn displayed_score(&self) -> u8 {
        self.adjusted_score.unwrap_or(self.base_score)
    }

    pub fn base_tier(&self) -> RiskTier {
        RiskTier::from_score(self.base_score)
    }

    pub fn adjusted_tier(&self) -> Option<RiskTier> {
        self.adjusted_score.map(RiskTier::from_score)
    }
}

/// Natural-language explanation plus discrete action guides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explanation {
    pub explanation: String,
    pub action_guides: Vec<String>,
}

/// Everything a caller needs to render one district on the map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClimateReport {
    pub region: String,
    pub code: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(flatten)]
    pub result: ScoreResult,
    pub risk_label: String,
    pub risk_color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<TargetGroup>,
    pub climate_data: ClimateObservation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<Explanation>,
    pub generated_at: DateTime<Utc>,
}

impl ClimateReport {
    /// Score `observation` for `region`. The region must already be resolved.
    pub fn build(
        region: &Region,
        observation: ClimateObservation,
        target: Option<TargetGroup>,
    ) -> Self {
        let result = score::score_observation(&observation, target);

        Self {
            region: region.name.to_string(),
            code: region.code.to_string(),
            lat: region.lat,
            lng: region.lng,
            result,
            risk_label: result.risk_tier.label().to_string(),
            risk_color: result.risk_tier.color().to_string(),
            target,
            climate_data: observation,
            explanation: None,
            generated_at: Utc::now(),
        }
    }

    /// Resolve `region_name` first; an unknown region is never scored.
    pub fn for_region(
        region_name: &str,
        observation: ClimateObservation,
        target: Option<TargetGroup>,
    ) -> Result<Self, CoreError> {
        let region = find_region(region_name)?;
        Ok(Self::build(region, observation, target))
    }

    pub fn with_explanation(mut self, explanation: Explanation) -> Self {
        self.explanation = Some(explanation);
        self
    }
}

/// Score many districts at once and rank them, riskiest first.
///
/// Every key (name or code) is resolved before anything is scored; an unknown
/// or repeated district fails the whole batch. Ties keep administrative-code
/// order.
pub fn rank_regions<I, K>(
    observations: I,
    target: Option<TargetGroup>,
) -> Result<Vec<ClimateReport>, CoreError>
where
    I: IntoIterator<Item = (K, ClimateObservation)>,
    K: AsRef<str>,
{
    let mut resolved: Vec<(&'static Region, ClimateObservation)> = Vec::new();

    for (key, observation) in observations {
        let region = find_region(key.as_ref())?;
        if resolved.iter().any(|(seen, _)| seen.code == region.code) {
            return Err(CoreError::DuplicateRegion(region.name.to_string()));
        }
        resolved.push((region, observation));
    }

    let mut reports: Vec<ClimateReport> = resolved
        .into_iter()
        .map(|(region, observation)| ClimateReport::build(region, observation, target))
        .collect();

    reports.sort_by(|a, b| {
        b.result
            .displayed_score()
            .cmp(&a.result.displayed_score())
            .then_with(|| a.code.cmp(&b.code))
    });

    Ok(reports)
}
