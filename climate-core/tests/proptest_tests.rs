//! Property-based tests for the scoring engine
//!
//! These tests use proptest to verify range, classification and monotonicity
//! invariants across many random observations.

use climate_core::{
    ClimateObservation, RiskTier, TargetGroup, adjust_score_for_target, apparent_temperature,
    climate_score, score::factor_scores, score_observation,
};
use proptest::prelude::*;

fn observation_strategy() -> impl Strategy<Value = ClimateObservation> {
    (
        -20.0f64..45.0,
        prop::option::of(-30.0f64..60.0),
        0.0f64..=100.0,
        0.0f64..400.0,
        0.0f64..250.0,
        0.0f64..14.0,
        0.0f64..25.0,
    )
        .prop_map(|(temperature, apparent, humidity, pm10, pm25, uv, surface_delta)| {
            ClimateObservation {
                temperature: Some(temperature),
                apparent_temperature: apparent,
                humidity: Some(humidity),
                pm10: Some(pm10),
                pm25: Some(pm25),
                uv_index: Some(uv),
                surface_temperature: Some(temperature + surface_delta),
                ..ClimateObservation::default()
            }
        })
}

fn score_of(obs: &ClimateObservation) -> u8 {
    climate_score(obs).0
}

// ============================================================================
// Range and classification
// ============================================================================

mod range_tests {
    use super::*;

    proptest! {
        #[test]
        fn score_is_within_bounds(obs in observation_strategy()) {
            let (score, _) = climate_score(&obs);
            prop_assert!(score <= 100);
        }

        #[test]
        fn arbitrary_floats_never_escape_range(
            values in prop::array::uniform7(any::<f64>())
        ) {
            let obs = ClimateObservation {
                temperature: Some(values[0]),
                apparent_temperature: Some(values[1]),
                humidity: Some(values[2]),
                pm10: Some(values[3]),
                pm25: Some(values[4]),
                uv_index: Some(values[5]),
                surface_temperature: Some(values[6]),
                ..ClimateObservation::default()
            };
            let (score, tier) = climate_score(&obs);
            prop_assert!(score <= 100);
            prop_assert_eq!(tier, RiskTier::from_score(score));
        }

        #[test]
        fn tier_matches_threshold_table(obs in observation_strategy()) {
            let (score, tier) = climate_score(&obs);
            let expected = if score >= 75 {
                RiskTier::Danger
            } else if score >= 50 {
                RiskTier::Warning
            } else if score >= 30 {
                RiskTier::Caution
            } else {
                RiskTier::Safe
            };
            prop_assert_eq!(tier, expected);
        }

        #[test]
        fn sub_scores_respect_caps(obs in observation_strategy()) {
            let b = factor_scores(&obs);
            prop_assert!((0.0..=40.0).contains(&b.apparent_temperature));
            prop_assert!((0.0..=20.0).contains(&b.pm10));
            prop_assert!((0.0..=15.0).contains(&b.pm25));
            prop_assert!((0.0..=10.0).contains(&b.humidity));
            prop_assert!((0.0..=10.0).contains(&b.uv_index));
            prop_assert!((0.0..=5.0).contains(&b.surface));
        }
    }
}

// ============================================================================
// Monotonicity, one factor at a time
// ============================================================================

mod monotonicity_tests {
    use super::*;

    proptest! {
        #[test]
        fn apparent_temperature_never_lowers_score(
            obs in observation_strategy(),
            a in -30.0f64..60.0,
            b in -30.0f64..60.0,
        ) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let low = score_of(&obs.clone().with_apparent_temperature(lo));
            let high = score_of(&obs.with_apparent_temperature(hi));
            prop_assert!(low <= high);
        }

        #[test]
        fn uv_index_never_lowers_score(
            obs in observation_strategy(),
            a in 0.0f64..15.0,
            b in 0.0f64..15.0,
        ) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let low = score_of(&obs.clone().with_uv_index(lo));
            let high = score_of(&obs.with_uv_index(hi));
            prop_assert!(low <= high);
        }

        #[test]
        fn surface_heating_never_lowers_score(
            obs in observation_strategy(),
            a in 0.0f64..30.0,
            b in 0.0f64..30.0,
        ) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let t = obs.temperature_or_default();
            let low = score_of(&obs.clone().with_surface_temperature(t + lo));
            let high = score_of(&obs.with_surface_temperature(t + hi));
            prop_assert!(low <= high);
        }

        // The lowest band (pm10 / 6) ends just above 5 at 31, so monotonicity
        // is checked from the first breakpoint upward.
        #[test]
        fn pm10_never_lowers_score_above_first_band(
            obs in observation_strategy(),
            a in 31.0f64..500.0,
            b in 31.0f64..500.0,
        ) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let low = score_of(&obs.clone().with_pm10(lo));
            let high = score_of(&obs.with_pm10(hi));
            prop_assert!(low <= high);
        }

        #[test]
        fn pm25_never_lowers_score_above_first_band(
            obs in observation_strategy(),
            a in 16.0f64..300.0,
            b in 16.0f64..300.0,
        ) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let low = score_of(&obs.clone().with_pm25(lo));
            let high = score_of(&obs.with_pm25(hi));
            prop_assert!(low <= high);
        }

        #[test]
        fn humidity_score_grows_away_from_comfort(
            obs in observation_strategy(),
            a in 50.0f64..=100.0,
            b in 50.0f64..=100.0,
        ) {
            // A derived apparent temperature moves with humidity; pin it.
            let obs = obs.with_apparent_temperature(30.0);
            let (near, far) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(score_of(&obs.clone().with_humidity(near)) <= score_of(&obs.clone().with_humidity(far)));

            let (near_dry, far_dry) = (100.0 - near, 100.0 - far);
            prop_assert!(score_of(&obs.clone().with_humidity(near_dry)) <= score_of(&obs.with_humidity(far_dry)));
        }
    }
}

// ============================================================================
// Target-group adjustment
// ============================================================================

mod adjustment_tests {
    use super::*;

    proptest! {
        #[test]
        fn general_is_identity(s in 0u8..=100) {
            prop_assert_eq!(adjust_score_for_target(s, TargetGroup::General), s);
        }

        #[test]
        fn elderly_matches_floor_formula(s in 0u8..=100) {
            let expected = (f64::from(s) * 1.3).floor().min(100.0) as u8;
            prop_assert_eq!(adjust_score_for_target(s, TargetGroup::Elderly), expected);
        }

        #[test]
        fn adjustment_never_lowers_or_exceeds_cap(s in 0u8..=100) {
            for target in TargetGroup::all() {
                let adjusted = adjust_score_for_target(s, *target);
                prop_assert!(adjusted >= s);
                prop_assert!(adjusted <= 100);
            }
        }

        #[test]
        fn displayed_tier_follows_adjusted_score(obs in observation_strategy()) {
            for target in TargetGroup::all() {
                let result = score_observation(&obs, Some(*target));
                let adjusted = result.adjusted_score.unwrap_or_default();
                prop_assert_eq!(result.risk_tier, RiskTier::from_score(adjusted));
                prop_assert_eq!(result.base_tier(), climate_score(&obs).1);
                prop_assert!(result.risk_tier >= result.base_tier());
            }
        }
    }
}

// ============================================================================
// Apparent temperature estimator
// ============================================================================

mod apparent_temperature_tests {
    use super::*;

    proptest! {
        #[test]
        fn cool_branch_subtracts_wind(t in -30.0f64..26.99, h in 0.0f64..=100.0, w in 0.0f64..20.0) {
            let apparent = apparent_temperature(t, h, w);
            prop_assert!((apparent - (t - 0.7 * w)).abs() < 1e-9);
        }

        #[test]
        fn heat_branch_is_rounded_to_one_decimal(t in 27.0f64..50.0, h in 0.0f64..=100.0) {
            let apparent = apparent_temperature(t, h, 2.0);
            let tenths = apparent * 10.0;
            prop_assert!((tenths - tenths.round()).abs() < 1e-6);
        }
    }

    #[test]
    fn boundary_uses_heat_branch() {
        // Wind-chill branch would give 25.6.
        assert_eq!(apparent_temperature(27.0, 50.0, 2.0), 28.9);
    }
}
