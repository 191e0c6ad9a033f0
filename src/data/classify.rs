//! Sensor health classification.
//!
//! A sensor's readings for the window are reduced to one [`HealthState`] by
//! fixed rules, first match wins:
//!
//! 1. empty, or every reading is the no-data sentinel: `Dead`
//! 2. at least one sentinel: `Intermittent`
//! 3. at least one reading outside `[valid_min, valid_max)`: `Outlier`
//! 4. otherwise `Healthy`
//!
//! `Removed` is never produced here; see [`super::reconcile`].

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};
use soilwatch_types::{HealthState, Reading, SensorKind, SensorSeries};

/// No-data value written by the loggers for both sensor kinds.
pub const NO_DATA_SENTINEL: Reading = -9999.0;

/// Sentinel and valid physical range for one sensor kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorProfile {
    /// Reading that means "no data captured".
    pub sentinel: Reading,
    /// Inclusive lower bound of valid readings.
    pub valid_min: Reading,
    /// Exclusive upper bound of valid readings.
    pub valid_max: Reading,
}

impl SensorProfile {
    pub const fn new(sentinel: Reading, valid_min: Reading, valid_max: Reading) -> Self {
        Self {
            sentinel,
            valid_min,
            valid_max,
        }
    }

    /// 5TM volumetric water content / temperature.
    pub const fn five_tm() -> Self {
        Self::new(NO_DATA_SENTINEL, -2.0, 102.0)
    }

    /// MPS-2 water potential (kPa).
    pub const fn mps2() -> Self {
        Self::new(NO_DATA_SENTINEL, -750.0, -3.75)
    }

    pub fn is_sentinel(&self, reading: Reading) -> bool {
        reading == self.sentinel
    }

    pub fn in_range(&self, reading: Reading) -> bool {
        reading >= self.valid_min && reading < self.valid_max
    }

    /// Check that the profile can classify anything meaningfully.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.sentinel.is_finite() && self.valid_min.is_finite() && self.valid_max.is_finite(),
            "sensor profile values must be finite: {:?}",
            self
        );
        ensure!(
            self.valid_min < self.valid_max,
            "valid_min ({}) must be below valid_max ({})",
            self.valid_min,
            self.valid_max
        );
        Ok(())
    }
}

/// Per-kind classification parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub five_tm: SensorProfile,
    pub mps2: SensorProfile,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            five_tm: SensorProfile::five_tm(),
            mps2: SensorProfile::mps2(),
        }
    }
}

impl Thresholds {
    pub fn profile(&self, kind: SensorKind) -> &SensorProfile {
        match kind {
            SensorKind::FiveTm => &self.five_tm,
            SensorKind::Mps2 => &self.mps2,
        }
    }

    pub fn validate(&self) -> Result<()> {
        for kind in SensorKind::ALL {
            self.profile(kind)
                .validate()
                .map_err(|e| e.context(format!("invalid {} thresholds", kind)))?;
        }
        Ok(())
    }
}

/// Classify a reading sequence against a profile.
pub fn classify_readings(readings: &[Reading], profile: &SensorProfile) -> HealthState {
    if readings.iter().all(|&r| profile.is_sentinel(r)) {
        // Also covers the empty series.
        return HealthState::Dead;
    }

    if readings.iter().any(|&r| profile.is_sentinel(r)) {
        return HealthState::Intermittent;
    }

    if readings.iter().any(|&r| !profile.in_range(r)) {
        return HealthState::Outlier;
    }

    HealthState::Healthy
}

/// Health classifier configured with a threshold table.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    thresholds: Thresholds,
}

impl Classifier {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Classify one sensor's series.
    pub fn classify(&self, kind: SensorKind, series: &SensorSeries) -> HealthState {
        classify_readings(series.readings(), self.thresholds.profile(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const S: Reading = NO_DATA_SENTINEL;

    fn five_tm(readings: &[Reading]) -> HealthState {
        classify_readings(readings, &SensorProfile::five_tm())
    }

    fn mps2(readings: &[Reading]) -> HealthState {
        classify_readings(readings, &SensorProfile::mps2())
    }

    #[test]
    fn test_all_sentinel_is_dead() {
        assert_eq!(five_tm(&[S, S, S]), HealthState::Dead);
        assert_eq!(five_tm(&[S]), HealthState::Dead);
        assert_eq!(mps2(&[S, S]), HealthState::Dead);
    }

    #[test]
    fn test_empty_series_is_dead() {
        assert_eq!(five_tm(&[]), HealthState::Dead);
        assert_eq!(mps2(&[]), HealthState::Dead);
    }

    #[test]
    fn test_any_sentinel_is_intermittent() {
        assert_eq!(five_tm(&[5.0, S, 7.2]), HealthState::Intermittent);
        assert_eq!(five_tm(&[S, 5.0, 7.2]), HealthState::Intermittent);
        assert_eq!(five_tm(&[5.0, 7.2, S]), HealthState::Intermittent);
        assert_eq!(mps2(&[-100.0, S]), HealthState::Intermittent);
    }

    #[test]
    fn test_intermittent_takes_precedence_over_outlier() {
        assert_eq!(five_tm(&[150.0, S]), HealthState::Intermittent);
        assert_eq!(mps2(&[S, 0.0]), HealthState::Intermittent);
    }

    #[test]
    fn test_out_of_range_is_outlier() {
        assert_eq!(five_tm(&[5.0, 150.0, 7.2]), HealthState::Outlier);
        assert_eq!(five_tm(&[-2.5]), HealthState::Outlier);
        assert_eq!(mps2(&[-100.0, -800.0]), HealthState::Outlier);
        assert_eq!(mps2(&[-100.0, 5.0]), HealthState::Outlier);
    }

    #[test]
    fn test_in_range_is_healthy() {
        assert_eq!(five_tm(&[5.0, 6.1, 7.2]), HealthState::Healthy);
        assert_eq!(mps2(&[-10.0, -500.0, -3.8]), HealthState::Healthy);
    }

    #[test]
    fn test_range_bounds() {
        // Lower bound inclusive, upper bound exclusive.
        assert_eq!(five_tm(&[-2.0]), HealthState::Healthy);
        assert_eq!(five_tm(&[102.0]), HealthState::Outlier);
        assert_eq!(five_tm(&[101.99]), HealthState::Healthy);
        assert_eq!(mps2(&[-750.0]), HealthState::Healthy);
        assert_eq!(mps2(&[-3.75]), HealthState::Outlier);
    }

    #[test]
    fn test_positive_sentinel_is_just_an_outlier() {
        assert_eq!(mps2(&[-100.0, 9999.0]), HealthState::Outlier);
    }

    #[test]
    fn test_classifier_uses_kind_profile() {
        let classifier = Classifier::default();
        let series = SensorSeries::from(vec![-100.0, -200.0]);
        assert_eq!(
            classifier.classify(SensorKind::FiveTm, &series),
            HealthState::Outlier
        );
        assert_eq!(
            classifier.classify(SensorKind::Mps2, &series),
            HealthState::Healthy
        );
    }

    #[test]
    fn test_custom_thresholds() {
        let thresholds = Thresholds {
            five_tm: SensorProfile::new(-1.0, 0.0, 50.0),
            ..Thresholds::default()
        };
        let classifier = Classifier::new(thresholds);
        let series = SensorSeries::from(vec![-1.0, 10.0]);
        assert_eq!(
            classifier.classify(SensorKind::FiveTm, &series),
            HealthState::Intermittent
        );
    }

    #[test]
    fn test_threshold_validation() {
        assert!(Thresholds::default().validate().is_ok());

        let inverted = Thresholds {
            mps2: SensorProfile::new(S, -3.75, -750.0),
            ..Thresholds::default()
        };
        assert!(inverted.validate().is_err());

        let nan = Thresholds {
            five_tm: SensorProfile::new(f64::NAN, -2.0, 102.0),
            ..Thresholds::default()
        };
        assert!(nan.validate().is_err());
    }

    fn five_tm_in_range() -> impl Strategy<Value = Vec<Reading>> {
        prop::collection::vec(-2.0f64..102.0, 0..32)
    }

    fn five_tm_out_of_range() -> impl Strategy<Value = Reading> {
        prop_oneof![-1000.0f64..-2.0, 102.0f64..1000.0]
    }

    proptest! {
        #[test]
        fn property_sentinel_only_is_dead(len in 0usize..64) {
            prop_assert_eq!(five_tm(&vec![S; len]), HealthState::Dead);
            prop_assert_eq!(mps2(&vec![S; len]), HealthState::Dead);
        }

        #[test]
        fn property_sentinel_anywhere_is_intermittent(
            mut readings in prop::collection::vec(-2.0f64..102.0, 1..32),
            outlier in prop::option::of(five_tm_out_of_range()),
            at in any::<prop::sample::Index>(),
        ) {
            if let Some(value) = outlier {
                readings.push(value);
            }
            let position = at.index(readings.len() + 1);
            readings.insert(position, S);
            prop_assert_eq!(five_tm(&readings), HealthState::Intermittent);
        }

        #[test]
        fn property_out_of_range_value_is_outlier(
            mut readings in five_tm_in_range(),
            value in five_tm_out_of_range(),
            at in any::<prop::sample::Index>(),
        ) {
            let position = at.index(readings.len() + 1);
            readings.insert(position, value);
            prop_assert_eq!(five_tm(&readings), HealthState::Outlier);
        }

        #[test]
        fn property_in_range_is_healthy(
            readings in prop::collection::vec(-750.0f64..-3.75, 1..32),
        ) {
            prop_assert_eq!(mps2(&readings), HealthState::Healthy);
        }
    }
}
