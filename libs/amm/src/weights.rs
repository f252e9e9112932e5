//! Weight validation and time-based weight schedules
//!
//! A schedule moves every weight linearly from its start weight to its target
//! between `start_time` and `end_time` (unix seconds). Start weights live in
//! the schedule, so the pool's static weights only ever hold validated
//! vectors. Reads never mutate; the engine folds a finished schedule into the
//! static weights at its next state-changing operation.

use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use wamm_types::{PoolError, SCALE};

/// Pending linear move of all weights towards `target_weights`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightSchedule {
    pub start_time: u64,
    pub end_time: u64,
    /// Weights at `start_time`; empty means "the static weights"
    #[serde(default)]
    pub start_weights: Vec<u64>,
    pub target_weights: Vec<u64>,
}

/// Snapshot of a schedule for reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleStatus {
    pub start_time: u64,
    pub end_time: u64,
    /// Seconds until the targets are fully in effect
    pub time_left: u64,
    pub start_weights: Vec<u64>,
    pub target_weights: Vec<u64>,
}

impl WeightSchedule {
    pub fn new(
        now: u64,
        duration: u64,
        start_weights: Vec<u64>,
        target_weights: Vec<u64>,
    ) -> Self {
        Self {
            start_time: now,
            end_time: now.saturating_add(duration),
            start_weights,
            target_weights,
        }
    }

    /// A zero start or end time marks an unset schedule
    pub fn is_active(&self) -> bool {
        self.start_time != 0 && self.end_time != 0
    }

    /// Targets are fully in effect at `now`
    pub fn is_complete(&self, now: u64) -> bool {
        self.is_active() && now >= self.end_time
    }

    /// Seconds remaining until `end_time`, zero once reached
    pub fn interpolation_time_left(&self, now: u64) -> u64 {
        self.end_time.saturating_sub(now)
    }

    /// Effective weight of asset `index` given its static weight
    pub fn weight_at(&self, index: usize, static_weight: u64, now: u64) -> u64 {
        let Some(&target) = self.target_weights.get(index) else {
            return static_weight;
        };
        if !self.is_active() {
            return static_weight;
        }

        let start = self.start_weights.get(index).copied().unwrap_or(static_weight);
        if now <= self.start_time {
            start
        } else if now >= self.end_time {
            target
        } else {
            interpolate(start, target, self.start_time, self.end_time, now)
        }
    }

    pub fn status(&self, now: u64) -> ScheduleStatus {
        ScheduleStatus {
            start_time: self.start_time,
            end_time: self.end_time,
            time_left: self.interpolation_time_left(now),
            start_weights: self.start_weights.clone(),
            target_weights: self.target_weights.clone(),
        }
    }
}

/// Linear interpolation between `start` and `target`, rounding towards `start`
///
/// Callers guarantee `start_time < now < end_time`.
pub fn interpolate(start: u64, target: u64, start_time: u64, end_time: u64, now: u64) -> u64 {
    let elapsed = (now - start_time) as u128;
    let total = (end_time - start_time) as u128;
    let delta = start.abs_diff(target) as u128;
    // delta * elapsed / total <= delta, so the narrowing is lossless
    let offset = (delta * elapsed / total) as u64;

    if target >= start {
        start + offset
    } else {
        start - offset
    }
}

/// Push the rounding residual onto the largest weight so the sum is `SCALE`
///
/// Interpolated weights each round towards their start value, so a snapshot
/// taken mid-schedule can drift from `SCALE` by up to one unit per asset.
pub fn normalize_weights(weights: &mut [u64]) {
    let sum: u128 = weights.iter().map(|&w| w as u128).sum();
    let largest = (0..weights.len()).max_by_key(|&index| (weights[index], Reverse(index)));
    let Some(largest) = largest else {
        return;
    };

    let residual = sum.abs_diff(SCALE as u128);
    let residual = u64::try_from(residual).unwrap_or(u64::MAX);
    if sum < SCALE as u128 {
        weights[largest] = weights[largest].saturating_add(residual);
    } else {
        weights[largest] = weights[largest].saturating_sub(residual);
    }
}

/// Check a weight vector: right length, no zero entries, sums to `SCALE`
/// within `tolerance`
pub fn validate_weights(
    weights: &[u64],
    expected_len: usize,
    tolerance: u64,
) -> Result<(), PoolError> {
    if weights.len() != expected_len {
        return Err(PoolError::LengthMismatch {
            expected: expected_len,
            actual: weights.len(),
        });
    }

    if let Some(index) = weights.iter().position(|&w| w == 0) {
        return Err(PoolError::ZeroWeight { index });
    }

    let sum: u128 = weights.iter().map(|&w| w as u128).sum();
    if sum.abs_diff(SCALE as u128) > tolerance as u128 {
        return Err(PoolError::InvalidWeightSum {
            sum: u64::try_from(sum).unwrap_or(u64::MAX),
            expected: SCALE,
            tolerance,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const T0: u64 = 1_700_000_000;

    #[test]
    fn test_weight_at_follows_schedule() {
        let schedule =
            WeightSchedule::new(T0, 100, vec![800_000, 200_000], vec![200_000, 800_000]);

        assert_eq!(schedule.weight_at(0, 800_000, T0), 800_000);
        assert_eq!(schedule.weight_at(0, 800_000, T0 + 50), 500_000);
        assert_eq!(schedule.weight_at(1, 200_000, T0 + 50), 500_000);
        assert_eq!(schedule.weight_at(0, 800_000, T0 + 100), 200_000);
        assert_eq!(schedule.weight_at(0, 800_000, T0 + 10_000), 200_000);
    }

    #[test]
    fn test_interpolation_rounds_towards_start() {
        // 1/3 of the way from 0.5 to 0.6 is 0.533333...
        assert_eq!(interpolate(500_000, 600_000, 0, 3, 1), 533_333);
        assert_eq!(interpolate(600_000, 500_000, 0, 3, 1), 566_667);
    }

    #[test]
    fn test_unset_schedule_is_inactive() {
        let schedule = WeightSchedule {
            start_time: 0,
            end_time: 0,
            start_weights: vec![3, 4],
            target_weights: vec![1, 2],
        };
        assert!(!schedule.is_active());
        assert!(!schedule.is_complete(T0));
        assert_eq!(schedule.weight_at(0, 500_000, T0), 500_000);
    }

    #[test]
    fn test_time_left() {
        let schedule = WeightSchedule::new(T0, 60, vec![], vec![500_000, 500_000]);
        assert_eq!(schedule.interpolation_time_left(T0), 60);
        assert_eq!(schedule.interpolation_time_left(T0 + 45), 15);
        assert_eq!(schedule.interpolation_time_left(T0 + 600), 0);
        assert_eq!(schedule.status(T0 + 45).time_left, 15);
    }

    #[test]
    fn test_weight_at_starts_from_snapshot() {
        let schedule =
            WeightSchedule::new(T0, 10, vec![650_000, 350_000], vec![200_000, 800_000]);

        // Static weights are ignored once a snapshot is present
        assert_eq!(schedule.weight_at(0, 800_000, T0), 650_000);
        assert_eq!(schedule.weight_at(0, 800_000, T0 + 5), 425_000);
        assert_eq!(schedule.weight_at(1, 200_000, T0 + 5), 575_000);
        assert_eq!(schedule.status(T0).start_weights, vec![650_000, 350_000]);
    }

    #[test]
    fn test_normalize_weights() {
        let mut drifted = vec![100_008, 100_000, 100_000, 100_000, 100_000];
        drifted.extend([100_000; 5]);
        normalize_weights(&mut drifted);
        assert_eq!(drifted[0], 100_000);
        assert!(validate_weights(&drifted, 10, 0).is_ok());

        let mut short = vec![333_333, 333_333, 333_332];
        normalize_weights(&mut short);
        assert_eq!(short, vec![333_335, 333_333, 333_332]);

        let mut empty: Vec<u64> = Vec::new();
        normalize_weights(&mut empty);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_validate_weights() {
        assert!(validate_weights(&[500_000, 500_000], 2, 1).is_ok());
        assert!(validate_weights(&[333_333, 333_333, 333_333], 3, 1).is_ok());

        assert_eq!(
            validate_weights(&[500_000], 2, 1),
            Err(PoolError::LengthMismatch {
                expected: 2,
                actual: 1
            })
        );
        assert_eq!(
            validate_weights(&[1_000_000, 0], 2, 1),
            Err(PoolError::ZeroWeight { index: 1 })
        );
        assert!(matches!(
            validate_weights(&[500_000, 400_000], 2, 1),
            Err(PoolError::InvalidWeightSum { sum: 900_000, .. })
        ));
    }
}
