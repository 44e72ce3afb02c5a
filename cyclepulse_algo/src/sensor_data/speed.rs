// Licensed under the Apache License, Version 2.0
// Copyright 2024 Anton Khrustalev, creapunk.com

use core::fmt;

use super::identity::SensorIdentity;
use super::{event_time_diff_ms, SensorReading};
use crate::math_integer::rollover::diff_u16;

/// Wheel revolution data: cumulative count (UINT16) and event time (UINT16, 1/1024 s).
///
/// Only the rotation rate is derived. Turning it into a linear speed needs the
/// wheel circumference, which the sensor does not report.
#[derive(Debug, Clone)]
pub struct SpeedSample {
    identity: SensorIdentity,
    wheel_revolutions: Option<u16>,
    wheel_event_time: Option<u16>,
    revolutions_per_ms: Option<f32>,
}

impl SpeedSample {
    /// Sample with both raw counters present
    pub fn new(identity: SensorIdentity, wheel_revolutions: u16, wheel_event_time: u16) -> Self {
        Self::from_parts(identity, Some(wheel_revolutions), Some(wheel_event_time))
    }

    /// Sample from a notification that may lack either counter
    pub fn from_parts(
        identity: SensorIdentity,
        wheel_revolutions: Option<u16>,
        wheel_event_time: Option<u16>,
    ) -> Self {
        Self {
            identity,
            wheel_revolutions,
            wheel_event_time,
            revolutions_per_ms: None,
        }
    }

    /// Sample of a sensor that has not reported anything yet
    pub fn empty(identity: SensorIdentity) -> Self {
        Self::from_parts(identity, None, None)
    }

    pub fn wheel_revolutions(&self) -> Option<u16> {
        self.wheel_revolutions
    }

    pub fn wheel_event_time(&self) -> Option<u16> {
        self.wheel_event_time
    }

    pub fn has_speed(&self) -> bool {
        self.revolutions_per_ms.is_some()
    }

    /// Wheel rotation rate in revolutions per millisecond, once computed
    pub fn revolutions_per_ms(&self) -> Option<f32> {
        self.revolutions_per_ms
    }

    /// Derives the rotation rate against the preceding sample of the same sensor.
    ///
    /// Does nothing unless both samples carry data. A non-positive time
    /// distance clears the rate.
    pub fn compute(&mut self, previous: Option<&SpeedSample>) {
        let previous = match previous {
            Some(previous) if previous.has_data() && self.has_data() => previous,
            _ => return,
        };
        self.revolutions_per_ms = compute_speed(self, previous);
    }

    #[inline(always)]
    fn raw(&self) -> Option<(u16, u16)> {
        Some((self.wheel_revolutions?, self.wheel_event_time?))
    }
}

/// Wheel revolutions per millisecond between two samples, without touching either of them.
///
/// # Returns
/// `None` if a sample lacks data or the time distance is not positive
pub fn compute_speed(current: &SpeedSample, previous: &SpeedSample) -> Option<f32> {
    let (revolutions, event_time) = current.raw()?;
    let (prev_revolutions, prev_event_time) = previous.raw()?;

    let time_diff_ms = event_time_diff_ms(event_time, prev_event_time);
    if time_diff_ms == 0 {
        warn!("Timestamps difference is invalid: cannot compute speed.");
        return None;
    }

    let wheel_diff = diff_u16(revolutions, prev_revolutions);
    Some(wheel_diff as f32 / time_diff_ms as f32)
}

impl SensorReading for SpeedSample {
    fn identity(&self) -> &SensorIdentity {
        &self.identity
    }

    fn has_data(&self) -> bool {
        self.wheel_revolutions.is_some() && self.wheel_event_time.is_some()
    }
}

/// Equal when the raw counters match; identity and rate are ignored.
impl PartialEq for SpeedSample {
    fn eq(&self, other: &Self) -> bool {
        self.wheel_revolutions == other.wheel_revolutions
            && self.wheel_event_time == other.wheel_event_time
    }
}

impl fmt::Display for SpeedSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "speed={}_", self.revolutions_per_ms.unwrap_or(f32::NAN))?;
        match self.wheel_event_time {
            Some(time) => write!(f, "{}", time),
            None => f.write_str("-"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(revolutions: u16, event_time: u16) -> SpeedSample {
        SpeedSample::new(SensorIdentity::default(), revolutions, event_time)
    }

    #[test]
    fn rate_is_revolutions_per_ms() {
        let previous = sample(40, 1024);
        let mut current = sample(50, 2048);
        current.compute(Some(&previous));
        assert_eq!(current.revolutions_per_ms(), Some(10.0 / 1048.0));
    }

    #[test]
    fn revolution_counter_wraps_at_16_bits() {
        let previous = sample(65530, 1024);
        let mut current = sample(4, 2048);
        current.compute(Some(&previous));
        assert_eq!(current.revolutions_per_ms(), Some(10.0 / 1048.0));
    }

    #[test]
    fn zero_time_distance_clears_rate() {
        let previous = sample(40, 3000);
        let mut current = sample(90, 3000);
        current.compute(Some(&previous));
        assert!(!current.has_speed());
    }

    #[test]
    fn missing_data_never_yields_rate() {
        let valid = sample(40, 1024);
        let empty = SpeedSample::empty(SensorIdentity::default());

        let mut current = empty.clone();
        current.compute(Some(&valid));
        assert_eq!(current.revolutions_per_ms(), None);

        let mut current = sample(50, 2048);
        current.compute(Some(&empty));
        current.compute(None);
        assert_eq!(current.revolutions_per_ms(), None);

        let partial = SpeedSample::from_parts(SensorIdentity::default(), None, Some(2048));
        assert!(!partial.has_data());
        assert_eq!(compute_speed(&partial, &valid), None);
    }

    #[test]
    fn compute_is_idempotent() {
        let previous = sample(40, 1024);
        let mut current = sample(47, 1536);
        current.compute(Some(&previous));
        let first = current.revolutions_per_ms();
        assert!(first.is_some());
        current.compute(Some(&previous));
        assert_eq!(current.revolutions_per_ms(), first);
    }

    #[test]
    fn equality_ignores_rate() {
        let previous = sample(40, 1024);
        let mut computed = sample(50, 2048);
        computed.compute(Some(&previous));
        assert_eq!(computed, sample(50, 2048));
        assert_ne!(computed, sample(50, 2047));
    }

    #[test]
    fn display_shows_speed_and_time() {
        use std::string::ToString;

        assert_eq!(sample(1, 1024).to_string(), "speed=NaN_1024");
        assert_eq!(SpeedSample::empty(SensorIdentity::default()).to_string(), "speed=NaN_-");

        let mut current = sample(41, 2048);
        current.compute(Some(&sample(40, 1024)));
        assert!(current.to_string().ends_with("_2048"));
        assert!(!current.to_string().contains("NaN"));
    }
}
