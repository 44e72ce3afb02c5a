// Licensed under the Apache License, Version 2.0
// Copyright 2024 Anton Khrustalev, creapunk.com

use core::fmt;

use super::identity::SensorIdentity;
use super::speed::SpeedSample;
use super::{event_time_diff_ms, SensorReading, MS_TO_S, S_TO_MIN};
use crate::math_integer::rollover::{diff, UINT32_MAX};

/// Crank revolution data: cumulative count (UINT32) and event time (UINT16, 1/1024 s).
#[derive(Debug, Clone)]
pub struct CadenceSample {
    identity: SensorIdentity,
    crank_revolutions: Option<u32>,
    crank_event_time: Option<u16>,
    cadence_rpm: Option<f32>,
}

impl CadenceSample {
    /// Sample with both raw counters present
    pub fn new(identity: SensorIdentity, crank_revolutions: u32, crank_event_time: u16) -> Self {
        Self::from_parts(identity, Some(crank_revolutions), Some(crank_event_time))
    }

    /// Sample from a notification that may lack either counter
    pub fn from_parts(
        identity: SensorIdentity,
        crank_revolutions: Option<u32>,
        crank_event_time: Option<u16>,
    ) -> Self {
        Self {
            identity,
            crank_revolutions,
            crank_event_time,
            cadence_rpm: None,
        }
    }

    /// Sample of a sensor that has not reported anything yet
    pub fn empty(identity: SensorIdentity) -> Self {
        Self::from_parts(identity, None, None)
    }

    /// Workaround for Wahoo CADENCE sensors: their cadence characteristic
    /// delivers wheel revolution data instead of crank revolution data.
    ///
    /// The result is an ordinary cadence sample, so its revolution distance
    /// wraps at 32 bits like any crank count. A wrap of the 16-bit wheel
    /// counter is therefore over-reported.
    pub fn from_speed_workaround(speed: &SpeedSample) -> Self {
        Self::from_parts(
            speed.identity().clone(),
            speed.wheel_revolutions().map(u32::from),
            speed.wheel_event_time(),
        )
    }

    pub fn crank_revolutions(&self) -> Option<u32> {
        self.crank_revolutions
    }

    pub fn crank_event_time(&self) -> Option<u16> {
        self.crank_event_time
    }

    pub fn has_cadence(&self) -> bool {
        self.cadence_rpm.is_some()
    }

    /// Cadence in revolutions per minute, once computed
    pub fn cadence_rpm(&self) -> Option<f32> {
        self.cadence_rpm
    }

    /// Derives the cadence against the preceding sample of the same sensor.
    ///
    /// Does nothing unless both samples carry data. A non-positive time
    /// distance clears the cadence.
    pub fn compute(&mut self, previous: Option<&CadenceSample>) {
        let previous = match previous {
            Some(previous) if previous.has_data() && self.has_data() => previous,
            _ => return,
        };
        self.cadence_rpm = compute_cadence(self, previous);
    }

    #[inline(always)]
    fn raw(&self) -> Option<(u32, u16)> {
        Some((self.crank_revolutions?, self.crank_event_time?))
    }
}

/// Cadence in rpm between two samples, without touching either of them.
///
/// # Returns
/// `None` if a sample lacks data or the time distance is not positive
pub fn compute_cadence(current: &CadenceSample, previous: &CadenceSample) -> Option<f32> {
    let (revolutions, event_time) = current.raw()?;
    let (prev_revolutions, prev_event_time) = previous.raw()?;

    trace!(
        "cadence {} {} -> {} {}",
        prev_event_time,
        prev_revolutions,
        event_time,
        revolutions
    );

    let time_diff_ms = event_time_diff_ms(event_time, prev_event_time);
    if time_diff_ms == 0 {
        warn!("Timestamps difference is invalid: cannot compute cadence.");
        return None;
    }

    let crank_diff = diff(revolutions, prev_revolutions, UINT32_MAX);
    let cadence_ms = crank_diff as f32 / time_diff_ms as f32;
    Some((cadence_ms as f64 / MS_TO_S / S_TO_MIN) as f32)
}

impl SensorReading for CadenceSample {
    fn identity(&self) -> &SensorIdentity {
        &self.identity
    }

    fn has_data(&self) -> bool {
        self.crank_revolutions.is_some() && self.crank_event_time.is_some()
    }
}

/// Equal when the raw counters match; identity and cadence are ignored.
impl PartialEq for CadenceSample {
    fn eq(&self, other: &Self) -> bool {
        self.crank_revolutions == other.crank_revolutions
            && self.crank_event_time == other.crank_event_time
    }
}

impl fmt::Display for CadenceSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cadence={}_", self.cadence_rpm.unwrap_or(f32::NAN))?;
        match self.crank_event_time {
            Some(time) => write!(f, "{}", time),
            None => f.write_str("-"),
        }
    }
}
