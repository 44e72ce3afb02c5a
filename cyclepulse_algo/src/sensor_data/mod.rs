// Decodes the raw counters of Bluetooth LE Cycling Speed and Cadence sensors
// into cadence (rpm) and wheel rotation rate (revolutions per millisecond).

// Key Features:
// - One sample type per measurement: cadence, wheel rotation, or both at once
// - Rates derived from two successive samples of the same sensor
// - Counter wraparound handled by rollover-safe subtraction
// - Explicit `Option` for every field that may be missing

// Detailed Operation:
// Each notification from the sensor becomes a fresh sample holding the raw
// cumulative revolution count and the event time (1/1024 s) of the last
// revolution. `compute` compares the sample with the preceding one, turns the
// event time distance into milliseconds and divides the revolution distance by
// it. Samples without data, or pairs whose time distance is not positive,
// leave the rate absent.

// Licensed under the Apache License, Version 2.0
// Copyright 2024 Anton Khrustalev, creapunk.com

pub mod cadence;
pub mod cadence_speed;
pub mod identity;
pub mod speed;

pub use cadence::{compute_cadence, CadenceSample};
pub use cadence_speed::CadenceSpeedSample;
pub use identity::SensorIdentity;
pub use speed::{compute_speed, SpeedSample};

use crate::math_integer::rollover::diff_u16;

/// Event time ticks per second
pub const EVENT_TIME_TICKS: u32 = 1024;
/// Seconds to milliseconds
pub const S_TO_MS: u32 = 1000;
/// Milliseconds to seconds
pub const MS_TO_S: f64 = 0.001;
/// Seconds to minutes
pub const S_TO_MIN: f64 = 1.0 / 60.0;

/// Time between two event timestamps in milliseconds, truncated.
///
/// Scales the tick distance by `1024 / 1000`; this is the conversion the
/// published rpm values are based on and is kept as is.
#[inline(always)]
pub(crate) fn event_time_diff_ms(current: u16, previous: u16) -> u32 {
    diff_u16(current, previous) * EVENT_TIME_TICKS / S_TO_MS
}

/// Shared capability of every reading produced by a cycling sensor.
pub trait SensorReading {
    fn identity(&self) -> &SensorIdentity;

    /// True if the raw counters needed for a rate are present
    fn has_data(&self) -> bool;

    fn sensor_address(&self) -> &str {
        self.identity().address()
    }

    fn sensor_name(&self) -> &str {
        self.identity().name()
    }
}

/// Any reading a CSC sensor can deliver on one notification.
#[derive(Debug, Clone)]
pub enum CyclingReading {
    Cadence(CadenceSample),
    Speed(SpeedSample),
    CadenceSpeed(CadenceSpeedSample),
}

impl CyclingReading {
    /// Cadence part of the reading, if any
    pub fn cadence(&self) -> Option<&CadenceSample> {
        match self {
            Self::Cadence(cadence) => Some(cadence),
            Self::CadenceSpeed(both) => Some(both.cadence()),
            Self::Speed(_) => None,
        }
    }

    /// Wheel rotation part of the reading, if any
    pub fn speed(&self) -> Option<&SpeedSample> {
        match self {
            Self::Speed(speed) => Some(speed),
            Self::CadenceSpeed(both) => Some(both.speed()),
            Self::Cadence(_) => None,
        }
    }
}

impl SensorReading for CyclingReading {
    fn identity(&self) -> &SensorIdentity {
        match self {
            Self::Cadence(cadence) => cadence.identity(),
            Self::Speed(speed) => speed.identity(),
            Self::CadenceSpeed(both) => both.identity(),
        }
    }

    fn has_data(&self) -> bool {
        match self {
            Self::Cadence(cadence) => cadence.has_data(),
            Self::Speed(speed) => speed.has_data(),
            Self::CadenceSpeed(both) => both.has_data(),
        }
    }
}

impl PartialEq for CyclingReading {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Cadence(a), Self::Cadence(b)) => a == b,
            (Self::Speed(a), Self::Speed(b)) => a == b,
            (Self::CadenceSpeed(a), Self::CadenceSpeed(b)) => a == b,
            _ => false,
        }
    }
}

impl From<CadenceSample> for CyclingReading {
    fn from(sample: CadenceSample) -> Self {
        Self::Cadence(sample)
    }
}

impl From<SpeedSample> for CyclingReading {
    fn from(sample: SpeedSample) -> Self {
        Self::Speed(sample)
    }
}

impl From<CadenceSpeedSample> for CyclingReading {
    fn from(sample: CadenceSpeedSample) -> Self {
        Self::CadenceSpeed(sample)
    }
}
