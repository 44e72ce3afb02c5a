// Bluetooth LE Cycling Speed and Cadence decoding core.
//
// Turns the raw revolution counters and event times reported by CSC sensors
// into cadence (rpm) and wheel rotation rate. Transport, GATT handling and
// presentation live outside of this crate.

// Licensed under the Apache License, Version 2.0
// Copyright 2024 Anton Khrustalev, creapunk.com

#![no_std]

#[cfg(any(test, feature = "std"))]
extern crate std;

#[cfg(feature = "rtt")]
use defmt_rtt as _; // Use the defmt_rtt crate for logging via RTT (Real-Time Transfer)

#[macro_use]
mod fmt;

pub mod error;
pub mod math_integer;
pub mod sensor_data;
pub mod tracker;

pub use error::CscError;
pub use sensor_data::{
    CadenceSample, CadenceSpeedSample, CyclingReading, SensorIdentity, SensorReading, SpeedSample,
};
pub use tracker::{SensorTracker, TrackerConfig};
