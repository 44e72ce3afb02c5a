// Licensed under the Apache License, Version 2.0
// Copyright 2024 Anton Khrustalev, creapunk.com

use super::cadence::CadenceSample;
use super::identity::SensorIdentity;
use super::speed::SpeedSample;
use super::SensorReading;

/// Cadence and wheel rotation delivered together by one notification.
#[derive(Debug, Clone)]
pub struct CadenceSpeedSample {
    identity: SensorIdentity,
    cadence: CadenceSample,
    speed: SpeedSample,
}

impl CadenceSpeedSample {
    /// Pairs two samples of one notification.
    ///
    /// Both members are expected to carry `identity`; this is not checked
    /// here. `SensorTracker::update` refuses a reading whose members belong
    /// to another sensor.
    pub fn new(identity: SensorIdentity, cadence: CadenceSample, speed: SpeedSample) -> Self {
        Self {
            identity,
            cadence,
            speed,
        }
    }

    pub fn cadence(&self) -> &CadenceSample {
        &self.cadence
    }

    pub fn speed(&self) -> &SpeedSample {
        &self.speed
    }

    /// Computes each part against the matching part of `previous`.
    pub fn compute(&mut self, previous: Option<&CadenceSpeedSample>) {
        self.compute_parts(previous.map(|p| &p.cadence), previous.map(|p| &p.speed));
    }

    /// Computes each part against its own predecessor.
    ///
    /// Used when the previous cadence and wheel data came from different
    /// notifications.
    pub fn compute_parts(&mut self, cadence: Option<&CadenceSample>, speed: Option<&SpeedSample>) {
        self.cadence.compute(cadence);
        self.speed.compute(speed);
    }

    pub fn into_parts(self) -> (CadenceSample, SpeedSample) {
        (self.cadence, self.speed)
    }
}

/// Equal when both parts are equal.
impl PartialEq for CadenceSpeedSample {
    fn eq(&self, other: &Self) -> bool {
        self.cadence == other.cadence && self.speed == other.speed
    }
}

impl SensorReading for CadenceSpeedSample {
    fn identity(&self) -> &SensorIdentity {
        &self.identity
    }

    /// True if at least one part carries data
    fn has_data(&self) -> bool {
        self.cadence.has_data() || self.speed.has_data()
    }
}
