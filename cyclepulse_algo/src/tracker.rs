// Implements a processing lane for one cycling sensor: keeps the last readings
// of the sensor and derives rates for each new notification against them.

// Key Features:
// - Rejects readings from any other sensor address
// - Optional cadence-from-wheel workaround for misreporting sensors
// - Combined readings computed part by part against the matching history
// - Readings without data never replace the history

// Detailed Operation:
// The host creates one tracker per sensor address and feeds it every
// notification in arrival order. Taking `&mut self` keeps the single-writer
// rule of the sample types: only one caller can update a lane at a time.
// A notification is first mapped through the configured workarounds, then
// computed against the last cadence and wheel samples that carried data, and
// finally stored as the new history if it has data itself.

// Licensed under the Apache License, Version 2.0
// Copyright 2024 Anton Khrustalev, creapunk.com

use crate::error::CscError;
use crate::sensor_data::{CadenceSample, CyclingReading, SensorIdentity, SensorReading, SpeedSample};

/// Run-time behaviour of a tracker
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TrackerConfig {
    /// Treat wheel readings as cadence (Wahoo CADENCE workaround)
    pub cadence_from_wheel: bool,
}

/// History and configuration of one sensor.
#[derive(Debug)]
pub struct SensorTracker {
    identity: SensorIdentity,
    config: TrackerConfig,
    last_cadence: Option<CadenceSample>, // Last cadence sample with data
    last_speed: Option<SpeedSample>,     // Last wheel sample with data
}

impl SensorTracker {
    /// Creates a tracker with empty history
    pub fn new(identity: SensorIdentity, config: TrackerConfig) -> Self {
        Self {
            identity,
            config,
            last_cadence: None,
            last_speed: None,
        }
    }

    /// Computes `reading` against the history and records it.
    ///
    /// # Returns
    /// The computed reading, or `CscError::AddressMismatch` if the reading, or
    /// either member of a combined reading, was produced by another sensor
    /// (history is left untouched)
    pub fn update(&mut self, reading: CyclingReading) -> Result<CyclingReading, CscError> {
        // Members of a combined reading carry their own identity
        let foreign = core::iter::once(reading.identity())
            .chain(reading.cadence().map(SensorReading::identity))
            .chain(reading.speed().map(SensorReading::identity))
            .find(|id| !self.identity.same_sensor(id));
        if let Some(foreign) = foreign {
            warn!(
                "Reading from {} routed to tracker of {}",
                foreign.address(),
                self.identity.address()
            );
            return Err(CscError::AddressMismatch);
        }

        let reading = match reading {
            CyclingReading::Speed(speed) if self.config.cadence_from_wheel => {
                CyclingReading::Cadence(CadenceSample::from_speed_workaround(&speed))
            }
            reading => reading,
        };

        let reading = match reading {
            CyclingReading::Cadence(mut cadence) => {
                cadence.compute(self.last_cadence.as_ref());
                self.store_cadence(&cadence);
                CyclingReading::Cadence(cadence)
            }
            CyclingReading::Speed(mut speed) => {
                speed.compute(self.last_speed.as_ref());
                self.store_speed(&speed);
                CyclingReading::Speed(speed)
            }
            CyclingReading::CadenceSpeed(mut both) => {
                both.compute_parts(self.last_cadence.as_ref(), self.last_speed.as_ref());
                self.store_cadence(both.cadence());
                self.store_speed(both.speed());
                CyclingReading::CadenceSpeed(both)
            }
        };

        Ok(reading)
    }

    /// Forgets the history, e.g. after the sensor reconnected
    pub fn reset(&mut self) {
        debug!("Tracker of {} reset", self.identity.address());
        self.last_cadence = None;
        self.last_speed = None;
    }

    pub fn identity(&self) -> &SensorIdentity {
        &self.identity
    }

    pub fn config(&self) -> TrackerConfig {
        self.config
    }

    pub fn last_cadence(&self) -> Option<&CadenceSample> {
        self.last_cadence.as_ref()
    }

    pub fn last_speed(&self) -> Option<&SpeedSample> {
        self.last_speed.as_ref()
    }

    fn store_cadence(&mut self, cadence: &CadenceSample) {
        if cadence.has_data() {
            self.last_cadence = Some(cadence.clone());
        }
    }

    fn store_speed(&mut self, speed: &SpeedSample) {
        if speed.has_data() {
            self.last_speed = Some(speed.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor_data::CadenceSpeedSample;

    const ADDRESS: &str = "C0:FF:EE:00:11:22";

    fn identity() -> SensorIdentity {
        SensorIdentity::new(ADDRESS, "csc").unwrap()
    }

    #[test]
    fn first_reading_has_no_rate() {
        let mut tracker = SensorTracker::new(identity(), TrackerConfig::default());
        let reading = tracker
            .update(CadenceSample::new(identity(), 100, 1024).into())
            .unwrap();
        assert!(!reading.cadence().unwrap().has_cadence());
        assert!(tracker.last_cadence().is_some());
    }

    #[test]
    fn empty_reading_keeps_history() {
        let mut tracker = SensorTracker::new(identity(), TrackerConfig::default());
        tracker
            .update(SpeedSample::new(identity(), 40, 1024).into())
            .unwrap();
        tracker.update(SpeedSample::empty(identity()).into()).unwrap();
        assert_eq!(tracker.last_speed().unwrap().wheel_revolutions(), Some(40));

        let reading = tracker
            .update(SpeedSample::new(identity(), 50, 2048).into())
            .unwrap();
        assert_eq!(reading.speed().unwrap().revolutions_per_ms(), Some(10.0 / 1048.0));
    }

    #[test]
    fn mismatched_address_is_rejected() {
        let mut tracker = SensorTracker::new(identity(), TrackerConfig::default());
        let other = SensorIdentity::new("C0:FF:EE:00:11:99", "csc").unwrap();
        let result = tracker.update(CadenceSample::new(other, 100, 1024).into());
        assert_eq!(result, Err(CscError::AddressMismatch));
        assert!(tracker.last_cadence().is_none());
    }

    #[test]
    fn reset_forgets_history() {
        let mut tracker = SensorTracker::new(identity(), TrackerConfig::default());
        tracker
            .update(CadenceSample::new(identity(), 100, 1024).into())
            .unwrap();
        tracker.reset();
        assert!(tracker.last_cadence().is_none());

        let reading = tracker
            .update(CadenceSample::new(identity(), 110, 2048).into())
            .unwrap();
        assert!(!reading.cadence().unwrap().has_cadence());
    }

    #[test]
    fn workaround_reading_computes_against_crank_history() {
        let config = TrackerConfig {
            cadence_from_wheel: true,
        };
        let mut tracker = SensorTracker::new(identity(), config);
        let crank = CadenceSample::new(identity(), 1000, 1024);
        let both = CadenceSpeedSample::new(identity(), crank, SpeedSample::empty(identity()));
        tracker.update(both.into()).unwrap();

        let reading = tracker
            .update(SpeedSample::new(identity(), 1010, 2048).into())
            .unwrap();
        let rpm = reading.cadence().unwrap().cadence_rpm().unwrap();
        assert!((rpm - 572.519).abs() < 1e-3, "rpm = {}", rpm);
        assert_eq!(tracker.last_cadence().unwrap().crank_revolutions(), Some(1010));
        assert!(tracker.last_speed().is_none());
    }

    #[test]
    fn combined_reading_with_foreign_member_is_rejected() {
        let mut tracker = SensorTracker::new(identity(), TrackerConfig::default());
        let other = SensorIdentity::new("C0:FF:EE:00:11:99", "csc").unwrap();
        let both = CadenceSpeedSample::new(
            identity(),
            CadenceSample::new(identity(), 100, 1024),
            SpeedSample::new(other, 40, 1024),
        );

        let result = tracker.update(both.into());
        assert_eq!(result, Err(CscError::AddressMismatch));
        assert!(tracker.last_cadence().is_none());
        assert!(tracker.last_speed().is_none());
    }

    #[test]
    fn exposes_identity_and_config() {
        let config = TrackerConfig {
            cadence_from_wheel: true,
        };
        let tracker = SensorTracker::new(identity(), config);
        assert_eq!(tracker.identity().address(), ADDRESS);
        assert_eq!(tracker.config(), config);
        assert!(std::format!("{:?}", tracker).contains(ADDRESS));
    }
}
