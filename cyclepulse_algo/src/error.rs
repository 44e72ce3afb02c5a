// Licensed under the Apache License, Version 2.0
// Copyright 2024 Anton Khrustalev, creapunk.com

use core::fmt;

/// Failures at the edges of the decoding core.
///
/// Rate computation itself never fails: a reading that cannot produce a rate
/// simply reports it as absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CscError {
    /// Sensor address does not fit the identity buffer
    AddressTooLong,
    /// Sensor name does not fit the identity buffer
    NameTooLong,
    /// Reading was routed to the tracker of another sensor
    AddressMismatch,
}

impl fmt::Display for CscError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AddressTooLong => f.write_str("sensor address exceeds identity capacity"),
            Self::NameTooLong => f.write_str("sensor name exceeds identity capacity"),
            Self::AddressMismatch => f.write_str("reading belongs to a different sensor"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CscError {}
