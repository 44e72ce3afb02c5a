// Licensed under the Apache License, Version 2.0
// Copyright 2024 Anton Khrustalev, creapunk.com

use heapless::String;

use crate::error::CscError;

/// Capacity of the address buffer: fits a MAC address (`AA:BB:CC:DD:EE:FF`)
/// as well as a 36 character peripheral UUID
pub const ADDRESS_CAPACITY: usize = 36;

/// Capacity of the display name buffer: longest BLE local name
pub const NAME_CAPACITY: usize = 248;

/// Who produced a reading.
///
/// The address is the stable key readings are routed by; the name is a
/// display label only.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorIdentity {
    address: String<ADDRESS_CAPACITY>,
    name: String<NAME_CAPACITY>,
}

impl SensorIdentity {
    /// Builds an identity, failing if either field exceeds its capacity.
    pub fn new(address: &str, name: &str) -> Result<Self, CscError> {
        let address = String::try_from(address).map_err(|_| CscError::AddressTooLong)?;
        let name = String::try_from(name).map_err(|_| CscError::NameTooLong)?;
        Ok(Self { address, name })
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// True if both identities point to the same physical sensor
    #[inline(always)]
    pub fn same_sensor(&self, other: &SensorIdentity) -> bool {
        self.address == other.address
    }
}
