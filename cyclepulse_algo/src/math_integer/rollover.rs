// Implements rollover-safe subtraction for the fixed-width counters reported by
// cycling sensors (cumulative revolutions and 1/1024 s event timestamps).

// Key Features:
// - Forward distance between two raw counter readings
// - Handles exactly one wraparound of the counter
// - Works for any counter space up to 32 bits (16-bit and 32-bit in practice)

// Detailed Operation:
// A counter of width W counts 0..=max_value and then restarts at 0. When the
// current reading is below the previous one the counter is assumed to have
// wrapped once, so the distance is the rest of the old cycle plus the new
// reading. Two or more wraps between readings cannot be told apart from one
// and are silently under-reported.

// Licensed under the Apache License, Version 2.0
// Copyright 2024 Anton Khrustalev, creapunk.com

/// Largest value of a UINT16 counter (event times, wheel revolutions)
pub const UINT16_MAX: u32 = u16::MAX as u32;

/// Largest value of a UINT32 counter (crank revolutions)
pub const UINT32_MAX: u32 = u32::MAX;

/// Forward distance from `previous` to `current` in a circular counter space
/// of size `max_value + 1`.
///
/// # Arguments
/// * `current` - Latest raw counter value [0..=max_value]
/// * `previous` - Preceding raw counter value [0..=max_value]
/// * `max_value` - Largest value the counter holds before wrapping to 0
///
/// # Returns
/// The distance in counter units [0..=max_value]
pub const fn diff(current: u32, previous: u32, max_value: u32) -> u32 {
    if current >= previous {
        current - previous
    } else {
        // current < previous, so neither term can overflow
        (max_value - previous) + current + 1
    }
}

/// Shortcut for 16-bit counters.
#[inline(always)]
pub const fn diff_u16(current: u16, previous: u16) -> u32 {
    diff(current as u32, previous as u32, UINT16_MAX)
}
