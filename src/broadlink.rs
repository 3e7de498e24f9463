//! Broadlink IR code decoding.
//!
//! A Broadlink packet starts with a 4-byte header (type, repeat count,
//! little-endian payload length) followed by pulse durations in units of
//! 269/8192 ms. A duration is one byte, or `0x00` followed by a
//! big-endian 16-bit value.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use log::warn;

use crate::error::{Error, Result};

/// Broadlink packet header size
pub const HEADER_SIZE: usize = 4;

/// One Broadlink unit is 269/8192 ms; `us = ceil(units * 8192 / 269)`
const UNIT_NUMERATOR: u64 = 269;
const UNIT_DENOMINATOR: u64 = 8192;

/// Durations at or above this many microseconds cannot be represented
pub const MAX_MICROSECONDS: u32 = 65535;

/// Extract pulse durations (in Broadlink units) from a raw packet
pub fn parse_durations(packet: &[u8]) -> Result<Vec<u32>> {
    if packet.len() < HEADER_SIZE {
        return Err(Error::BroadlinkTooShort(packet.len()));
    }

    let payload_len = u16::from_le_bytes([packet[2], packet[3]]) as usize;
    let end = (payload_len + HEADER_SIZE).min(packet.len());

    let mut durations = Vec::with_capacity(payload_len);
    let mut i = HEADER_SIZE;
    while i < end {
        let value = if packet[i] == 0 {
            let extended = packet.get(i + 1..i + 3).ok_or(Error::TruncatedDuration(i))?;
            i += 3;
            u16::from_be_bytes([extended[0], extended[1]]) as u32
        } else {
            i += 1;
            packet[i - 1] as u32
        };
        durations.push(value);
    }

    Ok(durations)
}

/// Convert a Broadlink duration to microseconds, rounding up
#[inline]
pub fn units_to_microseconds(units: u32) -> u32 {
    let scaled = units as u64 * UNIT_DENOMINATOR;
    ((scaled + UNIT_NUMERATOR - 1) / UNIT_NUMERATOR) as u32
}

/// Convert durations to microseconds, dropping those that do not fit in a `u16`
pub fn to_microseconds(durations: &[u32]) -> Vec<u16> {
    let mut result = Vec::with_capacity(durations.len());
    let mut dropped = 0;

    for &units in durations {
        let micros = units_to_microseconds(units);
        if micros < MAX_MICROSECONDS {
            result.push(micros as u16);
        } else {
            dropped += 1;
        }
    }

    if dropped > 0 {
        warn!("dropped {} durations too long for a 16-bit timing", dropped);
    }
    result
}

/// Pack timings as consecutive little-endian `u16`
pub fn pack_timings(timings: &[u16]) -> Vec<u8> {
    timings.iter().flat_map(|t| t.to_le_bytes()).collect()
}

/// Decode a base64 Broadlink code into the packed timing buffer the Tuya
/// compressor consumes
pub fn decode_code(code: &str) -> Result<Vec<u8>> {
    let code = code.trim();
    if code.is_empty() {
        return Err(Error::EmptyCode);
    }

    let packet = STANDARD.decode(code)?;
    let durations = parse_durations(&packet)?;
    if durations.is_empty() {
        return Err(Error::NoDurations);
    }

    let timings = to_microseconds(&durations);
    if timings.is_empty() {
        return Err(Error::AllDurationsFiltered);
    }

    Ok(pack_timings(&timings))
}
