// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Sentence grammars of the Aspicore tracking protocol.
//!
//! Devices speak a line based protocol: an `IMEI <digits>` announcement
//! followed by `$GPRMC` and `$GPGGA` NMEA sentences. The parsers here
//! validate the exact field shapes; a line that does not match its
//! grammar yields `None` and is dropped by the caller. Numeric values
//! are trusted once the shape matches, no range checks are applied.

use crate::PROTOCOL_NAME;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use common::device::DeviceId;
use common::position::PositionRecord;

/// Extracts the identifier token from an identity announcement.
///
/// The grammar is the literal `IMEI`, at least one whitespace character
/// and the digits of the identifier, nothing else.
pub fn identity_token(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("IMEI")?;
    let token = rest.trim_start();
    if token.len() == rest.len() {
        // no separator after the tag
        return None;
    }
    all_digits(token).then_some(token)
}

/// Converts a degrees plus decimal minutes coordinate into signed
/// decimal degrees. `S` and `W` select the negative hemisphere, every
/// other letter stays positive.
pub fn to_decimal_degrees(degrees: u32, minutes: f64, hemisphere: char) -> f64 {
    let value = f64::from(degrees) + minutes / 60.0;
    if hemisphere == 'S' || hemisphere == 'W' {
        -value
    } else {
        value
    }
}

/// One `$GPRMC` fix: time and date from the sentence, the validity
/// flag, coordinates and the optional speed and course readings.
#[derive(Debug, Clone, PartialEq)]
pub struct RmcFix {
    pub time: DateTime<Utc>,
    pub valid: bool,
    pub latitude: f64,
    pub longitude: f64,
    pub speed: f64,
    pub course: f64,
}

impl RmcFix {
    /// Parses a `$GPRMC` sentence.
    ///
    /// Field layout after the tag: `HHMMSS[.f*]`, `A`/`V`, `DDMM.m+`,
    /// `N`/`S`, `DDDMM.m+`, `E`/`W`, optional speed, optional course,
    /// `DDMMYY`; everything after the date field is ignored. Any shape
    /// violation yields `None`.
    pub fn parse(line: &str) -> Option<RmcFix> {
        let fields: Vec<&str> = line.strip_prefix("$GPRMC,")?.split(',').collect();
        if fields.len() < 9 {
            return None;
        }
        let (hour, minute, second) = hour_min_sec(fields[0])?;
        let valid = match fields[1] {
            "A" => true,
            "V" => false,
            _ => return None,
        };
        let latitude = coordinate(fields[2], 2, fields[3], ['N', 'S'])?;
        let longitude = coordinate(fields[4], 3, fields[5], ['E', 'W'])?;
        let speed = optional_reading(fields[6])?;
        let course = optional_reading(fields[7])?;
        let time = sentence_date(fields[8])?
            .and_hms_opt(hour, minute, second)?
            .and_utc();
        Some(RmcFix {
            time,
            valid,
            latitude,
            longitude,
            speed,
            course,
        })
    }

    /// Builds the position record for a bound device. The sentence
    /// carries no altitude, the record reports `0.0`. Speed and course
    /// stay in the units the device transmitted.
    pub fn into_record(self, device_id: DeviceId) -> PositionRecord {
        PositionRecord {
            device_id,
            time: self.time,
            latitude: self.latitude,
            longitude: self.longitude,
            speed: self.speed,
            course: self.course,
            altitude: 0.0,
            valid: self.valid,
            protocol: PROTOCOL_NAME.to_owned(),
        }
    }
}

/// One `$GPGGA` fix: time of day, fix quality, coordinates and the
/// summed altitude. The sentence carries no date.
#[derive(Debug, Clone, PartialEq)]
pub struct GgaFix {
    pub time: NaiveTime,
    pub valid: bool,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
}

impl GgaFix {
    /// Parses a `$GPGGA` sentence.
    ///
    /// Field layout after the tag: `HHMMSS[.f*]`, `DDMM.m+`, `N`/`S`,
    /// `DDDMM.m+`, `E`/`W`, fix quality `0`/`1`/`2`, satellite count,
    /// horizontal dilution, altitude above geoid, `M`, geoid
    /// separation, `M`, then optional DGPS age and station fields and
    /// an optional `*hh` checksum suffix. The checksum is shape-checked
    /// only, its value is not verified. The reported altitude is the
    /// sum of altitude above geoid and geoid separation, the height
    /// relative to the reference ellipsoid.
    pub fn parse(line: &str) -> Option<GgaFix> {
        let rest = line.strip_prefix("$GPGGA,")?;
        let (body, checksum) = match rest.rsplit_once('*') {
            Some((body, checksum)) => (body, Some(checksum)),
            None => (rest, None),
        };
        if let Some(checksum) = checksum
            && (checksum.is_empty()
                || !checksum
                    .bytes()
                    .all(|b| matches!(b, b'0'..=b'9' | b'A'..=b'F')))
        {
            return None;
        }
        let fields: Vec<&str> = body.split(',').collect();
        if !(12..=14).contains(&fields.len()) {
            return None;
        }
        let (hour, minute, second) = hour_min_sec(fields[0])?;
        let latitude = coordinate(fields[1], 2, fields[2], ['N', 'S'])?;
        let longitude = coordinate(fields[3], 3, fields[4], ['E', 'W'])?;
        let valid = match fields[5] {
            "0" => false,
            "1" | "2" => true,
            _ => return None,
        };
        if !all_digits(fields[6]) {
            // satellite count
            return None;
        }
        unsigned_reading(fields[7])?; // horizontal dilution
        let above_geoid = signed_reading(fields[8])?;
        if fields[9] != "M" {
            return None;
        }
        let separation = signed_reading(fields[10])?;
        if fields[11] != "M" {
            return None;
        }
        for field in &fields[12..] {
            // DGPS age and station id, both optional
            if !field.is_empty() && !all_digits(field) {
                return None;
            }
        }
        let time = NaiveTime::from_hms_opt(hour, minute, second)?;
        Some(GgaFix {
            time,
            valid,
            latitude,
            longitude,
            altitude: above_geoid + separation,
        })
    }

    /// Builds the position record for a bound device.
    ///
    /// The sentence has no date field; the date is taken from
    /// `decoded_at`, the wall clock of the decoding instant, and glued
    /// to the time of day the sentence reported. Sub-second precision
    /// is dropped. Speed and course are not carried and report `0.0`.
    pub fn into_record(self, device_id: DeviceId, decoded_at: DateTime<Utc>) -> PositionRecord {
        PositionRecord {
            device_id,
            time: decoded_at.date_naive().and_time(self.time).and_utc(),
            latitude: self.latitude,
            longitude: self.longitude,
            speed: 0.0,
            course: 0.0,
            altitude: self.altitude,
            valid: self.valid,
            protocol: PROTOCOL_NAME.to_owned(),
        }
    }
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Splits `HHMMSS[.frac]` into hour, minute and second. The fractional
/// part is ignored, record timestamps carry whole seconds only.
fn hour_min_sec(field: &str) -> Option<(u32, u32, u32)> {
    let (whole, frac) = field.split_at_checked(6)?;
    if !whole.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if !frac.is_empty()
        && !frac
            .strip_prefix('.')
            .is_some_and(|digits| digits.bytes().all(|b| b.is_ascii_digit()))
    {
        return None;
    }
    Some((
        whole[0..2].parse().ok()?,
        whole[2..4].parse().ok()?,
        whole[4..6].parse().ok()?,
    ))
}

/// Splits a `D..DMM.m+` coordinate field into integer degrees and
/// decimal minutes. The decimal point in the minutes is mandatory.
fn degrees_minutes(field: &str, deg_digits: usize) -> Option<(u32, f64)> {
    let (degrees, minutes) = field.split_at_checked(deg_digits)?;
    if !degrees.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let bytes = minutes.as_bytes();
    if bytes.len() < 4
        || !bytes[0].is_ascii_digit()
        || !bytes[1].is_ascii_digit()
        || bytes[2] != b'.'
        || !bytes[3..].iter().all(u8::is_ascii_digit)
    {
        return None;
    }
    Some((degrees.parse().ok()?, minutes.parse().ok()?))
}

/// Parses one coordinate out of its value and hemisphere fields.
/// `deg_digits` is 2 for latitude and 3 for longitude.
fn coordinate(field: &str, deg_digits: usize, hemisphere: &str, letters: [char; 2]) -> Option<f64> {
    let (degrees, minutes) = degrees_minutes(field, deg_digits)?;
    let mut chars = hemisphere.chars();
    let letter = chars.next()?;
    if chars.next().is_some() || !letters.contains(&letter) {
        return None;
    }
    Some(to_decimal_degrees(degrees, minutes, letter))
}

/// An unsigned decimal reading, digits with an optional fraction.
fn unsigned_reading(field: &str) -> Option<f64> {
    let (int_part, frac) = field.split_once('.').unwrap_or((field, ""));
    if !all_digits(int_part) || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

/// A signed decimal reading, optional leading minus.
fn signed_reading(field: &str) -> Option<f64> {
    let digits = field.strip_prefix('-').unwrap_or(field);
    unsigned_reading(digits)?;
    field.parse().ok()
}

/// An optional reading: an absent field decodes as `0.0`, a present
/// field must be a well-formed unsigned decimal.
fn optional_reading(field: &str) -> Option<f64> {
    if field.is_empty() {
        Some(0.0)
    } else {
        unsigned_reading(field)
    }
}

/// Parses the `DDMMYY` date field; two-digit years count from 2000.
/// Dates that do not exist on the calendar are rejected.
fn sentence_date(field: &str) -> Option<NaiveDate> {
    if field.len() != 6 || !all_digits(field) {
        return None;
    }
    let day = field[0..2].parse().ok()?;
    let month = field[2..4].parse().ok()?;
    let year: i32 = field[4..6].parse().ok()?;
    NaiveDate::from_ymd_opt(2000 + year, month, day)
}
