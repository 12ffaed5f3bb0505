// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::device::DeviceId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A normalized position report decoded from one tracking sentence.
///
/// The record is produced fresh for every accepted sentence and handed
/// over to the downstream consumers as-is; the decoder keeps no
/// reference to it. Latitude and longitude are decimal degrees
/// (positive north/east), speed and course are carried in the units the
/// device transmitted them in, altitude is meters above the reference
/// ellipsoid.
///
/// `valid` reflects the fix state the device reported; an invalid fix
/// still yields a record. Coordinates are trusted once the sentence
/// grammar matched, no range checks are applied to them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionRecord {
    /// The registered device this record belongs to.
    pub device_id: DeviceId,
    /// UTC timestamp of the fix, whole seconds.
    pub time: DateTime<Utc>,
    /// Latitude in decimal degrees, negative south.
    pub latitude: f64,
    /// Longitude in decimal degrees, negative west.
    pub longitude: f64,
    /// Speed as transmitted, `0.0` when the sentence carries none.
    pub speed: f64,
    /// Course over ground in degrees, `0.0` when the sentence carries none.
    pub course: f64,
    /// Altitude in meters, `0.0` when the sentence carries none.
    pub altitude: f64,
    /// Whether the device reported the fix as valid.
    pub valid: bool,
    /// Name of the protocol family the record was decoded from.
    pub protocol: String,
}

impl PositionRecord {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
