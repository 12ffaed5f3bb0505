// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use serde::{Deserialize, Serialize};

/// Identifier of a registered device inside this system.
///
/// Devices announce themselves on the wire with a unique identifier
/// string (their IMEI); the directory maps that string to a `DeviceId`,
/// and every decoded record carries the resolved id.
pub type DeviceId = i64;

/// A registered device as stored in the device directory.
///
/// # Fields
///
/// - `id` – The internal identifier records are keyed by.
/// - `uid` – The unique identifier the device announces on the wire.
/// - `name` – An optional human readable label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    pub uid: String,
    pub name: Option<String>,
}

impl Device {
    /// Creates a new [`Device`] entry.
    pub fn new(id: DeviceId, uid: &str, name: Option<&str>) -> Self {
        Device {
            id,
            uid: uid.to_owned(),
            name: name.map(str::to_owned),
        }
    }
}
