// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Device directory for the tracking server
//!
//! Provides the lookup interface that resolves the unique identifier a
//! device announces on the wire into a registered device, together with
//! an in-memory implementation fed from the registry file at startup.

use async_trait::async_trait;
use common::device::{Device, DeviceId};
use std::collections::HashMap;

/// Resolves announced device identifiers to registered devices.
///
/// The directory is shared by every connection and must therefore
/// support concurrent lookups; implementations are read-mostly and are
/// not required to order lookups across connections. A failed
/// resolution is expressed as `None`, whether the identifier is unknown
/// or the backing store could not answer.
#[async_trait]
pub trait DeviceDirectory: Send + Sync {
    /// Resolves the unique identifier `uid` to the internal device id.
    async fn lookup_uid(&self, uid: &str) -> Option<DeviceId>;
}

/// An in-memory [`DeviceDirectory`] built once at startup.
///
/// Entries are keyed by the announced unique identifier. When the input
/// contains the same identifier twice the later entry wins.
pub struct StaticDirectory {
    devices: HashMap<String, Device>,
}

impl StaticDirectory {
    /// Creates a directory from the given registry entries.
    pub fn new(devices: impl IntoIterator<Item = Device>) -> Self {
        StaticDirectory {
            devices: devices
                .into_iter()
                .map(|device| (device.uid.clone(), device))
                .collect(),
        }
    }

    /// Returns the full entry for `uid`, if registered.
    pub fn device(&self, uid: &str) -> Option<&Device> {
        self.devices.get(uid)
    }

    /// Number of registered devices.
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

#[async_trait]
impl DeviceDirectory for StaticDirectory {
    async fn lookup_uid(&self, uid: &str) -> Option<DeviceId> {
        self.devices.get(uid).map(|device| device.id)
    }
}
