// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::sentence::{self, GgaFix, RmcFix};
use chrono::Utc;
use common::device::DeviceId;
use common::position::PositionRecord;
use directory::DeviceDirectory;
use std::sync::Arc;
use tracing::debug;

/// Per-connection decoder for the Aspicore protocol.
///
/// One decoder is owned by exactly one connection and processes that
/// connection's lines strictly in order. It starts with no bound
/// device; an identity announcement that resolves against the
/// directory binds one, and only then do location sentences produce
/// records.
pub struct AspicoreDecoder {
    directory: Arc<dyn DeviceDirectory>,
    device: Option<DeviceId>,
}

impl AspicoreDecoder {
    /// Creates an unbound decoder backed by the given directory.
    pub fn new(directory: Arc<dyn DeviceDirectory>) -> Self {
        AspicoreDecoder {
            directory,
            device: None,
        }
    }

    /// The device bound to this connection, if any announcement
    /// resolved so far.
    pub fn device(&self) -> Option<DeviceId> {
        self.device
    }

    /// Decodes one line and returns at most one position record.
    ///
    /// Identity announcements mutate the binding and never produce a
    /// record. Location sentences are dropped until a device is bound.
    /// Anything that matches no grammar is dropped silently; no input
    /// is fatal to the connection.
    pub async fn handle_line(&mut self, line: &str) -> Option<PositionRecord> {
        if line.starts_with("IMEI") {
            self.bind_device(line).await;
            return None;
        }
        if line.starts_with("$GPRMC") {
            let device_id = self.device?;
            return RmcFix::parse(line).map(|fix| fix.into_record(device_id));
        }
        if line.starts_with("$GPGGA") {
            let device_id = self.device?;
            return GgaFix::parse(line).map(|fix| fix.into_record(device_id, Utc::now()));
        }
        None
    }

    /// Rebinds the connection to the device the announcement resolves
    /// to. A later announcement always wins; a malformed announcement
    /// or an unresolved identifier leaves the current binding alone.
    async fn bind_device(&mut self, line: &str) {
        let Some(uid) = sentence::identity_token(line) else {
            debug!("dropping malformed identity announcement");
            return;
        };
        match self.directory.lookup_uid(uid).await {
            Some(id) => {
                debug!(uid, device_id = id, "device bound to connection");
                self.device = Some(id);
            }
            None => debug!(uid, "announcement for unregistered device"),
        }
    }
}
