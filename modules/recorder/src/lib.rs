// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Position recorder module
//!
//! Persists every position record published on the bus as one JSON
//! line in an append-only file. The decoding side never knows about
//! this module, it only sees the bus.

use module_core::{EventKind, Module, ModuleCtx};
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{error, info};

/// Appends position records to a JSON-lines file.
pub struct Recorder {
    output: PathBuf,
    module_ctx: ModuleCtx,
}

impl Recorder {
    /// Creates a recorder that appends to `output`. The file is opened
    /// when the module starts running and created if missing.
    pub fn new(output: &Path, ctx: ModuleCtx) -> Self {
        Recorder {
            output: output.to_path_buf(),
            module_ctx: ctx,
        }
    }
}

#[async_trait::async_trait]
impl Module for Recorder {
    async fn run(&mut self) -> Result<(), ()> {
        let mut file = match OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.output)
            .await
        {
            Ok(file) => file,
            Err(e) => {
                error!(
                    "Failed to open record file {}. Error: {}",
                    self.output.to_string_lossy(),
                    e
                );
                return Err(());
            }
        };
        info!(
            "Recording position records to {}",
            self.output.to_string_lossy()
        );
        let mut run = true;
        while run {
            tokio::select! {
                event = self.module_ctx.receiver.recv() => {
                    match event {
                        Ok(event) => match event.kind {
                            EventKind::QuitEvent => run = false,
                            EventKind::PositionEvent(record) => {
                                match record.to_json() {
                                    Ok(mut line) => {
                                        line.push('\n');
                                        if let Err(e) = file.write_all(line.as_bytes()).await {
                                            error!("Failed to append record. Error: {}", e);
                                        }
                                    }
                                    Err(e) => error!("Failed to serialize record. Error: {}", e),
                                }
                            }
                        },
                        Err(e) => error!("Error: {}", e),
                    }
                }
            }
        }
        if let Err(e) = file.sync_all().await {
            error!("Failed to sync record file. Error: {}", e);
        }
        Ok(())
    }
}
