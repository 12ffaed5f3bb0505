// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Aspicore tracking protocol module
//!
//! Accepts device connections over TCP, decodes the line based
//! Aspicore protocol (`IMEI` announcement plus `$GPRMC`/`$GPGGA`
//! sentences) and publishes one position event per accepted sentence
//! on the event bus. Every connection owns its own [`AspicoreDecoder`],
//! decoding state never crosses connections; the device directory is
//! the only shared collaborator.

use directory::DeviceDirectory;
use futures::StreamExt;
use module_core::{Event, EventKind, Module, ModuleCtx};
use std::{
    io::{self, Error, ErrorKind},
    net::SocketAddr,
    sync::Arc,
};
use tokio::net::{TcpListener, TcpStream};
use tokio_util::codec::{Framed, LinesCodec};
use tracing::{debug, error, info};

pub mod decoder;
pub mod sentence;

pub use decoder::AspicoreDecoder;

/// Name of the protocol family, stamped into every produced record.
pub const PROTOCOL_NAME: &str = "aspicore";

/// TCP server module for the Aspicore protocol.
pub struct AspicoreModule {
    ctx: ModuleCtx,
    listener: Option<TcpListener>,
    directory: Arc<dyn DeviceDirectory>,
}

impl AspicoreModule {
    /// Binds the listening socket for the module.
    ///
    /// # Arguments
    ///
    /// * `address` - The address the server accepts device connections on.
    /// * `directory` - The device directory used to resolve announcements.
    ///
    /// # Returns
    ///
    /// * `Ok(AspicoreModule)` - If the socket is bound.
    /// * `Err(io::Error)` - If the address is invalid or binding fails.
    pub async fn new(
        ctx: ModuleCtx,
        address: &str,
        directory: Arc<dyn DeviceDirectory>,
    ) -> Result<Self, Error> {
        let address: SocketAddr = match address.parse() {
            Ok(addr) => addr,
            Err(e) => return Err(io::Error::new(ErrorKind::InvalidInput, e)),
        };
        let listener = TcpListener::bind(address).await?;
        Ok(AspicoreModule {
            ctx,
            listener: Some(listener),
            directory,
        })
    }

    /// The address the module actually listens on, useful when binding
    /// port 0. `None` once [`Module::run`] has taken the listener.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.listener.as_ref().and_then(|l| l.local_addr().ok())
    }
}

#[async_trait::async_trait]
impl Module for AspicoreModule {
    async fn run(&mut self) -> Result<(), ()> {
        let Some(listener) = self.listener.take() else {
            error!("Aspicore module started twice");
            return Err(());
        };
        if let Ok(address) = listener.local_addr() {
            info!("Accepting device connections on {}", address);
        }
        let sender = self.ctx.sender.clone();
        let directory = self.directory.clone();
        let accept_handle = tokio::spawn(async move {
            accept_loop(listener, sender, directory).await;
        });
        let mut run = true;
        while run {
            tokio::select! {
                event = self.ctx.receiver.recv() => {
                    match event {
                        Ok(event) => {
                            if let EventKind::QuitEvent = event.kind {
                                accept_handle.abort();
                                run = false;
                            }
                        }
                        Err(e) => error!("Error: {}", e),
                    }
                }
            }
        }
        Ok(())
    }
}

async fn accept_loop(
    listener: TcpListener,
    sender: tokio::sync::broadcast::Sender<Event>,
    directory: Arc<dyn DeviceDirectory>,
) {
    loop {
        match listener.accept().await {
            Ok((socket, peer)) => {
                debug!("device connection from {}", peer);
                let sender = sender.clone();
                let directory = directory.clone();
                tokio::spawn(async move {
                    connection_task(socket, peer, sender, directory).await;
                });
            }
            Err(e) => error!("Failed to accept device connection. Error: {}", e),
        }
    }
}

/// Reads one connection line by line until the peer closes. Decoded
/// records are published on the bus; lines the decoder rejects are
/// dropped without ending the connection.
async fn connection_task(
    socket: TcpStream,
    peer: SocketAddr,
    sender: tokio::sync::broadcast::Sender<Event>,
    directory: Arc<dyn DeviceDirectory>,
) {
    let mut decoder = AspicoreDecoder::new(directory);
    let mut framed = Framed::new(socket, LinesCodec::new());
    while let Some(result) = framed.next().await {
        match result {
            Ok(ref line) => {
                if let Some(record) = decoder.handle_line(line).await {
                    let _ = sender.send(Event {
                        kind: EventKind::PositionEvent(Arc::new(record)),
                    });
                }
            }
            Err(e) => {
                debug!("Receive error on connection {}: {:?}", peer, e);
            }
        }
    }
    debug!("device connection {} closed", peer);
}
