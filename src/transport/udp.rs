// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! UDP transport on a tokio socket.

use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;

use tokio::net::UdpSocket;
use tokio::time::Instant;

use super::{Transport, timeout_millis};
use crate::error::TransportError;

/// Largest datagram accepted; replies are well below this.
const RECEIVE_BUFFER_SIZE: usize = 2048;

/// UDP transport bound to an ephemeral local port.
///
/// The socket is bound on first use and reused across exchanges. After an
/// I/O error it is dropped and the next exchange binds a fresh one.
/// Datagrams still queued from earlier, timed-out exchanges are discarded
/// before each request, so a late reply is never taken for the current one.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use picaso_lib::codec::STATUS_REQUEST;
/// use picaso_lib::transport::{Transport, UdpTransport};
///
/// # async fn example() -> Result<(), picaso_lib::TransportError> {
/// let mut transport = UdpTransport::new();
/// let reply = transport
///     .send_and_receive(
///         &STATUS_REQUEST,
///         "192.168.1.50:54321".parse().unwrap(),
///         Duration::from_secs(5),
///     )
///     .await?;
/// println!("{} bytes", reply.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct UdpTransport {
    socket: Option<UdpSocket>,
    buffer: Vec<u8>,
}

impl UdpTransport {
    /// Creates a transport. No socket is bound until the first send.
    #[must_use]
    pub fn new() -> Self {
        Self {
            socket: None,
            buffer: vec![0; RECEIVE_BUFFER_SIZE],
        }
    }

    /// Returns the local address of the bound socket, if any.
    #[must_use]
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.socket.as_ref().and_then(|s| s.local_addr().ok())
    }

    /// Returns the socket in `slot`, binding one for the address family of
    /// `target` if needed.
    async fn socket_for(
        slot: &mut Option<UdpSocket>,
        target: SocketAddr,
    ) -> io::Result<&UdpSocket> {
        let family_matches = slot
            .as_ref()
            .and_then(|s| s.local_addr().ok())
            .is_some_and(|local| local.is_ipv4() == target.is_ipv4());

        if !family_matches {
            let bind: SocketAddr = if target.is_ipv4() {
                (Ipv4Addr::UNSPECIFIED, 0).into()
            } else {
                (Ipv6Addr::UNSPECIFIED, 0).into()
            };
            let socket = UdpSocket::bind(bind).await?;
            tracing::debug!(local = ?socket.local_addr().ok(), "Bound UDP socket");
            *slot = Some(socket);
        }

        slot.as_ref()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "socket not bound"))
    }

    /// Discards datagrams already queued on the socket.
    fn drain(socket: &UdpSocket, buffer: &mut [u8]) {
        let mut discarded = 0usize;
        while let Ok((_, from)) = socket.try_recv_from(buffer) {
            discarded += 1;
            tracing::trace!(%from, "Discarding stale datagram");
        }
        if discarded > 0 {
            tracing::debug!(discarded, "Discarded stale datagrams");
        }
    }

    fn fail(&mut self, error: io::Error) -> TransportError {
        self.socket = None;
        TransportError::Io(error)
    }
}

impl Default for UdpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UdpTransport {
    async fn send(&mut self, request: &[u8], target: SocketAddr) -> Result<(), TransportError> {
        let socket = match Self::socket_for(&mut self.socket, target).await {
            Ok(socket) => socket,
            Err(e) => return Err(self.fail(e)),
        };

        Self::drain(socket, &mut self.buffer);
        if let Err(e) = socket.send_to(request, target).await {
            return Err(self.fail(e));
        }

        tracing::debug!(%target, len = request.len(), "Sent UDP request");
        Ok(())
    }

    async fn receive(
        &mut self,
        source: SocketAddr,
        timeout: Duration,
    ) -> Result<Vec<u8>, TransportError> {
        let deadline = Instant::now() + timeout;

        loop {
            let Some(socket) = self.socket.as_ref() else {
                return Err(self.fail(io::Error::new(
                    io::ErrorKind::NotConnected,
                    "receive before send",
                )));
            };

            match tokio::time::timeout_at(deadline, socket.recv_from(&mut self.buffer)).await {
                Err(_) => return Err(TransportError::Timeout(timeout_millis(timeout))),
                Ok(Err(e)) => return Err(self.fail(e)),
                Ok(Ok((len, from))) if from.ip() == source.ip() => {
                    tracing::debug!(%from, len, "Received UDP reply");
                    return Ok(self.buffer[..len].to_vec());
                }
                Ok(Ok((len, from))) => {
                    tracing::debug!(
                        %from,
                        expected = %source,
                        len,
                        "Ignoring datagram from unexpected sender"
                    );
                }
            }
        }
    }
}
