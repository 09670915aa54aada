// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Datagram transports for talking to printers.
//!
//! A [`Transport`] sends one request datagram and waits, bounded by a
//! timeout, for the matching reply. It never retries: retry policy belongs
//! to the poller.
//!
//! - [`UdpTransport`]: tokio UDP socket, used in production
//!
//! Tests and simulators can provide their own implementation.

mod udp;

pub use udp::UdpTransport;

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use crate::error::TransportError;

/// Trait for request/reply datagram exchanges with a single printer.
///
/// The exchange is split into [`send`](Self::send) and
/// [`receive`](Self::receive) so that callers can observe when the request
/// left; [`send_and_receive`](Self::send_and_receive) combines both.
pub trait Transport: Send {
    /// Sends a request datagram to `target`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Io`] if the datagram cannot be sent.
    fn send(
        &mut self,
        request: &[u8],
        target: SocketAddr,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Waits for a reply datagram from `source`.
    ///
    /// Datagrams from other senders are discarded. The wait ends at
    /// `timeout` after the call, regardless of discarded datagrams.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Timeout`] if no reply arrives in time, or
    /// [`TransportError::Io`] on socket failure.
    fn receive(
        &mut self,
        source: SocketAddr,
        timeout: Duration,
    ) -> impl Future<Output = Result<Vec<u8>, TransportError>> + Send;

    /// Sends `request` and waits for the reply.
    ///
    /// # Errors
    ///
    /// Returns the error of whichever step failed.
    fn send_and_receive(
        &mut self,
        request: &[u8],
        target: SocketAddr,
        timeout: Duration,
    ) -> impl Future<Output = Result<Vec<u8>, TransportError>> + Send {
        async move {
            self.send(request, target).await?;
            self.receive(target, timeout).await
        }
    }
}

/// Resolves `host:port` to a socket address, preferring IPv4.
///
/// Literal IP addresses resolve without a DNS query. The lookup is bounded
/// by `timeout`.
///
/// # Errors
///
/// Returns [`TransportError::AddressResolution`] if the name does not
/// resolve to any address, or [`TransportError::Timeout`] if the resolver
/// does not answer in time.
pub async fn resolve(
    host: &str,
    port: u16,
    timeout: Duration,
) -> Result<SocketAddr, TransportError> {
    let lookup = async {
        tokio::net::lookup_host((host, port))
            .await
            .map(|addresses| addresses.collect::<Vec<_>>())
    };
    pick_address(host, lookup, timeout).await
}

async fn pick_address<F>(
    host: &str,
    lookup: F,
    timeout: Duration,
) -> Result<SocketAddr, TransportError>
where
    F: Future<Output = io::Result<Vec<SocketAddr>>>,
{
    let addresses = tokio::time::timeout(timeout, lookup)
        .await
        .map_err(|_| TransportError::Timeout(timeout_millis(timeout)))?
        .map_err(|e| TransportError::AddressResolution(format!("{host}: {e}")))?;

    addresses
        .iter()
        .find(|addr| addr.is_ipv4())
        .or_else(|| addresses.first())
        .copied()
        .ok_or_else(|| TransportError::AddressResolution(format!("{host}: no addresses")))
}

/// Converts a timeout into the milliseconds reported by [`TransportError::Timeout`].
pub(crate) fn timeout_millis(timeout: Duration) -> u64 {
    u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOOKUP: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn resolves_literal_address() {
        let addr = resolve("192.168.1.50", 54321, LOOKUP).await.unwrap();
        assert_eq!(addr, "192.168.1.50:54321".parse().unwrap());
    }

    #[tokio::test]
    async fn resolves_ipv6_literal() {
        let addr = resolve("::1", 54321, LOOKUP).await.unwrap();
        assert!(addr.is_ipv6());
        assert_eq!(addr.port(), 54321);
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_lookup_times_out() {
        let lookup = std::future::pending::<io::Result<Vec<SocketAddr>>>();
        let err = pick_address("printer.lan", lookup, Duration::from_millis(250))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Timeout(250)));
    }

    #[tokio::test]
    async fn prefers_ipv4_address() {
        let v6: SocketAddr = "[fe80::1]:54321".parse().unwrap();
        let v4: SocketAddr = "10.0.0.7:54321".parse().unwrap();
        let lookup = async move { Ok::<_, io::Error>(vec![v6, v4]) };
        assert_eq!(pick_address("printer.lan", lookup, LOOKUP).await.unwrap(), v4);
    }

    #[tokio::test]
    async fn empty_lookup_is_resolution_error() {
        let lookup = async { Ok::<_, io::Error>(Vec::new()) };
        let err = pick_address("printer.lan", lookup, LOOKUP).await.unwrap_err();
        assert!(matches!(err, TransportError::AddressResolution(_)));
    }

    #[test]
    fn timeout_in_millis() {
        assert_eq!(timeout_millis(Duration::from_secs(5)), 5000);
    }
}
