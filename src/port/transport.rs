//! The network boundary: send/receive with hardware timestamping, on the
//! two well-known PTP sockets (event and general).

use std::os::fd::RawFd;

use crate::config::TimestampingMode;
use crate::time::Time;

/// Send/receive surface for one port's network interface.
///
/// Event messages (Sync, Delay_Req, Delay_Resp, Pdelay_*) go out the event
/// socket and are timestamped on egress; everything else goes out the
/// general socket untimestamped. `recv` is expected to be non-blocking: the
/// poll loop outside this crate is what waits for readability.
pub trait Transport {
    type Error: core::fmt::Display;

    /// Opens the named interface with the requested timestamping mode.
    fn open(&mut self, interface: &str, timestamping: TimestampingMode) -> Result<(), Self::Error>;

    /// Closes both sockets. Called once, from `Port::close`.
    fn close(&mut self);

    /// Sends `buffer` on the event socket and returns the timestamp the
    /// transport captured at egress.
    fn send_event(&mut self, buffer: &[u8]) -> Result<Time, Self::Error>;

    /// Sends `buffer` on the general socket.
    fn send_general(&mut self, buffer: &[u8]) -> Result<(), Self::Error>;

    /// Reads one datagram from the event socket into `buffer`, along with
    /// its ingress hardware timestamp. Returns `Ok(None)` if nothing is
    /// pending (should not happen when called in response to a readable
    /// poll event, but is not itself an error).
    fn recv_event(&mut self, buffer: &mut [u8]) -> Result<Option<(usize, Time)>, Self::Error>;

    /// Reads one datagram from the general socket into `buffer`.
    fn recv_general(&mut self, buffer: &mut [u8]) -> Result<Option<(usize, Time)>, Self::Error>;

    /// Descriptor for the event socket, for the embedder's poll loop.
    fn event_fd(&self) -> RawFd;

    /// Descriptor for the general socket, for the embedder's poll loop.
    fn general_fd(&self) -> RawFd;
}
