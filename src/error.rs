//! Errors produced by the port engine's fallible internal operations.
//!
//! None of these ever propagate out of [`crate::port::Port::dispatch`]: the
//! dispatch loop converts every [`PortError`] into
//! [`Event::FaultDetected`](crate::port::Event::FaultDetected) at the
//! boundary, so the state machine is the only thing that ever sees a
//! failure. `PortError` exists for the handful of functions
//! (`port_initialize`, `port_delay_request`, `port_close`) that need to
//! report *why* a fault happened, e.g. for logging.

/// Failure of one of the port engine's internal operations.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("transport error: {0}")]
    Transport(&'static str),

    #[error("timer error: {0}")]
    Timer(&'static str),

    #[error("failed to allocate a message")]
    Allocation,

    #[error("wire format error: {0}")]
    WireFormat(#[from] crate::datastructures::WireFormatError),
}
