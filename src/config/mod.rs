//! Per-port configuration.
//!
//! # Port
//! * [`PortConfig`]
//! * [`DelayMechanism`]
//! * [`TimestampingMode`]

mod port;

pub use port::{DelayMechanism, PortConfig, TimestampingMode};
