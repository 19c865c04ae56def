use crate::datastructures::common::PortIdentity;
use crate::time::Duration;

/// Which delay mechanism a port uses to measure path delay.
///
/// Only the end-to-end (E2E) mechanism is implemented; peer-delay (P2P) is a
/// declared non-goal.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DelayMechanism {
    /// End-to-end delay mechanism. `log_interval` is `portDS.logMinDelayReqInterval`.
    E2E { log_interval: i8 },
}

/// The timestamping mode a transport should capture, as requested at port
/// open. How this is realized is entirely up to the [`Transport`] impl; this
/// crate only threads the request through.
///
/// [`Transport`]: crate::port::transport::Transport
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimestampingMode {
    Hardware,
    Software,
}

/// Static configuration items of the PTP `portDS` dataset, supplied at port
/// open. Fields that change at runtime (`state`, `seqnum`, held messages,
/// the foreign-master table) live on [`crate::port::Port`] instead.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PortConfig {
    pub port_identity: PortIdentity,
    pub domain_number: u8,
    pub interface: String,
    pub delay_mechanism: DelayMechanism,
    pub timestamping_mode: TimestampingMode,
    pub log_announce_interval: i8,
    pub announce_receipt_timeout: u8,
    pub log_sync_interval: i8,
    pub master_only: bool,
    /// A static correction for known path asymmetry, accepted here for
    /// callers that want to apply it at the clock layer. This engine itself
    /// never reads it back out.
    pub delay_asymmetry: Duration,
}

impl PortConfig {
    /// `portDS.logMinDelayReqInterval`, read out of the configured delay
    /// mechanism (the only one this crate implements).
    pub fn log_min_delay_req_interval(&self) -> i8 {
        match self.delay_mechanism {
            DelayMechanism::E2E { log_interval } => log_interval,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datastructures::common::ClockIdentity;

    #[test]
    fn min_delay_req_interval_reads_through_e2e() {
        let config = PortConfig {
            port_identity: PortIdentity {
                clock_identity: ClockIdentity([0; 8]),
                port_number: 1,
            },
            domain_number: 0,
            interface: "eth0".into(),
            delay_mechanism: DelayMechanism::E2E { log_interval: -3 },
            timestamping_mode: TimestampingMode::Hardware,
            log_announce_interval: 1,
            announce_receipt_timeout: 3,
            log_sync_interval: 0,
            master_only: false,
            delay_asymmetry: Duration::ZERO,
        };

        assert_eq!(config.log_min_delay_req_interval(), -3);
    }
}
