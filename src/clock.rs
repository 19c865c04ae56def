//! The logical-clock boundary: the aggregator that owns the system clock
//! servo, the clock identity/domain, and the cross-port BMC decision. The
//! port engine never touches the servo directly; it only calls into this
//! trait to report samples and to query identity.
//!
//! An implementation of [`PortClock`] is out of scope for this crate (it is
//! the "clock" collaborator named in the scope section); what lives here is
//! only the interface the port engine is written against.

use crate::datastructures::common::{ClockIdentity, PortIdentity};
use crate::time::{Duration, Time};

/// The aggregator a port reports samples to and queries identity from.
///
/// Implementations combine candidates across all of a node's ports, run the
/// cross-port best-master-clock algorithm, and discipline the local system
/// clock. A single-port node can implement this trivially; a boundary clock
/// implementation coordinates multiple ports here.
pub trait PortClock {
    /// This clock's own identity, used as `sourcePortIdentity.clockIdentity`
    /// on outgoing messages and as the tie-breaker in dataset comparison.
    fn clock_identity(&self) -> ClockIdentity;

    /// The PTP domain this clock participates in.
    fn clock_domain_number(&self) -> u8;

    /// The port identity of the clock currently considered this node's
    /// parent (the port identity carried in the best Announce heard so
    /// far), or `None` if this clock considers itself a grandmaster
    /// candidate.
    fn clock_parent_identity(&self) -> Option<PortIdentity>;

    /// Deliver a Sync/Follow-Up sample: `event_ts` is the local receive
    /// timestamp of the Sync event, `origin_ts` is the origin timestamp
    /// carried on the wire (from the Sync itself in one-step mode, or from
    /// the paired Follow_Up otherwise), and `correction` is `c1 + c2`
    /// (Sync correctionField plus Follow_Up correctionField, the latter
    /// zero in one-step mode).
    fn clock_synchronize(&mut self, event_ts: Time, origin_ts: Time, correction: Duration);

    /// Deliver a path-delay sample from a completed Delay_Req/Delay_Resp
    /// exchange: `t3` is the Delay_Req's egress hardware timestamp, `t4` is
    /// the Delay_Resp's carried receive timestamp, and `correction` is the
    /// Delay_Resp's correctionField.
    fn clock_path_delay(&mut self, t3: Time, t4: Time, correction: Duration);
}

impl<T: PortClock + ?Sized> PortClock for std::boxed::Box<T> {
    fn clock_identity(&self) -> ClockIdentity {
        self.as_ref().clock_identity()
    }

    fn clock_domain_number(&self) -> u8 {
        self.as_ref().clock_domain_number()
    }

    fn clock_parent_identity(&self) -> Option<PortIdentity> {
        self.as_ref().clock_parent_identity()
    }

    fn clock_synchronize(&mut self, event_ts: Time, origin_ts: Time, correction: Duration) {
        self.as_mut().clock_synchronize(event_ts, origin_ts, correction)
    }

    fn clock_path_delay(&mut self, t3: Time, t4: Time, correction: Duration) {
        self.as_mut().clock_path_delay(t3, t4, correction)
    }
}
