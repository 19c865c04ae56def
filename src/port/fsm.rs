//! The pluggable PTP port state machine table (`ptp_fsm(state, event) ->
//! state`).
//!
//! [`DefaultStateMachine`] is a standards-grounded default for a single-port
//! or simple multi-port deployment. It treats any qualified announce as
//! "become uncalibrated" and any announce-receipt timeout as "no masters
//! heard, become master", deferring the actual cross-port best-master-clock
//! decision to a collaborator outside this crate (see [`crate::bmc`]). A
//! boundary clock with real cross-port BMCA should supply its own
//! [`StateMachine`] instead.

use super::{Event, PortState};

/// Computes the next port state for a given state/event pair.
pub trait StateMachine {
    fn next_state(&self, state: PortState, event: Event) -> PortState;
}

/// The default table described in the module documentation.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultStateMachine;

impl StateMachine for DefaultStateMachine {
    fn next_state(&self, state: PortState, event: Event) -> PortState {
        if event == Event::FaultDetected {
            return PortState::Faulty;
        }

        match state {
            PortState::Initializing | PortState::Faulty => match event {
                Event::StateDecisionEvent | Event::None => PortState::Initializing,
                Event::AnnounceReceiptTimeoutExpires | Event::FaultDetected => state,
            },
            PortState::Disabled => state,
            PortState::Master | PortState::GrandMaster => state,
            PortState::Uncalibrated => match event {
                Event::StateDecisionEvent => PortState::Slave,
                Event::AnnounceReceiptTimeoutExpires => PortState::Master,
                _ => state,
            },
            PortState::Listening | PortState::PreMaster | PortState::Passive | PortState::Slave => {
                match event {
                    Event::StateDecisionEvent => PortState::Uncalibrated,
                    Event::AnnounceReceiptTimeoutExpires => PortState::Master,
                    _ => state,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fault_always_wins() {
        let fsm = DefaultStateMachine;
        for state in [
            PortState::Initializing,
            PortState::Listening,
            PortState::Master,
            PortState::Slave,
        ] {
            assert_eq!(
                fsm.next_state(state, Event::FaultDetected),
                PortState::Faulty
            );
        }
    }

    #[test]
    fn listening_qualifies_into_uncalibrated_then_slave() {
        let fsm = DefaultStateMachine;
        let uncalibrated = fsm.next_state(PortState::Listening, Event::StateDecisionEvent);
        assert_eq!(uncalibrated, PortState::Uncalibrated);

        let slave = fsm.next_state(uncalibrated, Event::StateDecisionEvent);
        assert_eq!(slave, PortState::Slave);
    }

    #[test]
    fn announce_timeout_promotes_to_master() {
        let fsm = DefaultStateMachine;
        assert_eq!(
            fsm.next_state(PortState::Slave, Event::AnnounceReceiptTimeoutExpires),
            PortState::Master
        );
        assert_eq!(
            fsm.next_state(PortState::Listening, Event::AnnounceReceiptTimeoutExpires),
            PortState::Master
        );
    }

    #[test]
    fn faulty_restarts_through_initializing() {
        let fsm = DefaultStateMachine;
        assert_eq!(
            fsm.next_state(PortState::Faulty, Event::StateDecisionEvent),
            PortState::Initializing
        );
    }

    #[test]
    fn master_is_not_displaced_by_a_plain_state_decision() {
        let fsm = DefaultStateMachine;
        assert_eq!(
            fsm.next_state(PortState::Master, Event::StateDecisionEvent),
            PortState::Master
        );
    }
}
