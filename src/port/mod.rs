//! A single network port of a PTP ordinary/boundary clock: message
//! classification, foreign-master bookkeeping, the Sync/Follow_Up
//! reassembler, the delay-request/response exchange, and the state-machine
//! driver that ties them together.
//!
//! [`Port`] is generic over its [`Transport`], its two [`Timer`]s, and its
//! [`StateMachine`]; the clock it reports samples to and queries identity
//! from ([`PortClock`](crate::clock::PortClock)) is passed in at each call
//! site rather than owned, since in a multi-port node the clock is shared.

pub mod fsm;
pub mod timer;
pub mod transport;

use std::os::fd::RawFd;
use std::rc::Rc;

use fsm::{DefaultStateMachine, StateMachine};
use timer::Timer;
use transport::Transport;

use crate::bmc::ForeignMasterTable;
use crate::clock::PortClock;
use crate::config::{DelayMechanism, PortConfig};
use crate::datastructures::common::{PortIdentity, TimeInterval, WireTimestamp};
use crate::datastructures::messages::{
    control_field, DelayReqMessage, DelayRespMessage, Header, Message, MessageBody, MessageType,
    SharedMessage, HEADER_LEN, MAX_MESSAGE_LEN,
};
use crate::error::PortError;
use crate::time::{Duration, Interval, Time};
use crate::StateChangeEvent;

/// Index into the descriptor array a port's embedder polls on: the
/// announce-receipt timer.
pub const FDA_ANNOUNCE_TIMER: usize = 0;
/// Index of the delay-request timer.
pub const FDA_DELAY_TIMER: usize = 1;
/// Index of the transport's event socket.
pub const FDA_EVENT_SOCKET: usize = 2;
/// Index of the transport's general socket.
pub const FDA_GENERAL_SOCKET: usize = 3;
/// Number of descriptors a port registers.
pub const FDA_LEN: usize = 4;

/// One of the ten PTP port states (IEEE 1588-2008 Figure 24).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortState {
    Initializing,
    Faulty,
    Disabled,
    Listening,
    PreMaster,
    Master,
    GrandMaster,
    Passive,
    Uncalibrated,
    Slave,
}

impl core::fmt::Display for PortState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::Initializing => "Initializing",
            Self::Faulty => "Faulty",
            Self::Disabled => "Disabled",
            Self::Listening => "Listening",
            Self::PreMaster => "PreMaster",
            Self::Master => "Master",
            Self::GrandMaster => "GrandMaster",
            Self::Passive => "Passive",
            Self::Uncalibrated => "Uncalibrated",
            Self::Slave => "Slave",
        };
        f.write_str(name)
    }
}

/// An input to the port state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// No state-relevant input; the common case.
    None,
    /// The announce-receipt timer fired: no qualified master heard in time.
    AnnounceReceiptTimeoutExpires,
    /// A new or changed qualified announce was observed.
    StateDecisionEvent,
    /// A transport, timer, or allocation failure occurred.
    FaultDetected,
}

/// A single PTP port.
pub struct Port<T, A, D, S = DefaultStateMachine> {
    config: PortConfig,
    port_identity: PortIdentity,
    state: PortState,
    seqnum: u16,
    delay_req: Option<SharedMessage>,
    last_sync: Option<SharedMessage>,
    last_follow_up: Option<SharedMessage>,
    foreign_masters: ForeignMasterTable,
    peer_mean_path_delay: Duration,
    state_machine: S,
    transport: T,
    announce_timer: A,
    delay_timer: D,
}

impl<T: Transport, A: Timer, D: Timer, S: StateMachine> Port<T, A, D, S> {
    /// Creates a port in the `INITIALIZING` state. The port does not touch
    /// the network or arm any timer until the first
    /// [`dispatch`](Self::dispatch) call moves it out of `INITIALIZING`.
    pub fn new(
        config: PortConfig,
        transport: T,
        announce_timer: A,
        delay_timer: D,
        state_machine: S,
    ) -> Self {
        Self {
            port_identity: config.port_identity,
            state: PortState::Initializing,
            seqnum: 0,
            delay_req: None,
            last_sync: None,
            last_follow_up: None,
            foreign_masters: ForeignMasterTable::new(),
            peer_mean_path_delay: Duration::ZERO,
            state_machine,
            transport,
            announce_timer,
            delay_timer,
            config,
        }
    }

    pub fn port_identity(&self) -> PortIdentity {
        self.port_identity
    }

    pub fn state(&self) -> PortState {
        self.state
    }

    /// `portDS.peerMeanPathDelay`, the last path delay sample this port
    /// reported to the clock. Zero until the first Delay_Resp is paired.
    pub fn peer_mean_path_delay(&self) -> Duration {
        self.peer_mean_path_delay
    }

    /// The descriptors this port's embedder polls on, in `FDA_*` order.
    pub fn fds(&self) -> [RawFd; FDA_LEN] {
        [
            self.announce_timer.fd(),
            self.delay_timer.fd(),
            self.transport.event_fd(),
            self.transport.general_fd(),
        ]
    }

    fn announce_timer_duration(&self) -> Duration {
        Duration::from_interval(Interval::from_log_2(self.config.log_announce_interval))
            * self.config.announce_receipt_timeout as u16
    }

    fn delay_timer_duration(&self) -> Duration {
        Duration::from_interval(Interval::from_log_2(
            self.config.log_min_delay_req_interval() + 1,
        ))
    }

    /// Opens the transport and arms the announce timer. Run synchronously
    /// by [`dispatch`](Self::dispatch) whenever the state machine requests
    /// `INITIALIZING`.
    fn initialize(&mut self) -> Result<(), PortError> {
        self.transport
            .open(&self.config.interface, self.config.timestamping_mode)
            .map_err(|_| PortError::Transport("failed to open transport"))?;

        self.delay_timer.clear();
        self.announce_timer.arm(self.announce_timer_duration());
        self.state = PortState::Listening;

        Ok(())
    }

    /// Releases held messages, clears both timers, and closes the
    /// transport. Consumes the port.
    pub fn close(mut self) {
        self.delay_req = None;
        self.last_sync = None;
        self.last_follow_up = None;
        self.announce_timer.clear();
        self.delay_timer.clear();
        self.transport.close();
    }

    /// Advances the state machine on `event` and, on a state change,
    /// re-arms the two timers per the announce/delay-timer table. Returns
    /// the transition as a [`StateChangeEvent`] for the caller to log or
    /// forward to a management interface. `INITIALIZING` is resolved
    /// synchronously and never observed as a committed state transition.
    pub fn dispatch(&mut self, event: Event) -> Option<StateChangeEvent> {
        let next = self.state_machine.next_state(self.state, event);

        if next == PortState::Initializing {
            match self.initialize() {
                Ok(()) => {}
                Err(err) => {
                    log::warn!("port {} failed to initialize: {err}", self.port_identity);
                    self.state = PortState::Faulty;
                }
            }
            return None;
        }

        if next == self.state {
            return None;
        }

        log::info!("port {}: {} -> {next}", self.port_identity, self.state);

        match next {
            PortState::Initializing | PortState::Faulty | PortState::Disabled => {
                self.announce_timer.clear();
                self.delay_timer.clear();
            }
            PortState::Listening | PortState::Passive => {
                self.announce_timer.arm(self.announce_timer_duration());
                self.delay_timer.clear();
            }
            PortState::PreMaster | PortState::Master | PortState::GrandMaster => {
                self.announce_timer.clear();
                self.delay_timer.clear();
            }
            PortState::Uncalibrated | PortState::Slave => {
                self.announce_timer.arm(self.announce_timer_duration());
                self.delay_timer.arm(self.delay_timer_duration());
            }
        }

        self.state = next;

        let port_id = self.port_identity;
        Some(match next {
            PortState::Initializing => StateChangeEvent::PortBecameInitializing { port_id },
            PortState::Faulty => StateChangeEvent::PortBecameFaulty { port_id },
            PortState::Disabled => StateChangeEvent::PortBecameDisabled { port_id },
            PortState::Listening => StateChangeEvent::PortBecameListening { port_id },
            PortState::PreMaster => StateChangeEvent::PortBecamePreMaster { port_id },
            PortState::Master => StateChangeEvent::PortBecameMaster { port_id },
            PortState::GrandMaster => StateChangeEvent::PortBecameGrandMaster { port_id },
            PortState::Passive => StateChangeEvent::PortBecamePassive { port_id },
            PortState::Uncalibrated => StateChangeEvent::PortBecameUncalibrated { port_id },
            PortState::Slave => StateChangeEvent::PortBecameSlave {
                port_id,
                master_port_id: self.foreign_masters.best().unwrap_or(port_id),
            },
        })
    }

    /// Demultiplexes a single poll-readable descriptor (indexed per the
    /// `FDA_*` constants) to timer logic or the message classifier,
    /// returning the event the caller should feed to
    /// [`dispatch`](Self::dispatch).
    pub fn event(&mut self, fda_index: usize, now: Time, clock: &mut impl PortClock) -> Event {
        match fda_index {
            FDA_ANNOUNCE_TIMER => {
                self.foreign_masters.clear_best();
                self.announce_timer.arm(self.announce_timer_duration());
                Event::AnnounceReceiptTimeoutExpires
            }
            FDA_DELAY_TIMER => {
                self.delay_timer.arm(self.delay_timer_duration());
                match self.send_delay_request(clock.clock_domain_number()) {
                    Ok(()) => Event::None,
                    Err(err) => {
                        log::warn!("port {}: {err}", self.port_identity);
                        Event::FaultDetected
                    }
                }
            }
            FDA_EVENT_SOCKET => self.handle_event_socket(now, clock),
            FDA_GENERAL_SOCKET => self.handle_general_socket(now, clock),
            _ => Event::None,
        }
    }

    fn handle_event_socket(&mut self, now: Time, clock: &mut impl PortClock) -> Event {
        let mut buffer = [0u8; MAX_MESSAGE_LEN];
        let received = match self.transport.recv_event(&mut buffer) {
            Ok(Some(received)) => received,
            Ok(None) => return Event::None,
            Err(err) => {
                log::warn!("port {}: event recv failed: {err}", self.port_identity);
                return Event::FaultDetected;
            }
        };

        self.handle_received(&buffer, received, now, clock)
    }

    fn handle_general_socket(&mut self, now: Time, clock: &mut impl PortClock) -> Event {
        let mut buffer = [0u8; MAX_MESSAGE_LEN];
        let received = match self.transport.recv_general(&mut buffer) {
            Ok(Some(received)) => received,
            Ok(None) => return Event::None,
            Err(err) => {
                log::warn!("port {}: general recv failed: {err}", self.port_identity);
                return Event::FaultDetected;
            }
        };

        self.handle_received(&buffer, received, now, clock)
    }

    fn handle_received(
        &mut self,
        buffer: &[u8],
        (len, hwts): (usize, Time),
        now: Time,
        clock: &mut impl PortClock,
    ) -> Event {
        let mut message = match Message::deserialize(&buffer[..len], now) {
            Ok(message) => message,
            Err(error) => {
                log::debug!(
                    "port {}: dropping unparseable message: {error}",
                    self.port_identity
                );
                return Event::None;
            }
        };
        message.hwts = hwts;
        let message = Rc::new(message);

        match message.header.message_type {
            MessageType::Announce => {
                if self.process_announce(Rc::clone(&message), now) {
                    return Event::StateDecisionEvent;
                }
                Event::None
            }
            MessageType::Sync => {
                self.process_sync(message, clock);
                Event::None
            }
            MessageType::FollowUp => {
                self.process_follow_up(message, clock);
                Event::None
            }
            MessageType::DelayReq => {
                if let Err(err) = self.process_delay_req(&message, clock.clock_domain_number()) {
                    log::warn!(
                        "port {}: failed to answer delay request: {err}",
                        self.port_identity
                    );
                    return Event::FaultDetected;
                }
                Event::None
            }
            MessageType::DelayResp => {
                self.process_delay_resp(&message, clock);
                Event::None
            }
            MessageType::PDelayReq
            | MessageType::PDelayResp
            | MessageType::PDelayRespFollowUp
            | MessageType::Signaling
            | MessageType::Management => Event::None,
        }
    }

    /// Routes an Announce to the foreign-master table, or (while
    /// calibrating against a known parent) to the current-master fast
    /// path. Returns whether the port should raise `StateDecisionEvent`.
    fn process_announce(&mut self, message: SharedMessage, now: Time) -> bool {
        match self.state {
            PortState::Initializing | PortState::Faulty | PortState::Disabled => false,
            PortState::Listening
            | PortState::PreMaster
            | PortState::Master
            | PortState::GrandMaster
            | PortState::Passive => self.foreign_masters.insert_announce(message, now),
            PortState::Uncalibrated | PortState::Slave => self.update_current_master(message, now),
        }
    }

    fn update_current_master(&mut self, message: SharedMessage, now: Time) -> bool {
        let is_current_master =
            self.foreign_masters.best() == Some(message.header.source_port_identity);

        if is_current_master {
            self.announce_timer.arm(self.announce_timer_duration());
        }

        self.foreign_masters.insert_announce(message, now)
    }

    /// Folds all of this dispatch round's announces into a best-master
    /// selection, to be invoked by the embedder once per round.
    pub fn compute_best(&mut self, now: Time) -> Option<PortIdentity> {
        self.foreign_masters.compute_best(self.port_identity, now)
    }

    fn process_sync(&mut self, message: SharedMessage, clock: &mut impl PortClock) {
        if !matches!(self.state, PortState::Uncalibrated | PortState::Slave) {
            return;
        }
        if Some(message.header.source_port_identity) != clock.clock_parent_identity() {
            return;
        }

        if !message.header.is_two_step() {
            clock.clock_synchronize(
                message.hwts,
                message.ts_pdu,
                Duration::from(message.header.correction_field),
            );
            return;
        }

        if let Some(follow_up) = self.last_follow_up.take() {
            if follow_up.header.sequence_id == message.header.sequence_id {
                let correction = Duration::from(message.header.correction_field)
                    + Duration::from(follow_up.header.correction_field);
                clock.clock_synchronize(message.hwts, follow_up.ts_pdu, correction);
                return;
            }
            self.last_follow_up = Some(follow_up);
        }

        self.last_sync = Some(message);
    }

    fn process_follow_up(&mut self, message: SharedMessage, clock: &mut impl PortClock) {
        if !matches!(self.state, PortState::Uncalibrated | PortState::Slave) {
            return;
        }
        if Some(message.header.source_port_identity) != clock.clock_parent_identity() {
            return;
        }

        if let Some(sync) = self.last_sync.take() {
            if sync.header.sequence_id == message.header.sequence_id
                && sync.header.source_port_identity == message.header.source_port_identity
            {
                let correction = Duration::from(sync.header.correction_field)
                    + Duration::from(message.header.correction_field);
                clock.clock_synchronize(sync.hwts, message.ts_pdu, correction);
                return;
            }
            self.last_sync = Some(sync);
        }

        self.last_follow_up = Some(message);
    }

    /// Emits a Delay_Req on the event socket, replacing any previously
    /// pending one.
    fn send_delay_request(&mut self, domain_number: u8) -> Result<(), PortError> {
        let body = MessageBody::DelayReq(DelayReqMessage::default());
        let header = Header {
            message_type: MessageType::DelayReq,
            version: 2,
            message_length: (HEADER_LEN + body.content_len()) as u16,
            domain_number,
            flag_field: 0,
            correction_field: TimeInterval::default(),
            source_port_identity: self.port_identity,
            sequence_id: self.seqnum,
            control_field: control_field::DELAY_REQ,
            log_message_interval: 0x7f_u8 as i8,
        };
        self.seqnum = self.seqnum.wrapping_add(1);

        let message = Message {
            header,
            body,
            hwts: Time::ZERO,
            ts_pdu: Time::ZERO,
            ts_host: Time::ZERO,
        };

        let mut buffer = [0u8; MAX_MESSAGE_LEN];
        let written = message.serialize(&mut buffer)?;

        let hwts = self
            .transport
            .send_event(&buffer[..written])
            .map_err(|_| PortError::Transport("failed to send delay request"))?;

        self.delay_req = Some(Rc::new(Message { hwts, ..message }));
        Ok(())
    }

    /// Matches an inbound Delay_Resp against the pending request and, on a
    /// match, reports the path delay sample and releases the pending
    /// request (so a duplicate response is ignored).
    fn process_delay_resp(&mut self, message: &SharedMessage, clock: &mut impl PortClock) {
        if !matches!(self.state, PortState::Uncalibrated | PortState::Slave) {
            return;
        }

        let Some(delay_req) = &self.delay_req else {
            return;
        };

        let resp = match &message.body {
            MessageBody::DelayResp(resp) => resp,
            _ => return,
        };

        if resp.requesting_port_identity != delay_req.header.source_port_identity
            || message.header.sequence_id != delay_req.header.sequence_id
        {
            return;
        }

        let correction = Duration::from(message.header.correction_field);
        self.peer_mean_path_delay =
            Duration::from_nanos(((message.ts_pdu - delay_req.hwts) - correction).nanos() / 2);

        clock.clock_path_delay(delay_req.hwts, message.ts_pdu, correction);

        let peer_interval = message.header.log_message_interval;
        if peer_interval != self.config.log_min_delay_req_interval() {
            if (-7..=7).contains(&peer_interval) {
                self.config.delay_mechanism = DelayMechanism::E2E {
                    log_interval: peer_interval,
                };
            } else {
                log::warn!(
                    "port {}: rejecting out-of-range peer delay-request interval {peer_interval}",
                    self.port_identity
                );
            }
        }

        self.delay_req = None;
    }

    /// Answers an inbound Delay_Req while acting as master.
    fn process_delay_req(
        &mut self,
        message: &SharedMessage,
        domain_number: u8,
    ) -> Result<(), PortError> {
        if !matches!(self.state, PortState::Master | PortState::GrandMaster) {
            return Ok(());
        }

        let body = MessageBody::DelayResp(DelayRespMessage {
            receive_timestamp: WireTimestamp::from(message.hwts),
            requesting_port_identity: message.header.source_port_identity,
        });

        let header = Header {
            message_type: MessageType::DelayResp,
            version: 2,
            message_length: (HEADER_LEN + body.content_len()) as u16,
            domain_number,
            flag_field: 0,
            correction_field: message.header.correction_field,
            source_port_identity: self.port_identity,
            sequence_id: message.header.sequence_id,
            control_field: control_field::DELAY_RESP,
            log_message_interval: self.config.log_min_delay_req_interval(),
        };

        let response = Message {
            header,
            body,
            hwts: Time::ZERO,
            ts_pdu: Time::ZERO,
            ts_host: Time::ZERO,
        };

        let mut buffer = [0u8; MAX_MESSAGE_LEN];
        let written = response.serialize(&mut buffer)?;

        self.transport
            .send_general(&buffer[..written])
            .map_err(|_| PortError::Transport("failed to send delay response"))?;

        Ok(())
    }
}
