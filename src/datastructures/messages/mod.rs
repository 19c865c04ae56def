//! PTP message parsing: the fixed header (§[`header`]) and the five message
//! bodies this crate actually interprets (Announce, Sync, Follow_Up,
//! Delay_Req, Delay_Resp). Peer-delay, Signaling, and Management PDUs are
//! classified by [`MessageType`] but never parsed past the header; they are
//! out of scope (see the crate-level non-goals) and are represented here as
//! [`MessageBody::Opaque`].

mod announce;
mod delay_req;
mod delay_resp;
mod follow_up;
mod header;
mod sync;

use std::rc::Rc;

pub use announce::AnnounceMessage;
pub use delay_req::DelayReqMessage;
pub use delay_resp::DelayRespMessage;
pub use follow_up::FollowUpMessage;
pub use header::{Header, HEADER_LEN, PTP_TWO_STEP};
pub use sync::SyncMessage;

use self::{
    announce::ANNOUNCE_BODY_LEN, delay_req::DELAY_REQ_BODY_LEN, delay_resp::DELAY_RESP_BODY_LEN,
    follow_up::FOLLOW_UP_BODY_LEN, sync::SYNC_BODY_LEN,
};
use super::{WireFormat, WireFormatError};
use crate::time::Time;

/// The legacy `controlField` values (IEEE 1588-2008 13.3.2.6), retained for
/// interoperability with PTPv1-derived stacks that still check it.
pub mod control_field {
    pub const SYNC: u8 = 0;
    pub const DELAY_REQ: u8 = 1;
    pub const FOLLOW_UP: u8 = 2;
    pub const DELAY_RESP: u8 = 3;
    pub const MANAGEMENT: u8 = 4;
    pub const ALL_OTHERS: u8 = 5;
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    num_enum::IntoPrimitive,
    num_enum::TryFromPrimitive,
)]
#[repr(u8)]
pub enum MessageType {
    Sync = 0x0,
    DelayReq = 0x1,
    PDelayReq = 0x2,
    PDelayResp = 0x3,
    FollowUp = 0x8,
    DelayResp = 0x9,
    PDelayRespFollowUp = 0xa,
    Announce = 0xb,
    Signaling = 0xc,
    Management = 0xd,
}

/// A parsed message body. Only the five types this crate's port engine acts
/// on are fully decoded; everything else round-trips as [`Self::Opaque`] so
/// it can still be classified (and silently dropped) without this crate
/// needing to understand its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageBody {
    Announce(AnnounceMessage),
    Sync(SyncMessage),
    FollowUp(FollowUpMessage),
    DelayReq(DelayReqMessage),
    DelayResp(DelayRespMessage),
    Opaque(MessageType),
}

impl MessageBody {
    pub fn message_type(&self) -> MessageType {
        match self {
            Self::Announce(_) => MessageType::Announce,
            Self::Sync(_) => MessageType::Sync,
            Self::FollowUp(_) => MessageType::FollowUp,
            Self::DelayReq(_) => MessageType::DelayReq,
            Self::DelayResp(_) => MessageType::DelayResp,
            Self::Opaque(ty) => *ty,
        }
    }

    /// Length in bytes of this body once serialized, not counting the header.
    pub fn content_len(&self) -> usize {
        match self {
            Self::Announce(_) => ANNOUNCE_BODY_LEN,
            Self::Sync(_) => SYNC_BODY_LEN,
            Self::FollowUp(_) => FOLLOW_UP_BODY_LEN,
            Self::DelayReq(_) => DELAY_REQ_BODY_LEN,
            Self::DelayResp(_) => DELAY_RESP_BODY_LEN,
            Self::Opaque(_) => 0,
        }
    }
}

/// Large enough for the header plus the largest body this crate parses
/// (Delay_Resp, at 20 bytes).
pub const MAX_MESSAGE_LEN: usize = HEADER_LEN + DELAY_RESP_BODY_LEN;

/// A fully parsed PTP message plus the timestamps the port engine needs: the
/// hardware timestamp of the event (`hwts`), the origin/receive timestamp
/// carried in (or paired with) the PDU (`ts_pdu`), and the host's receive
/// timestamp (`ts_host`).
///
/// Messages are immutable once received. They are held in multiple places at
/// once (a foreign-master record, the dispatch loop's transient reference,
/// the sync/follow-up reassembler), so callers share them via
/// [`Rc::clone`]/drop rather than this crate reimplementing its own
/// get/put refcounting. `Rc` is single-threaded, matching this engine's
/// single-threaded poll loop (see the concurrency model).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub header: Header,
    pub body: MessageBody,
    pub hwts: Time,
    pub ts_pdu: Time,
    pub ts_host: Time,
}

/// A message shared between the foreign-master table, the sync/follow-up
/// reassembler, and the dispatch loop's transient reference.
pub type SharedMessage = Rc<Message>;

impl Message {
    pub fn serialize(&self, buffer: &mut [u8]) -> Result<usize, WireFormatError> {
        self.header.serialize(buffer)?;
        let body_buf = &mut buffer[HEADER_LEN..];

        let body_len = match &self.body {
            MessageBody::Announce(m) => {
                m.serialize(body_buf)?;
                ANNOUNCE_BODY_LEN
            }
            MessageBody::Sync(m) => {
                m.serialize(body_buf)?;
                SYNC_BODY_LEN
            }
            MessageBody::FollowUp(m) => {
                m.serialize(body_buf)?;
                FOLLOW_UP_BODY_LEN
            }
            MessageBody::DelayReq(m) => {
                m.serialize(body_buf)?;
                DELAY_REQ_BODY_LEN
            }
            MessageBody::DelayResp(m) => {
                m.serialize(body_buf)?;
                DELAY_RESP_BODY_LEN
            }
            MessageBody::Opaque(_) => 0,
        };

        Ok(HEADER_LEN + body_len)
    }

    pub fn deserialize(buffer: &[u8], ts_host: Time) -> Result<Self, WireFormatError> {
        let header = Header::deserialize(buffer)?;
        let body_buf = &buffer[HEADER_LEN..];

        let body = match header.message_type {
            MessageType::Announce => {
                MessageBody::Announce(AnnounceMessage::deserialize(body_buf)?)
            }
            MessageType::Sync => MessageBody::Sync(SyncMessage::deserialize(body_buf)?),
            MessageType::FollowUp => {
                MessageBody::FollowUp(FollowUpMessage::deserialize(body_buf)?)
            }
            MessageType::DelayReq => MessageBody::DelayReq(DelayReqMessage::deserialize(body_buf)?),
            MessageType::DelayResp => {
                MessageBody::DelayResp(DelayRespMessage::deserialize(body_buf)?)
            }
            other => MessageBody::Opaque(other),
        };

        let ts_pdu = match &body {
            MessageBody::Sync(m) => m.origin_timestamp.into(),
            MessageBody::FollowUp(m) => m.precise_origin_timestamp.into(),
            MessageBody::DelayReq(m) => m.origin_timestamp.into(),
            MessageBody::DelayResp(m) => m.receive_timestamp.into(),
            MessageBody::Announce(_) | MessageBody::Opaque(_) => Time::ZERO,
        };

        Ok(Self {
            header,
            body,
            hwts: Time::ZERO,
            ts_pdu,
            ts_host,
        })
    }

    /// Length in bytes this message occupies once serialized.
    pub fn wire_len(&self) -> usize {
        HEADER_LEN + self.body.content_len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datastructures::common::{ClockIdentity, PortIdentity};

    fn header(message_type: MessageType, control: u8) -> Header {
        Header {
            message_type,
            version: 2,
            message_length: 0,
            domain_number: 0,
            flag_field: 0,
            correction_field: crate::datastructures::common::TimeInterval(
                fixed::types::I48F16::from_num(0),
            ),
            source_port_identity: PortIdentity {
                clock_identity: ClockIdentity([1; 8]),
                port_number: 1,
            },
            sequence_id: 7,
            control_field: control,
            log_message_interval: 0,
        }
    }

    #[test]
    fn announce_roundtrip_through_message_envelope() {
        let message = Message {
            header: header(MessageType::Announce, control_field::ALL_OTHERS),
            body: MessageBody::Announce(AnnounceMessage {
                current_utc_offset: 37,
                grandmaster_priority_1: 128,
                grandmaster_clock_quality: Default::default(),
                grandmaster_priority_2: 128,
                grandmaster_identity: ClockIdentity([1; 8]),
                steps_removed: 0,
                time_source: Default::default(),
            }),
            hwts: Time::ZERO,
            ts_pdu: Time::ZERO,
            ts_host: Time::ZERO,
        };

        let mut buf = [0u8; HEADER_LEN + ANNOUNCE_BODY_LEN];
        let written = message.serialize(&mut buf).unwrap();
        assert_eq!(written, buf.len());

        let parsed = Message::deserialize(&buf, Time::ZERO).unwrap();
        assert_eq!(parsed.header, message.header);
        assert_eq!(parsed.body, message.body);
    }

    #[test]
    fn pdelay_is_classified_but_opaque() {
        let mut buf = [0u8; HEADER_LEN];
        header(MessageType::PDelayReq, control_field::ALL_OTHERS)
            .serialize(&mut buf)
            .unwrap();

        let parsed = Message::deserialize(&buf, Time::ZERO).unwrap();
        assert_eq!(parsed.body, MessageBody::Opaque(MessageType::PDelayReq));
    }

    #[test]
    fn shared_message_refcounting_uses_rc() {
        let message = Rc::new(Message {
            header: header(MessageType::Sync, control_field::SYNC),
            body: MessageBody::Sync(SyncMessage::default()),
            hwts: Time::ZERO,
            ts_pdu: Time::ZERO,
            ts_host: Time::ZERO,
        });

        let held: SharedMessage = Rc::clone(&message);
        assert_eq!(Rc::strong_count(&message), 2);
        drop(held);
        assert_eq!(Rc::strong_count(&message), 1);
    }
}
