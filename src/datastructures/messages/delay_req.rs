use crate::datastructures::common::WireTimestamp;
use crate::datastructures::{WireFormat, WireFormatError};

pub(crate) const DELAY_REQ_BODY_LEN: usize = 10;

/// Sent by a slave-capable port to measure path delay to its parent. The
/// `origin_timestamp` field is not meaningful on the wire (this crate fills
/// it with zeroes); the measurement-relevant timestamp is the egress
/// hardware timestamp the transport stamps into the retained outgoing
/// message, not anything carried in the PDU itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DelayReqMessage {
    pub origin_timestamp: WireTimestamp,
}

impl WireFormat for DelayReqMessage {
    fn serialize(&self, buffer: &mut [u8]) -> Result<(), WireFormatError> {
        self.origin_timestamp.serialize(buffer)
    }

    fn deserialize(buffer: &[u8]) -> Result<Self, WireFormatError> {
        Ok(Self {
            origin_timestamp: WireTimestamp::deserialize(buffer)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let req = DelayReqMessage::default();
        let mut buf = [0u8; DELAY_REQ_BODY_LEN];
        req.serialize(&mut buf).unwrap();
        assert_eq!(DelayReqMessage::deserialize(&buf).unwrap(), req);
    }
}
