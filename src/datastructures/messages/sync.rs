use crate::datastructures::common::WireTimestamp;
use crate::datastructures::{WireFormat, WireFormatError};

pub(crate) const SYNC_BODY_LEN: usize = 10;

/// The event message a master periodically sends. In one-step mode
/// `origin_timestamp` is the precise egress time, stamped by the
/// transport's hardware timestamper as the PDU leaves; in two-step mode it
/// is a coarse placeholder and the precise time travels in the paired
/// [`FollowUpMessage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SyncMessage {
    pub origin_timestamp: WireTimestamp,
}

impl WireFormat for SyncMessage {
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
        let sync = SyncMessage {
            origin_timestamp: WireTimestamp {
                seconds: 12345,
                nanos: 6789,
            },
        };

        let mut buf = [0u8; SYNC_BODY_LEN];
        sync.serialize(&mut buf).unwrap();
        assert_eq!(SyncMessage::deserialize(&buf).unwrap(), sync);
    }
}
