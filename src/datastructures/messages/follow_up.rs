use crate::datastructures::common::WireTimestamp;
use crate::datastructures::{WireFormat, WireFormatError};

pub(crate) const FOLLOW_UP_BODY_LEN: usize = 10;

/// Sent by a two-step master immediately after the Sync it pairs with,
/// carrying that Sync's precise egress timestamp (IEEE 1588-2008 13.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FollowUpMessage {
    pub precise_origin_timestamp: WireTimestamp,
}

impl WireFormat for FollowUpMessage {
    fn serialize(&self, buffer: &mut [u8]) -> Result<(), WireFormatError> {
        self.precise_origin_timestamp.serialize(buffer)
    }

    fn deserialize(buffer: &[u8]) -> Result<Self, WireFormatError> {
        Ok(Self {
            precise_origin_timestamp: WireTimestamp::deserialize(buffer)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let follow_up = FollowUpMessage {
            precise_origin_timestamp: WireTimestamp {
                seconds: 98765,
                nanos: 4321,
            },
        };

        let mut buf = [0u8; FOLLOW_UP_BODY_LEN];
        follow_up.serialize(&mut buf).unwrap();
        assert_eq!(FollowUpMessage::deserialize(&buf).unwrap(), follow_up);
    }
}
