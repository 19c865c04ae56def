use crate::datastructures::common::{PortIdentity, WireTimestamp};
use crate::datastructures::{WireFormat, WireFormatError};

pub(crate) const DELAY_RESP_BODY_LEN: usize = 20;

/// A master's reply to a Delay_Req, carrying the timestamp at which the
/// request was received (IEEE 1588-2008 13.8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DelayRespMessage {
    pub receive_timestamp: WireTimestamp,
    pub requesting_port_identity: PortIdentity,
}

impl WireFormat for DelayRespMessage {
    fn serialize(&self, buffer: &mut [u8]) -> Result<(), WireFormatError> {
        if buffer.len() < DELAY_RESP_BODY_LEN {
            return Err(WireFormatError::BufferTooShort);
        }

        self.receive_timestamp.serialize(&mut buffer[0..10])?;
        self.requesting_port_identity
            .serialize(&mut buffer[10..20])?;

        Ok(())
    }

    fn deserialize(buffer: &[u8]) -> Result<Self, WireFormatError> {
        if buffer.len() < DELAY_RESP_BODY_LEN {
            return Err(WireFormatError::BufferTooShort);
        }

        Ok(Self {
            receive_timestamp: WireTimestamp::deserialize(&buffer[0..10])?,
            requesting_port_identity: PortIdentity::deserialize(&buffer[10..20])?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datastructures::common::ClockIdentity;

    #[test]
    fn roundtrip() {
        let resp = DelayRespMessage {
            receive_timestamp: WireTimestamp {
                seconds: 42,
                nanos: 9001,
            },
            requesting_port_identity: PortIdentity {
                clock_identity: ClockIdentity([8, 7, 6, 5, 4, 3, 2, 1]),
                port_number: 3,
            },
        };

        let mut buf = [0u8; DELAY_RESP_BODY_LEN];
        resp.serialize(&mut buf).unwrap();
        assert_eq!(DelayRespMessage::deserialize(&buf).unwrap(), resp);
    }
}
