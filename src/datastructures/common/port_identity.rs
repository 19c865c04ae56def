use core::fmt::Display;

use super::ClockIdentity;
use crate::datastructures::{WireFormat, WireFormatError};

/// Globally identifies a single PTP port: the clock it belongs to, plus that
/// clock's locally-unique port number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PortIdentity {
    pub clock_identity: ClockIdentity,
    pub port_number: u16,
}

impl WireFormat for PortIdentity {
    fn serialize(&self, buffer: &mut [u8]) -> Result<(), WireFormatError> {
        if buffer.len() < 10 {
            return Err(WireFormatError::BufferTooShort);
        }

        self.clock_identity.serialize(&mut buffer[0..8])?;
        buffer[8..10].copy_from_slice(&self.port_number.to_be_bytes());
        Ok(())
    }

    fn deserialize(buffer: &[u8]) -> Result<Self, WireFormatError> {
        if buffer.len() < 10 {
            return Err(WireFormatError::BufferTooShort);
        }

        Ok(Self {
            clock_identity: ClockIdentity::deserialize(&buffer[0..8])?,
            port_number: u16::from_be_bytes(buffer[8..10].try_into().unwrap()),
        })
    }
}

impl Display for PortIdentity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}-{}", self.clock_identity, self.port_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wireformat_roundtrip() {
        let id = PortIdentity {
            clock_identity: ClockIdentity([1, 2, 3, 4, 5, 6, 7, 8]),
            port_number: 42,
        };

        let mut buf = [0u8; 10];
        id.serialize(&mut buf).unwrap();
        assert_eq!(PortIdentity::deserialize(&buf).unwrap(), id);
    }

    #[test]
    fn equality_is_byte_wise() {
        let a = PortIdentity {
            clock_identity: ClockIdentity([0; 8]),
            port_number: 1,
        };
        let b = a;
        assert_eq!(a, b);
    }
}
