use crate::datastructures::{WireFormat, WireFormatError};
use crate::time::Time;

/// The 10-byte PTP timestamp format used in message bodies (`originTimestamp`,
/// `receiveTimestamp`): a 48-bit seconds field plus 32-bit nanoseconds
/// (IEEE 1588-2008 5.3.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WireTimestamp {
    pub seconds: u64,
    pub nanos: u32,
}

impl WireFormat for WireTimestamp {
    fn serialize(&self, buffer: &mut [u8]) -> Result<(), WireFormatError> {
        if buffer.len() < 10 {
            return Err(WireFormatError::BufferTooShort);
        }

        let seconds_msb = ((self.seconds >> 32) & 0xffff) as u16;
        let seconds_lsb = (self.seconds & 0xffff_ffff) as u32;

        buffer[0..2].copy_from_slice(&seconds_msb.to_be_bytes());
        buffer[2..6].copy_from_slice(&seconds_lsb.to_be_bytes());
        buffer[6..10].copy_from_slice(&self.nanos.to_be_bytes());
        Ok(())
    }

    fn deserialize(buffer: &[u8]) -> Result<Self, WireFormatError> {
        if buffer.len() < 10 {
            return Err(WireFormatError::BufferTooShort);
        }

        let seconds_msb = u16::from_be_bytes(buffer[0..2].try_into().unwrap()) as u64;
        let seconds_lsb = u32::from_be_bytes(buffer[2..6].try_into().unwrap()) as u64;
        let nanos = u32::from_be_bytes(buffer[6..10].try_into().unwrap());

        Ok(Self {
            seconds: (seconds_msb << 32) | seconds_lsb,
            nanos,
        })
    }
}

impl From<Time> for WireTimestamp {
    fn from(time: Time) -> Self {
        let nanos = time.as_nanos();
        Self {
            seconds: (nanos / 1_000_000_000) as u64,
            nanos: (nanos % 1_000_000_000) as u32,
        }
    }
}

impl From<WireTimestamp> for Time {
    fn from(ts: WireTimestamp) -> Self {
        Time::from_nanos(ts.seconds as i128 * 1_000_000_000 + ts.nanos as i128)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wireformat_roundtrip() {
        let ts = WireTimestamp {
            seconds: 0x0000_1122_3344,
            nanos: 123_456_789,
        };

        let mut buf = [0u8; 10];
        ts.serialize(&mut buf).unwrap();
        assert_eq!(WireTimestamp::deserialize(&buf).unwrap(), ts);
    }

    #[test]
    fn time_roundtrip() {
        let time = Time::from_nanos(5_123_456_789);
        let ts: WireTimestamp = time.into();
        assert_eq!(ts.seconds, 5);
        assert_eq!(ts.nanos, 123_456_789);
        assert_eq!(Time::from(ts), time);
    }
}
