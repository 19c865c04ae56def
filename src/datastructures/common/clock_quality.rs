use super::ClockAccuracy;
use crate::datastructures::{WireFormat, WireFormatError};

/// `ClockQuality` as carried in Announce messages and compared by the BMC
/// dataset comparison algorithm (IEEE 1588-2008 7.6.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClockQuality {
    pub clock_class: u8,
    pub clock_accuracy: ClockAccuracy,
    pub offset_scaled_log_variance: u16,
}

impl WireFormat for ClockQuality {
    fn serialize(&self, buffer: &mut [u8]) -> Result<(), WireFormatError> {
        buffer[0] = self.clock_class;
        self.clock_accuracy.serialize(&mut buffer[1..2])?;
        buffer[2..4].copy_from_slice(&self.offset_scaled_log_variance.to_be_bytes());
        Ok(())
    }

    fn deserialize(buffer: &[u8]) -> Result<Self, WireFormatError> {
        if buffer.len() < 4 {
            return Err(WireFormatError::BufferTooShort);
        }

        Ok(Self {
            clock_class: buffer[0],
            clock_accuracy: ClockAccuracy::deserialize(&buffer[1..2])?,
            offset_scaled_log_variance: u16::from_be_bytes(buffer[2..4].try_into().unwrap()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let quality = ClockQuality {
            clock_class: 6,
            clock_accuracy: ClockAccuracy::NS100,
            offset_scaled_log_variance: 0xaabb,
        };

        let mut buf = [0u8; 4];
        quality.serialize(&mut buf).unwrap();
        assert_eq!(ClockQuality::deserialize(&buf).unwrap(), quality);
    }
}
