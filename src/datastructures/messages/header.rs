use super::MessageType;
use crate::datastructures::{
    common::{PortIdentity, TimeInterval},
    WireFormat, WireFormatError,
};

/// Set on `flagField` bit 1 when a Sync does not carry its own origin
/// timestamp and relies on a paired Follow_Up to deliver it (two-step).
pub const PTP_TWO_STEP: u16 = 1 << 9;

pub(crate) const HEADER_LEN: usize = 34;

/// The 34-byte fixed header prefix common to every PTP message
/// (IEEE 1588-2008 13.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Header {
    pub message_type: MessageType,
    pub version: u8,
    pub message_length: u16,
    pub domain_number: u8,
    pub flag_field: u16,
    pub correction_field: TimeInterval,
    pub source_port_identity: PortIdentity,
    pub sequence_id: u16,
    pub control_field: u8,
    pub log_message_interval: i8,
}

impl Header {
    pub fn is_two_step(&self) -> bool {
        self.flag_field & PTP_TWO_STEP != 0
    }
}

impl WireFormat for Header {
    fn serialize(&self, buffer: &mut [u8]) -> Result<(), WireFormatError> {
        if buffer.len() < HEADER_LEN {
            return Err(WireFormatError::BufferTooShort);
        }

        buffer[0] = 0x0 << 4 | (u8::from(self.message_type) & 0x0f);
        buffer[1] = 0x0 << 4 | (self.version & 0x0f);
        buffer[2..4].copy_from_slice(&self.message_length.to_be_bytes());
        buffer[4] = self.domain_number;
        buffer[5] = 0;
        buffer[6..8].copy_from_slice(&self.flag_field.to_be_bytes());
        self.correction_field.serialize(&mut buffer[8..16])?;
        buffer[16..20].copy_from_slice(&[0; 4]);
        self.source_port_identity.serialize(&mut buffer[20..30])?;
        buffer[30..32].copy_from_slice(&self.sequence_id.to_be_bytes());
        buffer[32] = self.control_field;
        buffer[33] = self.log_message_interval as u8;

        Ok(())
    }

    fn deserialize(buffer: &[u8]) -> Result<Self, WireFormatError> {
        if buffer.len() < HEADER_LEN {
            return Err(WireFormatError::BufferTooShort);
        }

        Ok(Self {
            message_type: MessageType::try_from(buffer[0] & 0x0f)?,
            version: buffer[1] & 0x0f,
            message_length: u16::from_be_bytes(buffer[2..4].try_into().unwrap()),
            domain_number: buffer[4],
            flag_field: u16::from_be_bytes(buffer[6..8].try_into().unwrap()),
            correction_field: TimeInterval::deserialize(&buffer[8..16])?,
            source_port_identity: PortIdentity::deserialize(&buffer[20..30])?,
            sequence_id: u16::from_be_bytes(buffer[30..32].try_into().unwrap()),
            control_field: buffer[32],
            log_message_interval: buffer[33] as i8,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datastructures::common::ClockIdentity;

    fn sample() -> Header {
        Header {
            message_type: MessageType::Announce,
            version: 2,
            message_length: 64,
            domain_number: 0,
            flag_field: PTP_TWO_STEP,
            correction_field: TimeInterval(fixed::types::I48F16::from_num(0)),
            source_port_identity: PortIdentity {
                clock_identity: ClockIdentity([1, 2, 3, 4, 5, 6, 7, 8]),
                port_number: 1,
            },
            sequence_id: 42,
            control_field: 5,
            log_message_interval: 1,
        }
    }

    #[test]
    fn roundtrip() {
        let header = sample();
        let mut buf = [0u8; HEADER_LEN];
        header.serialize(&mut buf).unwrap();
        assert_eq!(Header::deserialize(&buf).unwrap(), header);
    }

    #[test]
    fn two_step_flag() {
        let mut header = sample();
        assert!(header.is_two_step());
        header.flag_field = 0;
        assert!(!header.is_two_step());
    }

    #[test]
    fn buffer_too_short_is_rejected() {
        let buf = [0u8; HEADER_LEN - 1];
        assert!(matches!(
            Header::deserialize(&buf),
            Err(WireFormatError::BufferTooShort)
        ));
    }
}
