use crate::datastructures::{
    common::{ClockIdentity, ClockQuality, TimeSource},
    WireFormat, WireFormatError,
};

pub(crate) const ANNOUNCE_BODY_LEN: usize = 20;

/// Carries a candidate grandmaster's dataset, broadcast periodically by
/// ports that are `MASTER`/`GRAND_MASTER`/`PASSIVE` and consumed by every
/// port's best-master-clock bookkeeping (IEEE 1588-2008 13.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnounceMessage {
    pub current_utc_offset: i16,
    pub grandmaster_priority_1: u8,
    pub grandmaster_clock_quality: ClockQuality,
    pub grandmaster_priority_2: u8,
    pub grandmaster_identity: ClockIdentity,
    pub steps_removed: u16,
    pub time_source: TimeSource,
}

impl WireFormat for AnnounceMessage {
    fn serialize(&self, buffer: &mut [u8]) -> Result<(), WireFormatError> {
        if buffer.len() < ANNOUNCE_BODY_LEN {
            return Err(WireFormatError::BufferTooShort);
        }

        buffer[0..2].copy_from_slice(&self.current_utc_offset.to_be_bytes());
        buffer[2] = 0;
        buffer[3] = self.grandmaster_priority_1;
        self.grandmaster_clock_quality
            .serialize(&mut buffer[4..8])?;
        buffer[8] = self.grandmaster_priority_2;
        self.grandmaster_identity.serialize(&mut buffer[9..17])?;
        buffer[17..19].copy_from_slice(&self.steps_removed.to_be_bytes());
        self.time_source.serialize(&mut buffer[19..20])?;

        Ok(())
    }

    fn deserialize(buffer: &[u8]) -> Result<Self, WireFormatError> {
        if buffer.len() < ANNOUNCE_BODY_LEN {
            return Err(WireFormatError::BufferTooShort);
        }

        Ok(Self {
            current_utc_offset: i16::from_be_bytes(buffer[0..2].try_into().unwrap()),
            grandmaster_priority_1: buffer[3],
            grandmaster_clock_quality: ClockQuality::deserialize(&buffer[4..8])?,
            grandmaster_priority_2: buffer[8],
            grandmaster_identity: ClockIdentity::deserialize(&buffer[9..17])?,
            steps_removed: u16::from_be_bytes(buffer[17..19].try_into().unwrap()),
            time_source: TimeSource::deserialize(&buffer[19..20])?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datastructures::common::ClockAccuracy;

    #[test]
    fn roundtrip() {
        let announce = AnnounceMessage {
            current_utc_offset: 37,
            grandmaster_priority_1: 128,
            grandmaster_clock_quality: ClockQuality {
                clock_class: 6,
                clock_accuracy: ClockAccuracy::NS100,
                offset_scaled_log_variance: 0x4e5d,
            },
            grandmaster_priority_2: 128,
            grandmaster_identity: ClockIdentity([1, 2, 3, 4, 5, 6, 7, 8]),
            steps_removed: 0,
            time_source: TimeSource::Gnss,
        };

        let mut buf = [0u8; ANNOUNCE_BODY_LEN];
        announce.serialize(&mut buf).unwrap();
        assert_eq!(AnnounceMessage::deserialize(&buf).unwrap(), announce);
    }
}
