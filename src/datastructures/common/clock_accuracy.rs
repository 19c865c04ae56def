use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::datastructures::{WireFormat, WireFormatError};

/// The estimated accuracy of a clock, in bucketed steps, as carried in
/// `ClockQuality.clockAccuracy` (IEEE 1588-2008 Table 6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, IntoPrimitive, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum ClockAccuracy {
    PS1 = 0x17,
    PS2_5 = 0x18,
    NS10 = 0x19,
    NS25 = 0x1a,
    NS100 = 0x1b,
    NS250 = 0x1c,
    US1 = 0x1d,
    US2_5 = 0x1e,
    US10 = 0x1f,
    US25 = 0x20,
    US100 = 0x21,
    US250 = 0x22,
    MS1 = 0x23,
    MS2_5 = 0x24,
    MS10 = 0x25,
    MS25 = 0x26,
    MS100 = 0x27,
    MS250 = 0x28,
    S1 = 0x29,
    S10 = 0x2a,
    GT10S = 0x2b,
    Unknown = 0xfe,
}

impl ClockAccuracy {
    /// Compares accuracy in the order the dataset comparison algorithm
    /// (IEEE 1588-2008 Figure 34) requires: a *smaller* bucket index means a
    /// *more accurate* clock, but the comparison algorithm orders candidates
    /// by raw enum value, which happens to already sort best-first. Kept as a
    /// named method (rather than relying on the derived `Ord`) so the
    /// algorithm reads the same way the standard states it.
    pub fn cmp_numeric(&self, other: &Self) -> core::cmp::Ordering {
        let left: u8 = (*self).into();
        let right: u8 = (*other).into();
        left.cmp(&right)
    }
}

impl Default for ClockAccuracy {
    fn default() -> Self {
        Self::Unknown
    }
}

impl WireFormat for ClockAccuracy {
    fn serialize(&self, buffer: &mut [u8]) -> Result<(), WireFormatError> {
        buffer[0] = (*self).into();
        Ok(())
    }

    fn deserialize(buffer: &[u8]) -> Result<Self, WireFormatError> {
        Ok(Self::try_from(buffer[0]).unwrap_or(Self::Unknown))
    }
}
