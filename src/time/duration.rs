use core::ops::{Add, AddAssign, Mul, Neg, Sub};

use super::Interval;
use crate::datastructures::common::TimeInterval;

/// A span of time between two [`Time`](`super::Time`) instants.
///
/// Internally represented in whole nanoseconds. This is precise enough for
/// all PTP purposes (PTP's own `correctionField` only carries 2^-16 ns of
/// sub-nanosecond precision, see [`TimeInterval`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Duration {
    nanos: i128,
}

impl Duration {
    pub const ZERO: Self = Self { nanos: 0 };

    pub const fn from_nanos(nanos: i128) -> Self {
        Self { nanos }
    }

    pub const fn from_secs(secs: i64) -> Self {
        Self {
            nanos: secs as i128 * 1_000_000_000,
        }
    }

    pub const fn from_interval(interval: Interval) -> Self {
        Self::from_nanos(interval.as_nanos())
    }

    pub fn nanos(self) -> i128 {
        self.nanos
    }

    pub fn as_secs_f64(self) -> f64 {
        self.nanos as f64 / 1_000_000_000.0
    }

    pub fn abs(self) -> Self {
        Self {
            nanos: self.nanos.abs(),
        }
    }
}

impl From<TimeInterval> for Duration {
    fn from(interval: TimeInterval) -> Self {
        // TimeInterval is scaled nanoseconds (ns * 2^16); drop the fractional part.
        Self::from_nanos(interval.0.to_bits() as i128 >> 16)
    }
}

impl From<core::time::Duration> for Duration {
    fn from(value: core::time::Duration) -> Self {
        Self::from_nanos(value.as_nanos() as i128)
    }
}

impl TryFrom<Duration> for core::time::Duration {
    type Error = ();

    fn try_from(value: Duration) -> Result<Self, Self::Error> {
        if value.nanos < 0 {
            return Err(());
        }

        Ok(core::time::Duration::from_nanos(value.nanos as u64))
    }
}

impl Add for Duration {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            nanos: self.nanos + rhs.nanos,
        }
    }
}

impl AddAssign for Duration {
    fn add_assign(&mut self, rhs: Self) {
        self.nanos += rhs.nanos;
    }
}

impl Sub for Duration {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            nanos: self.nanos - rhs.nanos,
        }
    }
}

impl Neg for Duration {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self { nanos: -self.nanos }
    }
}

impl Mul<u16> for Duration {
    type Output = Self;

    fn mul(self, rhs: u16) -> Self::Output {
        Self {
            nanos: self.nanos * rhs as i128,
        }
    }
}

impl Mul<i64> for Duration {
    type Output = Self;

    fn mul(self, rhs: i64) -> Self::Output {
        Self {
            nanos: self.nanos * rhs as i128,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_interval_matches_log2_seconds() {
        assert_eq!(
            Duration::from_interval(Interval::from_log_2(0)),
            Duration::from_secs(1)
        );
        assert_eq!(
            Duration::from_interval(Interval::from_log_2(2)),
            Duration::from_secs(4)
        );
    }

    #[test]
    fn multiplication_by_window() {
        let one_sec = Duration::from_secs(1);
        assert_eq!(one_sec * 4u16, Duration::from_secs(4));
    }
}
