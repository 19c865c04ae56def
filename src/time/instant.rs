use core::ops::{Add, Sub};

use super::Duration;

/// A point in time, represented as a signed nanosecond offset from the PTP
/// epoch (1970-01-01T00:00:00TAI).
///
/// Kept separate from [`Duration`] (a span) the same way `std::time::Instant`
/// is kept separate from `std::time::Duration`: adding two `Time`s is not a
/// meaningful operation, but subtracting one from another, or offsetting one
/// by a `Duration`, is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct Time {
    nanos: i128,
}

impl Time {
    pub const ZERO: Self = Self { nanos: 0 };

    pub const fn from_nanos(nanos: i128) -> Self {
        Self { nanos }
    }

    pub const fn from_secs(secs: i64) -> Self {
        Self {
            nanos: secs as i128 * 1_000_000_000,
        }
    }

    pub fn as_nanos(self) -> i128 {
        self.nanos
    }

    pub fn as_secs_f64(self) -> f64 {
        self.nanos as f64 / 1_000_000_000.0
    }

    /// Saturating subtraction used for timeout comparisons, so a receive
    /// timestamp briefly in the future (clock skew between host and PHY)
    /// never panics or wraps into a huge duration.
    pub fn saturating_duration_since(self, earlier: Self) -> Duration {
        Duration::from_nanos(self.nanos.saturating_sub(earlier.nanos).max(0))
    }
}

impl Add<Duration> for Time {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self::Output {
        Self {
            nanos: self.nanos + rhs.nanos(),
        }
    }
}

impl Sub<Duration> for Time {
    type Output = Self;

    fn sub(self, rhs: Duration) -> Self::Output {
        Self {
            nanos: self.nanos - rhs.nanos(),
        }
    }
}

impl Sub for Time {
    type Output = Duration;

    fn sub(self, rhs: Self) -> Self::Output {
        Duration::from_nanos(self.nanos - rhs.nanos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_since_is_saturating() {
        let earlier = Time::from_secs(10);
        let later = Time::from_secs(5);
        assert_eq!(later.saturating_duration_since(earlier), Duration::ZERO);
    }

    #[test]
    fn add_and_subtract_duration() {
        let t = Time::from_secs(10);
        let d = Duration::from_secs(3);
        assert_eq!(t + d, Time::from_secs(13));
        assert_eq!(t - d, Time::from_secs(7));
        assert_eq!((t + d) - t, d);
    }
}
