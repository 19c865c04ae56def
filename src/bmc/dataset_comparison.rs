//! Implementation of IEEE 1588-2008 9.3.4, the data set comparison
//! algorithm ("dscmp").

use core::cmp::Ordering;

use crate::datastructures::common::{ClockIdentity, ClockQuality, PortIdentity};
use crate::datastructures::messages::{AnnounceMessage, Header};

/// The data extracted from an Announce (or from this clock's own dataset)
/// that the comparison algorithm operates on. `identity_of_senders` and
/// `identity_of_receiver` are only used to break ties between two
/// announcements of the *same* grandmaster (Figure 35's topology check).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dataset {
    pub gm_priority_1: u8,
    pub gm_identity: ClockIdentity,
    pub gm_clock_quality: ClockQuality,
    pub gm_priority_2: u8,
    pub steps_removed: u16,
    pub identity_of_senders: ClockIdentity,
    pub identity_of_receiver: PortIdentity,
}

impl Dataset {
    /// Materializes a [`Dataset`] from an Announce's body and header, and
    /// the identity of the port that received it (`port_compute_best`'s
    /// `announce_to_dataset`).
    pub fn from_announce(
        header: &Header,
        announce: &AnnounceMessage,
        receiver: PortIdentity,
    ) -> Self {
        Self {
            gm_priority_1: announce.grandmaster_priority_1,
            gm_identity: announce.grandmaster_identity,
            gm_clock_quality: announce.grandmaster_clock_quality,
            gm_priority_2: announce.grandmaster_priority_2,
            steps_removed: announce.steps_removed,
            identity_of_senders: header.source_port_identity.clock_identity,
            identity_of_receiver: receiver,
        }
    }

    /// `dscmp(self, other)`: returns `Greater` when `self` is the better
    /// candidate, `Less` when `other` is, `Equal` for the (degenerate)
    /// cases the standard itself calls out as errors; either is an
    /// equally valid choice in practice.
    pub fn compare(&self, other: &Self) -> DatasetOrdering {
        if self.gm_identity == other.gm_identity {
            self.compare_same_identity(other)
        } else {
            self.compare_different_identity(other)
        }
    }

    /// Figure 34: candidates claim different grandmasters.
    fn compare_different_identity(&self, other: &Self) -> DatasetOrdering {
        let self_quality = self.gm_clock_quality;
        let other_quality = other.gm_clock_quality;

        let ordering = self
            .gm_priority_1
            .cmp(&other.gm_priority_1)
            .then_with(|| self_quality.clock_class.cmp(&other_quality.clock_class))
            .then_with(|| {
                self_quality
                    .clock_accuracy
                    .cmp_numeric(&other_quality.clock_accuracy)
            })
            .then_with(|| {
                self_quality
                    .offset_scaled_log_variance
                    .cmp(&other_quality.offset_scaled_log_variance)
            })
            .then_with(|| self.gm_priority_2.cmp(&other.gm_priority_2))
            .then_with(|| self.gm_identity.cmp(&other.gm_identity));

        match ordering {
            Ordering::Equal => unreachable!("gm_identity is guaranteed to differ here"),
            Ordering::Less => DatasetOrdering::Better,
            Ordering::Greater => DatasetOrdering::Worse,
        }
    }

    /// Figure 35: candidates (likely) claim the same grandmaster; broken by
    /// steps-removed and, when that ties, by topology.
    fn compare_same_identity(&self, other: &Self) -> DatasetOrdering {
        let steps_removed_difference = self.steps_removed as i32 - other.steps_removed as i32;

        match steps_removed_difference {
            2..=i32::MAX => DatasetOrdering::Worse,
            i32::MIN..=-2 => DatasetOrdering::Better,
            1 => match self
                .identity_of_receiver
                .clock_identity
                .cmp(&self.identity_of_senders)
            {
                Ordering::Less => DatasetOrdering::Worse,
                Ordering::Equal => DatasetOrdering::Error1,
                Ordering::Greater => DatasetOrdering::WorseByTopology,
            },
            -1 => match other
                .identity_of_receiver
                .clock_identity
                .cmp(&other.identity_of_senders)
            {
                Ordering::Less => DatasetOrdering::Better,
                Ordering::Equal => DatasetOrdering::Error1,
                Ordering::Greater => DatasetOrdering::BetterByTopology,
            },
            0 => {
                let senders = self.identity_of_senders.cmp(&other.identity_of_senders);
                let receivers = self
                    .identity_of_receiver
                    .port_number
                    .cmp(&other.identity_of_receiver.port_number);

                match senders.then(receivers) {
                    Ordering::Less => DatasetOrdering::BetterByTopology,
                    Ordering::Equal => DatasetOrdering::Error2,
                    Ordering::Greater => DatasetOrdering::WorseByTopology,
                }
            }
            _ => unreachable!(),
        }
    }
}

/// The outcome of [`Dataset::compare`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetOrdering {
    /// Strictly better quality.
    Better,
    /// Equal quality, preferred by topology.
    BetterByTopology,
    /// Equal in every field the algorithm considers; the standard treats
    /// this as an error condition (two receivers at the same distance from
    /// the same grandmaster via the same sender).
    Error1,
    /// Likely the same Announce observed through two paths.
    Error2,
    /// Equal quality, not preferred by topology.
    WorseByTopology,
    /// Strictly worse quality.
    Worse,
}

impl DatasetOrdering {
    /// `dscmp`'s three-way result: `Greater` means "strictly better",
    /// matching `port_compute_best`'s `dscmp(dataset, best.dataset) > 0`
    /// check.
    pub const fn as_ordering(self) -> Ordering {
        match self {
            Self::Better | Self::BetterByTopology => Ordering::Greater,
            Self::Error1 | Self::Error2 => Ordering::Equal,
            Self::WorseByTopology | Self::Worse => Ordering::Less,
        }
    }
}
