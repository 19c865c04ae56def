//! The foreign-master table: one [`ForeignMasterRecord`] per distinct
//! remote source port that has sent this port an Announce, bounded to the
//! most recent [`FOREIGN_MASTER_THRESHOLD`] qualifying messages each.
//!
//! Grounded directly on `add_foreign_master`/`fc_prune`/`fc_clear`/
//! `port_compute_best` in the reference implementation this crate's port
//! engine is modeled on.

use core::cmp::Ordering;

use crate::bmc::dataset_comparison::Dataset;
use crate::datastructures::common::PortIdentity;
use crate::datastructures::messages::{Message, MessageBody, SharedMessage};
use crate::time::{Duration, Interval, Time};

/// At least two qualifying Announces must be on hand before a foreign
/// master is considered in best-master-clock selection (IEEE 1588-2008
/// 9.5.3(b)): a sender's very first Announce establishes the record but
/// does not count.
pub const FOREIGN_MASTER_THRESHOLD: usize = 2;

/// The window (in multiples of the Announce's own `logMessageInterval`)
/// within which a retained Announce is still considered current.
pub const FOREIGN_MASTER_TIME_WINDOW: u16 = 4;

fn is_current(message: &Message, now: Time) -> bool {
    let interval = Interval::from_log_2(message.header.log_message_interval);
    let timeout = Duration::from_interval(interval) * FOREIGN_MASTER_TIME_WINDOW;
    now.saturating_duration_since(message.ts_host) < timeout
}

/// Returns whether two Announces disagree on any of the grandmaster
/// attributes the dataset comparison algorithm cares about. Used only to
/// detect a *change*, never to rank candidates.
fn announce_compare(a: &Message, b: &Message) -> bool {
    match (&a.body, &b.body) {
        (MessageBody::Announce(a), MessageBody::Announce(b)) => {
            (
                a.grandmaster_priority_1,
                a.grandmaster_clock_quality,
                a.grandmaster_priority_2,
                a.grandmaster_identity,
                a.steps_removed,
            ) != (
                b.grandmaster_priority_1,
                b.grandmaster_clock_quality,
                b.grandmaster_priority_2,
                b.grandmaster_identity,
                b.steps_removed,
            )
        }
        _ => false,
    }
}

/// The retained Announces from one remote source port, newest at index 0.
#[derive(Debug)]
pub struct ForeignMasterRecord {
    pub sender: PortIdentity,
    messages: Vec<SharedMessage>,
    dataset: Option<Dataset>,
}

impl ForeignMasterRecord {
    fn new(sender: PortIdentity) -> Self {
        Self {
            sender,
            messages: Vec::new(),
            dataset: None,
        }
    }

    /// `fc_prune`: first drop overflow past the threshold, then drop any
    /// trailing (oldest) messages that have aged out.
    fn prune(&mut self, now: Time) {
        while self.messages.len() > FOREIGN_MASTER_THRESHOLD {
            self.messages.pop();
        }

        while matches!(self.messages.last(), Some(m) if !is_current(m, now)) {
            self.messages.pop();
        }
    }

    /// `fc_clear`: drop all retained messages (releasing their `Rc`
    /// references); the record itself, and its cached sender, survive.
    fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn n_messages(&self) -> usize {
        self.messages.len()
    }

    pub fn newest(&self) -> Option<&SharedMessage> {
        self.messages.first()
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    /// `add_foreign_master`'s common path for an already-known sender:
    /// prune, push the new Announce to the front, and report whether this
    /// insertion is "interesting" (broke the qualification threshold, or
    /// changed grandmaster attributes from the previous newest message).
    fn insert(&mut self, message: SharedMessage, now: Time) -> bool {
        self.prune(now);

        let broke_threshold = self.messages.len() == FOREIGN_MASTER_THRESHOLD - 1;

        self.messages.insert(0, message);

        let diff = self.messages.len() > 1 && announce_compare(&self.messages[0], &self.messages[1]);

        broke_threshold || diff
    }
}

/// The set of foreign masters heard on one port, plus the currently
/// selected best (if any).
#[derive(Debug, Default)]
pub struct ForeignMasterTable {
    records: Vec<ForeignMasterRecord>,
    best: Option<PortIdentity>,
}

impl ForeignMasterTable {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            best: None,
        }
    }

    pub fn get(&self, sender: PortIdentity) -> Option<&ForeignMasterRecord> {
        self.records.iter().find(|r| r.sender == sender)
    }

    pub fn best(&self) -> Option<PortIdentity> {
        self.best
    }

    pub fn best_record(&self) -> Option<&ForeignMasterRecord> {
        self.best.and_then(|sender| self.get(sender))
    }

    /// Releases the current best's retained messages without forgetting the
    /// record itself, used when the announce-receipt timer expires.
    pub fn clear_best(&mut self) {
        if let Some(sender) = self.best {
            if let Some(record) = self.records.iter_mut().find(|r| r.sender == sender) {
                record.clear();
            }
        }
    }

    /// `add_foreign_master`: locate or create the record for this
    /// Announce's sender and insert it, reporting whether the port should
    /// treat this as a state-decision-worthy event.
    pub fn insert_announce(&mut self, message: SharedMessage, now: Time) -> bool {
        let sender = message.header.source_port_identity;

        match self.records.iter_mut().find(|r| r.sender == sender) {
            Some(record) => record.insert(message, now),
            None => {
                self.records.push(ForeignMasterRecord::new(sender));
                false
            }
        }
    }

    /// `port_compute_best`: prune every record, disqualify any with fewer
    /// than [`FOREIGN_MASTER_THRESHOLD`] current messages, and keep a
    /// running champion via `dscmp`, clearing every challenger that loses.
    pub fn compute_best(&mut self, receiver: PortIdentity, now: Time) -> Option<PortIdentity> {
        let mut best_idx: Option<usize> = None;

        for i in 0..self.records.len() {
            if self.records[i].newest().is_none() {
                continue;
            }

            self.records[i].prune(now);

            if self.records[i].n_messages() < FOREIGN_MASTER_THRESHOLD {
                continue;
            }

            let dataset = match &self.records[i].newest().unwrap().body {
                MessageBody::Announce(announce) => Dataset::from_announce(
                    &self.records[i].newest().unwrap().header,
                    announce,
                    receiver,
                ),
                _ => continue,
            };
            self.records[i].dataset = Some(dataset);

            match best_idx {
                None => best_idx = Some(i),
                Some(current_best) => {
                    let current_best_dataset = self.records[current_best]
                        .dataset
                        .expect("set when it became the champion");

                    if dataset.compare(&current_best_dataset).as_ordering() == Ordering::Greater {
                        best_idx = Some(i);
                    } else {
                        self.records[i].clear();
                    }
                }
            }
        }

        self.best = best_idx.map(|i| self.records[i].sender);
        self.best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datastructures::common::{ClockAccuracy, ClockIdentity, ClockQuality, TimeSource};
    use crate::datastructures::messages::{AnnounceMessage, Header, MessageType};
    use std::rc::Rc;

    fn sender(n: u8) -> PortIdentity {
        PortIdentity {
            clock_identity: ClockIdentity([n; 8]),
            port_number: 1,
        }
    }

    fn announce(sender: PortIdentity, priority_1: u8, ts_host: Time) -> SharedMessage {
        Rc::new(Message {
            header: Header {
                message_type: MessageType::Announce,
                version: 2,
                message_length: 64,
                domain_number: 0,
                flag_field: 0,
                correction_field: crate::datastructures::common::TimeInterval(
                    fixed::types::I48F16::from_num(0),
                ),
                source_port_identity: sender,
                sequence_id: 0,
                control_field: 5,
                log_message_interval: 1,
            },
            body: MessageBody::Announce(AnnounceMessage {
                current_utc_offset: 37,
                grandmaster_priority_1: priority_1,
                grandmaster_clock_quality: ClockQuality {
                    clock_class: 6,
                    clock_accuracy: ClockAccuracy::NS100,
                    offset_scaled_log_variance: 0,
                },
                grandmaster_priority_2: 128,
                grandmaster_identity: sender.clock_identity,
                steps_removed: 0,
                time_source: TimeSource::Gnss,
            }),
            hwts: Time::ZERO,
            ts_pdu: Time::ZERO,
            ts_host,
        })
    }

    #[test]
    fn first_announce_from_new_sender_does_not_count() {
        let mut table = ForeignMasterTable::new();
        let interesting = table.insert_announce(announce(sender(1), 128, Time::ZERO), Time::ZERO);

        assert!(!interesting);
        assert_eq!(table.get(sender(1)).unwrap().n_messages(), 0);
    }

    #[test]
    fn third_announce_breaks_threshold() {
        let mut table = ForeignMasterTable::new();
        // First receipt only creates the record; second is stored but still
        // below threshold.
        table.insert_announce(announce(sender(1), 128, Time::ZERO), Time::ZERO);
        table.insert_announce(announce(sender(1), 128, Time::ZERO), Time::ZERO);
        let interesting = table.insert_announce(announce(sender(1), 128, Time::ZERO), Time::ZERO);

        assert!(interesting);
        assert_eq!(table.get(sender(1)).unwrap().n_messages(), 2);
    }

    #[test]
    fn fourth_announce_with_same_attributes_is_not_interesting() {
        let mut table = ForeignMasterTable::new();
        table.insert_announce(announce(sender(1), 128, Time::ZERO), Time::ZERO);
        table.insert_announce(announce(sender(1), 128, Time::ZERO), Time::ZERO);
        table.insert_announce(announce(sender(1), 128, Time::ZERO), Time::ZERO);
        let interesting = table.insert_announce(announce(sender(1), 128, Time::ZERO), Time::ZERO);

        assert!(!interesting);
    }

    #[test]
    fn changed_priority_is_interesting() {
        let mut table = ForeignMasterTable::new();
        table.insert_announce(announce(sender(1), 128, Time::ZERO), Time::ZERO);
        table.insert_announce(announce(sender(1), 128, Time::ZERO), Time::ZERO);
        let interesting = table.insert_announce(announce(sender(1), 100, Time::ZERO), Time::ZERO);

        assert!(interesting);
    }

    #[test]
    fn compute_best_prefers_lower_priority_1_and_clears_loser() {
        let mut table = ForeignMasterTable::new();

        // Three receipts each: the first only creates the record, so three
        // are needed to reach the two-message qualification threshold.
        for _ in 0..3 {
            table.insert_announce(announce(sender(1), 200, Time::ZERO), Time::ZERO);
            table.insert_announce(announce(sender(2), 100, Time::ZERO), Time::ZERO);
        }

        let receiver = sender(0);
        let best = table.compute_best(receiver, Time::ZERO);

        assert_eq!(best, Some(sender(2)));
        assert_eq!(table.get(sender(1)).unwrap().n_messages(), 0);
        assert_eq!(table.get(sender(2)).unwrap().n_messages(), 2);
    }

    #[test]
    fn sub_threshold_record_is_disqualified() {
        let mut table = ForeignMasterTable::new();
        table.insert_announce(announce(sender(1), 128, Time::ZERO), Time::ZERO);

        let best = table.compute_best(sender(0), Time::ZERO);
        assert_eq!(best, None);
    }
}
