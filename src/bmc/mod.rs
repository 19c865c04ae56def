//! Best-master-clock bookkeeping: the dataset comparison algorithm
//! ([`dataset_comparison`]) and the per-port foreign-master table
//! ([`foreign_master`]) that feeds it.
//!
//! The cross-port decision that combines multiple ports' best candidates
//! into a single recommended state is out of scope for this crate (see
//! [`crate::port::fsm`]); what lives here is the pure, single-port part of
//! BMCA that IEEE 1588 9.3.4 specifies unconditionally.

pub mod dataset_comparison;
pub mod foreign_master;

pub use dataset_comparison::{Dataset, DatasetOrdering};
pub use foreign_master::{ForeignMasterRecord, ForeignMasterTable, FOREIGN_MASTER_THRESHOLD};
