//! Power log ingestion.

pub mod index;

pub use index::{build_power_index, PowerIndex, RejectedRow};
