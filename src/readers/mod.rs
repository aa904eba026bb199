//! Text loaders for the measured quantities.
//!
//! Two layouts are understood: one record per line with a fixed set of
//! columns, and the block layout used for phytoplankton absorption tables.
//! Both stop at the first malformed record and keep what was already handed
//! to the caller.

pub mod blocks;
pub mod records;
pub mod types;

pub use blocks::read_blocks;
pub use records::read_records;
pub use types::{Field, LoadError};
