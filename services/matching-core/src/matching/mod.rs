//! Matching logic module
//!
//! Crossing detection and trade settlement.

pub mod crossing;
pub mod settlement;
