//! Command-line flag helpers.
//!
//! # Responsibilities
//! - Define the two-operation contract a flag value has to satisfy
//! - Collect repeated occurrences of one option into an ordered list
//!
//! # Design Decisions
//! - Values are appended in command-line order, duplicates kept
//! - Nothing is ever removed from a collected flag

pub mod array;

pub use array::{FlagArray, FlagError, FlagValue};
