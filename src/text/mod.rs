//! Text classification helpers.

pub mod alphanumeric;

pub use alphanumeric::is_alphanumeric;
