//! Small, independent helpers for command-line and HTTP services.
//!
//! - [`flags`]: repeatable command-line flag accumulator
//! - [`http`]: client address, JSON responses, content-type dispatched body parsing
//! - [`text`]: alphanumeric classification

pub mod config;
pub mod flags;
pub mod http;
pub mod observability;
pub mod text;

pub use config::schema::UtilConfig;
pub use flags::{FlagArray, FlagValue};
pub use http::{get_remote_addr, jsonify, parse_body, BodyError, HttpServer};
pub use text::is_alphanumeric;
