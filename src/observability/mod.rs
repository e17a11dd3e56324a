//! Observability subsystem.
//!
//! The helpers emit `tracing` events; the binary installs the subscriber
//! from `logging.rs`. Library users bring their own subscriber.

pub mod logging;
