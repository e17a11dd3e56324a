//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → UtilConfig (validated, immutable)
//!     → command-line overrides in main.rs
//! ```
//!
//! # Design Decisions
//! - Config is immutable once the server is built
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::UtilConfig;
pub use schema::{BodyConfig, ForwardedConfig, ObservabilityConfig, ServerConfig, TrustMode};
pub use validation::{validate_config, ValidationError};
