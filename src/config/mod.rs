//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize, apply env overrides)
//!     → validation.rs (semantic checks)
//!     → DispatcherConfig (validated, immutable)
//!     → endpoint registry + per-endpoint clients built once at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the endpoint list is frozen for the
//!   lifetime of the process
//! - All fields have defaults, so an unset value falls back to a hardcoded one
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{from_env, load_config, ConfigError};
pub use schema::{
    CredentialsConfig, DispatchConfig, DispatcherConfig, EndpointsConfig, ObservabilityConfig,
    TimeoutConfig,
};
pub use validation::ValidationError;
