//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize, env overrides)
//!     → validation.rs (semantic checks)
//!     → ResilienceConfig (validated, immutable)
//!     → shared via Arc / clone to clients at construction
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; clients copy what they need
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::CircuitBreakerConfig;
pub use schema::HttpClientConfig;
pub use schema::ResilienceConfig;
pub use schema::RpcClientConfig;
