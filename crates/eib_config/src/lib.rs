//! Edge Image Builder configuration pipeline
//!
//! Turns a loosely-typed definition document (as received from an MCP client)
//! into the YAML file consumed by `edge-image-builder`.
//!
//! # Pipeline
//!
//! ```text
//!   arguments (serde_json::Value)
//!        │
//!        ▼
//!   credentials::normalize_credentials   plaintext → bcrypt hash
//!        │
//!        ▼
//!   EibSchema::validate                  JSON Schema + cross references
//!        │
//!        ▼
//!   render::render_yaml                  serde_yaml
//!        │
//!        ▼
//!   definition file (String)
//! ```
//!
//! Every stage short-circuits; the first failure is returned as a
//! [`ConfigError`] and nothing is retried.

pub mod credentials;
pub mod document;
pub mod error;
pub mod generate;
pub mod render;
pub mod schema;

pub use credentials::{
    normalize_credentials, BcryptHasher, PasswordHasher, DEFAULT_BCRYPT_COST, HASH_MARKER,
    MAX_PASSWORD_BYTES,
};
pub use document::DocumentExt;
pub use error::{ConfigError, HashError, SchemaError};
pub use generate::ConfigGenerator;
pub use render::render_yaml;
pub use schema::{EibSchema, EMBEDDED_SCHEMA};
