//! ecreg: a session-scoped registry of entity classes synthesized on demand
//! from schema metadata.
//!
//! ## Crate layout
//! - `core`: class keys, metadata cache, schema directory, class synthesis,
//!   the class registry, configuration, and observability.
//! - `error`: the public error type callers branch on.
//! - `builder`: wires config and schema documents into a ready registry.
//!
//! The `prelude` module carries the vocabulary most callers need.

pub use ecreg_core as core;

pub mod builder;
pub mod error;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use builder::RegistryBuilder;
pub use error::{Error, ErrorKind, ErrorOrigin};

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        RegistryBuilder,
        core::{
            config::RegistryConfig,
            metadata::SchemaDocument,
            obs::{MetricsReport, RegistryMetrics},
            prelude::*,
        },
        error::{Error, ErrorKind},
    };
}
