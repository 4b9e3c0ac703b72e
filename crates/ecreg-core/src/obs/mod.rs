//! Observability boundary.
//!
//! Registry logic reports through [`sink::RegistryEvent`] only. Counters
//! live in [`metrics::RegistryMetrics`], which is one possible sink.

pub mod metrics;
pub mod sink;

pub use metrics::{MetricsReport, RegistryMetrics};
pub use sink::{RegistryEvent, RegistrySink};
