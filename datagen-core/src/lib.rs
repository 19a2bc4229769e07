//! datagen-core: shared infrastructure for the billing dataset generator.

pub mod error;
pub mod ids;
pub mod observability;

pub use tracing;
