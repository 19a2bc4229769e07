//! Synthesis engine services.

pub mod artifacts;
pub mod assembler;
pub mod export;
pub mod lifecycle;
pub mod periods;
pub mod proration;
pub mod random;
pub mod scenarios;

pub use artifacts::{Adjustment, BillingArtifactGenerator, BillingDirectives, PeriodDirective};
pub use assembler::{Dataset, DatasetAssembler, GenerationMode};
pub use export::export_dataset;
pub use lifecycle::{BillingPeriod, Lifecycle, LifecycleSequencer, Origin, TransitionRequest};
pub use periods::PeriodCalculator;
pub use proration::prorate;
pub use random::RandomGenerator;
pub use scenarios::ScenarioCatalog;
