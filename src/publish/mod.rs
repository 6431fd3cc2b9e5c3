//! Strategy selection, credentials and the publish decision engine

pub mod credentials;
pub mod engine;
pub mod mock;
pub mod probe;
pub mod strategy;

pub use credentials::{resolve_credentials, Credentials};
pub use engine::{PublishDecisionEngine, PublishPlan};
pub use mock::MockProbe;
pub use probe::{ArtifactProbe, HttpProbe, ProbeOutcome, PublishabilityChecker};
pub use strategy::{Assessment, Strategy, StrategyKind};
