//! Domain types - plain values with no VCS or network access

pub mod branch;
pub mod coordinate;
pub mod version;

pub use branch::BranchState;
pub use coordinate::ArtifactCoordinate;
pub use version::VersionDecision;
