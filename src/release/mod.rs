//! Branch detection and release classification

pub mod branch_resolver;
pub mod classifier;
pub mod default_branch;
pub mod version_resolver;

pub use branch_resolver::BranchResolver;
pub use classifier::ReleaseClassifier;
pub use default_branch::DefaultBranchDetector;
pub use version_resolver::VersionResolver;
