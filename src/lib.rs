//! Publish planning for CI builds.
//!
//! Resolves the current branch from decorated git history, classifies it as
//! a release or snapshot build, derives the artifact version, and picks the
//! repository, credentials and signing requirements for publication. An
//! idempotency probe keeps an already published release from being
//! published twice.

pub mod boundary;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod properties;
pub mod publish;
pub mod release;
pub mod ui;

pub use error::{PublishError, Result};
pub use publish::{PublishDecisionEngine, PublishPlan};
