use serde::Serialize;
use std::fmt;

/// Non-fatal issues found while planning a publication.
/// They never abort the plan but should be reported to the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecisionWarning {
    /// No branch decoration on the tip or its parent
    DetachedHead,
    /// A remote target was chosen but its credentials are incomplete
    CredentialsMissing { tier: String, target: String },
    /// The existence probe neither found nor missed the artifact
    ProbeFailed {
        uri: String,
        reason: String,
        assumed_published: bool,
    },
    /// The configured base version does not parse as semver
    NonSemverBaseVersion { version: String },
}

impl fmt::Display for DecisionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecisionWarning::DetachedHead => {
                write!(f, "No branch found for the current commit, building as detached HEAD")
            }
            DecisionWarning::CredentialsMissing { tier, target } => {
                write!(
                    f,
                    "No complete credentials for the {} target '{}', requests will be anonymous",
                    tier, target
                )
            }
            DecisionWarning::ProbeFailed {
                uri,
                reason,
                assumed_published,
            } => {
                let assumption = if *assumed_published {
                    "assuming already published"
                } else {
                    "assuming not yet published"
                };
                write!(f, "Could not check '{}' ({}), {}", uri, reason, assumption)
            }
            DecisionWarning::NonSemverBaseVersion { version } => {
                write!(f, "Base version '{}' is not a semantic version", version)
            }
        }
    }
}
