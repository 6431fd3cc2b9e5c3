use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use reqwest::Url;
use tracing::{debug, info, warn};

use crate::config::{PluginConfiguration, LOCAL_TARGET, MAVEN_CENTRAL_TARGET, NEXUS_TARGET};
use crate::domain::ArtifactCoordinate;
use crate::error::{PublishError, Result};
use crate::publish::probe::{ProbeOutcome, PublishabilityChecker};

/// Which publish path was chosen, without its parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    Local,
    DirectRemote,
    ManagedCentral,
    CustomRouted,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StrategyKind::Local => "local",
            StrategyKind::DirectRemote => "direct-remote",
            StrategyKind::ManagedCentral => "managed-central",
            StrategyKind::CustomRouted => "custom-routed",
        };
        write!(f, "{}", name)
    }
}

/// Publish strategy chosen from the tier's `target`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    /// Local artifact cache (`~/.m2/repository`)
    Local { repository: PathBuf },
    /// A repository URL taken literally from the configuration
    DirectRemote { url: String, sign: bool },
    /// The managed central portal
    ManagedCentral { central_url: String },
    /// Upload delegated to a user-named command, checked against central
    CustomRouted { central_url: String, command: String },
}

/// Publishability verdict plus the probe result it was based on, if any
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assessment {
    pub publishable: bool,
    pub probe: Option<(String, ProbeOutcome)>,
}

impl Assessment {
    fn without_probe(publishable: bool) -> Self {
        Assessment {
            publishable,
            probe: None,
        }
    }
}

impl Strategy {
    /// Pick the strategy for the `prod` tier (release) or `dev` tier (snapshot).
    ///
    /// Any target that is not a keyword is taken literally as the repository
    /// location (URL or path).
    ///
    /// # Returns
    /// * `Err(PublishError::Config)` - `nexus` without `custom_command`
    pub fn select(config: &PluginConfiguration, is_release: bool) -> Result<Self> {
        let tier_name = tier_name(is_release);
        let tier = config.target_for(is_release);
        let target = tier.target.trim();

        let strategy = match target {
            LOCAL_TARGET => Strategy::Local {
                repository: config.local_repository_path(),
            },
            MAVEN_CENTRAL_TARGET => Strategy::ManagedCentral {
                central_url: config.probe.central_url.clone(),
            },
            NEXUS_TARGET => {
                let command = tier
                    .custom_command
                    .as_deref()
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .ok_or_else(|| {
                        PublishError::config(format!(
                            "{}.target = '{}' requires {}.custom_command (customGradleCommand) naming the task that performs the upload",
                            tier_name, target, tier_name
                        ))
                    })?;
                Strategy::CustomRouted {
                    central_url: config.probe.central_url.clone(),
                    command: command.to_string(),
                }
            }
            url => {
                if Url::parse(url).is_err() {
                    warn!(
                        tier = tier_name,
                        target = url,
                        "Target is not a keyword or an absolute URL, using it as a repository location as-is"
                    );
                }
                Strategy::DirectRemote {
                    url: url.to_string(),
                    sign: tier.sign,
                }
            }
        };

        info!(tier = tier_name, strategy = %strategy.kind(), "Selected publish strategy");
        Ok(strategy)
    }

    pub fn kind(&self) -> StrategyKind {
        match self {
            Strategy::Local { .. } => StrategyKind::Local,
            Strategy::DirectRemote { .. } => StrategyKind::DirectRemote,
            Strategy::ManagedCentral { .. } => StrategyKind::ManagedCentral,
            Strategy::CustomRouted { .. } => StrategyKind::CustomRouted,
        }
    }

    pub fn repository_url(&self) -> String {
        match self {
            Strategy::Local { repository } => format!("file://{}", repository.display()),
            Strategy::DirectRemote { url, .. } => url.clone(),
            Strategy::ManagedCentral { central_url }
            | Strategy::CustomRouted { central_url, .. } => central_url.clone(),
        }
    }

    /// Local never signs, central channels always do, a direct remote
    /// follows its tier's `sign` flag
    pub fn should_sign(&self) -> bool {
        match self {
            Strategy::Local { .. } => false,
            Strategy::DirectRemote { sign, .. } => *sign,
            Strategy::ManagedCentral { .. } | Strategy::CustomRouted { .. } => true,
        }
    }

    pub fn routing_command(&self) -> Option<&str> {
        match self {
            Strategy::CustomRouted { command, .. } => Some(command),
            _ => None,
        }
    }

    /// Snapshots are always publishable; a release is publishable only
    /// when the artifact does not exist yet.
    pub fn assess(
        &self,
        artifact: &ArtifactCoordinate,
        is_release: bool,
        checker: &PublishabilityChecker,
    ) -> Assessment {
        if !is_release {
            debug!("Snapshot version, publishing unconditionally");
            return Assessment::without_probe(true);
        }

        match self {
            Strategy::Local { repository } => {
                let path = artifact.local_path(repository);
                let exists = path.exists();
                info!(path = %path.display(), exists, "Checked local artifact cache");
                Assessment::without_probe(!exists)
            }
            Strategy::DirectRemote { url: base, .. }
            | Strategy::ManagedCentral { central_url: base }
            | Strategy::CustomRouted {
                central_url: base, ..
            } => {
                let uri = artifact.remote_uri(base);
                let outcome = checker.check(&uri);
                let exists = checker.interpret(&outcome);
                Assessment {
                    publishable: !exists,
                    probe: Some((uri, outcome)),
                }
            }
        }
    }

    pub fn is_publishable(
        &self,
        artifact: &ArtifactCoordinate,
        is_release: bool,
        checker: &PublishabilityChecker,
    ) -> bool {
        self.assess(artifact, is_release, checker).publishable
    }
}

pub fn tier_name(is_release: bool) -> &'static str {
    if is_release {
        "prod"
    } else {
        "dev"
    }
}
