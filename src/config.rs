use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Target keyword that publishes into the local artifact cache.
pub const LOCAL_TARGET: &str = "local";
/// Target keyword for the managed central portal.
pub const MAVEN_CENTRAL_TARGET: &str = "mavenCentral";
/// Target keyword that routes the upload through a user-named command.
pub const NEXUS_TARGET: &str = "nexus";

/// Default credential keys, shared by every tier unless overridden.
pub const DEFAULT_USERNAME_PROPERTY: &str = "mavenUsername";
pub const DEFAULT_PASSWORD_PROPERTY: &str = "mavenPassword";

pub const DEFAULT_CENTRAL_URL: &str = "https://repo1.maven.org/maven2/";

/// Represents the complete configuration for one planning run.
///
/// Loaded once and never mutated by the engine; the `dev` and `prod`
/// targets are picked by the release classification of the current branch.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PluginConfiguration {
    #[serde(default)]
    pub project: ProjectConfig,

    #[serde(default)]
    pub dev: RepositoryTargetConfig,

    #[serde(default)]
    pub prod: RepositoryTargetConfig,

    #[serde(default = "default_username_property", alias = "usernameProperty")]
    pub username_property: String,

    #[serde(default = "default_password_property", alias = "passwordProperty")]
    pub password_property: String,

    #[serde(default = "default_git_folder", alias = "gitFolder")]
    pub git_folder: String,

    #[serde(default = "default_remote")]
    pub remote: String,

    /// Absent key means the built-in patterns; an explicit empty list
    /// switches to default-branch detection.
    #[serde(
        default = "default_release_branch_patterns",
        alias = "releaseBranchPatterns"
    )]
    pub release_branch_patterns: Vec<String>,

    #[serde(default = "default_true", alias = "alterProjectVersion")]
    pub alter_project_version: bool,

    #[serde(default)]
    pub ci: CiConfig,

    #[serde(default)]
    pub probe: ProbeConfig,

    #[serde(default, alias = "localRepository")]
    pub local_repository: Option<PathBuf>,
}

/// Coordinates of the artifact being built.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProjectConfig {
    #[serde(default)]
    pub group: String,

    #[serde(default)]
    pub name: String,

    #[serde(default = "default_base_version")]
    pub version: String,
}

/// Settings for one publishing tier (`dev` or `prod`).
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RepositoryTargetConfig {
    /// `local`, `mavenCentral`, `nexus`, or a repository URL.
    #[serde(default = "default_target")]
    pub target: String,

    #[serde(default = "default_username_property", alias = "usernameProperty")]
    pub username_property: String,

    #[serde(default = "default_password_property", alias = "passwordProperty")]
    pub password_property: String,

    #[serde(default, alias = "customGradleCommand")]
    pub custom_command: Option<String>,

    #[serde(default = "default_true")]
    pub sign: bool,
}

/// Names of the CI environment variables consulted for the default branch.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CiConfig {
    #[serde(default = "default_branch_vars")]
    pub default_branch_vars: Vec<String>,

    #[serde(default = "default_primary_branch_flag_var")]
    pub primary_branch_flag_var: String,

    #[serde(default = "default_branch_name_var")]
    pub branch_name_var: String,
}

/// What to conclude when the existence probe neither finds nor misses the artifact.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProbeFailurePolicy {
    /// Assume the artifact is not published yet.
    #[default]
    Publish,
    /// Assume the artifact exists and skip publishing.
    Skip,
}

/// Idempotency probe settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProbeConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub on_failure: ProbeFailurePolicy,

    #[serde(default = "default_central_url")]
    pub central_url: String,
}

fn default_username_property() -> String {
    DEFAULT_USERNAME_PROPERTY.to_string()
}

fn default_password_property() -> String {
    DEFAULT_PASSWORD_PROPERTY.to_string()
}

fn default_git_folder() -> String {
    ".".to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_true() -> bool {
    true
}

fn default_target() -> String {
    LOCAL_TARGET.to_string()
}

fn default_base_version() -> String {
    "0.0.1".to_string()
}

/// Returns the release branch patterns used when none are configured.
pub fn default_release_branch_patterns() -> Vec<String> {
    vec![
        r"^release/\d+\.\d+\.\d+$".to_string(),
        r"^v\d+\.\d+\.\d+$".to_string(),
    ]
}

fn default_branch_vars() -> Vec<String> {
    vec!["CI_DEFAULT_BRANCH".to_string()]
}

fn default_primary_branch_flag_var() -> String {
    "CI_IS_DEFAULT_BRANCH".to_string()
}

fn default_branch_name_var() -> String {
    "CI_COMMIT_BRANCH".to_string()
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_central_url() -> String {
    DEFAULT_CENTRAL_URL.to_string()
}

impl Default for RepositoryTargetConfig {
    fn default() -> Self {
        RepositoryTargetConfig {
            target: default_target(),
            username_property: default_username_property(),
            password_property: default_password_property(),
            custom_command: None,
            sign: true,
        }
    }
}

impl Default for ProjectConfig {
    fn default() -> Self {
        ProjectConfig {
            group: String::new(),
            name: String::new(),
            version: default_base_version(),
        }
    }
}

impl Default for CiConfig {
    fn default() -> Self {
        CiConfig {
            default_branch_vars: default_branch_vars(),
            primary_branch_flag_var: default_primary_branch_flag_var(),
            branch_name_var: default_branch_name_var(),
        }
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        ProbeConfig {
            timeout_secs: default_timeout_secs(),
            on_failure: ProbeFailurePolicy::default(),
            central_url: default_central_url(),
        }
    }
}

impl Default for PluginConfiguration {
    fn default() -> Self {
        PluginConfiguration {
            project: ProjectConfig::default(),
            dev: RepositoryTargetConfig::default(),
            prod: RepositoryTargetConfig::default(),
            username_property: default_username_property(),
            password_property: default_password_property(),
            git_folder: default_git_folder(),
            remote: default_remote(),
            release_branch_patterns: default_release_branch_patterns(),
            alter_project_version: true,
            ci: CiConfig::default(),
            probe: ProbeConfig::default(),
            local_repository: None,
        }
    }
}

impl PluginConfiguration {
    /// Tier used for a release (`prod`) or a snapshot (`dev`) build.
    pub fn target_for(&self, is_release: bool) -> &RepositoryTargetConfig {
        if is_release {
            &self.prod
        } else {
            &self.dev
        }
    }

    /// Root of the local artifact cache, `~/.m2/repository` unless configured.
    pub fn local_repository_path(&self) -> PathBuf {
        match &self.local_repository {
            Some(path) => path.clone(),
            None => dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".m2")
                .join("repository"),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `publisher.toml` in current directory
/// 3. `publisher.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(PluginConfiguration)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<PluginConfiguration> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new("./publisher.toml").exists() {
        fs::read_to_string("./publisher.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join("publisher.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(PluginConfiguration::default());
        }
    } else {
        return Ok(PluginConfiguration::default());
    };

    parse_config(&config_str)
}

/// Parses configuration from TOML text.
pub fn parse_config(config_str: &str) -> Result<PluginConfiguration> {
    let config: PluginConfiguration = toml::from_str(config_str)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_patterns_use_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(
            config.release_branch_patterns,
            default_release_branch_patterns()
        );
    }

    #[test]
    fn test_explicit_empty_patterns_are_kept() {
        let config = parse_config("release_branch_patterns = []").unwrap();
        assert!(config.release_branch_patterns.is_empty());
    }

    #[test]
    fn test_camel_case_aliases() {
        let config = parse_config(
            r#"
gitFolder = "../repo"
alterProjectVersion = false
releaseBranchPatterns = ["^main$"]

[prod]
target = "nexus"
customGradleCommand = "closeAndReleaseStagingRepositories"
usernameProperty = "NEXUS_USER"
"#,
        )
        .unwrap();

        assert_eq!(config.git_folder, "../repo");
        assert!(!config.alter_project_version);
        assert_eq!(config.release_branch_patterns, vec!["^main$".to_string()]);
        assert_eq!(
            config.prod.custom_command.as_deref(),
            Some("closeAndReleaseStagingRepositories")
        );
        assert_eq!(config.prod.username_property, "NEXUS_USER");
        assert_eq!(config.prod.password_property, DEFAULT_PASSWORD_PROPERTY);
    }

    #[test]
    fn test_target_for_tier() {
        let mut config = PluginConfiguration::default();
        config.dev.target = "https://repo.example.com/snapshots".to_string();
        config.prod.target = MAVEN_CENTRAL_TARGET.to_string();

        assert_eq!(config.target_for(true).target, MAVEN_CENTRAL_TARGET);
        assert_eq!(
            config.target_for(false).target,
            "https://repo.example.com/snapshots"
        );
    }

    #[test]
    fn test_probe_policy_parsing() {
        let config = parse_config("[probe]\non_failure = \"skip\"\ntimeout_secs = 2").unwrap();
        assert_eq!(config.probe.on_failure, ProbeFailurePolicy::Skip);
        assert_eq!(config.probe.timeout_secs, 2);
        assert_eq!(config.probe.central_url, DEFAULT_CENTRAL_URL);
    }

    #[test]
    fn test_local_repository_override() {
        let config = parse_config("local_repository = \"/tmp/m2\"").unwrap();
        assert_eq!(config.local_repository_path(), PathBuf::from("/tmp/m2"));
    }
}
