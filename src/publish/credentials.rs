use std::fmt;

use tracing::{debug, warn};

use crate::config::{
    PluginConfiguration, RepositoryTargetConfig, DEFAULT_PASSWORD_PROPERTY,
    DEFAULT_USERNAME_PROPERTY,
};
use crate::properties::PropertySource;

/// Repository credentials; either part may be absent
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Credentials {
    pub fn new(username: Option<String>, password: Option<String>) -> Self {
        Credentials { username, password }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Both username and password are present
    pub fn is_complete(&self) -> bool {
        self.username.is_some() && self.password.is_some()
    }
}

// Never print secrets, only whether they are set.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username.as_ref().map(|_| "<set>"))
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Resolves credentials for one tier.
///
/// Each part is looked up under the tier's key, then under the global key;
/// when both are missing it stays absent and requests go out unauthenticated.
pub fn resolve_credentials(
    tier: &RepositoryTargetConfig,
    config: &PluginConfiguration,
    properties: &dyn PropertySource,
) -> Credentials {
    let username = lookup(&tier.username_property, properties)
        .or_else(|| lookup(&config.username_property, properties));
    let password = lookup(&tier.password_property, properties)
        .or_else(|| lookup(&config.password_property, properties));

    let credentials = Credentials::new(username, password);
    debug!(
        username = credentials.username.is_some(),
        password = credentials.password.is_some(),
        "Resolved credentials"
    );
    credentials
}

fn lookup(key: &str, properties: &dyn PropertySource) -> Option<String> {
    let is_default = key == DEFAULT_USERNAME_PROPERTY || key == DEFAULT_PASSWORD_PROPERTY;

    match properties.get(key) {
        Some(value) => {
            debug!("Credential {} found", key);
            Some(value)
        }
        None if is_default => {
            debug!("Default credential {} not set", key);
            None
        }
        None => {
            warn!("Configured credential '{}' could not be found", key);
            None
        }
    }
}
