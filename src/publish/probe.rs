//! Idempotency probe against an artifact repository.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use tracing::{debug, info, warn};

use crate::config::ProbeFailurePolicy;
use crate::error::Result;
use crate::publish::credentials::Credentials;

/// Result of reading an artifact location
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The repository answered with a 2xx status
    Found,
    /// The repository answered "not found"
    NotFound,
    /// Anything else: other statuses, timeouts, DNS or TLS failures
    Failed(String),
}

/// Read-only existence check of a URI
pub trait ArtifactProbe {
    fn probe(&self, uri: &str, credentials: &Credentials) -> ProbeOutcome;
}

/// Probes over HTTP(S) with a bounded timeout
pub struct HttpProbe {
    client: Client,
}

impl HttpProbe {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .user_agent(concat!("publish-planner/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(HttpProbe { client })
    }

    /// Use a preconfigured client (proxies, TLS roots)
    pub fn from_client(client: Client) -> Self {
        HttpProbe { client }
    }
}

impl ArtifactProbe for HttpProbe {
    fn probe(&self, uri: &str, credentials: &Credentials) -> ProbeOutcome {
        let mut request = self.client.get(uri);
        if let Some(username) = &credentials.username {
            request = request.basic_auth(username, credentials.password.as_ref());
        }

        match request.send() {
            Ok(response) => match response.status() {
                status if status.is_success() => ProbeOutcome::Found,
                StatusCode::NOT_FOUND => ProbeOutcome::NotFound,
                status => ProbeOutcome::Failed(format!("unexpected status {}", status)),
            },
            Err(e) if e.is_timeout() => ProbeOutcome::Failed(format!("timed out: {}", e)),
            Err(e) => ProbeOutcome::Failed(e.to_string()),
        }
    }
}

/// Decides whether an artifact already exists at a URI
///
/// Credentials resolved for the tier are attached to every probe. A failed
/// probe is mapped through the configured policy: with
/// [`ProbeFailurePolicy::Publish`] it counts as "not published".
pub struct PublishabilityChecker<'a> {
    probe: &'a dyn ArtifactProbe,
    credentials: Credentials,
    policy: ProbeFailurePolicy,
}

impl<'a> PublishabilityChecker<'a> {
    pub fn new(
        probe: &'a dyn ArtifactProbe,
        credentials: Credentials,
        policy: ProbeFailurePolicy,
    ) -> Self {
        PublishabilityChecker {
            probe,
            credentials,
            policy,
        }
    }

    /// Probe `uri` and log the outcome
    pub fn check(&self, uri: &str) -> ProbeOutcome {
        info!(uri, authenticated = self.credentials.username.is_some(), "Checking if artifact exists");

        let outcome = self.probe.probe(uri, &self.credentials);
        match &outcome {
            ProbeOutcome::Found => info!("Artifact already published"),
            ProbeOutcome::NotFound => info!("Artifact not published yet"),
            ProbeOutcome::Failed(reason) => {
                warn!("Could not check if artifact is published: {}", reason)
            }
        }
        outcome
    }

    /// Interpret a probe outcome under the failure policy
    pub fn interpret(&self, outcome: &ProbeOutcome) -> bool {
        match outcome {
            ProbeOutcome::Found => true,
            ProbeOutcome::NotFound => false,
            ProbeOutcome::Failed(_) => {
                let exists = self.policy == ProbeFailurePolicy::Skip;
                debug!(policy = ?self.policy, exists, "Applied probe failure policy");
                exists
            }
        }
    }

    pub fn exists(&self, uri: &str) -> bool {
        let outcome = self.check(uri);
        self.interpret(&outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::publish::mock::MockProbe;

    #[test]
    fn test_found_and_not_found() {
        let probe = MockProbe::new()
            .with_outcome("https://repo/a", ProbeOutcome::Found)
            .with_outcome("https://repo/b", ProbeOutcome::NotFound);
        let checker = PublishabilityChecker::new(&probe, Credentials::anonymous(), ProbeFailurePolicy::Publish);

        assert!(checker.exists("https://repo/a"));
        assert!(!checker.exists("https://repo/b"));
    }

    #[test]
    fn test_failure_defaults_to_not_published() {
        let probe = MockProbe::new().with_outcome("https://repo/a", ProbeOutcome::Failed("timed out".into()));
        let checker = PublishabilityChecker::new(&probe, Credentials::anonymous(), ProbeFailurePolicy::Publish);

        assert!(!checker.exists("https://repo/a"));
    }

    #[test]
    fn test_failure_with_skip_policy() {
        let probe = MockProbe::new().with_outcome("https://repo/a", ProbeOutcome::Failed("401".into()));
        let checker = PublishabilityChecker::new(&probe, Credentials::anonymous(), ProbeFailurePolicy::Skip);

        assert!(checker.exists("https://repo/a"));
    }

    #[test]
    fn test_credentials_are_attached() {
        let probe = MockProbe::new();
        let creds = Credentials::new(Some("ci".into()), Some("token".into()));
        let checker = PublishabilityChecker::new(&probe, creds.clone(), ProbeFailurePolicy::Publish);

        checker.exists("https://repo/a");
        assert_eq!(probe.requests(), vec![("https://repo/a".to_string(), creds)]);
    }

    #[test]
    fn test_http_probe_unreachable_host_fails() {
        let probe = HttpProbe::new(Duration::from_millis(500)).unwrap();
        // Port 9 on localhost is almost never served; connection is refused.
        let outcome = probe.probe("http://127.0.0.1:9/missing", &Credentials::anonymous());
        assert!(matches!(outcome, ProbeOutcome::Failed(_)));
    }
}
