use std::cell::RefCell;
use std::collections::HashMap;

use crate::publish::credentials::Credentials;
use crate::publish::probe::{ArtifactProbe, ProbeOutcome};

/// Mock probe answering from a URI table without any network access
///
/// Unknown URIs answer [`ProbeOutcome::NotFound`]. Every request is recorded
/// together with the credentials it carried.
pub struct MockProbe {
    outcomes: HashMap<String, ProbeOutcome>,
    requests: RefCell<Vec<(String, Credentials)>>,
}

impl MockProbe {
    pub fn new() -> Self {
        MockProbe {
            outcomes: HashMap::new(),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn with_outcome(mut self, uri: impl Into<String>, outcome: ProbeOutcome) -> Self {
        self.outcomes.insert(uri.into(), outcome);
        self
    }

    pub fn requests(&self) -> Vec<(String, Credentials)> {
        self.requests.borrow().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

impl Default for MockProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl ArtifactProbe for MockProbe {
    fn probe(&self, uri: &str, credentials: &Credentials) -> ProbeOutcome {
        self.requests
            .borrow_mut()
            .push((uri.to_string(), credentials.clone()));

        self.outcomes
            .get(uri)
            .cloned()
            .unwrap_or(ProbeOutcome::NotFound)
    }
}
