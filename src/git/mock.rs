use std::cell::RefCell;

use crate::error::{PublishError, Result};
use crate::git::VcsQuery;

enum Reply {
    Output(String),
    Error(String),
}

struct Rule {
    needles: Vec<String>,
    reply: Reply,
}

/// Mock VCS answering from scripted rules without running git
///
/// A rule matches when every one of its needles appears among the query
/// arguments; the first matching rule wins and unmatched queries answer
/// with empty output. Every query is recorded for later inspection.
pub struct MockVcs {
    rules: Vec<Rule>,
    calls: RefCell<Vec<Vec<String>>>,
}

impl MockVcs {
    /// Create a mock that answers every query with empty output
    pub fn new() -> Self {
        MockVcs {
            rules: Vec::new(),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Answer queries whose arguments include `subcommand`
    pub fn with_response(self, subcommand: &str, output: impl Into<String>) -> Self {
        self.with_rule(&[subcommand], output)
    }

    /// Answer the decoration query for a revision offset (0 = HEAD)
    pub fn with_decoration(self, offset: usize, output: impl Into<String>) -> Self {
        let skip = format!("--skip={}", offset);
        self.with_rule(&["log", skip.as_str()], output)
    }

    /// Answer queries containing all of `needles`
    pub fn with_rule(mut self, needles: &[&str], output: impl Into<String>) -> Self {
        self.rules.push(Rule {
            needles: needles.iter().map(|n| n.to_string()).collect(),
            reply: Reply::Output(output.into()),
        });
        self
    }

    /// Fail queries whose arguments include `subcommand`, as if git could not be spawned
    pub fn with_error(mut self, subcommand: &str, message: impl Into<String>) -> Self {
        self.rules.push(Rule {
            needles: vec![subcommand.to_string()],
            reply: Reply::Error(message.into()),
        });
        self
    }

    /// All queries issued so far, in order
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.borrow().clone()
    }

    /// Number of recorded queries that include `needle`
    pub fn count_calls(&self, needle: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|args| args.iter().any(|a| a == needle))
            .count()
    }
}

impl Default for MockVcs {
    fn default() -> Self {
        Self::new()
    }
}

impl VcsQuery for MockVcs {
    fn query(&self, args: &[String]) -> Result<String> {
        self.calls.borrow_mut().push(args.to_vec());

        let rule = self
            .rules
            .iter()
            .find(|rule| rule.needles.iter().all(|n| args.contains(n)));

        match rule.map(|r| &r.reply) {
            Some(Reply::Output(output)) => Ok(output.clone()),
            Some(Reply::Error(message)) => Err(PublishError::vcs(message.clone())),
            None => Ok(String::new()),
        }
    }
}
