use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// The (group, artifact-id, version) triple identifying a publishable unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactCoordinate {
    pub group: String,
    pub artifact_id: String,
    pub version: String,
}

impl ArtifactCoordinate {
    pub fn new(
        group: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        ArtifactCoordinate {
            group: group.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
        }
    }

    /// Group with dots turned into path segments (`org.acme` -> `org/acme`)
    pub fn group_path(&self) -> String {
        self.group.replace('.', "/")
    }

    /// `<base>/<group path>/<artifact-id>/<version>`
    ///
    /// Exactly one slash separates `base` from the rest, whether or not the
    /// configured base ends with one.
    pub fn remote_uri(&self, base: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            base.trim_end_matches('/'),
            self.group_path(),
            self.artifact_id,
            self.version
        )
    }

    /// Expected jar location inside a local artifact cache
    pub fn local_path(&self, repository: &Path) -> PathBuf {
        let mut path = repository.to_path_buf();
        for segment in self.group.split('.').filter(|s| !s.is_empty()) {
            path.push(segment);
        }
        path.push(&self.artifact_id);
        path.push(&self.version);
        path.push(format!("{}-{}.jar", self.artifact_id, self.version));
        path
    }
}

impl fmt::Display for ArtifactCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.artifact_id, self.version)
    }
}
