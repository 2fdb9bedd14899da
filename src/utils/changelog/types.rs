// changelog fragment data structures

use serde::Serialize;

/// the changed file picked as this pull request's changelog fragment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FragmentCandidate {
    /// repository-relative path as reported for the pull request
    pub path: String,
    /// the fragment directory it was found under (ends with `/`)
    pub directory: String,
}

impl FragmentCandidate {
    pub fn new(path: impl Into<String>, directory: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            directory: directory.into(),
        }
    }

    /// final path component
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// the declared type token
    ///
    /// fragment names follow `<number>.<type>[.<freeform>].<ext>`, so the
    /// token is the second period-separated component of the base name
    pub fn type_token(&self) -> Option<&str> {
        self.file_name().split('.').nth(1)
    }
}
