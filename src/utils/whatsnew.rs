// release-notes companion check

use crate::utils::changelog::WhatsNewPolicy;
use crate::utils::severity::{Violation, ViolationKind};

/// result of the what's new check when it did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WhatsNewStatus {
    /// the label is not on the pull request
    NotRequested,
    /// exactly one entry matched
    Found(String),
}

impl WhatsNewStatus {
    pub fn describe(&self, policy: &WhatsNewPolicy) -> String {
        match self {
            WhatsNewStatus::NotRequested => format!(
                "No \"{}\" label, skipping What's New entry check",
                policy.label
            ),
            WhatsNewStatus::Found(entry) => {
                format!("\"{}\" present and {} is modified: OK", policy.label, entry)
            }
        }
    }
}

/// require exactly one changed file matching the what's new pattern
/// when the what's new label is set
///
/// the pattern runs over all filenames joined with `|`, so it may match
/// several entries or span a single path only partially. a pattern with
/// capture groups reports the first group of each match, not the whole match
pub fn check_whatsnew<S: AsRef<str>>(
    policy: &WhatsNewPolicy,
    labels: &[String],
    changed_files: &[S],
) -> Result<WhatsNewStatus, Violation> {
    if !labels.iter().any(|l| *l == policy.label) {
        return Ok(WhatsNewStatus::NotRequested);
    }

    let haystack = changed_files
        .iter()
        .map(|f| f.as_ref())
        .collect::<Vec<_>>()
        .join("|");
    let matches: Vec<&str> = if policy.pattern.captures_len() > 1 {
        policy
            .pattern
            .captures_iter(&haystack)
            .map(|c| c.get(1).map_or("", |m| m.as_str()))
            .collect()
    } else {
        policy
            .pattern
            .find_iter(&haystack)
            .map(|m| m.as_str())
            .collect()
    };

    match matches.as_slice() {
        [] => Err(Violation::new(
            ViolationKind::MissingWhatsNew,
            format!(
                "\"{}\" present but no What's New entry; please add one.",
                policy.label
            ),
        )),
        [entry] => Ok(WhatsNewStatus::Found(entry.to_string())),
        entries => Err(Violation::new(
            ViolationKind::TooManyWhatsNew,
            format!("Too many What's New entries found: {:?}", entries),
        )),
    }
}
