use crate::error::Result;
use crate::utils::changelog::{ExemptionPolicy, PolicyConfig, find_fragment, validate_fragment};
use crate::utils::exemption::Exemption;
use crate::utils::github::RepositoryHost;
use crate::utils::severity::{Verdict, ViolationKind};
use crate::utils::toml_ops::{TomlDocument, TomlReader};
use crate::utils::trigger::{TriggerEvent, TriggerInput};
use crate::utils::whatsnew::check_whatsnew;
use serde::Serialize;

pub const POLICY_DOCUMENT: &str = "pyproject.toml";

/// outcome of one check run: informational lines followed by the verdict
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub notes: Vec<String>,
    pub verdict: Verdict,
}

impl CheckReport {
    /// print notes and verdict for a CI log
    pub fn display(&self) {
        for note in &self.notes {
            println!("{}", note);
        }
        println!("{}", self.verdict);
    }
}

/// one stage of the decision pipeline
enum Step {
    Continue,
    Done(Verdict),
}

impl Step {
    fn then(self, next: impl FnOnce() -> Step) -> Step {
        match self {
            Step::Continue => next(),
            done => done,
        }
    }

    fn resolve(self, last: impl FnOnce() -> Verdict) -> Verdict {
        match self {
            Step::Continue => last(),
            Step::Done(verdict) => verdict,
        }
    }
}

/// changelog fragment gate for a single pull request event
pub struct ChangelogChecker;

impl ChangelogChecker {
    /// run the full check; configuration and transport problems are errors,
    /// policy violations come back as a failing verdict
    pub fn run(input: &TriggerInput, host: &dyn RepositoryHost) -> Result<CheckReport> {
        let mut notes = Vec::new();

        if !input.is_pull_request_event() {
            tracing::info!(event = %input.event_name, "not a pull request event");
            return Ok(CheckReport {
                notes,
                verdict: Verdict::pass(format!("No-op for {}", input.event_name)),
            });
        }

        let event = input.load_event()?;
        notes.push(format!("Bot username: {}", input.bot_username));
        notes.push(format!("Base repository: {}", event.base_repo));

        let document = Self::load_policy_document(input, &event, host)?;
        let exemption_policy = ExemptionPolicy::resolve(&document, &input.bot_username)?;

        let exemption = Exemption::evaluate(&exemption_policy, &event);
        if exemption != Exemption::Disabled {
            notes.push(format!("PR author: {}", event.author));
            notes.push(format!("PR labels: {:?}", event.labels));
        }
        if let Some(message) = exemption.bypass_message() {
            return Ok(CheckReport {
                notes,
                verdict: Verdict::pass(message),
            });
        }

        // exempt pull requests pass before the rest of the policy is validated
        let config = PolicyConfig::resolve(&document, &input.bot_username, exemption_policy)?;
        tracing::debug!(?config, "resolved changelog policy");

        let changed_files = host.list_pull_request_files(&event.base_repo, event.pr_number)?;
        let verdict = Self::decide(&config, &event, &exemption, &changed_files, &mut notes);

        Ok(CheckReport { notes, verdict })
    }

    fn load_policy_document(
        input: &TriggerInput,
        event: &TriggerEvent,
        host: &dyn RepositoryHost,
    ) -> Result<TomlDocument> {
        if let Some(path) = &input.config_file {
            tracing::debug!(path = %path.display(), "reading local policy document");
            return TomlReader::read_file(path);
        }

        let content = host.fetch_file(&event.base_repo, POLICY_DOCUMENT)?;
        TomlReader::parse_string(&content, format!("{}:{}", event.base_repo, POLICY_DOCUMENT))
    }

    /// decide the verdict for a pull request that is not bypassed
    ///
    /// first failing step wins: what's new entry, skip label, fragment
    /// presence, then fragment type and number
    pub fn decide<S: AsRef<str>>(
        config: &PolicyConfig,
        event: &TriggerEvent,
        exemption: &Exemption,
        changed_files: &[S],
        notes: &mut Vec<String>,
    ) -> Verdict {
        let directories = config.towncrier.fragment_directories();
        let types = config.towncrier.type_tokens();
        let fragment = find_fragment(changed_files, &directories);
        tracing::debug!(?directories, ?fragment, "fragment lookup");

        Step::Continue
            .then(
                || match check_whatsnew(&config.whatsnew, &event.labels, changed_files) {
                    Ok(status) => {
                        notes.push(status.describe(&config.whatsnew));
                        Step::Continue
                    }
                    Err(violation) => Step::Done(violation.into()),
                },
            )
            .then(|| match (exemption, &fragment) {
                (Exemption::SkipLabel(label), Some(_)) => Step::Done(Verdict::fail(
                    ViolationKind::SkipLabelContradiction,
                    format!("Changelog exists when \"{}\" label is set", label),
                )),
                (Exemption::SkipLabel(label), None) => Step::Done(Verdict::pass(format!(
                    "Skipping towncrier changelog check because \"{}\" label is set",
                    label
                ))),
                _ => Step::Continue,
            })
            .resolve(|| match &fragment {
                None => Verdict::fail(
                    ViolationKind::MissingFragment,
                    format!(
                        "No changelog file was added in the correct directories for PR {}",
                        event.pr_number
                    ),
                ),
                Some(fragment) => validate_fragment(
                    fragment,
                    &types,
                    event.pr_number,
                    config.verify_pr_number,
                )
                .map_or_else(
                    || {
                        Verdict::pass(format!(
                            "Changelog file ({}) correctly added for PR {}.",
                            fragment.path, event.pr_number
                        ))
                    },
                    Verdict::from,
                ),
            })
    }
}
