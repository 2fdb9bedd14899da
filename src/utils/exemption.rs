// exemption evaluator

use crate::utils::changelog::ExemptionPolicy;
use crate::utils::trigger::TriggerEvent;

/// automation accounts whose pull requests never need a fragment
pub const AUTOMATION_ACCOUNTS: &[&str] = &["meeseeksmachine", "pre-commit-ci[bot]"];

/// how the policy applies to a pull request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exemption {
    /// the policy is switched off
    Disabled,
    /// authored by a known automation account
    AutomationAuthor(String),
    /// the no-op label bypasses every check
    NoopLabel(String),
    /// the skip label inverts the fragment check: a fragment is now an error
    SkipLabel(String),
    /// regular pull request, full check
    NotExempt,
}

impl Exemption {
    /// decide in order: disabled, automation author, no-op label, skip label
    pub fn evaluate(config: &ExemptionPolicy, event: &TriggerEvent) -> Self {
        if !config.enabled {
            return Exemption::Disabled;
        }

        if AUTOMATION_ACCOUNTS.contains(&event.author.as_str()) {
            return Exemption::AutomationAuthor(event.author.clone());
        }

        if event.has_label(&config.noop_label) {
            return Exemption::NoopLabel(config.noop_label.clone());
        }

        match &config.skip_label {
            Some(label) if event.has_label(label) => Exemption::SkipLabel(label.clone()),
            _ => Exemption::NotExempt,
        }
    }

    /// message for exemptions that end the run successfully right away
    pub fn bypass_message(&self) -> Option<String> {
        match self {
            Exemption::Disabled => {
                Some("Skipping towncrier changelog plugin as disabled in config".to_string())
            }
            Exemption::AutomationAuthor(author) => Some(format!(
                "Skipping towncrier changelog check for bot \"{}\"",
                author
            )),
            Exemption::NoopLabel(label) => Some(format!(
                "Skipping towncrier changelog check because \"{}\" label is set",
                label
            )),
            Exemption::SkipLabel(_) | Exemption::NotExempt => None,
        }
    }
}
