// fragment type and number validator

use super::types::FragmentCandidate;
use crate::utils::severity::{Violation, ViolationKind};

/// validate a matched fragment against the configured type tokens and,
/// when `verify_pr_number` is set, the pull request number
pub fn validate_fragment(
    fragment: &FragmentCandidate,
    types: &[&str],
    pr_number: u64,
    verify_pr_number: bool,
) -> Option<Violation> {
    if let Some(violation) = check_type(fragment, types, pr_number) {
        return Some(violation);
    }

    if verify_pr_number {
        return check_number(fragment, pr_number);
    }

    None
}

fn check_type(fragment: &FragmentCandidate, types: &[&str], pr_number: u64) -> Option<Violation> {
    match fragment.type_token() {
        Some(token) if types.contains(&token) => None,
        _ => Some(Violation::new(
            ViolationKind::UnknownType,
            format!(
                "The changelog file that was added for PR {} is not one of the configured types: {:?}",
                pr_number, types
            ),
        )),
    }
}

// NOTE: substring match, so `1234.feature.rst` also satisfies PR 23
fn check_number(fragment: &FragmentCandidate, pr_number: u64) -> Option<Violation> {
    if fragment.path.contains(&pr_number.to_string()) {
        return None;
    }

    Some(Violation::new(
        ViolationKind::NumberMismatch,
        format!(
            "The number in the changelog file ({}) does not match this pull request number ({}).",
            fragment.path, pr_number
        ),
    ))
}
