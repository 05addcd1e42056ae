use std::collections::BTreeSet;

use crate::checks::error::CheckError;
use crate::checks::result::CheckResult;
use crate::core::entity::{EntityRecord, FetchedEntitySet};

pub const CROSS_KIND_AGREEMENT: &str = "registry_lookups_agree";

/// Check that lookups of the same entities by different identifier kinds
/// returned the same entities.
///
/// Adjacent lookups are compared pairwise. A pair agrees when either
/// returned set is a subset of the other, since a less specific key may
/// legitimately return more. With fewer than two lookups there is nothing
/// to compare and the check succeeds.
///
/// # Errors
///
/// Returns `CheckError::ContradictoryFetch` if two returned sets are unequal
/// while neither has an entity the other lacks. That cannot happen for
/// well-formed input and points at a broken collaborator.
pub fn check_agreement<'a, I>(fetched_by_kind: I) -> Result<CheckResult, CheckError>
where
    I: IntoIterator<Item = &'a FetchedEntitySet>,
{
    let fetched: Vec<&FetchedEntitySet> = fetched_by_kind.into_iter().collect();
    let mut problems = Vec::new();

    for pair in fetched.windows(2) {
        let (previous, current) = (pair[0], pair[1]);
        let previous_set: BTreeSet<&EntityRecord> = previous.entities.iter().collect();
        let current_set: BTreeSet<&EntityRecord> = current.entities.iter().collect();

        if previous_set == current_set
            || previous_set.is_subset(&current_set)
            || current_set.is_subset(&previous_set)
        {
            continue;
        }

        let only_previous: Vec<String> = previous_set
            .difference(&current_set)
            .map(ToString::to_string)
            .collect();
        let only_current: Vec<String> = current_set
            .difference(&previous_set)
            .map(ToString::to_string)
            .collect();

        if only_previous.is_empty() && only_current.is_empty() {
            return Err(CheckError::ContradictoryFetch {
                category: current.category,
                first_kind: previous.query_kind,
                second_kind: current.query_kind,
            });
        }

        problems.push(format!(
            "{category} fetched by {first} but not by {second}: [{a}]; \
             fetched by {second} but not by {first}: [{b}]",
            category = current.category,
            first = previous.query_kind,
            second = current.query_kind,
            a = only_previous.join(" "),
            b = only_current.join(" "),
        ));
    }

    if problems.is_empty() {
        Ok(CheckResult::new(CROSS_KIND_AGREEMENT))
    } else {
        Ok(CheckResult::failure(CROSS_KIND_AGREEMENT, problems.join("; ")))
    }
}
