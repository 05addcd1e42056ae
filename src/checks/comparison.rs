use std::collections::{BTreeMap, BTreeSet};

use crate::checks::result::CheckResult;
use crate::core::entity::EntityCategory;
use crate::core::identifier::IdentifierKind;
use crate::core::view::{CategoryViews, EntityView};

/// Per-kind identifier sets, e.g. the values one view has and another lacks
pub type KindDifference = BTreeMap<IdentifierKind, BTreeSet<String>>;

/// Values in `source` that `other` does not have, per identifier kind.
///
/// Only kinds present in both views are compared: a kind the other view has
/// no opinion on is not evidence of disagreement. Kinds with nothing extra
/// are omitted, so equal views give an empty map.
///
/// Not symmetric; see [`bidirectional_difference`].
#[must_use]
pub fn one_way_difference(source: &EntityView, other: &EntityView) -> KindDifference {
    source
        .iter()
        .filter_map(|(kind, values)| {
            let other_values = other.get(kind)?;
            let extra: BTreeSet<String> = values.difference(other_values).cloned().collect();
            (!extra.is_empty()).then_some((kind, extra))
        })
        .collect()
}

/// Union of both one-way differences between `a` and `b`
#[must_use]
pub fn bidirectional_difference(a: &EntityView, b: &EntityView) -> KindDifference {
    let mut merged = one_way_difference(a, b);
    for (kind, extra) in one_way_difference(b, a) {
        merged.entry(kind).or_default().extend(extra);
    }
    merged
}

/// [`one_way_difference`] for each requested category present in both
/// sources. Categories without differences are omitted.
#[must_use]
pub fn difference_across_categories(
    source: &CategoryViews,
    other: &CategoryViews,
    categories: &BTreeSet<EntityCategory>,
) -> BTreeMap<EntityCategory, KindDifference> {
    categories
        .iter()
        .filter_map(|category| {
            let source_view = source.get(*category)?;
            let other_view = other.get(*category)?;
            let diff = one_way_difference(source_view, other_view);
            (!diff.is_empty()).then_some((*category, diff))
        })
        .collect()
}

/// Whether any requested category carries at least one identifier kind in
/// both sources
#[must_use]
pub fn have_common_ground(
    left: &CategoryViews,
    right: &CategoryViews,
    categories: &BTreeSet<EntityCategory>,
) -> bool {
    categories.iter().any(|category| {
        match (left.get(*category), right.get(*category)) {
            (Some(left_view), Some(right_view)) => {
                left_view.kinds().any(|kind| right_view.get(kind).is_some())
            }
            _ => false,
        }
    })
}

/// Compare two sources' views in both directions and report the result as
/// one check.
///
/// The check is not executed when either source has no views at all, or
/// when no requested category shares an identifier kind between them.
#[must_use]
pub fn check_sources_agree(
    check_name: &str,
    (left_label, left): (&str, &CategoryViews),
    (right_label, right): (&str, &CategoryViews),
    categories: &BTreeSet<EntityCategory>,
) -> CheckResult {
    for (label, views) in [(left_label, left), (right_label, right)] {
        if views.is_empty() {
            return CheckResult::not_executed(
                check_name,
                format!("No entity identifiers found in {label}"),
            );
        }
    }

    if !have_common_ground(left, right, categories) {
        return CheckResult::not_executed(
            check_name,
            format!("No identifier kind in common between {left_label} and {right_label}"),
        );
    }

    let left_extra = difference_across_categories(left, right, categories);
    let right_extra = difference_across_categories(right, left, categories);

    if left_extra.is_empty() && right_extra.is_empty() {
        return CheckResult::new(check_name);
    }

    let mut parts = Vec::new();
    for category in categories {
        if let Some(diff) = left_extra.get(category) {
            parts.push(format!(
                "{category} in {left_label} but not in {right_label}: {}",
                format_difference(diff)
            ));
        }
        if let Some(diff) = right_extra.get(category) {
            parts.push(format!(
                "{category} in {right_label} but not in {left_label}: {}",
                format_difference(diff)
            ));
        }
    }

    CheckResult::failure(check_name, parts.join("; "))
}

/// Render a per-kind difference as `kind=[a, b], kind=[c]`
#[must_use]
pub fn format_difference(diff: &KindDifference) -> String {
    diff.iter()
        .map(|(kind, values)| {
            let values: Vec<&str> = values.iter().map(String::as_str).collect();
            format!("{kind}=[{}]", values.join(", "))
        })
        .collect::<Vec<_>>()
        .join(", ")
}
