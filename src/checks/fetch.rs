use std::collections::{BTreeMap, BTreeSet};

use crate::checks::result::CheckResult;
use crate::core::entity::{EntityRecord, FetchedEntitySet};

pub const ALL_IDS_FOUND: &str = "registry_all_ids_found";
pub const NO_DUPLICATE_IDS: &str = "registry_no_duplicate_ids";

/// Queried identifiers that no returned entity carries
#[must_use]
pub fn missing_ids(fetched: &FetchedEntitySet) -> BTreeSet<&str> {
    let found: BTreeSet<&str> = fetched.found_ids().collect();
    fetched
        .query_ids
        .iter()
        .map(String::as_str)
        .filter(|id| !found.contains(id))
        .collect()
}

/// Query-kind values carried by more than one returned entity, with the
/// entities that share them
#[must_use]
pub fn duplicated_ids(fetched: &FetchedEntitySet) -> BTreeMap<&str, Vec<&EntityRecord>> {
    let mut by_id: BTreeMap<&str, Vec<&EntityRecord>> = BTreeMap::new();
    for entity in &fetched.entities {
        if let Some(id) = entity.id(fetched.query_kind) {
            by_id.entry(id).or_default().push(entity);
        }
    }
    by_id.retain(|_, entities| entities.len() > 1);
    by_id
}

/// Every identifier that was asked for came back.
#[must_use]
pub fn check_all_queried_ids_found(fetched: &FetchedEntitySet) -> CheckResult {
    let missing = missing_ids(fetched);
    if missing.is_empty() {
        return CheckResult::new(ALL_IDS_FOUND);
    }

    let missing: Vec<&str> = missing.into_iter().collect();
    CheckResult::failure(
        ALL_IDS_FOUND,
        format!(
            "{} not found in registry by {}: {}",
            fetched.category,
            fetched.query_kind,
            missing.join(", ")
        ),
    )
}

/// No identifier came back attached to more than one entity.
#[must_use]
pub fn check_no_duplicate_ids(fetched: &FetchedEntitySet) -> CheckResult {
    let duplicated = duplicated_ids(fetched);
    if duplicated.is_empty() {
        return CheckResult::new(NO_DUPLICATE_IDS);
    }

    let details: Vec<String> = duplicated
        .iter()
        .map(|(id, entities)| {
            let entities: Vec<String> = entities.iter().map(ToString::to_string).collect();
            format!("{id} -> {}", entities.join(" "))
        })
        .collect();
    CheckResult::failure(
        NO_DUPLICATE_IDS,
        format!(
            "{} {} shared by several registry entities: {}",
            fetched.category,
            fetched.query_kind,
            details.join("; ")
        ),
    )
}
