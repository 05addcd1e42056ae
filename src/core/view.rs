use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::core::entity::{EntityCategory, FetchedEntitySet};
use crate::core::identifier::{is_valid_identifier, separate_by_kind, IdentifierKind};

/// What one source believes about one entity category: identifier kind -> values.
///
/// A kind is only present when at least one value was observed for it. An
/// absent kind means the source expressed no opinion, which suppresses
/// comparison for that kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityView {
    ids: BTreeMap<IdentifierKind, BTreeSet<String>>,
}

impl EntityView {
    /// Build a view, dropping kinds whose value set is empty
    #[must_use]
    pub fn build(raw: BTreeMap<IdentifierKind, BTreeSet<String>>) -> Self {
        let ids = raw
            .into_iter()
            .filter(|(_, values)| !values.is_empty())
            .collect();
        Self { ids }
    }

    /// Build a view from unclassified identifier tokens. Placeholders are
    /// dropped before classification.
    #[must_use]
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tokens: Vec<S> = tokens
            .into_iter()
            .filter(|token| is_valid_identifier(token.as_ref()))
            .collect();
        Self::build(separate_by_kind(tokens))
    }

    /// Union of everything a set of registry lookups returned
    #[must_use]
    pub fn from_fetched<'a, I>(fetched: I) -> Self
    where
        I: IntoIterator<Item = &'a FetchedEntitySet>,
    {
        let mut raw: BTreeMap<IdentifierKind, BTreeSet<String>> = BTreeMap::new();
        for set in fetched {
            for entity in &set.entities {
                for kind in IdentifierKind::ALL {
                    if let Some(value) = entity.id(kind) {
                        raw.entry(kind).or_default().insert(value.to_string());
                    }
                }
            }
        }
        Self::build(raw)
    }

    /// Add values for one kind; adding nothing leaves the kind absent
    #[must_use]
    pub fn with_ids<I, S>(mut self, kind: IdentifierKind, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: BTreeSet<String> = values.into_iter().map(Into::into).collect();
        if !values.is_empty() {
            self.ids.entry(kind).or_default().extend(values);
        }
        self
    }

    #[must_use]
    pub fn get(&self, kind: IdentifierKind) -> Option<&BTreeSet<String>> {
        self.ids.get(&kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = IdentifierKind> + '_ {
        self.ids.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (IdentifierKind, &BTreeSet<String>)> {
        self.ids.iter().map(|(kind, values)| (*kind, values))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// One source's views of every entity category it described
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryViews {
    views: BTreeMap<EntityCategory, EntityView>,
}

impl CategoryViews {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a category view; empty views are not kept
    pub fn insert(&mut self, category: EntityCategory, view: EntityView) {
        if view.is_empty() {
            self.views.remove(&category);
        } else {
            self.views.insert(category, view);
        }
    }

    #[must_use]
    pub fn with(mut self, category: EntityCategory, view: EntityView) -> Self {
        self.insert(category, view);
        self
    }

    #[must_use]
    pub fn get(&self, category: EntityCategory) -> Option<&EntityView> {
        self.views.get(&category)
    }

    pub fn categories(&self) -> impl Iterator<Item = EntityCategory> + '_ {
        self.views.keys().copied()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}
