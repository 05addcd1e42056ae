use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::core::entity::EntityCategory;
use crate::core::identifier::{is_valid_identifier, IdentifierKind, RawToken};
use crate::core::view::{CategoryViews, EntityView};

/// Catalogue attributes holding entity identifiers, and the kind each one holds
pub const ENTITY_ATTRIBUTES: [(&str, EntityCategory, IdentifierKind); 8] = [
    ("sample", EntityCategory::Samples, IdentifierKind::Name),
    ("sample_id", EntityCategory::Samples, IdentifierKind::InternalId),
    (
        "sample_accession_number",
        EntityCategory::Samples,
        IdentifierKind::AccessionNumber,
    ),
    ("library", EntityCategory::Libraries, IdentifierKind::Name),
    ("library_id", EntityCategory::Libraries, IdentifierKind::InternalId),
    ("study", EntityCategory::Studies, IdentifierKind::Name),
    ("study_id", EntityCategory::Studies, IdentifierKind::InternalId),
    (
        "study_accession_number",
        EntityCategory::Studies,
        IdentifierKind::AccessionNumber,
    ),
];

/// Attribute -> set of values, as stored by the storage catalogue (AVUs
/// without units). Values given as integers are kept as their decimal text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, Vec<RawToken>>",
    into = "BTreeMap<String, BTreeSet<String>>"
)]
pub struct AttributeMap {
    values: BTreeMap<String, BTreeSet<String>>,
}

fn is_entity_attribute(attribute: &str) -> bool {
    ENTITY_ATTRIBUTES.iter().any(|(name, _, _)| *name == attribute)
}

impl From<BTreeMap<String, Vec<RawToken>>> for AttributeMap {
    /// Identifier attributes keep only valid tokens, so a negative integer id
    /// never becomes an identifier once it is text.
    fn from(raw: BTreeMap<String, Vec<RawToken>>) -> Self {
        let values = raw
            .into_iter()
            .filter_map(|(attribute, tokens)| {
                let identifiers_only = is_entity_attribute(&attribute);
                let values: BTreeSet<String> = tokens
                    .into_iter()
                    .filter(|token| !identifiers_only || token.is_valid())
                    .map(RawToken::into_string)
                    .collect();
                (!values.is_empty()).then_some((attribute, values))
            })
            .collect();
        Self { values }
    }
}

impl From<AttributeMap> for BTreeMap<String, BTreeSet<String>> {
    fn from(attributes: AttributeMap) -> Self {
        attributes.values
    }
}

impl AttributeMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one attribute value
    pub fn insert(&mut self, attribute: impl Into<String>, value: impl Into<String>) {
        self.values
            .entry(attribute.into())
            .or_default()
            .insert(value.into());
    }

    #[must_use]
    pub fn with(mut self, attribute: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(attribute, value);
        self
    }

    #[must_use]
    pub fn get(&self, attribute: &str) -> Option<&BTreeSet<String>> {
        self.values.get(attribute)
    }

    /// The single value of an attribute, or `None` if it is absent or repeated
    #[must_use]
    pub fn single(&self, attribute: &str) -> Option<&str> {
        match self.values.get(attribute) {
            Some(values) if values.len() == 1 => values.iter().next().map(String::as_str),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_map(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.values
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Per-category entity views from the identifier attributes
    #[must_use]
    pub fn entity_views(&self) -> CategoryViews {
        let mut views = CategoryViews::new();
        for category in EntityCategory::ALL {
            let mut view = EntityView::default();
            for (attribute, _, kind) in ENTITY_ATTRIBUTES
                .iter()
                .filter(|(_, attr_category, _)| *attr_category == category)
            {
                if let Some(values) = self.values.get(*attribute) {
                    view = view.with_ids(
                        *kind,
                        values
                            .iter()
                            .filter(|value| is_valid_identifier(value))
                            .cloned(),
                    );
                }
            }
            views.insert(category, view);
        }
        views
    }
}
