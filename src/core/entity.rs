use serde::{Deserialize, Serialize};

use crate::core::identifier::{de_opt_token, de_tokens, IdentifierKind};

/// Entity categories described by file metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityCategory {
    Samples,
    Libraries,
    Studies,
}

impl EntityCategory {
    pub const ALL: [EntityCategory; 3] = [
        EntityCategory::Samples,
        EntityCategory::Libraries,
        EntityCategory::Studies,
    ];
}

impl std::fmt::Display for EntityCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Samples => write!(f, "samples"),
            Self::Libraries => write!(f, "libraries"),
            Self::Studies => write!(f, "studies"),
        }
    }
}

/// One entity returned by a registry lookup.
///
/// Any identifier may be unknown. Integer ids are stored as their decimal text.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityRecord {
    #[serde(default, deserialize_with = "de_opt_token", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "de_opt_token", skip_serializing_if = "Option::is_none")]
    pub accession_number: Option<String>,

    #[serde(default, deserialize_with = "de_opt_token", skip_serializing_if = "Option::is_none")]
    pub internal_id: Option<String>,
}

impl EntityRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_accession_number(mut self, accession: impl Into<String>) -> Self {
        self.accession_number = Some(accession.into());
        self
    }

    #[must_use]
    pub fn with_internal_id(mut self, id: impl ToString) -> Self {
        self.internal_id = Some(id.to_string());
        self
    }

    /// This entity's value for the given identifier kind, if known
    #[must_use]
    pub fn id(&self, kind: IdentifierKind) -> Option<&str> {
        match kind {
            IdentifierKind::Name => self.name.as_deref(),
            IdentifierKind::AccessionNumber => self.accession_number.as_deref(),
            IdentifierKind::InternalId => self.internal_id.as_deref(),
        }
    }
}

impl std::fmt::Display for EntityRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fields: Vec<String> = IdentifierKind::ALL
            .iter()
            .filter_map(|kind| self.id(*kind).map(|value| format!("{kind}={value}")))
            .collect();
        write!(f, "{{{}}}", fields.join(", "))
    }
}

/// The outcome of one registry lookup: which ids were asked for, by which
/// kind, and which entities came back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchedEntitySet {
    pub category: EntityCategory,

    /// Identifier kind the lookup was keyed on
    pub query_kind: IdentifierKind,

    #[serde(deserialize_with = "de_tokens")]
    pub query_ids: Vec<String>,

    #[serde(default)]
    pub entities: Vec<EntityRecord>,
}

impl FetchedEntitySet {
    pub fn new<I, S>(category: EntityCategory, query_kind: IdentifierKind, query_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        Self {
            category,
            query_kind,
            query_ids: query_ids.into_iter().map(|id| id.to_string()).collect(),
            entities: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_entities(mut self, entities: Vec<EntityRecord>) -> Self {
        self.entities = entities;
        self
    }

    /// Values of the query kind carried by the returned entities, in order,
    /// with multiplicity
    pub fn found_ids(&self) -> impl Iterator<Item = &str> {
        self.entities
            .iter()
            .filter_map(move |entity| entity.id(self.query_kind))
    }
}
