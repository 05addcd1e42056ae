use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Placeholder values that sources use when they have nothing to say
const PLACEHOLDER_VALUES: [&str; 3] = ["N/A", "undefined", "unspecified"];

/// Prefixes of ENA/SRA/DDBJ/EGA accession numbers
const ACCESSION_PREFIXES: [&str; 4] = ["ER", "SR", "DR", "EGA"];

/// The ways an entity (sample, library, study) may be referenced
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierKind {
    Name,
    AccessionNumber,
    InternalId,
}

impl IdentifierKind {
    pub const ALL: [IdentifierKind; 3] = [
        IdentifierKind::Name,
        IdentifierKind::AccessionNumber,
        IdentifierKind::InternalId,
    ];
}

impl std::fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Name => write!(f, "name"),
            Self::AccessionNumber => write!(f, "accession_number"),
            Self::InternalId => write!(f, "internal_id"),
        }
    }
}

/// Check whether a textual token carries an actual identifier.
///
/// Empty strings and the placeholders `N/A`, `undefined` and `unspecified`
/// are not identifiers.
///
/// # Examples
///
/// ```
/// use mcheck::core::identifier::is_valid_identifier;
///
/// assert!(is_valid_identifier("SC_WES_INT5899561"));
/// assert!(!is_valid_identifier("N/A"));
/// assert!(!is_valid_identifier(""));
/// ```
#[must_use]
pub fn is_valid_identifier(token: &str) -> bool {
    !token.is_empty() && !PLACEHOLDER_VALUES.contains(&token)
}

/// Check whether an integer-typed token carries an actual identifier.
/// Registries use negative numbers as "unknown".
#[must_use]
pub fn is_valid_numeric_identifier(token: i64) -> bool {
    token >= 0
}

/// Decide which kind of identifier a token is.
///
/// Rules are applied in order, so an accession prefix wins over the
/// all-digits rule:
///
/// 1. starts with `ER`, `SR`, `DR` or `EGA` -> [`IdentifierKind::AccessionNumber`]
/// 2. only decimal digits -> [`IdentifierKind::InternalId`]
/// 3. anything else -> [`IdentifierKind::Name`]
///
/// # Examples
///
/// ```
/// use mcheck::core::identifier::{classify, IdentifierKind};
///
/// assert_eq!(classify("EGAN00001218652"), IdentifierKind::AccessionNumber);
/// assert_eq!(classify("1571544"), IdentifierKind::InternalId);
/// assert_eq!(classify("SC_WES_INT5899561"), IdentifierKind::Name);
/// ```
#[must_use]
pub fn classify(token: &str) -> IdentifierKind {
    if ACCESSION_PREFIXES
        .iter()
        .any(|prefix| token.starts_with(prefix))
    {
        IdentifierKind::AccessionNumber
    } else if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) {
        IdentifierKind::InternalId
    } else {
        IdentifierKind::Name
    }
}

/// Classify every token and group them by kind. Duplicates collapse.
#[must_use]
pub fn separate_by_kind<I, S>(tokens: I) -> BTreeMap<IdentifierKind, BTreeSet<String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut grouped: BTreeMap<IdentifierKind, BTreeSet<String>> = BTreeMap::new();
    for token in tokens {
        let token = token.as_ref();
        grouped
            .entry(classify(token))
            .or_default()
            .insert(token.to_string());
    }
    grouped
}

/// An identifier as surfaced by a source: some give integers, some text.
///
/// Both forms compare as strings once converted, so `1571544` and `"1571544"`
/// are the same identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawToken {
    Integer(i64),
    Text(String),
}

impl RawToken {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        match self {
            Self::Integer(value) => is_valid_numeric_identifier(*value),
            Self::Text(value) => is_valid_identifier(value),
        }
    }

    #[must_use]
    pub fn into_string(self) -> String {
        match self {
            Self::Integer(value) => value.to_string(),
            Self::Text(value) => value,
        }
    }
}

impl From<&str> for RawToken {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i64> for RawToken {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

/// Deserialize a list of string-or-integer identifiers into strings.
pub(crate) fn de_tokens<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<RawToken>::deserialize(deserializer)?;
    Ok(raw.into_iter().map(RawToken::into_string).collect())
}

/// Deserialize an optional string-or-integer identifier, dropping placeholders.
pub(crate) fn de_opt_token<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawToken>::deserialize(deserializer)?;
    Ok(raw
        .filter(RawToken::is_valid)
        .map(RawToken::into_string))
}
