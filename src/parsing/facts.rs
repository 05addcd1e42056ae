use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::attributes::AttributeMap;
use crate::core::entity::FetchedEntitySet;
use crate::parsing::sam::{header_entity_views, parse_header_text, ParseError};

/// Facts fetched about one file, as handed over by the fetch collaborators
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubjectFacts {
    /// Path of the file in the storage system
    pub path: String,

    /// Catalogue attributes
    #[serde(default)]
    pub attributes: AttributeMap,

    /// Registry lookups, one per (category, identifier kind)
    #[serde(default)]
    pub registry: Vec<FetchedEntitySet>,

    /// Raw SAM header text, if it was extracted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,

    /// MD5 of the file contents, if already computed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub md5: Option<String>,
}

/// Top-level layout of a facts file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FactsFile {
    pub subjects: Vec<SubjectFacts>,
}

impl SubjectFacts {
    /// Build the pipeline input, parsing the header text if present
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the header text is malformed.
    pub fn into_subject(self) -> Result<crate::checks::pipeline::Subject, ParseError> {
        let header = match &self.header {
            Some(text) => Some(header_entity_views(&parse_header_text(text)?)),
            None => None,
        };

        Ok(crate::checks::pipeline::Subject {
            path: self.path,
            attributes: self.attributes,
            header,
            registry: self.registry,
            checksum: self.md5.map(|md5| md5.to_lowercase()),
        })
    }
}

/// Load a facts file
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read or `ParseError::Json`
/// if it is not a valid facts document.
pub fn parse_facts_file(path: &Path) -> Result<FactsFile, ParseError> {
    let content = std::fs::read_to_string(path)?;
    parse_facts_text(&content)
}

/// Parse a facts document from JSON text
///
/// # Errors
///
/// Returns `ParseError::Json` if the text is not a valid facts document.
pub fn parse_facts_text(text: &str) -> Result<FactsFile, ParseError> {
    Ok(serde_json::from_str(text)?)
}
