use std::collections::BTreeMap;
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

use crate::checks::error::CheckError;
use crate::core::entity::EntityCategory;
use crate::core::view::{CategoryViews, EntityView};

/// Maximum number of read groups accepted from one header
pub const MAX_READ_GROUPS: usize = 100_000;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("noodles error: {0}")]
    Noodles(String),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Rules(#[from] CheckError),

    #[error("Too many read groups: {0} exceeds maximum allowed ({MAX_READ_GROUPS})")]
    TooManyReadGroups(usize),
}

/// Tags of one `@RG` header line, e.g. `SM` -> sample
pub type ReadGroupTags = BTreeMap<String, String>;

/// Read-group tags holding entity identifiers
const ENTITY_TAGS: [(&str, EntityCategory); 3] = [
    ("SM", EntityCategory::Samples),
    ("LB", EntityCategory::Libraries),
    ("DS", EntityCategory::Studies),
];

/// Read the header of a SAM/BAM/CRAM file and return it as SAM text
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, `ParseError::Noodles`
/// if the header cannot be decoded, or `ParseError::UnsupportedFormat` for
/// unknown extensions.
pub fn read_header_file(path: &Path) -> Result<String, ParseError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase);

    let header = match extension.as_deref() {
        Some("sam") | None => read_sam_header(path)?,
        Some("bam") => read_bam_header(path)?,
        Some("cram") => read_cram_header(path)?,
        Some(ext) => return Err(ParseError::UnsupportedFormat(ext.to_string())),
    };

    header_to_text(&header)
}

fn read_sam_header(path: &Path) -> Result<noodles::sam::Header, ParseError> {
    use noodles::sam;

    let mut reader = std::fs::File::open(path)
        .map(BufReader::new)
        .map(sam::io::Reader::new)?;

    reader
        .read_header()
        .map_err(|e| ParseError::Noodles(e.to_string()))
}

fn read_bam_header(path: &Path) -> Result<noodles::sam::Header, ParseError> {
    use noodles::bam;

    let mut reader = std::fs::File::open(path).map(bam::io::Reader::new)?;

    reader
        .read_header()
        .map_err(|e| ParseError::Noodles(e.to_string()))
}

fn read_cram_header(path: &Path) -> Result<noodles::sam::Header, ParseError> {
    use noodles::cram;

    let mut reader = std::fs::File::open(path).map(cram::io::Reader::new)?;

    reader
        .read_file_definition()
        .map_err(|e| ParseError::Noodles(e.to_string()))?;

    reader
        .read_file_header()
        .map_err(|e| ParseError::Noodles(e.to_string()))
}

/// Render a noodles header back to SAM header text
fn header_to_text(header: &noodles::sam::Header) -> Result<String, ParseError> {
    let mut writer = noodles::sam::io::Writer::new(Vec::new());
    writer.write_header(header)?;
    String::from_utf8(writer.into_inner())
        .map_err(|e| ParseError::InvalidFormat(format!("Header is not valid UTF-8: {e}")))
}

/// Extract the tags of every `@RG` line from header text
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if a read group has no `ID` tag, or
/// `ParseError::TooManyReadGroups` if the limit is exceeded.
pub fn parse_header_text(text: &str) -> Result<Vec<ReadGroupTags>, ParseError> {
    let mut read_groups = Vec::new();

    for (i, line) in text.lines().enumerate() {
        if !line.starts_with("@RG") {
            continue;
        }

        let mut tags = ReadGroupTags::new();
        for field in line.split('\t').skip(1) {
            if let Some((tag, value)) = field.split_once(':') {
                tags.insert(tag.to_string(), value.to_string());
            } else {
                warn!(line = i + 1, field = %field, "Ignoring malformed read group field");
            }
        }

        if !tags.contains_key("ID") {
            return Err(ParseError::InvalidFormat(format!(
                "Read group on line {} has no ID tag",
                i + 1
            )));
        }

        if read_groups.len() >= MAX_READ_GROUPS {
            return Err(ParseError::TooManyReadGroups(read_groups.len() + 1));
        }

        read_groups.push(tags);
    }

    debug!(read_groups = read_groups.len(), "Parsed header read groups");
    Ok(read_groups)
}

/// Per-category entity views from read-group tags: `SM` samples,
/// `LB` libraries, `DS` studies
#[must_use]
pub fn header_entity_views(read_groups: &[ReadGroupTags]) -> CategoryViews {
    let mut views = CategoryViews::new();
    for (tag, category) in ENTITY_TAGS {
        let tokens = read_groups.iter().filter_map(|rg| rg.get(tag));
        views.insert(category, EntityView::from_tokens(tokens));
    }
    views
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::identifier::IdentifierKind;

    const HEADER: &str = "@HD\tVN:1.6\tSO:coordinate
@SQ\tSN:chr1\tLN:248956422
@RG\tID:1#11\tPL:ILLUMINA\tPU:5970_3#11\tLB:12345678\tDS:Study A\tSM:EGAN00001218652
@RG\tID:1#11.1\tPL:ILLUMINA\tLB:12345678\tSM:SC_WES_INT5899561\tDS:N/A
@PG\tID:bwa\tPN:bwa
";

    #[test]
    fn test_parse_header_text() {
        let read_groups = parse_header_text(HEADER).unwrap();
        assert_eq!(read_groups.len(), 2);
        assert_eq!(read_groups[0]["ID"], "1#11");
        assert_eq!(read_groups[0]["SM"], "EGAN00001218652");
        assert_eq!(read_groups[1]["LB"], "12345678");
    }

    #[test]
    fn test_parse_header_text_no_read_groups() {
        let read_groups = parse_header_text("@HD\tVN:1.6\n@SQ\tSN:chr1\tLN:100\n").unwrap();
        assert!(read_groups.is_empty());
    }

    #[test]
    fn test_parse_header_text_missing_id() {
        assert!(parse_header_text("@RG\tSM:S1\n").is_err());
    }

    #[test]
    fn test_read_group_limit() {
        let header_with = |count: usize| -> String {
            (0..count).map(|i| format!("@RG\tID:{i}\tSM:S{i}\n")).collect()
        };

        assert_eq!(
            parse_header_text(&header_with(MAX_READ_GROUPS)).unwrap().len(),
            MAX_READ_GROUPS
        );

        let err = parse_header_text(&header_with(MAX_READ_GROUPS + 1)).unwrap_err();
        assert!(matches!(err, ParseError::TooManyReadGroups(n) if n == MAX_READ_GROUPS + 1));
        assert!(err.to_string().starts_with(&format!(
            "Too many read groups: {} exceeds",
            MAX_READ_GROUPS + 1
        )));
    }

    #[test]
    fn test_header_entity_views() {
        let read_groups = parse_header_text(HEADER).unwrap();
        let views = header_entity_views(&read_groups);

        let samples = views.get(EntityCategory::Samples).unwrap();
        assert!(samples
            .get(IdentifierKind::AccessionNumber)
            .unwrap()
            .contains("EGAN00001218652"));
        assert!(samples
            .get(IdentifierKind::Name)
            .unwrap()
            .contains("SC_WES_INT5899561"));

        let libraries = views.get(EntityCategory::Libraries).unwrap();
        assert_eq!(libraries.get(IdentifierKind::InternalId).unwrap().len(), 1);

        // The N/A placeholder is dropped
        let studies = views.get(EntityCategory::Studies).unwrap();
        assert_eq!(studies.get(IdentifierKind::Name).unwrap().len(), 1);
    }
}
