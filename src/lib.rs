//! # mcheck
//!
//! A library for cross-checking the metadata of sequencing data files.
//!
//! Three independent sources describe every file in a sequencing archive:
//! the storage catalogue's attributes, the file's own header, and the sample
//! registry. They are maintained by different people and drift apart. A
//! sample renamed in the registry, a library id typed wrongly into the
//! catalogue, or a header written before a re-accessioning all leave a file
//! whose metadata contradicts itself.
//!
//! `mcheck` compares the sources and reports every disagreement as a
//! [`CheckResult`]. One failing check never stops the others.
//!
//! ## Features
//!
//! - **Identifier classification**: Sorts raw tokens into names, accession numbers and internal ids
//! - **Source comparison**: Per-kind differences between catalogue, header and registry
//! - **Registry lookup checks**: Missing and duplicated ids in a lookup
//! - **Cross-kind agreement**: Lookups by name, accession and id must find the same entities
//! - **Attribute counts**: Mandatory attributes with the expected number of values
//! - **Value checks**: Checksum, reference, run/lane in the file name, QC flags
//!
//! ## Example
//!
//! ```rust
//! use mcheck::checks::comparison::one_way_difference;
//! use mcheck::{EntityView, IdentifierKind};
//!
//! let catalogue = EntityView::from_tokens(["S1", "1571544"]);
//! let registry = EntityView::from_tokens(["S2", "1571544"]);
//!
//! let diff = one_way_difference(&catalogue, &registry);
//! assert_eq!(diff.len(), 1);
//! assert!(diff[&IdentifierKind::Name].contains("S1"));
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Identifier kinds, entity views, registry lookups and catalogue attributes
//! - [`checks`]: The checks, their uniform result model and the per-file pipeline
//! - [`parsing`]: Parsers for SAM/BAM/CRAM headers, rule tables and facts files
//! - [`cli`]: Command-line interface implementation
//! - [`utils`]: Checksum helpers

pub mod checks;
pub mod cli;
pub mod core;
pub mod parsing;
pub mod utils;

// Re-export commonly used types for convenience
pub use checks::error::CheckError;
pub use checks::pipeline::{check_subject, check_subjects, CheckConfig, RunSummary, Subject};
pub use checks::result::{CheckResult, Outcome, Severity};
pub use core::attributes::AttributeMap;
pub use core::entity::{EntityCategory, EntityRecord, FetchedEntitySet};
pub use core::identifier::{classify, IdentifierKind};
pub use core::view::{CategoryViews, EntityView};
