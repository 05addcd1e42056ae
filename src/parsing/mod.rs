//! Parsers for the inputs handed over by the fetch collaborators.
//!
//! This module provides parsers for:
//!
//! - **SAM/BAM/CRAM headers**: Extract `@RG` read groups and the entity identifiers they carry
//! - **Attribute count rules**: The mandatory-attribute table used by the frequency check
//! - **Facts files**: JSON documents with catalogue attributes, registry lookups and headers per file
//!
//! ## Example
//!
//! ```rust
//! use mcheck::parsing::sam::{header_entity_views, parse_header_text};
//! use mcheck::core::entity::EntityCategory;
//!
//! let header = "@HD\tVN:1.6\n@RG\tID:1\tSM:EGAN00001218652\tLB:12345678\n";
//! let read_groups = parse_header_text(header).unwrap();
//! let views = header_entity_views(&read_groups);
//! assert!(views.get(EntityCategory::Samples).is_some());
//! ```
//!
//! ## Read Group Tags
//!
//! | Tag | Entity category |
//! |-----|-----------------|
//! | SM  | samples         |
//! | LB  | libraries       |
//! | DS  | studies         |

pub mod facts;
pub mod rules;
pub mod sam;
