//! Core data model for metadata reconciliation.
//!
//! This module provides the types every check consumes:
//!
//! - [`IdentifierKind`](identifier::IdentifierKind): name, accession number or internal id
//! - [`EntityView`](view::EntityView): what one source believes about one entity category
//! - [`FetchedEntitySet`](entity::FetchedEntitySet): one registry lookup and what it returned
//! - [`AttributeMap`](attributes::AttributeMap): the storage catalogue's attributes for a file
//!
//! ## Identifier Classification
//!
//! Sources rarely say which kind of identifier they hold, so raw tokens are
//! classified by shape:
//!
//! | Token               | Kind            |
//! |---------------------|-----------------|
//! | `EGAN00001218652`   | AccessionNumber |
//! | `1571544`           | InternalId      |
//! | `SC_WES_INT5899561` | Name            |
//!
//! Nothing in this module performs I/O.

pub mod attributes;
pub mod entity;
pub mod identifier;
pub mod view;
