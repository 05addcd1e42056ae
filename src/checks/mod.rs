//! Consistency checks and the uniform result model.
//!
//! Every check is a pure function that turns fetched facts into one or more
//! [`CheckResult`](result::CheckResult)s:
//!
//! - [`comparison`]: differences between two sources' entity views
//! - [`fetch`]: missing and duplicated ids within one registry lookup
//! - [`cross_kind`]: agreement between lookups keyed on different identifier kinds
//! - [`frequency`]: mandatory attributes and their value counts
//! - [`values`]: checksum, reference, run/lane and flag attribute values
//! - [`pipeline`]: runs all of the above for a file and summarizes a run
//!
//! ## Failures vs. Errors
//!
//! A check that finds a problem returns a failed result and never stops the
//! others. A check that cannot run (e.g. no checksum was computed) returns a
//! result with `executed == false` and no outcome. Only configuration errors
//! and contradictory input are reported as [`CheckError`](error::CheckError).

pub mod comparison;
pub mod cross_kind;
pub mod error;
pub mod fetch;
pub mod frequency;
pub mod pipeline;
pub mod result;
pub mod values;
