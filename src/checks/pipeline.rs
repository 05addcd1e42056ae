use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::checks::comparison::check_sources_agree;
use crate::checks::cross_kind::check_agreement;
use crate::checks::error::CheckError;
use crate::checks::fetch::{check_all_queried_ids_found, check_no_duplicate_ids};
use crate::checks::frequency::{check_frequencies, AttributeCountRule};
use crate::checks::result::{
    group_by, tally_failures_by_check_name, CheckResult, GroupKey, GroupValue, Outcome, Severity,
};
use crate::checks::values;
use crate::core::attributes::AttributeMap;
use crate::core::entity::{EntityCategory, FetchedEntitySet};
use crate::core::view::{CategoryViews, EntityView};

pub const CATALOGUE_VS_REGISTRY: &str = "catalogue_vs_registry";
pub const HEADER_VS_REGISTRY: &str = "header_vs_registry";
pub const CATALOGUE_VS_HEADER: &str = "catalogue_vs_header";

/// Everything the three sources said about one file
#[derive(Debug, Clone, Default)]
pub struct Subject {
    /// Path of the file in the storage system
    pub path: String,

    /// Catalogue attributes of the file
    pub attributes: AttributeMap,

    /// Entity identifiers found in the file header, if the header was read
    pub header: Option<CategoryViews>,

    /// Registry lookups for the entities the file refers to
    pub registry: Vec<FetchedEntitySet>,

    /// MD5 of the file contents, if computed
    pub checksum: Option<String>,
}

/// Settings shared by every subject in a run
#[derive(Debug, Clone)]
pub struct CheckConfig {
    pub rules: Vec<AttributeCountRule>,

    /// Substring every `reference` attribute must contain
    pub expected_reference: Option<String>,

    /// Entity categories compared between sources
    pub categories: BTreeSet<EntityCategory>,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            expected_reference: None,
            categories: BTreeSet::from(EntityCategory::ALL),
        }
    }
}

/// All check results for one subject
#[derive(Debug, Clone, Serialize)]
pub struct SubjectReport {
    pub subject: String,
    pub results: Vec<CheckResult>,
}

/// How many of a subject's checks ran, did not run, and failed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResultCounts {
    pub executed: usize,
    pub not_executed: usize,
    pub failed: usize,
}

impl SubjectReport {
    #[must_use]
    pub fn counts(&self) -> ResultCounts {
        let by_executed = group_by(&self.results, GroupKey::Executed);
        let by_outcome = group_by(&self.results, GroupKey::Outcome);
        let size = |groups: &BTreeMap<GroupValue, Vec<&CheckResult>>, value: GroupValue| {
            groups.get(&value).map_or(0, Vec::len)
        };

        ResultCounts {
            executed: size(&by_executed, GroupValue::Executed(true)),
            not_executed: size(&by_executed, GroupValue::Executed(false)),
            failed: size(&by_outcome, GroupValue::Outcome(Some(Outcome::Failure))),
        }
    }

    pub fn failures(&self) -> impl Iterator<Item = &CheckResult> {
        self.results.iter().filter(|r| r.is_failure())
    }

    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }
}

/// Run every check on one subject.
///
/// # Errors
///
/// Returns `CheckError::ContradictoryFetch` if the registry lookups for a
/// category contradict themselves.
pub fn check_subject(subject: &Subject, config: &CheckConfig) -> Result<SubjectReport, CheckError> {
    let attributes = &subject.attributes;

    let mut results = check_frequencies(attributes.as_map(), &config.rules);
    results.push(values::check_checksum(attributes, subject.checksum.as_deref()));
    results.push(values::check_reference(
        attributes,
        config.expected_reference.as_deref(),
    ));
    results.push(values::check_filename_run_lane(&subject.path, attributes));
    results.push(values::check_qc_flag(attributes));
    results.push(values::check_target_flag(attributes));

    for fetched in &subject.registry {
        results.push(check_all_queried_ids_found(fetched));
        results.push(check_no_duplicate_ids(fetched));
    }

    let mut registry_views = CategoryViews::new();
    for category in EntityCategory::ALL {
        let fetched: Vec<&FetchedEntitySet> = subject
            .registry
            .iter()
            .filter(|f| f.category == category)
            .collect();
        if fetched.is_empty() {
            continue;
        }
        results.push(check_agreement(fetched.iter().copied())?);
        registry_views.insert(category, EntityView::from_fetched(fetched));
    }

    let catalogue_views = attributes.entity_views();
    let empty = CategoryViews::new();
    let header_views = subject.header.as_ref().unwrap_or(&empty);

    results.push(
        check_sources_agree(
            CATALOGUE_VS_REGISTRY,
            ("catalogue", &catalogue_views),
            ("registry", &registry_views),
            &config.categories,
        )
        .with_severity(Severity::Critical),
    );
    results.push(check_sources_agree(
        HEADER_VS_REGISTRY,
        ("header", header_views),
        ("registry", &registry_views),
        &config.categories,
    ));
    results.push(check_sources_agree(
        CATALOGUE_VS_HEADER,
        ("catalogue", &catalogue_views),
        ("header", header_views),
        &config.categories,
    ));

    let report = SubjectReport {
        subject: subject.path.clone(),
        results,
    };
    debug!(
        subject = %report.subject,
        checks = report.results.len(),
        failures = report.failures().count(),
        "Checked subject"
    );
    Ok(report)
}

/// Run every check on each subject in turn.
///
/// # Errors
///
/// Stops at the first subject whose registry lookups contradict themselves.
pub fn check_subjects(
    subjects: &[Subject],
    config: &CheckConfig,
) -> Result<Vec<SubjectReport>, CheckError> {
    subjects
        .iter()
        .map(|subject| check_subject(subject, config))
        .collect()
}

/// Totals across all subjects of a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub subjects: usize,
    pub executed: usize,
    pub not_executed: usize,
    pub failed: usize,
    pub failed_subjects: usize,

    /// Failed results per check name
    pub failure_tally: BTreeMap<String, usize>,
}

impl RunSummary {
    #[must_use]
    pub fn from_reports(reports: &[SubjectReport]) -> Self {
        let mut executed = 0;
        let mut not_executed = 0;
        let mut failed = 0;
        for report in reports {
            let counts = report.counts();
            executed += counts.executed;
            not_executed += counts.not_executed;
            failed += counts.failed;
        }

        Self {
            subjects: reports.len(),
            executed,
            not_executed,
            failed,
            failed_subjects: reports.iter().filter(|r| r.has_failures()).count(),
            failure_tally: tally_failures_by_check_name(
                reports
                    .iter()
                    .map(|r| (r.subject.as_str(), r.results.as_slice())),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::EntityRecord;
    use crate::core::identifier::IdentifierKind;

    fn consistent_subject() -> Subject {
        let attributes = AttributeMap::new()
            .with("md5", "6aef897c3d6ff0c78aff06ac189178dd")
            .with("sample", "S1")
            .with("sample_id", "1571544")
            .with("id_run", "5970")
            .with("lane", "3")
            .with("tag_index", "11");

        let registry = vec![
            FetchedEntitySet::new(EntityCategory::Samples, IdentifierKind::Name, ["S1"])
                .with_entities(vec![EntityRecord::new()
                    .with_name("S1")
                    .with_internal_id(1_571_544)]),
            FetchedEntitySet::new(EntityCategory::Samples, IdentifierKind::InternalId, [1_571_544])
                .with_entities(vec![EntityRecord::new()
                    .with_name("S1")
                    .with_internal_id(1_571_544)]),
        ];

        Subject {
            path: "/seq/5970/5970_3#11.bam".to_string(),
            attributes,
            header: Some(
                CategoryViews::new().with(EntityCategory::Samples, EntityView::from_tokens(["S1"])),
            ),
            registry,
            checksum: Some("6aef897c3d6ff0c78aff06ac189178dd".to_string()),
        }
    }

    fn result<'a>(report: &'a SubjectReport, name: &str) -> &'a CheckResult {
        report
            .results
            .iter()
            .find(|r| r.check_name() == name)
            .unwrap()
    }

    #[test]
    fn test_consistent_subject_has_no_failures() {
        let config = CheckConfig {
            rules: vec![AttributeCountRule::new("md5", 1)],
            ..CheckConfig::default()
        };
        let report = check_subject(&consistent_subject(), &config).unwrap();
        assert!(!report.has_failures(), "{:?}", report.failures().collect::<Vec<_>>());
        assert_eq!(
            result(&report, CATALOGUE_VS_REGISTRY).outcome(),
            Some(Outcome::Success)
        );
    }

    #[test]
    fn test_every_result_holds_executed_invariant() {
        let report = check_subject(&consistent_subject(), &CheckConfig::default()).unwrap();
        assert!(report
            .results
            .iter()
            .all(|r| r.executed() == r.outcome().is_some()));
        // No expected reference configured
        assert!(!result(&report, values::REFERENCE).executed());
    }

    #[test]
    fn test_header_mismatch_detected() {
        let mut subject = consistent_subject();
        subject.header = Some(
            CategoryViews::new().with(EntityCategory::Samples, EntityView::from_tokens(["S2"])),
        );
        let report = check_subject(&subject, &CheckConfig::default()).unwrap();
        assert!(result(&report, HEADER_VS_REGISTRY).is_failure());
        assert!(result(&report, CATALOGUE_VS_HEADER).is_failure());
        assert!(!result(&report, CATALOGUE_VS_REGISTRY).is_failure());
    }

    #[test]
    fn test_missing_header_not_executed() {
        let mut subject = consistent_subject();
        subject.header = None;
        let report = check_subject(&subject, &CheckConfig::default()).unwrap();
        assert!(!result(&report, HEADER_VS_REGISTRY).executed());
        assert!(!result(&report, CATALOGUE_VS_HEADER).executed());
    }

    #[test]
    fn test_summary_tally() {
        let mut bad = consistent_subject();
        bad.path = "/seq/5970/5970_4#11.bam".to_string();
        bad.checksum = Some("00000000000000000000000000000000".to_string());

        let config = CheckConfig {
            rules: vec![AttributeCountRule::new("reference", 1)],
            ..CheckConfig::default()
        };
        let reports = check_subjects(&[consistent_subject(), bad], &config).unwrap();
        let summary = RunSummary::from_reports(&reports);

        assert_eq!(summary.subjects, 2);
        assert_eq!(summary.failed_subjects, 2);
        assert_eq!(summary.failure_tally["attribute_count"], 2);
        assert_eq!(summary.failure_tally[values::CHECKSUM], 1);
        assert_eq!(summary.failure_tally[values::FILENAME_RUN_LANE], 1);
        assert_eq!(summary.failed, 4);
        assert_eq!(
            summary.executed + summary.not_executed,
            reports.iter().map(|r| r.results.len()).sum::<usize>()
        );
    }

    #[test]
    fn test_report_counts() {
        let report = SubjectReport {
            subject: "f1".to_string(),
            results: vec![
                CheckResult::new("a"),
                CheckResult::failure("b", "bad"),
                CheckResult::failure("c", "bad"),
                CheckResult::not_executed("d", "no input"),
            ],
        };
        assert_eq!(
            report.counts(),
            ResultCounts {
                executed: 3,
                not_executed: 1,
                failed: 2,
            }
        );

        let summary = RunSummary::from_reports(&[report.clone(), report]);
        assert_eq!(summary.executed, 6);
        assert_eq!(summary.not_executed, 2);
        assert_eq!(summary.failed, 4);
        assert_eq!(summary.failed_subjects, 2);
    }
}
