//! End-to-end reconciliation tests
//!
//! These exercise the public API the way a caller assembling facts from the
//! catalogue, the file header and the registry would.

use mcheck::checks::comparison::one_way_difference;
use mcheck::checks::cross_kind::check_agreement;
use mcheck::checks::fetch::check_all_queried_ids_found;
use mcheck::checks::frequency::{check_frequencies, AttributeCountRule};
use mcheck::checks::pipeline::{CATALOGUE_VS_REGISTRY, HEADER_VS_REGISTRY};
use mcheck::checks::result::tally_failures_by_check_name;
use mcheck::parsing::facts::parse_facts_text;
use mcheck::{
    check_subject, check_subjects, classify, AttributeMap, CheckConfig, CheckError, CheckResult,
    EntityCategory, EntityRecord, EntityView, FetchedEntitySet, IdentifierKind, Outcome,
    RunSummary,
};
use std::collections::{BTreeMap, BTreeSet};

fn set(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

#[test]
fn test_classify_known_identifiers() {
    assert_eq!(classify("EGAN00001218652"), IdentifierKind::AccessionNumber);
    assert_eq!(classify("1571544"), IdentifierKind::InternalId);
    assert_eq!(classify("SC_WES_INT5899561"), IdentifierKind::Name);
}

#[test]
fn test_classify_is_deterministic() {
    let tokens = [
        "ERS123", "SRS9", "DRS0001", "EGAS00001000001", "0", "42", "S1", "N/A", "egan1", "12a",
    ];
    for token in tokens {
        let first = classify(token);
        for _ in 0..3 {
            assert_eq!(classify(token), first, "classification of {token} changed");
        }
        assert!(IdentifierKind::ALL.contains(&first));
    }
}

#[test]
fn test_one_way_difference_reports_name_mismatch() {
    let a = EntityView::default().with_ids(IdentifierKind::Name, ["S1"]);
    let b = EntityView::default().with_ids(IdentifierKind::Name, ["S9"]);

    let diff = one_way_difference(&a, &b);
    assert_eq!(diff, BTreeMap::from([(IdentifierKind::Name, set(&["S1"]))]));
}

#[test]
fn test_one_way_difference_ignores_kinds_absent_on_other_side() {
    let a = EntityView::default()
        .with_ids(IdentifierKind::Name, ["S1"])
        .with_ids(IdentifierKind::AccessionNumber, ["Acc1"]);
    let b = EntityView::default().with_ids(IdentifierKind::Name, ["S1"]);

    assert!(one_way_difference(&a, &b).is_empty());
}

#[test]
fn test_one_way_difference_with_self_is_empty() {
    let views = [
        EntityView::default(),
        EntityView::from_tokens(["S1", "S2", "1571544", "EGAN00001218652"]),
        EntityView::from_tokens(["1", "2", "3"]),
    ];
    for view in &views {
        assert!(one_way_difference(view, view).is_empty());
    }
}

#[test]
fn test_one_way_difference_is_not_symmetric() {
    let a = EntityView::from_tokens(["S1", "S2"]);
    let b = EntityView::from_tokens(["S1"]);

    assert_eq!(one_way_difference(&a, &b)[&IdentifierKind::Name], set(&["S2"]));
    assert!(one_way_difference(&b, &a).is_empty());
}

#[test]
fn test_missing_queried_id_reported() {
    let fetched = FetchedEntitySet::new(EntityCategory::Samples, IdentifierKind::InternalId, ["1", "2"])
        .with_entities(vec![EntityRecord::new().with_internal_id(1)]);

    let result = check_all_queried_ids_found(&fetched);
    assert_eq!(result.outcome(), Some(Outcome::Failure));
    assert!(result.message().unwrap().ends_with(": 2"));
}

#[test]
fn test_single_lookup_always_agrees() {
    let lookups = [
        FetchedEntitySet::new(EntityCategory::Samples, IdentifierKind::Name, ["S1"]),
        FetchedEntitySet::new(EntityCategory::Libraries, IdentifierKind::InternalId, [7, 8])
            .with_entities(vec![
                EntityRecord::new().with_internal_id(7),
                EntityRecord::new().with_internal_id(7),
            ]),
    ];
    for lookup in &lookups {
        let result = check_agreement([lookup]).unwrap();
        assert_eq!(result.outcome(), Some(Outcome::Success));
    }
}

#[test]
fn test_frequency_reports_only_missing_attribute() {
    let observed = BTreeMap::from([("md5".to_string(), set(&["abc"]))]);
    let rules = [
        AttributeCountRule::new("md5", 1),
        AttributeCountRule::new("reference", 1),
    ];

    let results = check_frequencies(&observed, &rules);
    assert_eq!(results.len(), 1);
    assert!(results[0].is_failure());
    assert_eq!(results[0].message(), Some("Missing attribute reference"));
}

#[test]
fn test_frequency_success_is_silent() {
    let observed = BTreeMap::from([
        ("md5".to_string(), set(&["abc"])),
        ("lane".to_string(), set(&["3"])),
        ("sample".to_string(), set(&["S1", "S2"])),
    ]);
    let rules = [
        AttributeCountRule::new("md5", 1),
        AttributeCountRule::new("lane", 1),
        AttributeCountRule::new("sample", 2),
    ];
    assert!(check_frequencies(&observed, &rules).is_empty());
}

#[test]
fn test_tally_failures_by_check_name() {
    let f1 = vec![
        CheckResult::failure("check_md5", "mismatch"),
        CheckResult::failure("check_ref", "wrong reference"),
    ];
    let f2 = vec![CheckResult::failure("check_md5", "mismatch")];

    let tally = tally_failures_by_check_name([("f1", f1.as_slice()), ("f2", f2.as_slice())]);
    assert_eq!(
        tally,
        BTreeMap::from([("check_md5".to_string(), 2), ("check_ref".to_string(), 1)])
    );
}

const FACTS: &str = r#"{
    "subjects": [
        {
            "path": "/seq/5970/5970_3#11.bam",
            "attributes": {
                "md5": ["6aef897c3d6ff0c78aff06ac189178dd"],
                "id_run": [5970],
                "lane": [3],
                "tag_index": [11],
                "sample": ["SC_WES_INT5899561"],
                "sample_accession_number": ["EGAN00001218652"],
                "library_id": [12345678]
            },
            "registry": [
                {
                    "category": "samples",
                    "query_kind": "name",
                    "query_ids": ["SC_WES_INT5899561"],
                    "entities": [{"name": "SC_WES_INT5899561", "accession_number": "EGAN00001218652", "internal_id": 1571544}]
                },
                {
                    "category": "samples",
                    "query_kind": "accession_number",
                    "query_ids": ["EGAN00001218652"],
                    "entities": [{"name": "SC_WES_INT5899561", "accession_number": "EGAN00001218652", "internal_id": 1571544}]
                },
                {
                    "category": "libraries",
                    "query_kind": "internal_id",
                    "query_ids": [12345678],
                    "entities": [{"name": "LIB1", "internal_id": 12345678}]
                }
            ],
            "header": "@HD\tVN:1.6\n@RG\tID:1#11\tSM:EGAN00001218652\tLB:12345678\n",
            "md5": "6aef897c3d6ff0c78aff06ac189178dd"
        },
        {
            "path": "/seq/5970/5970_4#1.bam",
            "attributes": {
                "sample": ["S_RENAMED"],
                "sample_id": [1571545],
                "lane": [3]
            },
            "registry": [
                {
                    "category": "samples",
                    "query_kind": "name",
                    "query_ids": ["S_RENAMED"],
                    "entities": []
                },
                {
                    "category": "samples",
                    "query_kind": "internal_id",
                    "query_ids": [1571545],
                    "entities": [{"name": "S_ORIGINAL", "internal_id": 1571545}]
                }
            ]
        }
    ]
}"#;

fn subjects() -> Vec<mcheck::Subject> {
    parse_facts_text(FACTS)
        .unwrap()
        .subjects
        .into_iter()
        .map(|facts| facts.into_subject().unwrap())
        .collect()
}

fn find<'a>(results: &'a [CheckResult], name: &str) -> &'a CheckResult {
    results
        .iter()
        .find(|r| r.check_name() == name)
        .unwrap_or_else(|| panic!("no result for {name}"))
}

#[test]
fn test_consistent_file_passes_all_executed_checks() {
    let config = CheckConfig {
        rules: vec![AttributeCountRule::new("md5", 1)],
        ..CheckConfig::default()
    };
    let report = check_subject(&subjects()[0], &config).unwrap();

    let failures: Vec<&CheckResult> = report.failures().collect();
    assert!(failures.is_empty(), "unexpected failures: {failures:?}");
    assert_eq!(
        find(&report.results, HEADER_VS_REGISTRY).outcome(),
        Some(Outcome::Success)
    );
}

#[test]
fn test_inconsistent_file_reports_failures_without_stopping() {
    let config = CheckConfig {
        rules: vec![AttributeCountRule::new("md5", 1)],
        ..CheckConfig::default()
    };
    let reports = check_subjects(&subjects(), &config).unwrap();
    assert_eq!(reports.len(), 2);

    let bad = &reports[1];
    // Registry only knows the sample under its old name
    assert!(find(&bad.results, CATALOGUE_VS_REGISTRY).is_failure());
    assert!(find(&bad.results, "registry_all_ids_found").is_failure());
    // No header and no checksum: those checks cannot run
    assert!(!find(&bad.results, HEADER_VS_REGISTRY).executed());
    assert!(!find(&bad.results, "md5_matches_checksum").executed());

    let summary = RunSummary::from_reports(&reports);
    assert_eq!(summary.failed_subjects, 1);
    assert!(summary.failure_tally.contains_key("attribute_count"));
    assert!(summary.failure_tally.contains_key("filename_matches_run_lane"));
}

#[test]
fn test_every_result_holds_executed_invariant() {
    let config = CheckConfig {
        rules: mcheck::parsing::rules::load_embedded().unwrap(),
        expected_reference: Some("GRCh38".to_string()),
        ..CheckConfig::default()
    };
    for report in check_subjects(&subjects(), &config).unwrap() {
        for result in &report.results {
            assert_eq!(
                result.executed(),
                result.outcome().is_some(),
                "{} broke the executed/outcome invariant",
                result.check_name()
            );
        }
    }
}

#[test]
fn test_placeholder_attributes_are_not_compared() {
    let attributes = AttributeMap::new()
        .with("sample", "N/A")
        .with("sample_id", "1571544");
    let views = attributes.entity_views();

    let samples = views.get(EntityCategory::Samples).unwrap();
    assert!(samples.get(IdentifierKind::Name).is_none());
    assert_eq!(samples.get(IdentifierKind::InternalId), Some(&set(&["1571544"])));
}

#[test]
fn test_malformed_rule_is_an_error() {
    let err = mcheck::parsing::rules::parse_rules_text("md5 >= 1");
    assert_eq!(err, Err(CheckError::UnknownOperator(">=".to_string())));
}
