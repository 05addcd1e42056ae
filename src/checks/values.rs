use std::collections::BTreeSet;

use crate::checks::result::{CheckResult, Severity};
use crate::core::attributes::AttributeMap;
use crate::utils::validation::{is_valid_md5, normalize_md5};

pub const CHECKSUM: &str = "md5_matches_checksum";
pub const REFERENCE: &str = "reference_matches_expected";
pub const FILENAME_RUN_LANE: &str = "filename_matches_run_lane";
pub const QC_FLAG: &str = "manual_qc_is_boolean";
pub const TARGET_FLAG: &str = "target_is_valid";

/// Run, lane and tag index encoded in a lanelet file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaneletName {
    pub id_run: String,
    pub lane: String,
    pub tag_index: Option<String>,
}

impl LaneletName {
    /// Parse names such as `5970_3#11.bam`, `5970_3.cram` or `10080_8#0_phix.bam`.
    /// Returns `None` for anything else.
    #[must_use]
    pub fn parse(file_name: &str) -> Option<Self> {
        let stem = file_name.split('.').next()?;
        let (id_run, rest) = stem.split_once('_')?;
        if !is_number(id_run) {
            return None;
        }

        let (lane_part, tag_part) = match rest.split_once('#') {
            Some((lane, tag)) => (lane, Some(tag)),
            None => (rest, None),
        };
        let lane = leading_digits(lane_part);
        if lane.is_empty() {
            return None;
        }
        // Without a tag the lane may only be followed by a `_suffix`
        let after_lane = &lane_part[lane.len()..];
        if !(after_lane.is_empty() || (tag_part.is_none() && after_lane.starts_with('_'))) {
            return None;
        }

        let tag_index = match tag_part {
            Some(tag) => {
                let digits = leading_digits(tag);
                if digits.is_empty() {
                    return None;
                }
                Some(digits.to_string())
            }
            None => None,
        };

        Some(Self {
            id_run: id_run.to_string(),
            lane: lane.to_string(),
            tag_index,
        })
    }
}

fn is_number(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn leading_digits(s: &str) -> &str {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    &s[..end]
}

/// The catalogue's `md5` attribute agrees with the checksum computed from
/// the file contents.
#[must_use]
pub fn check_checksum(attributes: &AttributeMap, computed: Option<&str>) -> CheckResult {
    let Some(computed) = computed else {
        return CheckResult::not_executed(CHECKSUM, "No checksum was computed for the file")
            .with_severity(Severity::Critical);
    };
    let Some(recorded) = attributes.get("md5") else {
        return CheckResult::not_executed(CHECKSUM, "No md5 attribute to compare against")
            .with_severity(Severity::Critical);
    };

    let result = CheckResult::new(CHECKSUM).with_severity(Severity::Critical);
    if let Some(invalid) = recorded.iter().find(|md5| !is_valid_md5(md5)) {
        return result.failed(format!("md5 attribute {invalid} is not a valid MD5 checksum"));
    }

    // Checksums are compared case-insensitively
    let computed = computed.to_lowercase();
    let recorded: BTreeSet<String> = recorded.iter().filter_map(|md5| normalize_md5(md5)).collect();
    if recorded.len() == 1 && recorded.contains(&computed) {
        result
    } else {
        let recorded: Vec<&str> = recorded.iter().map(String::as_str).collect();
        result.failed(format!(
            "md5 attribute [{}] does not match computed checksum {computed}",
            recorded.join(", ")
        ))
    }
}

/// Every `reference` attribute value mentions the expected reference.
#[must_use]
pub fn check_reference(attributes: &AttributeMap, expected: Option<&str>) -> CheckResult {
    let Some(expected) = expected else {
        return CheckResult::not_executed(REFERENCE, "No expected reference supplied");
    };
    let Some(references) = attributes.get("reference") else {
        return CheckResult::failure(REFERENCE, "No reference attribute found");
    };

    let wrong: Vec<&str> = references
        .iter()
        .map(String::as_str)
        .filter(|reference| !reference.contains(expected))
        .collect();
    if wrong.is_empty() {
        CheckResult::new(REFERENCE)
    } else {
        CheckResult::failure(
            REFERENCE,
            format!(
                "Reference [{}] does not match expected {expected}",
                wrong.join(", ")
            ),
        )
    }
}

/// Run, lane and tag index in the file name agree with the `id_run`,
/// `lane` and `tag_index` attributes. Attributes that are absent are not
/// compared.
#[must_use]
pub fn check_filename_run_lane(path: &str, attributes: &AttributeMap) -> CheckResult {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    let Some(lanelet) = LaneletName::parse(file_name) else {
        return CheckResult::not_executed(
            FILENAME_RUN_LANE,
            format!("File name {file_name} does not follow <run>_<lane>[#<tag>]"),
        );
    };

    let mut mismatches = Vec::new();
    let expected = [
        ("id_run", Some(lanelet.id_run.as_str())),
        ("lane", Some(lanelet.lane.as_str())),
        ("tag_index", lanelet.tag_index.as_deref()),
    ];
    for (attribute, from_name) in expected {
        let (Some(from_name), Some(values)) = (from_name, attributes.get(attribute)) else {
            continue;
        };
        if attributes.single(attribute) != Some(from_name) {
            let values: Vec<&str> = values.iter().map(String::as_str).collect();
            mismatches.push(format!(
                "{attribute} is [{}] but file name says {from_name}",
                values.join(", ")
            ));
        }
    }

    if mismatches.is_empty() {
        CheckResult::new(FILENAME_RUN_LANE)
    } else {
        CheckResult::failure(FILENAME_RUN_LANE, mismatches.join("; "))
    }
}

fn check_allowed_values(
    check_name: &str,
    attribute: &str,
    attributes: &AttributeMap,
    allowed: &[&str],
) -> CheckResult {
    let Some(values) = attributes.get(attribute) else {
        return CheckResult::not_executed(check_name, format!("No {attribute} attribute found"))
            .with_severity(Severity::Warning);
    };

    let invalid: Vec<&str> = values
        .iter()
        .map(String::as_str)
        .filter(|value| !allowed.contains(value))
        .collect();
    let result = CheckResult::new(check_name).with_severity(Severity::Warning);
    if invalid.is_empty() {
        result
    } else {
        result.failed(format!(
            "{attribute} has unexpected value(s) [{}], allowed: {}",
            invalid.join(", "),
            allowed.join(", ")
        ))
    }
}

/// `manual_qc` is either `0` or `1`.
#[must_use]
pub fn check_qc_flag(attributes: &AttributeMap) -> CheckResult {
    check_allowed_values(QC_FLAG, "manual_qc", attributes, &["0", "1"])
}

/// `target` is `0`, `1` or `library`.
#[must_use]
pub fn check_target_flag(attributes: &AttributeMap) -> CheckResult {
    check_allowed_values(TARGET_FLAG, "target", attributes, &["0", "1", "library"])
}
