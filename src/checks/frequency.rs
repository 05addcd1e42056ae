use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use crate::checks::error::CheckError;
use crate::checks::result::{CheckResult, Severity};

pub const ATTRIBUTE_COUNT: &str = "attribute_count";

/// How an observed value count is compared with the expected count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ComparisonOperator {
    #[default]
    #[serde(rename = "=")]
    Equal,
    #[serde(rename = "<")]
    Less,
    #[serde(rename = ">")]
    Greater,
}

impl ComparisonOperator {
    /// Apply `actual <op> expected`
    #[must_use]
    pub fn holds(self, actual: usize, expected: usize) -> bool {
        match self {
            Self::Equal => actual == expected,
            Self::Less => actual < expected,
            Self::Greater => actual > expected,
        }
    }
}

impl FromStr for ComparisonOperator {
    type Err = CheckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "=" | "==" => Ok(Self::Equal),
            "<" => Ok(Self::Less),
            ">" => Ok(Self::Greater),
            other => Err(CheckError::UnknownOperator(other.to_string())),
        }
    }
}

impl std::fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Equal => write!(f, "="),
            Self::Less => write!(f, "<"),
            Self::Greater => write!(f, ">"),
        }
    }
}

/// A mandatory attribute and how many distinct values it must have
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeCountRule {
    pub attribute: String,
    pub expected_count: usize,
    #[serde(default)]
    pub operator: ComparisonOperator,
}

impl AttributeCountRule {
    pub fn new(attribute: impl Into<String>, expected_count: usize) -> Self {
        Self {
            attribute: attribute.into(),
            expected_count,
            operator: ComparisonOperator::Equal,
        }
    }

    #[must_use]
    pub fn with_operator(mut self, operator: ComparisonOperator) -> Self {
        self.operator = operator;
        self
    }
}

/// Check observed attributes against the rule table.
///
/// Only failures are returned: one result per rule whose attribute is
/// missing or has the wrong number of values. Attributes without a rule
/// are ignored.
#[must_use]
pub fn check_frequencies(
    observed: &BTreeMap<String, BTreeSet<String>>,
    rules: &[AttributeCountRule],
) -> Vec<CheckResult> {
    rules
        .iter()
        .filter_map(|rule| match observed.get(&rule.attribute) {
            None => Some(
                CheckResult::failure(
                    ATTRIBUTE_COUNT,
                    format!("Missing attribute {}", rule.attribute),
                )
                .with_severity(Severity::Critical),
            ),
            Some(values) if !rule.operator.holds(values.len(), rule.expected_count) => Some(
                CheckResult::failure(
                    ATTRIBUTE_COUNT,
                    format!(
                        "Attribute {} has {} values, expected {} {}",
                        rule.attribute,
                        values.len(),
                        rule.operator,
                        rule.expected_count
                    ),
                )
                .with_severity(Severity::Critical),
            ),
            Some(_) => None,
        })
        .collect()
}
