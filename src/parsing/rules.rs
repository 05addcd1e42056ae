use std::path::Path;

use crate::checks::error::CheckError;
use crate::checks::frequency::{AttributeCountRule, ComparisonOperator};
use crate::parsing::sam::ParseError;

/// Rule table compiled into the binary
const EMBEDDED_RULES: &str = include_str!("../../config/attribute_counts.txt");

/// Load the embedded default rule table
///
/// # Errors
///
/// Returns `CheckError` if the embedded table is malformed.
pub fn load_embedded() -> Result<Vec<AttributeCountRule>, CheckError> {
    parse_rules_text(EMBEDDED_RULES)
}

/// Load a rule table from a file
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or
/// `ParseError::Rules` if a rule is malformed.
pub fn parse_rules_file(path: &Path) -> Result<Vec<AttributeCountRule>, ParseError> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse_rules_text(&content)?)
}

/// Parse rules, one per line: `attribute count` or `attribute op count`
/// where `op` is `=`, `<` or `>`.
///
/// # Errors
///
/// Returns `CheckError::UnknownOperator` for an unsupported operator and
/// `CheckError::MalformedRule` for any other invalid line.
pub fn parse_rules_text(text: &str) -> Result<Vec<AttributeCountRule>, CheckError> {
    let mut rules = Vec::new();

    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        // Line numbers in errors are 1-based for user friendliness
        let line_num = i + 1;
        let fields: Vec<&str> = line.split_whitespace().collect();

        let (attribute, operator, count) = match fields.as_slice() {
            [attribute, count] => (*attribute, ComparisonOperator::Equal, *count),
            [attribute, operator, count] => (*attribute, operator.parse::<ComparisonOperator>()?, *count),
            _ => {
                return Err(CheckError::MalformedRule {
                    line: line_num,
                    reason: format!("expected 2 or 3 fields, found {}", fields.len()),
                })
            }
        };

        let expected_count: usize = count.parse().map_err(|_| CheckError::MalformedRule {
            line: line_num,
            reason: format!("invalid count '{count}'"),
        })?;

        rules.push(AttributeCountRule::new(attribute, expected_count).with_operator(operator));
    }

    Ok(rules)
}
