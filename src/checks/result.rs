use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How much a failing check matters
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    #[default]
    Important,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Critical => write!(f, "critical"),
            Self::Important => write!(f, "important"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Success,
    Failure,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Failure => write!(f, "failure"),
        }
    }
}

/// The result of one check on one subject.
///
/// `outcome` is `None` exactly when the check was not executed. Fields are
/// private so that only the constructors below can create results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    check_name: String,
    severity: Severity,
    executed: bool,
    outcome: Option<Outcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl CheckResult {
    /// An executed, successful check with `Important` severity
    pub fn new(check_name: impl Into<String>) -> Self {
        Self {
            check_name: check_name.into(),
            severity: Severity::default(),
            executed: true,
            outcome: Some(Outcome::Success),
            message: None,
        }
    }

    /// An executed check that found a problem
    pub fn failure(check_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(check_name).failed(message)
    }

    /// A check that could not run, e.g. because a required input was absent
    pub fn not_executed(check_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            check_name: check_name.into(),
            severity: Severity::default(),
            executed: false,
            outcome: None,
            message: Some(reason.into()),
        }
    }

    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Turn an executed result into a failure. Results that were not
    /// executed stay that way.
    #[must_use]
    pub fn failed(mut self, message: impl Into<String>) -> Self {
        if self.executed {
            self.outcome = Some(Outcome::Failure);
        }
        self.message = Some(message.into());
        self
    }

    #[must_use]
    pub fn check_name(&self) -> &str {
        &self.check_name
    }

    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    #[must_use]
    pub fn executed(&self) -> bool {
        self.executed
    }

    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.outcome == Some(Outcome::Failure)
    }
}

/// Field to partition results on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKey {
    Executed,
    Severity,
    Outcome,
}

/// Value of the grouping field for one partition
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GroupValue {
    Executed(bool),
    Severity(Severity),
    Outcome(Option<Outcome>),
}

impl std::fmt::Display for GroupValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Executed(executed) => write!(f, "{executed}"),
            Self::Severity(severity) => write!(f, "{severity}"),
            Self::Outcome(Some(outcome)) => write!(f, "{outcome}"),
            Self::Outcome(None) => write!(f, "not_executed"),
        }
    }
}

/// Partition results by one of their fields. Input order is kept within
/// each partition.
#[must_use]
pub fn group_by(results: &[CheckResult], key: GroupKey) -> BTreeMap<GroupValue, Vec<&CheckResult>> {
    let mut groups: BTreeMap<GroupValue, Vec<&CheckResult>> = BTreeMap::new();
    for result in results {
        let value = match key {
            GroupKey::Executed => GroupValue::Executed(result.executed),
            GroupKey::Severity => GroupValue::Severity(result.severity),
            GroupKey::Outcome => GroupValue::Outcome(result.outcome),
        };
        groups.entry(value).or_default().push(result);
    }
    groups
}

/// Count failed results per check name across all subjects. Checks that
/// never failed are absent.
#[must_use]
pub fn tally_failures_by_check_name<'a, I, S>(results_per_subject: I) -> BTreeMap<String, usize>
where
    I: IntoIterator<Item = (S, &'a [CheckResult])>,
{
    let mut tally: BTreeMap<String, usize> = BTreeMap::new();
    for (_, results) in results_per_subject {
        for result in results.iter().filter(|r| r.is_failure()) {
            *tally.entry(result.check_name.clone()).or_default() += 1;
        }
    }
    tally
}
