use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use clap::Args;
use tracing::{info, warn};

use crate::checks::frequency::AttributeCountRule;
use crate::checks::pipeline::{check_subjects, CheckConfig, RunSummary, Subject, SubjectReport};
use crate::checks::result::CheckResult;
use crate::cli::OutputFormat;
use crate::core::entity::EntityCategory;
use crate::parsing;
use crate::parsing::sam::{header_entity_views, parse_header_text, read_header_file};
use crate::utils::validation::compute_file_md5;

#[derive(Args)]
pub struct CheckArgs {
    /// JSON facts file with catalogue attributes, registry lookups and headers per file
    #[arg(required = true)]
    pub facts: PathBuf,

    /// Attribute count rules file (defaults to the built-in table)
    #[arg(long)]
    pub rules: Option<PathBuf>,

    /// Substring every reference attribute must contain (e.g. GRCh38)
    #[arg(long)]
    pub reference: Option<String>,

    /// Read headers and compute checksums from the files themselves when
    /// the facts file does not provide them
    #[arg(long)]
    pub local_files: bool,

    /// Entity categories to compare between sources
    #[arg(long, value_enum, value_delimiter = ',', default_values_t = [CategoryArg::Samples, CategoryArg::Libraries, CategoryArg::Studies])]
    pub categories: Vec<CategoryArg>,

    /// Also list successful checks in text output
    #[arg(long)]
    pub show_all: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum CategoryArg {
    Samples,
    Libraries,
    Studies,
}

impl From<CategoryArg> for EntityCategory {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Samples => EntityCategory::Samples,
            CategoryArg::Libraries => EntityCategory::Libraries,
            CategoryArg::Studies => EntityCategory::Studies,
        }
    }
}

/// Execute the check subcommand.
///
/// Returns `true` if any executed check failed.
///
/// # Errors
///
/// Returns an error if the facts or rules cannot be loaded, or if the
/// registry lookups of a subject contradict themselves.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: CheckArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<bool> {
    let rules = load_rules(args.rules.as_deref())?;
    if verbose {
        eprintln!("Loaded {} attribute count rules", rules.len());
    }

    let facts = parsing::facts::parse_facts_file(&args.facts)?;
    info!(subjects = facts.subjects.len(), "Loaded facts");

    let mut subjects = Vec::with_capacity(facts.subjects.len());
    for subject_facts in facts.subjects {
        let mut subject = subject_facts.into_subject()?;
        if args.local_files {
            fill_from_local_file(&mut subject);
        }
        subjects.push(subject);
    }

    let config = CheckConfig {
        rules,
        expected_reference: args.reference.clone(),
        categories: args.categories.iter().copied().map(EntityCategory::from).collect::<BTreeSet<_>>(),
    };

    let reports = check_subjects(&subjects, &config)?;
    let summary = RunSummary::from_reports(&reports);

    match format {
        OutputFormat::Text => print_text_results(&reports, &summary, args.show_all || verbose),
        OutputFormat::Json => print_json_results(&reports, &summary)?,
        OutputFormat::Tsv => print_tsv_results(&reports),
    }

    Ok(summary.failed > 0)
}

fn load_rules(path: Option<&Path>) -> anyhow::Result<Vec<AttributeCountRule>> {
    match path {
        Some(path) => Ok(parsing::rules::parse_rules_file(path)?),
        None => Ok(parsing::rules::load_embedded()?),
    }
}

/// Read the header and checksum from the file on disk where the facts
/// lack them. Unreadable files leave the corresponding checks unexecuted.
fn fill_from_local_file(subject: &mut Subject) {
    let path = Path::new(&subject.path);

    if subject.header.is_none() {
        match read_header_file(path).and_then(|text| parse_header_text(&text)) {
            Ok(read_groups) => subject.header = Some(header_entity_views(&read_groups)),
            Err(e) => warn!(path = %subject.path, error = %e, "Could not read header"),
        }
    }

    if subject.checksum.is_none() {
        match compute_file_md5(path) {
            Ok(md5) => subject.checksum = Some(md5),
            Err(e) => warn!(path = %subject.path, error = %e, "Could not compute checksum"),
        }
    }
}

fn status_label(result: &CheckResult) -> &'static str {
    if !result.executed() {
        "SKIP"
    } else if result.is_failure() {
        "FAIL"
    } else {
        "ok"
    }
}

fn print_text_results(reports: &[SubjectReport], summary: &RunSummary, show_all: bool) {
    for report in reports {
        let counts = report.counts();
        println!(
            "{} ({} checks, {} failed, {} not run)",
            report.subject,
            report.results.len(),
            counts.failed,
            counts.not_executed,
        );

        for result in &report.results {
            if !show_all && result.executed() && !result.is_failure() {
                continue;
            }
            println!(
                "  {:<4}  [{:<9}] {}{}",
                status_label(result),
                result.severity().to_string(),
                result.check_name(),
                result.message().map(|m| format!(": {m}")).unwrap_or_default()
            );
        }
    }

    println!("\nSummary");
    println!("{}", "=".repeat(60));
    println!("  Subjects: {}", summary.subjects);
    println!("  Subjects with failures: {}", summary.failed_subjects);
    println!("  Checks executed: {}", summary.executed);
    println!("  Checks not run: {}", summary.not_executed);
    println!("  Checks failed: {}", summary.failed);

    if !summary.failure_tally.is_empty() {
        println!("\nFailures by check:");
        for (check_name, count) in &summary.failure_tally {
            println!("  {check_name}: {count}");
        }
    }
}

fn print_json_results(reports: &[SubjectReport], summary: &RunSummary) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "checked_at": chrono::Utc::now().to_rfc3339(),
        "summary": summary,
        "subjects": reports,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_results(reports: &[SubjectReport]) {
    println!("subject\tcheck_name\tseverity\texecuted\toutcome\tmessage");
    for report in reports {
        for result in &report.results {
            println!(
                "{}\t{}\t{}\t{}\t{}\t{}",
                report.subject,
                result.check_name(),
                result.severity(),
                result.executed(),
                result
                    .outcome()
                    .map_or_else(|| "NA".to_string(), |o| o.to_string()),
                result.message().unwrap_or("").replace('\t', " "),
            );
        }
    }
}
