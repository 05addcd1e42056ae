use std::path::PathBuf;

use clap::Args;

use crate::cli::OutputFormat;
use crate::parsing;

#[derive(Args)]
pub struct RulesArgs {
    /// Attribute count rules file (defaults to the built-in table)
    #[arg(long)]
    pub rules: Option<PathBuf>,
}

/// Print the rule table in effect
///
/// # Errors
///
/// Returns an error if the rules file cannot be read or is malformed.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: RulesArgs, format: OutputFormat) -> anyhow::Result<()> {
    let rules = match &args.rules {
        Some(path) => parsing::rules::parse_rules_file(path)?,
        None => parsing::rules::load_embedded()?,
    };

    match format {
        OutputFormat::Text => {
            println!("{:<30} {:<8} COUNT", "ATTRIBUTE", "OPERATOR");
            println!("{}", "-".repeat(50));
            for rule in &rules {
                println!(
                    "{:<30} {:<8} {}",
                    rule.attribute, rule.operator.to_string(), rule.expected_count
                );
            }
            println!("\nTotal: {} rules", rules.len());
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&rules)?);
        }
        OutputFormat::Tsv => {
            println!("attribute\toperator\texpected_count");
            for rule in &rules {
                println!("{}\t{}\t{}", rule.attribute, rule.operator, rule.expected_count);
            }
        }
    }

    Ok(())
}
