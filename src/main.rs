use clap::Parser;
use tracing_subscriber::EnvFilter;

mod checks;
mod cli;
mod core;
mod parsing;
mod utils;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("mcheck=debug,info")
    } else {
        EnvFilter::new("mcheck=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        cli::Commands::Check(args) => {
            let failed = cli::check::run(args, cli.format, cli.verbose)?;
            if failed {
                std::process::exit(1);
            }
        }
        cli::Commands::Rules(args) => {
            cli::rules::run(args, cli.format)?;
        }
    }

    Ok(())
}
