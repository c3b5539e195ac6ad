use clap::Parser;
use miette::Result;
use tracing_subscriber::EnvFilter;

use anigen::cli::{self, Cli, Commands, Project};
use anigen::output::Printer;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("ANIGEN_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let printer = Printer::new();
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Render(args) => cli::render::run(args, &Project::load(config)?, &printer)?,
        Commands::List(args) => cli::list::run(args, &Project::load(config)?, &printer)?,
        Commands::Shell(args) => cli::shell::run(args, &Project::load(config)?, &printer)?,
        Commands::Init(args) => cli::init::run(args, &printer)?,
        Commands::Completions(args) => cli::completions::run(args)?,
    }

    Ok(())
}
