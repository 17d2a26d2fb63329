// java-adg: builds the Any-Dependency Graph for a Java method and
// exposes it through a small CLI and the `java_adg` library.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use java_adg::{ast, lower, output};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    if let Err(err) = run(&cli) {
        output::error(&format!("{err:#}"));
        std::process::exit(output::EXIT_ERROR);
    }
    Ok(())
}

fn run(cli: &Cli) -> Result<()> {
    let source = std::fs::read_to_string(&cli.file)
        .with_context(|| format!("failed to read {}", cli.file))?;
    let tree = ast::parse_java(&source)?;
    let adg = lower::parse_from_ast(tree.root_node(), source.as_bytes())
        .with_context(|| format!("failed to build the ADG for {}", cli.file))?;

    match cli.command.as_ref().unwrap_or(&Commands::Show) {
        Commands::Show => cli::cmds::show(&adg, cli.output),
        Commands::Project(args) => cli::cmds::project(&adg, args, cli.output),
        Commands::Dominators(args) => cli::cmds::dominators(&adg, args, cli.output),
        Commands::Loops(args) => cli::cmds::loops(&adg, args, cli.output),
        Commands::Unreachable => cli::cmds::unreachable(&adg, cli.output),
        Commands::Export(args) => cli::cmds::export(&adg, args),
    }
}
