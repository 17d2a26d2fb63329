//! CLI command definitions.

pub mod cmds;

use clap::{Parser, Subcommand, ValueEnum};

/// java-adg - Any-Dependency Graph construction for Java source
///
/// Parses a single Java compilation unit and builds the Any-Dependency
/// Graph for its first method: one directed multigraph carrying the
/// AST-child, control-flow, control-dependence and data-dependence
/// relations at once.
#[derive(Parser, Debug, Clone)]
#[command(name = "java-adg")]
#[command(author, version, about)]
pub struct Cli {
    /// Path to the Java source file to analyze
    pub file: String,

    /// Output format
    #[arg(global = true, long, value_enum, default_value_t = OutputFormat::Human)]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text output
    Human,
    /// Compact single-line JSON for programmatic consumption
    Json,
    /// JSON formatted with indentation, for a human reading the output
    Pretty,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Show every edge of the ADG (default if no subcommand given)
    Show,

    /// Show a single-relation projection (cfg, cdg, ddg or ast)
    Project(ProjectArgs),

    /// Show dominance relationships over the control-flow projection
    Dominators(DominatorsArgs),

    /// Show natural loops in the control-flow projection
    Loops(LoopsArgs),

    /// Find nodes unreachable from the method entry
    Unreachable,

    /// Export the full ADG as DOT or JSON
    Export(ExportArgs),
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Cfg,
    Cdg,
    Ddg,
    Ast,
}

#[derive(Parser, Debug, Clone)]
pub struct ProjectArgs {
    /// Which single-relation view to project
    #[arg(value_enum)]
    pub relation: Relation,
}

#[derive(Parser, Debug, Clone)]
pub struct DominatorsArgs {
    /// Show post-dominators instead of dominators
    #[arg(long)]
    pub post: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct LoopsArgs {
    /// Show nesting level for each loop
    #[arg(long)]
    pub verbose: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Dot,
    Json,
}

#[derive(Parser, Debug, Clone)]
pub struct ExportArgs {
    #[arg(long, value_enum, default_value_t = ExportFormat::Dot)]
    pub format: ExportFormat,
}
