//! Subcommand implementations. Each takes the already-built [`Adg`] for
//! the file named on the command line, plus whatever options its
//! subcommand parsed.

use crate::adg::Adg;
use crate::cfg;
use crate::cli::{DominatorsArgs, ExportArgs, ExportFormat, LoopsArgs, OutputFormat, ProjectArgs, Relation};
use crate::output;
use anyhow::Result;
use serde::Serialize;

/// Serialize `value` as compact JSON for [`OutputFormat::Json`] or
/// indented JSON for [`OutputFormat::Pretty`], then print it.
fn print_json<T: Serialize>(value: &T, fmt: OutputFormat) -> Result<()> {
    let json = match fmt {
        OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        _ => serde_json::to_string(value)?,
    };
    println!("{json}");
    Ok(())
}

pub fn show(adg: &Adg<'_>, fmt: OutputFormat) -> Result<()> {
    match fmt {
        OutputFormat::Human => print!("{adg}"),
        OutputFormat::Json | OutputFormat::Pretty => {
            print_json(&cfg::build_export(adg), fmt)?;
        }
    }
    Ok(())
}

pub fn project(adg: &Adg<'_>, args: &ProjectArgs, fmt: OutputFormat) -> Result<()> {
    let projection = match args.relation {
        Relation::Cfg => adg.to_cfg(),
        Relation::Cdg => adg.to_cdg(),
        Relation::Ddg => adg.to_ddg(),
        Relation::Ast => adg.to_ast(),
    };

    let mut edges: Vec<(usize, usize)> = Vec::new();
    for id in projection.node_ids() {
        for succ in projection.successors(id) {
            edges.push((id, succ));
        }
    }
    edges.sort_unstable();

    match fmt {
        OutputFormat::Human => {
            for (from, to) in &edges {
                println!(
                    "{}:{from} -> {}:{to}",
                    adg.node(*from).label(),
                    adg.node(*to).label()
                );
            }
        }
        OutputFormat::Json | OutputFormat::Pretty => {
            #[derive(Serialize)]
            struct Edge {
                from: usize,
                to: usize,
            }
            let edges: Vec<Edge> = edges.into_iter().map(|(from, to)| Edge { from, to }).collect();
            print_json(&edges, fmt)?;
        }
    }
    Ok(())
}

pub fn dominators(adg: &Adg<'_>, args: &DominatorsArgs, fmt: OutputFormat) -> Result<()> {
    let projection = adg.to_cfg();

    let mut rows: Vec<(usize, Option<usize>)> = Vec::new();
    if args.post {
        let Some(tree) = cfg::compute_post_dominator_tree(&projection) else {
            output::warn("no exit node found; nothing to report");
            return Ok(());
        };
        for ix in projection.index().node_indices() {
            let node = projection.id_of(ix);
            let idom = tree.immediate_post_dominator(ix).map(|i| projection.id_of(i));
            rows.push((node, idom));
        }
    } else {
        let Some(tree) = cfg::compute_dominator_tree(&projection) else {
            output::warn("no entry node found; nothing to report");
            return Ok(());
        };
        for ix in projection.index().node_indices() {
            let node = projection.id_of(ix);
            let idom = tree.immediate_dominator(ix).map(|i| projection.id_of(i));
            rows.push((node, idom));
        }
    }
    rows.sort_unstable_by_key(|(node, _)| *node);

    match fmt {
        OutputFormat::Human => {
            for (node, idom) in &rows {
                match idom {
                    Some(idom) => println!("{node}: idom = {idom}"),
                    None => println!("{node}: root"),
                }
            }
        }
        OutputFormat::Json | OutputFormat::Pretty => {
            #[derive(Serialize)]
            struct Row {
                node: usize,
                immediate_dominator: Option<usize>,
            }
            let rows: Vec<Row> = rows
                .into_iter()
                .map(|(node, immediate_dominator)| Row { node, immediate_dominator })
                .collect();
            print_json(&rows, fmt)?;
        }
    }
    Ok(())
}

pub fn loops(adg: &Adg<'_>, args: &LoopsArgs, fmt: OutputFormat) -> Result<()> {
    let projection = adg.to_cfg();
    let natural_loops = cfg::detect_natural_loops(&projection);

    match fmt {
        OutputFormat::Human => {
            if natural_loops.is_empty() {
                println!("no loops found");
            }
            for l in &natural_loops {
                let header = projection.id_of(l.header);
                let level = if args.verbose {
                    format!(" (nesting {})", l.nesting_level(&natural_loops))
                } else {
                    String::new()
                };
                println!("loop header {header}{level}, body size {}", l.size());
            }
        }
        OutputFormat::Json | OutputFormat::Pretty => {
            #[derive(Serialize)]
            struct Loop {
                header: usize,
                body: Vec<usize>,
            }
            let out: Vec<Loop> = natural_loops
                .iter()
                .map(|l| Loop {
                    header: projection.id_of(l.header),
                    body: l.body.iter().map(|&ix| projection.id_of(ix)).collect(),
                })
                .collect();
            print_json(&out, fmt)?;
        }
    }
    Ok(())
}

pub fn unreachable(adg: &Adg<'_>, fmt: OutputFormat) -> Result<()> {
    let projection = adg.to_cfg();
    let mut ids: Vec<usize> = cfg::find_unreachable(&projection)
        .into_iter()
        .map(|ix| projection.id_of(ix))
        .collect();
    ids.sort_unstable();

    match fmt {
        OutputFormat::Human => {
            if ids.is_empty() {
                println!("no unreachable code");
            }
            for id in &ids {
                println!("{}: {}", id, adg.node(*id).label());
            }
        }
        OutputFormat::Json | OutputFormat::Pretty => {
            print_json(&ids, fmt)?;
        }
    }
    Ok(())
}

pub fn export(adg: &Adg<'_>, args: &ExportArgs) -> Result<()> {
    match args.format {
        ExportFormat::Dot => println!("{}", cfg::export_dot(adg)),
        ExportFormat::Json => println!("{}", cfg::export_json(adg)?),
    }
    Ok(())
}
