//! Pattern Graph CLI
//!
//! Loads the datasets, builds the graph, applies filters and prints the
//! resulting "N of M shown" line (or the full overlay as JSON).
//!
//! Usage:
//!   cargo run --features cli --bin pattern-graph -- \
//!     --data public \
//!     --difficulty easy --difficulty medium \
//!     --pattern parent:sliding-window \
//!     --company Google
//!
//! Examples:
//!   # Hover a pattern and dump the overlay
//!   cargo run --features cli --bin pattern-graph -- --hover two-pointers --json
//!
//!   # What does clicking a subpattern do?
//!   cargo run --features cli --bin pattern-graph -- --click two-pointers/opposite-ends

use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use leet_compass::config::ViewConfig;
use leet_compass::graph::filter::{collection_names, pattern_options, search_companies};
use leet_compass::graph::spatial::SpatialIndex;
use leet_compass::graph::{ClickBehavior, LayoutMode, NodeKind, PatternGraphView};
use leet_compass::{DataClient, Difficulty, SolvedSet};

/// Pattern graph filter/highlight explorer
#[derive(Parser, Debug)]
#[command(name = "pattern-graph")]
#[command(about = "Build the pattern graph and evaluate filters against it")]
struct Args {
    /// Directory or base URL holding the JSON datasets (overrides LEET_COMPASS_DATA)
    #[arg(long, short = 'd')]
    data: Option<String>,

    /// Solved-marker file
    #[arg(long)]
    solved: Option<PathBuf>,

    /// Layout mode (hierarchical | force)
    #[arg(long)]
    layout: Option<LayoutMode>,

    /// Click behaviour for category nodes (filter | navigate)
    #[arg(long)]
    click_mode: Option<ClickBehavior>,

    /// Visible difficulty (repeatable; default all)
    #[arg(long, short = 'D')]
    difficulty: Vec<Difficulty>,

    /// Search text over problem name and id
    #[arg(long, short = 's')]
    search: Option<String>,

    /// Pattern token: `parent:<slug>` or `<subSlug>`
    #[arg(long, short = 'p')]
    pattern: Option<String>,

    #[arg(long, short = 'c')]
    company: Option<String>,

    #[arg(long)]
    collection: Option<String>,

    /// Hide pattern/subpattern nodes
    #[arg(long)]
    hide_patterns: bool,

    /// Node id to hover
    #[arg(long)]
    hover: Option<String>,

    /// Node id to click (after filters)
    #[arg(long)]
    click: Option<String>,

    /// Report the node under a graph point, e.g. `--at 400,40`
    #[arg(long, value_parser = parse_point)]
    at: Option<[f32; 2]>,

    /// List pattern dropdown tokens and exit
    #[arg(long)]
    list_patterns: bool,

    /// List collection names and exit
    #[arg(long)]
    list_collections: bool,

    /// List companies matching a query and exit
    #[arg(long)]
    find_company: Option<String>,

    /// Print the overlay as JSON
    #[arg(long)]
    json: bool,
}

/// Parse `x,y`
fn parse_point(s: &str) -> Result<[f32; 2], String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("Invalid point (expected x,y): {}", s))?;
    let x = x.trim().parse().map_err(|e| format!("Invalid x: {}", e))?;
    let y = y.trim().parse().map_err(|e| format!("Invalid y: {}", e))?;
    Ok([x, y])
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("leet_compass=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = ViewConfig::from_env();
    if let Some(data) = args.data.clone() {
        config.data = data;
    }
    if let Some(solved) = args.solved.clone() {
        config.solved = solved;
    }
    if let Some(layout) = args.layout {
        config.layout = layout;
    }
    if let Some(click) = args.click_mode {
        config.click = click;
    }

    let client = DataClient::from_location(&config.data)
        .with_context(|| format!("Invalid data location: {}", config.data))?;
    let dataset = client
        .load_dataset()
        .await
        .with_context(|| format!("Failed to load datasets from {}", client.source()))?;

    if args.list_patterns {
        for option in pattern_options(&dataset.patterns) {
            println!("{}{}\t{}", "  ".repeat(option.depth as usize), option.token, option.label);
        }
        return Ok(());
    }
    if args.list_collections {
        for name in collection_names(&dataset.collections) {
            println!("{}", name);
        }
        return Ok(());
    }
    if let Some(query) = &args.find_company {
        for company in search_companies(&dataset.companies, query) {
            println!("{}\t{} problems", company.name, company.problems.len());
        }
        return Ok(());
    }

    let solved = SolvedSet::load(&config.solved);
    let mut view = PatternGraphView::new(&config).with_solved(solved);
    view.set_dataset(Rc::new(dataset))
        .context("Failed to build pattern graph")?;

    if !args.difficulty.is_empty() {
        view.set_difficulties(args.difficulty.iter().copied());
    }
    if let Some(search) = &args.search {
        view.set_search(search);
    }
    if let Some(pattern) = &args.pattern {
        view.set_pattern(pattern);
    }
    view.set_company(args.company.as_deref());
    view.set_collection(args.collection.as_deref());
    view.set_show_patterns(!args.hide_patterns);

    if let Some(node_id) = &args.click {
        match view.click(node_id) {
            Some(action) => println!("click {}: {:?}", node_id, action),
            None => println!("click {}: no such node", node_id),
        }
    }

    // Count is published before hovering
    let shown = view.shown_label();
    if let Some(node_id) = &args.hover {
        view.hover_enter(node_id);
    }

    if let (Some(point), Some(graph)) = (args.at, view.graph()) {
        let index = SpatialIndex::from_overlay(&graph.model, view.overlay());
        match index.hit_test(point, leet_compass::graph::render::HIT_SLOP) {
            Some(node) => println!("at {:?}: {} ({:?})", point, node.id, node.kind),
            None => println!("at {:?}: nothing", point),
        }
    }

    if args.json {
        let json = serde_json::to_string_pretty(view.overlay())
            .context("Failed to serialize overlay")?;
        println!("{}", json);
    } else {
        let overlay = view.overlay();
        println!(
            "patterns {} | subpatterns {} | {}{}",
            overlay.visible_ids(NodeKind::Pattern).len(),
            overlay.visible_ids(NodeKind::Subpattern).len(),
            shown,
            if view.filter().is_filtering() { " (filtered)" } else { "" }
        );
    }

    Ok(())
}
