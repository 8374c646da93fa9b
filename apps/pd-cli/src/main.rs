use clap::{Parser, Subcommand};
use pd_app::{
    AnchorView, AppError, AppResult, NodeRow, PlanSummary, compile_scene, graph_rows,
    load_scene, parse_point, run_dimension, summarize_plan, summarize_scene, validate_scene,
    build_reference_graph,
};
use pd_dimension::RecordingSink;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pd-cli")]
#[command(about = "pipedim CLI - dimension piping runs from scene files", long_about = None)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate scene file syntax and structure
    Validate {
        /// Path to the scene file (.yaml, .yml or .json)
        scene_path: PathBuf,
    },
    /// Build the reference graph of the scene's chain and print its nodes
    Graph {
        /// Path to the scene file
        scene_path: PathBuf,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Plan and create the dimension of the scene's chain
    Dimension {
        /// Path to the scene file
        scene_path: PathBuf,
        /// Placement point of the primary measurement line, as x,y,z
        #[arg(long, allow_hyphen_values = true)]
        at: String,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() -> AppResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Validate { scene_path } => cmd_validate(&scene_path),
        Commands::Graph { scene_path, json } => cmd_graph(&scene_path, json),
        Commands::Dimension {
            scene_path,
            at,
            json,
        } => cmd_dimension(&scene_path, &at, json),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn cmd_validate(scene_path: &Path) -> AppResult<()> {
    println!("Validating scene: {}", scene_path.display());
    let scene = load_scene(scene_path)?;
    validate_scene(&scene)?;
    compile_scene(&scene)?;

    let summary = summarize_scene(&scene);
    println!("✓ Scene is valid");
    println!(
        "  {} ({} components, {} ports, chain of {})",
        summary.name, summary.component_count, summary.port_count, summary.chain_len
    );
    if !summary.marker_types.is_empty() {
        println!("  markers: {}", summary.marker_types.join(", "));
    }
    Ok(())
}

fn cmd_graph(scene_path: &Path, json: bool) -> AppResult<()> {
    let scene = load_scene(scene_path)?;
    validate_scene(&scene)?;
    let compiled = compile_scene(&scene)?;
    let graph = build_reference_graph(&compiled)?;
    let rows = graph_rows(&compiled, &graph)?;

    if json {
        return print_json(&rows);
    }

    println!(
        "{:>3}  {:<12} {:<14} {:<10} {:<9} {:<7} {:<20} {:<20} {:<20}",
        "#", "id", "category", "kind", "mode", "elided", "first", "center", "last"
    );
    for row in &rows {
        print_row(row);
    }
    let r = graph.report();
    println!(
        "\n{} lookups, {} misses, {} reconciled, {} disagreements, {} elided",
        r.lookups, r.misses, r.reconciled, r.disagreements, r.elided
    );
    Ok(())
}

fn print_row(row: &NodeRow) {
    let cell = |a: &Option<AnchorView>| a.as_ref().map_or("-".to_string(), |a| a.label.clone());
    println!(
        "{:>3}  {:<12} {:<14} {:<10} {:<9} {:<7} {:<20} {:<20} {:<20}",
        row.position,
        row.id,
        row.category,
        row.kind,
        row.flange_mode,
        row.applied,
        cell(&row.first),
        cell(&row.center),
        cell(&row.last)
    );
}

fn cmd_dimension(scene_path: &Path, at: &str, json: bool) -> AppResult<()> {
    let placement = parse_point(at)?;
    let scene = load_scene(scene_path)?;
    validate_scene(&scene)?;
    let compiled = compile_scene(&scene)?;

    let mut sink = RecordingSink::new();
    let (planned, created) = run_dimension(&compiled, placement, &mut sink)?;
    let summary = summarize_plan(&compiled, &planned)?;

    if json {
        return print_json(&summary);
    }
    print_plan(&summary);
    println!("✓ Created {} measurement(s)", created);
    Ok(())
}

fn print_plan(summary: &PlanSummary) {
    println!("Dimension plan for: {}", summary.scene);
    for m in &summary.measurements {
        println!(
            "  {:<9} {:>10.4}  style={} category={}",
            m.kind, m.length, m.style, m.category
        );
        for r in &m.references {
            println!(
                "      {:<24} ({:.4}, {:.4}, {:.4})",
                r.label.as_deref().unwrap_or("<point>"),
                r.point[0],
                r.point[1],
                r.point[2]
            );
        }
    }
    if summary.style_fallbacks > 0 {
        println!(
            "  {} secondary measurement(s) used the default linear style",
            summary.style_fallbacks
        );
    }
    if summary.report.misses > 0 {
        println!("  {} anchor lookup(s) found no geometry", summary.report.misses);
    }
}

fn print_json<T: Serialize>(value: &T) -> AppResult<()> {
    let text = serde_json::to_string_pretty(value).map_err(|e| AppError::Output(e.to_string()))?;
    println!("{text}");
    Ok(())
}
