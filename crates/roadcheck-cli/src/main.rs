//! CLI binary for roadcheck: run data-quality checks over road network snapshots.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use roadcheck_core::config::RoadcheckConfig;
use roadcheck_core::graph::RoadGraph;
use roadcheck_rules::runner::{RunReport, run_configured};
use roadcheck_rules::short_segment::ShortSegmentRule;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "roadcheck", about = "Road network data-quality checks")]
struct Cli {
    /// Project root directory (defaults to current directory)
    #[arg(short, long, global = true)]
    project: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the configured checks and print flags
    Check {
        /// Snapshot file (defaults to .roadcheck/graph.json under the project)
        snapshot: Option<PathBuf>,

        /// Config file (defaults to .roadcheck/config.toml under the project)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Also print why edges were not flagged
        #[arg(long)]
        explain: bool,
    },

    /// Show snapshot statistics
    Info {
        /// Snapshot file (defaults to .roadcheck/graph.json under the project)
        snapshot: Option<PathBuf>,
    },

    /// Validate snapshot integrity (duplicate ids, dangling edge endpoints)
    Validate {
        /// Snapshot file (defaults to .roadcheck/graph.json under the project)
        snapshot: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn get_project_root(cli: &Cli) -> Result<PathBuf> {
    match &cli.project {
        Some(p) => Ok(p.clone()),
        None => std::env::current_dir().context("failed to get current directory"),
    }
}

fn snapshot_path(project_root: &Path, snapshot: Option<PathBuf>) -> PathBuf {
    snapshot.unwrap_or_else(|| roadcheck_core::storage::default_snapshot_path(project_root))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let project_root = get_project_root(&cli)?;

    match cli.command {
        Commands::Check {
            snapshot,
            config,
            format,
            explain,
        } => cmd_check(
            &project_root,
            &snapshot_path(&project_root, snapshot),
            config.as_deref(),
            format,
            explain,
        ),
        Commands::Info { snapshot } => cmd_info(&snapshot_path(&project_root, snapshot)),
        Commands::Validate { snapshot } => cmd_validate(&snapshot_path(&project_root, snapshot)),
    }
}

fn load_config(project_root: &Path, config: Option<&Path>) -> Result<RoadcheckConfig> {
    let loaded = match config {
        Some(path) => RoadcheckConfig::load_file(path),
        None => RoadcheckConfig::load(project_root),
    };
    loaded.context("invalid roadcheck configuration")
}

fn cmd_check(
    project_root: &Path,
    snapshot: &Path,
    config: Option<&Path>,
    format: OutputFormat,
    explain: bool,
) -> Result<()> {
    // Config errors are fatal before the snapshot is even read.
    let config = load_config(project_root, config)?;
    let graph = roadcheck_core::storage::load(snapshot)?;
    tracing::info!(
        snapshot = %snapshot.display(),
        nodes = graph.nodes().len(),
        edges = graph.edges().len(),
        "loaded snapshot"
    );

    let reports = run_configured(&graph, &config)?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&reports)
                .context("failed to serialize check reports")?;
            println!("{}", json);
        }
        OutputFormat::Text => print_reports(&reports),
    }

    if explain && config.short_segment.enabled {
        print_explanation(&graph, &ShortSegmentRule::new(&config.short_segment)?);
    }

    Ok(())
}

fn print_reports(reports: &[RunReport]) {
    if reports.is_empty() {
        eprintln!("No checks enabled.");
        return;
    }
    for report in reports {
        for flag in &report.flags {
            println!("{}", flag);
        }
        eprintln!(
            "{}: {} flagged ({} eligible of {} objects)",
            report.check, report.summary.flagged, report.summary.eligible, report.summary.objects
        );
    }
}

fn print_explanation(graph: &RoadGraph, rule: &ShortSegmentRule) {
    let counts = rule.verdict_counts(graph);
    eprintln!(
        "\nShortSegmentCheck verdicts (max length {} m, min valence {}, min priority {}):",
        rule.maximum_length_meters(),
        rule.minimum_valence(),
        rule.minimum_highway_priority()
    );
    for (label, count) in &counts.0 {
        eprintln!("  {:<20} {}", label, count);
    }
}

fn cmd_info(snapshot: &Path) -> Result<()> {
    let graph = roadcheck_core::storage::load(snapshot)?;

    println!("Snapshot v{}", graph.version);
    if !graph.metadata.source.is_empty() {
        println!("Source: {}", graph.metadata.source);
    }
    println!("Created: {}", graph.created_at);
    println!("Updated: {}", graph.updated_at);
    println!();
    println!("Nodes: {}", graph.metadata.total_nodes);
    println!("Edges: {}", graph.metadata.total_edges);
    println!("Main edges: {}", graph.metadata.main_edges);
    println!("Ways: {}", graph.metadata.ways);

    Ok(())
}

fn cmd_validate(snapshot: &Path) -> Result<()> {
    let graph = roadcheck_core::storage::load(snapshot)?;
    let problems = graph.check_integrity();

    if problems.is_empty() {
        eprintln!("Snapshot is valid. No integrity issues found.");
        eprintln!(
            "  {} nodes, {} edges",
            graph.nodes().len(),
            graph.edges().len()
        );
        return Ok(());
    }

    for problem in &problems {
        println!("WARN: {}", problem);
    }
    anyhow::bail!("{} integrity issue(s) found", problems.len())
}
