use std::fs::File;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use comfy_table::Table;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use wave_planner::models::{CombinationResult, DeadlineSummary};
use wave_planner::utils::distribution_chart::draw_zone_distribution;
use wave_planner::utils::load_records::{source_for_path, write_csv_records};
use wave_planner::utils::synthetic::SyntheticDataset;
use wave_planner::{
    DeadlineFilter, DispatchDeadline, ItemRange, PlannerConfig, RankingPolicy, WaveSession,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show items, routes and zones per dispatch deadline
    Summary {
        /// Route/zone records (.csv or .json)
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Score every combination of the selected routes and print the best ones
    Plan {
        #[command(flatten)]
        args: PlanArgs,
    },
    /// Write a synthetic route/zone dataset as CSV
    #[command(visible_alias = "g")]
    Generate {
        #[arg(short, long)]
        output: PathBuf,

        #[arg(long, default_value_t = 12)]
        routes: u64,

        #[arg(long, default_value_t = 8)]
        zones: u64,

        #[arg(long, default_value_t = 4)]
        deadlines: u32,

        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

#[derive(Args)]
struct PlanArgs {
    /// Route/zone records (.csv or .json)
    #[arg(short, long)]
    input: PathBuf,

    /// Deadlines to include, HH:MM or HH:MM:SS (repeatable, default: all)
    #[arg(short = 'D', long = "deadline")]
    deadlines: Vec<DispatchDeadline>,

    #[arg(long)]
    min_items: Option<u64>,

    #[arg(long)]
    max_items: Option<u64>,

    /// "deadline-first", "average-only" or keys like "total_items:desc,earliest_deadline:asc"
    #[arg(long)]
    ranking: Option<RankingPolicy>,

    #[arg(long)]
    max_candidates: Option<usize>,

    /// Skip the lower-quartile metric
    #[arg(long)]
    no_quartile: bool,

    /// Score on the current thread only
    #[arg(long)]
    sequential: bool,

    /// Rows of the ranked table to print
    #[arg(short, long, default_value_t = 20)]
    top: usize,

    /// Write the full ranked table as JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Draw the per-zone distribution of one ranked combination as PNG
    #[arg(long)]
    chart: Option<PathBuf>,

    /// 1-based rank of the combination to chart
    #[arg(long, default_value_t = 1)]
    chart_rank: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    match cli.command {
        Commands::Summary { input } => run_summary(input),
        Commands::Plan { args } => run_plan(args),
        Commands::Generate {
            output,
            routes,
            zones,
            deadlines,
            seed,
        } => run_generate(output, routes, zones, deadlines, seed),
    }
}

fn run_summary(input: PathBuf) -> Result<()> {
    let mut session = WaveSession::new(PlannerConfig::from_env()?);
    session
        .load(&*source_for_path(&input))
        .with_context(|| format!("loading {}", input.display()))?;

    if !session.has_data() {
        warn!("No data in {}", input.display());
        return Ok(());
    }
    print_summaries(session.summaries());
    Ok(())
}

fn run_plan(args: PlanArgs) -> Result<()> {
    let mut config = PlannerConfig::from_env()?;
    if let Some(ranking) = args.ranking {
        config.ranking = ranking;
    }
    if let Some(max_candidates) = args.max_candidates {
        config.max_candidates = max_candidates;
    }
    if args.no_quartile {
        config.metrics.lower_quartile = false;
    }
    if args.sequential {
        config.parallel = false;
    }
    let item_range = ItemRange::new(
        args.min_items.unwrap_or(config.item_range.min),
        args.max_items.unwrap_or(config.item_range.max),
    )?;
    info!("Ranking by {} within {} items", config.ranking, item_range);

    let mut session = WaveSession::new(config);
    session
        .load(&*source_for_path(&args.input))
        .with_context(|| format!("loading {}", args.input.display()))?;

    if !session.has_data() {
        warn!("No data in {}", args.input.display());
        return Ok(());
    }
    print_summaries(session.summaries());

    let filter = if args.deadlines.is_empty() {
        DeadlineFilter::All
    } else {
        DeadlineFilter::only(args.deadlines)
    };
    session.compute(&filter)?;
    let ranked = session.ranked(item_range);

    if ranked.is_empty() {
        warn!("No combinations match the selected deadlines and item range");
        return Ok(());
    }

    println!("\nBest route combinations to launch ({} total):", ranked.len());
    print_combinations(&ranked, args.top);

    if let Some(path) = &args.json {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        serde_json::to_writer_pretty(file, &ranked)?;
        info!("Ranked table written to {}", path.display());
    }

    if let Some(path) = &args.chart {
        let chosen = args
            .chart_rank
            .checked_sub(1)
            .and_then(|index| ranked.get(index))
            .ok_or_else(|| anyhow!("no combination at rank {}", args.chart_rank))?;
        let distribution = session
            .zone_distribution(chosen)
            .ok_or_else(|| {
                anyhow!("rank {} is not from the last computation", args.chart_rank)
            })?;

        if let Some(stats) = session.distribution_stats(chosen) {
            println!(
                "\nRoutes {}: zones {}, min {}, q25 {}, median {}, mean {}, q75 {}, max {}",
                chosen.formatted_routes(),
                stats.count,
                stats.min,
                stats.q25,
                stats.median,
                stats.mean,
                stats.q75,
                stats.max
            );
        }

        draw_zone_distribution(
            &path.to_string_lossy(),
            &distribution,
            &format!("routes {}", chosen.formatted_routes()),
        )
        .map_err(|e| anyhow!("drawing {}: {}", path.display(), e))?;
        info!("Distribution chart written to {}", path.display());
    }

    Ok(())
}

fn run_generate(output: PathBuf, routes: u64, zones: u64, deadlines: u32, seed: u64) -> Result<()> {
    let dataset = SyntheticDataset {
        routes,
        zones,
        deadlines,
        seed,
        ..SyntheticDataset::default()
    };
    let records = dataset.generate();
    let file = File::create(&output).with_context(|| format!("creating {}", output.display()))?;
    write_csv_records(file, &records)?;
    info!("Wrote {} records to {}", records.len(), output.display());
    Ok(())
}

fn print_summaries(summaries: &[DeadlineSummary]) {
    let mut table = Table::new();
    table.set_header(vec![
        "Dispatch SLA",
        "Items",
        "Routes",
        "Zones",
        "Items per Zone",
    ]);
    for summary in summaries {
        table.add_row(vec![
            summary.dispatch_deadline.to_string(),
            summary.total_items.to_string(),
            summary.routes_label(),
            summary.zone_count.to_string(),
            summary
                .items_per_zone
                .map(|ratio| format!("{:.2}", ratio))
                .unwrap_or_else(|| "-".to_string()),
        ]);
    }
    println!("Orders by dispatch deadline:");
    println!("{table}");
}

fn print_combinations(ranked: &[&CombinationResult], top: usize) {
    let mut table = Table::new();
    table.set_header(vec![
        "Rank",
        "Routes",
        "Average Items per Zone",
        "Q25 per Zone",
        "Total Items",
        "Earliest SLA",
    ]);
    for (rank, result) in ranked.iter().take(top).enumerate() {
        table.add_row(vec![
            (rank + 1).to_string(),
            result.formatted_routes(),
            format!("{:.1}", result.avg_per_zone),
            result
                .lower_quartile
                .map(|q| format!("{:.1}", q))
                .unwrap_or_else(|| "-".to_string()),
            result.total_items.to_string(),
            result.earliest_deadline.to_string(),
        ]);
    }
    println!("{table}");
}
