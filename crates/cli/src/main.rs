use anyhow::{Context, Result};
use catalog::{Attribute, Catalog, DataPaths, ExclusivitySet, Quality};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use pipeline::{AttributeTargets, ResultRow, SearchConfig, SumBucket, TargetRange};
use search::{SearchOrchestrator, SearchOutcome};
use std::path::PathBuf;
use std::time::Instant;
use tracing::debug;

/// Mark Search - find the best three-mark combinations for a creature
#[derive(Parser)]
#[command(name = "mark-search")]
#[command(about = "Searches mark combinations against per-stat target ranges", long_about = None)]
struct Cli {
    /// Directory holding the catalog and result files
    #[arg(short, long, default_value = "data", global = true)]
    data_dir: PathBuf,

    /// Log at debug level (RUST_LOG is honored otherwise)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search for combinations and append the valid ones to the result log
    Search(SearchArgs),

    /// Show what the catalog contains
    Catalog {
        /// List every mark of this quality
        #[arg(long)]
        list: Option<Quality>,
    },

    /// Create the editable side files (restricted series, limited-to-one ids, missing ids)
    Init,
}

#[derive(Args)]
struct SearchArgs {
    /// TOML file to start from; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Target range as ATTR=MIN..MAX, either side may be empty (repeatable)
    #[arg(long = "target", value_parser = parse_target)]
    targets: Vec<(Attribute, Option<TargetRange>)>,

    /// Require this stat to be exactly zero (repeatable)
    #[arg(long = "zero")]
    zero: Vec<Attribute>,

    /// Creature id whose exclusive marks may be used
    #[arg(long)]
    owner: Option<String>,

    /// Allowed quality tiers (repeatable, replaces the configured set)
    #[arg(long = "quality")]
    qualities: Vec<Quality>,

    /// Allowed total-sum buckets for top-tier marks: above, equal, below (repeatable)
    #[arg(long = "bucket")]
    buckets: Vec<SumBucket>,

    /// Only A-A-B combinations
    #[arg(long)]
    symmetric: bool,

    /// Allow limited-to-one marks to repeat
    #[arg(long)]
    no_exclusivity: bool,

    /// Do not prune candidates before enumerating (exhaustive, slower)
    #[arg(long)]
    no_efficiency: bool,

    /// Candidates kept by efficiency pruning
    #[arg(long)]
    top_n: Option<usize>,

    /// Keep marks with negative stats
    #[arg(long)]
    keep_negative: bool,

    /// Do not append rows the result log already holds
    #[arg(long)]
    dedup_log: bool,

    /// Number of results to print
    #[arg(long, default_value = "20")]
    limit: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let paths = DataPaths::new(&cli.data_dir);

    match cli.command {
        Commands::Search(args) => handle_search(paths, args)?,
        Commands::Catalog { list } => handle_catalog(&paths, list)?,
        Commands::Init => handle_init(&paths)?,
    }

    Ok(())
}

/// Parse `ATTR=MIN..MAX`
fn parse_target(s: &str) -> Result<(Attribute, Option<TargetRange>), String> {
    let (name, range) = s
        .split_once('=')
        .ok_or_else(|| format!("expected ATTR=MIN..MAX, got {:?}", s))?;
    let attribute: Attribute = name.parse().map_err(|e| format!("{}", e))?;
    let range = AttributeTargets::parse_range_spec(attribute, range).map_err(|e| format!("{}", e))?;
    Ok((attribute, range))
}

/// Merge the TOML file (if any) with the command-line overrides
fn build_config(args: &SearchArgs) -> Result<SearchConfig> {
    let mut config = match &args.config {
        Some(path) => SearchConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => SearchConfig::default(),
    };

    for (attribute, range) in &args.targets {
        match range {
            Some(range) => config.targets.insert(*attribute, *range),
            None => config.targets.insert(*attribute, TargetRange::default()),
        }
    }
    for attribute in &args.zero {
        config.targets.insert(*attribute, TargetRange::exact_zero());
    }
    if let Some(owner) = &args.owner {
        config.owner_filter = Some(owner.clone());
    }
    if !args.qualities.is_empty() {
        config.quality_filter = args.qualities.iter().copied().collect();
    }
    if !args.buckets.is_empty() {
        config.sum_buckets = args.buckets.iter().copied().collect();
    }
    if let Some(top_n) = args.top_n {
        config.top_n = top_n;
    }
    config.symmetric |= args.symmetric;
    config.dedup_log |= args.dedup_log;
    if args.no_exclusivity {
        config.use_exclusivity = false;
    }
    if args.no_efficiency {
        config.improve_efficiency = false;
    }
    if args.keep_negative {
        config.drop_negative = false;
    }

    config.validate()?;
    debug!("Search config: {:?}", config);
    Ok(config)
}

/// Handle the 'search' command
fn handle_search(paths: DataPaths, args: SearchArgs) -> Result<()> {
    let config = build_config(&args)?;
    print_targets(&config.targets);

    let orchestrator = SearchOrchestrator::new(paths);
    let outcome = orchestrator.run(&config)?;

    print_outcome(&outcome, &config, args.limit);
    println!(
        "{} Appended to {}",
        "✓".green(),
        orchestrator.paths().result_log.display()
    );
    Ok(())
}

/// Handle the 'catalog' command
fn handle_catalog(paths: &DataPaths, list: Option<Quality>) -> Result<()> {
    let start = Instant::now();
    let catalog = Catalog::load(paths).context("Failed to load mark catalog")?;
    println!(
        "{} Loaded {} marks in {:?}",
        "✓".green(),
        catalog.len(),
        start.elapsed()
    );

    println!("{}", "Marks by quality:".bold().blue());
    for (quality, count) in catalog.counts_by_quality() {
        println!("{}{}: {}", "• ".green(), quality, count);
    }

    let exclusivity = ExclusivitySet::resolve(paths, &catalog)?;
    println!("{}Limited-to-one marks: {}", "• ".cyan(), exclusivity.len());

    if !catalog.skipped().is_empty() {
        println!(
            "{}",
            format!("Skipped {} records:", catalog.skipped().len()).yellow()
        );
        for record in catalog.skipped() {
            println!("  - line {}: {}", record.line, record.reason);
        }
    }

    if let Some(quality) = list {
        println!("{}", format!("Quality {} marks:", quality).bold().blue());
        for item in catalog.items().iter().filter(|item| item.quality == quality) {
            let owner = item
                .owner_restriction
                .as_deref()
                .map(|owner| format!(" (creature {})", owner))
                .unwrap_or_default();
            println!(
                "{:>6}  {} [{}] {} = {}{}",
                item.id,
                item.description,
                item.class_id,
                item.attributes,
                item.total_sum,
                owner.dimmed()
            );
        }
    }
    Ok(())
}

/// Handle the 'init' command
fn handle_init(paths: &DataPaths) -> Result<()> {
    let catalog = Catalog::load(paths).context("Failed to load mark catalog")?;
    let created = catalog::initialize_side_files(paths, &catalog)?;

    if created.is_empty() {
        println!("All side files already exist in {}", paths.root.display());
    }
    for path in created {
        println!("{} Created {}", "✓".green(), path);
    }
    Ok(())
}

fn print_targets(targets: &AttributeTargets) {
    if targets.is_empty() {
        println!("{}", "No stat targets set, every combination qualifies".yellow());
        return;
    }
    let summary = targets
        .iter()
        .map(|(attribute, range)| format!("{} {}", attribute, range))
        .collect::<Vec<_>>()
        .join(", ");
    println!("{} {}", "Targets:".bold(), summary);
}

/// Print the run summary and the top `limit` rows
fn print_outcome(outcome: &SearchOutcome, config: &SearchConfig, limit: usize) {
    println!(
        "{} {} of {} marks are candidates, {}",
        "✓".green(),
        outcome.candidate_count,
        outcome.catalog_size,
        outcome.stats
    );
    if config.improve_efficiency && config.targets.positive_min_attributes().len() > 1 {
        println!(
            "{}",
            format!(
                "Efficiency pruning kept at most {} marks; use --no-efficiency for an exhaustive search",
                config.top_n
            )
            .dimmed()
        );
    }

    if outcome.rows.is_empty() {
        println!("{}", "No combination meets the targets".yellow());
        return;
    }

    println!(
        "{}",
        format!("{} combinations in {:.2?}:", outcome.rows.len(), outcome.elapsed)
            .bold()
            .blue()
    );
    let header = Attribute::ALL
        .iter()
        .map(|attribute| format!("{:>7}", attribute.name()))
        .collect::<String>();
    println!("{:>4}  {:<40}{} {:>7}", "#", "marks", header, "score");

    for (rank, row) in outcome.rows.iter().take(limit).enumerate() {
        print_row(rank + 1, row);
    }
    if outcome.rows.len() > limit {
        println!("  ... {} more in the result log", outcome.rows.len() - limit);
    }
}

fn print_row(rank: usize, row: &ResultRow) {
    let marks = row.descriptions().join(" + ");
    let sums = row
        .sums()
        .values()
        .iter()
        .map(|value| format!("{:>7}", value))
        .collect::<String>();
    println!(
        "{:>4}  {:<40}{} {:>7}",
        rank.to_string().green(),
        marks,
        sums,
        row.score.to_string().bold()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> SearchArgs {
        let mut argv = vec!["mark-search", "search"];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Commands::Search(args) => args,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_parse_target() {
        assert_eq!(
            parse_target("speed=100..").unwrap(),
            (Attribute::Speed, Some(TargetRange::at_least(100)))
        );
        assert_eq!(
            parse_target("atk=..40").unwrap(),
            (Attribute::Attack, Some(TargetRange::at_most(40)))
        );
        assert!(parse_target("speed").is_err());
        assert!(parse_target("luck=1..2").is_err());
        assert!(parse_target("hp=9..1").is_err());
    }

    #[test]
    fn test_flags_override_defaults() {
        let config = build_config(&args(&[
            "--target",
            "attack=200..",
            "--zero",
            "hp",
            "--quality",
            "4",
            "--quality",
            "5",
            "--bucket",
            "equal",
            "--no-exclusivity",
            "--top-n",
            "50",
        ]))
        .unwrap();

        assert_eq!(config.targets.get(Attribute::Attack), Some(&TargetRange::at_least(200)));
        assert!(config.targets.get(Attribute::Hp).unwrap().is_exact_zero());
        assert_eq!(config.quality_filter.len(), 2);
        assert!(config.sum_buckets.contains(&SumBucket::Equal));
        assert!(!config.sum_buckets.contains(&SumBucket::Above));
        assert!(!config.use_exclusivity);
        assert_eq!(config.top_n, 50);
        assert!(config.drop_negative);
    }

    #[test]
    fn test_defaults_without_flags() {
        let config = build_config(&args(&[])).unwrap();
        assert_eq!(config, SearchConfig::default());
    }

    #[test]
    fn test_invalid_top_n_rejected() {
        assert!(build_config(&args(&["--top-n", "0"])).is_err());
        assert!(build_config(&args(&["--top-n", "0", "--no-efficiency"])).is_ok());
    }
}
