use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use dbupgrade::{ResolverConfig, UpgradePath, UpgradeResolver, Version};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dbupgrade")]
#[command(about = "Resolves the schema upgrade steps between two platform versions")]
struct Cli {
    /// JSON catalog to use instead of the builtin one (or DBUPGRADE_CATALOG)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// More log output (-v info, -vv debug, -vvv trace); RUST_LOG wins when set
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the steps that upgrade FROM to TO
    Path {
        from: String,
        /// Defaults to DBUPGRADE_TARGET, then the newest known version
        to: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Print the newest version the catalog can produce
    Latest,
    /// List every registered step
    Catalog {
        #[arg(long)]
        json: bool,
    },
    /// Check the configured catalog for gaps and ordering mistakes
    Validate,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for(cli.verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut config = ResolverConfig::from_env()
        .context("Failed to read configuration from environment")?
        .merge(cli.catalog, None);
    if matches!(cli.command, Command::Validate) {
        // load as written so validate can report what is wrong
        config = config.validate_catalog(false);
    }
    let resolver = UpgradeResolver::from_config(&config).with_context(|| {
        match &config.catalog_path {
            Some(path) => format!("Failed to load catalog '{}'", path.display()),
            None => "Failed to build builtin catalog".to_string(),
        }
    })?;

    match cli.command {
        Command::Path { from, to, json } => {
            let installed = parse_version(&from)?;
            let target = match to {
                Some(to) => parse_version(&to)?,
                None => config
                    .default_target
                    .unwrap_or_else(|| resolver.latest_version()),
            };
            let path = resolver
                .calculate_upgrade_path(&installed, &target)
                .with_context(|| {
                    format!("Failed to resolve upgrade path {} -> {}", installed, target)
                })?;
            print_path(&path, json)
        }
        Command::Latest => {
            println!("{}", resolver.latest_version());
            Ok(())
        }
        Command::Catalog { json } => {
            let steps = resolver.registry().steps();
            if json {
                println!("{}", serde_json::to_string_pretty(steps)?);
            } else {
                for step in steps {
                    let (low, high) = step.source_range();
                    println!(
                        "{:<14} {} .. {} -> {}",
                        step.name(),
                        low,
                        high,
                        step.upgraded_version()
                    );
                }
            }
            Ok(())
        }
        Command::Validate => {
            resolver
                .registry()
                .validate()
                .context("Catalog validation failed")?;
            println!(
                "Catalog OK: {} steps, latest version {}",
                resolver.registry().len(),
                resolver.latest_version()
            );
            Ok(())
        }
    }
}

fn level_for(verbose: u8) -> &'static str {
    match verbose {
        0 => "dbupgrade=warn",
        1 => "dbupgrade=info",
        2 => "dbupgrade=debug",
        _ => "dbupgrade=trace",
    }
}

fn parse_version(raw: &str) -> Result<Version> {
    Version::parse(raw).with_context(|| format!("Invalid version '{}'", raw))
}

fn print_path(path: &UpgradePath, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(path)?);
        return Ok(());
    }

    for (index, step) in path.iter().enumerate() {
        let (from, to) = step.upgradable_version_range();
        let marker = if step.is_identity() { " (no-op)" } else { "" };
        println!(
            "{:>3}. {:<14} {} -> {}  => {}{}",
            index + 1,
            step.name(),
            from,
            to,
            step.upgraded_version(),
            marker
        );
    }
    Ok(())
}
