use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use futures::TryStreamExt;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pokedex_core::{
    load_config, metrics, subscribe, validate_config, CatalogEntry, CatalogOrder,
    CatalogRepository, Config, DetailUseCase, LaunchUseCase, Repository, StreamEvent,
    TableUseCase,
};

/// Config file looked up in the working directory when `--config` is absent.
const DEFAULT_CONFIG_FILE: &str = "pokedex.toml";

/// Pokédex - browse the bundled catalog and its cached sprites and animations
#[derive(Parser)]
#[command(name = "pokedex")]
#[command(version)]
struct Cli {
    /// Configuration file (default: pokedex.toml if present)
    #[arg(short, long, env = "POKEDEX_CONFIG")]
    config: Option<PathBuf>,

    /// Print Prometheus metrics after the command finishes
    #[arg(long)]
    metrics: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load both datasets and report success
    Warm,

    /// List every entry
    List {
        /// Sort order: number, name or total
        #[arg(short, long, default_value = "number")]
        order: CatalogOrder,
    },

    /// Show one entry and its sprite
    Show {
        /// Pokédex number
        number: u32,
    },

    /// Resolve every animation for one entry
    Images {
        /// Pokédex number
        number: u32,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = resolve_config(cli.config.as_deref())?;
    validate_config(&config).context("Configuration validation failed")?;
    let repository: Arc<dyn Repository> = Arc::new(CatalogRepository::from_config(&config)?);
    info!("Cache root: {:?}", config.cache.root_dir()?);

    match cli.command {
        Command::Warm => warm(&repository).await?,
        Command::List { order } => list(&repository, order).await?,
        Command::Show { number } => show(&repository, number).await?,
        Command::Images { number } => images(&repository, number).await?,
    }

    if cli.metrics {
        print!("{}", metrics::encode_metrics());
    }

    Ok(())
}

fn resolve_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        info!("Loading configuration from {:?}", path);
        return load_config(path).with_context(|| format!("Failed to load config from {:?}", path));
    }

    let default_path = Path::new(DEFAULT_CONFIG_FILE);
    if default_path.exists() {
        info!("Loading configuration from {:?}", default_path);
        return load_config(default_path)
            .with_context(|| format!("Failed to load config from {:?}", default_path));
    }

    info!("No configuration file, using defaults");
    Ok(Config::default())
}

async fn warm(repository: &Arc<dyn Repository>) -> Result<()> {
    let launch = LaunchUseCase::new(Arc::clone(repository));
    let (subscription, mut events) = subscribe(launch.warm_up_events());

    while let Some(event) = events.recv().await {
        match event {
            StreamEvent::Next(()) => {}
            StreamEvent::Completed => {
                info!("Datasets ready");
                break;
            }
            StreamEvent::Error(e) => {
                subscription.cancel();
                return Err(e).context("Failed to load datasets");
            }
        }
    }

    subscription.join().await;
    println!("ready");
    Ok(())
}

async fn list(repository: &Arc<dyn Repository>, order: CatalogOrder) -> Result<()> {
    let table = TableUseCase::new(Arc::clone(repository));
    let entries = table
        .find_all_sorted(order)
        .try_next()
        .await
        .context("Failed to list entries")?
        .unwrap_or_default();

    for entry in &entries {
        println!(
            "{:>4}  {:<16}  {:<12}  {:>4}",
            entry.number,
            entry.name,
            categories(entry),
            entry.base_stats.total()
        );
    }
    Ok(())
}

async fn show(repository: &Arc<dyn Repository>, number: u32) -> Result<()> {
    let entry = repository
        .find(number)
        .try_next()
        .await
        .context("Failed to look up entry")?
        .flatten()
        .ok_or_else(|| anyhow!("No entry with number {}", number))?;

    let stats = &entry.base_stats;
    println!("No. {:03} {}", entry.number, entry.name);
    println!("  types:     {}", categories(&entry));
    println!("  abilities: {}", entry.abilities.join(", "));
    if !entry.hidden_abilities.is_empty() {
        println!("  hidden:    {}", entry.hidden_abilities.join(", "));
    }
    println!(
        "  stats:     hp {} / atk {} / def {} / spa {} / spd {} / spe {} (total {})",
        stats.hp,
        stats.attack,
        stats.defence,
        stats.sp_attack,
        stats.sp_defence,
        stats.speed,
        stats.total()
    );

    let detail = DetailUseCase::new(Arc::clone(repository));
    match detail.find_sprite(number).try_next().await {
        Ok(Some(Some(sprite))) => {
            println!("  sprite:    {}x{}", sprite.width(), sprite.height())
        }
        Ok(_) => println!("  sprite:    none"),
        Err(e) if !e.is_fatal() => warn!("Sprite unavailable: {}", e),
        Err(e) => return Err(e).context("Failed to resolve sprite"),
    }
    Ok(())
}

async fn images(repository: &Arc<dyn Repository>, number: u32) -> Result<()> {
    let detail = DetailUseCase::new(Arc::clone(repository));
    let (subscription, mut results) = subscribe(detail.find_all_images(number));

    let received = tokio::select! {
        result = results.recv() => Some(result),
        _ = signal::ctrl_c() => None,
    };
    let Some(result) = received else {
        info!("Interrupted, cancelling");
        subscription.cancel();
        subscription.join().await;
        bail!("Interrupted");
    };
    subscription.join().await;

    match result {
        None => println!("No animations known for No. {:03}", number),
        Some(Ok(animations)) if animations.is_empty() => {
            println!("No animations found for No. {:03}", number)
        }
        Some(Ok(animations)) => {
            for (i, animation) in animations.iter().enumerate() {
                let (width, height) = animation.dimensions();
                println!(
                    "{:>2}  {}x{}  {} frames  {:?}",
                    i,
                    width,
                    height,
                    animation.frame_count(),
                    animation.duration()
                );
            }
        }
        Some(Err(e)) => return Err(e).context("Failed to resolve animations"),
    }
    Ok(())
}

fn categories(entry: &CatalogEntry) -> String {
    entry
        .categories
        .iter()
        .map(|tag| tag.label())
        .collect::<Vec<_>>()
        .join("/")
}
