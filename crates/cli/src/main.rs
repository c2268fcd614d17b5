//! Command-line front end for the Comparely site.
//!
//! Usage:
//!     comparely render availability --data-dir demos --query butter
//!     comparely render pricing --seed 7 --regenerate 2 --format json
//!     comparely register --brand Acme --email a@b.com --password secret
//!     comparely shortcut zepto
//!     comparely whoami

use anyhow::{bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use comparely_fetch::{DatasetSource, FetchConfig, FileSource, HttpSource};
use comparely_site::{
    lock_page, FileStore, MountedView, Provider, RegistrationForm, RegistrationHandler,
    Route, SharedPage, Site, SiteConfig,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "comparely")]
#[command(about = "Render and drive the Comparely brand analytics pages")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Brand store file
    #[arg(long, global = true, default_value = "comparely-store.json")]
    store: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a page
    Render {
        /// Page to render (availability, competitors, pricing, register)
        route: Route,

        /// Directory the dataset is read from
        #[arg(long, default_value = ".", conflicts_with = "base_url")]
        data_dir: PathBuf,

        /// Web server the dataset is fetched from
        #[arg(long)]
        base_url: Option<String>,

        /// Dataset path
        #[arg(long, default_value = "data.json")]
        dataset: String,

        /// Availability search query
        #[arg(short, long)]
        query: Option<String>,

        /// Seed for the pricing random source
        #[arg(long)]
        seed: Option<u64>,

        /// Extra pricing strategy cycles
        #[arg(long, default_value = "0")]
        regenerate: usize,

        /// Output format
        #[arg(short, long, value_enum, default_value = "html")]
        format: Format,
    },

    /// Register a brand
    Register {
        #[arg(long)]
        brand: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },

    /// One-click registration through a provider
    Shortcut {
        /// blinkit, zepto or goat
        provider: Provider,
    },

    /// Print the registered brand
    Whoami,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Html,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("comparely=debug".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            route,
            data_dir,
            base_url,
            dataset,
            query,
            seed,
            regenerate,
            format,
        } => {
            let config = SiteConfig {
                dataset_path: dataset,
                ..Default::default()
            };
            let options = RenderOptions {
                route,
                query,
                seed,
                regenerate,
                format,
            };
            match base_url {
                Some(base_url) => {
                    let source = HttpSource::new(FetchConfig {
                        base_url,
                        ..Default::default()
                    })?;
                    run_render(Site::new(source, config), options).await?;
                }
                None => run_render(Site::new(FileSource::new(data_dir), config), options).await?,
            }
        }
        Commands::Register {
            brand,
            email,
            password,
        } => {
            let mut handler = RegistrationHandler::new(FileStore::new(&cli.store), &SiteConfig::default());
            let redirect = handler.submit(&RegistrationForm::new(brand, email, password))?;
            println!("Registered. Continue to {}", redirect.location());
        }
        Commands::Shortcut { provider } => {
            let mut handler = RegistrationHandler::new(FileStore::new(&cli.store), &SiteConfig::default());
            let redirect = handler.shortcut(provider)?;
            println!("Registered via {}. Continue to {}", provider, redirect.location());
        }
        Commands::Whoami => {
            let handler = RegistrationHandler::new(FileStore::new(&cli.store), &SiteConfig::default());
            match handler.registered_brand()? {
                Some(brand) => println!("{}", brand),
                None => println!("No brand registered"),
            }
        }
    }

    Ok(())
}

struct RenderOptions {
    route: Route,
    query: Option<String>,
    seed: Option<u64>,
    regenerate: usize,
    format: Format,
}

async fn run_render<S: DatasetSource>(site: Site<S>, options: RenderOptions) -> Result<()> {
    let rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let (page, view) = site.open(options.route, rng).await?;
    let Some(view) = view else {
        bail!("{} page has no view to mount", options.route);
    };

    match view {
        MountedView::Availability(view) => {
            if let Some(query) = options.query {
                view.search(query);
                // Let the debounced re-render fire.
                tokio::time::sleep(site.config().search_debounce + Duration::from_millis(50)).await;
            }
        }
        MountedView::Pricing(mut view) => {
            for _ in 0..options.regenerate {
                view.regenerate(&mut lock_page(&page))?;
            }
            if let Some(reco) = view.recommendation() {
                tracing::info!(
                    product = %reco.product,
                    decision = reco.decision.label(),
                    "Showing strategy"
                );
            }
        }
        MountedView::Competitors(view) => {
            tracing::info!(gap = ?view.gap(), "Availability gap");
        }
        MountedView::Registration => {}
    }

    print_page(&page, options.format)
}

fn print_page(page: &SharedPage, format: Format) -> Result<()> {
    let page = lock_page(page);
    match format {
        Format::Html => println!("{}", page.to_html()),
        Format::Json => println!("{}", serde_json::to_string_pretty(&page.snapshot())?),
    }
    Ok(())
}
