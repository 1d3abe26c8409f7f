use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use steamdash_catalog::analytics;
use steamdash_catalog::{import_dir, read_dump, DocumentStore};
use steamdash_core::config::{Config, SearchSettings, Settings};
use steamdash_core::tags::available_tags;
use steamdash_core::traits::CatalogStore;
use steamdash_core::{Error, FilterSpec, GameRecord};
use steamdash_search::{ingest, SearchService, SharedHandle};
use steamdash_text::GameIndex;

mod render;

static INDEX: SharedHandle<GameIndex> = SharedHandle::new();
static CATALOG: SharedHandle<DocumentStore> = SharedHandle::new();

#[derive(Parser)]
#[command(name = "steamdash")]
#[command(about = "Search and explore a scraped Steam catalog", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Cmd {
    /// Replace the catalog with scrape dumps and rebuild the search index
    Ingest {
        /// A single dump, CSV or JSON-Lines by extension
        #[arg(long, conflicts_with = "from")]
        file: Option<PathBuf>,
        /// Directory of *.csv / *.jsonl dumps (defaults to data.import_dir)
        #[arg(long)]
        from: Option<PathBuf>,
    },
    /// Search games by text, category and price
    Search(SearchArgs),
    /// Categories available as search filters
    Tags,
    /// Catalog statistics
    Stats {
        #[command(subcommand)]
        view: StatsView,
    },
    /// Browse individual games
    Explore {
        #[command(subcommand)]
        view: ExploreView,
    },
}

#[derive(Args)]
struct SearchArgs {
    /// Free text matched against title, tags and reviews
    query: Vec<String>,
    /// Highest price to show, inclusive
    #[arg(long)]
    max_price: Option<f64>,
    /// Hide free games
    #[arg(long)]
    paid_only: bool,
    /// Required category; repeat for several
    #[arg(long = "tag")]
    tags: Vec<String>,
    /// Rows to show (clamped to the configured range)
    #[arg(long)]
    limit: Option<usize>,
    /// Show every match
    #[arg(long, conflicts_with = "limit")]
    all: bool,
}

#[derive(Subcommand)]
enum StatsView {
    /// Most common categories
    Tags {
        #[arg(long, default_value_t = 25)]
        limit: usize,
    },
    /// Price distribution
    Prices,
    /// Review score distribution
    Reviews,
    /// Best and worst categories by average review score
    TagReviews {
        #[arg(long, default_value_t = 10)]
        top: usize,
        #[arg(long, default_value_t = 10)]
        bottom: usize,
    },
    /// Average review score per price range
    PriceReviews,
}

#[derive(Subcommand)]
enum ExploreView {
    /// Random games
    Sample {
        #[arg(long, default_value_t = 5)]
        n: usize,
    },
    /// Lowest rated games
    Worst {
        #[arg(long, default_value_t = 5)]
        n: usize,
    },
    /// Games whose title matches a pattern
    Title {
        pattern: String,
        #[arg(long, default_value_t = 10)]
        n: usize,
    },
}

impl SearchArgs {
    fn to_spec(&self, search: &SearchSettings) -> FilterSpec {
        let query = self.query.join(" ");
        let (display_limit, fetch_all_mode) = if self.all {
            (search.show_all_limit, true)
        } else {
            (search.clamp_display_limit(self.limit.unwrap_or(search.default_display_limit)), false)
        };
        FilterSpec {
            query: (!query.trim().is_empty()).then_some(query),
            max_price: self.max_price.unwrap_or(search.default_max_price),
            include_free: !self.paid_only,
            selected_tags: self.tags.iter().map(|t| t.trim().to_string()).collect(),
            display_limit,
            fetch_all_mode,
        }
    }
}

struct App {
    settings: Settings,
    base: PathBuf,
}

impl App {
    fn catalog(&self) -> Result<Arc<DocumentStore>> {
        CATALOG.get_or_try_init(|| DocumentStore::open(&self.settings.data.catalog_path(&self.base)))
    }

    fn index(&self) -> Result<Arc<GameIndex>> {
        INDEX.get_or_try_init(|| {
            let dir = self.settings.data.index_dir(&self.base);
            if !dir.exists() {
                return Err(Error::NotFound(format!("search index at {} (run `steamdash ingest` first)", dir.display())).into());
            }
            Ok(GameIndex::open(&dir)?.with_fuzzy_distance(self.settings.search.fuzzy_distance))
        })
    }

    fn records(&self) -> Result<Vec<GameRecord>> {
        let records = self.catalog()?.all()?;
        if records.is_empty() { warn!("catalog is empty; run `steamdash ingest` first"); }
        Ok(records)
    }

    fn ingest(&self, file: Option<PathBuf>, from: Option<PathBuf>) -> Result<()> {
        let records = match file {
            Some(file) => read_dump(&file)?,
            None => import_dir(&from.unwrap_or_else(|| self.settings.data.import_dir(&self.base)))?,
        };
        let total = records.len();
        let catalog = self.catalog()?;
        let index_dir = self.settings.data.index_dir(&self.base);
        let indexed = ingest(catalog.as_ref(), records, || Ok(GameIndex::create(&index_dir)?.with_progress(true)))?;
        INDEX.reset();
        println!("Ingest complete: {} games read, {} indexed", total, indexed);
        Ok(())
    }

    fn search(&self, args: &SearchArgs, as_json: bool) -> Result<()> {
        let search = &self.settings.search;
        let spec = args.to_spec(search);
        if !spec.has_criteria(search.default_max_price) && args.max_price.is_none() {
            println!("Enter a search term or pick a filter to see results.");
            return Ok(());
        }
        let service = SearchService::new(self.index()?, search.fetch_policy()).with_whitelist(self.settings.tags.whitelist());
        let outcome = service.search(&spec)?;
        render::results(&outcome.results, as_json)
    }

    fn tags(&self, as_json: bool) -> Result<()> {
        let catalog = self.catalog()?;
        let tags = available_tags(catalog.as_ref(), &self.settings.tags.whitelist());
        render::tags(&tags, as_json)
    }

    fn stats(&self, view: &StatsView, as_json: bool) -> Result<()> {
        let records = self.records()?;
        match view {
            StatsView::Tags { limit } => render::tag_counts(&analytics::top_tags(&records, *limit), as_json),
            StatsView::Prices => render::buckets(&analytics::price_histogram(&records), as_json),
            StatsView::Reviews => render::buckets(&analytics::review_histogram(&records), as_json),
            StatsView::TagReviews { top, bottom } => {
                let ranking = analytics::tag_review_ranking(&records);
                let best = &ranking[..(*top).min(ranking.len())];
                render::tag_reviews(best, &analytics::lowest_rated_tags(&ranking, *bottom), as_json)
            }
            StatsView::PriceReviews => render::price_reviews(&analytics::price_review_buckets(&records), as_json),
        }
    }

    fn explore(&self, view: &ExploreView, as_json: bool) -> Result<()> {
        let records = self.records()?;
        let picked = match view {
            ExploreView::Sample { n } => analytics::sample(&records, *n),
            ExploreView::Worst { n } => analytics::worst_rated(&records, *n),
            ExploreView::Title { pattern, n } => analytics::title_matches(&records, pattern, *n),
        };
        render::records(&picked, as_json)
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    let app = App { settings: config.settings()?, base: std::env::current_dir()? };
    match cli.cmd {
        Cmd::Ingest { file, from } => app.ingest(file, from),
        Cmd::Search(args) => app.search(&args, cli.json),
        Cmd::Tags => app.tags(cli.json),
        Cmd::Stats { view } => app.stats(&view, cli.json),
        Cmd::Explore { view } => app.explore(&view, cli.json),
    }
}
