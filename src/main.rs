use anyhow::{bail, Context, Result};
use chrono::{Local, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::interval;
use tracing::{error, info, warn};

use ld_catalog::config::Config;
use ld_catalog::i18n::Translations;
use ld_catalog::loader::{showcase_loader, tools_loader, DataLoader, LoadPhase, LoadState};
use ld_catalog::models::{write_snapshot, CatalogEntry, Locale, ShowcaseItem, Tool, WishForm, WishItem, WishStatus};
use ld_catalog::parsers::LinkPreview;
use ld_catalog::storage::SqliteStore;
use ld_catalog::utils::http::create_client;
use ld_catalog::{WishError, WishingPool};

#[derive(Parser)]
#[command(name = "ld-catalog")]
#[command(about = "Load the L&D tools catalog and manage the wishing pool", long_about = None)]
struct Cli {
    /// Configuration file (defaults to ./catalog.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Display locale: en or zh
    #[arg(short, long, global = true)]
    locale: Option<Locale>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Keep both feeds loaded, refreshing on the configured interval
    Serve,

    /// Load the tools feed once and print it
    Tools {
        /// Also print the loader's narration
        #[arg(short, long)]
        verbose: bool,
    },

    /// Load the showcase feed once and print it
    Showcase {
        /// Also print the loader's narration
        #[arg(short, long)]
        verbose: bool,
    },

    /// Load a feed and write it out as a fresh snapshot document
    Export {
        #[arg(value_enum)]
        feed: Feed,

        /// Destination file (replaced as a whole)
        out: PathBuf,
    },

    /// Manage the wishing pool
    Wish {
        #[command(subcommand)]
        action: WishCommand,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Feed {
    Tools,
    Showcase,
}

#[derive(Subcommand)]
enum WishCommand {
    /// List wishes, newest first
    List,

    /// Submit a new wish
    Add {
        #[arg(short, long)]
        requester: String,

        #[arg(short, long)]
        wish: String,
    },

    /// Set a wish's status
    Status { id: String, status: WishStatus },

    /// Move a wish to its next status (pending, approved, rejected)
    Cycle { id: String },

    /// Delete a wish
    Remove { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing()?;

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(locale) = cli.locale {
        config.locale = locale;
    }
    let translations = Translations::builtin();

    match cli.command {
        Commands::Serve => serve(&config, &translations).await,
        Commands::Tools { verbose } => {
            let client = create_client(&config).context("Failed to build HTTP client")?;
            let state = tools_loader(&config, client).load().await;
            print_tools(&state, config.locale, &translations);
            print_narration(&state, verbose);
            Ok(())
        }
        Commands::Showcase { verbose } => {
            let client = create_client(&config).context("Failed to build HTTP client")?;
            let state = showcase_loader(&config, client).load().await;
            print_showcase(&state, config.locale, &translations);
            print_narration(&state, verbose);
            Ok(())
        }
        Commands::Export { feed, out } => {
            let client = create_client(&config).context("Failed to build HTTP client")?;
            match feed {
                Feed::Tools => export(tools_loader(&config, client), &out).await,
                Feed::Showcase => export(showcase_loader(&config, client), &out).await,
            }
        }
        Commands::Wish { action } => run_wish(&config, &translations, action),
    }
}

fn init_tracing() -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("ld_catalog=info".parse()?);

    let json = std::env::var("LOG_FORMAT").map(|v| v == "json").unwrap_or(false);
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}

async fn serve(config: &Config, translations: &Translations) -> Result<()> {
    info!("Starting L&D catalog");

    let client = create_client(config).context("Failed to build HTTP client")?;
    let tools = tools_loader(config, client.clone());
    let showcase = showcase_loader(config, client);

    if config.refresh_interval_seconds == 0 {
        let (tools_state, showcase_state) = futures::join!(tools.load(), showcase.load());
        log_summary(&tools_state, config.locale, translations);
        log_summary(&showcase_state, config.locale, translations);
        return Ok(());
    }

    let mut ticker = interval(Duration::from_secs(config.refresh_interval_seconds));

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
                return Ok(());
            }
        }

        info!("--- Refreshing catalog at {} ---", Local::now().format("%Y-%m-%d %H:%M:%S"));

        // The two feeds are independent; each one's chain stays sequential.
        let (tools_state, showcase_state) = futures::join!(tools.refresh(), showcase.refresh());
        log_summary(&tools_state, config.locale, translations);
        log_summary(&showcase_state, config.locale, translations);

        info!("Refresh completed, waiting {} seconds", config.refresh_interval_seconds);
    }
}

fn log_summary<T: CatalogEntry>(state: &LoadState<T>, locale: Locale, t: &Translations) {
    let source = state.source.as_deref().unwrap_or("none");
    match state.phase {
        LoadPhase::ReadyStale => warn!(
            "{}: {} ({} items from {})",
            T::LIST_FIELD,
            t.t(locale, "loader.stale"),
            state.items().len(),
            source
        ),
        _ if state.has_error() => error!("{}: {}", T::LIST_FIELD, t.t(locale, "loader.failed")),
        _ => info!("{}: {} items from {}", T::LIST_FIELD, state.items().len(), source),
    }
}

async fn export<T: CatalogEntry>(loader: DataLoader<T>, out: &Path) -> Result<()> {
    let state = loader.load().await;
    if state.has_error() {
        bail!("Nothing to export: no {} source returned data", T::LIST_FIELD);
    }
    if state.is_stale() {
        warn!("Exporting bundled {} data; remote sources were unavailable", T::LIST_FIELD);
    }

    write_snapshot(out, state.items(), Utc::now())
        .with_context(|| format!("Failed to write {}", out.display()))?;
    println!("Wrote {} {} to {}", state.items().len(), T::LIST_FIELD, out.display());
    Ok(())
}

fn print_status_line<T>(state: &LoadState<T>, title_key: &str, locale: Locale, t: &Translations) {
    println!("== {} ==", t.t(locale, title_key));
    if let Some(ts) = state.snapshot.last_updated {
        println!(
            "{}: {}",
            t.t(locale, "lastUpdated"),
            ts.with_timezone(&Local).format("%Y-%m-%d %H:%M")
        );
    }
    if state.is_stale() {
        println!("! {}", t.t(locale, "loader.stale"));
    }
    if state.has_error() {
        println!("! {}", t.t(locale, "loader.failed"));
    }
    println!();
}

fn print_tools(state: &LoadState<Tool>, locale: Locale, t: &Translations) {
    print_status_line(state, "tools.title", locale, t);

    for tool in state.items() {
        let scope = if tool.is_internal == Some(true) {
            t.t(locale, "tools.internal")
        } else {
            t.t(locale, "tools.external")
        };
        println!(
            "[{}] {} ({} | {})",
            tool.icon,
            tool.title(locale),
            tool.category.text(locale, "-"),
            scope
        );
        println!("    {}", tool.description.text(locale, "-"));

        let features = tool.features.get(locale);
        if !features.is_empty() {
            println!("    * {}", features.join(" * "));
        }
        if let Some(remarks) = tool.remarks.as_ref().filter(|r| !r.is_blank()) {
            println!("    {}: {}", t.t(locale, "tools.remarks"), remarks.text(locale, "-"));
        }
        if let LinkPreview::Web { url, .. } | LinkPreview::Plain { url } = tool.link_preview() {
            println!("    {}: {}", t.t(locale, "link.visit"), url);
        }
        println!(
            "    {}: {}",
            t.t(locale, "tools.tutorial"),
            describe_link(&tool.tutorial_preview(), locale, t)
        );
    }
}

fn print_showcase(state: &LoadState<ShowcaseItem>, locale: Locale, t: &Translations) {
    print_status_line(state, "showcase.title", locale, t);

    for item in state.items() {
        println!("{:>4}  {}", item.sn, item.title(locale));
        println!("      {}: {}", t.t(locale, "showcase.owner"), item.pic);
        println!("      {}", describe_link(&item.link_preview(), locale, t));
    }
}

fn describe_link(preview: &LinkPreview, locale: Locale, t: &Translations) -> String {
    match preview {
        LinkPreview::Unavailable => t.t(locale, "link.comingSoon").to_string(),
        LinkPreview::Video { id, thumbnail, .. } => format!("YouTube {} ({})", id, thumbnail),
        LinkPreview::Web { url, domain, .. } => format!("{} ({})", domain, url),
        LinkPreview::Plain { url } => url.clone(),
    }
}

fn print_narration<T>(state: &LoadState<T>, verbose: bool) {
    if !verbose {
        return;
    }
    println!();
    for line in &state.narration {
        println!("> {}", line);
    }
}

fn run_wish(config: &Config, t: &Translations, action: WishCommand) -> Result<()> {
    let db_path = &config.wishing_pool.db_path;
    let store = SqliteStore::open(db_path).with_context(|| format!("Failed to open {}", db_path.display()))?;
    let mut pool = WishingPool::open_with_key(store, config.wishing_pool.storage_key.clone())?;
    let locale = config.locale;

    match action {
        WishCommand::List => print_wishes(pool.items(), locale, t),
        WishCommand::Add { requester, wish } => match pool.add(WishForm::new(requester, wish)) {
            Ok(item) => println!("{} [{}] {}", t.t(locale, "wishingPool.successMessage"), item.sn, item.id),
            Err(WishError::BlankField(field)) => {
                bail!("{} ({})", t.t(locale, "wishingPool.error.blank"), field)
            }
            Err(e) => return Err(e.into()),
        },
        WishCommand::Status { id, status } => {
            if pool.get(&id).is_none() {
                warn!("No wish with id {}", id);
            }
            pool.set_status(&id, status)?;
        }
        WishCommand::Cycle { id } => match pool.cycle_status(&id)? {
            Some(status) => println!("{} -> {}", id, t.status_label(locale, status)),
            None => warn!("No wish with id {}", id),
        },
        WishCommand::Remove { id } => pool.remove(&id)?,
    }

    Ok(())
}

fn print_wishes(items: &[WishItem], locale: Locale, t: &Translations) {
    println!("== {} ==", t.t(locale, "wishingPool.title"));
    if items.is_empty() {
        println!("{}", t.t(locale, "wishingPool.noItems"));
        return;
    }

    for item in items {
        println!(
            "{}  {:<10} {:<16} {}  ({}, {})",
            item.sn,
            t.status_label(locale, item.status),
            item.requester,
            item.wish,
            item.created_at,
            item.id
        );
    }
}
