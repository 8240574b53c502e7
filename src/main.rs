use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use moodtrip::banner::{BannerInfo, print_banner, print_session_summary};
use moodtrip::config::Config;
use moodtrip::consts::{
    DEFAULT_BIND, DEFAULT_ENRICH_TIMEOUT_SECS, DEFAULT_IDLE_TIMEOUT_SECS, DEFAULT_MAX_VIDEOS,
    DEFAULT_MODEL, DEFAULT_PORT, default_db_path,
};
use moodtrip::enrich::gemini::GeminiGenerator;
use moodtrip::enrich::mymemory::MyMemoryTranslator;
use moodtrip::enrich::youtube::YouTubeSearch;
use moodtrip::enrich::{Enricher, Translator, localize};
use moodtrip::guide::{ConversationSpec, FirstContact, GuideEngine, replay};
use moodtrip::keys::{KeyStore, Provider};
use moodtrip::language::Language;
use moodtrip::repl::Repl;
use moodtrip::server::{self, AppState};
use moodtrip::session::MemoryStore;
use moodtrip::spinner::Spinner;

#[derive(Parser)]
#[command(name = "moodtrip", version, about = "Tell it how you feel, get a trip.")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// SQLite database for settings and API keys (use :memory: for ephemeral)
    #[arg(long, global = true)]
    db: Option<String>,

    /// Display language (saved choice is used when omitted)
    #[arg(short, long, value_enum, global = true)]
    lang: Option<Language>,

    /// Gemini model name
    #[arg(long, global = true)]
    model: Option<String>,

    /// Video recommendations per plan (0 disables search)
    #[arg(long, default_value_t = DEFAULT_MAX_VIDEOS, global = true)]
    videos: usize,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive chat and guided planning (default)
    Chat,
    /// Plan a trip from five answers and exit
    Plan {
        /// Mood, duration, budget, group, environment, in that order
        #[arg(required = true, num_args = 1..)]
        answers: Vec<String>,
    },
    /// Serve the guided conversation over HTTP
    Serve {
        /// Address to bind
        #[arg(long, default_value = DEFAULT_BIND)]
        bind: IpAddr,

        #[arg(short, long, default_value_t = DEFAULT_PORT)]
        port: u16,

        /// Seconds before an untouched session is evicted
        #[arg(long, default_value_t = DEFAULT_IDLE_TIMEOUT_SECS)]
        idle_timeout: u64,

        /// Seconds to wait for itinerary and videos before answering with the bare plan
        #[arg(long, default_value_t = DEFAULT_ENRICH_TIMEOUT_SECS)]
        enrich_timeout: u64,

        /// Require /start before answers (unknown sessions get 404)
        #[arg(long, default_value_t = false)]
        strict: bool,
    },
}

fn init_tracing(default_filter: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Resolve the database path, creating its directory when needed.
fn resolve_db(db: Option<String>) -> Result<String> {
    let path = match db {
        Some(path) => path,
        None => default_db_path()?.to_string_lossy().into_owned(),
    };
    if path != ":memory:"
        && let Some(parent) = std::path::Path::new(&path).parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    Ok(path)
}

#[tokio::main]
async fn main() -> Result<()> {
    // a missing .env is fine
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Chat);

    init_tracing(match command {
        Command::Serve { .. } => "moodtrip=info,tower_http=info",
        _ => "moodtrip=warn",
    });

    let db_path = resolve_db(cli.db)?;
    let keys = Arc::new(KeyStore::open(&db_path)?);
    let config = Config::open(&db_path)?;

    let language = match cli.lang {
        Some(language) => language,
        None => config.language()?,
    };
    let model = match cli.model {
        Some(model) => model,
        None => config.model()?.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
    };

    let generator = GeminiGenerator::new(Some(model.clone()), keys.clone())?;
    let videos = YouTubeSearch::new(keys.clone())?;
    let translator: Arc<dyn Translator> = Arc::new(MyMemoryTranslator::new()?);
    let enricher = Arc::new(Enricher::new(
        Arc::new(generator),
        Arc::new(videos),
        cli.videos,
    ));

    match command {
        Command::Chat => {
            let db_label = if db_path == ":memory:" {
                "ephemeral"
            } else {
                &db_path
            };
            print_banner(&BannerInfo {
                model: &model,
                language,
                gemini: keys.source(Provider::Gemini)?,
                youtube: keys.source(Provider::YouTube)?,
                db: db_label,
            });

            let mut repl = Repl::new(
                enricher,
                translator,
                keys,
                config,
                language,
                model,
                db_path.clone(),
            );
            repl.run().await?;
            print_session_summary(repl.plans_completed());
        }
        Command::Plan { answers } => {
            let spec = ConversationSpec::travel_planner();
            let plan = replay(&spec, &answers)?;

            let spinner = Spinner::start("Planning your trip...");
            let enriched = enricher.enrich(&plan).await;
            spinner.stop().await;

            println!("{}", localize(translator.as_ref(), &enriched.to_markdown(), language).await);
        }
        Command::Serve {
            bind,
            port,
            idle_timeout,
            enrich_timeout,
            strict,
        } => {
            let first_contact = if strict {
                FirstContact::Reject
            } else {
                FirstContact::Greet
            };
            let engine = GuideEngine::<String>::new(
                ConversationSpec::travel_planner(),
                Arc::new(MemoryStore::<String>::new()),
            )
            .with_first_contact(first_contact);

            for provider in Provider::ALL {
                if keys.api_key(provider)?.is_none() {
                    tracing::warn!(
                        "no {provider} key; set {} or run `/key {provider} <key>` in chat",
                        provider.env_var()
                    );
                }
            }

            let state = AppState {
                engine: Arc::new(engine),
                enricher,
                translator,
                enrich_timeout: Duration::from_secs(enrich_timeout),
                default_language: language,
            };
            let addr = SocketAddr::new(bind, port);
            server::serve(state, addr, Duration::from_secs(idle_timeout)).await?;
        }
    }

    Ok(())
}
