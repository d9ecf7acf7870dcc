mod server;

use chrono::Utc;
use clap::{Parser, Subcommand};
use medibot_core::{
    ChatEngine, ChatbotConfig, ComposerOptions, DisabledEnrichment, EnrichmentOptions,
    EnrichmentSource, IndexOptions, IndexedField, KnowledgeBase, MatcherOptions, OpenFdaClient,
    DEFAULT_OPENFDA_URL, DEFAULT_RELEVANCE_THRESHOLD,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "medibot", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Medicine dataset (CSV with a header row)
    #[arg(long, env = "MEDIBOT_DATASET", default_value = "Medicine_Details_Final.csv")]
    dataset: PathBuf,

    /// openFDA base URL
    #[arg(long, env = "MEDIBOT_OPENFDA_URL", default_value = DEFAULT_OPENFDA_URL)]
    openfda_url: String,

    /// Timeout for one openFDA lookup, in seconds
    #[arg(long, env = "MEDIBOT_FDA_TIMEOUT_SECS", default_value = "10")]
    fda_timeout_secs: u64,

    /// Skip openFDA enrichment entirely.
    #[arg(long, default_value_t = false)]
    no_fda: bool,

    /// Minimum cosine score for a dataset answer
    #[arg(long, env = "MEDIBOT_THRESHOLD", default_value_t = DEFAULT_RELEVANCE_THRESHOLD)]
    threshold: f64,

    /// Number of runner-up medicines listed under an answer
    #[arg(long, default_value = "1")]
    alternatives: usize,

    /// Largest word n-gram in the index (1 = single words)
    #[arg(long, default_value = "1")]
    ngram_max: usize,

    /// Also index the manufacturer column.
    #[arg(long, default_value_t = false)]
    index_manufacturer: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the chat page and JSON API.
    Serve {
        /// Address to listen on
        #[arg(long, env = "MEDIBOT_BIND", default_value = "0.0.0.0:5000")]
        bind: SocketAddr,
    },
    /// Answer a single question and exit.
    Ask {
        /// Question text
        #[arg(long)]
        query: String,
    },
}

impl Cli {
    fn config(&self) -> ChatbotConfig {
        let mut index = IndexOptions {
            ngram_max: self.ngram_max,
            ..IndexOptions::default()
        };
        if self.index_manufacturer {
            index.fields.push(IndexedField::Manufacturer);
        }

        ChatbotConfig {
            index,
            matcher: MatcherOptions {
                threshold: self.threshold,
                alternatives: self.alternatives,
            },
            enrichment: EnrichmentOptions {
                base_url: self.openfda_url.clone(),
                timeout: Duration::from_secs(self.fda_timeout_secs),
            },
            composer: ComposerOptions::default(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app_version = env!("CARGO_PKG_VERSION");

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = cli.config();

    info!(
        version = app_version,
        started_at = %Utc::now().to_rfc3339(),
        dataset = %cli.dataset.display(),
        "medibot boot"
    );

    let knowledge = KnowledgeBase::load(&cli.dataset, &config.index)?;

    if cli.no_fda {
        let engine = ChatEngine::new(knowledge, DisabledEnrichment, config);
        run(cli, engine).await
    } else {
        let client = OpenFdaClient::new(&config.enrichment)?;
        let engine = ChatEngine::new(knowledge, client, config);
        run(cli, engine).await
    }
}

async fn run<S>(cli: Cli, engine: ChatEngine<S>) -> anyhow::Result<()>
where
    S: EnrichmentSource + Send + Sync + 'static,
{
    match cli.command {
        Command::Serve { bind } => {
            let state = server::AppState::new(Arc::new(engine), cli.dataset);
            server::serve(bind, state).await
        }
        Command::Ask { query } => {
            println!("{}", engine.answer(&query).await);
            Ok(())
        }
    }
}
