use anyhow::Result;
use axum::Router;
use clap::Parser;
use search_core::{EngineConfig, LeadingStopWords, StopWordSource};
use server::{build_app, ServerConfig};
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Directory of .txt documents to index
    #[arg(long, default_value = "./corpus")]
    corpus: PathBuf,
    /// Stop-word file, one word per line (default: built-in English list)
    #[arg(long, conflicts_with = "no_stop_words")]
    stop_words: Option<PathBuf>,
    /// Index every term, including common words
    #[arg(long, default_value_t = false)]
    no_stop_words: bool,
    /// Document count used for IDF (default: number of loaded documents)
    #[arg(long)]
    corpus_size: Option<usize>,
    /// Ignore stop words before the first indexed query term
    #[arg(long, default_value_t = false)]
    skip_leading_stop_words: bool,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let stop_words = match (args.stop_words, args.no_stop_words) {
        (_, true) => StopWordSource::None,
        (Some(path), false) => StopWordSource::File(path),
        (None, false) => StopWordSource::English,
    };
    let leading_stop_words = if args.skip_leading_stop_words { LeadingStopWords::Skip } else { LeadingStopWords::Empty };
    let config = ServerConfig {
        corpus_dir: args.corpus,
        stop_words,
        engine: EngineConfig { corpus_size: args.corpus_size, leading_stop_words },
        admin_token: std::env::var("ADMIN_TOKEN").ok(),
    };
    let app: Router = build_app(config)?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
