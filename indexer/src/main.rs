use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use search_core::{EngineConfig, IndexSnapshot, LeadingStopWords, SearchEngine, StopWordSource};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build a TF-IDF inverted index over a directory of text files and search it", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the index and the file -> title map as JSON
    Dump {
        #[command(flatten)]
        corpus: CorpusArgs,
    },
    /// Search interactively, or run a single query with --query
    Search {
        #[command(flatten)]
        corpus: CorpusArgs,
        /// Run one query and exit
        #[arg(long)]
        query: Option<String>,
        /// List boolean matches without TF-IDF ranking
        #[arg(long, default_value_t = false)]
        unranked: bool,
    },
}

#[derive(Args)]
struct CorpusArgs {
    /// Directory of .txt documents; the first line of each is its title
    #[arg(long)]
    input: PathBuf,
    /// Stop-word file, one word per line (default: built-in English list)
    #[arg(long, conflicts_with = "no_stop_words")]
    stop_words: Option<PathBuf>,
    /// Index every term, including common words
    #[arg(long, default_value_t = false)]
    no_stop_words: bool,
    /// Document count used for IDF (default: number of loaded documents)
    #[arg(long)]
    corpus_size: Option<usize>,
    /// Ignore stop words before the first indexed query term instead of matching nothing
    #[arg(long, default_value_t = false)]
    skip_leading_stop_words: bool,
}

impl CorpusArgs {
    fn stop_word_source(&self) -> StopWordSource {
        match (&self.stop_words, self.no_stop_words) {
            (_, true) => StopWordSource::None,
            (Some(path), false) => StopWordSource::File(path.clone()),
            (None, false) => StopWordSource::English,
        }
    }

    fn load_engine(&self) -> Result<SearchEngine> {
        let stop_words = self.stop_word_source().load()?;
        let config = EngineConfig {
            corpus_size: self.corpus_size,
            leading_stop_words: if self.skip_leading_stop_words {
                LeadingStopWords::Skip
            } else {
                LeadingStopWords::Empty
            },
        };
        SearchEngine::load(&self.input, stop_words, config)
            .with_context(|| format!("indexing {}", self.input.display()))
    }
}

#[derive(Serialize)]
struct Dump<'a> {
    built_at: String,
    num_docs: usize,
    num_terms: usize,
    #[serde(flatten)]
    snapshot: IndexSnapshot<'a>,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(io::stderr).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Dump { corpus } => {
            let engine = corpus.load_engine()?;
            dump(&engine, &mut io::stdout().lock())
        }
        Commands::Search { corpus, query, unranked } => {
            let engine = corpus.load_engine()?;
            let mut out = io::stdout().lock();
            match query {
                Some(q) => print_results(&engine, &q.to_lowercase(), unranked, &mut out),
                None => run_searches(&engine, io::stdin().lock(), &mut out, unranked),
            }
        }
    }
}

fn dump<W: Write>(engine: &SearchEngine, out: &mut W) -> Result<()> {
    let index = engine.index();
    let dump = Dump {
        built_at: time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_else(|_| "".into()),
        num_docs: index.num_documents(),
        num_terms: index.num_terms(),
        snapshot: index.snapshot(),
    };
    serde_json::to_writer_pretty(&mut *out, &dump)?;
    writeln!(out)?;
    Ok(())
}

/// Prompt for queries until an empty line or end of input.
fn run_searches<R: BufRead, W: Write>(engine: &SearchEngine, mut input: R, out: &mut W, unranked: bool) -> Result<()> {
    let mut line = String::new();
    loop {
        write!(out, "Query (empty query to stop): ")?;
        out.flush()?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        let query = line.trim_end_matches(['\n', '\r']).to_lowercase();
        if query.is_empty() {
            break;
        }
        print_results(engine, &query, unranked, out)?;
    }
    Ok(())
}

fn print_results<W: Write>(engine: &SearchEngine, query: &str, unranked: bool, out: &mut W) -> Result<()> {
    let rows: Vec<(String, String)> = if unranked {
        engine
            .matches(query)
            .into_iter()
            .map(|key| {
                let title = engine.index().title(&key).unwrap_or_default().to_string();
                (title, key)
            })
            .collect()
    } else {
        engine.search(query)?.into_iter().map(|hit| (hit.title, hit.key)).collect()
    };
    tracing::debug!(query, hits = rows.len(), "query answered");

    writeln!(out, "Results for query '{}':", query)?;
    if rows.is_empty() {
        writeln!(out, "No results match that query.")?;
    }
    for (i, (title, key)) in rows.iter().enumerate() {
        writeln!(out, "{}.  Title: {},  File: {}", i + 1, title, key)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use search_core::Document;
    use std::io::Cursor;

    fn engine(config: EngineConfig) -> SearchEngine {
        let docs = vec![
            Document::parse("test1.txt", "File 1 Title\napple ball carrot\n"),
            Document::parse("test2.txt", "File 2 Title\nball carrot dog\n"),
        ];
        SearchEngine::from_documents(docs, ["the"].into_iter().collect(), config)
    }

    fn session(engine: &SearchEngine, input: &str, unranked: bool) -> String {
        let mut out = Vec::new();
        run_searches(engine, Cursor::new(input), &mut out, unranked).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn interactive_loop_prints_ranked_results() {
        let out = session(&engine(EngineConfig::default()), "BALL\nnope\n\napple\n", false);
        assert!(out.contains("Results for query 'ball':"));
        assert!(out.contains("1.  Title: File 1 Title,  File: test1.txt"));
        assert!(out.contains("2.  Title: File 2 Title,  File: test2.txt"));
        assert!(out.contains("Results for query 'nope':\nNo results match that query."));
        // stops at the empty line
        assert!(!out.contains("'apple'"));
    }

    #[test]
    fn loop_ends_at_eof() {
        let out = session(&engine(EngineConfig::default()), "dog", true);
        assert!(out.contains("1.  Title: File 2 Title,  File: test2.txt"));
        assert!(out.ends_with("Query (empty query to stop): "));
    }

    #[test]
    fn leading_stop_word_flag() {
        let strict = session(&engine(EngineConfig::default()), "the dog\n", false);
        assert!(strict.contains("No results match that query."));
        let config = EngineConfig { leading_stop_words: LeadingStopWords::Skip, ..EngineConfig::default() };
        let lenient = session(&engine(config), "the dog\n", false);
        assert!(lenient.contains("File: test2.txt"));
    }

    #[test]
    fn dump_is_json() {
        let mut out = Vec::new();
        dump(&engine(EngineConfig::default()), &mut out).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json["num_docs"], 2);
        assert_eq!(json["index"]["ball"], serde_json::json!(["test1.txt", "test2.txt"]));
        assert_eq!(json["titles"][1]["file"], "test2.txt");
        assert!(json["built_at"].is_string());
    }

    #[test]
    fn corpus_args_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "Apples\nthe apple orchard\n").unwrap();
        let args = CorpusArgs {
            input: dir.path().to_path_buf(),
            stop_words: None,
            no_stop_words: true,
            corpus_size: None,
            skip_leading_stop_words: false,
        };
        let engine = args.load_engine().unwrap();
        assert!(engine.index().contains_term("the"));
        assert_eq!(engine.search("orchard").unwrap()[0].title, "Apples");
    }
}
