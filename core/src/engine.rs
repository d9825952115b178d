use crate::corpus::load_corpus;
use crate::document::{DocKey, Document};
use crate::error::Result;
use crate::index::{build_index, InvertedIndex};
use crate::query::{search_with, LeadingStopWords};
use crate::rank::rank_with;
use crate::stopwords::StopWords;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Document count used for IDF. Falls back to the number of indexed documents.
    pub corpus_size: Option<usize>,
    pub leading_stop_words: LeadingStopWords,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub key: DocKey,
    pub title: String,
    pub score: f64,
}

/// A built index plus the settings used to query it. Construct once, then
/// share by reference for querying.
#[derive(Debug)]
pub struct SearchEngine {
    index: InvertedIndex,
    config: EngineConfig,
}

impl SearchEngine {
    pub fn new(index: InvertedIndex, config: EngineConfig) -> Self {
        Self { index, config }
    }

    pub fn from_documents<I>(documents: I, stop_words: StopWords, config: EngineConfig) -> Self
    where
        I: IntoIterator<Item = Document>,
    {
        Self::new(build_index(documents, stop_words), config)
    }

    /// Load the `.txt` corpus under `dir` and index it.
    pub fn load<P: AsRef<Path>>(dir: P, stop_words: StopWords, config: EngineConfig) -> Result<Self> {
        let docs = load_corpus(dir)?;
        let engine = Self::from_documents(docs, stop_words, config);
        tracing::info!(
            num_docs = engine.index.num_documents(),
            num_terms = engine.index.num_terms(),
            corpus_size = engine.corpus_size(),
            "index built"
        );
        Ok(engine)
    }

    pub fn index(&self) -> &InvertedIndex {
        &self.index
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn corpus_size(&self) -> usize {
        self.config.corpus_size.unwrap_or_else(|| self.index.num_documents())
    }

    /// Unranked boolean matches, in resolver order.
    pub fn matches(&self, query: &str) -> Vec<DocKey> {
        search_with(&self.index, query, self.config.leading_stop_words)
    }

    /// Ranked hits with titles, best first.
    pub fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        let ranked = rank_with(&self.index, query, self.corpus_size(), self.config.leading_stop_words)?;
        Ok(ranked
            .into_iter()
            .map(|r| {
                let title = self.index.title(&r.key).unwrap_or_default().to_string();
                SearchHit { key: r.key, title, score: r.score }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn docs() -> Vec<Document> {
        vec![
            Document::parse("test1.txt", "File 1 Title\napple ball carrot\n"),
            Document::parse("test2.txt", "File 2 Title\nball carrot dog\n"),
        ]
    }

    #[test]
    fn search_returns_titles() {
        let engine = SearchEngine::from_documents(docs(), StopWords::empty(), EngineConfig::default());
        assert_eq!(engine.corpus_size(), 2);
        let hits = engine.search("carrot dog").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].key, "test2.txt");
        assert_eq!(hits[0].title, "File 2 Title");
    }

    #[test]
    fn configured_corpus_size_wins() {
        let config = EngineConfig { corpus_size: Some(1), ..EngineConfig::default() };
        let engine = SearchEngine::from_documents(docs(), StopWords::empty(), config);
        assert!(matches!(
            engine.search("ball"),
            Err(Error::DocumentFrequencyExceedsCorpus { .. })
        ));
        assert_eq!(engine.matches("ball"), ["test1.txt", "test2.txt"]);
    }

    #[test]
    fn policy_flows_through() {
        let stop_words: StopWords = ["the"].into_iter().collect();
        let strict = SearchEngine::from_documents(docs(), stop_words.clone(), EngineConfig::default());
        assert!(strict.search("the dog").unwrap().is_empty());

        let config = EngineConfig { leading_stop_words: LeadingStopWords::Skip, ..EngineConfig::default() };
        let lenient = SearchEngine::from_documents(docs(), stop_words, config);
        assert_eq!(lenient.search("the dog").unwrap()[0].key, "test2.txt");
    }
}
