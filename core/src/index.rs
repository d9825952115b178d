use crate::document::{DocKey, Document};
use crate::stopwords::StopWords;
use crate::tokenizer::normalize_term;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Term to document inverted index, with the title map and per-document term
/// counts built in the same pass.
#[derive(Debug, Clone, Default)]
pub struct InvertedIndex {
    postings: HashMap<String, Vec<DocKey>>, // insertion ordered, no duplicates
    titles: HashMap<DocKey, String>,
    doc_order: Vec<DocKey>,
    term_counts: HashMap<DocKey, HashMap<String, u32>>,
    stop_words: StopWords,
}

/// Serializable view of the index for dumping. Terms are sorted; titles
/// follow document insertion order.
#[derive(Debug, Serialize)]
pub struct IndexSnapshot<'a> {
    pub index: BTreeMap<&'a str, &'a [DocKey]>,
    pub titles: Vec<TitleEntry<'a>>,
}

#[derive(Debug, Serialize)]
pub struct TitleEntry<'a> {
    pub file: &'a str,
    pub title: &'a str,
}

/// Build a fresh index over `documents`.
pub fn build_index<I>(documents: I, stop_words: StopWords) -> InvertedIndex
where
    I: IntoIterator<Item = Document>,
{
    let mut index = InvertedIndex::new(stop_words);
    index.add_documents(documents);
    index
}

impl InvertedIndex {
    pub fn new(stop_words: StopWords) -> Self {
        Self { stop_words, ..Self::default() }
    }

    /// Fold documents into the index. Every term is recorded during the scan;
    /// stop-word keys are purged once the whole batch is in. Documents whose
    /// key is already indexed are skipped.
    pub fn add_documents<I>(&mut self, documents: I)
    where
        I: IntoIterator<Item = Document>,
    {
        let mut added = 0usize;
        let mut skipped = 0usize;
        for doc in documents {
            if self.titles.contains_key(&doc.key) {
                skipped += 1;
                continue;
            }
            self.scan(doc);
            added += 1;
        }
        let purged = self.purge_stop_words();
        tracing::debug!(added, skipped, purged, num_terms = self.postings.len(), "indexed documents");
    }

    fn scan(&mut self, doc: Document) {
        let mut counts: HashMap<String, u32> = HashMap::new();
        for term in doc.body.iter().filter_map(|raw| normalize_term(raw)) {
            *counts.entry(term).or_insert(0) += 1;
        }
        // doc.key is new to the index, so appending keeps postings duplicate free
        for term in counts.keys() {
            self.postings.entry(term.clone()).or_default().push(doc.key.clone());
        }
        self.titles.insert(doc.key.clone(), doc.title);
        self.term_counts.insert(doc.key.clone(), counts);
        self.doc_order.push(doc.key);
    }

    fn purge_stop_words(&mut self) -> usize {
        if self.stop_words.is_empty() {
            return 0;
        }
        let before = self.postings.len();
        let stop_words = &self.stop_words;
        self.postings.retain(|term, _| !stop_words.contains(term));
        for counts in self.term_counts.values_mut() {
            counts.retain(|term, _| !stop_words.contains(term));
        }
        before - self.postings.len()
    }

    /// Posting list for a term, in document insertion order.
    pub fn postings(&self, term: &str) -> Option<&[DocKey]> {
        self.postings.get(term).map(Vec::as_slice)
    }

    pub fn contains_term(&self, term: &str) -> bool {
        self.postings.contains_key(term)
    }

    /// Number of documents containing `term`, zero when it is not indexed.
    pub fn document_frequency(&self, term: &str) -> usize {
        self.postings.get(term).map_or(0, Vec::len)
    }

    /// Occurrences of `term` in the body of document `key`.
    pub fn term_frequency(&self, key: &str, term: &str) -> u32 {
        self.term_counts
            .get(key)
            .and_then(|counts| counts.get(term))
            .copied()
            .unwrap_or(0)
    }

    pub fn title(&self, key: &str) -> Option<&str> {
        self.titles.get(key).map(String::as_str)
    }

    /// `(key, title)` pairs in the order documents were indexed.
    pub fn titles(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.doc_order
            .iter()
            .map(move |key| (key.as_str(), self.titles[key].as_str()))
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> + '_ {
        self.postings.keys().map(String::as_str)
    }

    pub fn num_documents(&self) -> usize {
        self.doc_order.len()
    }

    pub fn num_terms(&self) -> usize {
        self.postings.len()
    }

    pub fn stop_words(&self) -> &StopWords {
        &self.stop_words
    }

    pub fn is_stop_word(&self, term: &str) -> bool {
        self.stop_words.contains(term)
    }

    pub fn snapshot(&self) -> IndexSnapshot<'_> {
        IndexSnapshot {
            index: self
                .postings
                .iter()
                .map(|(term, keys)| (term.as_str(), keys.as_slice()))
                .collect(),
            titles: self
                .titles()
                .map(|(file, title)| TitleEntry { file, title })
                .collect(),
        }
    }
}
