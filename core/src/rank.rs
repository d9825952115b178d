//! TF-IDF cosine ranking over the resolver's candidates.
//!
//! Each candidate gets one vector component per indexed query term
//! occurrence (repeats included, stop words excluded), weighted
//! `(ln(N / df) + 1) * (1 + tf)`. The query vector over the same components
//! holds plain repetition counts. Both are L2-normalized and the score is
//! their dot product.

use crate::document::DocKey;
use crate::error::{Error, Result};
use crate::index::InvertedIndex;
use crate::query::{search_with, LeadingStopWords};
use crate::tokenizer::query_terms;
use serde::Serialize;
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranked {
    pub key: DocKey,
    pub score: f64,
}

pub fn rank(index: &InvertedIndex, query: &str, corpus_size: usize) -> Result<Vec<Ranked>> {
    rank_with(index, query, corpus_size, LeadingStopWords::default())
}

/// Score the documents matching `query` and sort them by descending score.
/// Ties keep the resolver's order.
pub fn rank_with(
    index: &InvertedIndex,
    query: &str,
    corpus_size: usize,
    policy: LeadingStopWords,
) -> Result<Vec<Ranked>> {
    if corpus_size == 0 {
        return Err(Error::InvalidCorpusSize(corpus_size));
    }
    let candidates = search_with(index, query, policy);
    if candidates.is_empty() {
        return Ok(Vec::new());
    }

    let raw = query_terms(query);
    let dims: Vec<&str> = raw.iter().copied().filter(|t| index.contains_term(t)).collect();
    let idf = dims
        .iter()
        .map(|term| inverse_document_frequency(index, term, corpus_size))
        .collect::<Result<Vec<f64>>>()?;
    let query_vec = query_vector(&raw, &dims);

    let mut ranked: Vec<Ranked> = candidates
        .into_iter()
        .map(|key| {
            let mut doc_vec: Vec<f64> = dims
                .iter()
                .zip(&idf)
                .map(|(term, idf)| idf * (1.0 + index.term_frequency(&key, term) as f64))
                .collect();
            normalize(&mut doc_vec);
            Ranked { score: dot(&doc_vec, &query_vec), key }
        })
        .collect();
    // stable, so equal scores keep candidate order
    ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    tracing::debug!(query, hits = ranked.len(), dims = dims.len(), "ranked query");
    Ok(ranked)
}

fn inverse_document_frequency(index: &InvertedIndex, term: &str, corpus_size: usize) -> Result<f64> {
    let df = index.document_frequency(term);
    if df > corpus_size {
        return Err(Error::DocumentFrequencyExceedsCorpus {
            term: term.to_string(),
            df,
            corpus_size,
        });
    }
    Ok((corpus_size as f64 / df as f64).ln() + 1.0)
}

/// Component i counts how often `dims[i]` occurs among the raw query terms.
fn query_vector(raw: &[&str], dims: &[&str]) -> Vec<f64> {
    let mut v: Vec<f64> = dims
        .iter()
        .map(|term| raw.iter().filter(|t| *t == term).count().max(1) as f64)
        .collect();
    normalize(&mut v);
    v
}

/// L2-normalize in place. A zero vector stays zero.
fn normalize(v: &mut [f64]) {
    let magnitude = v.iter().map(|x| x * x).sum::<f64>().sqrt();
    if magnitude == 0.0 {
        return;
    }
    for x in v.iter_mut() {
        *x /= magnitude;
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
