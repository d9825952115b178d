use crate::document::DocKey;
use crate::index::InvertedIndex;
use crate::tokenizer::query_terms;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::hash::Hash;

/// What a stop word does when it comes before any indexed query term.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadingStopWords {
    /// The candidate list starts empty and the whole query matches nothing.
    #[default]
    Empty,
    /// Leading stop words are ignored until the first indexed term.
    Skip,
}

/// Boolean AND over the query terms with the default leading-stop-word policy.
pub fn search(index: &InvertedIndex, query: &str) -> Vec<DocKey> {
    search_with(index, query, LeadingStopWords::default())
}

/// Resolve `query` to the documents containing every non-stop-word term.
///
/// Terms are taken left to right. An indexed term narrows the running
/// candidates, a stop word carries them forward and any other term empties the
/// result. An empty query matches nothing.
pub fn search_with(index: &InvertedIndex, query: &str, policy: LeadingStopWords) -> Vec<DocKey> {
    // None until the first term has set the candidate list
    let mut running: Option<Vec<DocKey>> = None;
    for term in query_terms(query) {
        if let Some(plist) = index.postings(term) {
            running = Some(match running {
                None => plist.to_vec(),
                Some(current) => intersect(plist, &current),
            });
        } else if index.is_stop_word(term) {
            if running.is_none() && policy == LeadingStopWords::Empty {
                running = Some(Vec::new());
            }
        } else {
            tracing::debug!(term, "query term not indexed");
            return Vec::new();
        }
        if matches!(&running, Some(c) if c.is_empty()) {
            return Vec::new();
        }
    }
    running.unwrap_or_default()
}

/// Order-preserving intersection. Output follows the longer list (`a` on a
/// tie) and keeps each element once.
pub fn intersect<T: Eq + Hash + Clone>(a: &[T], b: &[T]) -> Vec<T> {
    let (longer, shorter) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    let members: HashSet<&T> = shorter.iter().collect();
    let mut seen: HashSet<&T> = HashSet::new();
    longer
        .iter()
        .filter(|k| members.contains(k) && seen.insert(*k))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::index::build_index;
    use crate::stopwords::StopWords;

    fn corpus(stop_words: StopWords) -> InvertedIndex {
        build_index(
            vec![
                Document::parse("test1.txt", "File 1 Title\napple ball carrot\n"),
                Document::parse("test2.txt", "File 2 Title\nball carrot dog\n"),
            ],
            stop_words,
        )
    }

    #[test]
    fn boolean_and() {
        let idx = corpus(StopWords::empty());
        assert_eq!(search(&idx, "ball"), ["test1.txt", "test2.txt"]);
        assert_eq!(search(&idx, "apple"), ["test1.txt"]);
        assert_eq!(search(&idx, "apple carrot"), ["test1.txt"]);
        assert_eq!(search(&idx, "carrot dog"), ["test2.txt"]);
        assert_eq!(search(&idx, "apple ball carrot"), ["test1.txt"]);
    }

    #[test]
    fn unknown_term_empties_result() {
        let idx = corpus(StopWords::empty());
        assert!(search(&idx, "dog nope").is_empty());
        assert!(search(&idx, "nope dog").is_empty());
        assert!(search(&idx, "apple nope carrot").is_empty());
        assert!(search(&idx, "apple dog ball").is_empty());
    }

    #[test]
    fn empty_query() {
        let idx = corpus(StopWords::empty());
        assert!(search(&idx, "").is_empty());
        assert!(search(&idx, "   ").is_empty());
    }

    #[test]
    fn stop_words_carry_candidates() {
        let idx = corpus(["and", "the"].into_iter().collect());
        assert_eq!(search(&idx, "ball and carrot"), ["test1.txt", "test2.txt"]);
        assert_eq!(search(&idx, "dog the"), ["test2.txt"]);
    }

    #[test]
    fn leading_stop_word_policies() {
        let idx = corpus(["the"].into_iter().collect());
        assert!(search(&idx, "the ball").is_empty());
        assert_eq!(
            search_with(&idx, "the ball", LeadingStopWords::Skip),
            ["test1.txt", "test2.txt"]
        );
        assert!(search_with(&idx, "the", LeadingStopWords::Skip).is_empty());
    }

    #[test]
    fn intersect_follows_longer_list() {
        let a = ["x", "y"];
        let b = ["z", "y", "x"];
        assert_eq!(intersect(&a, &b), ["y", "x"]);
        assert_eq!(intersect(&b, &a), ["y", "x"]);
        // equal length: first argument leads
        assert_eq!(intersect(&["b", "a"], &["a", "b"]), ["b", "a"]);
        assert_eq!(intersect(&["a", "a", "b"], &["a"]), ["a"]);
    }
}
