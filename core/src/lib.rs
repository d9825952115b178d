pub mod corpus;
pub mod document;
pub mod engine;
pub mod error;
pub mod index;
pub mod query;
pub mod rank;
pub mod stopwords;
pub mod tokenizer;

pub use document::{DocKey, Document};
pub use engine::{EngineConfig, SearchEngine, SearchHit};
pub use error::{Error, Result};
pub use index::{build_index, IndexSnapshot, InvertedIndex};
pub use query::{search, search_with, LeadingStopWords};
pub use rank::{rank, rank_with, Ranked};
pub use stopwords::{StopWordSource, StopWords};
