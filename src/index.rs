//! In-memory semantic index over the FAQ corpus.
//!
//! One entry per record: the embedded text is the record's question and all
//! variants joined with a `" | "` separator, tagged with the record's corpus
//! position. Queries are brute-force — the corpus is a few hundred records
//! at most, so a linear scan beats maintaining an ANN structure.
//!
//! The index remembers the SHA-256 hash of the source text it was built
//! from; the engine uses it to skip rebuilds when the FAQ source has not
//! changed, and to replace corpus and index together when it has.

use anyhow::{Context, Result};

use crate::embedding::{squared_l2, unit_normalize, EmbeddingBackend};
use crate::models::Corpus;
use crate::normalize::normalize;

/// Separator between a question and its variants in the embedded text.
const VARIANT_SEPARATOR: &str = " | ";

/// A nearest-neighbor hit, distance lower = more similar.
#[derive(Debug, Clone)]
pub struct SemanticHit {
    /// Position of the record in the corpus.
    pub record_index: usize,
    /// Squared L2 distance between unit vectors, possibly keyword-boosted.
    pub distance: f32,
}

struct IndexEntry {
    record_index: usize,
    vector: Vec<f32>,
}

/// Brute-force vector index, immutable after build.
pub struct SemanticIndex {
    entries: Vec<IndexEntry>,
    model: String,
    source_hash: String,
}

impl SemanticIndex {
    /// Embed every record and build the index.
    ///
    /// `source_hash` identifies the FAQ source text version this index was
    /// built from (see [`crate::engine`]).
    ///
    /// # Errors
    ///
    /// Fails when the backend fails or returns the wrong number of vectors.
    /// The caller is expected to recover by running lexical-only.
    pub async fn build(
        backend: &dyn EmbeddingBackend,
        corpus: &Corpus,
        source_hash: &str,
    ) -> Result<Self> {
        let texts: Vec<String> = corpus
            .records
            .iter()
            .map(|r| r.match_texts().collect::<Vec<_>>().join(VARIANT_SEPARATOR))
            .collect();

        let vectors = backend
            .embed(&texts)
            .await
            .context("Failed to embed FAQ corpus")?;

        if vectors.len() != texts.len() {
            anyhow::bail!(
                "Embedding backend returned {} vectors for {} records",
                vectors.len(),
                texts.len()
            );
        }

        let entries = vectors
            .into_iter()
            .enumerate()
            .map(|(record_index, v)| IndexEntry {
                record_index,
                vector: unit_normalize(v),
            })
            .collect();

        Ok(Self {
            entries,
            model: backend.model_name().to_string(),
            source_hash: source_hash.to_string(),
        })
    }

    /// Embed a query text with the given backend, unit-normalized.
    pub async fn embed_query(
        backend: &dyn EmbeddingBackend,
        text: &str,
    ) -> Result<Vec<f32>> {
        let mut vectors = backend.embed(&[text.to_string()]).await?;
        let vec = vectors
            .pop()
            .filter(|_| vectors.is_empty())
            .ok_or_else(|| anyhow::anyhow!("Expected exactly one query embedding"))?;
        Ok(unit_normalize(vec))
    }

    /// Return the `k` nearest records, ascending distance.
    pub fn query(&self, query_vec: &[f32], k: usize) -> Vec<SemanticHit> {
        let mut hits: Vec<SemanticHit> = self
            .entries
            .iter()
            .map(|e| SemanticHit {
                record_index: e.record_index,
                distance: squared_l2(query_vec, &e.vector),
            })
            .collect();

        hits.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        hits.truncate(k);
        hits
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Model the vectors were produced with.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Hash of the FAQ source text this index was built from.
    pub fn source_hash(&self) -> &str {
        &self.source_hash
    }
}

/// Pull domain-relevant hits closer by a fixed penalty per shared keyword.
///
/// For every keyword present in both the normalized query and a hit's
/// normalized question+variants text, the hit's distance drops by
/// `penalty`. Hits are re-sorted ascending afterwards.
pub fn apply_keyword_boost(
    hits: &mut Vec<SemanticHit>,
    normalized_query: &str,
    corpus: &Corpus,
    keywords: &[String],
    penalty: f32,
) {
    if keywords.is_empty() {
        return;
    }

    for hit in hits.iter_mut() {
        let record = &corpus.records[hit.record_index];
        let haystack = normalize(
            &record
                .match_texts()
                .collect::<Vec<_>>()
                .join(" "),
        );
        for kw in keywords {
            if normalized_query.contains(kw.as_str()) && haystack.contains(kw.as_str()) {
                hit.distance -= penalty;
            }
        }
    }

    hits.sort_by(|a, b| {
        a.distance
            .partial_cmp(&b.distance)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}
