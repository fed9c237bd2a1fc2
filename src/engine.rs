//! The FAQ engine: corpus lifecycle plus the per-query arbiter.
//!
//! Built once from the raw FAQ text; [`FaqEngine::answer`] is the only
//! entry point callers need. The engine is read-only per query and
//! stateless across queries — conversation history belongs to the caller.
//!
//! # Arbitration
//!
//! 1. **Lexical hit** — the boosted fuzzy score reaches the lexical
//!    threshold: the match is trusted outright and the embedding backend
//!    is never consulted. Near-exact text beats statistical similarity.
//! 2. **Semantic hit** — lexical missed but the nearest boosted embedding
//!    distance is within the semantic threshold: that record wins and the
//!    next-nearest hits become related questions.
//! 3. **No match** — both thresholds missed: a fixed "please rephrase"
//!    reply, never an error.
//!
//! # Degraded mode
//!
//! If the semantic index cannot be built or queried (backend disabled,
//! unreachable, or timing out), the engine logs a warning and serves
//! lexical-only matching; misses then carry a note that semantic search
//! is unavailable. Embedding failures never propagate out of `answer`.

use anyhow::Result;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::answer::{
    assemble, select_related, NOT_FOUND_LEXICAL_ONLY_MESSAGE, NOT_FOUND_MESSAGE,
};
use crate::config::{EmbeddingConfig, MatchingConfig};
use crate::embedding::{create_backend, EmbeddingBackend};
use crate::index::{apply_keyword_boost, SemanticIndex};
use crate::lexical;
use crate::models::{Corpus, Outcome, Reply};
use crate::normalize::{canonicalize_query, normalize};
use crate::parse;

/// Hex SHA-256 of the raw FAQ source text, used as the corpus version.
pub fn source_version(raw: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// In-memory FAQ matching engine.
pub struct FaqEngine {
    corpus: Corpus,
    index: Option<SemanticIndex>,
    backend: Box<dyn EmbeddingBackend>,
    matching: MatchingConfig,
    source_hash: String,
}

impl FaqEngine {
    /// Parse the FAQ source and build the engine with a configured backend.
    pub async fn build(
        matching: MatchingConfig,
        embedding: &EmbeddingConfig,
        raw: &str,
    ) -> Result<Self> {
        let backend = create_backend(embedding)?;
        Ok(Self::with_backend(matching, backend, raw).await)
    }

    /// Build the engine around an explicit backend (the test seam).
    ///
    /// Index-build failures degrade to lexical-only; they never fail the
    /// engine build itself.
    pub async fn with_backend(
        matching: MatchingConfig,
        backend: Box<dyn EmbeddingBackend>,
        raw: &str,
    ) -> Self {
        let corpus = parse::parse(raw);
        let source_hash = source_version(raw);
        let index = build_index(backend.as_ref(), &corpus, &source_hash).await;

        Self {
            corpus,
            index,
            backend,
            matching,
            source_hash,
        }
    }

    /// Re-parse and re-embed if the source text changed.
    ///
    /// No-op when the source hash matches the current corpus version.
    /// Corpus and index are replaced together — the index's record
    /// positions always refer to the live corpus ordering.
    pub async fn rebuild(&mut self, raw: &str) {
        let source_hash = source_version(raw);
        if source_hash == self.source_hash {
            debug!("FAQ source unchanged, skipping rebuild");
            return;
        }

        let corpus = parse::parse(raw);
        let index = build_index(self.backend.as_ref(), &corpus, &source_hash).await;

        self.corpus = corpus;
        self.index = index;
        self.source_hash = source_hash;
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    /// Whether the semantic index is live (false in degraded mode).
    pub fn semantic_available(&self) -> bool {
        self.index.is_some()
    }

    /// Current corpus version (hex SHA-256 of the source text).
    pub fn source_hash(&self) -> &str {
        &self.source_hash
    }

    /// Answer a free-text query.
    ///
    /// Never fails: every path terminates in a [`Reply`], including an
    /// empty corpus, an empty query, and a mid-query backend outage.
    pub async fn answer(&self, query: &str) -> Reply {
        if query.trim().is_empty() || self.corpus.is_empty() {
            return self.not_found();
        }

        let nq = if self.matching.canonicalize_queries {
            canonicalize_query(query)
        } else {
            normalize(query)
        };

        // Lexical pass over every question and variant.
        let lexical_best = lexical::best_match(&self.corpus, &nq);

        if let Some(m) = &lexical_best {
            debug!(
                score = m.score,
                record = m.record_index,
                "lexical best match"
            );
            if m.score >= self.matching.lexical_threshold {
                let record = &self.corpus.records[m.record_index];
                return Reply {
                    text: assemble(record, &self.corpus.links, &[]),
                    related: Vec::new(),
                    outcome: Outcome::Lexical,
                };
            }
        }

        // Lexical below threshold: consult the semantic index.
        let Some(index) = &self.index else {
            return self.not_found_degraded();
        };

        let query_vec = match SemanticIndex::embed_query(self.backend.as_ref(), &nq).await {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "query embedding failed, lexical-only for this query");
                return self.not_found_degraded();
            }
        };

        let mut hits = index.query(&query_vec, self.matching.candidate_k);
        apply_keyword_boost(
            &mut hits,
            &nq,
            &self.corpus,
            &self.matching.boost_keywords,
            self.matching.boost_penalty,
        );

        let Some(best) = hits.first().cloned() else {
            return self.not_found();
        };
        debug!(
            distance = best.distance,
            record = best.record_index,
            "semantic best match"
        );

        // Combined check: both matchers weak means give up early.
        if best.distance > self.matching.fallback_threshold {
            return self.not_found();
        }
        if best.distance > self.matching.semantic_threshold {
            return self.not_found();
        }

        let related = select_related(
            &hits[1..],
            &self.corpus,
            best.record_index,
            self.matching.related_threshold,
            self.matching.related_limit,
        );
        let record = &self.corpus.records[best.record_index];

        Reply {
            text: assemble(record, &self.corpus.links, &related),
            related,
            outcome: Outcome::Semantic,
        }
    }

    fn not_found(&self) -> Reply {
        Reply {
            text: NOT_FOUND_MESSAGE.to_string(),
            related: Vec::new(),
            outcome: Outcome::NotFound,
        }
    }

    fn not_found_degraded(&self) -> Reply {
        Reply {
            text: NOT_FOUND_LEXICAL_ONLY_MESSAGE.to_string(),
            related: Vec::new(),
            outcome: Outcome::NotFound,
        }
    }
}

/// Try to build the semantic index, degrading to `None` on any failure.
async fn build_index(
    backend: &dyn EmbeddingBackend,
    corpus: &Corpus,
    source_hash: &str,
) -> Option<SemanticIndex> {
    if corpus.is_empty() {
        return None;
    }
    match SemanticIndex::build(backend, corpus, source_hash).await {
        Ok(index) => {
            debug!(records = index.len(), model = index.model(), "semantic index built");
            Some(index)
        }
        Err(e) => {
            warn!(error = %e, "semantic index unavailable, running lexical-only");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_version_is_stable() {
        let a = source_version("שאלה: ש\nתשובה: ת");
        let b = source_version("שאלה: ש\nתשובה: ת");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_source_version_changes_with_content() {
        assert_ne!(source_version("a"), source_version("b"));
    }
}
