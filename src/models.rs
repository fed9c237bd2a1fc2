//! Core data models for the FAQ matching pipeline.
//!
//! These types represent the parsed FAQ corpus and the values that flow
//! through a single query evaluation.

use std::collections::HashMap;

use serde::Serialize;

/// One parsed question/answer unit from the FAQ source.
///
/// Immutable after parse. The record's position in [`Corpus::records`] is
/// its stable key: both the lexical scorer and the semantic index refer to
/// records by position, never by content.
#[derive(Debug, Clone, PartialEq)]
pub struct FaqRecord {
    /// Canonical question shown back to the user.
    pub question: String,
    /// Alternate phrasings, in source order. Used for matching only.
    pub variants: Vec<String>,
    /// Pre-authored answer. May embed `[label]` placeholders.
    pub answer: String,
    /// Optional trailing guidance, appended under its own heading.
    /// May also embed `[label]` placeholders.
    pub instruction: Option<String>,
}

impl FaqRecord {
    /// The question followed by every variant — the texts a query is scored against.
    pub fn match_texts(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.question.as_str()).chain(self.variants.iter().map(String::as_str))
    }
}

/// Label → URL table parsed from `>>label: value<<` spans.
///
/// Global to the whole corpus; duplicate labels keep the last occurrence.
pub type LinkTable = HashMap<String, String>;

/// The full parsed FAQ: ordered records plus the global link table.
///
/// Source order is significant — it is the tie-break order for display.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    pub records: Vec<FaqRecord>,
    pub links: LinkTable,
}

impl Corpus {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// The engine's reply to one query.
#[derive(Debug, Clone, Serialize)]
pub struct Reply {
    /// Formatted answer text, ready for markdown rendering.
    pub text: String,
    /// Canonical questions of up to three related records, best first.
    /// Empty on lexical hits and misses.
    pub related: Vec<String>,
    /// Which path produced the reply.
    pub outcome: Outcome,
}

/// Terminal outcome of the arbiter for one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Fuzzy score reached the lexical threshold.
    Lexical,
    /// Lexical missed, nearest embedding was within the semantic threshold.
    Semantic,
    /// Both matchers below threshold.
    NotFound,
}
