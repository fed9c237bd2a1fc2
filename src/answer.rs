//! Final answer selection and assembly.
//!
//! The arbiter proper lives in [`crate::engine`]; this module owns the
//! pieces it composes: link placeholder expansion, the related-question
//! list, and the formatted answer text.
//!
//! Assembly rules follow the FAQ authoring conventions:
//! - `[label]` placeholders become markdown links via the corpus link
//!   table; undefined labels are left unexpanded.
//! - An instruction, when present, is appended under a fixed bold heading.
//! - Single newlines are doubled into paragraph breaks for rendering.
//! - A fixed source footer and the matched canonical question close the
//!   answer, for transparency.

use crate::index::SemanticHit;
use crate::models::{Corpus, FaqRecord, LinkTable};

/// Fixed reply when neither matcher clears its threshold.
pub const NOT_FOUND_MESSAGE: &str = "לא נמצאה תשובה, נסה לנסח את השאלה מחדש.";

/// Wider reply used when the semantic index is unavailable and the
/// lexical matcher alone came up empty.
pub const NOT_FOUND_LEXICAL_ONLY_MESSAGE: &str =
    "לא נמצאה תשובה, נסה לנסח את השאלה מחדש. החיפוש הסמנטי אינו זמין כעת, נסה ניסוח קרוב ככל האפשר לשאלה המקורית.";

/// Heading the optional instruction is appended under.
const INSTRUCTION_HEADING: &str = "**הערות והוראות:**";

/// Replace every `[label]` placeholder with a `[label](value)` markdown link.
///
/// Only labels present in the table are expanded; anything else in square
/// brackets stays as-is.
pub fn expand_links(text: &str, links: &LinkTable) -> String {
    let mut out = text.to_string();
    for (label, value) in links {
        let placeholder = format!("[{label}]");
        let markdown = format!("[{label}]({value})");
        out = out.replace(&placeholder, &markdown);
    }
    out
}

/// Collect up to `limit` related questions from semantic hits.
///
/// Skips the winning record, any hit whose question string-equals the
/// winner's, and hits beyond `related_threshold`. Hits are expected in
/// ascending distance order; the output preserves it.
pub fn select_related(
    hits: &[SemanticHit],
    corpus: &Corpus,
    winner_index: usize,
    related_threshold: f32,
    limit: usize,
) -> Vec<String> {
    let winner_question = corpus.records[winner_index].question.trim();
    let mut related = Vec::new();

    for hit in hits {
        if related.len() >= limit {
            break;
        }
        if hit.record_index == winner_index || hit.distance > related_threshold {
            continue;
        }
        let question = corpus.records[hit.record_index].question.trim();
        if question.is_empty() || question == winner_question {
            continue;
        }
        related.push(question.to_string());
    }

    related
}

/// Build the final formatted answer for a winning record.
pub fn assemble(record: &FaqRecord, links: &LinkTable, related: &[String]) -> String {
    let mut body = expand_links(record.answer.trim(), links);

    if let Some(instruction) = &record.instruction {
        let expanded = expand_links(instruction.trim(), links);
        body.push_str(&format!("\n{INSTRUCTION_HEADING} {expanded}"));
    }

    // Paragraph-separate for markdown rendering.
    let mut out = body.replace('\n', "\n\n");

    if !related.is_empty() {
        out.push_str("\n\nשאלות קשורות:\n");
        out.push_str(&related.join("\n"));
    }

    out.push_str(&format!(
        "\n\nמקור: faq\nשאלה מזוהה: {}",
        record.question
    ));
    out
}
