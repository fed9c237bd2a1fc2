//! Fuzzy lexical matching over questions and variants.
//!
//! Scoring is token-sort-ratio: both strings are whitespace-tokenized,
//! tokens sorted, rejoined, and compared with a normalized Levenshtein
//! ratio scaled to 0–100. Word order therefore never matters, only the
//! token multiset and spelling.
//!
//! An intent boost is layered on top: when both the query and a candidate
//! text carry a detected intent, agreement adds 25 and disagreement
//! subtracts 50. The penalty is deliberately larger than the reward — a
//! "delete" query fuzzily close to an "add" question is a false positive
//! worth suppressing hard. Boosted scores are not clamped; only ranking
//! and the threshold comparison matter.

use crate::intent::{classify, Intent};
use crate::models::Corpus;
use crate::normalize::normalize;

/// Score added when query and candidate intents agree.
const INTENT_AGREE_BOOST: f64 = 25.0;
/// Score subtracted when both intents are present and differ.
const INTENT_MISMATCH_PENALTY: f64 = 50.0;

/// The best lexical candidate for a query across the whole corpus.
#[derive(Debug, Clone)]
pub struct LexicalMatch {
    /// Position of the record in the corpus.
    pub record_index: usize,
    /// Boosted token-sort-ratio score; may exceed 100 or go negative.
    pub score: f64,
    /// Normalized question/variant text that produced the maximum.
    pub matched_text: String,
    /// Intent detected on the matched text, if any.
    pub intent: Option<Intent>,
}

/// Token-sort-ratio similarity in `[0, 100]`.
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(&sort_tokens(a), &sort_tokens(b)) * 100.0
}

fn sort_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Find the single highest boosted lexical score across all records.
///
/// Every record is scored against its question and each of its variants
/// independently; the record's score is the maximum over those texts, and
/// ties across records keep the earliest (source order). Returns `None`
/// for an empty corpus.
pub fn best_match(corpus: &Corpus, normalized_query: &str) -> Option<LexicalMatch> {
    let query_intent = classify(normalized_query);
    let mut best: Option<LexicalMatch> = None;

    for (record_index, record) in corpus.records.iter().enumerate() {
        for text in record.match_texts() {
            let candidate = normalize(text);
            let mut score = token_sort_ratio(normalized_query, &candidate);

            let candidate_intent = classify(&candidate);
            match (query_intent, candidate_intent) {
                (Some(q), Some(c)) if q == c => score += INTENT_AGREE_BOOST,
                (Some(_), Some(_)) => score -= INTENT_MISMATCH_PENALTY,
                _ => {}
            }

            let better = best.as_ref().map_or(true, |b| score > b.score);
            if better {
                best = Some(LexicalMatch {
                    record_index,
                    score,
                    matched_text: candidate,
                    intent: candidate_intent,
                });
            }
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FaqRecord;

    fn record(question: &str, variants: &[&str], answer: &str) -> FaqRecord {
        FaqRecord {
            question: question.to_string(),
            variants: variants.iter().map(|s| s.to_string()).collect(),
            answer: answer.to_string(),
            instruction: None,
        }
    }

    fn corpus(records: Vec<FaqRecord>) -> Corpus {
        Corpus {
            records,
            links: Default::default(),
        }
    }

    #[test]
    fn test_ratio_order_invariant() {
        let a = token_sort_ratio("משתמש חדש מוסיפים", "מוסיפים משתמש חדש");
        assert!((a - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_ratio_identical() {
        assert!((token_sort_ratio("שלום עולם", "שלום עולם") - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_ratio_disjoint_is_low() {
        let score = token_sort_ratio("קוד חד פעמי", "קיצור דרך לשולחן העבודה");
        assert!(score < 40.0, "got {score}");
    }

    #[test]
    fn test_empty_question_scores_near_zero() {
        assert!(token_sort_ratio("איך מוסיפים משתמש", "") < 1e-9);
    }

    #[test]
    fn test_near_exact_query_selects_record() {
        let c = corpus(vec![
            record("איך מוסיפים משתמש חדש", &[], "A1"),
            record("איך מוחקים משתמש", &[], "A2"),
        ]);
        let m = best_match(&c, "מוסיפים משתמש חדש").unwrap();
        assert_eq!(m.record_index, 0);
        assert!(m.score >= 55.0, "got {}", m.score);
    }

    #[test]
    fn test_variant_can_produce_the_maximum() {
        let c = corpus(vec![record(
            "מה התהליך לקבלת גישה",
            &["איך נרשמים לאתר"],
            "A",
        )]);
        let m = best_match(&c, "איך נרשמים לאתר").unwrap();
        assert_eq!(m.matched_text, "איך נרשמים לאתר");
        assert!((m.score - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_intent_mismatch_never_selects_opposite_action() {
        let c = corpus(vec![
            record("איך מוסיפים משתמש חדש", &[], "A1"),
            record("איך מוחקים משתמש", &[], "A2"),
        ]);
        // Delete-intent query: record 0 carries an add intent and takes the
        // -50 penalty, so it must never win despite the token overlap.
        let m = best_match(&c, "מחק משתמש").unwrap();
        assert_eq!(m.record_index, 1);
    }

    #[test]
    fn test_intent_agreement_boosts_above_100() {
        let c = corpus(vec![record("איך מוסיפים משתמש חדש", &[], "A")]);
        let m = best_match(&c, "איך מוסיפים משתמש חדש").unwrap();
        assert!(m.score > 100.0, "agreement should push past 100, got {}", m.score);
    }

    #[test]
    fn test_empty_corpus() {
        assert!(best_match(&corpus(vec![]), "שאלה כלשהי").is_none());
    }
}
