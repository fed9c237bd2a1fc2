//! Hebrew text canonicalization for matching.
//!
//! [`normalize`] is the base contract: deterministic, pure, and idempotent.
//! Every comparison in the pipeline — fuzzy scoring, intent tagging, the
//! semantic keyword boost — runs over normalized text, so both sides of any
//! comparison go through the same function.
//!
//! [`canonicalize_query`] is an optional post-pass applied to live queries
//! only: it rewrites leading colloquial request verbs to a canonical "איך"
//! prefix and expands a couple of domain terms. It is not idempotent and is
//! never applied to corpus text.

use unicode_normalization::UnicodeNormalization;

/// Leading colloquial request verbs rewritten to "איך ". First match wins.
const REQUEST_PREFIXES: &[&str] = &["רוצה ", "אני רוצה ", "אפשר ", "בא לי ", "מבקש "];

/// Domain synonym substitutions, applied in order after prefix rewriting.
const SYNONYMS: &[(&str, &str)] = &[
    ("עמדה", "עמדה למחשב"),
    ("להוסיף עמדה", "להוסיף משתמש חדש"),
];

fn is_hebrew(c: char) -> bool {
    ('\u{0590}'..='\u{05FF}').contains(&c)
}

/// Canonicalize a string for comparison.
///
/// Applies NFC, strips bidi control marks (U+200E/U+200F), replaces every
/// character that is neither Hebrew-block, alphanumeric, nor whitespace
/// with a space, collapses whitespace runs, trims, and lowercases.
///
/// Empty input returns an empty string; `normalize(normalize(s)) == normalize(s)`
/// for all `s`.
pub fn normalize(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let cleaned: String = text
        .nfc()
        .filter(|&c| c != '\u{200e}' && c != '\u{200f}')
        .map(|c| {
            if is_hebrew(c) || c.is_alphanumeric() || c == '_' || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    cleaned
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Normalize a live query and apply the colloquial post-pass.
///
/// "רוצה להוסיף משתמש" and "איך מוסיפים משתמש" should land on the same
/// record; the FAQ is phrased as "איך ..." questions, so partial request
/// phrasings are rewritten to that shape before scoring.
pub fn canonicalize_query(text: &str) -> String {
    let mut s = normalize(text);

    for prefix in REQUEST_PREFIXES {
        if let Some(rest) = s.strip_prefix(prefix) {
            s = format!("איך {rest}");
            break;
        }
    }

    for (from, to) in SYNONYMS {
        s = s.replace(from, to);
    }

    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn test_strips_punctuation_and_collapses() {
        assert_eq!(
            normalize("איך   מוסיפים, משתמש?!"),
            "איך מוסיפים משתמש"
        );
    }

    #[test]
    fn test_strips_bidi_marks() {
        assert_eq!(normalize("\u{200f}שלום\u{200e} עולם"), "שלום עולם");
    }

    #[test]
    fn test_lowercases_latin() {
        assert_eq!(normalize("OTP קוד"), "otp קוד");
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "שאלה: איך מוסיפים משתמש חדש?",
            "  Mixed עברית AND English!  ",
            ">>תמיכה: https://example.com<<",
            "",
        ];
        for s in inputs {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn test_canonicalize_rewrites_request_prefix() {
        assert_eq!(
            canonicalize_query("רוצה להוסיף משתמש"),
            "איך להוסיף משתמש"
        );
        assert_eq!(
            canonicalize_query("אני רוצה לקבל קוד"),
            "איך לקבל קוד"
        );
    }

    #[test]
    fn test_canonicalize_only_first_prefix() {
        // Not anchored on a prefix — left untouched.
        assert_eq!(
            canonicalize_query("איפה אפשר לראות"),
            "איפה אפשר לראות"
        );
    }

    #[test]
    fn test_canonicalize_expands_workstation_term() {
        assert_eq!(canonicalize_query("עמדה חדשה"), "עמדה למחשב חדשה");
    }
}
