//! Keyword-based intent tagging.
//!
//! Queries like "מחק משתמש" and records like "איך מוסיפים משתמש" share most
//! of their tokens, so fuzzy similarity alone confuses opposite actions.
//! Tagging both sides with a coarse add/delete/update intent lets the
//! lexical scorer penalize mismatches (see [`crate::lexical`]).

/// Coarse action category detected in a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Add,
    Delete,
    Update,
}

/// Hebrew verb keywords per category. Set order is the match order.
const KEYWORD_SETS: &[(Intent, &[&str])] = &[
    (
        Intent::Add,
        &[
            "הוסף", "להוסיף", "הוספה", "מוסיף", "מוסיפים", "לצרף", "צירוף",
            "פתיחה", "פתיחת", "רישום", "להירשם",
        ],
    ),
    (
        Intent::Delete,
        &[
            "מחק", "מחיקה", "להסיר", "הסר", "הסרה", "ביטול", "לבטל", "סגור",
            "לסגור", "ביטול משתמש",
        ],
    ),
    (
        Intent::Update,
        &[
            "עדכן", "לעדכן", "עדכון", "שינוי", "לשנות", "עריכה", "ערוך",
            "לתקן", "תיקון",
        ],
    ),
];

/// Tag a normalized text with the first keyword-set hit, if any.
///
/// Substring containment, not token equality: "מוסיפים" inside
/// "איך מוסיפים משתמש" counts. The first set containing any keyword wins;
/// later sets are not consulted.
pub fn classify(text: &str) -> Option<Intent> {
    for (intent, words) in KEYWORD_SETS {
        if words.iter().any(|w| text.contains(w)) {
            return Some(*intent);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add() {
        assert_eq!(classify("איך מוסיפים משתמש חדש"), Some(Intent::Add));
        assert_eq!(classify("רישום לאתר"), Some(Intent::Add));
    }

    #[test]
    fn test_delete() {
        assert_eq!(classify("מחק משתמש מהאתר"), Some(Intent::Delete));
        assert_eq!(classify("לבטל הרשאה"), Some(Intent::Delete));
    }

    #[test]
    fn test_update() {
        assert_eq!(classify("איך לעדכן פרטים"), Some(Intent::Update));
    }

    #[test]
    fn test_none() {
        assert_eq!(classify("איפה רואים את הדוח"), None);
        assert_eq!(classify(""), None);
    }

    #[test]
    fn test_first_set_wins() {
        // Both an add and a delete keyword present: set order decides.
        assert_eq!(classify("להוסיף או לבטל משתמש"), Some(Intent::Add));
    }
}
