//! FAQ source parser.
//!
//! Turns the raw FAQ text into a [`Corpus`]: an ordered list of
//! [`FaqRecord`]s plus the global link table.
//!
//! The source grammar:
//!
//! ```text
//! >>LABEL: VALUE<<          (zero or more, anywhere in the file)
//! שאלה: <question text>
//! ניסוחים דומים:
//! - variant 1
//! - variant 2
//! תשובה: <answer text, may span multiple lines>
//! הוראה: <optional instruction text>
//! ```
//!
//! Blocks repeat; "שאלה:" marks a new block start. Link spans are collected
//! first and removed from the working text so link markup can never corrupt
//! question/answer boundaries. Malformed blocks never fail the parse:
//! missing labels become empty fields, and a block is dropped only when it
//! has neither a question nor an answer.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{Corpus, FaqRecord, LinkTable};

static LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r">>([^:<]+?)\s*:\s*([^<]+?)<<").unwrap());

static QUESTION_LABEL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"שאלה\s*:").unwrap());

static QUESTION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"שאלה\s*:\s*(.+)").unwrap());

static VARIANTS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)ניסוחים דומים\s*:\s*(.+?)(?:\nתשובה\s*:|\z)").unwrap());

static ANSWER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)תשובה\s*:\s*(.+?)(?:\nהוראה\s*:|\z)").unwrap());

static INSTRUCTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)הוראה\s*:\s*(.+?)(?:\n>>|\z)").unwrap());

/// Parse the raw FAQ text into records and the global link table.
///
/// Never fails: an empty or malformed input yields an empty corpus.
pub fn parse(raw: &str) -> Corpus {
    let links = collect_links(raw);

    // Strip link spans before block-splitting.
    let working = LINK_RE.replace_all(raw, "");

    let records = split_blocks(&working)
        .into_iter()
        .filter_map(parse_block)
        .collect();

    Corpus { records, links }
}

/// Collect every `>>label: value<<` span; later duplicates overwrite earlier ones.
fn collect_links(raw: &str) -> LinkTable {
    let mut links = LinkTable::new();
    for caps in LINK_RE.captures_iter(raw) {
        let label = caps[1].trim().to_string();
        let value = caps[2].trim().to_string();
        links.insert(label, value);
    }
    links
}

/// Split the working text into blocks, each starting at a "שאלה:" label.
///
/// The leading segment before the first label is kept as a block too; it is
/// discarded downstream unless it carries an answer of its own.
fn split_blocks(text: &str) -> Vec<&str> {
    let starts: Vec<usize> = QUESTION_LABEL_RE.find_iter(text).map(|m| m.start()).collect();
    if starts.is_empty() {
        return vec![text];
    }

    let mut blocks = Vec::with_capacity(starts.len() + 1);
    if starts[0] > 0 {
        blocks.push(&text[..starts[0]]);
    }
    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(text.len());
        blocks.push(&text[start..end]);
    }
    blocks
}

/// Extract one record from a block, or `None` for empty/unusable fragments.
fn parse_block(block: &str) -> Option<FaqRecord> {
    let block = block.trim();
    if block.is_empty() {
        return None;
    }

    let question = QUESTION_RE
        .captures(block)
        .map(|c| c[1].trim().to_string())
        .unwrap_or_default();

    let variants = VARIANTS_RE
        .captures(block)
        .map(|c| {
            c[1].lines()
                .map(|line| line.trim_matches(|c: char| c == ' ' || c == '-' || c == '\t'))
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    // Trim each answer line individually: removes leading indentation
    // without collapsing intentional paragraph breaks.
    let answer = ANSWER_RE
        .captures(block)
        .map(|c| {
            c[1].lines()
                .map(str::trim)
                .collect::<Vec<_>>()
                .join("\n")
                .trim()
                .to_string()
        })
        .unwrap_or_default();

    let instruction = INSTRUCTION_RE
        .captures(block)
        .map(|c| c[1].trim().to_string())
        .filter(|s| !s.is_empty());

    if question.is_empty() && answer.is_empty() {
        return None;
    }

    Some(FaqRecord {
        question,
        variants,
        answer,
        instruction,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = "\
>>תמיכה: https://support.example<<
שאלה: איך מוסיפים משתמש חדש באתר מייצגים
ניסוחים דומים:
- הוספת משתמש
- לצרף משתמש לאתר
תשובה: נכנסים למסך ניהול משתמשים.
   בוחרים הוספה וממלאים את הפרטים.
הוראה: לפרטים נוספים פנו אל [תמיכה]
שאלה: איך מוחקים משתמש
תשובה: פונים למוקד.
";

    #[test]
    fn test_parse_record_count_and_fields() {
        let corpus = parse(FIXTURE);
        assert_eq!(corpus.records.len(), 2);

        let first = &corpus.records[0];
        assert_eq!(first.question, "איך מוסיפים משתמש חדש באתר מייצגים");
        assert_eq!(
            first.variants,
            vec!["הוספת משתמש", "לצרף משתמש לאתר"]
        );
        assert_eq!(
            first.answer,
            "נכנסים למסך ניהול משתמשים.\nבוחרים הוספה וממלאים את הפרטים."
        );
        assert_eq!(
            first.instruction.as_deref(),
            Some("לפרטים נוספים פנו אל [תמיכה]")
        );

        let second = &corpus.records[1];
        assert_eq!(second.question, "איך מוחקים משתמש");
        assert!(second.variants.is_empty());
        assert_eq!(second.answer, "פונים למוקד.");
        assert!(second.instruction.is_none());
    }

    #[test]
    fn test_link_table_global_and_last_wins() {
        let raw = "\
>>תמיכה: https://old.example<<
שאלה: ש1
תשובה: ת1
>>תמיכה: https://new.example<<
>>טלפון: 1-222-6050<<
";
        let corpus = parse(raw);
        assert_eq!(corpus.links.len(), 2);
        assert_eq!(
            corpus.links.get("תמיכה").map(String::as_str),
            Some("https://new.example")
        );
        assert_eq!(
            corpus.links.get("טלפון").map(String::as_str),
            Some("1-222-6050")
        );
    }

    #[test]
    fn test_link_spans_do_not_corrupt_blocks() {
        let raw = "שאלה: ש1\nתשובה: ת1 >>קישור: https://x<< המשך";
        let corpus = parse(raw);
        assert_eq!(corpus.records.len(), 1);
        assert_eq!(corpus.records[0].answer, "ת1  המשך");
        assert!(corpus.links.contains_key("קישור"));
    }

    #[test]
    fn test_block_without_question_kept_when_answer_present() {
        let raw = "סתם טקסט מקדים\nתשובה: תשובה יתומה";
        let corpus = parse(raw);
        assert_eq!(corpus.records.len(), 1);
        assert_eq!(corpus.records[0].question, "");
        assert_eq!(corpus.records[0].answer, "תשובה יתומה");
    }

    #[test]
    fn test_whitespace_fragments_discarded() {
        let corpus = parse("\n\n   \nשאלה: ש\nתשובה: ת\n");
        assert_eq!(corpus.records.len(), 1);
    }

    #[test]
    fn test_empty_input() {
        let corpus = parse("");
        assert!(corpus.is_empty());
        assert!(corpus.links.is_empty());
    }

    #[test]
    fn test_variant_markers_stripped() {
        let raw = "שאלה: ש\nניסוחים דומים:\n\t- ניסוח אחד\n-ניסוח שני\n\nתשובה: ת";
        let corpus = parse(raw);
        assert_eq!(
            corpus.records[0].variants,
            vec!["ניסוח אחד", "ניסוח שני"]
        );
    }

    #[test]
    fn test_round_trip_serialized_record() {
        // serialize → parse round-trips question/variants/answer.
        let record = FaqRecord {
            question: "איך יוצרים קיצור דרך".to_string(),
            variants: vec!["קיצור דרך לשולחן העבודה".to_string()],
            answer: "לוחצים לחיצה ימנית.\nבוחרים צור קיצור דרך.".to_string(),
            instruction: None,
        };
        let serialized = format!(
            "שאלה: {}\nניסוחים דומים:\n- {}\nתשובה: {}\n",
            record.question, record.variants[0], record.answer
        );
        let corpus = parse(&serialized);
        assert_eq!(corpus.records.len(), 1);
        assert_eq!(corpus.records[0], record);
    }
}
