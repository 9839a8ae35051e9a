//! Pure text heuristics derived from the summary: key topics, word count,
//! and an estimated reading time. All deterministic functions of the input.

/// Words per minute used for the reading-time estimate.
const READING_WPM: usize = 200;

/// Minimum word length considered topic-worthy.
const MIN_TOPIC_LEN: usize = 6;

/// Number of topics surfaced.
const TOP_TOPICS: usize = 5;

/// Extract the top key topics from a summary by word frequency.
///
/// Words are whitespace tokens with non-alphanumeric edges stripped and
/// lower-cased; only words of at least six characters count. Ties are
/// broken by first occurrence, and each selected word is title-cased.
pub fn extract_key_topics(text: &str) -> Vec<String> {
    // Vec instead of a HashMap keeps first-occurrence order for tie-breaks.
    let mut counts: Vec<(String, usize)> = Vec::new();

    for raw in text.split_whitespace() {
        let word = raw
            .trim_matches(|c: char| !c.is_alphanumeric())
            .to_lowercase();
        if word.chars().count() < MIN_TOPIC_LEN {
            continue;
        }
        match counts.iter_mut().find(|(seen, _)| *seen == word) {
            Some((_, n)) => *n += 1,
            None => counts.push((word, 1)),
        }
    }

    // Stable sort: equal counts keep their first-occurrence order.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(TOP_TOPICS)
        .map(|(word, _)| title_case(&word))
        .collect()
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Estimated reading time in whole minutes, at least 1 for non-empty text.
pub fn reading_time_minutes(text: &str) -> usize {
    let words = word_count(text);
    if words == 0 {
        0
    } else {
        words.div_ceil(READING_WPM)
    }
}
