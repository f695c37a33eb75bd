//! Whole-word search helpers shared by the matcher and the classifier.

/// Byte ranges of every occurrence of `needle` in `haystack` bounded by
/// non-alphanumeric characters (or the ends of the text) on both sides.
pub fn find_whole_word(haystack: &str, needle: &str) -> Vec<(usize, usize)> {
    if needle.is_empty() {
        return vec![];
    }
    haystack
        .match_indices(needle)
        .map(|(start, m)| (start, start + m.len()))
        .filter(|(start, end)| is_bounded(haystack, *start, *end))
        .collect()
}

pub fn count_whole_word(haystack: &str, needle: &str) -> usize {
    find_whole_word(haystack, needle).len()
}

/// True when the span is not glued to an alphanumeric character.
pub fn is_bounded(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(|c| c.is_alphanumeric()) && !after.is_some_and(|c| c.is_alphanumeric())
}

/// Spans of ticker-shaped tokens: runs of alphanumerics and inner dots
/// (`BRK.B`).
pub fn ticker_tokens(text: &str) -> Vec<(usize, &str)> {
    let mut out = Vec::new();
    let mut start: Option<usize> = None;

    for (i, c) in text.char_indices() {
        let part = c.is_ascii_alphanumeric() || c == '.';
        match (part, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                push_token(text, s, i, &mut out);
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        push_token(text, s, text.len(), &mut out);
    }
    out
}

fn push_token<'a>(text: &'a str, start: usize, end: usize, out: &mut Vec<(usize, &'a str)>) {
    let raw = &text[start..end];
    let lead = raw.len() - raw.trim_start_matches('.').len();
    let trimmed = raw.trim_matches('.');
    if !trimmed.is_empty() {
        out.push((start + lead, trimmed));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_word() {
        assert_eq!(find_whole_word("apple's pie", "apple"), vec![(0, 5)]);
        assert!(find_whole_word("pineapple", "apple").is_empty());
        assert!(find_whole_word("apples", "apple").is_empty());
        assert_eq!(count_whole_word("war, war and more war", "war"), 3);
    }

    #[test]
    fn test_ticker_tokens() {
        let toks: Vec<&str> = ticker_tokens("Will BRK.B beat (F)? Yes.")
            .into_iter()
            .map(|(_, t)| t)
            .collect();
        assert_eq!(toks, vec!["Will", "BRK.B", "beat", "F", "Yes"]);
    }
}
