//! Name matching and scoring.

use std::ops::Range;

/// True when every char of `needle` appears in `haystack` in order.
pub fn is_subsequence(needle: &str, haystack: &str) -> bool {
    let mut rest = haystack.chars();
    needle.chars().all(|c| rest.any(|h| h == c))
}

/// Edit distance between two strings, counted in chars.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut cur = vec![0; b.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        cur[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let substitute = prev[j] + usize::from(ca != cb);
            cur[j + 1] = substitute.min(prev[j + 1] + 1).min(cur[j] + 1);
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[b.len()]
}

/// Score a lowercase query against a lowercase name.
///
/// Returns `None` unless the query is a subsequence of the name. The score
/// is the name length minus the edit distance, plus twice the query length
/// when the query occurs verbatim.
pub fn score(query: &str, name: &str) -> Option<i64> {
    if !is_subsequence(query, name) {
        return None;
    }
    let len = |s: &str| s.chars().count() as i64;
    let mut score = len(name) - levenshtein(query, name) as i64;
    if name.contains(query) {
        score += len(query) * 2;
    }
    Some(score)
}

/// Byte ranges of `name` matched by the words of `query`.
///
/// Words are matched case-insensitively (ASCII), left to right, each
/// search starting where the previous match ended. Words that do not
/// occur are skipped.
pub fn match_ranges(name: &str, query: &str) -> Vec<Range<usize>> {
    let lower_name = name.to_ascii_lowercase();
    let lower_query = query.to_ascii_lowercase();
    let mut ranges = Vec::new();
    let mut from = 0;

    for word in lower_query.split_whitespace() {
        if let Some(pos) = lower_name[from..].find(word) {
            let start = from + pos;
            let end = start + word.len();
            ranges.push(start..end);
            from = end;
        }
    }
    ranges
}

/// Wrap each range of `name` with `open`/`close` markers.
pub fn highlight(name: &str, ranges: &[Range<usize>], open: &str, close: &str) -> String {
    let mut out = String::with_capacity(name.len() + ranges.len() * (open.len() + close.len()));
    let mut last = 0;
    for range in ranges {
        out.push_str(&name[last..range.start]);
        out.push_str(open);
        out.push_str(&name[range.clone()]);
        out.push_str(close);
        last = range.end;
    }
    out.push_str(&name[last..]);
    out
}
