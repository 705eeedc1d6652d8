//! Subsequence fuzzy matching for the label/epic search.

/// One accepted candidate and where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FuzzyMatch {
    /// Index into the candidate slice passed to [`FuzzyMatcher::find`].
    pub index: usize,
    pub score: i64,
}

/// Rank `candidates` against `query`, best first.
pub trait FuzzyMatcher {
    fn find(&self, query: &str, candidates: &[String]) -> Vec<FuzzyMatch>;
}

/// Case-insensitive ordered-subsequence matcher.
///
/// Each matched character scores 10, with 8 more when it directly follows
/// the previous match and 6 more at a word start. Longer haystacks pay a
/// small length penalty. Candidates missing any query character are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubsequenceMatcher;

impl SubsequenceMatcher {
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn score(query: &str, haystack: &str) -> Option<i64> {
        let query_chars: Vec<char> = query.to_lowercase().chars().collect();
        let text_chars: Vec<char> = haystack.to_lowercase().chars().collect();

        if query_chars.is_empty() {
            return Some(0);
        }
        if query_chars.len() > text_chars.len() {
            return None;
        }

        let mut query_index = 0usize;
        let mut score = 0i64;
        let mut last_match_index: Option<usize> = None;

        for (i, ch) in text_chars.iter().enumerate() {
            if query_index >= query_chars.len() {
                break;
            }
            if *ch != query_chars[query_index] {
                continue;
            }

            score += 10;
            if last_match_index.is_some_and(|last| i == last + 1) {
                score += 8;
            }
            if i == 0 || is_boundary(text_chars[i - 1]) {
                score += 6;
            }
            last_match_index = Some(i);
            query_index += 1;
        }

        (query_index == query_chars.len()).then(|| score - (text_chars.len() as i64 / 8))
    }
}

fn is_boundary(ch: char) -> bool {
    ch.is_whitespace() || matches!(ch, '/' | '_' | '-' | '.')
}

impl FuzzyMatcher for SubsequenceMatcher {
    fn find(&self, query: &str, candidates: &[String]) -> Vec<FuzzyMatch> {
        let mut matches: Vec<FuzzyMatch> = candidates
            .iter()
            .enumerate()
            .filter_map(|(index, candidate)| {
                Self::score(query, candidate).map(|score| FuzzyMatch { index, score })
            })
            .collect();
        matches.sort_by(|a, b| b.score.cmp(&a.score));
        matches
    }
}
