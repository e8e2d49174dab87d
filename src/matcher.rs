//! Text matching for track search.
//!
//! A single token matches a fragment on exact equality, case-sensitive
//! substring, or substring after Unicode lowercasing. Lowercasing leaves
//! uncased scripts (CJK, kana, Hebrew...) untouched, so containment over
//! those is plain code-point containment.
//!
//! A multi-word query matches a record when every token is found in at least
//! one fragment. Tokens may land in different fragments and in any order;
//! there is no phrase matching.

/// One whitespace-delimited piece of a query, with its lowercased form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'q> {
    pub raw: &'q str,
    pub folded: String,
}

impl<'q> Token<'q> {
    pub fn new(raw: &'q str) -> Self {
        Self {
            raw,
            folded: raw.to_lowercase(),
        }
    }

    pub fn matches(&self, fragment: &str) -> bool {
        if fragment.is_empty() {
            return false;
        }
        if fragment == self.raw || fragment.contains(self.raw) {
            return true;
        }
        fragment.to_lowercase().contains(&self.folded)
    }
}

/// A parsed, non-empty search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query<'q> {
    text: &'q str,
    tokens: Vec<Token<'q>>,
}

impl<'q> Query<'q> {
    /// Trim and tokenize. Returns `None` for an empty or whitespace-only query.
    pub fn parse(raw: &'q str) -> Option<Self> {
        let text = raw.trim();
        if text.is_empty() {
            return None;
        }
        let tokens = text.split_whitespace().map(Token::new).collect();
        Some(Self { text, tokens })
    }

    /// Trimmed query text.
    pub fn text(&self) -> &'q str {
        self.text
    }

    pub fn tokens(&self) -> &[Token<'q>] {
        &self.tokens
    }

    /// Every token must be found in some fragment.
    pub fn matches_fragments(&self, fragments: &[&str]) -> bool {
        self.tokens
            .iter()
            .all(|token| fragments.iter().any(|f| token.matches(f)))
    }
}

/// Whether `fragment` satisfies the single-word `query`.
pub fn fragment_matches(fragment: &str, query: &str) -> bool {
    Token::new(query).matches(fragment)
}

/// Whether a record's fragments satisfy `query`.
///
/// Zero tokens never match here; callers short-circuit empty queries.
pub fn record_matches(fragments: &[&str], query: &str) -> bool {
    match Query::parse(query) {
        Some(q) => q.matches_fragments(fragments),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_exact_and_substring() {
        assert!(fragment_matches("Lemon", "Lemon"));
        assert!(fragment_matches("Gimme Shelter", "Shelt"));
        assert!(fragment_matches("Gimme Shelter", "shelt"));
        assert!(fragment_matches("gimme shelter", "SHELTER"));
        assert!(!fragment_matches("Orange", "Lemon"));
    }

    #[test]
    fn test_fragment_empty() {
        assert!(!fragment_matches("", "a"));
        assert!(!fragment_matches("", ""));
    }

    #[test]
    fn test_fragment_cjk() {
        let artist = "ずっと真夜中でいいのに。";
        assert!(fragment_matches(artist, "ずっと"));
        assert!(fragment_matches(artist, "真夜中"));
        assert!(fragment_matches(artist, artist));
        assert!(!fragment_matches(artist, "真昼"));
        assert!(fragment_matches("周杰伦 Jay Chou", "jay"));
    }

    #[test]
    fn test_fragment_unicode_case_folding() {
        assert!(fragment_matches("BJÖRK", "björk"));
        assert!(fragment_matches("Ария", "АРИЯ"));
        assert!(fragment_matches("ΣΩΚΡΆΤΗΣ", "σωκ"));
    }

    #[test]
    fn test_query_parse() {
        assert!(Query::parse("").is_none());
        assert!(Query::parse(" \t\n ").is_none());
        // ideographic space is whitespace too
        assert!(Query::parse("\u{3000}").is_none());

        let q = Query::parse("  Queen   Rhapsody ").unwrap();
        assert_eq!(q.text(), "Queen   Rhapsody");
        let raw: Vec<&str> = q.tokens().iter().map(|t| t.raw).collect();
        assert_eq!(raw, vec!["Queen", "Rhapsody"]);
        assert_eq!(q.tokens()[0].folded, "queen");

        let cjk = Query::parse("ずっと\u{3000}真夜中").unwrap();
        assert_eq!(cjk.tokens().len(), 2);
    }

    #[test]
    fn test_record_single_token_any_fragment() {
        let fragments = ["Bohemian Rhapsody", "Queen"];
        assert!(record_matches(&fragments, "queen"));
        assert!(record_matches(&fragments, "rhap"));
        assert!(!record_matches(&fragments, "Beatles"));
    }

    #[test]
    fn test_record_tokens_across_fragments() {
        let fragments = ["Bohemian Rhapsody", "Queen"];
        assert!(record_matches(&fragments, "Queen Rhapsody"));
        assert!(!record_matches(&fragments, "Queen Beatles"));
    }

    #[test]
    fn test_record_no_phrase_matching() {
        // Word order and adjacency are not checked
        let fragments = ["Bohemian Rhapsody"];
        assert!(record_matches(&fragments, "Rhapsody Bohemian"));
        assert!(record_matches(&fragments, "rhapsody bohemian"));
        assert!(record_matches(&fragments, "Bohemian Bohemian"));
    }

    #[test]
    fn test_record_no_fragments() {
        assert!(!record_matches(&[], "anything"));
        assert!(!record_matches(&["", ""], "a"));
    }

    #[test]
    fn test_record_empty_query_is_not_a_match() {
        assert!(!record_matches(&["Lemon"], ""));
        assert!(!record_matches(&["Lemon"], "   "));
    }
}
