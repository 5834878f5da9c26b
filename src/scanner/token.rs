//! Reference token grammar.
//!
//! ```text
//! token := IDENT "(" DIGIT+ ")"
//! DIGIT := "0" ..= "9"
//! ```
//!
//! No whitespace, sign or other character is allowed between the
//! parentheses. Matching is left to right and non-overlapping: after a token
//! matches, the search resumes after its `)`.

use crate::config::DEFAULT_TOKEN_IDENT;

/// Byte offsets of one token within a line. Ends are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenSpan {
    pub start: usize,
    pub end: usize,
    pub id_start: usize,
    pub id_end: usize,
}

impl TokenSpan {
    /// The digit run of this token within `line`.
    pub fn id_text<'l>(&self, line: &'l str) -> &'l str {
        &line[self.id_start..self.id_end]
    }
}

/// Matches `<ident>(<digits>)` tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenGrammar {
    ident: String,
}

impl TokenGrammar {
    pub fn new(ident: &str) -> Self {
        Self {
            ident: ident.to_string(),
        }
    }

    /// Finds every token in `line`, left to right.
    pub fn find_all(&self, line: &str) -> Vec<TokenSpan> {
        let mut spans = Vec::new();
        if self.ident.is_empty() {
            return spans;
        }
        let step = self.ident.chars().next().map_or(1, char::len_utf8);

        let mut pos = 0;
        while let Some(offset) = line[pos..].find(self.ident.as_str()) {
            let start = pos + offset;
            match self.match_at(line, start) {
                Some(span) => {
                    pos = span.end;
                    spans.push(span);
                }
                None => pos = start + step,
            }
        }
        spans
    }

    /// Matches a token starting exactly at byte `start`.
    pub fn match_at(&self, line: &str, start: usize) -> Option<TokenSpan> {
        let bytes = line.as_bytes();
        if !line.get(start..)?.starts_with(self.ident.as_str()) {
            return None;
        }

        let open = start + self.ident.len();
        if bytes.get(open) != Some(&b'(') {
            return None;
        }

        let id_start = open + 1;
        let digits = bytes[id_start..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        if digits == 0 {
            return None;
        }

        let id_end = id_start + digits;
        if bytes.get(id_end) != Some(&b')') {
            return None;
        }

        Some(TokenSpan {
            start,
            end: id_end + 1,
            id_start,
            id_end,
        })
    }

    /// Returns `true` if `prefix` ends with `<ident>(`, i.e. the user has just
    /// opened a token and is about to type its id.
    pub fn is_completion_trigger(&self, prefix: &str) -> bool {
        !self.ident.is_empty()
            && prefix
                .strip_suffix('(')
                .is_some_and(|rest| rest.ends_with(self.ident.as_str()))
    }
}

impl Default for TokenGrammar {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_IDENT)
    }
}

/// Converts a byte offset within `line` to a character offset in UTF-16 code
/// units, the unit editor hosts use for positions.
pub fn char_offset(line: &str, byte: usize) -> u32 {
    line[..byte].encode_utf16().count() as u32
}

/// Converts a UTF-16 character offset within `line` to a byte offset, clamped
/// to the line length. An offset inside a surrogate pair rounds up to the
/// next character.
pub fn byte_offset(line: &str, character: u32) -> usize {
    let mut units = 0u32;
    for (b, c) in line.char_indices() {
        if units >= character {
            return b;
        }
        units += c.len_utf16() as u32;
    }
    line.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_simple_token() {
        let g = TokenGrammar::default();
        let spans = g.find_all("x = getRes(2)");
        assert_eq!(spans.len(), 1);
        let span = spans[0];
        assert_eq!(span.start, 4);
        assert_eq!(span.id_start, 11);
        assert_eq!(span.id_end, 12);
        assert_eq!(span.end, 13);
        assert_eq!(span.id_text("x = getRes(2)"), "2");
    }

    #[test]
    fn test_rejects_malformed_tokens() {
        let g = TokenGrammar::default();
        assert!(g.find_all("getRes()").is_empty());
        assert!(g.find_all("getRes( 2)").is_empty());
        assert!(g.find_all("getRes(2 )").is_empty());
        assert!(g.find_all("getRes(abc)").is_empty());
        assert!(g.find_all("getRes(-2)").is_empty());
        assert!(g.find_all("getRes (2)").is_empty());
        assert!(g.find_all("getres(2)").is_empty());
        assert!(g.find_all("getRes(12").is_empty());
    }

    #[test]
    fn test_multiple_tokens_on_one_line() {
        let g = TokenGrammar::default();
        let line = "f(getRes(1), getRes(22), getRes(x), getRes(333))";
        let ids: Vec<&str> = g.find_all(line).iter().map(|s| s.id_text(line)).collect();
        assert_eq!(ids, vec!["1", "22", "333"]);
    }

    #[test]
    fn test_failed_candidate_does_not_hide_next_token() {
        let g = TokenGrammar::default();
        let line = "getResgetRes(5)";
        let spans = g.find_all(line);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].id_text(line), "5");
    }

    #[test]
    fn test_identifier_inside_longer_name_still_matches() {
        let g = TokenGrammar::default();
        let line = "mygetRes(4)";
        assert_eq!(g.find_all(line).len(), 1);
    }

    #[test]
    fn test_custom_identifier() {
        let g = TokenGrammar::new("res");
        let line = "a = res(10); b = getres(11)";
        let ids: Vec<&str> = g.find_all(line).iter().map(|s| s.id_text(line)).collect();
        assert_eq!(ids, vec!["10", "11"]);
    }

    #[test]
    fn test_completion_trigger() {
        let g = TokenGrammar::default();
        assert!(g.is_completion_trigger("let x = getRes("));
        assert!(!g.is_completion_trigger("let x = getRes"));
        assert!(!g.is_completion_trigger("let x = getRes(1"));
        assert!(!g.is_completion_trigger("("));
    }

    #[test]
    fn test_char_offsets_with_multibyte_text() {
        let line = "é = getRes(3)";
        let g = TokenGrammar::default();
        let span = g.find_all(line)[0];
        assert_eq!(char_offset(line, span.id_start), 11);
        assert_eq!(byte_offset(line, 11), span.id_start);
        assert_eq!(byte_offset(line, 100), line.len());
    }

    #[test]
    fn test_offsets_count_utf16_units() {
        let line = "😀x";
        assert_eq!(char_offset(line, 4), 2);
        assert_eq!(char_offset(line, 5), 3);
        assert_eq!(byte_offset(line, 0), 0);
        assert_eq!(byte_offset(line, 1), 4);
        assert_eq!(byte_offset(line, 2), 4);
        assert_eq!(byte_offset(line, 3), 5);
    }
}
