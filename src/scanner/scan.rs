use tracing::debug;

use super::token::{char_offset, TokenGrammar, TokenSpan};
use crate::resolution::{join_path, PathResolver};
use crate::store::Snapshot;
use crate::types::*;

/// Splits a buffer into lines on `\n`, dropping a trailing `\r` from each.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect()
}

/// Scans text for reference tokens and resolves them against one snapshot.
///
/// A scanner borrows everything it reads and holds no state between calls, so
/// a fresh one is created for every request.
pub struct ReferenceScanner<'a> {
    pub(super) snapshot: &'a Snapshot,
    pub(super) grammar: &'a TokenGrammar,
    pub(super) delimiter: &'a str,
}

impl<'a> ReferenceScanner<'a> {
    pub fn new(snapshot: &'a Snapshot, grammar: &'a TokenGrammar, delimiter: &'a str) -> Self {
        Self {
            snapshot,
            grammar,
            delimiter,
        }
    }

    /// Looks up the resource named by a token's digit run.
    ///
    /// The digits are tried as written first; if that misses and they carry
    /// leading zeros, the zero-stripped form is tried.
    pub fn resolve_id(&self, id_text: &str) -> Option<&'a Resource> {
        if let Some(resource) = self.snapshot.lookup(id_text) {
            return Some(resource);
        }
        let trimmed = id_text.trim_start_matches('0');
        let canonical = if trimmed.is_empty() { "0" } else { trimmed };
        if canonical != id_text {
            return self.snapshot.lookup(canonical);
        }
        None
    }

    /// Builds the match for one token on one line.
    pub(super) fn build_match(
        &self,
        line_index: u32,
        line: &str,
        span: &TokenSpan,
        cursor: Option<Position>,
    ) -> ReferenceMatch {
        let id_text = span.id_text(line);
        let id_start = char_offset(line, span.id_start);
        let id_end = char_offset(line, span.id_end);
        let resource = self.resolve_id(id_text);
        let path = resource.map(|r| PathResolver::new(self.snapshot).resolve(r));

        let cursor_overlap = cursor.is_some_and(|c| {
            c.line == line_index && c.character >= id_start && c.character <= id_end
        });

        ReferenceMatch {
            line: line_index,
            id_text: id_text.to_string(),
            id_start,
            id_end,
            token_start: char_offset(line, span.start),
            token_end: char_offset(line, span.end),
            resource: resource.cloned(),
            path,
            cursor_overlap,
        }
    }

    /// Every token occurrence in `lines`, resolved or not, in scan order.
    pub fn find_matches(&self, lines: &[&str], cursor: Option<Position>) -> Vec<ReferenceMatch> {
        let mut matches = Vec::new();
        for (i, line) in lines.iter().enumerate() {
            for span in self.grammar.find_all(line) {
                matches.push(self.build_match(i as u32, line, &span, cursor));
            }
        }
        matches
    }

    /// Scans a whole buffer.
    ///
    /// Unresolved ids are skipped. A resolved token under the cursor produces
    /// the status payload instead of an annotation; if several do, the last one
    /// in scan order wins. The status names the resource by its own id, so
    /// `getRes(007)` reports `7:<path>`.
    pub fn scan_lines(&self, lines: &[&str], cursor: Option<Position>) -> ScanResult {
        let mut result = ScanResult::default();

        for m in self.find_matches(lines, cursor) {
            let (Some(resource), Some(path)) = (&m.resource, &m.path) else {
                continue;
            };
            let joined = join_path(path, self.delimiter);

            if m.cursor_overlap {
                result.status = Some(StatusPayload {
                    text: format!("{}:{}", resource.id, joined),
                });
            } else {
                result.annotations.push(AnnotationRequest {
                    position: Position::new(m.line, m.id_end),
                    text: joined,
                    style: AnnotationStyle::Muted,
                });
            }
            result.matches.push(m);
        }

        debug!(
            lines = lines.len(),
            annotations = result.annotations.len(),
            status = result.status.is_some(),
            "scanned buffer"
        );
        result
    }

    /// Splits `text` into lines and scans it.
    pub fn scan(&self, text: &str, cursor: Option<Position>) -> ScanResult {
        self.scan_lines(&split_lines(text), cursor)
    }
}
