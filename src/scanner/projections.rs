use super::scan::{split_lines, ReferenceScanner};
use super::token::{byte_offset, char_offset};
use crate::resolution::{join_path, PathResolver};
use crate::types::*;

/// Language tag of the path block in hover payloads.
pub const PATH_BLOCK_LANGUAGE: &str = "text";

impl<'a> ReferenceScanner<'a> {
    /// Hover content for the token at `position`, if any.
    ///
    /// The position hits a token when it lies on the token's line within
    /// `[token_start, token_end]`. Unknown ids produce no hover; when two
    /// tokens touch, the first one whose id resolves is used.
    pub fn hover(&self, text: &str, position: Position, code_language: &str) -> Option<HoverPayload> {
        let lines = split_lines(text);
        let line = *lines.get(position.line as usize)?;

        let (m, resource, path) = self
            .grammar
            .find_all(line)
            .into_iter()
            .filter(|span| {
                let start = char_offset(line, span.start);
                let end = char_offset(line, span.end);
                position.character >= start && position.character <= end
            })
            .find_map(|span| {
                let mut m = self.build_match(position.line, line, &span, None);
                let resource = m.resource.take()?;
                let path = m.path.take()?;
                Some((m, resource, path))
            })?;

        Some(HoverPayload {
            range: Range {
                start: Position::new(m.line, m.token_start),
                end: Position::new(m.line, m.token_end),
            },
            blocks: vec![
                HoverBlock {
                    language: PATH_BLOCK_LANGUAGE.to_string(),
                    value: join_path(&path, self.delimiter),
                },
                HoverBlock {
                    language: code_language.to_string(),
                    value: resource.code,
                },
            ],
        })
    }

    /// One completion item per resource, in snapshot order, when `prefix`
    /// ends with an opened token. Otherwise empty. Filtering by what the user
    /// types next is left to the host.
    pub fn completions(&self, prefix: &str) -> Vec<CompletionItem> {
        if !self.grammar.is_completion_trigger(prefix) {
            return Vec::new();
        }

        let resolver = PathResolver::new(self.snapshot);
        self.snapshot
            .records()
            .iter()
            .map(|resource| {
                let path = join_path(&resolver.resolve(resource), self.delimiter);
                CompletionItem {
                    label: format!("{}: {}", resource.id, path),
                    detail: path,
                    insert_text: resource.id.to_string(),
                    sort_text: resource.name.to_lowercase(),
                }
            })
            .collect()
    }

    /// Completions for a cursor inside a buffer: the prefix is the cursor's
    /// line up to the cursor.
    pub fn completions_at(&self, text: &str, position: Position) -> Vec<CompletionItem> {
        let lines = split_lines(text);
        match lines.get(position.line as usize) {
            Some(line) => self.completions(&line[..byte_offset(line, position.character)]),
            None => Vec::new(),
        }
    }
}
