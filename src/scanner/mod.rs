//! Reference scanning.
//!
//! Finds `getRes(<digits>)` tokens in text, resolves them against the live
//! snapshot and projects the results into annotations, a status line, hover
//! content and completion items for the host to render.

/// Hover and completion projections.
mod projections;

/// Whole-buffer scan and cursor classification.
mod scan;

/// Hand-written token grammar.
pub mod token;

pub use projections::PATH_BLOCK_LANGUAGE;
pub use scan::{split_lines, ReferenceScanner};
pub use token::{TokenGrammar, TokenSpan};
