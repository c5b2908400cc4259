//! Error types with rich diagnostics using miette
//!
//! Markup errors carry source spans for readable error messages.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

pub use crate::types::NumericError;

/// Source context for error reporting
#[derive(Debug, Clone)]
pub struct SourceContext {
    /// Name of the source (filename or "<input>")
    pub name: String,
    /// The full source text
    pub source: String,
}

impl SourceContext {
    /// Create a new source context
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }

    /// Create a NamedSource for miette
    pub fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(&self.name, self.source.clone())
    }

    /// Byte offset of a 1-based row/column position, clamped to the source.
    pub fn offset_of(&self, row: u32, col: u32) -> usize {
        let mut offset = 0;
        for (idx, line) in self.source.split_inclusive('\n').enumerate() {
            if idx + 1 == row as usize {
                let col_bytes = line
                    .char_indices()
                    .nth(col.saturating_sub(1) as usize)
                    .map(|(i, _)| i)
                    .unwrap_or(line.len());
                return offset + col_bytes;
            }
            offset += line.len();
        }
        self.source.len()
    }
}

// ============================================================================
// Conversion Errors
// ============================================================================

/// Errors that abort a whole conversion. There is never a partial result.
#[derive(Error, Diagnostic, Debug)]
pub enum ConvertError {
    #[error("empty input")]
    #[diagnostic(
        code(svg2wkt::empty_input),
        help("pass SVG markup containing at least one element")
    )]
    EmptyInput,

    #[error("invalid markup: {message}")]
    #[diagnostic(code(svg2wkt::invalid_markup))]
    InvalidMarkup {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("parser stopped here")]
        span: SourceSpan,
    },
}

impl ConvertError {
    /// Wrap an XML parser failure with a span pointing at the reported position.
    pub fn invalid_markup(ctx: &SourceContext, err: &roxmltree::Error) -> Self {
        let pos = err.pos();
        let offset = ctx.offset_of(pos.row, pos.col);
        ConvertError::InvalidMarkup {
            message: err.to_string(),
            src: ctx.named_source(),
            span: SourceSpan::from(offset..offset),
        }
    }
}
