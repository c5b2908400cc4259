//! Convert SVG shape markup into Well-Known Text.
//!
//! ```
//! let out = svg2wkt::convert(r#"<svg><rect width="10" height="10"/></svg>"#).unwrap();
//! assert_eq!(out.detail, "GEOMETRYCOLLECTION(POLYGON((0 0,10 0,10 -10,0 -10,0 0)))");
//! ```

use pest_derive::Parser;

pub mod ast;
pub mod errors;
pub mod log;
pub mod parse;
pub mod render;
pub mod types;

pub use errors::ConvertError;
pub use parse::{PathDataNormalizer, PathNormalizer};
pub use render::geometry::{CurveEngine, CurveSegment, KurboEngine};
pub use render::types::{Conversion, Space, TextString};
pub use types::{Config, Density, NumericError, Precision};

use crate::errors::SourceContext;
#[cfg(feature = "tracing")]
use crate::log::debug;
use crate::render::RenderContext;

#[derive(Parser)]
#[grammar = "svg.pest"]
pub struct SvgDataParser;

/// Converts markup with one configuration and one set of collaborators.
pub struct Converter {
    config: Config,
    normalizer: Box<dyn PathNormalizer>,
    engine: Box<dyn CurveEngine>,
}

impl Converter {
    /// Converter using the pest path normalizer and the kurbo curve engine.
    pub fn new(config: Config) -> Self {
        Self::with_collaborators(config, PathDataNormalizer, KurboEngine::default())
    }

    pub fn with_collaborators(
        config: Config,
        normalizer: impl PathNormalizer + 'static,
        engine: impl CurveEngine + 'static,
    ) -> Self {
        Self {
            config,
            normalizer: Box::new(normalizer),
            engine: Box::new(engine),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Convert SVG markup.
    ///
    /// Fails on blank input and on markup the XML parser rejects; everything
    /// else (unknown tags, bad numbers, broken path data) degrades inside
    /// the result instead.
    pub fn convert(&self, markup: &str) -> Result<Conversion, ConvertError> {
        if markup.trim().is_empty() {
            return Err(ConvertError::EmptyInput);
        }

        let options = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..roxmltree::ParsingOptions::default()
        };
        let doc = roxmltree::Document::parse_with_options(markup, options)
            .map_err(|e| ConvertError::invalid_markup(&SourceContext::new("<input>", markup), &e))?;
        debug!(config = ?self.config, "converting document");

        let ctx = RenderContext::new(self.config, self.normalizer.as_ref(), self.engine.as_ref());
        Ok(render::render(&doc, &ctx))
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// Convert SVG markup with the default configuration.
pub fn convert(markup: &str) -> Result<Conversion, ConvertError> {
    Converter::default().convert(markup)
}
