//! Rendering context - what every builder needs for one conversion

use crate::parse::PathNormalizer;
use crate::types::Config;

use super::geometry::CurveEngine;

/// Settings and collaborators for one conversion.
///
/// Built fresh per call and passed by reference, so two conversions with
/// different settings never see each other's values.
pub struct RenderContext<'a> {
    pub config: Config,
    /// Raw path data to absolute commands
    pub normalizer: &'a dyn PathNormalizer,
    /// Curve length and point-at-length queries
    pub engine: &'a dyn CurveEngine,
}

impl<'a> RenderContext<'a> {
    pub fn new(config: Config, normalizer: &'a dyn PathNormalizer, engine: &'a dyn CurveEngine) -> Self {
        Self {
            config,
            normalizer,
            engine,
        }
    }
}

impl std::fmt::Debug for RenderContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderContext")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
