//! Default settings and text metrics

/// Decimal digits kept on sampled or derived coordinates.
pub const PRECISION: u32 = 3;
/// Curve samples per unit of path length.
pub const DENSITY: f64 = 1.0;
/// SVG initial value of `font-size`, in user units.
pub const FONT_SIZE: f64 = 16.0;
/// Average glyph advance as a fraction of the font size.
pub const CHARWID: f64 = 0.08 / 0.14;
/// Tolerance handed to kurbo for arc conversion and arc-length queries.
pub const CURVE_ACCURACY: f64 = 1e-6;
/// Upper bound on points produced for one flattened curve or ellipse.
pub const MAX_SAMPLES: usize = 100_000;
