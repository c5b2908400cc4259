//! Numeric primitives shared by every builder.
//!
//! Coordinates are plain `glam::DVec2` in source space (Y grows downward).
//! The Y flip to WKT space happens exactly once, in [`fmt_point`].

use std::fmt;

use glam::DVec2;

use crate::log::warn;
use crate::render::defaults;

/// Error type for invalid numeric values
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericError {
    /// Value is NaN
    NaN,
    /// Value is infinite
    Infinite,
    /// Value is zero when non-zero required
    Zero,
    /// Value is negative when positive required
    Negative,
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericError::NaN => write!(f, "value is NaN"),
            NumericError::Infinite => write!(f, "value is infinite"),
            NumericError::Zero => write!(f, "value is zero"),
            NumericError::Negative => write!(f, "value is negative"),
        }
    }
}

impl std::error::Error for NumericError {}

/// Number of decimal digits kept on sampled or derived coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Precision(pub u32);

impl Precision {
    /// Round `value` to this many decimals, half away from zero.
    ///
    /// Rounding an already rounded value again is a no-op.
    #[inline]
    pub fn round(self, value: f64) -> f64 {
        let factor = 10f64.powi(self.0 as i32);
        (value * factor).round() / factor
    }

    /// Round both components of a point.
    #[inline]
    pub fn round_point(self, p: DVec2) -> DVec2 {
        DVec2::new(self.round(p.x), self.round(p.y))
    }
}

impl Default for Precision {
    fn default() -> Self {
        Precision(defaults::PRECISION)
    }
}

/// Sample points per unit of path length used when flattening curves.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct Density(f64);

impl Density {
    /// Create a Density with validation (must be positive and finite)
    #[inline]
    pub fn try_new(val: f64) -> Result<Density, NumericError> {
        if val.is_nan() {
            Err(NumericError::NaN)
        } else if val.is_infinite() {
            Err(NumericError::Infinite)
        } else if val == 0.0 {
            Err(NumericError::Zero)
        } else if val < 0.0 {
            Err(NumericError::Negative)
        } else {
            Ok(Density(val))
        }
    }

    /// Number of flattening steps for a curve of the given length, capped
    /// at [`defaults::MAX_SAMPLES`].
    #[inline]
    pub fn steps(self, length: f64) -> usize {
        let steps = (length * self.0).round();
        if !(steps.is_finite() && steps > 0.0) {
            return 0;
        }
        if steps > defaults::MAX_SAMPLES as f64 {
            warn!(length, steps, cap = defaults::MAX_SAMPLES, "sample count capped");
            return defaults::MAX_SAMPLES;
        }
        steps as usize
    }

    #[inline]
    pub fn raw(self) -> f64 {
        self.0
    }
}

impl Default for Density {
    fn default() -> Self {
        Density(defaults::DENSITY)
    }
}

/// Conversion settings, passed explicitly to every builder.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Config {
    pub precision: Precision,
    pub density: Density,
}

impl Config {
    pub fn new(precision: u32, density: f64) -> Result<Self, NumericError> {
        Ok(Self {
            precision: Precision(precision),
            density: Density::try_new(density)?,
        })
    }

    pub fn with_precision(mut self, digits: u32) -> Self {
        self.precision = Precision(digits);
        self
    }

    pub fn with_density(mut self, density: f64) -> Result<Self, NumericError> {
        self.density = Density::try_new(density)?;
        Ok(self)
    }
}

/// Format a number the way JavaScript's `Number#toString` does.
///
/// `-0` prints as `0`; NaN and infinities print as `NaN`, `Infinity`
/// and `-Infinity`.
pub fn fmt_num(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    // -0.0 == 0.0, so this also drops the sign of negative zero
    let value = if value == 0.0 { 0.0 } else { value };
    let mut buf = ryu_js::Buffer::new();
    buf.format_finite(value).to_string()
}

/// Format a source-space point as a WKT coordinate pair, negating Y.
pub fn fmt_point(p: DVec2) -> String {
    format!("{} {}", fmt_num(p.x), fmt_num(-p.y))
}

/// Format a run of points as `x1 y1,x2 y2,...`.
pub fn fmt_points(points: &[DVec2]) -> String {
    points
        .iter()
        .map(|p| fmt_point(*p))
        .collect::<Vec<_>>()
        .join(",")
}
