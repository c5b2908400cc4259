//! Curve geometry: one-segment curves, arc-length queries and flattening

use glam::{DVec2, dvec2};
use kurbo::{BezPath, ParamCurve, ParamCurveArclen, PathSeg};

use crate::ast::Command;
use crate::types::Config;

use super::defaults;

/// A single curved segment synthesized from the pen position and one command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CurveSegment {
    Arc {
        from: DVec2,
        radii: DVec2,
        /// Degrees
        x_rotation: f64,
        large_arc: bool,
        sweep: bool,
        to: DVec2,
    },
    Cubic {
        from: DVec2,
        ctrl1: DVec2,
        ctrl2: DVec2,
        to: DVec2,
    },
    Quadratic {
        from: DVec2,
        ctrl: DVec2,
        to: DVec2,
    },
}

impl CurveSegment {
    /// Build the segment `command` draws when the pen is at `from`.
    ///
    /// Returns `None` for commands that are not curves.
    pub fn from_command(from: DVec2, command: &Command) -> Option<Self> {
        match *command {
            Command::Arc {
                radii,
                x_rotation,
                large_arc,
                sweep,
                to,
            } => Some(CurveSegment::Arc {
                from,
                radii,
                x_rotation,
                large_arc,
                sweep,
                to,
            }),
            Command::Cubic { ctrl1, ctrl2, to } => Some(CurveSegment::Cubic {
                from,
                ctrl1,
                ctrl2,
                to,
            }),
            Command::Quadratic { ctrl, to } => Some(CurveSegment::Quadratic { from, ctrl, to }),
            Command::MoveTo(_) | Command::LineTo(_) | Command::ClosePath => None,
        }
    }

    pub fn start(&self) -> DVec2 {
        match *self {
            CurveSegment::Arc { from, .. }
            | CurveSegment::Cubic { from, .. }
            | CurveSegment::Quadratic { from, .. } => from,
        }
    }

    pub fn end(&self) -> DVec2 {
        match *self {
            CurveSegment::Arc { to, .. }
            | CurveSegment::Cubic { to, .. }
            | CurveSegment::Quadratic { to, .. } => to,
        }
    }
}

/// Length and point-at-length queries on a curve segment.
pub trait CurveEngine {
    /// Total arc length of the segment.
    fn length(&self, segment: &CurveSegment) -> f64;

    /// Point at `distance` along the segment, clamped to its ends.
    fn point_at_length(&self, segment: &CurveSegment, distance: f64) -> DVec2;
}

/// Curve engine backed by kurbo's arc-length machinery.
///
/// Arcs are converted to cubic Beziers first; arcs kurbo cannot build
/// (zero radius, coincident endpoints) fall back to the straight chord.
#[derive(Debug, Clone, Copy)]
pub struct KurboEngine {
    pub accuracy: f64,
}

impl Default for KurboEngine {
    fn default() -> Self {
        Self {
            accuracy: defaults::CURVE_ACCURACY,
        }
    }
}

impl KurboEngine {
    fn segments(&self, segment: &CurveSegment) -> Vec<PathSeg> {
        match *segment {
            CurveSegment::Arc {
                from,
                radii,
                x_rotation,
                large_arc,
                sweep,
                to,
            } => {
                let svg_arc = kurbo::SvgArc {
                    from: kpt(from),
                    to: kpt(to),
                    radii: kurbo::Vec2::new(radii.x.abs(), radii.y.abs()),
                    x_rotation: x_rotation.to_radians(),
                    large_arc,
                    sweep,
                };
                match kurbo::Arc::from_svg_arc(&svg_arc) {
                    Some(arc) => {
                        let mut path = BezPath::new();
                        path.move_to(kpt(from));
                        for el in arc.append_iter(self.accuracy) {
                            path.push(el);
                        }
                        path.segments().collect()
                    }
                    None => vec![PathSeg::Line(kurbo::Line::new(kpt(from), kpt(to)))],
                }
            }
            CurveSegment::Cubic {
                from,
                ctrl1,
                ctrl2,
                to,
            } => vec![PathSeg::Cubic(kurbo::CubicBez::new(
                kpt(from),
                kpt(ctrl1),
                kpt(ctrl2),
                kpt(to),
            ))],
            CurveSegment::Quadratic { from, ctrl, to } => vec![PathSeg::Quad(kurbo::QuadBez::new(
                kpt(from),
                kpt(ctrl),
                kpt(to),
            ))],
        }
    }
}

impl CurveEngine for KurboEngine {
    fn length(&self, segment: &CurveSegment) -> f64 {
        self.segments(segment)
            .iter()
            .map(|seg| seg.arclen(self.accuracy))
            .sum()
    }

    fn point_at_length(&self, segment: &CurveSegment, distance: f64) -> DVec2 {
        if !(distance > 0.0) {
            return segment.start();
        }
        let mut remaining = distance;
        for seg in self.segments(segment) {
            let len = seg.arclen(self.accuracy);
            if remaining <= len {
                let t = seg.inv_arclen(remaining, self.accuracy);
                return gpt(seg.eval(t));
            }
            remaining -= len;
        }
        segment.end()
    }
}

fn kpt(p: DVec2) -> kurbo::Point {
    kurbo::Point::new(p.x, p.y)
}

fn gpt(p: kurbo::Point) -> DVec2 {
    dvec2(p.x, p.y)
}

/// Flatten a curve into `steps + 1` evenly spaced points, start and end
/// included, where `steps = round(length * density)`. Points are rounded to
/// the configured precision.
pub fn sample_curve(engine: &dyn CurveEngine, segment: &CurveSegment, config: &Config) -> Vec<DVec2> {
    let length = engine.length(segment);
    let steps = config.density.steps(length);
    if steps == 0 {
        return vec![config.precision.round_point(engine.point_at_length(segment, 0.0))];
    }
    (0..=steps)
        .map(|i| {
            let at = length * i as f64 / steps as f64;
            config.precision.round_point(engine.point_at_length(segment, at))
        })
        .collect()
}

/// Midpoint (by arc length) of a curve, rounded to the configured precision.
pub fn curve_midpoint(engine: &dyn CurveEngine, segment: &CurveSegment, config: &Config) -> DVec2 {
    let half = engine.length(segment) / 2.0;
    config.precision.round_point(engine.point_at_length(segment, half))
}
