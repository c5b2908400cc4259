//! Curve-string builder for one ring or subpath.
//!
//! Walks normalized commands with a small state machine and produces typed
//! fragments: straight runs become `LineString` fragments, circular arcs
//! become three-point `CircularString` fragments, and every other curve is
//! flattened into the straight run.
//!
//! # State
//!
//! - **current point**: where the pen is, starting at the origin
//! - **first point**: the first point the pen moved to, used to close rings
//! - **pending buffer**: straight points not yet flushed into a fragment
//! - **fragments**: completed fragments, in drawing order
//!
//! The wrapping keyword (`LINESTRING`, `COMPOUNDCURVE`, a polygon ring...)
//! is chosen by the caller; see [`super::path`].

use glam::DVec2;

use crate::ast::Command;
use crate::log::trace;
use crate::types::fmt_points;

use super::context::RenderContext;
use super::geometry::{CurveSegment, curve_midpoint, sample_curve};

/// Text of a curve string with no fragments. The leading space lets callers
/// append it straight after a keyword (`LINESTRING EMPTY`).
pub const EMPTY_TEXT: &str = " EMPTY";

/// A completed piece of a curve string.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    /// Straight segments through these points
    LineString(Vec<DVec2>),
    /// A circular arc through start, midpoint and end
    CircularString([DVec2; 3]),
}

impl Fragment {
    /// Text of this fragment as a member of a `COMPOUNDCURVE`.
    pub fn compound_member(&self) -> String {
        match self {
            Fragment::LineString(points) => format!("({})", fmt_points(points)),
            Fragment::CircularString(points) => format!("CIRCULARSTRING({})", fmt_points(points)),
        }
    }
}

/// The fragments of one ring or subpath.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurveString {
    pub fragments: Vec<Fragment>,
}

impl CurveString {
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// All straight points in order, as one coordinate list.
    pub fn line_points(&self) -> Vec<DVec2> {
        self.fragments
            .iter()
            .flat_map(|f| match f {
                Fragment::LineString(points) => points.clone(),
                Fragment::CircularString(points) => points.to_vec(),
            })
            .collect()
    }

    /// Body of a `COMPOUNDCURVE(...)`: member fragments, comma-joined.
    pub fn compound_body(&self) -> String {
        self.fragments
            .iter()
            .map(Fragment::compound_member)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Text of a ring standing on its own inside a polygon: the fragments
    /// comma-joined, or [`EMPTY_TEXT`] when nothing was drawn.
    pub fn ring_text(&self) -> String {
        if self.is_empty() {
            return EMPTY_TEXT.to_string();
        }
        self.compound_body()
    }
}

/// Builder that turns one subpath's commands into a [`CurveString`].
pub struct CurveStringBuilder<'a> {
    ctx: &'a RenderContext<'a>,
    current: DVec2,
    first: Option<DVec2>,
    pending: Vec<DVec2>,
    fragments: Vec<Fragment>,
}

impl<'a> CurveStringBuilder<'a> {
    pub fn new(ctx: &'a RenderContext<'a>) -> Self {
        Self {
            ctx,
            current: DVec2::ZERO,
            first: None,
            pending: Vec::new(),
            fragments: Vec::new(),
        }
    }

    /// Run every command and return the finished curve string.
    pub fn build(mut self, commands: &[Command]) -> CurveString {
        for command in commands {
            self.command(command);
        }
        if self.pending.len() > 1 {
            self.flush();
        }
        CurveString {
            fragments: self.fragments,
        }
    }

    fn command(&mut self, command: &Command) {
        trace!(?command, current = ?self.current, "curve string command");
        match command {
            Command::MoveTo(_) => {}
            Command::LineTo(to) => {
                self.seed();
                self.pending.push(*to);
            }
            Command::ClosePath => {
                if let Some(first) = self.first {
                    if first != self.current {
                        self.pending.push(first);
                    }
                }
            }
            Command::Arc { .. } if command.is_circular_arc() => {
                self.flush();
                if let Some(segment) = CurveSegment::from_command(self.current, command) {
                    let mid = curve_midpoint(self.ctx.engine, &segment, &self.ctx.config);
                    self.fragments
                        .push(Fragment::CircularString([segment.start(), mid, segment.end()]));
                }
            }
            Command::Arc { .. } | Command::Cubic { .. } | Command::Quadratic { .. } => {
                if let Some(segment) = CurveSegment::from_command(self.current, command) {
                    let samples = sample_curve(self.ctx.engine, &segment, &self.ctx.config);
                    self.pending.extend(samples);
                }
            }
        }
        self.advance(command);
    }

    /// Move the pen to the command's final coordinate pair, if it has one.
    fn advance(&mut self, command: &Command) {
        if let Some(to) = command.end_point() {
            self.current = to;
            if self.first.is_none() {
                self.first = Some(to);
            }
        }
    }

    /// Start a straight run at the pen position.
    fn seed(&mut self) {
        if self.pending.is_empty() {
            self.pending.push(self.current);
        }
    }

    /// Move pending straight points into a `LineString` fragment.
    fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let points = std::mem::take(&mut self.pending);
        self.fragments.push(Fragment::LineString(points));
    }
}
