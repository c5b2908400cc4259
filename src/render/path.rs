//! Path decomposition: classify `d` data into a WKT geometry family
//!
//! Closed paths (one or more close-path terminators) become polygons or
//! curve polygons, one ring per terminated segment. Open paths become line
//! strings, multi line strings and compound curves, one per subpath.

use std::fmt;

use crate::ast::{Command, subpaths};
use crate::log::{debug, trace};
use crate::parse::split_fused_arc_params;
use crate::types::fmt_points;

use super::context::RenderContext;
use super::curve_string::{CurveString, CurveStringBuilder, EMPTY_TEXT};

/// Rings with fewer normalized commands than this collapse the whole path.
const MIN_RING_COMMANDS: usize = 5;

/// WKT produced for one `<path>`.
#[derive(Debug, Clone, PartialEq)]
pub enum PathGeometry {
    /// One well-formed geometry
    Single(String),
    /// Sibling geometries of an open path that mixes straight and arc
    /// subpaths; callers decide how to combine them.
    Fragments(Vec<String>),
}

impl PathGeometry {
    /// Every top-level geometry, in emission order.
    pub fn into_fragments(self) -> Vec<String> {
        match self {
            PathGeometry::Single(wkt) => vec![wkt],
            PathGeometry::Fragments(parts) => parts,
        }
    }
}

impl fmt::Display for PathGeometry {
    /// Comma-joined text, as it appears inside a geometry collection.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathGeometry::Single(wkt) => f.write_str(wkt),
            PathGeometry::Fragments(parts) => f.write_str(&parts.join(",")),
        }
    }
}

/// Convert raw path data into WKT.
pub fn path(d: &str, ctx: &RenderContext) -> PathGeometry {
    let d = split_fused_arc_params(d);
    let rings = closed_rings(&d);
    if rings.is_empty() {
        open_path(&d, ctx)
    } else {
        closed_path(&rings, ctx)
    }
}

/// Every run of non-terminator text ending in `z`/`Z`, trimmed.
///
/// Text after the last terminator is not part of any ring and is dropped.
fn closed_rings(d: &str) -> Vec<&str> {
    let mut rings = Vec::new();
    let mut start = 0;
    for (idx, c) in d.char_indices() {
        if c == 'z' || c == 'Z' {
            if idx > start {
                rings.push(d[start..=idx].trim());
            }
            start = idx + 1;
        }
    }
    if start < d.len() {
        trace!(rest = &d[start..], "dropping text after last close path");
    }
    rings
}

struct Ring {
    text: String,
    has_arc: bool,
    command_count: usize,
}

fn ring(data: &str, ctx: &RenderContext) -> Ring {
    let commands = ctx.normalizer.normalize(data);
    let has_arc = commands.iter().any(Command::is_arc);
    let has_other = commands
        .iter()
        .any(|c| !matches!(c, Command::MoveTo(_) | Command::Arc { .. } | Command::ClosePath));
    let curve = CurveStringBuilder::new(ctx).build(&commands);

    let text = if has_arc && has_other {
        compound_curve(&curve)
    } else {
        curve.ring_text()
    };
    Ring {
        text,
        has_arc,
        command_count: commands.len(),
    }
}

fn closed_path(rings: &[&str], ctx: &RenderContext) -> PathGeometry {
    let rings: Vec<Ring> = rings.iter().map(|r| ring(r, ctx)).collect();
    let body = rings
        .iter()
        .map(|r| r.text.as_str())
        .collect::<Vec<_>>()
        .join(",");

    let wkt = if rings.iter().any(|r| r.has_arc) {
        format!("CURVEPOLYGON({})", body)
    } else if rings.iter().any(|r| r.command_count < MIN_RING_COMMANDS) {
        debug!(rings = rings.len(), "ring too short, whole path collapses");
        "LINESTRING EMPTY".to_string()
    } else {
        format!("POLYGON({})", body)
    };
    PathGeometry::Single(wkt)
}

fn open_path(d: &str, ctx: &RenderContext) -> PathGeometry {
    let commands = ctx.normalizer.normalize(d);
    let (arc_groups, linear_groups): (Vec<&[Command]>, Vec<&[Command]>) = subpaths(&commands)
        .into_iter()
        .partition(|group| group.iter().any(Command::is_arc));

    let mut parts = Vec::new();
    match linear_groups.as_slice() {
        [] => {}
        [group] => {
            let curve = CurveStringBuilder::new(ctx).build(group);
            parts.push(wrap_points("LINESTRING", &curve));
        }
        groups => {
            let members: Vec<String> = groups
                .iter()
                .map(|group| {
                    let curve = CurveStringBuilder::new(ctx).build(group);
                    if curve.is_empty() {
                        EMPTY_TEXT.to_string()
                    } else {
                        format!("({})", fmt_points(&curve.line_points()))
                    }
                })
                .collect();
            parts.push(format!("MULTILINESTRING({})", members.join(",")));
        }
    }
    for group in arc_groups {
        let curve = CurveStringBuilder::new(ctx).build(group);
        parts.push(compound_curve(&curve));
    }

    trace!(?parts, "open path");
    match parts.len() {
        0 => PathGeometry::Single("LINESTRING EMPTY".to_string()),
        1 => PathGeometry::Single(parts.remove(0)),
        _ => PathGeometry::Fragments(parts),
    }
}

fn wrap_points(kind: &str, curve: &CurveString) -> String {
    if curve.is_empty() {
        format!("{}{}", kind, EMPTY_TEXT)
    } else {
        format!("{}({})", kind, fmt_points(&curve.line_points()))
    }
}

fn compound_curve(curve: &CurveString) -> String {
    if curve.is_empty() {
        format!("COMPOUNDCURVE{}", EMPTY_TEXT)
    } else {
        format!("COMPOUNDCURVE({})", curve.compound_body())
    }
}
