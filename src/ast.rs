//! Normalized drawing commands
//!
//! These are what the path normalizer hands to the WKT builders: every
//! coordinate is absolute, H/V are folded into `LineTo`, and smooth curves
//! carry their reflected control point explicitly.

use glam::DVec2;

/// One absolute drawing command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    MoveTo(DVec2),
    LineTo(DVec2),
    /// Elliptical arc; `x_rotation` is in degrees, as written in path data.
    Arc {
        radii: DVec2,
        x_rotation: f64,
        large_arc: bool,
        sweep: bool,
        to: DVec2,
    },
    /// Cubic Bezier (C and S)
    Cubic { ctrl1: DVec2, ctrl2: DVec2, to: DVec2 },
    /// Quadratic Bezier (Q and T)
    Quadratic { ctrl: DVec2, to: DVec2 },
    ClosePath,
}

impl Command {
    /// Final coordinate pair of the command, if it carries one.
    ///
    /// `ClosePath` has no parameters and so never moves the pen here.
    pub fn end_point(&self) -> Option<DVec2> {
        match *self {
            Command::MoveTo(to)
            | Command::LineTo(to)
            | Command::Arc { to, .. }
            | Command::Cubic { to, .. }
            | Command::Quadratic { to, .. } => Some(to),
            Command::ClosePath => None,
        }
    }

    pub fn is_arc(&self) -> bool {
        matches!(self, Command::Arc { .. })
    }

    pub fn is_move(&self) -> bool {
        matches!(self, Command::MoveTo(_))
    }

    /// An arc whose two radii are equal, i.e. a piece of a circle.
    pub fn is_circular_arc(&self) -> bool {
        matches!(self, Command::Arc { radii, .. } if radii.x == radii.y)
    }
}

/// Split commands into subpaths: each starts at a `MoveTo` and runs up to
/// (not including) the next one. Commands before the first `MoveTo` form a
/// leading group of their own.
pub fn subpaths(commands: &[Command]) -> Vec<&[Command]> {
    let mut groups = Vec::new();
    let mut start = 0;
    for (idx, cmd) in commands.iter().enumerate() {
        if cmd.is_move() && idx > start {
            groups.push(&commands[start..idx]);
            start = idx;
        }
    }
    if start < commands.len() {
        groups.push(&commands[start..]);
    }
    groups
}
