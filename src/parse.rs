//! Parse pest pairs into normalized commands and transforms

use std::borrow::Cow;

use glam::{DAffine2, DVec2, dvec2};
use pest::Parser;
use pest::iterators::Pair;

use crate::ast::Command;
use crate::log::{trace, warn};
use crate::{Rule, SvgDataParser};

/// Turns raw path data into absolute drawing commands.
pub trait PathNormalizer {
    fn normalize(&self, d: &str) -> Vec<Command>;
}

/// Path normalizer backed by the pest path-data grammar.
///
/// Malformed data is not an error: commands parsed before the first
/// syntax error are kept and the rest is dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathDataNormalizer;

impl PathNormalizer for PathDataNormalizer {
    fn normalize(&self, d: &str) -> Vec<Command> {
        let pairs = match SvgDataParser::parse(Rule::path_data, d) {
            Ok(pairs) => pairs,
            Err(e) => {
                warn!(error = %e, "path data rejected");
                return Vec::new();
            }
        };

        let mut state = NormalizeState::default();
        for pair in pairs {
            if pair.as_rule() != Rule::path_data {
                continue;
            }
            let consumed = pair.as_span().end();
            if consumed < d.len() {
                warn!(
                    consumed,
                    total = d.len(),
                    rest = &d[consumed..],
                    "path data truncated at syntax error"
                );
            }
            for inner in pair.into_inner() {
                state.command(inner);
            }
        }
        state.out
    }
}

/// Pen state while folding relative and shorthand commands into absolute ones.
#[derive(Debug, Default)]
struct NormalizeState {
    current: DVec2,
    subpath_start: DVec2,
    /// Second control point of the previous C/S, for S reflection
    last_cubic_ctrl: Option<DVec2>,
    /// Control point of the previous Q/T, for T reflection
    last_quad_ctrl: Option<DVec2>,
    out: Vec<Command>,
}

impl NormalizeState {
    fn command(&mut self, pair: Pair<Rule>) {
        let rule = pair.as_rule();
        trace!(?rule, text = pair.as_str(), "path command");

        if rule == Rule::closepath {
            self.out.push(Command::ClosePath);
            self.current = self.subpath_start;
            self.last_cubic_ctrl = None;
            self.last_quad_ctrl = None;
            return;
        }

        let mut inner = pair.into_inner();
        let relative = inner
            .next()
            .map(|letter| letter.as_str().chars().all(|c| c.is_ascii_lowercase()))
            .unwrap_or(false);

        for (idx, args) in inner.enumerate() {
            match rule {
                Rule::moveto => {
                    let to = self.resolve(point(args), relative);
                    if idx == 0 {
                        self.subpath_start = to;
                        self.push(Command::MoveTo(to));
                    } else {
                        // Extra pairs after a moveto are implicit linetos
                        self.push(Command::LineTo(to));
                    }
                }
                Rule::lineto => {
                    let to = self.resolve(point(args), relative);
                    self.push(Command::LineTo(to));
                }
                Rule::horizontal_lineto => {
                    let x = number(&args);
                    let x = if relative { self.current.x + x } else { x };
                    self.push(Command::LineTo(dvec2(x, self.current.y)));
                }
                Rule::vertical_lineto => {
                    let y = number(&args);
                    let y = if relative { self.current.y + y } else { y };
                    self.push(Command::LineTo(dvec2(self.current.x, y)));
                }
                Rule::curveto => {
                    let [c1, c2, to] = points::<3>(args);
                    let ctrl1 = self.resolve(c1, relative);
                    let ctrl2 = self.resolve(c2, relative);
                    let to = self.resolve(to, relative);
                    self.push(Command::Cubic { ctrl1, ctrl2, to });
                    self.last_cubic_ctrl = Some(ctrl2);
                }
                Rule::smooth_curveto => {
                    let [c2, to] = points::<2>(args);
                    let ctrl1 = self.reflect(self.last_cubic_ctrl);
                    let ctrl2 = self.resolve(c2, relative);
                    let to = self.resolve(to, relative);
                    self.push(Command::Cubic { ctrl1, ctrl2, to });
                    self.last_cubic_ctrl = Some(ctrl2);
                }
                Rule::quadratic_curveto => {
                    let [c, to] = points::<2>(args);
                    let ctrl = self.resolve(c, relative);
                    let to = self.resolve(to, relative);
                    self.push(Command::Quadratic { ctrl, to });
                    self.last_quad_ctrl = Some(ctrl);
                }
                Rule::smooth_quadratic_curveto => {
                    let ctrl = self.reflect(self.last_quad_ctrl);
                    let to = self.resolve(point(args), relative);
                    self.push(Command::Quadratic { ctrl, to });
                    self.last_quad_ctrl = Some(ctrl);
                }
                Rule::elliptical_arc => {
                    let mut parts = args.into_inner();
                    let mut next_number = || parts.next().map(|p| number(&p)).unwrap_or(f64::NAN);
                    let rx = next_number();
                    let ry = next_number();
                    let x_rotation = next_number();
                    let large_arc = next_number() != 0.0;
                    let sweep = next_number() != 0.0;
                    let to = parts
                        .next()
                        .map(point)
                        .unwrap_or(DVec2::NAN);
                    let to = self.resolve(to, relative);
                    self.push(Command::Arc {
                        radii: dvec2(rx, ry),
                        x_rotation,
                        large_arc,
                        sweep,
                        to,
                    });
                }
                _ => {}
            }
        }
    }

    /// Record a command and move the pen to its end.
    ///
    /// Control point memory is cleared here; curve arms set it again after.
    fn push(&mut self, cmd: Command) {
        if let Some(to) = cmd.end_point() {
            self.current = to;
        }
        self.last_cubic_ctrl = None;
        self.last_quad_ctrl = None;
        self.out.push(cmd);
    }

    fn resolve(&self, p: DVec2, relative: bool) -> DVec2 {
        if relative { self.current + p } else { p }
    }

    /// Reflect the previous control point through the current point.
    fn reflect(&self, ctrl: Option<DVec2>) -> DVec2 {
        match ctrl {
            Some(c) => self.current * 2.0 - c,
            None => self.current,
        }
    }
}

fn number(pair: &Pair<Rule>) -> f64 {
    pair.as_str().parse().unwrap_or(f64::NAN)
}

/// Read a `coordinate_pair`.
fn point(pair: Pair<Rule>) -> DVec2 {
    let mut numbers = pair.into_inner();
    let x = numbers.next().map(|p| number(&p)).unwrap_or(f64::NAN);
    let y = numbers.next().map(|p| number(&p)).unwrap_or(f64::NAN);
    dvec2(x, y)
}

/// Read N `coordinate_pair`s out of an argument group.
fn points<const N: usize>(pair: Pair<Rule>) -> [DVec2; N] {
    let mut out = [DVec2::NAN; N];
    for (slot, p) in out.iter_mut().zip(pair.into_inner()) {
        *slot = point(p);
    }
    out
}

/// Split an arc's parameter run from digits fused onto its end.
///
/// When an arc command's first seven parameters are immediately followed
/// by more digits (`A5 5 0 0 1 10 10.5.5 3`), a line-to boundary is spliced
/// in after the seventh parameter so the trailing run starts a new `L`
/// (or `l` for a relative arc).
pub fn split_fused_arc_params(d: &str) -> Cow<'_, str> {
    let mut splices = Vec::new();
    for (idx, letter) in d.char_indices() {
        if letter != 'A' && letter != 'a' {
            continue;
        }
        let rest = &d[idx + 1..];
        if let Ok(mut pairs) = SvgDataParser::parse(Rule::fused_arc, rest) {
            if let Some(run) = pairs.next() {
                let at = idx + 1 + run.as_span().end();
                let line = if letter == 'A' { 'L' } else { 'l' };
                splices.push((at, line));
            }
        }
    }

    if splices.is_empty() {
        return Cow::Borrowed(d);
    }

    let mut fixed = String::with_capacity(d.len() + splices.len());
    let mut last = 0;
    for (at, line) in splices {
        fixed.push_str(&d[last..at]);
        fixed.push(line);
        last = at;
    }
    fixed.push_str(&d[last..]);
    warn!(original = d, fixed = %fixed, "split fused arc parameters");
    Cow::Owned(fixed)
}

/// Read an attribute value the way `parseFloat` does: the longest leading
/// number, or NaN when there is none.
pub fn parse_number(value: &str) -> f64 {
    match SvgDataParser::parse(Rule::leading_number, value) {
        Ok(pairs) => pairs
            .flatten()
            .find(|p| p.as_rule() == Rule::number)
            .map(|p| number(&p))
            .unwrap_or(f64::NAN),
        Err(_) => f64::NAN,
    }
}

/// Parse an SVG `transform` list into one affine matrix.
///
/// Returns `None` when the list is malformed or a transform has the wrong
/// number of arguments.
pub fn parse_transform(value: &str) -> Option<DAffine2> {
    let pairs = SvgDataParser::parse(Rule::transform_list, value).ok()?;
    let mut matrix = DAffine2::IDENTITY;
    for pair in pairs.flatten().filter(|p| p.as_rule() == Rule::transform) {
        let mut inner = pair.into_inner();
        let name = inner.next()?.as_str();
        let args: Vec<f64> = inner.map(|p| number(&p)).collect();
        matrix = matrix * transform_matrix(name, &args)?;
    }
    Some(matrix)
}

fn transform_matrix(name: &str, args: &[f64]) -> Option<DAffine2> {
    let m = match (name, args) {
        ("matrix", &[a, b, c, d, e, f]) => DAffine2::from_cols_array(&[a, b, c, d, e, f]),
        ("translate", &[tx]) => DAffine2::from_translation(dvec2(tx, 0.0)),
        ("translate", &[tx, ty]) => DAffine2::from_translation(dvec2(tx, ty)),
        ("scale", &[s]) => DAffine2::from_scale(dvec2(s, s)),
        ("scale", &[sx, sy]) => DAffine2::from_scale(dvec2(sx, sy)),
        ("rotate", &[deg]) => DAffine2::from_angle(deg.to_radians()),
        ("rotate", &[deg, cx, cy]) => {
            let center = dvec2(cx, cy);
            DAffine2::from_translation(center)
                * DAffine2::from_angle(deg.to_radians())
                * DAffine2::from_translation(-center)
        }
        ("skewX", &[deg]) => DAffine2::from_cols_array(&[1.0, 0.0, deg.to_radians().tan(), 1.0, 0.0, 0.0]),
        ("skewY", &[deg]) => DAffine2::from_cols_array(&[1.0, deg.to_radians().tan(), 0.0, 1.0, 0.0, 0.0]),
        _ => return None,
    };
    Some(m)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(d: &str) -> Vec<Command> {
        PathDataNormalizer.normalize(d)
    }

    #[test]
    fn absolute_square() {
        let cmds = normalize("M0 0 L10 0 L10 10 L0 10 Z");
        assert_eq!(
            cmds,
            vec![
                Command::MoveTo(dvec2(0.0, 0.0)),
                Command::LineTo(dvec2(10.0, 0.0)),
                Command::LineTo(dvec2(10.0, 10.0)),
                Command::LineTo(dvec2(0.0, 10.0)),
                Command::ClosePath,
            ]
        );
    }

    #[test]
    fn relative_and_shorthand_lines() {
        let cmds = normalize("m5,5 h10 v10 H0 V0");
        assert_eq!(
            cmds,
            vec![
                Command::MoveTo(dvec2(5.0, 5.0)),
                Command::LineTo(dvec2(15.0, 5.0)),
                Command::LineTo(dvec2(15.0, 15.0)),
                Command::LineTo(dvec2(0.0, 15.0)),
                Command::LineTo(dvec2(0.0, 0.0)),
            ]
        );
    }

    #[test]
    fn implicit_lineto_after_moveto() {
        let cmds = normalize("m1 1 2 2 3 3");
        assert_eq!(
            cmds,
            vec![
                Command::MoveTo(dvec2(1.0, 1.0)),
                Command::LineTo(dvec2(3.0, 3.0)),
                Command::LineTo(dvec2(6.0, 6.0)),
            ]
        );
    }

    #[test]
    fn numbers_without_separators() {
        let cmds = normalize("M10-5L.5.5");
        assert_eq!(
            cmds,
            vec![Command::MoveTo(dvec2(10.0, -5.0)), Command::LineTo(dvec2(0.5, 0.5))]
        );
    }

    #[test]
    fn compact_arc_flags() {
        let cmds = normalize("M0 0 a5 5 0 0110 10");
        assert_eq!(
            cmds[1],
            Command::Arc {
                radii: dvec2(5.0, 5.0),
                x_rotation: 0.0,
                large_arc: false,
                sweep: true,
                to: dvec2(10.0, 10.0),
            }
        );
    }

    #[test]
    fn smooth_cubic_reflects_control_point() {
        let cmds = normalize("M0 0 C0 10 10 10 10 0 S20 -10 20 0");
        assert_eq!(
            cmds[2],
            Command::Cubic {
                ctrl1: dvec2(10.0, -10.0),
                ctrl2: dvec2(20.0, -10.0),
                to: dvec2(20.0, 0.0),
            }
        );
    }

    #[test]
    fn smooth_quadratic_without_previous_uses_current_point() {
        let cmds = normalize("M1 1 T5 5");
        assert_eq!(
            cmds[1],
            Command::Quadratic {
                ctrl: dvec2(1.0, 1.0),
                to: dvec2(5.0, 5.0),
            }
        );
    }

    #[test]
    fn close_path_returns_pen_to_subpath_start() {
        let cmds = normalize("M10 10 l5 0 z l0 5");
        assert_eq!(cmds[3], Command::LineTo(dvec2(10.0, 15.0)));
    }

    #[test]
    fn syntax_error_keeps_prefix() {
        let cmds = normalize("M0 0 L10 10 L oops L20 20");
        assert_eq!(
            cmds,
            vec![Command::MoveTo(dvec2(0.0, 0.0)), Command::LineTo(dvec2(10.0, 10.0))]
        );
    }

    #[test]
    fn fused_arc_gets_line_boundary() {
        assert_eq!(
            split_fused_arc_params("M0 0 A5 5 0 0 1 10 10.5.5 3"),
            "M0 0 A5 5 0 0 1 10 10.5L.5 3"
        );
        assert_eq!(
            split_fused_arc_params("M0 0 a5 5 0 0 1 10 10.5.5 3"),
            "M0 0 a5 5 0 0 1 10 10.5l.5 3"
        );
    }

    #[test]
    fn separated_arcs_are_untouched() {
        let d = "M0 0 A5 5 0 0 1 10 10 L20 20";
        assert!(matches!(split_fused_arc_params(d), Cow::Borrowed(_)));
        let compact = "M0 0 a5 5 0 0110 10";
        assert!(matches!(split_fused_arc_params(compact), Cow::Borrowed(_)));
    }

    #[test]
    fn attribute_numbers_read_like_parse_float() {
        assert_eq!(parse_number("10"), 10.0);
        assert_eq!(parse_number(" 2.5px"), 2.5);
        assert_eq!(parse_number("-.5e1"), -5.0);
        assert!(parse_number("abc").is_nan());
        assert!(parse_number("").is_nan());
    }

    #[test]
    fn transform_list_composes_left_to_right() {
        let m = parse_transform("translate(10 20) scale(2)").unwrap();
        assert_eq!(m.transform_point2(dvec2(1.0, 1.0)), dvec2(12.0, 22.0));
    }

    #[test]
    fn matrix_transform_uses_svg_order() {
        let m = parse_transform("matrix(1,0,0,1,5,6)").unwrap();
        assert_eq!(m.transform_point2(dvec2(1.0, 2.0)), dvec2(6.0, 8.0));
    }

    #[test]
    fn rotate_about_center() {
        let m = parse_transform("rotate(90 10 10)").unwrap();
        let p = m.transform_point2(dvec2(20.0, 10.0));
        assert!((p.x - 10.0).abs() < 1e-9);
        assert!((p.y - 20.0).abs() < 1e-9);
    }

    #[test]
    fn bad_transform_is_rejected() {
        assert!(parse_transform("translate(1 2 3)").is_none());
        assert!(parse_transform("wobble(1)").is_none());
        assert_eq!(parse_transform("").unwrap(), DAffine2::IDENTITY);
    }
}
