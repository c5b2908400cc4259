//! Shape types for WKT conversion
//!
//! Each recognized SVG element becomes its own shape type that knows how to
//! write itself as WKT. The builders behind them are public so they can be
//! used without a document:
//!
//! - [`line`], [`polyline`], [`polygon`] and [`rect`] copy attribute values
//!   straight through (no rounding)
//! - [`circle`] and [`ellipse`] derive points with trig and round them to
//!   the configured precision
//! - `<path>` goes through [`super::path::path`]

use std::f64::consts::PI;

use enum_dispatch::enum_dispatch;
use glam::{DVec2, dvec2};

use crate::parse::parse_number;
use crate::types::{Config, fmt_points};

use super::context::RenderContext;
use super::path::path;

/// The recognized tags, in the order the geometry collection visits them.
pub const SHAPE_TAGS: [&str; 7] = ["polygon", "polyline", "line", "rect", "circle", "ellipse", "path"];

/// Common behavior for all shapes
#[enum_dispatch]
pub trait Wkt {
    /// Top-level WKT geometries for this shape. Always at least one.
    fn wkt(&self, ctx: &RenderContext) -> Vec<String>;
}

/// Enum wrapping all shape types, one variant per recognized tag.
#[enum_dispatch(Wkt)]
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Polygon(PolygonShape),
    Polyline(PolylineShape),
    Line(LineShape),
    Rect(RectShape),
    Circle(CircleShape),
    Ellipse(EllipseShape),
    Path(PathShape),
    Unrecognized(UnrecognizedShape),
}

impl Shape {
    /// Read a shape from an element, by local tag name.
    pub fn from_node(node: roxmltree::Node) -> Shape {
        let num = |name: &str| node.attribute(name).map(parse_number).unwrap_or(f64::NAN);
        let text = |name: &str| node.attribute(name).unwrap_or_default().to_string();

        match node.tag_name().name() {
            "polygon" => PolygonShape { points: text("points") }.into(),
            "polyline" => PolylineShape { points: text("points") }.into(),
            "line" => LineShape {
                from: dvec2(num("x1"), num("y1")),
                to: dvec2(num("x2"), num("y2")),
            }
            .into(),
            "rect" => RectShape {
                origin: dvec2(num("x"), num("y")),
                size: dvec2(num("width"), num("height")),
            }
            .into(),
            "circle" => CircleShape {
                center: dvec2(num("cx"), num("cy")),
                radius: num("r"),
            }
            .into(),
            "ellipse" => EllipseShape {
                center: dvec2(num("cx"), num("cy")),
                radii: dvec2(num("rx"), num("ry")),
            }
            .into(),
            "path" => PathShape { d: text("d") }.into(),
            other => UnrecognizedShape {
                tag: other.to_string(),
            }
            .into(),
        }
    }
}

// ============================================================================
// Shape Types
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct PolygonShape {
    pub points: String,
}

impl Wkt for PolygonShape {
    fn wkt(&self, _ctx: &RenderContext) -> Vec<String> {
        vec![polygon(&self.points)]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PolylineShape {
    pub points: String,
}

impl Wkt for PolylineShape {
    fn wkt(&self, _ctx: &RenderContext) -> Vec<String> {
        vec![polyline(&self.points)]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineShape {
    pub from: DVec2,
    pub to: DVec2,
}

impl Wkt for LineShape {
    fn wkt(&self, _ctx: &RenderContext) -> Vec<String> {
        vec![line(self.from, self.to)]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RectShape {
    pub origin: DVec2,
    pub size: DVec2,
}

impl Wkt for RectShape {
    fn wkt(&self, _ctx: &RenderContext) -> Vec<String> {
        vec![rect(self.origin, self.size)]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CircleShape {
    pub center: DVec2,
    pub radius: f64,
}

impl Wkt for CircleShape {
    fn wkt(&self, ctx: &RenderContext) -> Vec<String> {
        vec![circle(self.center, self.radius, &ctx.config)]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EllipseShape {
    pub center: DVec2,
    pub radii: DVec2,
}

impl Wkt for EllipseShape {
    fn wkt(&self, ctx: &RenderContext) -> Vec<String> {
        vec![ellipse(self.center, self.radii, &ctx.config)]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PathShape {
    pub d: String,
}

impl Wkt for PathShape {
    fn wkt(&self, ctx: &RenderContext) -> Vec<String> {
        path(&self.d, ctx).into_fragments()
    }
}

/// Any other element. Only reachable through named spaces.
#[derive(Debug, Clone, PartialEq)]
pub struct UnrecognizedShape {
    pub tag: String,
}

impl Wkt for UnrecognizedShape {
    fn wkt(&self, _ctx: &RenderContext) -> Vec<String> {
        vec!["EMPTY".to_string()]
    }
}

// ============================================================================
// Formula builders
// ============================================================================

/// `LINESTRING` between two points.
pub fn line(from: DVec2, to: DVec2) -> String {
    format!("LINESTRING({})", fmt_points(&[from, to]))
}

/// `LINESTRING` through the points of a `points` attribute.
pub fn polyline(points: &str) -> String {
    let points = parse_points(points);
    if points.is_empty() {
        return "LINESTRING EMPTY".to_string();
    }
    format!("LINESTRING({})", fmt_points(&points))
}

/// `POLYGON` through the points of a `points` attribute, closed by
/// repeating the first point whether or not the input already closes.
pub fn polygon(points: &str) -> String {
    let mut points = parse_points(points);
    let Some(&first) = points.first() else {
        return "POLYGON EMPTY".to_string();
    };
    points.push(first);
    format!("POLYGON(({}))", fmt_points(&points))
}

/// Rectangle ring. A missing or non-numeric `x`/`y` counts as 0; corner
/// radii are ignored.
pub fn rect(origin: DVec2, size: DVec2) -> String {
    let x = if origin.x.is_nan() { 0.0 } else { origin.x };
    let y = if origin.y.is_nan() { 0.0 } else { origin.y };
    let (w, h) = (size.x, size.y);
    let ring = [
        dvec2(x, y),
        dvec2(x + w, y),
        dvec2(x + w, y + h),
        dvec2(x, y + h),
        dvec2(x, y),
    ];
    format!("POLYGON(({}))", fmt_points(&ring))
}

/// Closed `CIRCULARSTRING` through the circle at 0, 90, 180, 270 and 360
/// degrees.
pub fn circle(center: DVec2, radius: f64, config: &Config) -> String {
    let points: Vec<DVec2> = (0..=4)
        .map(|quarter| {
            let angle = (quarter as f64 * 90.0).to_radians();
            config
                .precision
                .round_point(center + radius * dvec2(angle.cos(), angle.sin()))
        })
        .collect();
    format!("CIRCULARSTRING({})", fmt_points(&points))
}

/// Ellipse approximated as a polygon.
///
/// The point count is the approximate circumference
/// `2π·√((rx²+ry²)/2)` times the density, spread over equal angles.
pub fn ellipse(center: DVec2, radii: DVec2, config: &Config) -> String {
    let circumference = 2.0 * PI * ((radii.x * radii.x + radii.y * radii.y) / 2.0).sqrt();
    let count = config.density.steps(circumference);
    if count == 0 {
        return "POLYGON EMPTY".to_string();
    }

    let step = 360.0 / count as f64;
    let mut ring: Vec<DVec2> = (0..count)
        .map(|i| {
            let angle = (i as f64 * step).to_radians();
            config
                .precision
                .round_point(center + radii * dvec2(angle.cos(), angle.sin()))
        })
        .collect();
    ring.push(ring[0]);
    format!("POLYGON(({}))", fmt_points(&ring))
}

/// Read a `points` attribute: whitespace-separated `x,y` pairs. A pair
/// without a comma has a `NaN` y.
fn parse_points(points: &str) -> Vec<DVec2> {
    points
        .split_ascii_whitespace()
        .map(|pair| match pair.split_once(',') {
            Some((x, y)) => dvec2(parse_number(x), parse_number(y)),
            None => dvec2(parse_number(pair), f64::NAN),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> Config {
        Config::default()
    }

    #[test]
    fn line_scenario() {
        assert_eq!(
            line(dvec2(0.0, 0.0), dvec2(10.0, 10.0)),
            "LINESTRING(0 0,10 -10)"
        );
    }

    #[test]
    fn polygon_scenario() {
        assert_eq!(polygon("0,0 10,0 10,10"), "POLYGON((0 0,10 0,10 -10,0 0))");
    }

    #[test]
    fn polygon_always_repeats_first_point() {
        assert_eq!(
            polygon("0,0 10,0 10,10 0,0"),
            "POLYGON((0 0,10 0,10 -10,0 0,0 0))"
        );
    }

    #[test]
    fn polyline_pairs_are_split_on_whitespace() {
        assert_eq!(polyline("1.5,2.25\n3,4"), "LINESTRING(1.5 -2.25,3 -4)");
        assert_eq!(polyline("  0,0\t5,5  "), "LINESTRING(0 0,5 -5)");
    }

    #[test]
    fn pair_without_comma_has_nan_y() {
        assert_eq!(polyline("1 2 3 4"), "LINESTRING(1 NaN,2 NaN,3 NaN,4 NaN)");
        assert_eq!(polygon("0,0 10"), "POLYGON((0 0,10 NaN,0 0))");
    }

    #[test]
    fn polyline_without_points() {
        assert_eq!(polyline(""), "LINESTRING EMPTY");
        assert_eq!(polygon("   "), "POLYGON EMPTY");
    }

    #[test]
    fn non_numeric_points_print_nan() {
        assert_eq!(polyline("a,1 2,3"), "LINESTRING(NaN -1,2 -3)");
    }

    #[test]
    fn rect_ring() {
        for (x, y, w, h) in [(0.0, 0.0, 10.0, 10.0), (2.5, 3.0, 4.0, 1.5), (-5.0, 7.0, 1.0, 2.0)] {
            let expected = format!(
                "POLYGON(({} {},{} {},{} {},{} {},{} {}))",
                crate::types::fmt_num(x),
                crate::types::fmt_num(-y),
                crate::types::fmt_num(x + w),
                crate::types::fmt_num(-y),
                crate::types::fmt_num(x + w),
                crate::types::fmt_num(-y - h),
                crate::types::fmt_num(x),
                crate::types::fmt_num(-y - h),
                crate::types::fmt_num(x),
                crate::types::fmt_num(-y),
            );
            assert_eq!(rect(dvec2(x, y), dvec2(w, h)), expected);
        }
    }

    #[test]
    fn rect_missing_origin_defaults_to_zero() {
        assert_eq!(
            rect(dvec2(f64::NAN, f64::NAN), dvec2(10.0, 10.0)),
            "POLYGON((0 0,10 0,10 -10,0 -10,0 0))"
        );
    }

    #[test]
    fn circle_scenario() {
        assert_eq!(
            circle(dvec2(0.0, 0.0), 5.0, &cfg()),
            "CIRCULARSTRING(5 0,0 -5,-5 0,0 5,5 0)"
        );
    }

    #[test]
    fn circle_has_five_points_closing_on_itself() {
        let out = circle(dvec2(12.5, -3.0), 7.25, &cfg());
        let inner = out
            .strip_prefix("CIRCULARSTRING(")
            .and_then(|s| s.strip_suffix(')'))
            .unwrap();
        let pairs: Vec<&str> = inner.split(',').collect();
        assert_eq!(pairs.len(), 5);
        assert_eq!(pairs[0], pairs[4]);
    }

    #[test]
    fn circle_rounds_to_precision() {
        let out = circle(dvec2(0.0, 0.0), 1.0 / 3.0, &Config::default().with_precision(2));
        assert_eq!(out, "CIRCULARSTRING(0.33 0,0 -0.33,-0.33 0,0 0.33,0.33 0)");
    }

    #[test]
    fn ellipse_point_count_follows_circumference() {
        let (rx, ry) = (10.0, 5.0);
        let out = ellipse(dvec2(0.0, 0.0), dvec2(rx, ry), &cfg());
        let inner = out
            .strip_prefix("POLYGON((")
            .and_then(|s| s.strip_suffix("))"))
            .unwrap();
        let pairs: Vec<&str> = inner.split(',').collect();
        let expected = (2.0 * PI * ((rx * rx + ry * ry) / 2.0_f64).sqrt()).round() as usize;
        assert_eq!(pairs.len(), expected + 1);
        assert_eq!(pairs.first(), pairs.last());
        assert_eq!(pairs[0], "10 0");
    }

    #[test]
    fn ellipse_density_halves_points() {
        let dense = ellipse(dvec2(0.0, 0.0), dvec2(10.0, 10.0), &cfg());
        let sparse = ellipse(
            dvec2(0.0, 0.0),
            dvec2(10.0, 10.0),
            &Config::default().with_density(0.5).unwrap(),
        );
        // 63 and 31 distinct points
        assert_eq!(dense.matches(',').count(), 63);
        assert_eq!(sparse.matches(',').count(), 31);
    }

    #[test]
    fn huge_ellipse_sample_count_is_capped() {
        let out = ellipse(dvec2(0.0, 0.0), dvec2(1e12, 1e12), &cfg());
        assert_eq!(out.matches(',').count(), crate::render::defaults::MAX_SAMPLES);
    }

    #[test]
    fn degenerate_ellipse_is_empty() {
        assert_eq!(ellipse(dvec2(1.0, 1.0), dvec2(0.0, 0.0), &cfg()), "POLYGON EMPTY");
        assert_eq!(
            ellipse(dvec2(1.0, 1.0), dvec2(f64::NAN, 1.0), &cfg()),
            "POLYGON EMPTY"
        );
    }

    #[test]
    fn shape_from_node_dispatches_on_tag() {
        let doc = roxmltree::Document::parse(
            r#"<svg xmlns="http://www.w3.org/2000/svg"><rect width="4" height="2"/><g/></svg>"#,
        )
        .unwrap();
        let mut kids = doc.root_element().children().filter(|n| n.is_element());
        match Shape::from_node(kids.next().unwrap()) {
            Shape::Rect(rect) => {
                assert!(rect.origin.is_nan());
                assert_eq!(rect.size, dvec2(4.0, 2.0));
            }
            other => panic!("expected a rect, got {:?}", other),
        }
        let group = Shape::from_node(kids.next().unwrap());
        assert!(matches!(group, Shape::Unrecognized(_)));
    }
}
