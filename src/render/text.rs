//! Text labels: a baseline segment per `<text>` element
//!
//! The segment starts at the element's anchor point and runs for the
//! estimated advance width of its content. Both ends are mapped through the
//! composed `transform` of the element and its ancestors, so labels land in
//! root coordinates.

use glam::{DAffine2, DVec2, dvec2};

use crate::log::{trace, warn};
use crate::parse::{parse_number, parse_transform};
use crate::types::fmt_points;

use super::context::RenderContext;
use super::defaults;
use super::types::TextString;

/// Character widths in hundredths of the average glyph advance, for
/// printable ASCII starting at `' '`.
pub const AW_CHAR: [u8; 95] = [
    45,  55,  62, 115,  90, 132, 125,  40,
    55,  55,  71, 115,  45,  48,  45,  50,
    91,  91,  91,  91,  91,  91,  91,  91,
    91,  91,  50,  50, 120, 120, 120,  78,
   142, 102, 105, 110, 115, 105,  98, 105,
   125,  58,  58, 107,  95, 145, 125, 115,
    95, 115, 107,  95,  97, 118, 102, 150,
   100,  93, 100,  58,  50,  58, 119,  72,
    72,  86,  92,  80,  92,  85,  52,  92,
    92,  47,  47,  88,  48, 135,  92,  86,
    92,  92,  69,  75,  58,  92,  80, 121,
    81,  80,  76,  91,  49,  91, 118,
];

/// Proportional length of `text` in hundredths of an average character.
/// Anything outside printable ASCII counts as 100.
pub fn text_length(text: &str) -> u32 {
    text.chars()
        .map(|c| {
            if (' '..='~').contains(&c) {
                AW_CHAR[(c as usize) - 0x20] as u32
            } else {
                100
            }
        })
        .sum()
}

/// Estimated advance width of `text` set at `font_size`.
pub fn text_width(text: &str, font_size: f64) -> f64 {
    text_length(text) as f64 * font_size * defaults::CHARWID / 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Anchor {
    #[default]
    Start,
    Middle,
    End,
}

impl Anchor {
    fn parse(value: &str) -> Self {
        match value.trim() {
            "middle" => Anchor::Middle,
            "end" => Anchor::End,
            _ => Anchor::Start,
        }
    }

    /// How far the start point moves left for a run of `width`.
    fn shift(self, width: f64) -> f64 {
        match self {
            Anchor::Start => 0.0,
            Anchor::Middle => width / 2.0,
            Anchor::End => width,
        }
    }
}

/// Build the label for a `<text>` element, or `None` if it has no text.
pub fn text_label(node: roxmltree::Node, ctx: &RenderContext) -> Option<TextString> {
    let text = collapse_whitespace(&text_content(node));
    if text.is_empty() {
        return None;
    }

    let font_size = inherited(node, "font-size");
    let font_family = inherited(node, "font-family");
    let anchor = inherited(node, "text-anchor")
        .map(|v| Anchor::parse(&v))
        .unwrap_or_default();

    let size = font_size
        .as_deref()
        .map(parse_number)
        .filter(|s| s.is_finite() && *s > 0.0)
        .unwrap_or(defaults::FONT_SIZE);
    let width = text_width(&text, size);

    let origin = dvec2(
        first_length(node, "x") + first_length(node, "dx"),
        first_length(node, "y") + first_length(node, "dy"),
    );
    let start = origin - dvec2(anchor.shift(width), 0.0);
    let end = start + dvec2(width, 0.0);

    let matrix = composed_transform(node);
    let precision = ctx.config.precision;
    let ends: [DVec2; 2] = [start, end].map(|p| precision.round_point(matrix.transform_point2(p)));
    trace!(text = %text, ?ends, width, "text label");

    Some(TextString {
        text,
        path: format!("LINESTRING({})", fmt_points(&ends)),
        font_size,
        font_family,
    })
}

/// All character data below `node`, in document order.
fn text_content(node: roxmltree::Node) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}

/// Collapse runs of whitespace into single spaces and trim the ends.
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First number of a length-list attribute such as `x="10 20 30"`.
/// Missing attributes count as 0.
fn first_length(node: roxmltree::Node, name: &str) -> f64 {
    node.attribute(name)
        .and_then(|v| {
            v.split(|c: char| c == ',' || c.is_ascii_whitespace())
                .find(|t| !t.is_empty())
        })
        .map(parse_number)
        .unwrap_or(0.0)
}

/// A presentation property, looked up on the element first and then on each
/// ancestor. Inline `style` wins over the attribute on the same element.
fn inherited(node: roxmltree::Node, name: &str) -> Option<String> {
    node.ancestors()
        .filter(|n| n.is_element())
        .find_map(|n| {
            n.attribute("style")
                .and_then(|style| style_property(style, name))
                .or_else(|| n.attribute(name))
                .map(|v| v.trim().to_string())
        })
        .filter(|v| !v.is_empty())
}

fn style_property<'s>(style: &'s str, name: &str) -> Option<&'s str> {
    style.split(';').find_map(|decl| {
        let (key, value) = decl.split_once(':')?;
        (key.trim() == name).then_some(value.trim())
    })
}

/// Transform from the element's user space to the document root.
fn composed_transform(node: roxmltree::Node) -> DAffine2 {
    let chain: Vec<roxmltree::Node> = node.ancestors().filter(|n| n.is_element()).collect();
    chain.iter().rev().fold(DAffine2::IDENTITY, |matrix, n| {
        match n.attribute("transform") {
            None => matrix,
            Some(value) => match parse_transform(value) {
                Some(own) => matrix * own,
                None => {
                    warn!(transform = value, "ignoring malformed transform");
                    matrix
                }
            },
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::PathDataNormalizer;
    use crate::render::geometry::KurboEngine;
    use crate::types::Config;

    fn label(markup: &str) -> Option<TextString> {
        let doc = roxmltree::Document::parse(markup).unwrap();
        let engine = KurboEngine::default();
        let normalizer = PathDataNormalizer;
        let ctx = RenderContext::new(Config::default(), &normalizer, &engine);
        let node = doc
            .descendants()
            .find(|n| n.has_tag_name("text"))
            .unwrap();
        text_label(node, &ctx)
    }

    #[test]
    fn text_length_uses_char_table() {
        assert_eq!(text_length("00"), 182);
        assert_eq!(text_length("Hi"), 172);
        assert_eq!(text_length("é"), 100);
    }

    #[test]
    fn label_runs_along_baseline() {
        let t = label(r#"<svg><text x="10" y="20" font-size="14">00</text></svg>"#).unwrap();
        assert_eq!(t.text, "00");
        assert_eq!(t.path, "LINESTRING(10 -20,24.56 -20)");
        assert_eq!(t.font_size.as_deref(), Some("14"));
        assert_eq!(t.font_family, None);
    }

    #[test]
    fn default_font_size() {
        let t = label(r#"<svg><text x="10" y="20">Hi</text></svg>"#).unwrap();
        assert_eq!(t.path, "LINESTRING(10 -20,25.726 -20)");
        assert_eq!(t.font_size, None);
    }

    #[test]
    fn middle_anchor_centres_the_run() {
        let t = label(
            r#"<svg><text x="10" y="20" font-size="14" text-anchor="middle">00</text></svg>"#,
        )
        .unwrap();
        assert_eq!(t.path, "LINESTRING(2.72 -20,17.28 -20)");
    }

    #[test]
    fn ancestor_transform_and_style_apply() {
        let t = label(
            r#"<svg><g transform="translate(5 5)" style="font-size: 14px; font-family: Arial"><text>00</text></g></svg>"#,
        )
        .unwrap();
        assert_eq!(t.path, "LINESTRING(5 -5,19.56 -5)");
        assert_eq!(t.font_size.as_deref(), Some("14px"));
        assert_eq!(t.font_family.as_deref(), Some("Arial"));
    }

    #[test]
    fn first_position_plus_offset() {
        let t = label(r#"<svg><text x="1 2 3" dx="2" y="4" dy="-1" font-size="14">0</text></svg>"#)
            .unwrap();
        assert_eq!(t.path, "LINESTRING(3 -3,10.28 -3)");
    }

    #[test]
    fn content_whitespace_collapses() {
        let t = label("<svg><text>  a \n <tspan>b</tspan>  </text></svg>").unwrap();
        assert_eq!(t.text, "a b");
    }

    #[test]
    fn blank_text_is_skipped() {
        assert!(label("<svg><text x=\"1\">  \n </text></svg>").is_none());
        assert!(label("<svg><text/></svg>").is_none());
    }

    #[test]
    fn bad_transform_is_ignored() {
        let t = label(r#"<svg><text transform="wobble(3)" font-size="14">0</text></svg>"#).unwrap();
        assert_eq!(t.path, "LINESTRING(0 0,7.28 0)");
    }
}
