//! WKT rendering for parsed SVG documents

pub mod context;
pub mod curve_string;
pub mod defaults;
pub mod geometry;
pub mod path;
pub mod shapes;
pub mod text;
pub mod types;

use crate::log::debug;

pub use context::RenderContext;
use shapes::{SHAPE_TAGS, Shape, Wkt};
use types::{Conversion, Space};

/// Render a parsed document: geometry collection, named spaces and labels.
pub fn render(doc: &roxmltree::Document, ctx: &RenderContext) -> Conversion {
    let detail = geometry_collection(doc, ctx);
    let spaces = named_spaces(doc, ctx);
    let strings: Vec<_> = doc
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "text")
        .filter_map(|n| text::text_label(n, ctx))
        .collect();

    debug!(
        spaces = spaces.len(),
        strings = strings.len(),
        "conversion finished"
    );
    Conversion {
        detail,
        spaces,
        strings,
    }
}

/// Every recognized shape, grouped by tag in [`SHAPE_TAGS`] order and in
/// document order within a tag.
fn geometry_collection(doc: &roxmltree::Document, ctx: &RenderContext) -> String {
    let mut members: Vec<String> = Vec::new();
    for tag in SHAPE_TAGS {
        let found: Vec<String> = doc
            .descendants()
            .filter(|n| n.is_element() && n.tag_name().name() == tag)
            .flat_map(|node| Shape::from_node(node).wkt(ctx))
            .collect();
        debug!(tag, count = found.len(), "collected shapes");
        members.extend(found);
    }

    if members.is_empty() {
        "GEOMETRYCOLLECTION EMPTY".to_string()
    } else {
        format!("GEOMETRYCOLLECTION({})", members.join(","))
    }
}

/// One entry per element with an `id`, whatever its tag.
fn named_spaces(doc: &roxmltree::Document, ctx: &RenderContext) -> Vec<Space> {
    doc.descendants()
        .filter(|n| n.is_element())
        .filter_map(|node| {
            let id = node.attribute("id")?;
            Some(Space {
                id: id.to_string(),
                title: title_of(node),
                space: Shape::from_node(node).wkt(ctx).join(","),
            })
        })
        .collect()
}

/// `title` attribute, else the text of a direct `<title>` child.
fn title_of(node: roxmltree::Node) -> Option<String> {
    if let Some(title) = node.attribute("title") {
        return Some(title.to_string());
    }
    node.children()
        .find(|c| c.is_element() && c.tag_name().name() == "title")
        .map(|t| {
            t.descendants()
                .filter(|n| n.is_text())
                .filter_map(|n| n.text())
                .collect::<String>()
                .trim()
                .to_string()
        })
        .filter(|t| !t.is_empty())
}
