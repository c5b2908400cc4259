//! Result types of a conversion

use serde::Serialize;

/// Everything one conversion produces.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversion {
    /// `GEOMETRYCOLLECTION(...)` of every recognized shape
    pub detail: String,
    /// One entry per element carrying an `id`
    pub spaces: Vec<Space>,
    /// One entry per non-empty `<text>` element
    pub strings: Vec<TextString>,
}

/// Geometry of an element that carries an `id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Space {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// WKT of the element; `EMPTY` for tags that are not shapes
    pub space: String,
}

/// A text label positioned along its baseline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextString {
    pub text: String,
    /// `LINESTRING(start,end)` in root coordinates, Y negated
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
}
