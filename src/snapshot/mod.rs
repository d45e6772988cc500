//! Page Inspection
//!
//! The narrow capability the pipeline needs from a rendered page:
//! element query by selector, computed style lookup, and geometry.
//! A [`PageSnapshot`] implements it over serialized DOM data; a
//! [`SnapshotSource`] produces snapshots from files or an external renderer.

mod page;
pub mod selector;
mod source;

pub use page::{PageSnapshot, SnapshotElement};
pub use selector::SelectorList;
pub use source::{CommandRenderer, FileSource, SnapshotSource};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{InspectError, Rgba, Result};

/// Opaque reference to an element of the inspected page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementHandle(pub usize);

/// Element geometry in CSS pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub fn area(&self) -> f32 {
        self.width.max(0.0) * self.height.max(0.0)
    }
}

/// Rendered-page capability consumed by the sampler, classifier and
/// typography extractor
pub trait PageInspector {
    /// URL or identifier of the page
    fn source(&self) -> &str;

    fn title(&self) -> Option<&str> {
        None
    }

    /// Elements matching `selector`, in document order
    fn query_all(&self, selector: &str) -> Result<Vec<ElementHandle>>;

    fn computed_style(&self, handle: ElementHandle) -> std::result::Result<StyleRecord, InspectError>;

    fn bounding_box(&self, handle: ElementHandle) -> Option<BoundingBox>;

    /// Lowercase tag name
    fn tag_name(&self, handle: ElementHandle) -> Option<String>;

    fn attribute(&self, handle: ElementHandle, name: &str) -> Option<String>;
}

/// Computed style properties of one element
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleRecord(BTreeMap<String, String>);

impl StyleRecord {
    pub fn new(properties: BTreeMap<String, String>) -> Self {
        Self(properties)
    }

    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    /// Trimmed, non-empty property value
    pub fn get(&self, property: &str) -> Option<&str> {
        self.0
            .get(property)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn color(&self, property: &str) -> Option<Rgba> {
        self.get(property).and_then(Rgba::parse)
    }

    /// Pixel value of a length property (`16px`, `0`, `12.5px`)
    pub fn px(&self, property: &str) -> Option<f32> {
        self.get(property).and_then(parse_px)
    }

    /// Whether the element is rendered at all
    pub fn is_hidden(&self) -> bool {
        self.get("display") == Some("none")
            || matches!(self.get("visibility"), Some("hidden" | "collapse"))
    }
}

/// Parse a single CSS pixel length
pub fn parse_px(value: &str) -> Option<f32> {
    let value = value.trim();
    let number = value.strip_suffix("px").unwrap_or(value).trim();
    if number.is_empty() {
        return None;
    }
    number.parse::<f32>().ok().filter(|v| v.is_finite())
}
