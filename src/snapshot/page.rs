//! Page Snapshot
//!
//! A serialized DOM with computed styles, as produced by the external
//! renderer. Implements [`PageInspector`] so the whole pipeline can run
//! against fixtures without a browser.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::selector::SelectorList;
use super::{BoundingBox, ElementHandle, PageInspector, StyleRecord};
use crate::types::{HarvestError, InspectError, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageSnapshot {
    pub url: String,
    pub title: Option<String>,
    /// Elements in document order
    pub elements: Vec<SnapshotElement>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotElement {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attributes: BTreeMap<String, String>,
    /// Computed style property → value
    pub styles: BTreeMap<String, String>,
    pub rect: Option<BoundingBox>,
    /// Index of the parent element; always lower than this element's index
    pub parent: Option<usize>,
    /// Set when the renderer could not read this element's styles
    pub error: Option<String>,
}

impl SnapshotElement {
    /// Attribute value, with `class` and `id` served from their dedicated fields
    pub fn attribute(&self, name: &str) -> Option<String> {
        match name {
            "class" if !self.classes.is_empty() => Some(self.classes.join(" ")),
            "id" => self.id.clone(),
            _ => self.attributes.get(name).cloned(),
        }
    }
}

impl PageSnapshot {
    /// Parse and validate a snapshot from JSON text
    pub fn from_json(content: &str) -> Result<Self> {
        let snapshot: Self = serde_json::from_str(content)
            .map_err(|e| HarvestError::Snapshot(format!("malformed snapshot JSON: {}", e)))?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Load and validate a snapshot file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    fn validate(&self) -> Result<()> {
        for (index, el) in self.elements.iter().enumerate() {
            if el.tag.trim().is_empty() {
                return Err(HarvestError::Snapshot(format!(
                    "element {} has no tag name",
                    index
                )));
            }
            if let Some(parent) = el.parent
                && parent >= index
            {
                return Err(HarvestError::Snapshot(format!(
                    "element {} names parent {} which does not precede it",
                    index, parent
                )));
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn element(&self, index: usize) -> Option<&SnapshotElement> {
        self.elements.get(index)
    }

    pub fn parent_of(&self, index: usize) -> Option<usize> {
        self.elements.get(index).and_then(|el| el.parent)
    }
}

impl PageInspector for PageSnapshot {
    fn source(&self) -> &str {
        &self.url
    }

    fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    fn query_all(&self, selector: &str) -> Result<Vec<ElementHandle>> {
        let list = SelectorList::parse(selector)?;
        let handles: Vec<ElementHandle> = (0..self.elements.len())
            .filter(|i| list.matches(self, *i))
            .map(ElementHandle)
            .collect();
        debug!("'{}' matched {} elements", selector, handles.len());
        Ok(handles)
    }

    fn computed_style(&self, handle: ElementHandle) -> std::result::Result<StyleRecord, InspectError> {
        let el = self
            .elements
            .get(handle.0)
            .ok_or(InspectError::UnknownElement(handle.0))?;
        if let Some(reason) = &el.error {
            return Err(InspectError::Style {
                index: handle.0,
                reason: reason.clone(),
            });
        }
        Ok(StyleRecord::new(el.styles.clone()))
    }

    fn bounding_box(&self, handle: ElementHandle) -> Option<BoundingBox> {
        self.elements.get(handle.0).and_then(|el| el.rect)
    }

    fn tag_name(&self, handle: ElementHandle) -> Option<String> {
        self.elements.get(handle.0).map(|el| el.tag.to_ascii_lowercase())
    }

    fn attribute(&self, handle: ElementHandle, name: &str) -> Option<String> {
        self.elements.get(handle.0).and_then(|el| el.attribute(name))
    }
}
