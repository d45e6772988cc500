//! Style Sampler
//!
//! Reads computed visual properties from a bounded, evenly spaced subset of
//! the page's elements. Elements that fail inspection, are not rendered, or
//! have no area are skipped; one bad element never aborts the pass.

use tracing::{debug, info};

use crate::config::SamplerConfig;
use crate::constants::sampler::{ALL_ELEMENTS, NON_VISUAL_TAGS};
use crate::snapshot::{ElementHandle, PageInspector, StyleRecord, parse_px};
use crate::types::{Result, Rgba};

/// Computed visual properties of one sampled element
#[derive(Debug, Clone, PartialEq)]
pub struct StyleSample {
    pub handle: ElementHandle,
    pub tag: String,
    pub classes: Vec<String>,
    pub background: Option<Rgba>,
    pub color: Option<Rgba>,
    /// Only set when the element has a visible border
    pub border_color: Option<Rgba>,
    pub border_width_px: Option<f32>,
    /// Full font stack as reported
    pub font_family: Option<String>,
    pub font_size_px: Option<f32>,
    pub font_weight: Option<u16>,
    pub line_height: Option<String>,
    /// Non-zero padding, margin and gap values
    pub spacing_px: Vec<f32>,
    pub border_radius: Option<String>,
    pub box_shadow: Option<String>,
}

impl StyleSample {
    /// Build a sample from a computed style record
    pub fn from_style(
        handle: ElementHandle,
        tag: impl Into<String>,
        classes: Vec<String>,
        style: &StyleRecord,
    ) -> Self {
        let border_width_px = style
            .px("border-top-width")
            .or_else(|| style.px("border-width"))
            .filter(|w| *w > 0.0);
        let border_style_none = matches!(
            style
                .get("border-top-style")
                .or_else(|| style.get("border-style")),
            Some("none" | "hidden")
        );
        let border_color = match (border_width_px, border_style_none) {
            (Some(_), false) => style
                .color("border-top-color")
                .or_else(|| style.color("border-color"))
                .filter(Rgba::is_visible),
            _ => None,
        };

        let mut spacing_px = box_values(style, "padding");
        spacing_px.extend(box_values(style, "margin"));
        spacing_px.extend(gap_values(style));
        spacing_px.retain(|v| *v > 0.0);

        Self {
            handle,
            tag: tag.into(),
            classes,
            background: style.color("background-color").filter(Rgba::is_visible),
            color: style.color("color").filter(Rgba::is_visible),
            border_color,
            border_width_px: border_width_px.filter(|_| border_color.is_some()),
            font_family: style.get("font-family").map(str::to_string),
            font_size_px: style.px("font-size").filter(|s| *s > 0.0),
            font_weight: style.get("font-weight").and_then(parse_font_weight),
            line_height: style
                .get("line-height")
                .filter(|v| *v != "normal")
                .map(str::to_string),
            spacing_px,
            border_radius: style
                .get("border-radius")
                .filter(|r| !is_zero_length(r))
                .map(str::to_string),
            box_shadow: style
                .get("box-shadow")
                .filter(|s| *s != "none")
                .map(str::to_string),
        }
    }

    /// First family of the font stack, unquoted
    pub fn primary_family(&self) -> Option<String> {
        self.font_family.as_deref().and_then(primary_family)
    }

    pub fn has_class_fragment(&self, fragment: &str) -> bool {
        self.classes
            .iter()
            .any(|c| c.to_ascii_lowercase().contains(fragment))
    }
}

/// Result of one sampling pass
#[derive(Debug, Clone, Default)]
pub struct SampleSet {
    pub samples: Vec<StyleSample>,
    /// Elements on the page
    pub total: usize,
    /// Elements visited but dropped
    pub skipped: usize,
}

/// Bounded style sampler
pub struct StyleSampler {
    max_elements: usize,
}

impl StyleSampler {
    pub fn new(config: &SamplerConfig) -> Self {
        Self {
            max_elements: config.max_elements.max(1),
        }
    }

    pub fn sample(&self, page: &dyn PageInspector) -> Result<SampleSet> {
        let handles = page.query_all(ALL_ELEMENTS)?;
        let total = handles.len();
        let picked = stride_indices(total, self.max_elements);

        if picked.len() < total {
            debug!(
                "Subsampling {} of {} elements on {}",
                picked.len(),
                total,
                page.source()
            );
        }

        let mut set = SampleSet {
            samples: Vec::with_capacity(picked.len()),
            total,
            skipped: 0,
        };

        for index in picked {
            let handle = handles[index];
            match self.inspect(page, handle) {
                Some(sample) => set.samples.push(sample),
                None => set.skipped += 1,
            }
        }

        info!(
            "Sampled {} elements from {} ({} skipped)",
            set.samples.len(),
            page.source(),
            set.skipped
        );
        Ok(set)
    }

    fn inspect(&self, page: &dyn PageInspector, handle: ElementHandle) -> Option<StyleSample> {
        let tag = page.tag_name(handle)?;
        if NON_VISUAL_TAGS.contains(&tag.as_str()) {
            return None;
        }

        let style = match page.computed_style(handle) {
            Ok(style) => style,
            Err(e) => {
                debug!("Skipping element: {}", e);
                return None;
            }
        };
        if style.is_hidden() {
            return None;
        }
        if let Some(rect) = page.bounding_box(handle)
            && rect.area() <= 0.0
        {
            return None;
        }

        let classes = page
            .attribute(handle, "class")
            .map(|c| c.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();

        Some(StyleSample::from_style(handle, tag, classes, &style))
    }
}

/// Evenly spaced indices into `0..total`, at most `cap` of them
pub fn stride_indices(total: usize, cap: usize) -> Vec<usize> {
    if total <= cap {
        return (0..total).collect();
    }
    (0..cap)
        .map(|i| ((i as u128 * total as u128) / cap as u128) as usize)
        .collect()
}

/// Longhands (`padding-top` ...) when present, otherwise the shorthand
fn box_values(style: &StyleRecord, property: &str) -> Vec<f32> {
    let longhands: Vec<f32> = ["top", "right", "bottom", "left"]
        .iter()
        .filter_map(|side| style.px(&format!("{}-{}", property, side)))
        .collect();
    if !longhands.is_empty() {
        return longhands;
    }
    style
        .get(property)
        .map(|v| v.split_whitespace().filter_map(parse_px).collect())
        .unwrap_or_default()
}

fn gap_values(style: &StyleRecord) -> Vec<f32> {
    let longhands: Vec<f32> = ["row-gap", "column-gap"]
        .iter()
        .filter_map(|p| style.px(p))
        .collect();
    if !longhands.is_empty() {
        return longhands;
    }
    style.px("gap").into_iter().collect()
}

fn parse_font_weight(value: &str) -> Option<u16> {
    match value {
        "normal" => Some(400),
        "bold" => Some(700),
        "lighter" => Some(300),
        "bolder" => Some(600),
        other => other.parse::<f32>().ok().map(|w| w.round() as u16),
    }
}

fn is_zero_length(value: &str) -> bool {
    value
        .split_whitespace()
        .all(|part| parse_px(part.trim_end_matches('%')) == Some(0.0))
}

/// First family of a CSS font stack, unquoted
pub fn primary_family(stack: &str) -> Option<String> {
    stack
        .split(',')
        .next()
        .map(|f| f.trim().trim_matches(|c| c == '"' || c == '\'').to_string())
        .filter(|f| !f.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harvest::fixtures::{element, page};
    use crate::snapshot::BoundingBox;

    #[test]
    fn test_stride_indices() {
        assert_eq!(stride_indices(3, 10), vec![0, 1, 2]);
        assert_eq!(stride_indices(10, 5), vec![0, 2, 4, 6, 8]);
        assert_eq!(stride_indices(0, 5), Vec::<usize>::new());

        let picked = stride_indices(10_000, 1500);
        assert_eq!(picked.len(), 1500);
        assert!(picked.windows(2).all(|w| w[0] < w[1]));
        assert!(*picked.last().unwrap() < 10_000);
    }

    #[test]
    fn test_skips_failed_hidden_and_empty_elements() {
        let mut detached = element("div", &[], &[("color", "rgb(0, 0, 0)")]);
        detached.error = Some("detached node".into());
        let mut zero = element("span", &[], &[("color", "rgb(0, 0, 0)")]);
        zero.rect = Some(BoundingBox::default());

        let page = page(vec![
            element("p", &[], &[("color", "rgb(17, 17, 17)")]),
            detached,
            element("div", &[], &[("display", "none")]),
            zero,
            element("script", &[], &[]),
        ]);

        let set = StyleSampler::new(&SamplerConfig::default())
            .sample(&page)
            .unwrap();
        assert_eq!(set.total, 5);
        assert_eq!(set.samples.len(), 1);
        assert_eq!(set.skipped, 4);
        assert_eq!(set.samples[0].color.unwrap().to_hex(), "#111111");
    }

    #[test]
    fn test_cap_limits_samples() {
        let elements = (0..40)
            .map(|_| element("div", &[], &[("color", "rgb(0, 0, 0)")]))
            .collect();
        let sampler = StyleSampler::new(&SamplerConfig { max_elements: 8 });
        let set = sampler.sample(&page(elements)).unwrap();
        assert_eq!(set.total, 40);
        assert_eq!(set.samples.len(), 8);
        assert_eq!(set.samples[1].handle, ElementHandle(5));
    }

    #[test]
    fn test_sample_properties() {
        let style = StyleRecord::from_pairs([
            ("background-color", "rgba(0, 0, 0, 0)"),
            ("color", "rgb(0, 100, 250)"),
            ("border-top-width", "1px"),
            ("border-top-style", "solid"),
            ("border-top-color", "rgb(0, 100, 250)"),
            ("padding", "8px 16px"),
            ("margin-top", "0px"),
            ("margin-bottom", "12px"),
            ("gap", "4px"),
            ("font-family", "\"Inter\", sans-serif"),
            ("font-size", "14px"),
            ("font-weight", "bold"),
            ("line-height", "normal"),
            ("border-radius", "0px"),
            ("box-shadow", "none"),
        ]);
        let sample = StyleSample::from_style(ElementHandle(0), "button", vec![], &style);

        assert!(sample.background.is_none());
        assert_eq!(sample.border_color.unwrap().to_hex(), "#0064FA");
        assert_eq!(sample.border_width_px, Some(1.0));
        assert_eq!(sample.spacing_px, vec![8.0, 16.0, 12.0, 4.0]);
        assert_eq!(sample.primary_family().as_deref(), Some("Inter"));
        assert_eq!(sample.font_weight, Some(700));
        assert!(sample.line_height.is_none());
        assert!(sample.border_radius.is_none());
        assert!(sample.box_shadow.is_none());
    }

    #[test]
    fn test_border_style_none_drops_border() {
        let style = StyleRecord::from_pairs([
            ("border-top-width", "2px"),
            ("border-top-style", "none"),
            ("border-top-color", "rgb(0, 0, 0)"),
        ]);
        let sample = StyleSample::from_style(ElementHandle(0), "div", vec![], &style);
        assert!(sample.border_color.is_none());
        assert!(sample.border_width_px.is_none());
    }
}
