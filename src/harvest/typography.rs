//! Typography extraction: heading levels, body default and size scale

use std::collections::BTreeMap;

use super::sampler::StyleSample;
use crate::constants::aggregate::{MAX_FONT_SCALE, MIN_FONT_SIZE_REPEATS};
use crate::types::{FontSpec, Histogram, TypographySection};

const HEADING_TAGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

/// Tags whose text is treated as running body copy
const BODY_TAGS: [&str; 5] = ["p", "li", "span", "td", "div"];

pub fn extract(samples: &[StyleSample]) -> TypographySection {
    let mut section = TypographySection::default();

    for sample in samples {
        if let Some(size) = sample.font_size_px {
            *section
                .size_histogram
                .entry(size.round() as u32)
                .or_default() += 1;
        }
        if let Some(family) = sample.primary_family() {
            *section.family_histogram.entry(family).or_default() += 1;
        }
    }

    for tag in HEADING_TAGS {
        let specs = samples.iter().filter(|s| s.tag == tag);
        if let Some(spec) = most_common_spec(specs) {
            section.headings.insert(tag.to_string(), spec);
        }
    }

    section.body = samples
        .iter()
        .find(|s| s.tag == "body")
        .and_then(font_spec)
        .or_else(|| most_common_spec(samples.iter().filter(|s| BODY_TAGS.contains(&s.tag.as_str()))));

    section.size_scale = size_scale(&section.size_histogram);
    section
}

/// Frequent sizes, at most [`MAX_FONT_SCALE`] of them, ascending
pub fn size_scale(hist: &Histogram<u32>) -> Vec<u32> {
    let mut ranked: Vec<(u32, u32)> = hist
        .iter()
        .filter(|(_, count)| **count >= MIN_FONT_SIZE_REPEATS)
        .map(|(size, count)| (*size, *count))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(MAX_FONT_SCALE);

    let mut scale: Vec<u32> = ranked.into_iter().map(|(size, _)| size).collect();
    scale.sort_unstable();
    scale
}

fn font_spec(sample: &StyleSample) -> Option<FontSpec> {
    Some(FontSpec {
        family: sample.font_family.clone()?,
        size_px: sample.font_size_px?,
        weight: sample.font_weight.unwrap_or(400),
        line_height: sample.line_height.clone(),
    })
}

/// Mode over (family, rounded size, weight); the first sample with the
/// winning combination supplies the spec
fn most_common_spec<'a>(samples: impl Iterator<Item = &'a StyleSample>) -> Option<FontSpec> {
    let mut counts: BTreeMap<(String, u32, u16), (u32, usize)> = BTreeMap::new();
    let mut specs: Vec<FontSpec> = Vec::new();

    for spec in samples.filter_map(font_spec) {
        let key = (spec.family.clone(), spec.size_px.round() as u32, spec.weight);
        let entry = counts.entry(key).or_insert((0, specs.len()));
        entry.0 += 1;
        if entry.1 == specs.len() {
            specs.push(spec);
        }
    }

    counts
        .values()
        .max_by(|a, b| a.0.cmp(&b.0).then_with(|| b.1.cmp(&a.1)))
        .map(|(_, first)| specs[*first].clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harvest::fixtures::landing_page;
    use crate::harvest::sampler::StyleSampler;
    use crate::config::SamplerConfig;

    #[test]
    fn test_landing_page_typography() {
        let set = StyleSampler::new(&SamplerConfig::default())
            .sample(&landing_page())
            .unwrap();
        let section = extract(&set.samples);

        let body = section.body.unwrap();
        assert_eq!(body.family, "Inter, sans-serif");
        assert_eq!(body.size_px, 14.0);
        assert_eq!(body.line_height.as_deref(), Some("20px"));

        assert_eq!(section.headings["h1"].size_px, 32.0);
        assert_eq!(section.headings["h1"].weight, 700);
        assert_eq!(section.headings["h2"].weight, 600);
        assert!(!section.headings.contains_key("h3"));

        assert_eq!(section.family_histogram["Inter"], 6);
        // 14px: body + three buttons, 12px: two paragraphs
        assert_eq!(section.size_scale, vec![12, 14]);
    }

    #[test]
    fn test_size_scale_limits() {
        let hist: Histogram<u32> = (10..30).map(|s| (s, 2 + s % 3)).collect();
        let scale = size_scale(&hist);
        assert_eq!(scale.len(), MAX_FONT_SCALE);
        assert!(scale.windows(2).all(|w| w[0] < w[1]));

        let rare: Histogram<u32> = [(12, 1), (14, 1)].into_iter().collect();
        assert!(size_scale(&rare).is_empty());
    }

    #[test]
    fn test_no_fonts_no_body() {
        assert_eq!(extract(&[]), TypographySection::default());
    }
}
