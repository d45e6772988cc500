//! Frequency Aggregator
//!
//! Counts sampled values per category and reduces the histograms into
//! representative scales: a 10-step neutral ramp, a spacing scale snapped to
//! the canonical ladder, named radius steps and blur-bucketed shadows.
//!
//! Reductions only read histograms, so merged records are re-reduced with
//! the same functions. Slots without enough samples are omitted.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::sampler::StyleSample;
use crate::config::AggregateConfig;
use crate::constants::aggregate::{
    FULL_RADIUS_PX, MIN_DISTINCT_NEUTRALS, RADIUS_STEPS, SHADOW_BLUR_BOUNDS, SHADOW_BLUR_OVERFLOW,
    SPACING_LADDER,
};
use crate::snapshot::parse_px;
use crate::types::{
    BorderSection, ColorCount, ColorSection, Histogram, NEUTRAL_STEPS, Rgba, ShadowBucket,
    ShadowSection, SpacingSection,
};

static COLOR_FN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(rgba?|hsla?)\([^)]*\)").unwrap());

/// Aggregated sections of one record, before semantic guesses
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregated {
    pub colors: ColorSection,
    pub spacing: SpacingSection,
    pub borders: BorderSection,
    pub shadows: ShadowSection,
}

pub struct FrequencyAggregator {
    config: AggregateConfig,
}

impl FrequencyAggregator {
    pub fn new(config: &AggregateConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    pub fn neutral_tolerance(&self) -> u8 {
        self.config.neutral_tolerance
    }

    pub fn aggregate(&self, samples: &[StyleSample]) -> Aggregated {
        let mut out = Aggregated::default();

        for sample in samples {
            if let Some(bg) = sample.background {
                bump(&mut out.colors.background, bg.to_hex());
            }
            if let Some(fg) = sample.color {
                bump(&mut out.colors.text, fg.to_hex());
            }
            if let Some(border) = sample.border_color {
                bump(&mut out.colors.border, border.to_hex());
            }
            for px in &sample.spacing_px {
                bump(&mut out.spacing.histogram, px.round() as u32);
            }
            if let Some(width) = sample.border_width_px {
                let width = width.round() as u32;
                if width > 0 {
                    bump(&mut out.borders.width_histogram, width);
                }
            }
            if let Some(radius) = &sample.border_radius {
                bump(&mut out.borders.radius_histogram, radius.clone());
            }
            if let Some(shadow) = &sample.box_shadow {
                bump(&mut out.shadows.histogram, shadow.clone());
            }
        }

        self.reduce_colors(&mut out.colors);
        self.reduce_spacing(&mut out.spacing);
        self.reduce_borders(&mut out.borders, &out.colors);
        self.reduce_shadows(&mut out.shadows);

        debug!(
            "Aggregated {} samples: {} neutral steps, {} chromatic, {} spacing steps",
            samples.len(),
            out.colors.neutral_scale.len(),
            out.colors.chromatic.len(),
            out.spacing.scale.len()
        );
        out
    }

    /// Recompute neutral ramp, chromatic list and dominant colors.
    /// Semantic guesses are left untouched.
    pub fn reduce_colors(&self, colors: &mut ColorSection) {
        let mut combined: Histogram<String> = BTreeMap::new();
        for hist in [&colors.background, &colors.text, &colors.border] {
            for (hex, count) in hist {
                *combined.entry(hex.clone()).or_default() += count;
            }
        }

        let frequent: Vec<(Rgba, &String, u32)> = combined
            .iter()
            .filter(|(_, count)| **count >= self.config.min_color_occurrences)
            .filter_map(|(hex, count)| Rgba::parse(hex).map(|c| (c, hex, *count)))
            .collect();

        let tolerance = self.config.neutral_tolerance;
        let neutrals: Vec<(Rgba, &String)> = frequent
            .iter()
            .filter(|(c, _, _)| c.is_neutral(tolerance))
            .map(|(c, hex, _)| (*c, *hex))
            .collect();
        colors.neutral_scale = neutral_scale(neutrals);

        let mut chromatic: Vec<ColorCount> = frequent
            .iter()
            .filter(|(c, _, _)| !c.is_neutral(tolerance))
            .map(|(_, hex, count)| ColorCount {
                hex: (*hex).clone(),
                count: *count,
            })
            .collect();
        chromatic.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.hex.cmp(&b.hex)));
        colors.chromatic = chromatic;

        colors.dominant_background = dominant(&colors.background);
        colors.dominant_text = dominant(&colors.text);
    }

    pub fn reduce_spacing(&self, spacing: &mut SpacingSection) {
        spacing.scale = spacing_scale(
            &spacing.histogram,
            self.config.min_spacing_repeats,
            self.config.spacing_tolerance_px,
        );
    }

    pub fn reduce_borders(&self, borders: &mut BorderSection, colors: &ColorSection) {
        borders.radius_scale = radius_scale(&borders.radius_histogram);
        borders.dominant_width = dominant(&borders.width_histogram).map(|w| format!("{}px", w));
        borders.dominant_color = dominant(&colors.border);
    }

    pub fn reduce_shadows(&self, shadows: &mut ShadowSection) {
        shadows.buckets = shadow_buckets(&shadows.histogram, self.config.max_shadow_buckets);
    }
}

fn bump<K: Ord>(hist: &mut Histogram<K>, key: K) {
    *hist.entry(key).or_default() += 1;
}

/// Most frequent key; ties go to the smallest key
pub fn dominant<K: Ord + Clone>(hist: &Histogram<K>) -> Option<K> {
    let mut best: Option<(&K, u32)> = None;
    for (key, count) in hist {
        if best.is_none_or(|(_, c)| *count > c) {
            best = Some((key, *count));
        }
    }
    best.map(|(k, _)| k.clone())
}

// =============================================================================
// Neutral Ramp
// =============================================================================

/// Nearest-rank resampling of neutrals (lightest first) into ten steps.
///
/// Fewer than three distinct neutrals leave the ramp empty.
pub fn neutral_scale(mut neutrals: Vec<(Rgba, &String)>) -> BTreeMap<String, String> {
    neutrals.sort_by(|(a, ha), (b, hb)| {
        b.relative_luminance()
            .total_cmp(&a.relative_luminance())
            .then_with(|| ha.cmp(hb))
    });
    neutrals.dedup_by(|a, b| a.1 == b.1);

    let n = neutrals.len();
    if n < MIN_DISTINCT_NEUTRALS {
        return BTreeMap::new();
    }

    let last_step = (NEUTRAL_STEPS.len() - 1) as f64;
    NEUTRAL_STEPS
        .iter()
        .enumerate()
        .map(|(i, step)| {
            let rank = (i as f64 * (n - 1) as f64 / last_step).round() as usize;
            (step.to_string(), neutrals[rank.min(n - 1)].1.clone())
        })
        .collect()
}

// =============================================================================
// Spacing
// =============================================================================

/// Ladder steps with a frequent observed value within `tolerance`.
///
/// Every step is checked on its own, so one observed value can keep two
/// neighbouring steps (9px keeps both 8 and 10 at a 2px tolerance).
pub fn spacing_scale(hist: &Histogram<u32>, min_repeats: u32, tolerance: u32) -> Vec<u32> {
    let observed: Vec<u32> = hist
        .iter()
        .filter(|(value, count)| **value > 0 && **count >= min_repeats)
        .map(|(value, _)| *value)
        .collect();

    SPACING_LADDER
        .iter()
        .copied()
        .filter(|step| {
            observed
                .iter()
                .map(|value| value.abs_diff(*step))
                .min()
                .is_some_and(|distance| distance <= tolerance)
        })
        .collect()
}

// =============================================================================
// Radius
// =============================================================================

/// Named radius steps.
///
/// Percent radii of 50% or more become `circle`, pixel radii of 999px or
/// more become `full`; the four most frequent remaining pixel radii are
/// named in ascending order.
pub fn radius_scale(hist: &Histogram<String>) -> BTreeMap<String, String> {
    let mut scale = BTreeMap::new();

    let mut ranked: Vec<(&String, u32)> = hist.iter().map(|(k, v)| (k, *v)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let mut pixel: Vec<(f32, &String)> = Vec::new();
    for (raw, _) in ranked {
        let value = raw.trim();
        if let Some(pct) = value.strip_suffix('%') {
            if pct.trim().parse::<f32>().is_ok_and(|p| p >= 50.0) {
                scale
                    .entry("circle".to_string())
                    .or_insert_with(|| value.to_string());
            }
            continue;
        }
        let Some(px) = parse_px(value) else {
            continue;
        };
        if px >= FULL_RADIUS_PX {
            scale
                .entry("full".to_string())
                .or_insert_with(|| value.to_string());
        } else if px > 0.0 && pixel.len() < RADIUS_STEPS.len() {
            pixel.push((px, raw));
        }
    }

    pixel.sort_by(|a, b| a.0.total_cmp(&b.0));
    for (step, (_, raw)) in RADIUS_STEPS.iter().zip(pixel) {
        scale.insert(step.to_string(), raw.trim().to_string());
    }
    scale
}

// =============================================================================
// Shadows
// =============================================================================

/// Blur radius of the first shadow layer
pub fn shadow_blur(shadow: &str) -> Option<f32> {
    let without_colors = COLOR_FN_RE.replace_all(shadow, " ");
    let first_layer = without_colors.split(',').next()?;
    let lengths: Vec<f32> = first_layer
        .split_whitespace()
        .filter(|part| *part != "inset")
        .filter_map(parse_px)
        .collect();
    if lengths.len() < 2 {
        return None;
    }
    Some(lengths.get(2).copied().unwrap_or(0.0).max(0.0))
}

/// Bucket name for a blur radius, first fit in order
pub fn blur_bucket(blur: f32) -> &'static str {
    SHADOW_BLUR_BOUNDS
        .iter()
        .find(|(_, bound)| blur <= *bound)
        .map(|(name, _)| *name)
        .unwrap_or(SHADOW_BLUR_OVERFLOW)
}

/// The `max` most frequent shadows, each assigned to its blur bucket.
/// A more frequent shadow keeps a bucket over a rarer one.
pub fn shadow_buckets(hist: &Histogram<String>, max: usize) -> BTreeMap<String, ShadowBucket> {
    let mut ranked: Vec<(&String, u32)> = hist
        .iter()
        .filter(|(value, _)| value.trim() != "none")
        .map(|(k, v)| (k, *v))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let mut buckets = BTreeMap::new();
    for (value, count) in ranked.into_iter().take(max) {
        let Some(blur) = shadow_blur(value) else {
            debug!("Ignoring unparseable shadow '{}'", value);
            continue;
        };
        buckets
            .entry(blur_bucket(blur).to_string())
            .or_insert_with(|| ShadowBucket {
                value: value.clone(),
                blur_px: blur,
                count,
            });
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::ElementHandle;
    use proptest::prelude::*;

    fn sample(background: Option<Rgba>, spacing: &[f32]) -> StyleSample {
        StyleSample {
            handle: ElementHandle(0),
            tag: "div".into(),
            classes: vec![],
            background,
            color: None,
            border_color: None,
            border_width_px: None,
            font_family: None,
            font_size_px: None,
            font_weight: None,
            line_height: None,
            spacing_px: spacing.to_vec(),
            border_radius: None,
            box_shadow: None,
        }
    }

    fn hist<K: Ord>(entries: impl IntoIterator<Item = (K, u32)>) -> Histogram<K> {
        entries.into_iter().collect()
    }

    #[test]
    fn test_neutral_scale_ten_steps() {
        let greys = ["#FFFFFF", "#F5F5F5", "#CCCCCC", "#888888", "#333333", "#000000"];
        let mut colors = ColorSection::default();
        for hex in greys {
            colors.background.insert(hex.to_string(), 3);
        }
        FrequencyAggregator::new(&AggregateConfig::default()).reduce_colors(&mut colors);

        let scale = &colors.neutral_scale;
        assert_eq!(scale.len(), 10);
        assert_eq!(scale["0"], "#FFFFFF");
        assert_eq!(scale["9"], "#000000");
        // n = 6: step 1 -> rank round(5/9) = 1
        assert_eq!(scale["1"], "#F5F5F5");
    }

    #[test]
    fn test_neutral_scale_empty_below_three() {
        let mut colors = ColorSection::default();
        colors.background.insert("#FFFFFF".into(), 10);
        colors.text.insert("#111111".into(), 10);
        FrequencyAggregator::new(&AggregateConfig::default()).reduce_colors(&mut colors);
        assert!(colors.neutral_scale.is_empty());

        let mut none = ColorSection::default();
        FrequencyAggregator::new(&AggregateConfig::default()).reduce_colors(&mut none);
        assert!(none.neutral_scale.is_empty());
    }

    #[test]
    fn test_rare_colors_dropped() {
        let mut colors = ColorSection::default();
        colors.background.insert("#0064FA".into(), 5);
        colors.background.insert("#FF00FF".into(), 1);
        FrequencyAggregator::new(&AggregateConfig::default()).reduce_colors(&mut colors);
        assert_eq!(
            colors.chromatic,
            vec![ColorCount {
                hex: "#0064FA".into(),
                count: 5
            }]
        );
        assert_eq!(colors.dominant_background.as_deref(), Some("#0064FA"));
    }

    #[test]
    fn test_spacing_snaps_to_ladder() {
        let h = hist([(4, 5), (9, 3), (16, 4), (37, 9), (100, 3), (13, 1)]);
        // 37 is 3px from 40, 100 is 4px from 96, 13 is below the repeat threshold
        assert_eq!(spacing_scale(&h, 2, 2), vec![2, 4, 6, 8, 10, 14, 16]);
        assert_eq!(spacing_scale(&h, 2, 0), vec![4, 16]);
    }

    #[test]
    fn test_spacing_value_between_steps_keeps_both() {
        assert_eq!(spacing_scale(&hist([(9, 3)]), 2, 2), vec![8, 10]);
        assert_eq!(spacing_scale(&hist([(9, 3)]), 2, 0), Vec::<u32>::new());
        assert_eq!(spacing_scale(&hist([(4, 2)]), 2, 1), vec![4]);
    }

    #[test]
    fn test_radius_scale() {
        let h = hist([
            ("4px".to_string(), 10),
            ("8px".to_string(), 6),
            ("2px".to_string(), 3),
            ("12px".to_string(), 2),
            ("6px".to_string(), 1),
            ("50%".to_string(), 4),
            ("9999px".to_string(), 2),
            ("4px 4px 0px 0px".to_string(), 5),
        ]);
        let scale = radius_scale(&h);
        assert_eq!(scale["extra-small"], "2px");
        assert_eq!(scale["small"], "4px");
        assert_eq!(scale["medium"], "8px");
        assert_eq!(scale["large"], "12px");
        assert_eq!(scale["circle"], "50%");
        assert_eq!(scale["full"], "9999px");
        assert_eq!(scale.len(), 6);
    }

    #[test]
    fn test_radius_scale_omits_missing_steps() {
        let scale = radius_scale(&hist([("6px".to_string(), 3)]));
        assert_eq!(scale.len(), 1);
        assert_eq!(scale["extra-small"], "6px");
    }

    #[test]
    fn test_shadow_blur_parsing() {
        assert_eq!(shadow_blur("0px 4px 14px rgba(0, 0, 0, 0.1)"), Some(14.0));
        assert_eq!(shadow_blur("rgba(0,0,0,.2) 0px 1px 3px 0px"), Some(3.0));
        assert_eq!(
            shadow_blur("0 1px 2px rgb(0 0 0 / 5%), 0 10px 40px rgba(0,0,0,.3)"),
            Some(2.0)
        );
        assert_eq!(shadow_blur("inset 0 0 0 1px #ddd"), Some(0.0));
        assert_eq!(shadow_blur("garbage"), None);
    }

    #[test]
    fn test_shadow_buckets_first_fit() {
        let h = hist([
            ("0 1px 2px rgba(0,0,0,.1)".to_string(), 9),
            ("0 1px 3px rgba(0,0,0,.2)".to_string(), 4),
            ("0 4px 12px rgba(0,0,0,.1)".to_string(), 6),
            ("0 8px 24px rgba(0,0,0,.1)".to_string(), 2),
            ("0 20px 60px rgba(0,0,0,.3)".to_string(), 1),
            ("none".to_string(), 50),
        ]);
        let buckets = shadow_buckets(&h, 5);
        assert_eq!(buckets["sm"].value, "0 1px 2px rgba(0,0,0,.1)");
        assert_eq!(buckets["sm"].count, 9);
        assert_eq!(buckets["md"].blur_px, 12.0);
        assert_eq!(buckets["lg"].blur_px, 24.0);
        assert_eq!(buckets["xl"].blur_px, 60.0);

        let capped = shadow_buckets(&h, 2);
        assert_eq!(capped.len(), 2);
        assert!(capped.contains_key("sm") && capped.contains_key("md"));
    }

    #[test]
    fn test_dominant_tie_breaks_on_key() {
        let h = hist([("#222222".to_string(), 3), ("#111111".to_string(), 3)]);
        assert_eq!(dominant(&h).as_deref(), Some("#111111"));
        assert_eq!(dominant::<u32>(&BTreeMap::new()), None);
    }

    #[test]
    fn test_aggregate_border_section() {
        let mut a = sample(None, &[]);
        a.border_color = Some(Rgba::rgb(230, 232, 234));
        a.border_width_px = Some(1.0);
        let samples = vec![a.clone(), a, sample(None, &[])];

        let out = FrequencyAggregator::new(&AggregateConfig::default()).aggregate(&samples);
        assert_eq!(out.borders.dominant_width.as_deref(), Some("1px"));
        assert_eq!(out.borders.dominant_color.as_deref(), Some("#E6E8EA"));
    }

    fn arb_samples() -> impl Strategy<Value = Vec<StyleSample>> {
        prop::collection::vec(
            (
                any::<(u8, u8, u8)>(),
                0u8..4,
                prop::collection::vec(0.0f32..120.0, 0..4),
            ),
            0..60,
        )
        .prop_map(|items| {
            items
                .into_iter()
                .map(|((r, g, b), grey, spacing)| {
                    // Bias toward greys so the neutral ramp is exercised
                    let color = match grey {
                        0 => Rgba::rgb(r, g, b),
                        _ => Rgba::rgb(r, r.saturating_add(grey), r),
                    };
                    sample(Some(color), &spacing)
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn test_aggregate_is_idempotent(samples in arb_samples()) {
            let aggregator = FrequencyAggregator::new(&AggregateConfig::default());
            let first = aggregator.aggregate(&samples);
            let second = aggregator.aggregate(&samples);
            prop_assert_eq!(
                serde_json::to_string(&first.colors).unwrap(),
                serde_json::to_string(&second.colors).unwrap()
            );
            prop_assert_eq!(first, second);
        }

        #[test]
        fn test_neutral_steps_satisfy_predicate(samples in arb_samples()) {
            let config = AggregateConfig::default();
            let out = FrequencyAggregator::new(&config).aggregate(&samples);
            prop_assert!(out.colors.neutral_scale.is_empty() || out.colors.neutral_scale.len() == 10);
            for hex in out.colors.neutral_scale.values() {
                let color = Rgba::parse(hex).unwrap();
                prop_assert!(color.is_neutral(config.neutral_tolerance), "{} is not neutral", hex);
            }
        }

        #[test]
        fn test_spacing_scale_is_ladder_subset(
            entries in prop::collection::btree_map(0u32..150, 1u32..6, 0..40),
            tolerance in 0u32..4,
        ) {
            let scale = spacing_scale(&entries, 2, tolerance);
            prop_assert!(scale.windows(2).all(|w| w[0] < w[1]));
            for value in &scale {
                prop_assert!(SPACING_LADDER.contains(value));
            }
        }
    }
}
