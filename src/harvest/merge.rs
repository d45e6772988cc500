//! Structural merge of harvest records
//!
//! Histograms are summed and every derived scale is recomputed from the
//! summed histograms, so merging is associative in its frequency totals.
//! Non-histogram fields keep the first value seen, except semantic guesses
//! where the most confident guess per role wins.

use std::collections::BTreeMap;

use chrono::Utc;
use uuid::Uuid;

use super::aggregate::FrequencyAggregator;
use super::typography;
use crate::config::AggregateConfig;
use crate::types::{HarvestError, HarvestRecord, Histogram, Result, SemanticColors};

fn add_into<K: Ord + Clone>(target: &mut Histogram<K>, source: &Histogram<K>) {
    for (key, count) in source {
        *target.entry(key.clone()).or_default() += count;
    }
}

/// Merge records from several pages into one
pub fn merge_records(records: &[HarvestRecord], config: &AggregateConfig) -> Result<HarvestRecord> {
    let Some(first) = records.first() else {
        return Err(HarvestError::NoData("no harvest records to merge".to_string()));
    };

    let mut out = HarvestRecord::default();
    out.metadata.id = Uuid::new_v4().to_string();
    out.metadata.source = first.metadata.source.clone();
    out.metadata.extracted_at = records
        .iter()
        .filter_map(|r| r.metadata.extracted_at)
        .max()
        .or_else(|| Some(Utc::now()));

    let mut labels: BTreeMap<&str, (usize, usize)> = BTreeMap::new();

    for (index, record) in records.iter().enumerate() {
        let meta = &record.metadata;
        let sources = if meta.sources.is_empty() {
            std::slice::from_ref(&meta.source)
        } else {
            meta.sources.as_slice()
        };
        for source in sources {
            if !source.is_empty() && !out.metadata.sources.contains(source) {
                out.metadata.sources.push(source.clone());
            }
        }
        if out.metadata.title.is_none() {
            out.metadata.title = meta.title.clone();
        }
        out.metadata.total_elements += meta.total_elements;
        out.metadata.sampled_elements += meta.sampled_elements;
        out.metadata.skipped_elements += meta.skipped_elements;
        if meta.page_type != "unknown" {
            labels.entry(meta.page_type.as_str()).or_insert((0, index)).0 += 1;
        }

        let colors = &record.colors;
        add_into(&mut out.colors.background, &colors.background);
        add_into(&mut out.colors.text, &colors.text);
        add_into(&mut out.colors.border, &colors.border);
        merge_semantic(&mut out.colors.semantic, &colors.semantic);

        let typo = &record.typography;
        add_into(&mut out.typography.size_histogram, &typo.size_histogram);
        add_into(&mut out.typography.family_histogram, &typo.family_histogram);
        for (level, spec) in &typo.headings {
            out.typography
                .headings
                .entry(level.clone())
                .or_insert_with(|| spec.clone());
        }
        if out.typography.body.is_none() {
            out.typography.body = typo.body.clone();
        }

        add_into(&mut out.spacing.histogram, &record.spacing.histogram);
        add_into(
            &mut out.borders.radius_histogram,
            &record.borders.radius_histogram,
        );
        add_into(
            &mut out.borders.width_histogram,
            &record.borders.width_histogram,
        );
        add_into(&mut out.shadows.histogram, &record.shadows.histogram);

        for (kind, blueprint) in &record.components {
            let merged = out.components.entry(*kind).or_default();
            if merged.selector.is_empty() {
                merged.selector = blueprint.selector.clone();
            }
            merged.profiles.extend(blueprint.profiles.iter().cloned());
        }
    }

    out.metadata.page_type = labels
        .into_iter()
        .max_by(|a, b| a.1.0.cmp(&b.1.0).then_with(|| b.1.1.cmp(&a.1.1)))
        .map(|(label, _)| label.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let aggregator = FrequencyAggregator::new(config);
    aggregator.reduce_colors(&mut out.colors);
    aggregator.reduce_spacing(&mut out.spacing);
    aggregator.reduce_borders(&mut out.borders, &out.colors);
    aggregator.reduce_shadows(&mut out.shadows);
    out.typography.size_scale = typography::size_scale(&out.typography.size_histogram);

    Ok(out)
}

fn merge_semantic(target: &mut SemanticColors, source: &SemanticColors) {
    for (role, guess) in source.iter() {
        if let Some(slot) = target.slot_mut(role) {
            let replace = slot
                .as_ref()
                .is_none_or(|current| guess.confidence > current.confidence);
            if replace {
                *slot = Some(guess.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ComponentKind, SemanticColor};
    use proptest::prelude::*;

    fn record(source: &str, bg: &[(&str, u32)], spacing: &[(u32, u32)]) -> HarvestRecord {
        let mut record = HarvestRecord::default();
        record.metadata.source = source.to_string();
        record.metadata.sampled_elements = 10;
        record.colors.background = bg.iter().map(|(k, v)| (k.to_string(), *v)).collect();
        record.spacing.histogram = spacing.iter().copied().collect();
        record
    }

    fn guess(value: &str, confidence: f32, rule: &str) -> SemanticColor {
        SemanticColor {
            value: value.to_string(),
            confidence,
            rule: rule.to_string(),
            psychology: String::new(),
        }
    }

    #[test]
    fn test_merge_sums_and_recomputes() {
        let a = record("https://a.test/", &[("#FFFFFF", 1), ("#0064FA", 1)], &[(8, 1)]);
        let b = record("https://a.test/about", &[("#0064FA", 1), ("#F5F5F5", 4)], &[(8, 1), (16, 3)]);

        let merged = merge_records(&[a, b], &AggregateConfig::default()).unwrap();
        assert_eq!(merged.colors.background["#0064FA"], 2);
        assert_eq!(merged.colors.chromatic[0].hex, "#0064FA");
        assert_eq!(merged.spacing.histogram[&8], 2);
        // 8 reaches the repeat threshold only after the merge
        assert_eq!(merged.spacing.scale, vec![6, 8, 10, 14, 16]);
        assert_eq!(merged.metadata.sampled_elements, 20);
        assert_eq!(
            merged.metadata.sources,
            vec!["https://a.test/", "https://a.test/about"]
        );
        assert_eq!(merged.metadata.source, "https://a.test/");
    }

    #[test]
    fn test_merge_keeps_most_confident_guess() {
        let mut a = record("a", &[], &[]);
        a.colors.semantic.primary = Some(guess("#111111", 0.4, "most-frequent-chromatic"));
        let mut b = record("b", &[], &[]);
        b.colors.semantic.primary = Some(guess("#0064FA", 0.9, "button-background"));
        b.colors.semantic.success = Some(guess("#3BB346", 0.5, "hue-range"));

        let merged = merge_records(&[a, b], &AggregateConfig::default()).unwrap();
        assert_eq!(merged.colors.semantic.primary.unwrap().value, "#0064FA");
        assert_eq!(merged.colors.semantic.success.unwrap().value, "#3BB346");
    }

    #[test]
    fn test_merge_concatenates_profiles() {
        use crate::types::{ComponentBlueprint, StyleProfile, VariantGuess};
        let profile = StyleProfile {
            variant: VariantGuess::new("primary", 0.9, "class:primary"),
            classes: vec![],
            background: Some("#0064FA".into()),
            color: None,
            border_color: None,
            border_width_px: None,
            border_radius: None,
            padding: None,
            font_size_px: None,
            font_weight: None,
            height_px: None,
            box_shadow: None,
        };
        let mut a = record("a", &[], &[]);
        a.components.insert(
            ComponentKind::Button,
            ComponentBlueprint {
                selector: "button".into(),
                profiles: vec![profile.clone()],
            },
        );
        let mut b = a.clone();
        b.components.get_mut(&ComponentKind::Button).unwrap().selector = ".btn".into();

        let merged = merge_records(&[a, b], &AggregateConfig::default()).unwrap();
        let button = &merged.components[&ComponentKind::Button];
        assert_eq!(button.selector, "button");
        assert_eq!(button.profiles.len(), 2);
    }

    #[test]
    fn test_merge_page_type_majority() {
        let mut a = record("a", &[], &[]);
        a.metadata.page_type = "landing".into();
        let mut b = record("b", &[], &[]);
        b.metadata.page_type = "article".into();
        let mut c = record("c", &[], &[]);
        c.metadata.page_type = "article".into();
        let d = record("d", &[], &[]);

        let merged = merge_records(&[a, b, c, d], &AggregateConfig::default()).unwrap();
        assert_eq!(merged.metadata.page_type, "article");
    }

    #[test]
    fn test_merge_nothing_is_no_data() {
        let err = merge_records(&[], &AggregateConfig::default()).unwrap_err();
        assert!(err.is_no_data());
    }

    fn arb_record() -> impl Strategy<Value = HarvestRecord> {
        (
            prop::collection::btree_map(
                prop::sample::select(vec!["#FFFFFF", "#EEEEEE", "#888888", "#111111", "#0064FA", "#F93920"]),
                1u32..5,
                0..6,
            ),
            prop::collection::btree_map(0u32..64, 1u32..4, 0..8),
            prop::collection::btree_map(
                prop::sample::select(vec!["0 1px 2px #000", "0 4px 12px #000", "0 8px 30px #000"]),
                1u32..4,
                0..3,
            ),
        )
            .prop_map(|(bg, spacing, shadows)| {
                let mut record = HarvestRecord::default();
                record.colors.background = bg.into_iter().map(|(k, v)| (k.to_string(), v)).collect();
                record.spacing.histogram = spacing;
                record.shadows.histogram =
                    shadows.into_iter().map(|(k, v)| (k.to_string(), v)).collect();
                record
            })
    }

    proptest! {
        #[test]
        fn test_merge_totals_are_associative(a in arb_record(), b in arb_record(), c in arb_record()) {
            let config = AggregateConfig::default();
            let ab = merge_records(&[a.clone(), b.clone()], &config).unwrap();
            let nested = merge_records(&[ab, c.clone()], &config).unwrap();
            let flat = merge_records(&[a, b, c], &config).unwrap();

            prop_assert_eq!(&nested.colors.background, &flat.colors.background);
            prop_assert_eq!(&nested.spacing.histogram, &flat.spacing.histogram);
            prop_assert_eq!(&nested.shadows.histogram, &flat.shadows.histogram);
            prop_assert_eq!(&nested.colors.neutral_scale, &flat.colors.neutral_scale);
            prop_assert_eq!(&nested.spacing.scale, &flat.spacing.scale);
            prop_assert_eq!(&nested.shadows.buckets, &flat.shadows.buckets);
        }
    }
}
