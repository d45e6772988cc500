//! Semantic Token Mapper
//!
//! Projects a harvest record onto the fixed token vocabulary. Tokens whose
//! source value was not extracted are left out of the map rather than
//! filled with placeholders.

use tracing::{debug, info, warn};

use super::shade::ShadeRules;
use super::vocabulary::{self, COLOR_ROLES, SPACING_NAMES};
use crate::config::TokensConfig;
use crate::types::{HarvestRecord, Result, Rgba, TokenMap};

/// Alphas applied to the darkest neutral for fill surfaces
const FILL_ALPHAS: [f32; 3] = [0.05, 0.09, 0.13];

/// Alphas applied to the darkest neutral for secondary text levels
const TEXT_ALPHAS: [f32; 3] = [0.8, 0.62, 0.35];

/// Maximum distance between a named spacing alias and the scale value it takes
const SPACING_ALIAS_TOLERANCE_PX: u32 = 4;

pub struct TokenMapper {
    prefix: String,
    shades: ShadeRules,
}

impl TokenMapper {
    pub fn new(config: &TokensConfig) -> Self {
        Self {
            prefix: config.prefix.clone(),
            shades: ShadeRules::from_config(config),
        }
    }

    pub fn map(&self, record: &HarvestRecord) -> Result<TokenMap> {
        let mut tokens = TokenMap::new(self.prefix.clone());

        self.map_colors(record, &mut tokens)?;
        map_borders(record, &mut tokens)?;
        map_spacing(record, &mut tokens)?;
        map_shadows(record, &mut tokens)?;
        map_typography(record, &mut tokens)?;

        if tokens.is_empty() {
            warn!(
                "No tokens could be derived from {}",
                record.metadata.source
            );
        } else {
            info!("Mapped {} tokens", tokens.len());
        }
        Ok(tokens)
    }

    fn map_colors(&self, record: &HarvestRecord, tokens: &mut TokenMap) -> Result<()> {
        let colors = &record.colors;

        for role in COLOR_ROLES {
            let Some(base) = colors.semantic.get(role).and_then(|s| Rgba::parse(&s.value)) else {
                debug!("No {} color extracted", role);
                continue;
            };
            for (suffix, color) in self.shades.ramp(base).states() {
                tokens.insert(&format!("color-{role}{suffix}"), color.to_string())?;
            }
        }

        for (step, hex) in &colors.neutral_scale {
            insert_keyed(tokens, &format!("color-grey-{step}"), hex.clone())?;
        }

        let neutral = |step: &str| colors.neutral_scale.get(step).cloned();
        let darkest_hex = neutral("9").or_else(|| colors.dominant_text.clone());
        let darkest = darkest_hex.as_deref().and_then(Rgba::parse);

        if let Some(bg) = neutral("0").or_else(|| colors.dominant_background.clone()) {
            tokens.insert("color-bg-0", bg)?;
        }
        for i in 1..5 {
            if let Some(hex) = neutral(&i.to_string()) {
                tokens.insert(&format!("color-bg-{i}"), hex)?;
            }
        }

        if let Some(text) = darkest_hex {
            tokens.insert("color-text-0", text)?;
        }
        if let Some(dark) = darkest {
            for (i, alpha) in FILL_ALPHAS.iter().enumerate() {
                tokens.insert(&format!("color-fill-{i}"), with_alpha(dark, *alpha))?;
            }
            for (i, alpha) in TEXT_ALPHAS.iter().enumerate() {
                tokens.insert(&format!("color-text-{}", i + 1), with_alpha(dark, *alpha))?;
            }
            tokens.insert("color-disabled-text", with_alpha(dark, TEXT_ALPHAS[2]))?;
        }

        if let Some(border) = record.borders.dominant_color.clone().or_else(|| neutral("2")) {
            tokens.insert("color-border", border.clone())?;
            tokens.insert("color-disabled-border", border)?;
        }
        if let Some(fill) = neutral("1") {
            tokens.insert("color-disabled-bg", fill)?;
        }
        if let Some(primary) = &colors.semantic.primary {
            tokens.insert("color-focus-border", primary.value.clone())?;
        }
        Ok(())
    }
}

/// Insert a token whose name comes from a key inside the record.
///
/// Records written by other versions may carry steps outside the
/// vocabulary; those are skipped so the rest of the map still comes out.
fn insert_keyed(tokens: &mut TokenMap, name: &str, value: String) -> Result<()> {
    if vocabulary::is_known(name) {
        tokens.insert(name, value)
    } else {
        warn!("Skipping '{}': not a known token name", name);
        Ok(())
    }
}

fn with_alpha(color: Rgba, alpha: f32) -> String {
    Rgba::rgba(color.r, color.g, color.b, alpha).to_string()
}

fn map_borders(record: &HarvestRecord, tokens: &mut TokenMap) -> Result<()> {
    for (step, value) in &record.borders.radius_scale {
        insert_keyed(tokens, &format!("border-radius-{step}"), value.clone())?;
    }
    if let Some(width) = &record.borders.dominant_width {
        tokens.insert("border-thickness", width.clone())?;
    }
    Ok(())
}

fn map_spacing(record: &HarvestRecord, tokens: &mut TokenMap) -> Result<()> {
    let scale = &record.spacing.scale;
    for value in scale {
        insert_keyed(tokens, &format!("spacing-{value}"), format!("{value}px"))?;
    }
    for (name, nominal) in SPACING_NAMES {
        let nearest = scale
            .iter()
            .copied()
            .filter(|v| v.abs_diff(nominal) <= SPACING_ALIAS_TOLERANCE_PX)
            .min_by_key(|v| (v.abs_diff(nominal), *v));
        if let Some(value) = nearest {
            tokens.insert(&format!("spacing-{name}"), format!("{value}px"))?;
        }
    }
    Ok(())
}

fn map_shadows(record: &HarvestRecord, tokens: &mut TokenMap) -> Result<()> {
    let buckets = &record.shadows.buckets;
    for (name, bucket) in buckets {
        insert_keyed(tokens, &format!("shadow-{name}"), bucket.value.clone())?;
    }
    if let Some(elevated) = buckets.get("md").or_else(|| buckets.get("lg")) {
        tokens.insert("shadow-elevated", elevated.value.clone())?;
    }
    Ok(())
}

fn map_typography(record: &HarvestRecord, tokens: &mut TokenMap) -> Result<()> {
    let typo = &record.typography;

    if let Some(body) = &typo.body {
        tokens.insert("font-family-regular", font_stack(&body.family))?;
        tokens.insert("font-size-regular", px(body.size_px))?;
        tokens.insert("font-weight-regular", body.weight.to_string())?;
        if let Some(line_height) = &body.line_height {
            tokens.insert("line-height-regular", line_height.clone())?;
        }

        let body_size = body.size_px.round() as u32;
        if let Some(small) = typo.size_scale.iter().copied().filter(|s| *s < body_size).max() {
            tokens.insert("font-size-small", format!("{small}px"))?;
        }
    }

    let heading_family = typo
        .headings
        .get("h1")
        .or_else(|| typo.headings.values().next());
    if let Some(heading) = heading_family {
        tokens.insert("font-family-heading", font_stack(&heading.family))?;
    }

    for (level, spec) in &typo.headings {
        if let Some(n) = level.strip_prefix('h') {
            insert_keyed(tokens, &format!("font-size-header-{n}"), px(spec.size_px))?;
        }
    }
    if let Some(bold) = typo.headings.values().map(|h| h.weight).max() {
        tokens.insert("font-weight-bold", bold.to_string())?;
    }
    Ok(())
}

fn px(value: f32) -> String {
    if value.fract() == 0.0 {
        format!("{}px", value as i64)
    } else {
        format!("{value}px")
    }
}

/// Families already holding a stack are kept as reported
fn font_stack(family: &str) -> String {
    if family.contains(',') {
        family.to_string()
    } else if family.contains(char::is_whitespace) {
        format!("\"{family}\", sans-serif")
    } else {
        format!("{family}, sans-serif")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::harvest::Harvester;
    use crate::harvest::fixtures::landing_page;
    use crate::tokens::vocabulary;
    use crate::types::{FontSpec, SemanticColor, ShadowBucket};

    fn landing_tokens() -> TokenMap {
        let config = Config::default();
        let record = Harvester::new(&config).harvest(&landing_page()).unwrap();
        TokenMapper::new(&config.tokens).map(&record).unwrap()
    }

    #[test]
    fn test_landing_page_tokens() {
        let tokens = landing_tokens();

        assert_eq!(tokens.prefix(), "semi");
        assert_eq!(tokens.get("color-primary"), Some("#0064FA"));
        assert_eq!(tokens.get("color-focus-border"), Some("#0064FA"));
        assert_eq!(tokens.get("color-bg-0"), Some("#FFFFFF"));
        assert_eq!(tokens.get("color-text-0"), Some("#1C1F23"));
        assert_eq!(tokens.get("border-radius-small"), Some("12px"));
        assert_eq!(tokens.get("border-thickness"), Some("1px"));
        assert_eq!(tokens.get("spacing-base"), Some("16px"));
        assert_eq!(tokens.get("spacing-tight"), Some("8px"));
        assert_eq!(tokens.get("spacing-24"), Some("24px"));
        assert_eq!(tokens.get("font-family-regular"), Some("Inter, sans-serif"));
        assert_eq!(tokens.get("font-size-regular"), Some("14px"));
        assert_eq!(tokens.get("font-size-header-1"), Some("32px"));
        assert_eq!(tokens.get("font-weight-bold"), Some("700"));
        assert_eq!(tokens.get("line-height-regular"), Some("20px"));
        assert_eq!(
            tokens.get("shadow-lg"),
            Some("0px 4px 14px rgba(0, 0, 0, 0.1)")
        );
        assert_eq!(tokens.get("shadow-elevated"), tokens.get("shadow-lg"));
    }

    #[test]
    fn test_every_name_is_in_vocabulary() {
        for (name, _) in landing_tokens().iter() {
            assert!(vocabulary::is_known(name), "{} is not a known token", name);
        }
    }

    #[test]
    fn test_empty_record_maps_to_empty() {
        let tokens = TokenMapper::new(&TokensConfig::default())
            .map(&HarvestRecord::default())
            .unwrap();
        assert!(tokens.is_empty());
    }

    #[test]
    fn test_neutral_derived_tokens() {
        let mut record = HarvestRecord::default();
        for (i, hex) in ["#FFFFFF", "#F9F9F9", "#E6E8EA", "#C6CACD", "#A7ABB0", "#888D92", "#6B7075", "#4F5358", "#35393D", "#1C1F23"]
            .iter()
            .enumerate()
        {
            record.colors.neutral_scale.insert(i.to_string(), hex.to_string());
        }

        let tokens = TokenMapper::new(&TokensConfig::default()).map(&record).unwrap();
        assert_eq!(tokens.get("color-grey-9"), Some("#1C1F23"));
        assert_eq!(tokens.get("color-bg-0"), Some("#FFFFFF"));
        assert_eq!(tokens.get("color-bg-4"), Some("#A7ABB0"));
        assert_eq!(tokens.get("color-border"), Some("#E6E8EA"));
        assert_eq!(tokens.get("color-fill-0"), Some("rgba(28, 31, 35, 0.05)"));
        assert_eq!(tokens.get("color-text-1"), Some("rgba(28, 31, 35, 0.8)"));
        assert_eq!(tokens.get("color-text-0"), Some("#1C1F23"));
    }

    #[test]
    fn test_spacing_aliases_pick_nearest() {
        let mut record = HarvestRecord::default();
        record.spacing.scale = vec![6, 14, 48];

        let tokens = TokenMapper::new(&TokensConfig::default()).map(&record).unwrap();
        // 4 and 8 both sit 2px from 6; 12 and 16 both sit 2px from 14
        assert_eq!(tokens.get("spacing-extra-tight"), Some("6px"));
        assert_eq!(tokens.get("spacing-tight"), Some("6px"));
        assert_eq!(tokens.get("spacing-base-tight"), Some("14px"));
        assert_eq!(tokens.get("spacing-base"), Some("14px"));
        assert!(!tokens.contains("spacing-loose"));
        assert!(!tokens.contains("spacing-super-loose"));
    }

    #[test]
    fn test_foreign_record_keys_are_skipped() {
        let mut record = HarvestRecord::default();
        record.borders.radius_scale.insert("small".into(), "6px".into());
        record.borders.radius_scale.insert("2xl".into(), "24px".into());
        record.spacing.scale = vec![7, 8];
        record.shadows.buckets.insert(
            "xxl".into(),
            ShadowBucket {
                value: "0 20px 60px #00000033".into(),
                blur_px: 60.0,
                count: 2,
            },
        );
        for level in ["h1", "h7"] {
            record.typography.headings.insert(
                level.into(),
                FontSpec {
                    family: "Inter".into(),
                    size_px: 32.0,
                    weight: 700,
                    line_height: None,
                },
            );
        }

        let tokens = TokenMapper::new(&TokensConfig::default()).map(&record).unwrap();
        assert_eq!(tokens.get("border-radius-small"), Some("6px"));
        assert_eq!(tokens.get("spacing-8"), Some("8px"));
        assert_eq!(tokens.get("font-size-header-1"), Some("32px"));
        assert!(!tokens.contains("border-radius-2xl"));
        assert!(!tokens.contains("spacing-7"));
        assert!(!tokens.contains("shadow-xxl"));
        assert!(!tokens.contains("font-size-header-7"));
        assert!(tokens.iter().all(|(name, _)| vocabulary::is_known(name)));
    }

    #[test]
    fn test_typography_and_shadow_details() {
        let mut record = HarvestRecord::default();
        record.typography.body = Some(FontSpec {
            family: "Open Sans".into(),
            size_px: 15.5,
            weight: 400,
            line_height: None,
        });
        record.typography.size_scale = vec![12, 13, 16, 20];
        record.shadows.buckets.insert(
            "md".into(),
            ShadowBucket {
                value: "0 4px 12px #0000001A".into(),
                blur_px: 12.0,
                count: 3,
            },
        );
        record.colors.semantic.success = Some(SemanticColor {
            value: "#3BB346".into(),
            confidence: 0.7,
            rule: "class-hint-text".into(),
            psychology: String::new(),
        });

        let tokens = TokenMapper::new(&TokensConfig::default()).map(&record).unwrap();
        assert_eq!(tokens.get("font-family-regular"), Some("\"Open Sans\", sans-serif"));
        assert_eq!(tokens.get("font-size-regular"), Some("15.5px"));
        assert_eq!(tokens.get("font-size-small"), Some("13px"));
        assert!(!tokens.contains("line-height-regular"));
        assert_eq!(tokens.get("shadow-elevated"), Some("0 4px 12px #0000001A"));
        assert_eq!(tokens.get("color-success"), Some("#3BB346"));
        assert!(tokens.contains("color-success-light-active"));
        assert!(!tokens.contains("color-focus-border"));
    }
}
