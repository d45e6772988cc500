//! Design-system documents
//!
//! A Markdown write-up of a harvest record and its tokens, and a standalone
//! HTML page previewing every color token as a swatch.

use super::css::render_css;
use crate::tokens::vocabulary;
use crate::types::{HarvestRecord, TokenMap};

/// Chromatic colors listed in the palette table
const MAX_PALETTE: usize = 12;

pub fn render_markdown(record: &HarvestRecord, tokens: &TokenMap) -> String {
    let meta = &record.metadata;
    let title = meta.title.as_deref().unwrap_or(&meta.source);
    let mut out = String::new();

    out.push_str(&format!("# Design System: {}\n\n", title));
    let sources = if meta.sources.is_empty() {
        1
    } else {
        meta.sources.len()
    };
    out.push_str(&format!(
        "> Extracted from {} source(s){}. Page type: {}.\n\n",
        sources,
        meta.extracted_at
            .map(|t| format!(" on {}", t.format("%Y-%m-%d")))
            .unwrap_or_default(),
        meta.page_type
    ));
    if record.is_sparse() {
        out.push_str(
            "> **Sparse extraction.** Several sections could not be populated; \
             missing values mean \"not extracted\", not zero.\n\n",
        );
    }
    out.push_str(&format!(
        "- Elements: {} total, {} sampled, {} skipped\n",
        meta.total_elements, meta.sampled_elements, meta.skipped_elements
    ));
    for source in &meta.sources {
        out.push_str(&format!("- Source: {}\n", source));
    }
    out.push('\n');

    push_colors(&mut out, record);
    push_typography(&mut out, record);
    push_layout(&mut out, record);
    push_components(&mut out, record);

    out.push_str("## Tokens\n\n");
    if tokens.is_empty() {
        out.push_str("No tokens could be derived.\n");
    } else {
        out.push_str(&format!("{} tokens.\n\n```css\n", tokens.len()));
        out.push_str(&render_css(tokens));
        out.push_str("```\n");
    }
    out
}

fn push_colors(out: &mut String, record: &HarvestRecord) {
    let colors = &record.colors;
    out.push_str("## Colors\n\n### Semantic\n\n");

    let roles: Vec<_> = colors.semantic.iter().collect();
    if roles.is_empty() {
        out.push_str("No semantic colors identified.\n\n");
    } else {
        out.push_str("| Role | Value | Confidence | Rule | Notes |\n");
        out.push_str("|------|-------|------------|------|-------|\n");
        for (role, guess) in roles {
            out.push_str(&format!(
                "| {} | `{}` | {:.0}% | {} | {} |\n",
                role,
                guess.value,
                guess.confidence * 100.0,
                guess.rule,
                cell(&guess.psychology)
            ));
        }
        out.push('\n');
    }

    out.push_str("### Neutral Scale\n\n");
    if colors.neutral_scale.is_empty() {
        out.push_str("Fewer than three distinct neutrals were found.\n\n");
    } else {
        out.push_str("| Step | Value |\n|------|-------|\n");
        for (step, hex) in &colors.neutral_scale {
            out.push_str(&format!("| {} | `{}` |\n", step, hex));
        }
        out.push('\n');
    }

    if !colors.chromatic.is_empty() {
        out.push_str("### Palette\n\n| Color | Occurrences |\n|-------|-------------|\n");
        for color in colors.chromatic.iter().take(MAX_PALETTE) {
            out.push_str(&format!("| `{}` | {} |\n", color.hex, color.count));
        }
        out.push('\n');
    }
}

fn push_typography(out: &mut String, record: &HarvestRecord) {
    let typo = &record.typography;
    out.push_str("## Typography\n\n");
    if typo.body.is_none() && typo.headings.is_empty() {
        out.push_str("No typography extracted.\n\n");
        return;
    }

    out.push_str("| Level | Family | Size | Weight | Line height |\n");
    out.push_str("|-------|--------|------|--------|-------------|\n");
    let rows = typo
        .headings
        .iter()
        .map(|(level, spec)| (level.as_str(), spec))
        .chain(typo.body.as_ref().map(|spec| ("body", spec)));
    for (level, spec) in rows {
        out.push_str(&format!(
            "| {} | {} | {}px | {} | {} |\n",
            level,
            cell(&spec.family),
            spec.size_px,
            spec.weight,
            spec.line_height.as_deref().unwrap_or("-")
        ));
    }
    if !typo.size_scale.is_empty() {
        out.push_str(&format!("\nSize scale: {}\n", px_list(&typo.size_scale)));
    }
    out.push('\n');
}

fn push_layout(out: &mut String, record: &HarvestRecord) {
    out.push_str("## Spacing\n\n");
    if record.spacing.scale.is_empty() {
        out.push_str("No spacing scale emerged.\n\n");
    } else {
        out.push_str(&format!("{}\n\n", px_list(&record.spacing.scale)));
    }

    out.push_str("## Borders\n\n");
    for (step, value) in &record.borders.radius_scale {
        out.push_str(&format!("- Radius `{}`: `{}`\n", step, value));
    }
    if let Some(width) = &record.borders.dominant_width {
        out.push_str(&format!("- Width: `{}`\n", width));
    }
    if let Some(color) = &record.borders.dominant_color {
        out.push_str(&format!("- Color: `{}`\n", color));
    }
    out.push('\n');

    out.push_str("## Shadows\n\n");
    if record.shadows.buckets.is_empty() {
        out.push_str("No shadows extracted.\n\n");
    } else {
        out.push_str("| Bucket | Blur | Uses | Value |\n|--------|------|------|-------|\n");
        for (name, bucket) in &record.shadows.buckets {
            out.push_str(&format!(
                "| {} | {}px | {} | `{}` |\n",
                name,
                bucket.blur_px,
                bucket.count,
                cell(&bucket.value)
            ));
        }
        out.push('\n');
    }
}

fn push_components(out: &mut String, record: &HarvestRecord) {
    out.push_str("## Components\n\n");
    if record.components.is_empty() {
        out.push_str("No components detected.\n\n");
        return;
    }

    for (kind, blueprint) in &record.components {
        out.push_str(&format!(
            "### {} (`{}`)\n\n{} instance(s).\n\n",
            kind.pascal_name(),
            blueprint.selector,
            blueprint.profiles.len()
        ));
        out.push_str("| Variant | Instances | Confidence | Rule | Background | Text | Radius |\n");
        out.push_str("|---------|-----------|------------|------|------------|------|--------|\n");
        for (variant, profiles) in blueprint.variants() {
            let Some(first) = profiles.first() else {
                continue;
            };
            let confidence = profiles
                .iter()
                .map(|p| p.variant.confidence)
                .fold(0.0f32, f32::max);
            out.push_str(&format!(
                "| {} | {} | {:.0}% | {} | {} | {} | {} |\n",
                cell(variant),
                profiles.len(),
                confidence * 100.0,
                cell(&first.variant.rule),
                first.background.as_deref().unwrap_or("-"),
                first.color.as_deref().unwrap_or("-"),
                cell(first.border_radius.as_deref().unwrap_or("-"))
            ));
        }
        out.push('\n');
    }
}

fn px_list(values: &[u32]) -> String {
    values
        .iter()
        .map(|v| format!("`{}px`", v))
        .collect::<Vec<_>>()
        .join(", ")
}

fn cell(value: &str) -> String {
    value.replace('|', "\\|").replace('\n', " ")
}

// =============================================================================
// HTML Preview
// =============================================================================

pub fn render_html(record: &HarvestRecord, tokens: &TokenMap) -> String {
    let title = escape_html(
        record
            .metadata
            .title
            .as_deref()
            .unwrap_or(&record.metadata.source),
    );

    let mut out = String::from("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str(&format!("<title>{} tokens</title>\n<style>\n", title));
    out.push_str(&render_css(tokens));
    out.push_str(
        "body { font-family: system-ui, sans-serif; margin: 2rem; }\n\
         .grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(180px, 1fr)); gap: 1rem; }\n\
         .swatch { height: 64px; border-radius: 6px; border: 1px solid #0000001a; }\n\
         code { font-size: 12px; }\n",
    );
    out.push_str("</style>\n</head>\n<body>\n");
    out.push_str(&format!("<h1>{}</h1>\n", title));

    for category in super::css::CATEGORY_ORDER {
        let entries: Vec<(&str, &str)> = tokens
            .iter()
            .filter(|(name, _)| vocabulary::category(name) == category)
            .collect();
        if entries.is_empty() {
            continue;
        }
        out.push_str(&format!("<h2>{}</h2>\n<div class=\"grid\">\n", category));
        for (name, value) in entries {
            let property = tokens.css_property(name);
            let preview = if category == "color" {
                format!(
                    "<div class=\"swatch\" style=\"background: var({})\"></div>",
                    property
                )
            } else {
                String::new()
            };
            out.push_str(&format!(
                "<div>{}<code>{}</code><br><small>{}</small></div>\n",
                preview,
                escape_html(&property),
                escape_html(value)
            ));
        }
        out.push_str("</div>\n");
    }

    out.push_str("</body>\n</html>\n");
    out
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::harvest::Harvester;
    use crate::harvest::fixtures::landing_page;
    use crate::tokens::TokenMapper;

    fn landing() -> (HarvestRecord, TokenMap) {
        let config = Config::default();
        let record = Harvester::new(&config).harvest(&landing_page()).unwrap();
        let tokens = TokenMapper::new(&config.tokens).map(&record).unwrap();
        (record, tokens)
    }

    #[test]
    fn test_markdown_sections() {
        let (record, tokens) = landing();
        let md = render_markdown(&record, &tokens);

        assert!(md.starts_with("# Design System: Fixture\n"));
        assert!(md.contains("Page type: landing."));
        assert!(md.contains("| primary | `#0064FA` | 90% | button-background |"));
        assert!(md.contains("### Button (`button`)"));
        assert!(md.contains("| lg | 14px | 2 |"));
        assert!(md.contains("--semi-color-primary: #0064FA;"));
        assert!(!md.contains("Sparse extraction"));
    }

    #[test]
    fn test_markdown_empty_record() {
        let md = render_markdown(&HarvestRecord::default(), &TokenMap::default());
        assert!(md.contains("Sparse extraction"));
        assert!(md.contains("Fewer than three distinct neutrals were found."));
        assert!(md.contains("No components detected."));
        assert!(md.contains("No tokens could be derived."));
    }

    #[test]
    fn test_html_swatches() {
        let (record, tokens) = landing();
        let html = render_html(&record, &tokens);

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Fixture tokens</title>"));
        assert!(html.contains("style=\"background: var(--semi-color-primary)\""));
        assert!(html.contains("<h2>spacing</h2>"));
        assert!(html.ends_with("</html>\n"));
    }

    #[test]
    fn test_escaping() {
        assert_eq!(escape_html("<a href=\"x\">&</a>"), "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;");
        assert_eq!(cell("a|b\nc"), "a\\|b c");
    }
}
