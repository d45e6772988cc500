//! CSS custom-property block

use crate::tokens::vocabulary;
use crate::types::TokenMap;

/// Category order inside the `:root` block
pub const CATEGORY_ORDER: [&str; 5] = ["color", "typography", "spacing", "border", "shadow"];

/// Render tokens as a single `:root` block, grouped by category
pub fn render_css(tokens: &TokenMap) -> String {
    let mut out = String::from(":root {\n");
    let mut first = true;

    for category in CATEGORY_ORDER {
        let mut entries = tokens
            .iter()
            .filter(|(name, _)| vocabulary::category(name) == category)
            .peekable();
        if entries.peek().is_none() {
            continue;
        }
        if !first {
            out.push('\n');
        }
        first = false;

        out.push_str(&format!("  /* {} */\n", category));
        for (name, value) in entries {
            out.push_str(&format!("  {}: {};\n", tokens.css_property(name), value));
        }
    }

    out.push_str("}\n");
    out
}
