//! Flat JSON token object

use serde_json::{Map, Value};

use crate::types::{Result, TokenMap};

/// `{ "--prefix-name": "value", ... }` in name order
pub fn render_json(tokens: &TokenMap) -> Result<String> {
    let object: Map<String, Value> = tokens
        .iter()
        .map(|(name, value)| (tokens.css_property(name), Value::String(value.to_string())))
        .collect();
    let mut out = serde_json::to_string_pretty(&Value::Object(object))?;
    out.push('\n');
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::css::render_css;

    #[test]
    fn test_json_matches_css() {
        let tokens = TokenMap::from_entries(
            "acme",
            [("color-primary", "#0064FA"), ("border-radius-small", "4px")],
        )
        .unwrap();

        let json = render_json(&tokens).unwrap();
        let parsed: Map<String, Value> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed["--acme-color-primary"], "#0064FA");

        let css = render_css(&tokens);
        for (key, value) in &parsed {
            assert!(css.contains(&format!("{}: {};", key, value.as_str().unwrap())));
        }
    }
}
