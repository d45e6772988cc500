//! React Component Generator
//!
//! One TSX file per component kind. Styles reference token custom
//! properties through `var(...)` and are only emitted for tokens present in
//! the map. Variants seen on the page but unknown to the template are added
//! with the literal values of their first harvested profile.
//!
//! Generated source is run through [`super::syntax`] before it is returned.

use std::str::FromStr;

use tracing::debug;

use super::syntax::validate_tsx;
use crate::config::CodegenConfig;
use crate::types::{
    ComponentBlueprint, ComponentKind, HarvestError, HarvestRecord, Result, StyleProfile, TokenMap,
};

#[derive(Debug, Clone, Copy)]
enum Style {
    /// Emitted as `var(--prefix-token)` when the token exists
    Token(&'static str),
    /// Emitted verbatim
    Value(&'static str),
}

use Style::{Token, Value};

type Decls = &'static [(&'static str, Style)];

struct Template {
    element: &'static str,
    /// Extra JSX attributes, written after the tag name
    fixed_attrs: &'static str,
    props_base: &'static str,
    self_closing: bool,
    base: Decls,
    /// First entry is the default variant
    variants: &'static [(&'static str, Decls)],
}

const FIELD_BASE: Decls = &[
    ("fontFamily", Token("font-family-regular")),
    ("fontSize", Token("font-size-regular")),
    ("color", Token("color-text-0")),
    ("borderRadius", Token("border-radius-small")),
    ("paddingTop", Token("spacing-extra-tight")),
    ("paddingBottom", Token("spacing-extra-tight")),
    ("paddingLeft", Token("spacing-base-tight")),
    ("paddingRight", Token("spacing-base-tight")),
    ("borderWidth", Token("border-thickness")),
    ("borderStyle", Value("solid")),
    ("borderColor", Token("color-border")),
];

const FIELD_VARIANTS: &[(&str, Decls)] = &[
    ("outlined", &[("backgroundColor", Token("color-bg-0"))]),
    (
        "filled",
        &[
            ("backgroundColor", Token("color-fill-0")),
            ("borderColor", Value("transparent")),
        ],
    ),
    ("error", &[("borderColor", Token("color-danger"))]),
    ("borderless", &[("borderColor", Value("transparent"))]),
];

const STATUS_VARIANTS: &[(&str, Decls)] = &[
    (
        "default",
        &[
            ("backgroundColor", Token("color-fill-0")),
            ("color", Token("color-text-0")),
        ],
    ),
    (
        "success",
        &[
            ("backgroundColor", Token("color-success-light-default")),
            ("color", Token("color-success")),
        ],
    ),
    (
        "warning",
        &[
            ("backgroundColor", Token("color-warning-light-default")),
            ("color", Token("color-warning")),
        ],
    ),
    (
        "danger",
        &[
            ("backgroundColor", Token("color-danger-light-default")),
            ("color", Token("color-danger")),
        ],
    ),
    (
        "info",
        &[
            ("backgroundColor", Token("color-info-light-default")),
            ("color", Token("color-info")),
        ],
    ),
];

fn template_for(kind: ComponentKind) -> Template {
    match kind {
        ComponentKind::Button => Template {
            element: "button",
            fixed_attrs: "",
            props_base: "React.ButtonHTMLAttributes<HTMLButtonElement>",
            self_closing: false,
            base: &[
                ("display", Value("inline-flex")),
                ("alignItems", Value("center")),
                ("justifyContent", Value("center")),
                ("fontFamily", Token("font-family-regular")),
                ("fontSize", Token("font-size-regular")),
                ("fontWeight", Token("font-weight-bold")),
                ("borderRadius", Token("border-radius-small")),
                ("paddingTop", Token("spacing-tight")),
                ("paddingBottom", Token("spacing-tight")),
                ("paddingLeft", Token("spacing-base")),
                ("paddingRight", Token("spacing-base")),
                ("borderWidth", Token("border-thickness")),
                ("borderStyle", Value("solid")),
                ("borderColor", Value("transparent")),
                ("cursor", Value("pointer")),
            ],
            variants: &[
                (
                    "primary",
                    &[
                        ("backgroundColor", Token("color-primary")),
                        ("color", Value("#FFFFFF")),
                    ],
                ),
                (
                    "secondary",
                    &[
                        ("backgroundColor", Token("color-primary-light-default")),
                        ("color", Token("color-primary")),
                    ],
                ),
                (
                    "tertiary",
                    &[
                        ("backgroundColor", Token("color-fill-0")),
                        ("color", Token("color-text-1")),
                    ],
                ),
                (
                    "outline",
                    &[
                        ("backgroundColor", Value("transparent")),
                        ("borderColor", Token("color-primary")),
                        ("color", Token("color-primary")),
                    ],
                ),
                (
                    "ghost",
                    &[
                        ("backgroundColor", Value("transparent")),
                        ("color", Token("color-primary")),
                    ],
                ),
                (
                    "danger",
                    &[
                        ("backgroundColor", Token("color-danger")),
                        ("color", Value("#FFFFFF")),
                    ],
                ),
                (
                    "link",
                    &[
                        ("backgroundColor", Value("transparent")),
                        ("color", Token("color-link")),
                    ],
                ),
            ],
        },
        ComponentKind::Input => Template {
            element: "input",
            fixed_attrs: "",
            props_base: "React.InputHTMLAttributes<HTMLInputElement>",
            self_closing: true,
            base: FIELD_BASE,
            variants: FIELD_VARIANTS,
        },
        ComponentKind::Select => Template {
            element: "select",
            fixed_attrs: "",
            props_base: "React.SelectHTMLAttributes<HTMLSelectElement>",
            self_closing: false,
            base: FIELD_BASE,
            variants: FIELD_VARIANTS,
        },
        ComponentKind::Checkbox => Template {
            element: "input",
            fixed_attrs: " type=\"checkbox\"",
            props_base: "Omit<React.InputHTMLAttributes<HTMLInputElement>, 'type'>",
            self_closing: true,
            base: &[
                ("accentColor", Token("color-primary")),
                ("cursor", Value("pointer")),
            ],
            variants: &[
                ("default", &[]),
                (
                    "card",
                    &[
                        ("padding", Token("spacing-base-tight")),
                        ("borderRadius", Token("border-radius-medium")),
                        ("backgroundColor", Token("color-fill-0")),
                    ],
                ),
            ],
        },
        ComponentKind::Card => Template {
            element: "div",
            fixed_attrs: "",
            props_base: "React.HTMLAttributes<HTMLDivElement>",
            self_closing: false,
            base: &[
                ("backgroundColor", Token("color-bg-0")),
                ("color", Token("color-text-0")),
                ("borderRadius", Token("border-radius-medium")),
                ("padding", Token("spacing-loose")),
            ],
            variants: &[
                ("default", &[]),
                ("elevated", &[("boxShadow", Token("shadow-elevated"))]),
                (
                    "outlined",
                    &[
                        ("borderWidth", Token("border-thickness")),
                        ("borderStyle", Value("solid")),
                        ("borderColor", Token("color-border")),
                    ],
                ),
            ],
        },
        ComponentKind::Table => Template {
            element: "table",
            fixed_attrs: "",
            props_base: "React.TableHTMLAttributes<HTMLTableElement>",
            self_closing: false,
            base: &[
                ("width", Value("100%")),
                ("borderCollapse", Value("collapse")),
                ("color", Token("color-text-0")),
                ("fontFamily", Token("font-family-regular")),
                ("fontSize", Token("font-size-regular")),
            ],
            variants: &[
                ("default", &[]),
                ("striped", &[("backgroundColor", Token("color-fill-0"))]),
                (
                    "bordered",
                    &[
                        ("borderWidth", Token("border-thickness")),
                        ("borderStyle", Value("solid")),
                        ("borderColor", Token("color-border")),
                    ],
                ),
                ("compact", &[("fontSize", Token("font-size-small"))]),
            ],
        },
        ComponentKind::Navigation => Template {
            element: "nav",
            fixed_attrs: "",
            props_base: "React.HTMLAttributes<HTMLElement>",
            self_closing: false,
            base: &[
                ("display", Value("flex")),
                ("gap", Token("spacing-base")),
                ("padding", Token("spacing-base-tight")),
                ("backgroundColor", Token("color-bg-0")),
                ("fontFamily", Token("font-family-regular")),
            ],
            variants: &[
                ("horizontal", &[("flexDirection", Value("row"))]),
                ("vertical", &[("flexDirection", Value("column"))]),
                (
                    "inverted",
                    &[
                        ("backgroundColor", Token("color-primary")),
                        ("color", Value("#FFFFFF")),
                    ],
                ),
            ],
        },
        ComponentKind::Tabs => Template {
            element: "div",
            fixed_attrs: " role=\"tablist\"",
            props_base: "React.HTMLAttributes<HTMLDivElement>",
            self_closing: false,
            base: &[
                ("display", Value("flex")),
                ("gap", Token("spacing-loose")),
                ("fontFamily", Token("font-family-regular")),
                ("fontSize", Token("font-size-regular")),
            ],
            variants: &[
                (
                    "line",
                    &[
                        ("borderBottomWidth", Token("border-thickness")),
                        ("borderBottomStyle", Value("solid")),
                        ("borderBottomColor", Token("color-border")),
                    ],
                ),
                (
                    "card",
                    &[
                        ("backgroundColor", Token("color-fill-0")),
                        ("borderRadius", Token("border-radius-small")),
                    ],
                ),
                ("button", &[("gap", Token("spacing-tight"))]),
            ],
        },
        ComponentKind::Tag => Template {
            element: "span",
            fixed_attrs: "",
            props_base: "React.HTMLAttributes<HTMLSpanElement>",
            self_closing: false,
            base: &[
                ("display", Value("inline-flex")),
                ("alignItems", Value("center")),
                ("fontSize", Token("font-size-small")),
                ("borderRadius", Token("border-radius-full")),
                ("paddingTop", Token("spacing-super-tight")),
                ("paddingBottom", Token("spacing-super-tight")),
                ("paddingLeft", Token("spacing-tight")),
                ("paddingRight", Token("spacing-tight")),
            ],
            variants: STATUS_VARIANTS,
        },
        ComponentKind::Alert => Template {
            element: "div",
            fixed_attrs: " role=\"alert\"",
            props_base: "React.HTMLAttributes<HTMLDivElement>",
            self_closing: false,
            base: &[
                ("borderRadius", Token("border-radius-small")),
                ("paddingTop", Token("spacing-base-tight")),
                ("paddingBottom", Token("spacing-base-tight")),
                ("paddingLeft", Token("spacing-base")),
                ("paddingRight", Token("spacing-base")),
                ("fontFamily", Token("font-family-regular")),
                ("fontSize", Token("font-size-regular")),
            ],
            variants: STATUS_VARIANTS,
        },
        ComponentKind::Modal => Template {
            element: "div",
            fixed_attrs: " role=\"dialog\" aria-modal=\"true\"",
            props_base: "React.HTMLAttributes<HTMLDivElement>",
            self_closing: false,
            base: &[
                ("backgroundColor", Token("color-bg-0")),
                ("color", Token("color-text-0")),
                ("borderRadius", Token("border-radius-large")),
                ("padding", Token("spacing-loose")),
                ("boxShadow", Token("shadow-elevated")),
                ("fontFamily", Token("font-family-regular")),
                ("lineHeight", Token("line-height-regular")),
            ],
            variants: &[
                ("default", &[]),
                (
                    "fullscreen",
                    &[
                        ("width", Value("100vw")),
                        ("height", Value("100vh")),
                        ("borderRadius", Value("0")),
                    ],
                ),
                (
                    "drawer",
                    &[("height", Value("100vh")), ("borderRadius", Value("0"))],
                ),
            ],
        },
    }
}

/// A generated component source file
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedComponent {
    pub kind: ComponentKind,
    /// Exported identifier, e.g. `UiButton`
    pub name: String,
    pub file_name: String,
    pub source: String,
}

pub struct ComponentGenerator {
    prefix: String,
    validate: bool,
}

impl ComponentGenerator {
    pub fn new(config: &CodegenConfig) -> Self {
        Self {
            prefix: config.component_prefix.clone(),
            validate: config.validate_syntax,
        }
    }

    pub fn component_name(&self, kind: ComponentKind) -> String {
        format!("{}{}", self.prefix, kind.pascal_name())
    }

    pub fn generate(
        &self,
        kind: ComponentKind,
        tokens: &TokenMap,
        blueprint: Option<&ComponentBlueprint>,
    ) -> Result<GeneratedComponent> {
        let name = self.component_name(kind);
        let source = render_component(&name, &template_for(kind), tokens, blueprint);
        if self.validate {
            validate_tsx(kind.as_str(), &source)?;
        }
        debug!("Generated {} ({} bytes)", name, source.len());

        Ok(GeneratedComponent {
            kind,
            file_name: format!("{}.tsx", name),
            name,
            source,
        })
    }

    /// Components for every kind detected in the record, or every kind when
    /// `all` is set
    pub fn generate_for_record(
        &self,
        tokens: &TokenMap,
        record: &HarvestRecord,
        all: bool,
    ) -> Result<Vec<GeneratedComponent>> {
        let kinds: Vec<ComponentKind> = if all {
            ComponentKind::ALL.to_vec()
        } else {
            record.components.keys().copied().collect()
        };
        kinds
            .into_iter()
            .map(|kind| self.generate(kind, tokens, record.components.get(&kind)))
            .collect()
    }

    /// `index.ts` re-exporting every generated component
    pub fn render_index(&self, components: &[GeneratedComponent]) -> Result<String> {
        let mut out = String::new();
        for component in components {
            let name = &component.name;
            out.push_str(&format!("export {{ {name} }} from './{name}';\n"));
            out.push_str(&format!(
                "export type {{ {name}Props, {name}Variant }} from './{name}';\n"
            ));
        }
        if self.validate {
            validate_tsx("index", &out)?;
        }
        Ok(out)
    }
}

/// Generate one component with the default codegen settings
pub fn generate_component(kind: &str, tokens: &TokenMap) -> Result<String> {
    let kind = ComponentKind::from_str(kind).map_err(HarvestError::UnknownComponent)?;
    ComponentGenerator::new(&CodegenConfig::default())
        .generate(kind, tokens, None)
        .map(|c| c.source)
}

fn render_component(
    name: &str,
    template: &Template,
    tokens: &TokenMap,
    blueprint: Option<&ComponentBlueprint>,
) -> String {
    let mut variants: Vec<(String, Vec<(String, String)>)> = template
        .variants
        .iter()
        .map(|(variant, decls)| (variant.to_string(), resolve(decls, tokens)))
        .collect();

    if let Some(blueprint) = blueprint {
        for (variant, profiles) in blueprint.variants() {
            if variants.iter().any(|(v, _)| v == variant) {
                continue;
            }
            if let Some(profile) = profiles.first() {
                variants.push((variant.to_string(), profile_decls(profile)));
            }
        }
    }

    let default_variant = quote(&variants[0].0);
    let union = variants
        .iter()
        .map(|(v, _)| quote(v))
        .collect::<Vec<_>>()
        .join(" | ");

    let mut out = String::from("import React from 'react';\n\n");
    out.push_str(&format!("export type {name}Variant = {union};\n\n"));
    out.push_str(&format!(
        "export interface {name}Props extends {} {{\n  variant?: {name}Variant;\n}}\n\n",
        template.props_base
    ));

    out.push_str("const baseStyle: React.CSSProperties = ");
    push_object(&mut out, &resolve(template.base, tokens), 0);
    out.push_str(";\n\n");

    out.push_str(&format!(
        "const variantStyles: Record<{name}Variant, React.CSSProperties> = {{\n"
    ));
    for (variant, decls) in &variants {
        out.push_str(&format!("  {}: ", quote(variant)));
        push_object(&mut out, decls, 1);
        out.push_str(",\n");
    }
    out.push_str("};\n\n");

    let element = template.element;
    let attrs = template.fixed_attrs;
    if template.self_closing {
        out.push_str(&format!(
            "export function {name}({{ variant = {default_variant}, style, ...rest }}: {name}Props) {{\n"
        ));
        out.push_str("  const merged = { ...baseStyle, ...variantStyles[variant], ...style };\n");
        out.push_str(&format!(
            "  return <{element}{attrs} style={{merged}} {{...rest}} />;\n"
        ));
    } else {
        out.push_str(&format!(
            "export function {name}({{ variant = {default_variant}, style, children, ...rest }}: {name}Props) {{\n"
        ));
        out.push_str("  const merged = { ...baseStyle, ...variantStyles[variant], ...style };\n");
        out.push_str("  return (\n");
        out.push_str(&format!(
            "    <{element}{attrs} style={{merged}} {{...rest}}>\n"
        ));
        out.push_str("      {children}\n");
        out.push_str(&format!("    </{element}>\n"));
        out.push_str("  );\n");
    }
    out.push_str("}\n\n");
    out.push_str(&format!("export default {name};\n"));
    out
}

fn resolve(decls: Decls, tokens: &TokenMap) -> Vec<(String, String)> {
    decls
        .iter()
        .filter_map(|(property, style)| match style {
            Token(name) if tokens.contains(name) => {
                Some((property.to_string(), tokens.css_var(name)))
            }
            Token(_) => None,
            Value(value) => Some((property.to_string(), value.to_string())),
        })
        .collect()
}

fn profile_decls(profile: &StyleProfile) -> Vec<(String, String)> {
    let mut decls = Vec::new();
    let mut push = |property: &str, value: Option<String>| {
        if let Some(value) = value {
            decls.push((property.to_string(), value));
        }
    };
    push("backgroundColor", profile.background.clone());
    push("color", profile.color.clone());
    if profile.border_color.is_some() {
        push("borderStyle", Some("solid".to_string()));
        push("borderWidth", profile.border_width_px.map(|w| format!("{}px", w)));
        push("borderColor", profile.border_color.clone());
    }
    push("borderRadius", profile.border_radius.clone());
    push("padding", profile.padding.clone());
    push("fontSize", profile.font_size_px.map(|s| format!("{}px", s)));
    push("fontWeight", profile.font_weight.map(|w| w.to_string()));
    push("boxShadow", profile.box_shadow.clone());
    decls
}

fn push_object(out: &mut String, decls: &[(String, String)], depth: usize) {
    if decls.is_empty() {
        out.push_str("{}");
        return;
    }
    let indent = "  ".repeat(depth);
    out.push_str("{\n");
    for (property, value) in decls {
        out.push_str(&format!("{indent}  {property}: {},\n", quote(value)));
    }
    out.push_str(&format!("{indent}}}"));
}

/// Single-quoted TS string literal
fn quote(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('\n', "\\n")
        .replace('\r', "");
    format!("'{}'", escaped)
}
