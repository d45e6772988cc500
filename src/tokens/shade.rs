//! Interaction shades
//!
//! Hover and active darken the base in HSL lightness, the light tints move
//! lightness toward white, and disabled keeps the RGB channels with a
//! reduced alpha. Everything is a pure function of the base color.

use crate::config::TokensConfig;
use crate::types::Rgba;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadeRules {
    pub hover_shift: f64,
    pub active_shift: f64,
    pub disabled_alpha: f64,
    pub light_mix: [f64; 3],
}

impl ShadeRules {
    pub fn from_config(config: &TokensConfig) -> Self {
        Self {
            hover_shift: config.hover_shift,
            active_shift: config.active_shift,
            disabled_alpha: config.disabled_alpha,
            light_mix: config.light_mix,
        }
    }

    pub fn ramp(&self, base: Rgba) -> ShadeRamp {
        let hsl = base.to_hsl();
        let darken = |shift: f64| hsl.with_lightness(hsl.l - shift).to_rgba();
        let tint = |mix: f64| hsl.with_lightness(hsl.l + (1.0 - hsl.l) * mix).to_rgba();

        ShadeRamp {
            base,
            hover: darken(self.hover_shift),
            active: darken(self.active_shift),
            disabled: Rgba::rgba(
                base.r,
                base.g,
                base.b,
                (base.a as f64 * self.disabled_alpha) as f32,
            ),
            light_default: tint(self.light_mix[0]),
            light_hover: tint(self.light_mix[1]),
            light_active: tint(self.light_mix[2]),
        }
    }
}

impl Default for ShadeRules {
    fn default() -> Self {
        Self::from_config(&TokensConfig::default())
    }
}

/// A base color with its derived interaction states
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadeRamp {
    pub base: Rgba,
    pub hover: Rgba,
    pub active: Rgba,
    pub disabled: Rgba,
    pub light_default: Rgba,
    pub light_hover: Rgba,
    pub light_active: Rgba,
}

impl ShadeRamp {
    /// `(suffix, color)` pairs in vocabulary state order
    pub fn states(&self) -> [(&'static str, Rgba); 7] {
        [
            ("", self.base),
            ("-hover", self.hover),
            ("-active", self.active),
            ("-disabled", self.disabled),
            ("-light-default", self.light_default),
            ("-light-hover", self.light_hover),
            ("-light-active", self.light_active),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::vocabulary::COLOR_STATES;
    use proptest::prelude::*;

    #[test]
    fn test_primary_ramp() {
        let ramp = ShadeRules::default().ramp(Rgba::parse("#0064FA").unwrap());
        let base_l = ramp.base.to_hsl().l;

        assert!(ramp.hover.to_hsl().l < base_l);
        assert!(ramp.active.to_hsl().l < ramp.hover.to_hsl().l);
        assert_eq!(ramp.disabled.to_string(), "rgba(0, 100, 250, 0.4)");
        assert!(ramp.light_default.to_hsl().l > ramp.light_hover.to_hsl().l);
        assert!(ramp.light_active.to_hsl().l > base_l);
        assert!(ramp.hover.to_string().starts_with('#'));
    }

    #[test]
    fn test_black_cannot_darken() {
        let ramp = ShadeRules::default().ramp(Rgba::BLACK);
        assert_eq!(ramp.hover, Rgba::BLACK);
        assert_eq!(ramp.active, Rgba::BLACK);
        assert!(ramp.light_default.relative_luminance() > 0.5);
    }

    #[test]
    fn test_state_suffixes_match_vocabulary() {
        let ramp = ShadeRules::default().ramp(Rgba::WHITE);
        let suffixes: Vec<&str> = ramp.states().iter().map(|(s, _)| *s).collect();
        assert_eq!(suffixes, COLOR_STATES);
    }

    proptest! {
        #[test]
        fn test_ramp_is_monotonic(h in 0.0f64..360.0, s in 0.0f64..1.0, l in 0.2f64..0.8) {
            let base = crate::types::Hsl { h, s, l, a: 1.0 }.to_rgba();
            let ramp = ShadeRules::default().ramp(base);
            let lightness = |c: Rgba| c.to_hsl().l;

            prop_assert!(lightness(ramp.hover) < lightness(ramp.base));
            prop_assert!(lightness(ramp.active) < lightness(ramp.hover));
            prop_assert!(lightness(ramp.light_active) > lightness(ramp.base));
            prop_assert!(lightness(ramp.light_hover) > lightness(ramp.light_active));
            prop_assert!(lightness(ramp.light_default) > lightness(ramp.light_hover));

            prop_assert_eq!((ramp.disabled.r, ramp.disabled.g, ramp.disabled.b), (base.r, base.g, base.b));
            prop_assert!(ramp.disabled.a < base.a);

            for (_, color) in ramp.states() {
                prop_assert!(Rgba::parse(&color.to_string()).is_some());
            }
        }
    }
}
