//! Global Constants
//!
//! Centralized constants for extraction and token tuning.
//! All magic numbers should be defined here with documentation.

/// Style sampling constants
pub mod sampler {
    /// Maximum number of elements inspected per page before stride subsampling
    pub const DEFAULT_MAX_ELEMENTS: usize = 1500;

    /// Selector used to enumerate every element on the page
    pub const ALL_ELEMENTS: &str = "*";

    /// Tags that never contribute visual styles
    pub const NON_VISUAL_TAGS: [&str; 9] = [
        "head", "meta", "link", "script", "style", "title", "noscript", "template", "br",
    ];
}

/// Frequency aggregation constants
pub mod aggregate {
    /// Colors seen fewer times than this are treated as noise
    pub const DEFAULT_MIN_COLOR_OCCURRENCES: u32 = 2;

    /// Maximum channel spread (0-255) for a color to count as neutral
    pub const DEFAULT_NEUTRAL_TOLERANCE: u8 = 12;

    /// Distinct neutrals required before the neutral ramp is built
    pub const MIN_DISTINCT_NEUTRALS: usize = 3;

    /// Spacing values repeated fewer times than this are ignored
    pub const DEFAULT_MIN_SPACING_REPEATS: u32 = 2;

    /// Distance in px within which an observed value snaps to a ladder step
    pub const DEFAULT_SPACING_TOLERANCE_PX: u32 = 2;

    /// Canonical spacing ladder observed values are matched against
    pub const SPACING_LADDER: [u32; 19] = [
        2, 4, 6, 8, 10, 12, 14, 16, 20, 24, 28, 32, 40, 48, 56, 64, 72, 80, 96,
    ];

    /// Maximum number of shadows kept after frequency ranking
    pub const DEFAULT_MAX_SHADOW_BUCKETS: usize = 5;

    /// Upper blur radius bounds (px) for the `sm`, `md` and `lg` shadow buckets
    pub const SHADOW_BLUR_BOUNDS: [(&str, f32); 3] = [("sm", 4.0), ("md", 12.0), ("lg", 24.0)];

    /// Bucket for shadows blurrier than every bound
    pub const SHADOW_BLUR_OVERFLOW: &str = "xl";

    /// Pixel radius at or above which a radius is treated as a pill
    pub const FULL_RADIUS_PX: f32 = 999.0;

    /// Named radius steps assigned in ascending order
    pub const RADIUS_STEPS: [&str; 4] = ["extra-small", "small", "medium", "large"];

    /// Font sizes repeated fewer times than this stay out of the size scale
    pub const MIN_FONT_SIZE_REPEATS: u32 = 2;

    /// Maximum number of entries in the font size scale
    pub const MAX_FONT_SCALE: usize = 10;
}

/// Component classification constants
pub mod classifier {
    /// Instances sampled per component type
    pub const DEFAULT_MAX_INSTANCES: usize = 10;

    /// Confidence for a variant inferred from a class-name fragment
    pub const CLASS_HINT_CONFIDENCE: f32 = 0.8;

    /// Confidence for a variant inferred from computed-style rules
    pub const STYLE_RULE_CONFIDENCE: f32 = 0.5;

    /// Confidence when no rule matched and the variant is `default`
    pub const DEFAULT_VARIANT_CONFIDENCE: f32 = 0.2;

    /// Luminance at or above which a neutral background counts as light
    pub const LIGHT_BACKGROUND_LUMINANCE: f64 = 0.6;
}

/// Token derivation constants
pub mod tokens {
    /// Default CSS custom-property prefix
    pub const DEFAULT_PREFIX: &str = "semi";

    /// Absolute lightness drop for hover
    pub const DEFAULT_HOVER_SHIFT: f64 = 0.08;

    /// Absolute lightness drop for active
    pub const DEFAULT_ACTIVE_SHIFT: f64 = 0.16;

    /// Alpha applied to disabled colors
    pub const DEFAULT_DISABLED_ALPHA: f64 = 0.4;

    /// Fraction of the remaining distance to white for light tints
    /// (default, hover, active); larger is lighter
    pub const DEFAULT_LIGHT_MIX: [f64; 3] = [0.88, 0.8, 0.72];
}

/// Code generation constants
pub mod codegen {
    /// Default prefix for generated component names
    pub const DEFAULT_COMPONENT_PREFIX: &str = "Ui";
}

/// Renderer constants
pub mod renderer {
    /// Default render timeout
    pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

    /// Placeholder substituted with the target URL in renderer args
    pub const URL_PLACEHOLDER: &str = "{url}";
}
