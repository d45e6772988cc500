//! Emitters
//!
//! Pure renderers from a token map (and, for documents, the harvest record)
//! to text. Writing files is left to the caller.

pub mod component;
pub mod css;
pub mod json;
pub mod report;
pub mod syntax;

pub use component::{ComponentGenerator, GeneratedComponent, generate_component};
pub use css::render_css;
pub use json::render_json;
pub use report::{render_html, render_markdown};
pub use syntax::{check_tsx, validate_tsx};
