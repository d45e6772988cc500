//! Semantic tokens: the fixed vocabulary, interaction shades and the
//! record-to-token mapper.

pub mod mapper;
pub mod shade;
pub mod vocabulary;

pub use mapper::TokenMapper;
pub use shade::{ShadeRamp, ShadeRules};
