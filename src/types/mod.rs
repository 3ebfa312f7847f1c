pub mod ids;
pub mod menu;
pub mod watermark;

pub use ids::*;
pub use menu::{Button, MatchRule, Menu};
pub use watermark::Watermark;
