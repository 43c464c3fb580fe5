//! Style resolution for script elements

pub mod font;
pub mod render_style;
pub mod sheet;

pub use font::FontMetrics;
pub use render_style::{PageFrame, PageSize, RenderStyle, TextAlign, DEFAULT_LINE_HEIGHT};
pub use sheet::{ScreenplayStylesheet, StyleProvider};
