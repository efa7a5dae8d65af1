//! HTML rendering for the chart page.

pub mod content;
pub mod page;

pub use content::{ContentKind, ContentRenderer};
pub use page::render_chart_page;
