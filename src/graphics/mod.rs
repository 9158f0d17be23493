//! Raster helpers: text layout, page imposition and TIFF output.

mod export;
mod page;
mod text;

pub use export::write_page;
pub use page::{Placement, assemble_page, plan_page};
pub use text::{BadgeFont, TextMeasure, TextUtils, draw_info, wrap_text};

#[cfg(test)]
pub(crate) use text::testing;
