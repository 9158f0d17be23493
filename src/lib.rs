//! Core library for rendering attendee badges onto packed print pages.

mod badge;
mod batch;
mod config;
mod designs;
mod graphics;
mod model;

pub use badge::{BadgeDesign, render_badge};
pub use batch::{
    BatchOptions, BatchReport, DEFAULT_PER_PAGE, GroupReport, chunk, filler_name, page_count,
    page_name, run_batch,
};
pub use config::{
    Alignment, ConfigError, DEFAULT_DPI, DEFAULT_LINE_SPACING, DEFAULT_MARGIN_MM,
    DEFAULT_PAGE_SIZE, DesignConfig, FieldSpec, FillerSpec, FontSpec, MAX_FILLER_PERCENT,
    MM_TO_INCH, PageSize, PageSpec, RenderConfig, mm_to_px, parse_color,
};
pub use designs::{
    BlankDesign, DesignInfo, DesignRegistry, DesignSetting, FieldsDesign, TextField,
};
pub use graphics::{
    BadgeFont, Placement, TextMeasure, TextUtils, assemble_page, draw_info, plan_page,
    wrap_text, write_page,
};
pub use model::{Attendee, Group, GroupSource, InputDocument, parse_input};

use std::path::Path;

use anyhow::Result;

/// Load groups from a JSON attendee document using `design`'s grouping.
pub fn load_groups(design: &dyn BadgeDesign, raw: &str, base_dir: &Path) -> Result<Vec<Group>> {
    let input = parse_input(raw)?;
    design.groups(input, base_dir)
}
