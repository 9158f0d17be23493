//! Batch driver: groups in, TIFF pages out.

use std::path::{Path, PathBuf};

use anyhow::Result;
use log::{debug, info};

use crate::badge::{BadgeDesign, render_badge};
use crate::config::{Alignment, ConfigError, FillerSpec, RenderConfig};
use crate::graphics::{TextUtils, assemble_page, write_page};
use crate::model::Group;

pub const DEFAULT_PER_PAGE: usize = 9;

/// Per-run knobs that are not page geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchOptions {
    pub per_page: usize,
    pub resize: Option<f64>,
    pub fillers: FillerSpec,
    pub align: Alignment,
    pub mirror_x: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            per_page: DEFAULT_PER_PAGE,
            resize: None,
            fillers: FillerSpec::default(),
            align: Alignment::Left,
            mirror_x: false,
        }
    }
}

impl BatchOptions {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.per_page == 0 {
            return Err(ConfigError::PerPage);
        }
        if let Some(factor) = self.resize {
            if !factor.is_finite() || factor <= 0.0 {
                return Err(ConfigError::Resize(factor));
            }
        }
        Ok(())
    }
}

/// Split `items` into consecutive blocks of `size`; the last block holds
/// the remainder. `size` must be non-zero.
pub fn chunk<T>(items: &[T], size: usize) -> Vec<&[T]> {
    items.chunks(size).collect()
}

/// Pages needed for `attendees` badges at `per_page` badges per page.
pub fn page_count(attendees: usize, per_page: usize) -> usize {
    attendees.div_ceil(per_page)
}

/// File name of a data page (1-based `index`).
pub fn page_name(group: &str, index: usize, total: usize) -> String {
    format!("[{group}] pag {index:02}-{total:02}.tif")
}

/// File name of a blank filler page (1-based `index`).
pub fn filler_name(group: &str, index: usize, total: usize) -> String {
    format!("[{group}][vuoti] pag {index:02}-{total:02}.tif")
}

/// Pages written for one group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupReport {
    pub group: String,
    pub attendees: usize,
    pub data_pages: Vec<PathBuf>,
    pub filler_pages: Vec<PathBuf>,
}

/// Summary of a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub groups: Vec<GroupReport>,
}

impl BatchReport {
    pub fn total_pages(&self) -> usize {
        self.groups
            .iter()
            .map(|g| g.data_pages.len() + g.filler_pages.len())
            .sum()
    }
}

/// Render every group into pages under `output_dir`, in group name order.
///
/// Filler pages are always left aligned and never mirrored.
pub fn run_batch(
    mut groups: Vec<Group>,
    design: &dyn BadgeDesign,
    config: &RenderConfig,
    options: &BatchOptions,
    output_dir: &Path,
) -> Result<BatchReport> {
    options.validate()?;
    groups.sort_by(|a, b| a.name.cmp(&b.name));
    let utils = TextUtils::default();
    let mut report = BatchReport::default();

    for group in &groups {
        let pages = page_count(group.attendees.len(), options.per_page);
        info!(
            "group '{}': {} attendee(s) on {} page(s) with design '{}'",
            group.name,
            group.attendees.len(),
            pages,
            design.name()
        );
        let mut group_report = GroupReport {
            group: group.name.clone(),
            attendees: group.attendees.len(),
            ..GroupReport::default()
        };

        for (idx, block) in chunk(&group.attendees, options.per_page)
            .into_iter()
            .enumerate()
        {
            let badges = block
                .iter()
                .map(|attendee| {
                    debug!("rendering badge {:?}", attendee.0);
                    render_badge(design, &group.template, Some(attendee), &utils, options.resize)
                })
                .collect::<Result<Vec<_>>>()?;
            let page = assemble_page(&badges, config, options.align, options.mirror_x);
            let name = page_name(&group.name, idx + 1, pages);
            info!("{name}");
            let path = output_dir.join(&name);
            write_page(&page, config.dpi, &path)?;
            group_report.data_pages.push(path);
        }

        let fillers = options.fillers.count(pages);
        if fillers > 0 {
            let blank = render_badge(design, &group.template, None, &utils, options.resize)?;
            let badges = vec![blank; options.per_page];
            let page = assemble_page(&badges, config, Alignment::Left, false);
            for idx in 0..fillers {
                let name = filler_name(&group.name, idx + 1, fillers);
                info!("{name}");
                let path = output_dir.join(&name);
                write_page(&page, config.dpi, &path)?;
                group_report.filler_pages.push(path);
            }
        }
        report.groups.push(group_report);
    }
    Ok(report)
}
