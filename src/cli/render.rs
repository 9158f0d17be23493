//! Page rendering command (`badgepress render ...`).

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use badgepress::{
    Alignment, BatchOptions, DEFAULT_DPI, DEFAULT_PAGE_SIZE, DEFAULT_PER_PAGE, DesignConfig,
    DesignRegistry, FillerSpec, PageSpec, RenderConfig, load_groups, run_batch,
};
use clap::Args;
use log::info;

use crate::cli::utils::{parse_resize, read_input};

/// Args for `badgepress render`.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Directory receiving the TIFF pages (created if missing).
    pub output_dir: PathBuf,
    /// Attendee JSON document (default: read from stdin).
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,
    /// Page size in mm as WIDTHxHEIGHT, or A3 / A4.
    #[arg(short = 'p', long = "page-size", default_value = DEFAULT_PAGE_SIZE)]
    pub page_size: PageSpec,
    /// Dots per inch used when rasterising.
    #[arg(short = 'd', long, default_value_t = DEFAULT_DPI, value_parser = clap::value_parser!(u32).range(1..))]
    pub dpi: u32,
    /// Badges per page.
    #[arg(short = 'n', long = "per-page", default_value_t = DEFAULT_PER_PAGE, value_parser = parse_per_page)]
    pub per_page: usize,
    /// Resize factor applied to every badge.
    #[arg(short = 'r', long, value_parser = parse_resize)]
    pub resize: Option<f64>,
    /// Design configuration file (JSON).
    #[arg(short = 'c', long = "conf", default_value = "badge.json")]
    pub conf: PathBuf,
    /// Blank filler pages per group: a count, or a percentage of data pages.
    #[arg(short = 'e', long = "empty-pages", default_value = "0")]
    pub empty_pages: FillerSpec,
    /// Center each row of badges horizontally.
    #[arg(long)]
    pub center: bool,
    /// Reorder badges along the x axis within each row.
    #[arg(long = "x-mirror")]
    pub x_mirror: bool,
}

fn parse_per_page(input: &str) -> Result<usize, String> {
    match input.trim().parse::<usize>() {
        Ok(0) => Err(badgepress::ConfigError::PerPage.to_string()),
        Ok(n) => Ok(n),
        Err(_) => Err(format!("'{input}' is not a badge count")),
    }
}

/// Execute the render command.
pub fn handle(args: RenderArgs) -> Result<()> {
    let design_config = DesignConfig::load(&args.conf)?;
    let config = RenderConfig::new(
        args.page_size,
        args.dpi,
        design_config.page_margin,
        design_config.waste,
    )?;
    let design = DesignRegistry::build(&design_config)
        .with_context(|| format!("failed to build design '{}'", design_config.design))?;

    let raw = read_input(args.input.as_deref())?;
    let groups = load_groups(design.as_ref(), &raw, design_config.base_dir())?;

    fs::create_dir_all(&args.output_dir).with_context(|| {
        format!(
            "failed to create output directory {}",
            args.output_dir.display()
        )
    })?;

    let options = BatchOptions {
        per_page: args.per_page,
        resize: args.resize,
        fillers: args.empty_pages,
        align: if args.center {
            Alignment::Center
        } else {
            Alignment::Left
        },
        mirror_x: args.x_mirror,
    };
    info!(
        "page {} mm at {} dpi: {}x{} px, margin {} px",
        args.page_size, config.dpi, config.page.width, config.page.height, config.margin
    );

    let report = run_batch(groups, design.as_ref(), &config, &options, &args.output_dir)?;
    println!(
        "Rendered {} page(s) for {} group(s) to {} at {} DPI",
        report.total_pages(),
        report.groups.len(),
        args.output_dir.display(),
        config.dpi
    );
    Ok(())
}
