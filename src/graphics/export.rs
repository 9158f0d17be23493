use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use image::RgbaImage;
use tiff::encoder::{Rational, TiffEncoder, colortype};
use tiff::tags::ResolutionUnit;

/// Write a page as an uncompressed RGBA TIFF tagged with `dpi` in both axes.
/// An existing file at `path` is overwritten.
pub fn write_page(page: &RgbaImage, dpi: u32, path: &Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut encoder = TiffEncoder::new(BufWriter::new(file))
        .with_context(|| format!("failed to start TIFF {}", path.display()))?;
    let mut image = encoder
        .new_image::<colortype::RGBA8>(page.width(), page.height())
        .with_context(|| format!("failed to start TIFF {}", path.display()))?;
    image.resolution(ResolutionUnit::Inch, Rational { n: dpi, d: 1 });
    image
        .write_data(page.as_raw())
        .with_context(|| format!("failed to write {}", path.display()))
}
