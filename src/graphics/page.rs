use image::imageops::overlay;
use image::{Rgba, RgbaImage};

use crate::config::{Alignment, RenderConfig};

const PAGE_BG: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Final page position of one badge, by index into the input list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub index: usize,
    pub x: i64,
    pub y: i64,
}

/// Badge index plus its row-local slot, before margins are applied.
type Slot = (usize, (i64, i64));

/// Compute where each badge of a page lands.
///
/// Badges fill rows left to right inside the printable width; a badge that
/// would cross it opens a new row below the previous badge. Rows past the
/// printable height are not rejected.
pub fn plan_page(
    sizes: &[(u32, u32)],
    config: &RenderConfig,
    align: Alignment,
    mirror_x: bool,
) -> Vec<Placement> {
    let (limit_w, _) = config.printable_area();
    let limit_w = i64::from(limit_w);
    let margin = i64::from(config.margin);

    let mut rows: Vec<Vec<Slot>> = Vec::new();
    let mut row: Vec<Slot> = Vec::new();
    let (mut x, mut y) = (0i64, 0i64);
    let mut prev_height = 0i64;
    for (index, &(w, h)) in sizes.iter().enumerate() {
        let w = i64::from(w);
        if x + w > limit_w && !row.is_empty() {
            rows.push(std::mem::take(&mut row));
            x = 0;
            y += prev_height;
        }
        row.push((index, (x, y)));
        x += w;
        prev_height = i64::from(h);
    }
    if !row.is_empty() {
        rows.push(row);
    }

    let mut placements = Vec::with_capacity(sizes.len());
    for mut row in rows {
        let offset_x = match align {
            Alignment::Left => margin,
            Alignment::Center => {
                let row_width: i64 = row.iter().map(|&(i, _)| i64::from(sizes[i].0)).sum();
                (i64::from(config.page.width) - row_width).div_euclid(2)
            }
        };
        if mirror_x {
            mirror_slots(&mut row);
        }
        placements.extend(row.into_iter().map(|(index, (x, y))| Placement {
            index,
            x: x + offset_x,
            y: y + margin,
        }));
    }
    placements
}

/// Swap badges between symmetric slots of a row. Slots keep their
/// positions; only the badge assigned to each one changes.
pub(crate) fn mirror_slots(row: &mut [Slot]) {
    let positions: Vec<(i64, i64)> = row.iter().map(|&(_, pos)| pos).collect();
    for (slot, pos) in row.iter_mut().zip(positions.into_iter().rev()) {
        slot.1 = pos;
    }
}

/// Composite badges onto a fresh white page.
pub fn assemble_page(
    images: &[RgbaImage],
    config: &RenderConfig,
    align: Alignment,
    mirror_x: bool,
) -> RgbaImage {
    let sizes: Vec<(u32, u32)> = images.iter().map(RgbaImage::dimensions).collect();
    let mut page = RgbaImage::from_pixel(config.page.width, config.page.height, PAGE_BG);
    for placement in plan_page(&sizes, config, align, mirror_x) {
        overlay(&mut page, &images[placement.index], placement.x, placement.y);
    }
    page
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PageSize;
    use pretty_assertions::assert_eq;

    fn config(width: u32, height: u32, margin: u32) -> RenderConfig {
        RenderConfig {
            page: PageSize { width, height },
            margin,
            waste: 0.0,
            dpi: 300,
        }
    }

    fn positions(placements: &[Placement]) -> Vec<(usize, i64, i64)> {
        placements.iter().map(|p| (p.index, p.x, p.y)).collect()
    }

    #[test]
    fn left_alignment_starts_at_margin() {
        let cfg = config(1000, 800, 20);
        let plan = plan_page(&[(300, 200); 7], &cfg, Alignment::Left, false);
        assert_eq!(
            positions(&plan),
            vec![
                (0, 20, 20),
                (1, 320, 20),
                (2, 620, 20),
                (3, 20, 220),
                (4, 320, 220),
                (5, 620, 220),
                (6, 20, 420),
            ]
        );
    }

    #[test]
    fn center_alignment_centres_each_row() {
        let cfg = config(1000, 800, 20);
        let plan = plan_page(&[(300, 200); 4], &cfg, Alignment::Center, false);
        assert_eq!(
            positions(&plan),
            vec![(0, 50, 20), (1, 350, 20), (2, 650, 20), (3, 350, 220)]
        );
    }

    #[test]
    fn mirror_swaps_symmetric_slots() {
        let cfg = config(1000, 800, 20);
        let plan = plan_page(&[(300, 200); 3], &cfg, Alignment::Left, true);
        assert_eq!(
            positions(&plan),
            vec![(0, 620, 20), (1, 320, 20), (2, 20, 20)]
        );
    }

    #[test]
    fn mirror_is_self_inverse() {
        let original: Vec<Slot> = vec![(0, (0, 0)), (1, (300, 0)), (2, (600, 0))];
        let mut row = original.clone();
        mirror_slots(&mut row);
        assert_ne!(row, original);
        mirror_slots(&mut row);
        assert_eq!(row, original);
    }

    #[test]
    fn mirror_applies_per_row() {
        let cfg = config(1000, 800, 20);
        let plan = plan_page(&[(300, 200); 5], &cfg, Alignment::Left, true);
        assert_eq!(
            positions(&plan),
            vec![(0, 620, 20), (1, 320, 20), (2, 20, 20), (3, 320, 220), (4, 20, 220)]
        );
    }

    #[test]
    fn rows_may_overflow_page_height() {
        let cfg = config(400, 300, 0);
        let plan = plan_page(&[(300, 200); 3], &cfg, Alignment::Left, false);
        assert_eq!(plan.last().map(|p| p.y), Some(400));
    }

    #[test]
    fn oversized_badge_still_gets_a_row() {
        let cfg = config(400, 300, 10);
        let plan = plan_page(&[(500, 100), (100, 100)], &cfg, Alignment::Left, false);
        assert_eq!(positions(&plan), vec![(0, 10, 10), (1, 10, 110)]);
    }

    #[test]
    fn composites_with_alpha_on_white() {
        let cfg = config(100, 50, 5);
        let opaque = RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 255]));
        let clear = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 255, 0]));
        let page = assemble_page(&[opaque, clear], &cfg, Alignment::Left, false);
        assert_eq!(page.dimensions(), (100, 50));
        assert_eq!(*page.get_pixel(0, 0), PAGE_BG);
        assert_eq!(*page.get_pixel(5, 5), Rgba([255, 0, 0, 255]));
        assert_eq!(*page.get_pixel(15, 5), PAGE_BG);
    }

    #[test]
    fn empty_page_is_blank() {
        let cfg = config(20, 10, 1);
        let page = assemble_page(&[], &cfg, Alignment::Center, true);
        assert!(page.pixels().all(|p| *p == PAGE_BG));
    }
}
