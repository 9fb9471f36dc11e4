//! Raster primitives used by the layer generators.
//!
//! Shape fills replace whatever is underneath, alpha included, so a
//! translucent rectangle painted over an opaque one leaves a translucent
//! hole. Text goes through [`blend`] instead, which composites glyph
//! coverage source-over with [`Pixel::blend`]. All coordinates are signed
//! and clipped to the canvas; bounding boxes are inclusive on both ends.

use image::{Pixel, Rgba, RgbaImage};

fn in_bounds(canvas: &RgbaImage, x: i64, y: i64) -> bool {
    x >= 0 && y >= 0 && x < canvas.width() as i64 && y < canvas.height() as i64
}

/// Clip the inclusive span `[from, to]` to `[0, len)`.
fn clip_span(from: i64, to: i64, len: u32) -> Option<(u32, u32)> {
    let lo = from.max(0);
    let hi = to.min(len as i64 - 1);
    if lo > hi {
        None
    } else {
        Some((lo as u32, hi as u32))
    }
}

/// Composite `color` over the pixel at (x, y), its alpha scaled by `coverage`.
pub fn blend(canvas: &mut RgbaImage, x: i64, y: i64, color: Rgba<u8>, coverage: f32) {
    let alpha = (color[3] as f32 * coverage.clamp(0.0, 1.0)).round() as u8;
    if alpha == 0 || !in_bounds(canvas, x, y) {
        return;
    }
    let mut src = color;
    src[3] = alpha;
    canvas.get_pixel_mut(x as u32, y as u32).blend(&src);
}

pub fn fill_rect(canvas: &mut RgbaImage, x0: i64, y0: i64, x1: i64, y1: i64, color: Rgba<u8>) {
    let (Some((xa, xb)), Some((ya, yb))) = (
        clip_span(x0, x1, canvas.width()),
        clip_span(y0, y1, canvas.height()),
    ) else {
        return;
    };
    for y in ya..=yb {
        for x in xa..=xb {
            canvas.put_pixel(x, y, color);
        }
    }
}

/// One-pixel border along the inside of the inclusive box.
pub fn outline_rect(canvas: &mut RgbaImage, x0: i64, y0: i64, x1: i64, y1: i64, color: Rgba<u8>) {
    fill_rect(canvas, x0, y0, x1, y0, color);
    fill_rect(canvas, x0, y1, x1, y1, color);
    fill_rect(canvas, x0, y0, x0, y1, color);
    fill_rect(canvas, x1, y0, x1, y1, color);
}

/// Filled circle covering the inclusive box `[cx - r, cx + r]` on both axes.
pub fn fill_disc(canvas: &mut RgbaImage, cx: i64, cy: i64, r: i64, color: Rgba<u8>) {
    if r < 0 {
        return;
    }
    let reach = r as f32 + 0.5;
    for dy in -r..=r {
        let span = (reach * reach - (dy * dy) as f32).max(0.0).sqrt();
        let half = (span.floor() as i64).min(r);
        fill_rect(canvas, cx - half, cy + dy, cx + half, cy + dy, color);
    }
}

/// Horizontal stroke from `x_from` to `x_to` centred on row `y`.
///
/// A stroke of width `w` covers rows `y - (w - 1) / 2 ..= y + w / 2`.
pub fn hline(canvas: &mut RgbaImage, x_from: f32, x_to: f32, y: i64, width: u32, color: Rgba<u8>) {
    if width == 0 {
        return;
    }
    let w = width as i64;
    let (x0, x1) = (x_from.round() as i64, x_to.round() as i64);
    fill_rect(canvas, x0.min(x1), y - (w - 1) / 2, x0.max(x1), y + w / 2, color);
}

pub fn vline(canvas: &mut RgbaImage, x: i64, y_from: i64, y_to: i64, color: Rgba<u8>) {
    fill_rect(canvas, x, y_from.min(y_to), x, y_from.max(y_to), color);
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);

    #[test]
    fn full_coverage_blend_onto_transparent_keeps_source() {
        let mut canvas = RgbaImage::from_pixel(2, 2, CLEAR);
        let src = Rgba([10, 20, 30, 200]);
        blend(&mut canvas, 1, 1, src, 1.0);
        assert_eq!(*canvas.get_pixel(1, 1), src);
    }

    #[test]
    fn coverage_scales_source_alpha() {
        let mut canvas = RgbaImage::from_pixel(2, 1, CLEAR);
        blend(&mut canvas, 0, 0, Rgba([255, 255, 255, 200]), 0.5);
        assert_eq!(canvas.get_pixel(0, 0)[3], 100);

        // No coverage and out-of-bounds stamps leave the canvas alone.
        blend(&mut canvas, 1, 0, Rgba([255, 0, 0, 255]), 0.0);
        blend(&mut canvas, 5, 5, Rgba([255, 0, 0, 255]), 1.0);
        assert_eq!(*canvas.get_pixel(1, 0), CLEAR);
    }

    #[test]
    fn opaque_blend_replaces() {
        let mut canvas = RgbaImage::from_pixel(1, 1, Rgba([255, 0, 0, 255]));
        blend(&mut canvas, 0, 0, Rgba([0, 0, 255, 255]), 1.0);
        assert_eq!(*canvas.get_pixel(0, 0), Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn fills_replace_alpha() {
        let mut canvas = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
        fill_rect(&mut canvas, 1, 1, 2, 2, Rgba([255, 255, 255, 60]));
        assert_eq!(*canvas.get_pixel(1, 1), Rgba([255, 255, 255, 60]));
        assert_eq!(*canvas.get_pixel(0, 0), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn shapes_are_clipped() {
        let mut canvas = RgbaImage::from_pixel(8, 8, CLEAR);
        let red = Rgba([255, 0, 0, 255]);
        fill_rect(&mut canvas, -10, -10, 100, 2, red);
        fill_disc(&mut canvas, 7, 7, 20, red);
        hline(&mut canvas, -50.0, 50.0, 9, 2, red);
        outline_rect(&mut canvas, -1, -1, 8, 8, red);
        assert_eq!(*canvas.get_pixel(0, 0), red);
        assert_eq!(*canvas.get_pixel(7, 7), red);
    }

    #[test]
    fn disc_spans_inclusive_box() {
        let mut canvas = RgbaImage::from_pixel(21, 21, CLEAR);
        let c = Rgba([1, 2, 3, 255]);
        fill_disc(&mut canvas, 10, 10, 5, c);
        assert_eq!(*canvas.get_pixel(5, 10), c);
        assert_eq!(*canvas.get_pixel(15, 10), c);
        assert_eq!(*canvas.get_pixel(10, 5), c);
        assert_eq!(*canvas.get_pixel(4, 10), CLEAR);
        assert_eq!(*canvas.get_pixel(5, 5), CLEAR);
    }

    #[test]
    fn two_pixel_hline_covers_row_and_next() {
        let mut canvas = RgbaImage::from_pixel(10, 10, CLEAR);
        let c = Rgba([9, 9, 9, 255]);
        hline(&mut canvas, 2.0, 6.0, 4, 2, c);
        assert_eq!(*canvas.get_pixel(2, 4), c);
        assert_eq!(*canvas.get_pixel(6, 5), c);
        assert_eq!(*canvas.get_pixel(4, 3), CLEAR);
        assert_eq!(*canvas.get_pixel(4, 6), CLEAR);
    }
}
