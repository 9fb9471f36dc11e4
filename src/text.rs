//! Label text: brute-force outline, drop shadow, body, glass highlight.

use crate::font::{GlyphMask, LabelFont};
use image::{Rgba, RgbaImage};

pub const DEFAULT_LABEL: &str = "MacAmp";
pub const DEFAULT_TEXT_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);

const OUTLINE_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);
const OUTLINE_REACH: i64 = 2;
const SHADOW_COLOR: Rgba<u8> = Rgba([0, 0, 0, 150]);
const SHADOW_OFFSETS: [(i64, i64); 2] = [(2, 2), (1, 1)];
const HIGHLIGHT_COLOR: Rgba<u8> = Rgba([255, 255, 255, 80]);

/// Every offset in the 5×5 neighbourhood except the centre.
pub fn outline_offsets() -> impl Iterator<Item = (i64, i64)> {
    (-OUTLINE_REACH..=OUTLINE_REACH)
        .flat_map(|dx| (-OUTLINE_REACH..=OUTLINE_REACH).map(move |dy| (dx, dy)))
        .filter(|&(dx, dy)| dx != 0 || dy != 0)
}

/// Where the label sits on an icon of `size` pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextPlacement {
    pub font_px: f32,
    pub top: i64,
}

impl TextPlacement {
    pub fn for_size(size: u32) -> Self {
        Self {
            font_px: (size / 6) as f32,
            top: (size as f64 * 0.75) as i64,
        }
    }
}

/// Left edge that centres `mask` horizontally on a `size`-wide canvas.
fn centred_origin(size: u32, mask: &GlyphMask) -> i64 {
    (size as i64 - mask.width as i64) / 2 - mask.left
}

pub fn draw_label(canvas: &mut RgbaImage, mask: &GlyphMask, x: i64, y: i64, color: Rgba<u8>) {
    for (dx, dy) in outline_offsets() {
        mask.stamp(canvas, x + dx, y + dy, OUTLINE_COLOR);
    }
    for (dx, dy) in SHADOW_OFFSETS {
        mask.stamp(canvas, x + dx, y + dy, SHADOW_COLOR);
    }
    mask.stamp(canvas, x, y, color);
    mask.stamp(canvas, x, y - 1, HIGHLIGHT_COLOR);
}

/// Transparent layer holding only the label.
pub fn text_layer(size: u32, label: &str, color: Rgba<u8>, font: &LabelFont) -> RgbaImage {
    let mut layer = RgbaImage::new(size, size);
    let placement = TextPlacement::for_size(size);
    let mask = font.rasterize(label, placement.font_px);
    let x = centred_origin(size, &mask);
    draw_label(&mut layer, &mask, x, placement.top, color);
    layer
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outline_uses_twenty_four_offsets() {
        let offsets: Vec<_> = outline_offsets().collect();
        assert_eq!(offsets.len(), 24);
        assert!(!offsets.contains(&(0, 0)));
        assert!(offsets.contains(&(-2, 2)));
    }

    #[test]
    fn placement_for_icon() {
        let placement = TextPlacement::for_size(1024);
        assert_eq!(placement.font_px, 170.0);
        assert_eq!(placement.top, 768);
    }

    #[test]
    fn label_is_centred() {
        let layer = text_layer(512, "MacAmp", DEFAULT_TEXT_COLOR, &LabelFont::Builtin);
        let inked: Vec<u32> = (0..512)
            .filter(|&x| (0..512).any(|y| layer.get_pixel(x, y)[3] > 0))
            .collect();
        let (first, last) = (inked[0], *inked.last().unwrap());
        let left_margin = first as i64;
        let right_margin = 511 - last as i64;
        assert!((left_margin - right_margin).abs() <= 2);
    }

    #[test]
    fn truetype_label_is_centred_below_placement_top() {
        use crate::font::{load_truetype, DEFAULT_FONT_PATHS};
        use std::path::Path;

        let Some(font) = DEFAULT_FONT_PATHS
            .iter()
            .find_map(|path| load_truetype(Path::new(path)).ok())
        else {
            // No system font installed on this host.
            return;
        };
        let size = 1024u32;
        let layer = text_layer(size, "MacAmp", DEFAULT_TEXT_COLOR, &LabelFont::Outline(font));
        let inked = |x: u32, y: u32| layer.get_pixel(x, y)[3] > 0;

        let columns: Vec<u32> = (0..size).filter(|&x| (0..size).any(|y| inked(x, y))).collect();
        let (first, last) = (columns[0] as i64, *columns.last().unwrap() as i64);
        let right_margin = size as i64 - 1 - last;
        assert!(
            (first - right_margin).abs() <= 2,
            "margins {first} and {right_margin}"
        );

        let top_row = (0..size).find(|&y| (0..size).any(|x| inked(x, y))).unwrap() as i64;
        let placement = TextPlacement::for_size(size);
        let below = top_row - placement.top;
        // The outline reaches two pixels above the glyph ink.
        assert!(
            (-2..(size / 6) as i64).contains(&below),
            "ink starts {below}px from the placement top"
        );
    }

    #[test]
    fn body_keeps_text_color_under_highlight() {
        // The bottom row of a glyph is not covered by the highlight stamp.
        let layer = text_layer(512, "I", DEFAULT_TEXT_COLOR, &LabelFont::Builtin);
        let placement = TextPlacement::for_size(512);
        let mask = LabelFont::Builtin.rasterize("I", placement.font_px);
        let x = centred_origin(512, &mask) + mask.width as i64 / 2;
        let y = placement.top + mask.height as i64 - 1;
        assert_eq!(*layer.get_pixel(x as u32, y as u32), DEFAULT_TEXT_COLOR);
    }

    #[test]
    fn outline_surrounds_glyphs() {
        let layer = text_layer(512, "I", DEFAULT_TEXT_COLOR, &LabelFont::Builtin);
        let placement = TextPlacement::for_size(512);
        let mask = LabelFont::Builtin.rasterize("I", placement.font_px);
        // Two pixels above the first inked row only the outline reaches.
        let x = centred_origin(512, &mask) + mask.width as i64 / 2;
        let y = placement.top - 2;
        assert_eq!(*layer.get_pixel(x as u32, y as u32), OUTLINE_COLOR);
    }

    #[test]
    fn background_stays_transparent() {
        let layer = text_layer(256, "MacAmp", DEFAULT_TEXT_COLOR, &LabelFont::Builtin);
        assert_eq!(layer.get_pixel(0, 0)[3], 0);
        assert_eq!(layer.get_pixel(128, 10)[3], 0);
    }
}
