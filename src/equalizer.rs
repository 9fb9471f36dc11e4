//! Equalizer bars with a cyan-to-pink sweep and a glossy top highlight.

use crate::background::lerp_channel;
use crate::draw;
use image::{Rgba, RgbaImage};

/// Relative bar heights, repeated when there are more than seven bars.
pub const BAR_HEIGHTS: [f64; 7] = [0.4, 0.7, 0.9, 1.0, 0.9, 0.6, 0.5];
pub const DEFAULT_BAR_COUNT: u32 = 7;

const CYAN: [u8; 3] = [0, 255, 255];
const PINK: [u8; 3] = [255, 20, 147];
const FILL_ALPHA: u8 = 220;
const OUTLINE: Rgba<u8> = Rgba([255, 255, 255, 180]);
const HIGHLIGHT: Rgba<u8> = Rgba([255, 255, 255, 60]);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Equalizer {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
    pub bars: u32,
}

impl Equalizer {
    /// Default placement: two thirds of the icon wide, just below the middle.
    pub fn for_size(size: u32) -> Self {
        Self {
            x: (size / 6) as i64,
            y: (size as f64 * 0.52) as i64,
            width: size * 2 / 3,
            height: size / 5,
            bars: DEFAULT_BAR_COUNT,
        }
    }

    /// Bars and the gaps between them share one width.
    pub fn bar_width(&self) -> u32 {
        if self.bars == 0 {
            return 0;
        }
        self.width / (self.bars * 2)
    }

    pub fn bar_color(&self, index: u32) -> Rgba<u8> {
        let ratio = if self.bars > 1 {
            index as f64 / (self.bars - 1) as f64
        } else {
            0.0
        };
        Rgba([
            lerp_channel(CYAN[0], PINK[0], ratio),
            lerp_channel(CYAN[1], PINK[1], ratio),
            lerp_channel(CYAN[2], PINK[2], ratio),
            FILL_ALPHA,
        ])
    }
}

/// Height of bar `index` in a group `height` pixels tall.
pub fn bar_height(height: u32, index: usize) -> u32 {
    (height as f64 * BAR_HEIGHTS[index % BAR_HEIGHTS.len()]) as u32
}

pub fn draw_equalizer(canvas: &mut RgbaImage, eq: &Equalizer) {
    let bar_width = eq.bar_width() as i64;
    let bottom = eq.y + eq.height as i64;

    for i in 0..eq.bars {
        let bar_x = eq.x + i as i64 * bar_width * 2;
        let bar_h = bar_height(eq.height, i as usize) as i64;
        let bar_top = bottom - bar_h;

        draw::fill_rect(canvas, bar_x, bar_top, bar_x + bar_width, bottom, eq.bar_color(i));
        draw::outline_rect(canvas, bar_x, bar_top, bar_x + bar_width, bottom, OUTLINE);

        // Glass sheen over the top third, only where there is room for it.
        if bar_width > 2 && bar_h > 3 {
            let sheen = (bar_h / 3).max(1);
            draw::fill_rect(
                canvas,
                bar_x + 1,
                bar_top + 1,
                bar_x + bar_width - 1,
                bar_top + sheen,
                HIGHLIGHT,
            );
        }
    }
}

/// Transparent layer holding only the equalizer.
pub fn equalizer_layer(size: u32) -> RgbaImage {
    let mut layer = RgbaImage::new(size, size);
    draw_equalizer(&mut layer, &Equalizer::for_size(size));
    layer
}
