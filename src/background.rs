//! Gradient sky and the faint grid drawn over it.

use crate::draw;
use image::{Rgba, RgbaImage};

/// Deep purple at the top of the gradient.
pub const GRADIENT_TOP: [u8; 3] = [138, 43, 226];
/// Hot pink at the bottom of the gradient.
pub const GRADIENT_BOTTOM: [u8; 3] = [255, 20, 147];

pub const GRID_COLOR: Rgba<u8> = Rgba([138, 43, 226, 15]);

/// Linear step from `from` to `to`, truncated toward zero.
pub(crate) fn lerp_channel(from: u8, to: u8, ratio: f64) -> u8 {
    (from as f64 + (to as f64 - from as f64) * ratio) as u8
}

/// Vertical purple-to-pink gradient. `opacity` is clamped to `[0, 1]`.
pub fn gradient(width: u32, height: u32, opacity: f32) -> RgbaImage {
    let alpha = (255.0 * opacity.clamp(0.0, 1.0)) as u8;
    let mut image = RgbaImage::new(width, height);

    for y in 0..height {
        let ratio = y as f64 / height as f64;
        let color = Rgba([
            lerp_channel(GRADIENT_TOP[0], GRADIENT_BOTTOM[0], ratio),
            lerp_channel(GRADIENT_TOP[1], GRADIENT_BOTTOM[1], ratio),
            lerp_channel(GRADIENT_TOP[2], GRADIENT_BOTTOM[2], ratio),
            alpha,
        ]);
        for x in 0..width {
            image.put_pixel(x, y, color);
        }
    }

    image
}

/// Grid line spacing for a canvas `width` pixels wide; zero means no grid.
pub fn grid_spacing(width: u32) -> u32 {
    width / 10
}

/// Transparent overlay with one-pixel grid lines every `width / 10` pixels.
pub fn grid_overlay(width: u32, height: u32) -> RgbaImage {
    let mut overlay = RgbaImage::new(width, height);
    let spacing = grid_spacing(width);
    if spacing == 0 {
        return overlay;
    }

    for x in (0..width).step_by(spacing as usize) {
        draw::vline(&mut overlay, x as i64, 0, height as i64, GRID_COLOR);
    }
    for y in (0..height).step_by(spacing as usize) {
        draw::hline(&mut overlay, 0.0, width as f32, y as i64, 1, GRID_COLOR);
    }

    overlay
}

/// Gradient with the grid composited on top, as used for the background layer.
pub fn background(size: u32) -> RgbaImage {
    let mut base = gradient(size, size, 1.0);
    let grid = grid_overlay(size, size);
    image::imageops::overlay(&mut base, &grid, 0, 0);
    base
}
