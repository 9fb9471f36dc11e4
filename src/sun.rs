//! Retro sunset sun: glow halo, solid disc, horizontal scanline cuts.

use crate::draw;
use image::{Rgba, RgbaImage};

pub const SUN_COLOR: Rgba<u8> = Rgba([255, 140, 0, 255]);
pub const SCANLINE_COLOR: Rgba<u8> = Rgba([255, 165, 0, 200]);

/// How far past the disc the glow reaches, in pixels.
const GLOW_REACH: i64 = 15;
const GLOW_STEP: i64 = 2;
const GLOW_MAX_ALPHA: i64 = 100;
const SCANLINE_WIDTH: u32 = 2;

/// Sun placement for a square icon of `size` pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SunGeometry {
    pub cx: i64,
    pub cy: i64,
    pub radius: i64,
}

impl SunGeometry {
    pub fn for_size(size: u32) -> Self {
        let size = size as i64;
        Self {
            cx: size / 2,
            cy: size / 3,
            radius: size / 6,
        }
    }

    pub fn scanline_spacing(&self) -> i64 {
        (self.radius / 8).max(1)
    }

    /// Row offsets from the centre that receive a scanline.
    pub fn scanline_offsets(&self) -> impl Iterator<Item = i64> + '_ {
        (-self.radius..self.radius)
            .step_by(self.scanline_spacing() as usize)
            .filter(move |i| chord_half_width(self.radius, *i).is_some())
    }
}

/// Half the length of the chord `offset` rows from the centre of a circle,
/// or `None` when the row misses the circle.
pub fn chord_half_width(radius: i64, offset: i64) -> Option<f32> {
    if offset.abs() >= radius {
        return None;
    }
    Some(((radius * radius - offset * offset) as f32).sqrt())
}

/// Alpha of the glow ring with radius `ring` around a disc of `radius`.
fn glow_alpha(radius: i64, ring: i64) -> u8 {
    (GLOW_MAX_ALPHA * (radius + GLOW_REACH - ring) / GLOW_REACH).clamp(0, 255) as u8
}

pub fn draw_sun(canvas: &mut RgbaImage, sun: SunGeometry) {
    // Rings shrink towards the disc, each replacing the previous one's interior.
    let outer = sun.radius + GLOW_REACH;
    let mut ring = outer;
    while ring > sun.radius - 1 {
        let alpha = glow_alpha(sun.radius, ring);
        draw::fill_disc(canvas, sun.cx, sun.cy, ring, Rgba([255, 140, 0, alpha]));
        ring -= GLOW_STEP;
    }

    draw::fill_disc(canvas, sun.cx, sun.cy, sun.radius, SUN_COLOR);

    for offset in sun.scanline_offsets() {
        if let Some(half) = chord_half_width(sun.radius, offset) {
            let cx = sun.cx as f32;
            draw::hline(
                canvas,
                cx - half,
                cx + half,
                sun.cy + offset,
                SCANLINE_WIDTH,
                SCANLINE_COLOR,
            );
        }
    }
}

/// Transparent layer holding only the sun.
pub fn sun_layer(size: u32) -> RgbaImage {
    let mut layer = RgbaImage::new(size, size);
    draw_sun(&mut layer, SunGeometry::for_size(size));
    layer
}
