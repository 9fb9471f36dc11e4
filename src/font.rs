//! Label font loading and rasterization.
//!
//! The text layer only needs "a bold sans-serif face at some pixel size".
//! [`FontProvider`] hides where that face comes from: [`SystemFonts`] tries
//! well-known TrueType files and falls back to the compiled-in bitmap face,
//! [`BuiltinFont`] always uses the bitmap face so output does not depend on
//! the host.

use crate::builtin_font;
use crate::draw;
use anyhow::{anyhow, Context, Result};
use image::{Rgba, RgbaImage};
use log::{debug, warn};
use rusttype::{point, Font, Scale};
use std::path::{Path, PathBuf};

/// Bold sans-serif faces tried in order by [`SystemFonts`].
pub const DEFAULT_FONT_PATHS: &[&str] = &[
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Bold.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

pub trait FontProvider {
    /// Load a bold sans-serif face, or the built-in face if none is available.
    fn bold_sans(&self) -> LabelFont;
}

pub enum LabelFont {
    Outline(Font<'static>),
    Builtin,
}

impl LabelFont {
    pub fn is_builtin(&self) -> bool {
        matches!(self, LabelFont::Builtin)
    }

    /// Rasterize `text` at `px` pixels into a coverage mask positioned
    /// relative to the top-left of the line box.
    pub fn rasterize(&self, text: &str, px: f32) -> GlyphMask {
        match self {
            LabelFont::Outline(font) => rasterize_outline(font, text, px),
            LabelFont::Builtin => rasterize_builtin(text, px),
        }
    }
}

/// Per-pixel glyph coverage in `[0, 1]` for a run of text.
#[derive(Debug, Clone)]
pub struct GlyphMask {
    pub width: u32,
    pub height: u32,
    /// Offset of the first inked column from the text origin.
    pub left: i64,
    /// Offset of the first inked row from the text origin.
    pub top: i64,
    coverage: Vec<f32>,
}

impl GlyphMask {
    fn blank() -> Self {
        Self {
            width: 0,
            height: 0,
            left: 0,
            top: 0,
            coverage: Vec::new(),
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    pub fn coverage(&self, x: u32, y: u32) -> f32 {
        if x >= self.width || y >= self.height {
            return 0.0;
        }
        self.coverage[self.index(x, y)]
    }

    /// Composite the mask onto `canvas` with its text origin at (x, y).
    pub fn stamp(&self, canvas: &mut RgbaImage, x: i64, y: i64, color: Rgba<u8>) {
        for my in 0..self.height {
            for mx in 0..self.width {
                let cov = self.coverage[self.index(mx, my)];
                draw::blend(
                    canvas,
                    x + self.left + mx as i64,
                    y + self.top + my as i64,
                    color,
                    cov,
                );
            }
        }
    }
}

fn rasterize_outline(font: &Font<'static>, text: &str, px: f32) -> GlyphMask {
    let scale = Scale::uniform(px.max(1.0));
    let ascent = font.v_metrics(scale).ascent;
    let glyphs: Vec<_> = font.layout(text, scale, point(0.0, ascent)).collect();

    let boxes: Vec<_> = glyphs
        .iter()
        .filter_map(|g| g.pixel_bounding_box())
        .collect();
    let (Some(min_x), Some(min_y), Some(max_x), Some(max_y)) = (
        boxes.iter().map(|b| b.min.x).min(),
        boxes.iter().map(|b| b.min.y).min(),
        boxes.iter().map(|b| b.max.x).max(),
        boxes.iter().map(|b| b.max.y).max(),
    ) else {
        return GlyphMask::blank();
    };

    let extent = mask_extent(
        i64::from(max_x) - i64::from(min_x),
        i64::from(max_y) - i64::from(min_y),
    );
    let Some((width, height, area)) = extent else {
        warn!("Label {text:?} is too large to rasterize at {px}px");
        return GlyphMask::blank();
    };
    let mut coverage = vec![0.0f32; area];

    for glyph in &glyphs {
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, v| {
                let x = (bb.min.x + gx as i32 - min_x) as u32;
                let y = (bb.min.y + gy as i32 - min_y) as u32;
                if x < width && y < height {
                    let cell = &mut coverage[y as usize * width as usize + x as usize];
                    *cell = (*cell + v).min(1.0);
                }
            });
        }
    }

    GlyphMask {
        width,
        height,
        left: min_x as i64,
        top: min_y as i64,
        coverage,
    }
}

/// Width, height and pixel count of a `width`×`height` mask, or `None` when
/// either side is negative or the mask does not fit in memory indices.
fn mask_extent(width: i64, height: i64) -> Option<(u32, u32, usize)> {
    let width = u32::try_from(width).ok()?;
    let height = u32::try_from(height).ok()?;
    let area = (width as usize).checked_mul(height as usize)?;
    Some((width, height, area))
}

/// Pixel extent of `glyphs` built-in characters drawn at `scale`.
fn builtin_extent(glyphs: usize, scale: u32) -> Option<(u32, u32, usize)> {
    let columns = glyphs
        .checked_mul(builtin_font::ADVANCE as usize)?
        .checked_sub(1)?
        .checked_mul(scale as usize)?;
    let rows = (builtin_font::GLYPH_HEIGHT as usize).checked_mul(scale as usize)?;
    mask_extent(i64::try_from(columns).ok()?, i64::try_from(rows).ok()?)
}

/// Integer scale applied to the 5×7 face so its cell is roughly `px` tall.
fn builtin_scale(px: f32) -> u32 {
    ((px / (builtin_font::GLYPH_HEIGHT + 1) as f32).round() as u32).max(1)
}

fn rasterize_builtin(text: &str, px: f32) -> GlyphMask {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return GlyphMask::blank();
    }

    let scale = builtin_scale(px);
    let Some((width, height, area)) = builtin_extent(chars.len(), scale) else {
        warn!("Label of {} characters is too large to rasterize at {px}px", chars.len());
        return GlyphMask::blank();
    };
    let mut coverage = vec![0.0f32; area];

    for (index, c) in chars.iter().enumerate() {
        let Some(columns) = builtin_font::glyph(*c) else {
            continue;
        };
        let origin = index * builtin_font::ADVANCE as usize * scale as usize;
        for (col, bits) in columns.iter().enumerate() {
            for row in 0..builtin_font::GLYPH_HEIGHT {
                if bits & (1 << row) == 0 {
                    continue;
                }
                for sy in 0..scale {
                    for sx in 0..scale {
                        let x = origin + col * scale as usize + sx as usize;
                        let y = (row * scale + sy) as usize;
                        coverage[y * width as usize + x] = 1.0;
                    }
                }
            }
        }
    }

    GlyphMask {
        width,
        height,
        left: 0,
        top: 0,
        coverage,
    }
}

/// Loads TrueType files from disk, preferring an explicit path when given.
#[derive(Debug, Clone)]
pub struct SystemFonts {
    candidates: Vec<PathBuf>,
}

impl SystemFonts {
    pub fn new() -> Self {
        Self {
            candidates: DEFAULT_FONT_PATHS.iter().map(PathBuf::from).collect(),
        }
    }

    /// Try `path` before the well-known locations.
    pub fn with_preferred(path: impl Into<PathBuf>) -> Self {
        let mut fonts = Self::new();
        fonts.candidates.insert(0, path.into());
        fonts
    }
}

impl Default for SystemFonts {
    fn default() -> Self {
        Self::new()
    }
}

impl FontProvider for SystemFonts {
    fn bold_sans(&self) -> LabelFont {
        for path in &self.candidates {
            match load_truetype(path) {
                Ok(font) => {
                    debug!("Using label font {}", path.display());
                    return LabelFont::Outline(font);
                }
                Err(err) => debug!("Skipping font candidate: {err:#}"),
            }
        }
        warn!("No bold sans-serif font found, falling back to the built-in bitmap face");
        LabelFont::Builtin
    }
}

/// Always yields the compiled-in bitmap face.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinFont;

impl FontProvider for BuiltinFont {
    fn bold_sans(&self) -> LabelFont {
        LabelFont::Builtin
    }
}

pub fn load_truetype(path: &Path) -> Result<Font<'static>> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Font::try_from_vec(bytes).ok_or_else(|| anyhow!("Not a TrueType font: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_mask_dimensions_follow_scale() {
        let mask = LabelFont::Builtin.rasterize("MacAmp", 16.0);
        // 16px rounds to a 2× cell: six glyphs of 6 columns minus the trailing gap.
        assert_eq!(mask.width, (6 * 6 - 1) * 2);
        assert_eq!(mask.height, 7 * 2);
        assert_eq!(mask.coverage(0, 0), 1.0);
    }

    #[test]
    fn oversized_masks_are_refused_instead_of_overflowing() {
        assert_eq!(builtin_extent(6, 2), Some((70, 14, 70 * 14)));
        assert_eq!(builtin_extent(0, 2), None);
        // Wider than u32 columns.
        assert_eq!(builtin_extent(1 << 30, 8), None);
        assert_eq!(builtin_extent(usize::MAX / 2, 1), None);
        assert_eq!(builtin_extent(1, u32::MAX), None);
        assert_eq!(mask_extent(-1, 10), None);
        assert_eq!(mask_extent(u32::MAX as i64 + 1, 1), None);
    }

    #[test]
    fn truetype_label_is_inked_below_origin() {
        let Some(font) = DEFAULT_FONT_PATHS
            .iter()
            .find_map(|path| load_truetype(Path::new(path)).ok())
        else {
            // No system font installed on this host.
            return;
        };
        let mask = LabelFont::Outline(font).rasterize("MacAmp", 170.0);
        assert!(mask.width > 0 && mask.height > 0);
        // Layout starts at the ascent line, so ink begins at or below the origin.
        assert!(mask.top >= 0 && mask.top < 170 / 2, "top {}", mask.top);
        assert!(mask.left.abs() < 170 / 4, "left {}", mask.left);
        let inked = (0..mask.height)
            .flat_map(|y| (0..mask.width).map(move |x| (x, y)))
            .filter(|&(x, y)| mask.coverage(x, y) > 0.0)
            .count();
        assert!(inked > 0);
    }

    #[test]
    fn builtin_scale_never_drops_below_one() {
        assert_eq!(builtin_scale(0.0), 1);
        assert_eq!(builtin_scale(2.0), 1);
        assert_eq!(builtin_scale(170.0), 21);
    }

    #[test]
    fn empty_text_rasterizes_to_blank_mask() {
        let mask = LabelFont::Builtin.rasterize("", 40.0);
        assert_eq!((mask.width, mask.height), (0, 0));
        let mut canvas = RgbaImage::new(4, 4);
        mask.stamp(&mut canvas, 0, 0, Rgba([255, 255, 255, 255]));
        assert!(canvas.pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn missing_font_falls_back_to_builtin() {
        let fonts = SystemFonts {
            candidates: vec![PathBuf::from("/nonexistent/font.ttf")],
        };
        assert!(fonts.bold_sans().is_builtin());
    }

    #[test]
    fn preferred_path_is_tried_first() {
        let fonts = SystemFonts::with_preferred("/tmp/custom.ttf");
        assert_eq!(fonts.candidates[0], PathBuf::from("/tmp/custom.ttf"));
        assert_eq!(fonts.candidates.len(), DEFAULT_FONT_PATHS.len() + 1);
    }

    #[test]
    fn non_font_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not-a-font.ttf");
        std::fs::write(&path, b"definitely not truetype").unwrap();
        assert!(load_truetype(&path).is_err());
    }
}
