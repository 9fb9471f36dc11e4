use crate::background;
use crate::contents_json::{ContentsFile, ImageEntry, AUTHOR};
use crate::equalizer;
use crate::error::IconError;
use crate::font::{FontProvider, LabelFont, SystemFonts};
use crate::layer::{Layer, LayerRole};
use crate::sun;
use crate::text;
use anyhow::{Context, Result};
use icns::{IconFamily, IconType, OSType};
use image::{
    codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder},
    imageops, ColorType, DynamicImage, ImageEncoder, RgbImage, Rgba, RgbaImage,
};
use log::{debug, info};
use serde::Deserialize;
use std::{
    collections::HashMap,
    fs::{create_dir_all, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    str::FromStr,
};

/// Which outputs a run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Mode {
    /// Flattened icon set followed by the layer export
    #[default]
    All,
    /// One opaque PNG per icon-set entry
    Flattened,
    /// Four transparent layers at the reference size
    Layered,
}

// Library-side mirror of the CLI arguments
#[derive(Debug, Clone)]
pub struct Config {
    pub output: PathBuf,
    pub mode: Mode,
    pub label: String,
    pub text_color: Rgba<u8>,
    /// Color the flattened icons are composited onto; alpha is ignored.
    pub background: Rgba<u8>,
    /// Gaussian blur sigma for the flattened icons, 0 disables it.
    pub blur_sigma: f32,
    pub layer_size: u32,
    /// Custom flattened sizes replacing the icon-set table.
    pub png: Option<Vec<u32>>,
    pub font: Option<PathBuf>,
    pub icns: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: PathBuf::from("./AppIcon.appiconset"),
            mode: Mode::All,
            label: text::DEFAULT_LABEL.to_string(),
            text_color: text::DEFAULT_TEXT_COLOR,
            background: Rgba([255, 255, 255, 255]),
            blur_sigma: 1.0,
            layer_size: 1024,
            png: None,
            font: None,
            icns: false,
        }
    }
}

/// One row of the macOS icon set: pixel size, file label, ICNS element type.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SizeSpec {
    pub size: u32,
    pub label: String,
    pub ostype: String,
}

const ICON_SET_JSON: &str = r#"
[
  { "label": "16x16",      "size": 16,   "ostype": "is32" },
  { "label": "16x16@2x",   "size": 32,   "ostype": "ic11" },
  { "label": "32x32",      "size": 32,   "ostype": "il32" },
  { "label": "32x32@2x",   "size": 64,   "ostype": "ic12" },
  { "label": "128x128",    "size": 128,  "ostype": "ic07" },
  { "label": "128x128@2x", "size": 256,  "ostype": "ic13" },
  { "label": "256x256",    "size": 256,  "ostype": "ic08" },
  { "label": "256x256@2x", "size": 512,  "ostype": "ic14" },
  { "label": "512x512",    "size": 512,  "ostype": "ic09" },
  { "label": "512x512@2x", "size": 1024, "ostype": "ic10" }
]
"#;

/// The ten macOS icon-set entries, smallest first.
pub fn icon_set() -> Result<Vec<SizeSpec>> {
    serde_json::from_str(ICON_SET_JSON).context("Built-in icon size table is malformed")
}

pub fn validate_size(size: u32) -> Result<u32, IconError> {
    if size == 0 {
        return Err(IconError::InvalidSize(size));
    }
    Ok(size)
}

/// `imageops::blur` panics on a non-finite sigma, so reject it up front.
pub fn validate_blur(sigma: f32) -> Result<f32, IconError> {
    if !sigma.is_finite() || sigma < 0.0 {
        return Err(IconError::InvalidBlur(sigma));
    }
    Ok(sigma)
}

pub fn parse_css_color(value: &str) -> Result<Rgba<u8>, IconError> {
    css_color::Srgb::from_str(value)
        .map(|color| {
            Rgba([
                (color.red * 255.).round() as u8,
                (color.green * 255.).round() as u8,
                (color.blue * 255.).round() as u8,
                (color.alpha * 255.).round() as u8,
            ])
        })
        .map_err(|_| IconError::InvalidColor(value.to_string()))
}

/// Renders the icon's layers for any size with a fixed label and font.
pub struct IconRenderer {
    pub label: String,
    pub text_color: Rgba<u8>,
    pub blur_sigma: f32,
    font: LabelFont,
}

impl IconRenderer {
    pub fn new(label: impl Into<String>, text_color: Rgba<u8>, font: LabelFont) -> Self {
        Self {
            label: label.into(),
            text_color,
            blur_sigma: 0.0,
            font,
        }
    }

    pub fn with_blur(mut self, sigma: f32) -> Self {
        self.blur_sigma = sigma;
        self
    }

    pub fn uses_builtin_font(&self) -> bool {
        self.font.is_builtin()
    }

    /// The four layers for `size`, bottom first; all share its dimensions.
    pub fn layers(&self, size: u32) -> Result<Vec<Layer>> {
        let size = validate_size(size)?;
        Ok(LayerRole::ALL
            .iter()
            .map(|&role| Layer::new(role, self.render_layer(role, size)))
            .collect())
    }

    fn render_layer(&self, role: LayerRole, size: u32) -> RgbaImage {
        match role {
            LayerRole::Background => background::background(size),
            LayerRole::Sun => sun::sun_layer(size),
            LayerRole::Equalizer => equalizer::equalizer_layer(size),
            LayerRole::Text => text::text_layer(size, &self.label, self.text_color, &self.font),
        }
    }

    /// All layers composited bottom-up, then softened by the blur if enabled.
    pub fn composite(&self, size: u32) -> Result<RgbaImage> {
        let sigma = validate_blur(self.blur_sigma)?;
        let mut layers = self.layers(size)?.into_iter();
        let mut base = match layers.next() {
            Some(layer) => layer.image,
            None => RgbaImage::new(size, size),
        };
        for layer in layers {
            imageops::overlay(&mut base, &layer.image, 0, 0);
        }

        if sigma > 0.0 {
            base = imageops::blur(&base, sigma);
        }
        Ok(base)
    }

    /// Composite for `size`, flattened onto an opaque `background`.
    pub fn flattened(&self, size: u32, background: Rgba<u8>) -> Result<RgbImage> {
        Ok(flatten(&self.composite(size)?, background))
    }
}

/// Drop transparency by compositing onto a solid color.
pub fn flatten(icon: &RgbaImage, background: Rgba<u8>) -> RgbImage {
    let opaque = Rgba([background[0], background[1], background[2], 255]);
    let mut canvas = RgbaImage::from_pixel(icon.width(), icon.height(), opaque);
    imageops::overlay(&mut canvas, icon, 0, 0);
    DynamicImage::ImageRgba8(canvas).to_rgb8()
}

pub fn generate_icons(config: &Config) -> Result<()> {
    let fonts = match &config.font {
        Some(path) => SystemFonts::with_preferred(path.clone()),
        None => SystemFonts::new(),
    };
    generate_icons_with(config, &fonts)
}

pub fn generate_icons_with(config: &Config, fonts: &dyn FontProvider) -> Result<()> {
    validate_size(config.layer_size)?;
    validate_blur(config.blur_sigma)?;
    if let Some(sizes) = &config.png {
        for &size in sizes {
            validate_size(size)?;
        }
        if config.icns {
            return Err(IconError::IcnsWithCustomSizes.into());
        }
    }

    // Ensure the output directory exists
    create_dir_all(&config.output).context("Can't create output directory")?;

    let renderer = IconRenderer::new(config.label.clone(), config.text_color, fonts.bold_sans())
        .with_blur(config.blur_sigma);
    if renderer.uses_builtin_font() {
        info!("Rendering label with the built-in bitmap face");
    }

    match config.mode {
        Mode::Flattened => generate_flattened_outputs(&renderer, config)?,
        Mode::Layered => {
            generate_layers(&renderer, config.layer_size, &config.output)?;
        }
        Mode::All => {
            generate_flattened_outputs(&renderer, config)?;
            generate_layers(&renderer, config.layer_size, &config.output)?;
        }
    }

    Ok(())
}

fn generate_flattened_outputs(renderer: &IconRenderer, config: &Config) -> Result<()> {
    match &config.png {
        Some(sizes) => {
            generate_custom_sizes(renderer, sizes, &config.output, config.background)?;
        }
        None => {
            generate_icon_set(renderer, &config.output, config.background, config.icns)?;
        }
    }
    Ok(())
}

/// Write `icon_<label>.png` for every icon-set entry, plus Contents.json and
/// optionally icon.icns.
pub fn generate_icon_set(
    renderer: &IconRenderer,
    out_dir: &Path,
    background: Rgba<u8>,
    with_icns: bool,
) -> Result<Vec<PathBuf>> {
    println!("Generating flattened icons...");
    let entries = icon_set()?;

    // Several labels share a pixel size
    let mut rendered: HashMap<u32, RgbImage> = HashMap::new();
    let mut written = Vec::new();
    let mut contents = ContentsFile::new(AUTHOR.to_string());

    for entry in &entries {
        if !rendered.contains_key(&entry.size) {
            debug!("Rendering {}x{} composite", entry.size, entry.size);
            rendered.insert(entry.size, renderer.flattened(entry.size, background)?);
        }
        let icon = &rendered[&entry.size];

        let filename = format!("icon_{}.png", entry.label);
        let path = out_dir.join(&filename);
        save_png(&path, icon.as_raw(), icon.width(), icon.height(), ColorType::Rgb8)?;
        println!("  ✓ Generated {filename} ({0}x{0})", entry.size);

        contents.add_image(ImageEntry::mac(filename, &entry.label));
        written.push(path);
    }

    contents.write_to_dir(out_dir)?;
    println!("  ✓ Generated Contents.json");

    if with_icns {
        generate_icns(&entries, &rendered, out_dir)?;
    }

    Ok(written)
}

/// Write `icon_<n>x<n>.png` for each requested size instead of the icon set.
pub fn generate_custom_sizes(
    renderer: &IconRenderer,
    sizes: &[u32],
    out_dir: &Path,
    background: Rgba<u8>,
) -> Result<Vec<PathBuf>> {
    println!("Generating custom PNG sizes...");
    let mut written = Vec::new();
    for &size in sizes {
        let icon = renderer.flattened(size, background)?;
        let filename = format!("icon_{size}x{size}.png");
        let path = out_dir.join(&filename);
        save_png(&path, icon.as_raw(), size, size, ColorType::Rgb8)?;
        println!("  ✓ Generated {filename}");
        written.push(path);
    }
    Ok(written)
}

/// Write the four transparent layers as `layer_<size>x<size>_<role>.png`.
pub fn generate_layers(renderer: &IconRenderer, size: u32, out_dir: &Path) -> Result<Vec<PathBuf>> {
    println!("Generating layered components ({size}x{size})...");
    let prefix = format!("layer_{size}x{size}");
    let mut written = Vec::new();

    for layer in renderer.layers(size)? {
        let filename = format!("{prefix}_{}.png", layer.role);
        let path = out_dir.join(&filename);
        save_png(&path, layer.image.as_raw(), size, size, ColorType::Rgba8)?;
        println!("  ✓ Generated {filename}");
        written.push(path);
    }

    Ok(written)
}

fn generate_icns(
    entries: &[SizeSpec],
    rendered: &HashMap<u32, RgbImage>,
    out_dir: &Path,
) -> Result<()> {
    println!("Generating icon.icns...");
    let mut family = IconFamily::new();

    for entry in entries {
        let icon = rendered
            .get(&entry.size)
            .with_context(|| format!("No {0}x{0} render for {1}", entry.size, entry.label))?;
        let rgba = DynamicImage::ImageRgb8(icon.clone()).to_rgba8();

        let mut buf = Vec::new();
        write_png(rgba.as_raw(), &mut buf, entry.size, entry.size, ColorType::Rgba8)?;
        let image = icns::Image::read_png(&buf[..])?;

        let ostype = OSType::from_str(&entry.ostype)
            .map_err(|_| IconError::UnknownOsType(entry.ostype.clone()))?;
        let icon_type = IconType::from_ostype(ostype)
            .ok_or_else(|| IconError::UnknownOsType(entry.ostype.clone()))?;

        family
            .add_icon_with_type(&image, icon_type)
            .with_context(|| format!("Can't add {} to Icns Family", entry.label))?;
    }

    let mut out_file = BufWriter::new(File::create(out_dir.join("icon.icns"))?);
    family.write(&mut out_file)?;
    out_file.flush()?;

    println!("  ✓ Generated icon.icns");
    Ok(())
}

fn save_png(path: &Path, data: &[u8], width: u32, height: u32, color: ColorType) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create PNG file {}", path.display()))?;
    let mut out = BufWriter::new(file);
    write_png(data, &mut out, width, height, color)
        .with_context(|| format!("Failed to write PNG {}", path.display()))?;
    out.flush()?;
    Ok(())
}

// Encode image data as PNG with compression
fn write_png<W: Write>(
    image_data: &[u8],
    w: W,
    width: u32,
    height: u32,
    color: ColorType,
) -> Result<()> {
    let encoder = PngEncoder::new_with_quality(w, CompressionType::Best, PngFilterType::Adaptive);
    encoder.write_image(image_data, width, height, color)?;
    Ok(())
}
