use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use synthwave_icon::{icon_gen::parse_css_color, Config, Mode};

#[derive(Debug, Parser)]
#[clap(
    name = "synthwave-icon",
    about = "Render the synthwave app icon set and its transparency layers"
)]
struct Args {
    /// Output directory.
    #[clap(short, long, value_name = "DIR", default_value = "./AppIcon.appiconset")]
    output: PathBuf,

    /// What to generate.
    #[clap(long, value_enum, default_value_t = Mode::All)]
    mode: Mode,

    /// Label drawn across the bottom of the icon.
    #[clap(long, default_value = "MacAmp")]
    label: String,

    /// Label color (CSS color format)
    #[clap(long, default_value = "#ffffff")]
    text_color: String,

    /// Color the flattened icons are composited onto (CSS color format)
    #[clap(long, default_value = "#ffffff")]
    background: String,

    /// Gaussian blur sigma for flattened icons, 0 to disable.
    #[clap(long, value_name = "SIGMA", default_value_t = 1.0)]
    blur: f32,

    /// Pixel size of the exported layers.
    #[clap(long, value_name = "PX", default_value_t = 1024)]
    layer_size: u32,

    /// Custom PNG icon sizes to generate. When set, these replace the icon set.
    #[clap(short, long, value_delimiter = ',', value_name = "SIZES")]
    png: Option<Vec<u32>>,

    /// TrueType font to try before the well-known system fonts.
    #[clap(long, value_name = "PATH")]
    font: Option<PathBuf>,

    /// Also pack the icon set into icon.icns
    #[clap(long)]
    icns: bool,
}

impl Args {
    fn into_config(self) -> Result<Config> {
        Ok(Config {
            output: self.output,
            mode: self.mode,
            label: self.label,
            text_color: parse_css_color(&self.text_color)?,
            background: parse_css_color(&self.background)?,
            blur_sigma: self.blur,
            layer_size: self.layer_size,
            png: self.png,
            font: self.font,
            icns: self.icns,
        })
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Args::parse().into_config()?;
    synthwave_icon::generate_icons(&config)
}
