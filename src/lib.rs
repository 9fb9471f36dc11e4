//! Procedural renderer for a synthwave-styled application icon.
//!
//! Each layer generator is a pure function of the icon size. [`IconRenderer`]
//! stacks them into flattened icons or hands them out separately for layered
//! icon formats; [`generate_icons`] writes a whole icon set to disk.

pub mod background;
pub mod builtin_font;
pub mod contents_json;
pub mod draw;
pub mod equalizer;
pub mod error;
pub mod font;
pub mod icon_gen;
pub mod layer;
pub mod sun;
pub mod text;

pub use error::IconError;
pub use font::{BuiltinFont, FontProvider, LabelFont, SystemFonts};
pub use icon_gen::{
    generate_icons, generate_icons_with, icon_set, Config, IconRenderer, Mode, SizeSpec,
};
pub use layer::{Layer, LayerRole};
