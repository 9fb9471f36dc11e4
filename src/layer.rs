use image::RgbaImage;
use std::fmt;

/// Position of a layer in the stack, bottom first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerRole {
    Background,
    Sun,
    Equalizer,
    Text,
}

impl LayerRole {
    pub const ALL: [LayerRole; 4] = [
        LayerRole::Background,
        LayerRole::Sun,
        LayerRole::Equalizer,
        LayerRole::Text,
    ];

    /// File name component used by layered export.
    pub fn name(self) -> &'static str {
        match self {
            LayerRole::Background => "background",
            LayerRole::Sun => "sun",
            LayerRole::Equalizer => "equalizer",
            LayerRole::Text => "text",
        }
    }
}

impl fmt::Display for LayerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone)]
pub struct Layer {
    pub role: LayerRole,
    pub image: RgbaImage,
}

impl Layer {
    pub fn new(role: LayerRole, image: RgbaImage) -> Self {
        Self { role, image }
    }
}
