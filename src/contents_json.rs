//! Contents.json data model for an `AppIcon.appiconset` asset catalog folder
//!
//! Only the keys a macOS app icon set uses are modelled; Xcode ignores
//! absent optional keys.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tool name recorded in the `info.author` field.
pub const AUTHOR: &str = "synthwave-icon";

/// Root structure of a Contents.json file
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ContentsFile {
    /// One entry per rendered size and scale
    pub images: Vec<ImageEntry>,

    /// Versioning and authorship information
    pub info: Info,
}

/// Individual image entry within an asset catalog
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ImageEntry {
    /// The PNG file name, relative to the icon set folder
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    /// The device type for the image, always "mac" here
    pub idiom: String,

    /// The scale factor for the image ("1x" or "2x")
    pub scale: String,

    /// The size of the image in points (e.g. "16x16")
    pub size: String,
}

/// Versioning and authorship information for the asset catalog
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Info {
    /// The format version of the asset catalog (always 1)
    pub version: u8,

    /// The application or tool that authored the asset catalog
    pub author: String,
}

impl ContentsFile {
    pub fn new(author: String) -> Self {
        Self {
            images: Vec::new(),
            info: Info { version: 1, author },
        }
    }

    pub fn add_image(&mut self, image: ImageEntry) {
        self.images.push(image);
    }

    /// Serialize as pretty JSON into `dir/Contents.json`.
    pub fn write_to_dir(&self, dir: &Path) -> Result<()> {
        let contents_json =
            serde_json::to_string_pretty(self).context("Failed to serialize Contents.json")?;
        std::fs::write(dir.join("Contents.json"), contents_json)
            .context("Failed to write Contents.json file")?;
        Ok(())
    }
}

impl ImageEntry {
    /// Entry for a macOS icon labelled like `16x16` or `16x16@2x`.
    ///
    /// The point size drops the `@2x` suffix, which moves into `scale`.
    pub fn mac(filename: String, label: &str) -> Self {
        let (size, scale) = match label.strip_suffix("@2x") {
            Some(base) => (base.to_string(), "2x"),
            None => (label.to_string(), "1x"),
        };
        Self {
            filename: Some(filename),
            idiom: "mac".to_string(),
            scale: scale.to_string(),
            size,
        }
    }
}

impl Default for Info {
    fn default() -> Self {
        Self {
            version: 1,
            author: AUTHOR.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retina_label_moves_into_scale() {
        let entry = ImageEntry::mac("icon_16x16@2x.png".to_string(), "16x16@2x");
        assert_eq!(entry.size, "16x16");
        assert_eq!(entry.scale, "2x");
        assert_eq!(entry.idiom, "mac");

        let entry = ImageEntry::mac("icon_512x512.png".to_string(), "512x512");
        assert_eq!(entry.size, "512x512");
        assert_eq!(entry.scale, "1x");
    }

    #[test]
    fn serializes_catalog_layout() {
        let mut contents = ContentsFile::new(AUTHOR.to_string());
        contents.add_image(ImageEntry::mac("icon_32x32.png".to_string(), "32x32"));

        let value = serde_json::to_value(&contents).unwrap();
        assert_eq!(value["info"]["version"], 1);
        assert_eq!(value["info"]["author"], AUTHOR);
        assert_eq!(value["images"][0]["filename"], "icon_32x32.png");
        assert_eq!(value["images"][0]["size"], "32x32");
    }

    #[test]
    fn writes_file_into_directory() {
        let dir = tempfile::tempdir().unwrap();
        let contents = ContentsFile::new(AUTHOR.to_string());
        contents.write_to_dir(dir.path()).unwrap();

        let text = std::fs::read_to_string(dir.path().join("Contents.json")).unwrap();
        let parsed: ContentsFile = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, contents);
        assert_eq!(parsed.info, Info::default());
    }
}
