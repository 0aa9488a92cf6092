use std::path::PathBuf;

use image::Rgba;

/// Sizes of the regular PWA icons written to `assets/icons/icon-{size}x{size}.png`.
pub const PWA_ICON_SIZES: [u32; 8] = [72, 96, 128, 144, 152, 192, 384, 512];
pub const FAVICON_SIZE: u32 = 32;
pub const APPLE_TOUCH_ICON_SIZE: u32 = 180;

/// A rendered glyph narrower than this is treated as a missing-glyph box.
pub const MIN_GLYPH_WIDTH: f32 = 10.0;

pub const MEMO_GLYPH: &str = "\u{1F4DD}";

/// Emoji fonts probed in order; the first one that renders the glyph wins.
pub const FONT_CANDIDATES: [&str; 5] = [
    "C:/Windows/Fonts/seguiemj.ttf",
    "C:/Windows/Fonts/segmdl2.ttf",
    "C:/Windows/Fonts/NotoColorEmoji.ttf",
    "/System/Library/Fonts/Apple Color Emoji.ttc",
    "/usr/share/fonts/truetype/noto/NotoColorEmoji.ttf",
];

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Root that `icons_dir` and the favicon are resolved against.
    pub output_root: PathBuf,
    pub icons_dir: PathBuf,
    pub favicon_name: String,
    pub apple_touch_name: String,
    pub sizes: Vec<u32>,
    pub favicon_size: u32,
    pub apple_touch_size: u32,
    pub glyph: String,
    pub background: Rgba<u8>,
    pub font_candidates: Vec<PathBuf>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from("."),
            icons_dir: PathBuf::from("assets/icons"),
            favicon_name: "favicon.ico".to_string(),
            apple_touch_name: "apple-touch-icon.png".to_string(),
            sizes: PWA_ICON_SIZES.to_vec(),
            favicon_size: FAVICON_SIZE,
            apple_touch_size: APPLE_TOUCH_ICON_SIZE,
            glyph: MEMO_GLYPH.to_string(),
            background: Rgba([255, 255, 255, 255]),
            font_candidates: FONT_CANDIDATES.iter().map(PathBuf::from).collect(),
        }
    }
}

impl GeneratorConfig {
    /// Default layout written below `root` instead of the working directory.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            output_root: root.into(),
            ..Self::default()
        }
    }

    pub fn icons_path(&self) -> PathBuf {
        self.output_root.join(&self.icons_dir)
    }
}
