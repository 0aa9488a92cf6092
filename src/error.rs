use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IconError {
    #[error("i/o error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("cannot load font {path}: {reason}")]
    FontLoad { path: PathBuf, reason: String },
    #[error("glyph from {path} is only {width:.1}px wide")]
    GlyphTooNarrow { path: PathBuf, width: f32 },
    #[error("no usable glyph font found")]
    NoUsableFont,
}

pub type Result<T> = std::result::Result<T, IconError>;
