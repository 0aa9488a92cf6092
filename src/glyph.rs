//! Emoji glyph rendering from the first usable system font.

use std::fs;
use std::path::{Path, PathBuf};

use ab_glyph::{Font, FontVec, OutlinedGlyph, PxScale, ScaleFont, point};
use image::{Rgba, RgbaImage};
use log::debug;

use crate::config::MIN_GLYPH_WIDTH;
use crate::error::{IconError, Result};

/// Glyph em size relative to the icon edge.
const GLYPH_EM_RATIO: f32 = 0.8;

/// Coverage below this is neither measured nor drawn; anything at or above it
/// changes an 8-bit channel once blended.
const INK_COVERAGE: f32 = 1.0 / 255.0;

/// A laid-out run of glyph outlines plus the pixel box of their ink,
/// measured with the pen at the origin and the baseline one ascent below it.
/// The box is inclusive; an empty run has a zero-sized box at the origin.
pub struct GlyphRun {
    outlines: Vec<OutlinedGlyph>,
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl GlyphRun {
    pub fn is_empty(&self) -> bool {
        self.max_x < self.min_x || self.max_y < self.min_y
    }

    pub fn width(&self) -> i32 {
        if self.is_empty() {
            0
        } else {
            self.max_x - self.min_x + 1
        }
    }

    pub fn height(&self) -> i32 {
        if self.is_empty() {
            0
        } else {
            self.max_y - self.min_y + 1
        }
    }
}

pub fn load_font(path: &Path) -> Result<FontVec> {
    if !path.exists() {
        return Err(IconError::FontLoad {
            path: path.to_path_buf(),
            reason: "not found".into(),
        });
    }
    let data = fs::read(path).map_err(|e| IconError::FontLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    FontVec::try_from_vec_and_index(data, 0).map_err(|e| IconError::FontLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Pixel scale that makes one em of `font` span `em_px` pixels.
fn em_scale(font: &FontVec, em_px: f32) -> PxScale {
    let per_em = font.units_per_em().unwrap_or(1000.0);
    PxScale::from(em_px * font.height_unscaled() / per_em)
}

pub fn layout_glyphs(font: &FontVec, em_px: f32, text: &str) -> GlyphRun {
    let scale = em_scale(font, em_px);
    let scaled = font.as_scaled(scale);
    let mut caret = point(0.0, scaled.ascent());
    let mut run = GlyphRun {
        outlines: Vec::new(),
        min_x: 0,
        min_y: 0,
        max_x: -1,
        max_y: -1,
    };
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (i32::MAX, i32::MAX, i32::MIN, i32::MIN);

    for c in text.chars() {
        let mut glyph = scaled.scaled_glyph(c);
        glyph.position = caret;
        caret.x += scaled.h_advance(glyph.id);
        let Some(outlined) = font.outline_glyph(glyph) else {
            continue;
        };
        let b = outlined.px_bounds();
        let (bx, by) = (b.min.x as i32, b.min.y as i32);
        outlined.draw(|gx, gy, coverage| {
            if coverage >= INK_COVERAGE {
                let x = bx + gx as i32;
                let y = by + gy as i32;
                min_x = min_x.min(x);
                min_y = min_y.min(y);
                max_x = max_x.max(x);
                max_y = max_y.max(y);
            }
        });
        run.outlines.push(outlined);
    }

    if min_x <= max_x {
        run.min_x = min_x;
        run.min_y = min_y;
        run.max_x = max_x;
        run.max_y = max_y;
    }
    run
}

/// Probe `candidates` in order and return the first font whose rendering of
/// `text` is wider than [`MIN_GLYPH_WIDTH`].
pub fn select_font(
    candidates: &[PathBuf],
    em_px: f32,
    text: &str,
) -> Result<(PathBuf, FontVec, GlyphRun)> {
    for path in candidates {
        let font = match load_font(path) {
            Ok(f) => f,
            Err(e) => {
                debug!("skipping font: {}", e);
                continue;
            }
        };
        let run = layout_glyphs(&font, em_px, text);
        let width = run.width() as f32;
        if width > MIN_GLYPH_WIDTH {
            return Ok((path.clone(), font, run));
        }
        let err = IconError::GlyphTooNarrow {
            path: path.clone(),
            width,
        };
        debug!("skipping font: {}", err);
    }
    Err(IconError::NoUsableFont)
}

/// Pen origin that centers an ink box of `w`×`h` whose top-left corner sits at
/// (`min_x`, `min_y`) relative to the pen. The box is clamped into the canvas;
/// a box larger than the canvas is pinned to its top-left edge.
pub fn centered_origin(size: u32, min_x: i32, min_y: i32, w: i32, h: i32) -> (i32, i32) {
    let s = size as i32;
    let left = ((s - w) / 2).min(s - w).max(0);
    let top = ((s - h) / 2).min(s - h).max(0);
    (left - min_x, top - min_y)
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Draw a centered glyph onto a fresh `size`×`size` canvas.
/// Returns the font that was used alongside the image.
pub fn try_render_glyph(
    size: u32,
    text: &str,
    background: Rgba<u8>,
    candidates: &[PathBuf],
) -> Result<(RgbaImage, PathBuf)> {
    let em_px = (size as f32 * GLYPH_EM_RATIO).floor();
    let (path, _font, run) = select_font(candidates, em_px, text)?;
    let (x, y) = centered_origin(size, run.min_x, run.min_y, run.width(), run.height());

    let mut img = RgbaImage::from_pixel(size, size, background);
    for outlined in &run.outlines {
        let b = outlined.px_bounds();
        let ox = x as i64 + b.min.x as i64;
        let oy = y as i64 + b.min.y as i64;
        outlined.draw(|gx, gy, coverage| {
            let px = ox + gx as i64;
            let py = oy + gy as i64;
            if coverage < INK_COVERAGE {
                return;
            }
            if px < 0 || py < 0 || px >= size as i64 || py >= size as i64 {
                return;
            }
            let t = coverage.clamp(0.0, 1.0);
            let p = img.get_pixel_mut(px as u32, py as u32);
            for ch in 0..3 {
                p.0[ch] = lerp(p.0[ch] as f32, 0.0, t).round() as u8;
            }
            p.0[3] = lerp(p.0[3] as f32, 255.0, t).round() as u8;
        });
    }
    Ok((img, path))
}

/// An outline font commonly installed on build hosts, for tests that need
/// real glyphs. `None` when the host has none of them.
#[cfg(test)]
pub(crate) fn host_outline_font() -> Option<PathBuf> {
    [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/Library/Fonts/Arial.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "C:/Windows/Fonts/arial.ttf",
    ]
    .iter()
    .map(PathBuf::from)
    .find(|p| p.exists())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    /// Inclusive bounds of every pixel that differs from the background.
    fn ink_box(img: &RgbaImage, background: Rgba<u8>) -> Option<(u32, u32, u32, u32)> {
        let mut found: Option<(u32, u32, u32, u32)> = None;
        for (x, y, p) in img.enumerate_pixels() {
            if *p == background {
                continue;
            }
            found = Some(match found {
                None => (x, y, x, y),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
            });
        }
        found
    }

    #[test]
    fn missing_font_is_reported() {
        let err = load_font(Path::new("/nonexistent/font.ttf")).err().unwrap();
        assert!(matches!(err, IconError::FontLoad { .. }));
    }

    #[test]
    fn garbage_font_is_rejected() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"definitely not a font").unwrap();
        assert!(load_font(f.path()).is_err());
    }

    #[test]
    fn no_candidates_means_no_font() {
        let res = try_render_glyph(64, "\u{1F4DD}", WHITE, &[]);
        assert!(matches!(res, Err(IconError::NoUsableFont)));
    }

    #[test]
    fn all_bad_candidates_means_no_font() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(&[0u8; 64]).unwrap();
        let candidates = vec![PathBuf::from("/nonexistent/a.ttf"), f.path().to_path_buf()];
        let res = select_font(&candidates, 51.0, "\u{1F4DD}");
        assert!(matches!(res, Err(IconError::NoUsableFont)));
    }

    #[test]
    fn origin_centers_box() {
        // 40px box starting 3px right of and 50px above the pen
        assert_eq!(centered_origin(100, 3, -50, 40, 60), (27, 70));
    }

    #[test]
    fn origin_keeps_box_inside_canvas() {
        let (x, y) = centered_origin(64, -7, 12, 60, 30);
        let (left, top) = (x - 7, y + 12);
        assert!(left >= 0 && left + 60 <= 64);
        assert!(top >= 0 && top + 30 <= 64);

        let (x, y) = centered_origin(32, 5, 5, 80, 80);
        assert_eq!((x + 5, y + 5), (0, 0));
    }

    #[test]
    fn real_font_glyph_is_centered_in_black() {
        let Some(font) = host_outline_font() else {
            eprintln!("no outline font on this host, skipping");
            return;
        };
        for size in [72, 128, 512] {
            let candidates = [font.clone()];
            let (img, used) = try_render_glyph(size, "M", WHITE, &candidates).unwrap();
            assert_eq!(used, font);
            assert_eq!(img.dimensions(), (size, size));

            let (x0, y0, x1, y1) = ink_box(&img, WHITE).expect("glyph left no ink");
            let (left, right) = (x0 as i64, (size - 1 - x1) as i64);
            let (top, bottom) = (y0 as i64, (size - 1 - y1) as i64);
            assert!((left - right).abs() <= 1, "gaps {left}/{right}");
            assert!((top - bottom).abs() <= 1, "gaps {top}/{bottom}");

            let darkest = img.pixels().map(|p| p.0[0]).min().unwrap();
            assert_eq!(darkest, 0);
        }
    }

    #[test]
    fn narrow_glyph_fails_width_check() {
        let Some(font) = host_outline_font() else {
            eprintln!("no outline font on this host, skipping");
            return;
        };
        // a single period is a few pixels wide at this size
        let res = select_font(&[font], 16.0, ".");
        assert!(matches!(res, Err(IconError::NoUsableFont)));
    }

    #[test]
    fn first_working_candidate_wins() {
        let Some(font) = host_outline_font() else {
            eprintln!("no outline font on this host, skipping");
            return;
        };
        let candidates = vec![PathBuf::from("/nonexistent/emoji.ttf"), font.clone()];
        let (used, _, run) = select_font(&candidates, 100.0, "M").unwrap();
        assert_eq!(used, font);
        assert!(run.width() as f32 > MIN_GLYPH_WIDTH);
    }
}
