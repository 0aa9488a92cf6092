use std::fmt;
use std::path::PathBuf;

use image::{Rgba, RgbaImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_filled_rect_mut, draw_hollow_polygon_mut, draw_hollow_rect_mut,
    draw_polygon_mut,
};
use imageproc::point::Point;
use log::{debug, warn};

use crate::config::GeneratorConfig;
use crate::error::IconError;
use crate::glyph::try_render_glyph;
use crate::layout::{Frame, MemoLayout, memo_layout};

// Memo palette
const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const PAPER_SHADOW: Rgba<u8> = Rgba([230, 230, 230, 255]);
const PAPER_OUTLINE: Rgba<u8> = Rgba([200, 200, 200, 255]);
const TEXT: Rgba<u8> = Rgba([50, 50, 50, 255]);
const HIGHLIGHT: Rgba<u8> = Rgba([255, 255, 255, 100]);
const PENCIL_WOOD: Rgba<u8> = Rgba([210, 180, 140, 255]);
const PENCIL_WOOD_OUTLINE: Rgba<u8> = Rgba([180, 150, 100, 255]);
const PENCIL_METAL: Rgba<u8> = Rgba([192, 192, 192, 255]);
const PENCIL_METAL_OUTLINE: Rgba<u8> = Rgba([150, 150, 150, 255]);
const PENCIL_ERASER: Rgba<u8> = Rgba([255, 192, 203, 255]);
const PENCIL_ERASER_OUTLINE: Rgba<u8> = Rgba([240, 160, 180, 255]);
const PENCIL_TIP: Rgba<u8> = Rgba([169, 169, 169, 255]);
const PENCIL_TIP_OUTLINE: Rgba<u8> = Rgba([120, 120, 120, 255]);

pub const BORDER: Rgba<u8> = Rgba([220, 220, 220, 128]);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderPath {
    Glyph(PathBuf),
    Procedural,
}

impl fmt::Display for RenderPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderPath::Glyph(font) => write!(f, "glyph from {}", font.display()),
            RenderPath::Procedural => write!(f, "procedural memo"),
        }
    }
}

pub struct RenderedIcon {
    pub image: RgbaImage,
    pub path: RenderPath,
}

/// Render `glyph` centered on a `background` canvas, or the procedural memo
/// when none of `fonts` can draw it.
pub fn render_glyph_icon(
    size: u32,
    glyph: &str,
    background: Rgba<u8>,
    fonts: &[PathBuf],
) -> (RgbaImage, RenderPath) {
    match try_render_glyph(size, glyph, background, fonts) {
        Ok((img, font)) => (img, RenderPath::Glyph(font)),
        Err(IconError::NoUsableFont) => {
            debug!("no emoji font for {}px, drawing memo", size);
            (procedural_on(size, background), RenderPath::Procedural)
        }
        Err(e) => {
            warn!("glyph rendering failed for {}px: {}", size, e);
            (procedural_on(size, background), RenderPath::Procedural)
        }
    }
}

/// The memo-and-pencil composition on a white canvas.
pub fn render_procedural_icon(size: u32) -> RgbaImage {
    procedural_on(size, WHITE)
}

fn procedural_on(size: u32, background: Rgba<u8>) -> RgbaImage {
    let mut img = RgbaImage::from_pixel(size, size, background);
    draw_memo(&mut img, &memo_layout(size));
    img
}

/// Full pipeline for one icon: glyph or memo, then the border.
pub fn render_icon(size: u32, cfg: &GeneratorConfig) -> RenderedIcon {
    let (mut image, path) =
        render_glyph_icon(size, &cfg.glyph, cfg.background, &cfg.font_candidates);
    add_border(&mut image, size);
    RenderedIcon { image, path }
}

fn fill(img: &mut RgbaImage, frame: Frame, color: Rgba<u8>) {
    if let Some(rect) = frame.to_rect() {
        draw_filled_rect_mut(img, rect, color);
    }
}

/// Filled rectangle whose outline grows inwards by `width` pixels.
fn framed(img: &mut RgbaImage, frame: Frame, color: Rgba<u8>, outline: Rgba<u8>, width: i32) {
    fill(img, frame, color);
    for i in 0..width {
        if let Some(rect) = frame.inset(i).to_rect() {
            draw_hollow_rect_mut(img, rect, outline);
        }
    }
}

pub fn draw_memo(img: &mut RgbaImage, layout: &MemoLayout) {
    fill(img, layout.shadow, PAPER_SHADOW);
    let paper_width = layout.paper_outline_width;
    framed(img, layout.paper, WHITE, PAPER_OUTLINE, paper_width);

    for line in &layout.text_lines {
        fill(img, *line, TEXT);
    }

    let p = &layout.pencil;
    let w = p.outline_width;
    framed(img, p.wood, PENCIL_WOOD, PENCIL_WOOD_OUTLINE, w);
    framed(img, p.ferrule, PENCIL_METAL, PENCIL_METAL_OUTLINE, w);
    framed(img, p.eraser, PENCIL_ERASER, PENCIL_ERASER_OUTLINE, w);

    let tip: Vec<Point<i32>> = p.tip.iter().map(|&(x, y)| Point::new(x, y)).collect();
    draw_polygon_mut(img, &tip, PENCIL_TIP);
    let tip_outline: Vec<Point<f32>> = p
        .tip
        .iter()
        .map(|&(x, y)| Point::new(x as f32, y as f32))
        .collect();
    draw_hollow_polygon_mut(img, &tip_outline, PENCIL_TIP_OUTLINE);

    fill(img, layout.highlight, HIGHLIGHT);

    let d = layout.dot;
    draw_filled_circle_mut(img, (d.cx, d.cy), d.radius, TEXT);
}

/// Rounded-rectangle outline hugging the canvas edge.
pub fn add_border(img: &mut RgbaImage, size: u32) {
    let stroke = (size / 128).max(1);
    let radius = (size / 16) as f32;
    let w = stroke as f32;
    // outer edge spans [stroke, size - stroke] in pixel-edge coordinates
    let lo = w;
    let hi = size as f32 - w;
    let (inner_lo, inner_hi) = (lo + w, hi - w);
    let inner_radius = (radius - w).max(0.0);

    for y in 0..img.height() {
        for x in 0..img.width() {
            let px = x as f32 + 0.5;
            let py = y as f32 + 0.5;
            let in_outer = in_rounded_rect(px, py, lo, lo, hi, hi, radius);
            let in_inner =
                in_rounded_rect(px, py, inner_lo, inner_lo, inner_hi, inner_hi, inner_radius);
            if in_outer && !in_inner {
                img.put_pixel(x, y, BORDER);
            }
        }
    }
}

fn in_rounded_rect(px: f32, py: f32, x0: f32, y0: f32, x1: f32, y1: f32, r: f32) -> bool {
    if px < x0 || px > x1 || py < y0 || py > y1 {
        return false;
    }
    let r = r.min((x1 - x0) / 2.0).min((y1 - y0) / 2.0).max(0.0);
    let cx = px.clamp(x0 + r, x1 - r);
    let cy = py.clamp(y0 + r, y1 - r);
    let dx = px - cx;
    let dy = py - cy;
    dx * dx + dy * dy <= r * r
}
