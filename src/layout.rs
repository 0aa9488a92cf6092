//! Geometry of the procedural memo icon.
//!
//! Every measurement is derived from the icon size alone, so the composition
//! scales from favicon to splash-screen sizes without hand tuning. Rectangles
//! use inclusive corner coordinates: `Frame { x0: 2, x1: 4, .. }` covers three
//! pixel columns.

use imageproc::rect::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl Frame {
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> i32 {
        self.x1 - self.x0 + 1
    }

    pub fn height(&self) -> i32 {
        self.y1 - self.y0 + 1
    }

    /// `None` for frames whose far corner lies before the near one.
    pub fn to_rect(&self) -> Option<Rect> {
        if self.x1 < self.x0 || self.y1 < self.y0 {
            return None;
        }
        let (w, h) = (self.width() as u32, self.height() as u32);
        Some(Rect::at(self.x0, self.y0).of_size(w, h))
    }

    /// Shrink by `by` pixels on every side.
    pub fn inset(&self, by: i32) -> Frame {
        Frame::new(self.x0 + by, self.y0 + by, self.x1 - by, self.y1 - by)
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Frame {
        Frame::new(self.x0 + dx, self.y0 + dy, self.x1 + dx, self.y1 + dy)
    }

    pub fn contains(&self, other: &Frame) -> bool {
        other.x0 >= self.x0 && other.y0 >= self.y0 && other.x1 <= self.x1 && other.y1 <= self.y1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dot {
    pub cx: i32,
    pub cy: i32,
    pub radius: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PencilLayout {
    /// Whole pencil body, tip excluded.
    pub body: Frame,
    pub wood: Frame,
    pub ferrule: Frame,
    pub eraser: Frame,
    /// Apex first, then the two base corners sitting on top of the wood.
    pub tip: [(i32, i32); 3],
    pub outline_width: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoLayout {
    pub size: u32,
    pub paper: Frame,
    pub shadow: Frame,
    pub paper_outline_width: i32,
    /// Number of lines requested for this size; `text_lines` may hold fewer.
    pub line_count: i32,
    pub text_lines: Vec<Frame>,
    pub pencil: PencilLayout,
    pub highlight: Frame,
    pub dot: Dot,
}

/// Truncating multiply, the way every proportional length is rounded.
#[inline]
fn scaled(size: i32, ratio: f64) -> i32 {
    (size as f64 * ratio) as i32
}

pub fn line_count(size: u32) -> i32 {
    (size as i32 / 40).clamp(3, 6)
}

pub fn memo_layout(size: u32) -> MemoLayout {
    let s = size as i32;
    let margin = s / 16;

    let paper_w = scaled(s, 0.65);
    let paper_h = scaled(s, 0.75);
    let paper_x = (s - paper_w) / 2;
    let paper_y = (s - paper_h) / 2;
    let paper = Frame::new(paper_x, paper_y, paper_x + paper_w, paper_y + paper_h);

    let shadow_offset = (s / 40).max(2);
    let shadow = paper.offset(shadow_offset, shadow_offset);

    let n = line_count(size);
    let spacing = paper_h / (n + 2);
    let line_start = paper_x + paper_w / 8;
    let line_end = paper_x + paper_w - paper_w / 8;
    let thickness = (s / 80).max(1);
    let first_y = paper_y + spacing;

    let text_lines = (0..n)
        .map(|i| (i, first_y + spacing * i))
        .filter(|&(_, y)| y < paper_y + paper_h - spacing)
        .map(|(i, y)| {
            let shortened = (i % 3) * (paper_w / 12);
            Frame::new(line_start, y, line_end - shortened, y + thickness)
        })
        .collect();

    let pencil = pencil_layout(s, margin, paper_x + paper_w, paper_y + paper_h);

    let highlight = Frame::new(
        paper_x + 2,
        paper_y + 2,
        paper_x + (s / 64).max(1) + 2,
        paper_y + paper_h / 4,
    );

    let dot = Dot {
        cx: line_end - paper_w / 6,
        cy: first_y + spacing * (n / 2) + thickness / 2,
        radius: (s / 50).max(2) / 2,
    };

    MemoLayout {
        size,
        paper,
        shadow,
        paper_outline_width: (s / 100).max(1),
        line_count: n,
        text_lines,
        pencil,
        highlight,
        dot,
    }
}

fn pencil_layout(s: i32, margin: i32, paper_right: i32, paper_bottom: i32) -> PencilLayout {
    let length = scaled(s, 0.45);
    let width = (s / 32).max(3);

    let mut x = paper_right + (s / 40).max(4);
    let mut y = paper_bottom - length + (s / 20).max(8);

    if x + width > s - margin {
        x = s - width - margin;
    }
    if y < margin {
        y = margin;
    }
    if y + length > s - margin {
        y = s - length - margin;
    }

    let wood_h = scaled(length, 0.7);
    let wood = Frame::new(x, y, x + width, y + wood_h);

    let ferrule_y = y + wood_h;
    let ferrule_h = scaled(length, 0.12).max(2);
    let ferrule = Frame::new(x, ferrule_y, x + width, ferrule_y + ferrule_h);

    let eraser_y = ferrule_y + ferrule_h;
    let eraser_h = scaled(length, 0.15).max(2);
    let eraser_end = (eraser_y + eraser_h).min(y + length);
    let eraser = Frame::new(x, eraser_y, x + width, eraser_end);

    let tip_h = scaled(length, 0.08).max(2);
    let tip = [(x + width / 2, y - tip_h), (x, y), (x + width, y)];

    PencilLayout {
        body: Frame::new(x, y, x + width, y + length),
        wood,
        ferrule,
        eraser,
        tip,
        outline_width: (s / 128).max(1),
    }
}
