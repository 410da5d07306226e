//! Abstract drawing primitives.
//!
//! Glyph and track painters emit [`DrawCommand`]s into a [`PrimitiveSink`];
//! SVG and raster backends live outside this crate.

use crate::class::Color;
use crate::types::RecordId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// Clickable region reported for a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapItem {
    pub id: RecordId,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    FilledRect {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        color: Color,
    },
    Line {
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        color: Color,
    },
    /// Text laid out inside the box `(x, y, width, height)`.
    Text {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        text: String,
        color: Color,
        align: TextAlign,
    },
    Polygon {
        points: Vec<(i32, i32)>,
        fill: Option<Color>,
        outline: Option<Color>,
    },
    MapItem(MapItem),
}

/// Receiver of draw commands.
pub trait PrimitiveSink {
    fn push(&mut self, command: DrawCommand);

    fn filled_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Color) {
        self.push(DrawCommand::FilledRect { x, y, width, height, color });
    }

    fn line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, color: Color) {
        self.push(DrawCommand::Line { x1, y1, x2, y2, color });
    }

    #[allow(clippy::too_many_arguments)]
    fn text(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        text: &str,
        color: Color,
        align: TextAlign,
    ) {
        self.push(DrawCommand::Text {
            x,
            y,
            width,
            height,
            text: text.to_string(),
            color,
            align,
        });
    }

    fn polygon(&mut self, points: Vec<(i32, i32)>, fill: Option<Color>, outline: Option<Color>) {
        self.push(DrawCommand::Polygon { points, fill, outline });
    }

    fn map_item(&mut self, item: MapItem) {
        self.push(DrawCommand::MapItem(item));
    }
}

impl PrimitiveSink for Vec<DrawCommand> {
    fn push(&mut self, command: DrawCommand) {
        Vec::push(self, command);
    }
}

/// Sink adapter that keeps only what falls inside the columns `[left, right)`.
pub struct ClipSink<'s> {
    inner: &'s mut dyn PrimitiveSink,
    left: i32,
    right: i32,
}

impl<'s> ClipSink<'s> {
    pub fn new(inner: &'s mut dyn PrimitiveSink, left: i32, right: i32) -> Self {
        Self {
            inner,
            left,
            right: right.max(left),
        }
    }
}

impl PrimitiveSink for ClipSink<'_> {
    fn push(&mut self, command: DrawCommand) {
        if let Some(command) = clip_command(command, self.left, self.right) {
            self.inner.push(command);
        }
    }
}

/// Clip `command` to the columns `[left, right)`; `None` when nothing remains.
pub fn clip_command(command: DrawCommand, left: i32, right: i32) -> Option<DrawCommand> {
    match command {
        DrawCommand::FilledRect { x, y, width, height, color } => {
            let (x, width) = clip_span(x, width, left, right)?;
            Some(DrawCommand::FilledRect { x, y, width, height, color })
        }
        DrawCommand::Line { x1, y1, x2, y2, color } => {
            let ((x1, y1), (x2, y2)) = clip_segment((x1, y1), (x2, y2), left, right - 1)?;
            Some(DrawCommand::Line { x1, y1, x2, y2, color })
        }
        DrawCommand::Text {
            x,
            y,
            width,
            height,
            text,
            color,
            align,
        } => {
            let (x, width) = clip_span(x, width, left, right)?;
            Some(DrawCommand::Text {
                x,
                y,
                width,
                height,
                text,
                color,
                align,
            })
        }
        DrawCommand::Polygon { points, fill, outline } => {
            let points = clip_polygon(&points, left, right);
            if points.len() < 3 {
                return None;
            }
            Some(DrawCommand::Polygon { points, fill, outline })
        }
        DrawCommand::MapItem(mut item) => {
            let (x, width) = clip_span(item.x, item.width, left, right)?;
            item.x = x;
            item.width = width;
            Some(DrawCommand::MapItem(item))
        }
    }
}

fn clip_span(x: i32, width: i32, left: i32, right: i32) -> Option<(i32, i32)> {
    let x1 = x.max(left);
    let x2 = x.saturating_add(width).min(right);
    (x2 > x1).then_some((x1, x2 - x1))
}

/// y of the segment `a`-`b` at column `x`. The segment must not be vertical.
fn y_at(a: (i32, i32), b: (i32, i32), x: i32) -> i32 {
    let t = (x - a.0) as f64 / (b.0 - a.0) as f64;
    a.1 + ((b.1 - a.1) as f64 * t).round() as i32
}

/// Clip a segment to the inclusive columns `[lo, hi]`, keeping its direction.
fn clip_segment(a: (i32, i32), b: (i32, i32), lo: i32, hi: i32) -> Option<((i32, i32), (i32, i32))> {
    let swapped = a.0 > b.0;
    let (p, q) = if swapped { (b, a) } else { (a, b) };
    if q.0 < lo || p.0 > hi {
        return None;
    }
    let p2 = if p.0 < lo { (lo, y_at(p, q, lo)) } else { p };
    let q2 = if q.0 > hi { (hi, y_at(p, q, hi)) } else { q };
    Some(if swapped { (q2, p2) } else { (p2, q2) })
}

/// Sutherland-Hodgman against the two vertical edges `x = lo` and `x = hi`.
fn clip_polygon(points: &[(i32, i32)], lo: i32, hi: i32) -> Vec<(i32, i32)> {
    if points.iter().all(|&(x, _)| x >= lo && x <= hi) {
        return points.to_vec();
    }
    let kept = clip_half_plane(points, lo, |x| x >= lo);
    let mut kept = clip_half_plane(&kept, hi, |x| x <= hi);
    kept.dedup();
    kept
}

fn clip_half_plane(points: &[(i32, i32)], edge: i32, inside: impl Fn(i32) -> bool) -> Vec<(i32, i32)> {
    let mut out = Vec::with_capacity(points.len() + 2);
    let Some(&last) = points.last() else {
        return out;
    };
    let mut prev = last;
    for &cur in points {
        match (inside(prev.0), inside(cur.0)) {
            (true, true) => out.push(cur),
            (true, false) => out.push((edge, y_at(prev, cur, edge))),
            (false, true) => {
                out.push((edge, y_at(prev, cur, edge)));
                out.push(cur);
            }
            (false, false) => {}
        }
        prev = cur;
    }
    out
}
