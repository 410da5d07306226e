//! Genomic-to-pixel mapping and score shading.

use crate::class::Color;
use crate::types::GenomicPos;
use serde::{Deserialize, Serialize};

/// Linear map from the visible window to screen columns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scale {
    pub window_start: GenomicPos,
    pub window_end: GenomicPos,
    pub pixels_per_base: f64,
    /// Left edge of the data area on screen
    pub x_offset: i32,
}

impl Scale {
    pub fn new(window_start: GenomicPos, window_end: GenomicPos, pixels_per_base: f64) -> Self {
        Self {
            window_start,
            window_end,
            pixels_per_base,
            x_offset: 0,
        }
    }

    /// Fit `[window_start, window_end)` into `width` pixels.
    pub fn from_width(window_start: GenomicPos, window_end: GenomicPos, width: u32) -> Self {
        let span = window_end.saturating_sub(window_start).max(1);
        Self::new(window_start, window_end, width as f64 / span as f64)
    }

    pub fn with_x_offset(mut self, x_offset: i32) -> Self {
        self.x_offset = x_offset;
        self
    }

    pub fn base_width(&self) -> u64 {
        self.window_end.saturating_sub(self.window_start)
    }

    /// Screen x of a genomic position, rounded to the nearest pixel.
    pub fn x(&self, pos: i64) -> i32 {
        self.rel_x(pos) + self.x_offset
    }

    /// Like [`Scale::x`] without the data area offset.
    pub fn rel_x(&self, pos: i64) -> i32 {
        ((pos - self.window_start as i64) as f64 * self.pixels_per_base).round() as i32
    }

    /// Screen x one past the last data column.
    pub fn right_edge(&self) -> i32 {
        self.x(self.window_end as i64)
    }

    /// Bases covered by `pixels`, truncated.
    pub fn bp_span(&self, pixels: f64) -> i64 {
        (pixels / self.pixels_per_base) as i64
    }

    pub fn pixels(&self, bases: i64) -> f64 {
        bases as f64 * self.pixels_per_base
    }
}

pub const MAX_SHADE: usize = 9;

/// Bin `value` within `[min, max]` into shades `1..=MAX_SHADE`.
pub fn gray_level(value: i64, min: i64, max: i64) -> usize {
    let range = max - min;
    if range <= 0 {
        return MAX_SHADE;
    }
    let level = ((value - min) * MAX_SHADE as i64 + range / 2) / range;
    level.clamp(1, MAX_SHADE as i64) as usize
}

/// Shade 0 is white, [`MAX_SHADE`] is black.
pub fn shade_of_gray(level: usize) -> Color {
    let level = level.min(MAX_SHADE) as u32;
    let v = (255 - level * 255 / MAX_SHADE as u32) as u8;
    Color::rgb(v, v, v)
}
