//! Visual extents: the genomic span a glyph occupies on screen, including
//! its left label and capped unaligned arms.

use crate::config::GlyphConstants;
use crate::font::TextMeasure;
use crate::scale::Scale;
use crate::types::AnnotationRecord;
use serde::{Deserialize, Serialize};

/// Half-open genomic interval. `start` may be negative once a label or an
/// arm reaches past the chromosome start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Extent {
    pub start: i64,
    pub end: i64,
}

impl Extent {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    pub fn width(&self) -> i64 {
        self.end - self.start
    }

    pub fn overlaps(&self, other: &Extent, tolerance: i64) -> bool {
        self.start - tolerance < other.end && self.end + tolerance > other.start
    }
}

/// Everything extent computation and glyph drawing must agree on.
///
/// Layout and rendering build this from the same configuration so a glyph
/// never paints outside the extent its row was assigned with.
#[derive(Clone, Copy)]
pub struct GlyphContext<'a> {
    pub scale: Scale,
    pub constants: &'a GlyphConstants,
    pub font: &'a dyn TextMeasure,
    pub show_labels: bool,
    pub show_unaligned_arms: bool,
}

impl<'a> GlyphContext<'a> {
    pub fn new(scale: Scale, constants: &'a GlyphConstants, font: &'a dyn TextMeasure) -> Self {
        Self {
            scale,
            constants,
            font,
            show_labels: true,
            show_unaligned_arms: true,
        }
    }

    pub fn with_labels(mut self, show_labels: bool) -> Self {
        self.show_labels = show_labels;
        self
    }

    pub fn with_arms(mut self, show_unaligned_arms: bool) -> Self {
        self.show_unaligned_arms = show_unaligned_arms;
        self
    }

    /// Label width in pixels including padding.
    pub fn label_width(&self, text: &str) -> i32 {
        self.font.string_width(text) + self.constants.label_padding
    }

    /// Whether an arm of `len` bases is too long to draw to scale.
    pub fn arm_is_capped(&self, len: i64) -> bool {
        self.scale.pixels(len) > self.constants.max_unaligned_pixel_len
    }

    /// Bases an unaligned arm adds to the extent.
    pub fn arm_extent(&self, len: i64) -> i64 {
        if self.arm_is_capped(len) {
            self.scale.bp_span(self.constants.max_unaligned_pixel_len)
                + self.scale.bp_span(self.label_width(&len.to_string()) as f64)
        } else {
            len
        }
    }
}

impl std::fmt::Debug for GlyphContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlyphContext")
            .field("scale", &self.scale)
            .field("show_labels", &self.show_labels)
            .field("show_unaligned_arms", &self.show_unaligned_arms)
            .finish()
    }
}

/// Genomic span covered by the record's glyph.
pub fn visual_extent(record: &AnnotationRecord, ctx: &GlyphContext<'_>) -> Extent {
    let mut start = record.align_start as i64;
    let mut end = record.align_end as i64;

    if ctx.show_labels {
        start -= ctx.scale.bp_span(ctx.label_width(&record.name) as f64);
        start = start.max(0);
    }

    if ctx.show_unaligned_arms {
        if let Some(arm) = record.leading_arm() {
            start -= ctx.arm_extent(arm);
        }
        if let Some(arm) = record.trailing_arm() {
            end += ctx.arm_extent(arm);
        }
    }

    Extent { start, end }
}
