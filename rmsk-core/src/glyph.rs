//! Detailed glyph for a joined repeat record.
//!
//! Aligned blocks are gray boxes (darker = less diverged) outlined in the
//! class color, with strand chevrons and pointed ends on the first and last
//! aligned block. Unaligned consensus is drawn as dashed lines above the
//! boxes: the 5' and 3' arms end in a vertical cap and switch to a
//! fixed-length line with a `//len//` hash once too long to draw to scale.

use crate::class::{ClassColorTable, Color};
use crate::draw::{ClipSink, PrimitiveSink, TextAlign};
use crate::error::RmskResult;
use crate::extent::{visual_extent, GlyphContext};
use crate::scale::{gray_level, shade_of_gray};
use crate::types::{AnnotationRecord, Strand};

/// Half-height of the vertical cap ending an unaligned arm.
const CAP_HALF_HEIGHT: i32 = 3;
/// Width of one slash of the hash mark.
const HASH_SLASH_WIDTH: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GlyphOutcome {
    /// The label did not fit left of the glyph and goes to the left margin.
    pub left_label: bool,
}

/// End treatment of an aligned block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockShape {
    Plain,
    /// Notched at the 3' end of a reverse block, 5' end of a forward one
    Tail,
    /// Arrow point at the block's downstream end
    Point,
    /// Sole aligned block: point and tail together
    Directional,
}

impl BlockShape {
    /// Shape of aligned block `index` within a record of `block_count` blocks.
    pub fn for_block(index: usize, block_count: usize, strand: Strand) -> Self {
        let reverse = strand == Strand::Reverse;
        if index == 1 && block_count == 3 {
            BlockShape::Directional
        } else if index == 1 {
            if reverse {
                BlockShape::Point
            } else {
                BlockShape::Tail
            }
        } else if block_count >= 2 && index == block_count - 2 {
            if reverse {
                BlockShape::Tail
            } else {
                BlockShape::Point
            }
        } else {
            BlockShape::Plain
        }
    }
}

/// Vertical layout of one glyph row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RowGeometry {
    y: i32,
    height: i32,
    aligned_offset: i32,
    aligned_height: i32,
    unaligned_offset: i32,
}

impl RowGeometry {
    fn new(y: i32, height: i32) -> Self {
        let aligned_height = height / 2;
        let unaligned_height = (height as f64 * 0.75) as i32;
        Self {
            y,
            height,
            aligned_offset: height - aligned_height,
            aligned_height,
            unaligned_offset: height - unaligned_height,
        }
    }

    fn aligned_top(&self) -> i32 {
        self.y + self.aligned_offset
    }

    fn arm_y(&self) -> i32 {
        self.y + self.unaligned_offset
    }
}

/// Draws detailed glyphs at a given row pitch.
pub struct GlyphPainter<'a> {
    pub ctx: GlyphContext<'a>,
    pub classes: &'a ClassColorTable,
    /// Height of the glyph itself
    pub item_height: i32,
    /// Vertical distance between rows
    pub line_height: i32,
    pub y_offset: i32,
    pub gray_range: (i64, i64),
}

impl<'a> GlyphPainter<'a> {
    pub fn new(ctx: GlyphContext<'a>, classes: &'a ClassColorTable, item_height: i32) -> Self {
        Self {
            ctx,
            classes,
            item_height,
            line_height: item_height + 1,
            y_offset: 0,
            gray_range: (6000, 10000),
        }
    }

    pub fn with_line_height(mut self, line_height: i32) -> Self {
        self.line_height = line_height;
        self
    }

    pub fn with_y_offset(mut self, y_offset: i32) -> Self {
        self.y_offset = y_offset;
        self
    }

    pub fn with_gray_range(mut self, min: i64, max: i64) -> Self {
        self.gray_range = (min, max);
        self
    }

    /// Fill shade for a record: identity `10000 - score` on the gray ramp.
    pub fn fill_for(&self, record: &AnnotationRecord) -> Color {
        let identity = 10_000 - record.score as i64;
        shade_of_gray(gray_level(identity, self.gray_range.0, self.gray_range.1))
    }

    pub fn row_y(&self, row: usize) -> i32 {
        self.y_offset + row as i32 * self.line_height
    }

    /// Draw `record` on `row`.
    pub fn render_glyph(
        &self,
        record: &AnnotationRecord,
        row: usize,
        sink: &mut dyn PrimitiveSink,
    ) -> RmskResult<GlyphOutcome> {
        record.check_renderable()?;

        let scale = &self.ctx.scale;
        let mut clipped = ClipSink::new(sink, scale.x_offset, scale.right_edge());
        let sink: &mut dyn PrimitiveSink = &mut clipped;

        let geom = RowGeometry::new(self.row_y(row), self.item_height);
        let fill = self.fill_for(record);
        let outline = self.classes.resolve(&record.name).color;
        let n = record.block_count;

        let mut label_anchor: Option<i32> = None;

        for idx in 0..n {
            if record.is_aligned(idx) {
                let x1 = self.draw_aligned_block(record, idx, &geom, fill, outline, sink);
                label_anchor.get_or_insert(x1);
            } else if idx == 0 {
                label_anchor = Some(self.draw_leading_arm(record, &geom, sink));
            } else if idx == n - 1 {
                self.draw_trailing_arm(record, &geom, sink);
            } else {
                self.draw_middle_unaligned(record, idx, &geom, sink);
            }
        }

        let mut outcome = GlyphOutcome::default();
        if self.ctx.show_labels {
            let anchor = label_anchor.unwrap_or_else(|| scale.x(record.align_start as i64));
            outcome.left_label = self.draw_label(record, anchor, &geom, sink);
        }
        Ok(outcome)
    }

    /// Returns the unclamped left edge of the block.
    fn draw_aligned_block(
        &self,
        record: &AnnotationRecord,
        idx: usize,
        geom: &RowGeometry,
        fill: Color,
        outline: Color,
        sink: &mut dyn PrimitiveSink,
    ) -> i32 {
        let start = record.chrom_start as i64 + record.block_rel_starts[idx];
        let end = start + record.block_sizes[idx];
        let left = self.ctx.scale.x(start);
        let x1 = left.max(self.ctx.scale.x_offset);
        let x2 = self.ctx.scale.x(end).min(self.ctx.scale.right_edge());
        if x2 < x1 {
            // Entirely outside the data area.
            return left;
        }
        let width = (x2 - x1).max(1);

        let shape = BlockShape::for_block(idx, record.block_count, record.strand);
        draw_block(
            sink,
            shape,
            record.strand,
            x1,
            geom.aligned_top(),
            width,
            geom.aligned_height,
            fill,
            outline,
        );
        chevrons(
            sink,
            x1 + 1,
            geom.aligned_top() + geom.aligned_height / 2,
            width - 2,
            geom.aligned_height / 2 - 2,
            self.ctx.constants.chevron_spacing,
            record.strand.direction(),
            Color::WHITE,
        );
        left
    }

    /// 5' arm. Returns the x where the glyph starts, for label placement.
    fn draw_leading_arm(
        &self,
        record: &AnnotationRecord,
        geom: &RowGeometry,
        sink: &mut dyn PrimitiveSink,
    ) -> i32 {
        let scale = &self.ctx.scale;
        let arm = record.block_sizes[0];
        let first_start = record.chrom_start as i64 + record.block_rel_starts[1];
        let lx2 = scale.x(first_start);

        if !self.ctx.show_unaligned_arms {
            return lx2;
        }

        let y = geom.arm_y();
        if self.ctx.arm_is_capped(arm) {
            let lx1 = scale.x(first_start - scale.bp_span(self.ctx.constants.max_unaligned_pixel_len));
            self.dashed_line_with_hash(sink, lx1, lx2, y, &arm.to_string());
            sink.line(lx2, geom.aligned_top(), lx2, y, Color::BLACK);
            end_cap(sink, lx1, y);
            lx1
        } else {
            let lx1 = scale.x(first_start - arm);
            if lx2 - lx1 >= self.ctx.constants.min_visible_ext_pixels {
                self.dashed_line(sink, lx1, lx2, y);
                sink.line(lx2, geom.aligned_top(), lx2, y, Color::BLACK);
                end_cap(sink, lx1, y);
            }
            lx1
        }
    }

    /// 3' arm.
    fn draw_trailing_arm(&self, record: &AnnotationRecord, geom: &RowGeometry, sink: &mut dyn PrimitiveSink) {
        if !self.ctx.show_unaligned_arms {
            return;
        }
        let scale = &self.ctx.scale;
        let idx = record.block_count - 1;
        let arm = record.block_sizes[idx];
        let last_end =
            record.chrom_start as i64 + record.block_rel_starts[idx - 1] + record.block_sizes[idx - 1];
        let lx1 = scale.x(last_end);
        let y = geom.arm_y();

        if self.ctx.arm_is_capped(arm) {
            let lx2 = scale.x(last_end + scale.bp_span(self.ctx.constants.max_unaligned_pixel_len));
            self.dashed_line_with_hash(sink, lx1, lx2, y, &arm.to_string());
            sink.line(lx1, geom.aligned_top(), lx1, y, Color::BLACK);
            end_cap(sink, lx2, y);
        } else {
            let lx2 = scale.x(last_end + arm);
            if lx2 - lx1 >= self.ctx.constants.min_visible_ext_pixels {
                self.dashed_line(sink, lx1, lx2, y);
                sink.line(lx1, geom.aligned_top(), lx1, y, Color::BLACK);
                end_cap(sink, lx2, y);
            }
        }
    }

    /// Unaligned consensus between two aligned blocks.
    fn draw_middle_unaligned(
        &self,
        record: &AnnotationRecord,
        idx: usize,
        geom: &RowGeometry,
        sink: &mut dyn PrimitiveSink,
    ) {
        let scale = &self.ctx.scale;
        let chrom_start = record.chrom_start as i64;
        let prev_size = record.block_sizes[idx - 1];
        let next_size = record.block_sizes[idx + 1];
        let prev_end = record.block_rel_starts[idx - 1] + prev_size;
        let next_start = record.block_rel_starts[idx + 1];
        let aligned_gap = next_start - prev_end;
        let una_size = record.block_sizes[idx];
        let overlap = una_size - aligned_gap;
        let top = geom.aligned_top();
        let y = geom.arm_y();

        if una_size < 0 {
            // Consensus repeated across the junction: a V from the
            // overlapped part of the previous block to the next block.
            let una_size = una_size.max(-prev_size);
            let lx1 = scale.x(chrom_start + prev_end + una_size).max(scale.x_offset);
            let lx2 = scale.x(chrom_start + next_start);
            let mid = (lx2 - lx1) / 2 + lx1;
            sink.line(lx1, top, lx1, top + geom.aligned_height, Color::BLACK);
            sink.line(lx1, top, mid, y, Color::BLACK);
            sink.line(lx2, top, mid, y, Color::BLACK);
            return;
        }

        let fraction = self.ctx.constants.overlap_shorten_fraction;
        let prev_share = fraction * prev_size as f64;
        let next_share = fraction * next_size as f64;
        let half_overlap = overlap as f64 * 0.5;

        let cx1 = scale.x(chrom_start + prev_end);
        let cx2 = scale.x(chrom_start + next_start);

        if overlap > 0 && (half_overlap > prev_share || half_overlap > next_share) {
            // Too long to fit over the flanking blocks: shorten and label.
            let small = (prev_share as i64).min(next_share as i64);
            let shown = small * 2 + aligned_gap;
            let rel_start = prev_end - small;
            let lx1 = scale.x(chrom_start + rel_start).max(scale.x_offset);
            let lx2 = scale.x(chrom_start + rel_start + shown);
            sink.line(cx1, top, lx1, y, Color::BLACK);
            self.dashed_line_with_hash(sink, lx1, lx2, y, &una_size.to_string());
            sink.line(cx2, top, lx2, y, Color::BLACK);
        } else {
            let rel_start = prev_end - overlap / 2;
            let lx1 = scale.x(chrom_start + rel_start).max(scale.x_offset);
            let lx2 = scale.x(chrom_start + rel_start + una_size);
            sink.line(cx1, top, lx1, y, Color::BLACK);
            self.dashed_line(sink, lx1, lx2, y);
            sink.line(cx2, top, lx2, y, Color::BLACK);
        }
    }

    /// Place the name left of the glyph, or report that it belongs in the
    /// left margin.
    fn draw_label(
        &self,
        record: &AnnotationRecord,
        anchor: i32,
        geom: &RowGeometry,
        sink: &mut dyn PrimitiveSink,
    ) -> bool {
        let padding = self.ctx.constants.label_padding;
        let string_width = self.ctx.label_width(&record.name);
        let font_height = self.ctx.font.line_height();

        if anchor - string_width - self.ctx.scale.x_offset >= -(padding / 2) {
            sink.text(
                anchor - string_width,
                geom.y + geom.height - font_height,
                string_width,
                font_height,
                &record.name,
                Color::BLACK,
                TextAlign::Center,
            );
            false
        } else {
            visual_extent(record, &self.ctx).end >= self.ctx.scale.window_start as i64
        }
    }

    /// Dashes of `dash_len` separated by `gap_len`, from `x1` to `x2`.
    pub fn dashed_line(&self, sink: &mut dyn PrimitiveSink, x1: i32, x2: i32, y: i32) {
        let dash = self.ctx.constants.dash_len.max(1);
        let gap = self.ctx.constants.gap_len.max(0);
        let mut cx1 = x1;
        loop {
            let cx2 = (cx1 + dash).min(x2);
            sink.line(cx1, y, cx2, y, Color::BLACK);
            cx1 += dash + gap;
            if cx1 > x2 {
                break;
            }
        }
    }

    /// Dashed line broken in the middle by `//label//`. The label is dropped
    /// when the line is too short to hold it, and the whole mark when even
    /// the slashes do not fit.
    pub fn dashed_line_with_hash(&self, sink: &mut dyn PrimitiveSink, x1: i32, x2: i32, y: i32, label: &str) {
        let dash = self.ctx.constants.dash_len.max(1);
        let gap = self.ctx.constants.gap_len.max(0);
        let font_height = self.ctx.font.line_height();
        let hash_width = 2 * HASH_SLASH_WIDTH;
        let glyph_width = x2 - x1;

        let mut string_width = self.ctx.label_width(label);
        if glyph_width < string_width + hash_width + 2 * dash {
            string_width = 0;
        }

        if glyph_width < hash_width + dash {
            sink.line(x1, y, x2, y, Color::BLACK);
            return;
        }

        let mut mid_x = glyph_width / 2 + x1;
        if glyph_width < hash_width + 2 * dash {
            mid_x -= HASH_SLASH_WIDTH;
            sink.line(x1, y, mid_x, y, Color::BLACK);
            self.slash(sink, mid_x, y);
            self.slash(sink, mid_x + HASH_SLASH_WIDTH, y);
            sink.line(mid_x + hash_width, y, x2, y, Color::BLACK);
            return;
        }

        let start_hash = mid_x - string_width / 2;
        let mut hash_drawn = false;
        let mut cx1 = x1;
        loop {
            let cx2 = (cx1 + dash).min(x2);
            if !hash_drawn && cx2 > start_hash {
                self.draw_hash(sink, cx1, y, string_width, font_height, label);
                hash_drawn = true;
                cx1 += string_width + hash_width;
            } else {
                sink.line(cx1, y, cx2, y, Color::BLACK);
                cx1 += dash;
            }

            if !hash_drawn && cx1 + gap > mid_x {
                self.draw_hash(sink, cx1, y, string_width, font_height, label);
                hash_drawn = true;
                cx1 += string_width + hash_width;
            } else {
                cx1 += gap;
            }

            if cx1 > x2 {
                break;
            }
        }
    }

    fn draw_hash(
        &self,
        sink: &mut dyn PrimitiveSink,
        x: i32,
        y: i32,
        string_width: i32,
        font_height: i32,
        label: &str,
    ) {
        self.slash(sink, x, y);
        if string_width > 0 {
            sink.text(
                x + HASH_SLASH_WIDTH,
                y - font_height / 2,
                string_width,
                font_height,
                label,
                Color::BLACK,
                TextAlign::Center,
            );
        }
        self.slash(sink, x + HASH_SLASH_WIDTH + string_width, y);
    }

    fn slash(&self, sink: &mut dyn PrimitiveSink, x: i32, y: i32) {
        sink.line(x, y - 3, x + HASH_SLASH_WIDTH, y + 3, Color::BLACK);
    }
}

fn end_cap(sink: &mut dyn PrimitiveSink, x: i32, y: i32) {
    sink.line(x, y - CAP_HALF_HEIGHT, x, y + CAP_HALF_HEIGHT, Color::BLACK);
}

/// Aligned block body. Shapes needing end notches degrade to a plain box
/// when narrower than the notch.
#[allow(clippy::too_many_arguments)]
pub fn draw_block(
    sink: &mut dyn PrimitiveSink,
    shape: BlockShape,
    strand: Strand,
    x1: i32,
    y1: i32,
    width: i32,
    height: i32,
    fill: Color,
    outline: Color,
) {
    let half = height / 2;
    let x2 = x1 + width;
    let y2 = y1 + height;
    let ym = y1 + half;
    let reverse = strand == Strand::Reverse;

    let shape = if shape != BlockShape::Plain && width < 2 * half {
        BlockShape::Plain
    } else {
        shape
    };

    let points = match (shape, reverse) {
        (BlockShape::Plain, _) => {
            sink.filled_rect(x1, y1, width, height, fill);
            sink.polygon(
                vec![(x1, y1), (x2 - 1, y1), (x2 - 1, y2 - 1), (x1, y2 - 1)],
                None,
                Some(outline),
            );
            return;
        }
        (BlockShape::Tail, true) => vec![(x1, y1), (x2, y1), (x2 - half, ym), (x2, y2), (x1, y2)],
        (BlockShape::Tail, false) => vec![(x1, y1), (x2, y1), (x2, y2), (x1, y2), (x1 + half, ym)],
        (BlockShape::Point, true) => vec![(x1 + half, y1), (x2, y1), (x2, y2), (x1 + half, y2), (x1, ym)],
        (BlockShape::Point, false) => vec![(x1, y1), (x2 - half, y1), (x2, ym), (x2 - half, y2), (x1, y2)],
        (BlockShape::Directional, true) => vec![
            (x1 + half, y1),
            (x2, y1),
            (x2 - half, ym),
            (x2, y2),
            (x1 + half, y2),
            (x1, ym),
        ],
        (BlockShape::Directional, false) => vec![
            (x1, y1),
            (x2 - half, y1),
            (x2, ym),
            (x2 - half, y2),
            (x1, y2),
            (x1 + half, ym),
        ],
    };
    sink.polygon(points, Some(fill), Some(outline));
}

/// Strand chevrons centered on `y`, clipped to `x >= 0`.
#[allow(clippy::too_many_arguments)]
pub fn chevrons(
    sink: &mut dyn PrimitiveSink,
    x: i32,
    y: i32,
    width: i32,
    barb_height: i32,
    spacing: i32,
    direction: i32,
    color: Color,
) {
    let (mut x, mut width) = (x, width);
    if x < 0 {
        width += x;
        x = 0;
    }
    if direction == 0 || barb_height <= 0 || spacing <= 0 || width <= barb_height {
        return;
    }

    let count = (width - barb_height) / spacing + 1;
    let mut bx = x + (width - barb_height - (count - 1) * spacing) / 2;
    for _ in 0..count {
        let (base, tip) = if direction > 0 {
            (bx, bx + barb_height)
        } else {
            (bx + barb_height, bx)
        };
        sink.line(base, y - barb_height, tip, y, color);
        sink.line(base, y + barb_height, tip, y, color);
        bx += spacing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GlyphConstants;
    use crate::draw::DrawCommand;
    use crate::error::RmskError;
    use crate::font::FixedWidthFont;
    use crate::scale::Scale;

    fn painter<'a>(
        constants: &'a GlyphConstants,
        font: &'a FixedWidthFont,
        classes: &'a ClassColorTable,
        ppb: f64,
    ) -> GlyphPainter<'a> {
        let ctx = GlyphContext::new(Scale::new(0, 100_000, ppb).with_x_offset(0), constants, font);
        GlyphPainter::new(ctx, classes, 24)
    }

    fn texts(commands: &[DrawCommand]) -> Vec<&str> {
        commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn horizontal_lines_at(commands: &[DrawCommand], at: i32) -> usize {
        commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { y1, y2, .. } if *y1 == at && *y2 == at))
            .count()
    }

    #[test]
    fn test_single_block_is_one_plain_box() {
        let (constants, font, classes) = (GlyphConstants::default(), FixedWidthFont::default(), ClassColorTable::new());
        let p = painter(&constants, &font, &classes, 0.1);
        let rec = AnnotationRecord::new(1, "(CA)n#Simple_repeat", Strand::Forward, 50_000, 50_400);
        let mut sink: Vec<DrawCommand> = Vec::new();
        p.render_glyph(&rec, 0, &mut sink).unwrap();

        let rects = sink.iter().filter(|c| matches!(c, DrawCommand::FilledRect { .. })).count();
        let filled_polys = sink
            .iter()
            .filter(|c| matches!(c, DrawCommand::Polygon { fill: Some(_), .. }))
            .count();
        assert_eq!(rects, 1);
        assert_eq!(filled_polys, 0);
        // Only the chevrons draw lines; none sit on the arm baseline.
        assert_eq!(horizontal_lines_at(&sink, 6), 0);
    }

    #[test]
    fn test_short_arm_drawn_to_scale() {
        let (constants, font, classes) = (GlyphConstants::default(), FixedWidthFont::default(), ClassColorTable::new());
        let p = painter(&constants, &font, &classes, 0.01);
        let rec = AnnotationRecord::joined(2, "L1PA3#LINE/L1", Strand::Forward, 5000, &[(50_000, 6000)], 0);
        let mut sink: Vec<DrawCommand> = Vec::new();
        p.render_glyph(&rec, 0, &mut sink).unwrap();

        // 5000 bp * 0.01 = 50 px: dashed, no length label.
        assert!(!texts(&sink).contains(&"5000"));
        assert!(horizontal_lines_at(&sink, 6) >= 4);
        // Cap at the arm start, x(45000) = 450.
        assert!(sink.iter().any(|c| matches!(c,
            DrawCommand::Line { x1: 450, y1: 3, x2: 450, y2: 9, .. })));
    }

    #[test]
    fn test_long_arm_gets_hash_and_length() {
        let (constants, font, classes) = (GlyphConstants::default(), FixedWidthFont::default(), ClassColorTable::new());
        let p = painter(&constants, &font, &classes, 0.1);
        let rec = AnnotationRecord::joined(3, "L1PA3#LINE/L1", Strand::Forward, 5000, &[(50_000, 600)], 0);
        let mut sink: Vec<DrawCommand> = Vec::new();
        p.render_glyph(&rec, 0, &mut sink).unwrap();

        // 5000 bp * 0.1 = 500 px > 150 px: fixed length with the true size.
        assert_eq!(texts(&sink).iter().filter(|t| **t == "5000").count(), 1);
        // Cap 1500 bp left of the block: x = 4850.
        assert!(sink.iter().any(|c| matches!(c,
            DrawCommand::Line { x1: 4850, y1: 3, x2: 4850, y2: 9, .. })));
    }

    #[test]
    fn test_long_trailing_arm_gets_cap_and_length() {
        let (constants, font, classes) = (GlyphConstants::default(), FixedWidthFont::default(), ClassColorTable::new());
        let p = painter(&constants, &font, &classes, 0.1);
        let rec = AnnotationRecord::joined(12, "L1PA3#LINE/L1", Strand::Reverse, 0, &[(50_000, 600)], 5000);
        let mut sink: Vec<DrawCommand> = Vec::new();
        p.render_glyph(&rec, 0, &mut sink).unwrap();

        assert_eq!(texts(&sink).iter().filter(|t| **t == "5000").count(), 1);
        // Drop from the block end x(50600) = 5060, cap 1500 bp further right.
        assert!(sink.iter().any(|c| matches!(c,
            DrawCommand::Line { x1: 5060, y1: 12, x2: 5060, y2: 6, .. })));
        assert!(sink.iter().any(|c| matches!(c,
            DrawCommand::Line { x1: 5210, y1: 3, x2: 5210, y2: 9, .. })));
    }

    #[test]
    fn test_arms_hidden_when_disabled() {
        let (constants, font, classes) = (GlyphConstants::default(), FixedWidthFont::default(), ClassColorTable::new());
        let mut p = painter(&constants, &font, &classes, 0.1);
        p.ctx = p.ctx.with_arms(false);
        let rec = AnnotationRecord::joined(4, "L1PA3#LINE/L1", Strand::Forward, 5000, &[(50_000, 600)], 400);
        let mut sink: Vec<DrawCommand> = Vec::new();
        p.render_glyph(&rec, 0, &mut sink).unwrap();
        assert_eq!(horizontal_lines_at(&sink, 6), 0);
        assert!(!texts(&sink).contains(&"5000"));
    }

    #[test]
    fn test_sole_aligned_block_is_directional() {
        assert_eq!(BlockShape::for_block(1, 3, Strand::Forward), BlockShape::Directional);
        assert_eq!(BlockShape::for_block(1, 5, Strand::Forward), BlockShape::Tail);
        assert_eq!(BlockShape::for_block(3, 5, Strand::Forward), BlockShape::Point);
        assert_eq!(BlockShape::for_block(1, 5, Strand::Reverse), BlockShape::Point);
        assert_eq!(BlockShape::for_block(3, 5, Strand::Reverse), BlockShape::Tail);
        assert_eq!(BlockShape::for_block(2, 5, Strand::Reverse), BlockShape::Plain);
        assert_eq!(BlockShape::for_block(0, 1, Strand::Forward), BlockShape::Plain);
    }

    #[test]
    fn test_directional_block_polygon() {
        let mut sink: Vec<DrawCommand> = Vec::new();
        draw_block(&mut sink, BlockShape::Directional, Strand::Forward, 10, 12, 100, 12, Color::BLACK, Color::WHITE);
        match &sink[0] {
            DrawCommand::Polygon { points, fill, outline } => {
                assert_eq!(points, &vec![(10, 12), (104, 12), (110, 18), (104, 24), (10, 24), (16, 18)]);
                assert_eq!(*fill, Some(Color::BLACK));
                assert_eq!(*outline, Some(Color::WHITE));
            }
            other => panic!("expected polygon, got {:?}", other),
        }
    }

    #[test]
    fn test_label_left_of_glyph() {
        let (constants, font, classes) = (GlyphConstants::default(), FixedWidthFont::default(), ClassColorTable::new());
        let p = painter(&constants, &font, &classes, 0.1);
        let rec = AnnotationRecord::new(5, "AluY#SINE/Alu", Strand::Forward, 50_000, 50_300);
        let mut sink: Vec<DrawCommand> = Vec::new();
        let outcome = p.render_glyph(&rec, 2, &mut sink).unwrap();
        assert!(!outcome.left_label);
        // 13 chars * 7 + 20 = 111 px left of x = 5000, bottom-aligned on row 2.
        assert!(sink.iter().any(|c| matches!(c,
            DrawCommand::Text { x: 4889, y: 62, width: 111, .. })));
    }

    #[test]
    fn test_label_falls_back_to_left_margin() {
        let (constants, font, classes) = (GlyphConstants::default(), FixedWidthFont::default(), ClassColorTable::new());
        let ctx = GlyphContext::new(Scale::new(1000, 5000, 0.1), &constants, &font);
        let p = GlyphPainter::new(ctx, &classes, 24);
        let rec = AnnotationRecord::new(6, "AluY#SINE/Alu", Strand::Forward, 1100, 1400);
        let mut sink: Vec<DrawCommand> = Vec::new();
        let outcome = p.render_glyph(&rec, 0, &mut sink).unwrap();
        assert!(outcome.left_label);
        assert!(texts(&sink).is_empty());
    }

    #[test]
    fn test_zero_block_record_is_rejected() {
        let (constants, font, classes) = (GlyphConstants::default(), FixedWidthFont::default(), ClassColorTable::new());
        let p = painter(&constants, &font, &classes, 0.1);
        let rec = AnnotationRecord::new(7, "AluY#SINE/Alu", Strand::Forward, 0, 10).with_blocks(Vec::new(), Vec::new());
        let mut sink: Vec<DrawCommand> = Vec::new();
        assert!(matches!(
            p.render_glyph(&rec, 0, &mut sink),
            Err(RmskError::InvalidRecord { id: 7, .. })
        ));
    }

    #[test]
    fn test_lone_unaligned_block_is_rejected() {
        let (constants, font, classes) = (GlyphConstants::default(), FixedWidthFont::default(), ClassColorTable::new());
        let p = painter(&constants, &font, &classes, 0.1);
        let rec = AnnotationRecord::new(13, "L2#LINE/L2", Strand::Forward, 100, 150).with_blocks(vec![50], vec![-1]);
        let mut sink: Vec<DrawCommand> = Vec::new();
        assert!(matches!(
            p.render_glyph(&rec, 0, &mut sink),
            Err(RmskError::InvalidRecord { id: 13, .. })
        ));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_block_clamped_to_data_area() {
        let (constants, font, classes) = (GlyphConstants::default(), FixedWidthFont::default(), ClassColorTable::new());
        let ctx = GlyphContext::new(Scale::new(1000, 5000, 0.1).with_x_offset(120), &constants, &font);
        let p = GlyphPainter::new(ctx, &classes, 24);
        let rec = AnnotationRecord::new(14, "L2a#LINE/L2", Strand::Forward, 0, 1400);
        let mut sink: Vec<DrawCommand> = Vec::new();
        p.render_glyph(&rec, 0, &mut sink).unwrap();

        // x(0) = 20 lies in the margin; the box starts at the data edge.
        assert!(sink.iter().any(|c| matches!(c, DrawCommand::FilledRect { x: 120, width: 40, .. })));
        let min_x = sink
            .iter()
            .map(|c| match c {
                DrawCommand::FilledRect { x, .. } | DrawCommand::Text { x, .. } => *x,
                DrawCommand::Line { x1, x2, .. } => *x1.min(x2),
                DrawCommand::Polygon { points, .. } => points.iter().map(|p| p.0).min().unwrap_or(i32::MAX),
                DrawCommand::MapItem(item) => item.x,
            })
            .min()
            .unwrap();
        assert!(min_x >= 120, "drew at x = {}", min_x);
    }

    #[test]
    fn test_middle_overlap_draws_v() {
        let (constants, font, classes) = (GlyphConstants::default(), FixedWidthFont::default(), ClassColorTable::new());
        let p = painter(&constants, &font, &classes, 1.0);
        // Aligned 1000..1100 and 1100..1200 with 30 bp of repeated consensus.
        let rec = AnnotationRecord::new(8, "L2#LINE/L2", Strand::Forward, 1000, 1200)
            .with_chrom_span(1000, 1200)
            .with_blocks(vec![0, 100, -30, 100, 0], vec![-1, 0, -1, 100, -1]);
        let mut sink: Vec<DrawCommand> = Vec::new();
        p.render_glyph(&rec, 0, &mut sink).unwrap();
        // Tick at x(1070) over the aligned block, then two legs to the apex.
        assert!(sink.iter().any(|c| matches!(c, DrawCommand::Line { x1: 1070, y1: 12, x2: 1070, y2: 24, .. })));
        assert!(sink.iter().any(|c| matches!(c, DrawCommand::Line { x1: 1070, y1: 12, x2: 1085, y2: 6, .. })));
        assert!(sink.iter().any(|c| matches!(c, DrawCommand::Line { x1: 1100, y1: 12, x2: 1085, y2: 6, .. })));
    }

    #[test]
    fn test_middle_long_segment_is_shortened_and_labeled() {
        let (constants, font, classes) = (GlyphConstants::default(), FixedWidthFont::default(), ClassColorTable::new());
        let p = painter(&constants, &font, &classes, 1.0);
        // 400 bp of consensus between blocks 10 bp apart.
        let rec = AnnotationRecord::new(9, "L2#LINE/L2", Strand::Forward, 1000, 1210)
            .with_chrom_span(1000, 1210)
            .with_blocks(vec![0, 100, 400, 100, 0], vec![-1, 0, -1, 110, -1]);
        let mut sink: Vec<DrawCommand> = Vec::new();
        p.render_glyph(&rec, 0, &mut sink).unwrap();
        // 30 bp shown each side of the gap: 1070..1140.
        assert!(sink.iter().any(|c| matches!(c, DrawCommand::Line { x1: 1100, y1: 12, x2: 1070, y2: 6, .. })));
        assert!(sink.iter().any(|c| matches!(c, DrawCommand::Line { x1: 1110, y1: 12, x2: 1140, y2: 6, .. })));
        assert!(texts(&sink).contains(&"400"));
    }

    #[test]
    fn test_chevron_direction_follows_strand() {
        let mut fwd: Vec<DrawCommand> = Vec::new();
        chevrons(&mut fwd, 0, 10, 20, 4, 5, 1, Color::WHITE);
        let mut rev: Vec<DrawCommand> = Vec::new();
        chevrons(&mut rev, 0, 10, 20, 4, 5, -1, Color::WHITE);
        assert_eq!(fwd.len(), rev.len());
        assert!(!fwd.is_empty());
        match (&fwd[0], &rev[0]) {
            (DrawCommand::Line { x1: f1, x2: f2, .. }, DrawCommand::Line { x1: r1, x2: r2, .. }) => {
                assert!(f2 > f1);
                assert!(r2 < r1);
            }
            _ => panic!("chevrons should be lines"),
        }
    }
}
