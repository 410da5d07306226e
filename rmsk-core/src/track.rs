//! Whole-track drawing: row heights, per-mode glyphs, hit regions and the
//! left-margin labels.

use crate::class::Color;
use crate::config::{TrackConfig, Visibility};
use crate::draw::{ClipSink, MapItem, PrimitiveSink, TextAlign};
use crate::error::{RmskError, RmskResult};
use crate::extent::GlyphContext;
use crate::font::TextMeasure;
use crate::glyph::{chevrons, GlyphPainter};
use crate::layout::{CoarseStyle, Layout, LayoutEngine, LayoutPolicy};
use crate::scale::{gray_level, shade_of_gray};
use crate::types::{AnnotationRecord, RecordId};

/// A record whose label is drawn in the left margin instead of the track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeftLabel {
    pub id: RecordId,
    pub level: usize,
    pub text: String,
}

/// Summary of one draw pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackDrawing {
    pub height: i32,
    pub left_labels: Vec<LeftLabel>,
}

pub struct TrackPainter<'a> {
    engine: &'a LayoutEngine,
    config: &'a TrackConfig,
    font: &'a dyn TextMeasure,
    x_offset: i32,
    y_offset: i32,
}

impl<'a> TrackPainter<'a> {
    pub fn new(engine: &'a LayoutEngine, config: &'a TrackConfig, font: &'a dyn TextMeasure) -> Self {
        Self {
            engine,
            config,
            font,
            x_offset: 0,
            y_offset: 0,
        }
    }

    pub fn with_offset(mut self, x_offset: i32, y_offset: i32) -> Self {
        self.x_offset = x_offset;
        self.y_offset = y_offset;
        self
    }

    /// Glyph height for the current mode.
    pub fn item_height(&self) -> i32 {
        let font_height = self.font.line_height();
        match self.config.visibility {
            Visibility::Dense | Visibility::Pack => font_height,
            Visibility::Squish => font_height / 2,
            Visibility::Full if self.config.is_detail_view() => {
                font_height.max(self.config.glyph.min_row_height)
            }
            Visibility::Full => font_height,
        }
    }

    pub fn line_height(&self) -> i32 {
        self.item_height() + 1
    }

    /// Distance between rows under `policy`.
    pub fn row_pitch(&self, policy: LayoutPolicy) -> i32 {
        match policy {
            LayoutPolicy::Detail => self.line_height().max(self.config.glyph.min_row_height),
            LayoutPolicy::Coarse(_) => self.line_height(),
        }
    }

    pub fn total_height(&self, layout: &Layout) -> i32 {
        match layout.policy {
            LayoutPolicy::Coarse(CoarseStyle::SingleRow) => self.line_height(),
            policy => layout.row_count as i32 * self.row_pitch(policy),
        }
    }

    fn context(&self, policy: LayoutPolicy) -> GlyphContext<'a> {
        let mut ctx = self.engine.glyph_context(policy, self.config, self.font);
        ctx.scale = ctx.scale.with_x_offset(self.x_offset);
        ctx
    }

    fn row_y(&self, policy: LayoutPolicy, level: usize) -> i32 {
        self.y_offset + level as i32 * self.row_pitch(policy)
    }

    /// Lay out `records` and draw them in one go.
    pub fn layout_and_draw(
        &self,
        records: &[AnnotationRecord],
        sink: &mut dyn PrimitiveSink,
    ) -> RmskResult<(Layout, TrackDrawing)> {
        let layout = self.engine.compute_layout(records, self.config, self.font)?;
        let drawing = self.draw(records, &layout, sink)?;
        Ok((layout, drawing))
    }

    /// Draw `records` according to a layout computed for them. Nothing is
    /// drawn outside the data area; margin labels go through
    /// [`TrackPainter::draw_left_labels`].
    pub fn draw(
        &self,
        records: &[AnnotationRecord],
        layout: &Layout,
        sink: &mut dyn PrimitiveSink,
    ) -> RmskResult<TrackDrawing> {
        if layout.len() != records.len() {
            return Err(RmskError::LayoutMismatch {
                expected: records.len(),
                found: layout.len(),
            });
        }

        let scale = self.config.scale().with_x_offset(self.x_offset);
        let mut clipped = ClipSink::new(sink, scale.x_offset, scale.right_edge());
        let sink: &mut dyn PrimitiveSink = &mut clipped;

        let left_labels = match layout.policy {
            LayoutPolicy::Detail => self.draw_detail(records, layout, sink)?,
            LayoutPolicy::Coarse(CoarseStyle::Clustered) => self.draw_clustered(records, layout, sink),
            LayoutPolicy::Coarse(CoarseStyle::ClassRows) => {
                self.draw_class_rows(records, layout, sink);
                Vec::new()
            }
            LayoutPolicy::Coarse(CoarseStyle::SingleRow) => {
                self.draw_single_row(records, sink);
                Vec::new()
            }
        };

        Ok(TrackDrawing {
            height: self.total_height(layout),
            left_labels,
        })
    }

    fn draw_detail(
        &self,
        records: &[AnnotationRecord],
        layout: &Layout,
        sink: &mut dyn PrimitiveSink,
    ) -> RmskResult<Vec<LeftLabel>> {
        let policy = layout.policy;
        let painter = GlyphPainter::new(self.context(policy), self.engine.classes(), self.item_height())
            .with_line_height(self.row_pitch(policy))
            .with_y_offset(self.y_offset)
            .with_gray_range(self.config.gray_min, self.config.gray_max);

        let mut left_labels = Vec::new();
        for (record, placement) in records.iter().zip(layout.placements()) {
            let outcome = painter.render_glyph(record, placement.level, sink)?;
            if outcome.left_label {
                left_labels.push(LeftLabel {
                    id: record.id,
                    level: placement.level,
                    text: record.name.clone(),
                });
            }
            self.map_record(record, painter.row_y(placement.level), sink);
        }
        Ok(left_labels)
    }

    /// Class-colored boxes with family labels, packed first-fit.
    fn draw_clustered(
        &self,
        records: &[AnnotationRecord],
        layout: &Layout,
        sink: &mut dyn PrimitiveSink,
    ) -> Vec<LeftLabel> {
        let ctx = self.context(layout.policy);
        let scale = &ctx.scale;
        let height = self.item_height();
        let barb_height = height / 2 - 2;
        let mut left_labels = Vec::new();

        for (record, placement) in records.iter().zip(layout.placements()) {
            let y = self.row_y(layout.policy, placement.level);
            let class = self.engine.classes().resolve(&record.name);
            let mid_y = y + height / 2;

            if ctx.show_labels {
                let family = record.family();
                let string_width = ctx.label_width(family);
                let x1 = scale.rel_x(record.align_start as i64);
                if x1 - string_width > 0 {
                    sink.text(
                        x1 + scale.x_offset - string_width,
                        y,
                        string_width,
                        height,
                        family,
                        Color::BLACK,
                        TextAlign::Right,
                    );
                } else if scale.rel_x(record.align_end as i64) > 0 {
                    left_labels.push(LeftLabel {
                        id: record.id,
                        level: placement.level,
                        text: family.to_string(),
                    });
                }
            }

            let mut prev_end: Option<i32> = None;
            for idx in 0..record.block_count {
                let Some((start, end)) = record.aligned_span(idx) else {
                    continue;
                };
                let bx1 = scale.x(start).max(scale.x_offset);
                let bx2 = scale.x(end).min(scale.right_edge());
                if bx2 >= bx1 {
                    let width = (bx2 - bx1).max(1);
                    sink.filled_rect(bx1, y, width, height, class.color);
                    chevrons(
                        sink,
                        bx1,
                        mid_y,
                        width,
                        barb_height,
                        self.config.glyph.chevron_spacing,
                        record.strand.direction(),
                        class.color.contrasting(),
                    );
                }
                if let Some(prev) = prev_end {
                    sink.line(prev, mid_y, bx1, mid_y, Color::BLACK);
                }
                prev_end = Some(bx2);
            }

            self.map_record(record, y, sink);
        }
        left_labels
    }

    /// Gray boxes by divergence, one row per class.
    fn draw_class_rows(&self, records: &[AnnotationRecord], layout: &Layout, sink: &mut dyn PrimitiveSink) {
        let scale = self.context(layout.policy).scale;
        let height = self.item_height();

        for (record, placement) in records.iter().zip(layout.placements()) {
            let y = self.row_y(layout.policy, placement.level);
            let identity = 10_000 - record.score as i64;
            let fill = shade_of_gray(gray_level(identity, self.config.gray_min, self.config.gray_max));
            for idx in 0..record.block_count {
                if let Some((start, end)) = record.aligned_span(idx) {
                    let x1 = scale.x(start);
                    let width = (scale.x(end) - x1).max(1);
                    sink.filled_rect(x1, y, width, height, fill);
                }
            }
            self.map_record(record, y, sink);
        }
    }

    /// Class-colored boxes collapsed onto one row.
    fn draw_single_row(&self, records: &[AnnotationRecord], sink: &mut dyn PrimitiveSink) {
        let scale = self.context(LayoutPolicy::Coarse(CoarseStyle::SingleRow)).scale;
        let height = self.item_height();
        let y = self.y_offset;

        for record in records {
            let color = self.engine.classes().resolve(&record.name).color;
            for idx in 0..record.block_count {
                if let Some((start, end)) = record.aligned_span(idx) {
                    let x1 = scale.x(start);
                    let width = (scale.x(end) - x1).max(1);
                    sink.filled_rect(x1, y, width, height, color);
                }
            }
            self.map_record(record, y, sink);
        }
    }

    /// Hit region over the aligned span.
    fn map_record(&self, record: &AnnotationRecord, y: i32, sink: &mut dyn PrimitiveSink) {
        let scale = self.config.scale().with_x_offset(self.x_offset);
        let x1 = scale.x(record.align_start as i64);
        let x2 = scale.x(record.align_end as i64);
        sink.map_item(MapItem {
            id: record.id,
            x: x1,
            y,
            width: (x2 - x1).max(1),
            height: self.item_height(),
            status: record.name.clone(),
        });
    }

    /// Labels for the margin left of the data area, right-aligned in
    /// `[x, x + width)`.
    pub fn draw_left_labels(
        &self,
        layout: &Layout,
        drawing: &TrackDrawing,
        x: i32,
        width: i32,
        sink: &mut dyn PrimitiveSink,
    ) {
        let height = self.item_height();
        let mut label = |level: usize, text: &str| {
            let y = self.row_y(layout.policy, level);
            sink.text(x, y, width, height, text, Color::BLACK, TextAlign::Right);
        };

        match layout.policy {
            LayoutPolicy::Coarse(CoarseStyle::SingleRow) => label(0, "Repeats"),
            LayoutPolicy::Coarse(CoarseStyle::ClassRows) => {
                for class in self.engine.classes().iter() {
                    label(class.row, class.label);
                }
            }
            _ => {
                for left in &drawing.left_labels {
                    label(left.level, &left.text);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::DrawCommand;
    use crate::font::FixedWidthFont;
    use crate::types::Strand;

    fn records() -> Vec<AnnotationRecord> {
        vec![
            AnnotationRecord::joined(1, "AluY#SINE/Alu", Strand::Forward, 20, &[(1000, 280)], 10),
            AnnotationRecord::joined(2, "L1PA2#LINE/L1", Strand::Reverse, 100, &[(1100, 300), (1450, 200)], 50),
            AnnotationRecord::new(3, "(CA)n#Simple_repeat", Strand::Forward, 3000, 3060),
        ]
    }

    #[test]
    fn test_detail_heights() {
        let engine = LayoutEngine::new();
        let config = TrackConfig::default().with_window(0, 5000);
        let font = FixedWidthFont::default();
        let painter = TrackPainter::new(&engine, &config, &font);
        assert_eq!(painter.item_height(), 24);
        assert_eq!(painter.line_height(), 25);

        let mut sink: Vec<DrawCommand> = Vec::new();
        let (layout, drawing) = painter.layout_and_draw(&records(), &mut sink).unwrap();
        assert_eq!(layout.policy, LayoutPolicy::Detail);
        assert_eq!(drawing.height, layout.row_count as i32 * 25);
    }

    #[test]
    fn test_squish_and_dense_heights() {
        let engine = LayoutEngine::new();
        let font = FixedWidthFont::default();
        let squish = TrackConfig::default().with_visibility(Visibility::Squish);
        assert_eq!(TrackPainter::new(&engine, &squish, &font).item_height(), 6);

        let dense = TrackConfig::default().with_visibility(Visibility::Dense);
        let painter = TrackPainter::new(&engine, &dense, &font);
        let mut sink: Vec<DrawCommand> = Vec::new();
        let (_, drawing) = painter.layout_and_draw(&records(), &mut sink).unwrap();
        assert_eq!(drawing.height, 13);
    }

    #[test]
    fn test_every_record_gets_a_hit_region() {
        let engine = LayoutEngine::new();
        let font = FixedWidthFont::default();
        for visibility in [Visibility::Full, Visibility::Pack, Visibility::Squish, Visibility::Dense] {
            let config = TrackConfig::default().with_window(0, 5000).with_visibility(visibility);
            let painter = TrackPainter::new(&engine, &config, &font).with_offset(40, 10);
            let mut sink: Vec<DrawCommand> = Vec::new();
            painter.layout_and_draw(&records(), &mut sink).unwrap();
            let items: Vec<&MapItem> = sink
                .iter()
                .filter_map(|c| match c {
                    DrawCommand::MapItem(item) => Some(item),
                    _ => None,
                })
                .collect();
            assert_eq!(items.len(), 3, "{} mode", visibility);
            assert!(items.iter().all(|item| item.width >= 1 && item.y >= 10));
        }
    }

    #[test]
    fn test_class_row_left_labels() {
        let engine = LayoutEngine::new();
        let font = FixedWidthFont::default();
        let config = TrackConfig::default().with_window(0, 1_000_000);
        let painter = TrackPainter::new(&engine, &config, &font);
        let mut sink: Vec<DrawCommand> = Vec::new();
        let (layout, drawing) = painter.layout_and_draw(&records(), &mut sink).unwrap();

        let mut margin: Vec<DrawCommand> = Vec::new();
        painter.draw_left_labels(&layout, &drawing, 0, 100, &mut margin);
        assert_eq!(margin.len(), 10);
        assert!(matches!(&margin[5], DrawCommand::Text { text, y: 65, .. } if text == "Low Complexity"));
    }

    #[test]
    fn test_layout_must_match_records() {
        let engine = LayoutEngine::new();
        let font = FixedWidthFont::default();
        let config = TrackConfig::default().with_window(0, 5000);
        let painter = TrackPainter::new(&engine, &config, &font);
        let layout = engine.compute_layout(&records(), &config, &font).unwrap();
        let mut sink: Vec<DrawCommand> = Vec::new();
        let result = painter.draw(&records()[..2], &layout, &mut sink);
        assert!(matches!(result, Err(RmskError::LayoutMismatch { expected: 2, found: 3 })));
    }

    #[test]
    fn test_detail_left_label_for_glyph_at_window_edge() {
        let engine = LayoutEngine::new();
        let font = FixedWidthFont::default();
        let config = TrackConfig::default().with_window(1000, 5000);
        let painter = TrackPainter::new(&engine, &config, &font);
        let recs = vec![AnnotationRecord::new(1, "MIRb#SINE/MIR", Strand::Forward, 1005, 1400)];
        let mut sink: Vec<DrawCommand> = Vec::new();
        let (_, drawing) = painter.layout_and_draw(&recs, &mut sink).unwrap();
        assert_eq!(drawing.left_labels.len(), 1);
        assert_eq!(drawing.left_labels[0].text, "MIRb#SINE/MIR");
    }

    #[test]
    fn test_glyphs_stay_inside_data_area() {
        let engine = LayoutEngine::new();
        let font = FixedWidthFont::default();
        let config = TrackConfig::default().with_window(1000, 5000).with_pixels_per_base(0.1);
        let painter = TrackPainter::new(&engine, &config, &font).with_offset(120, 0);
        let recs = vec![
            AnnotationRecord::new(1, "L2a#LINE/L2", Strand::Forward, 0, 1400),
            AnnotationRecord::joined(2, "AluY#SINE/Alu", Strand::Reverse, 300, &[(700, 500), (1200, 400)], 20),
            AnnotationRecord::new(3, "MIR#SINE/MIR", Strand::Reverse, 4800, 6000),
        ];
        let mut sink: Vec<DrawCommand> = Vec::new();
        painter.layout_and_draw(&recs, &mut sink).unwrap();

        assert!(!sink.is_empty());
        for command in &sink {
            let (min_x, max_x) = x_bounds(command);
            assert!(min_x >= 120, "{:?} reaches into the left margin", command);
            assert!(max_x <= 520, "{:?} runs past the data area", command);
        }
    }

    fn x_bounds(command: &DrawCommand) -> (i32, i32) {
        match command {
            DrawCommand::FilledRect { x, width, .. } | DrawCommand::Text { x, width, .. } => (*x, x + width),
            DrawCommand::Line { x1, x2, .. } => (*x1.min(x2), *x1.max(x2)),
            DrawCommand::Polygon { points, .. } => (
                points.iter().map(|p| p.0).min().unwrap_or(0),
                points.iter().map(|p| p.0).max().unwrap_or(0),
            ),
            DrawCommand::MapItem(item) => (item.x, item.x + item.width),
        }
    }
}
