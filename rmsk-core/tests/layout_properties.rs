use proptest::prelude::*;
use rmsk_core::{
    visual_extent, AnnotationRecord, ClassColorTable, CoarseStyle, DrawCommand, FixedWidthFont, GlyphConstants,
    GlyphContext, GlyphPainter, LayoutEngine, LayoutPolicy, Scale, Strand, TrackConfig, Visibility,
};

const NAMES: [&str; 6] = [
    "AluY#SINE/Alu",
    "L1PA2#LINE/L1",
    "MER5A#DNA/hAT-Charlie",
    "(CA)n#Simple_repeat",
    "U6#snRNA",
    "Mystery",
];

fn record_strategy() -> impl Strategy<Value = (usize, u64, i64, i64, i64, bool, usize)> {
    (
        0usize..NAMES.len(),
        0u64..40_000,
        1i64..3_000,
        0i64..6_000,
        0i64..6_000,
        any::<bool>(),
        0usize..2,
    )
}

fn build(specs: &[(usize, u64, i64, i64, i64, bool, usize)]) -> Vec<AnnotationRecord> {
    specs
        .iter()
        .enumerate()
        .map(|(i, &(name, start, len, lead, trail, forward, kind))| {
            let strand = if forward { Strand::Forward } else { Strand::Reverse };
            if kind == 0 {
                AnnotationRecord::new(i as u64, NAMES[name], strand, start, start + len as u64)
            } else {
                AnnotationRecord::joined(i as u64, NAMES[name], strand, lead, &[(start, len)], trail)
            }
        })
        .collect()
}

fn detail_config(ppb: f64) -> TrackConfig {
    TrackConfig::default().with_window(0, 45_000).with_pixels_per_base(ppb)
}

/// Leftmost and rightmost screen column touched by a command.
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

proptest! {
    #[test]
    fn same_row_extents_never_overlap(
        specs in prop::collection::vec(record_strategy(), 1..60),
        ppb in 0.005f64..0.5,
    ) {
        let records = build(&specs);
        let engine = LayoutEngine::new();
        let layout = engine.compute_layout(&records, &detail_config(ppb), &FixedWidthFont::default()).unwrap();
        prop_assert_eq!(layout.policy, LayoutPolicy::Detail);

        let placements = layout.placements();
        for i in 0..placements.len() {
            for j in (i + 1)..placements.len() {
                if placements[i].level == placements[j].level {
                    prop_assert!(!placements[i].visual.overlaps(&placements[j].visual, 0));
                }
            }
        }
    }

    #[test]
    fn every_record_is_placed_on_a_valid_row(
        specs in prop::collection::vec(record_strategy(), 1..60),
    ) {
        let records = build(&specs);
        let engine = LayoutEngine::new();
        let layout = engine.compute_layout(&records, &detail_config(0.05), &FixedWidthFont::default()).unwrap();
        prop_assert!(layout.row_count >= 1);
        prop_assert_eq!(layout.len(), records.len());
        for (record, placement) in records.iter().zip(layout.placements()) {
            prop_assert_eq!(record.id, placement.id);
            prop_assert!(placement.level < layout.row_count);
        }
        // Row count is the number of distinct rows used.
        let max_level = layout.placements().iter().map(|p| p.level).max().unwrap();
        prop_assert_eq!(max_level + 1, layout.row_count);
    }

    #[test]
    fn layout_is_deterministic(
        specs in prop::collection::vec(record_strategy(), 0..40),
        ppb in 0.005f64..0.5,
    ) {
        let records = build(&specs);
        let engine = LayoutEngine::new();
        let font = FixedWidthFont::default();
        let a = engine.compute_layout(&records, &detail_config(ppb), &font).unwrap();
        let b = engine.compute_layout(&records, &detail_config(ppb), &font).unwrap();
        prop_assert_eq!(a.placements(), b.placements());
        prop_assert_eq!(a.row_count, b.row_count);
    }

    #[test]
    fn widest_record_lands_on_row_zero(
        specs in prop::collection::vec(record_strategy(), 1..40),
    ) {
        let records = build(&specs);
        let engine = LayoutEngine::new();
        let layout = engine.compute_layout(&records, &detail_config(0.05), &FixedWidthFont::default()).unwrap();
        let widest = records.iter().map(|r| r.align_width()).max().unwrap();
        let first_widest = records.iter().find(|r| r.align_width() == widest).unwrap();
        prop_assert_eq!(layout.level_of(first_widest.id), Some(0));
    }

    #[test]
    fn extent_covers_alignment(
        specs in prop::collection::vec(record_strategy(), 1..20),
        ppb in 0.001f64..2.0,
        labels in any::<bool>(),
        arms in any::<bool>(),
    ) {
        let config = detail_config(ppb);
        let font = FixedWidthFont::default();
        let engine = LayoutEngine::new();
        let ctx = engine
            .glyph_context(LayoutPolicy::Detail, &config, &font)
            .with_labels(labels)
            .with_arms(arms);
        for record in build(&specs) {
            let extent = visual_extent(&record, &ctx);
            prop_assert!(extent.start <= record.align_start as i64);
            prop_assert!(extent.end >= record.align_end as i64);
        }
    }

    #[test]
    fn coarse_rows_depend_only_on_class(
        specs in prop::collection::vec(record_strategy(), 1..40),
        shift in 0u64..10_000,
    ) {
        let records = build(&specs);
        let moved: Vec<AnnotationRecord> = records
            .iter()
            .map(|r| {
                let width = r.align_width();
                AnnotationRecord::new(r.id, r.name.clone(), r.strand, r.align_start + shift, r.align_start + shift + width)
            })
            .collect();

        let config = TrackConfig::default()
            .with_window(0, 1_000_000)
            .with_visibility(Visibility::Pack);
        let engine = LayoutEngine::new();
        let font = FixedWidthFont::default();
        let a = engine.compute_layout(&records, &config, &font).unwrap();
        let b = engine.compute_layout(&moved, &config, &font).unwrap();
        prop_assert_eq!(a.policy, LayoutPolicy::Coarse(CoarseStyle::ClassRows));
        for (pa, pb) in a.placements().iter().zip(b.placements()) {
            prop_assert_eq!(pa.level, pb.level);
        }
        for (record, placement) in records.iter().zip(a.placements()) {
            prop_assert_eq!(placement.level, engine.classes().row_of(&record.name));
        }
    }

    #[test]
    fn glyph_stays_within_visual_extent(
        specs in prop::collection::vec(record_strategy(), 1..20),
        ppb in 0.005f64..0.5,
        labels in any::<bool>(),
        arms in any::<bool>(),
    ) {
        let constants = GlyphConstants::default();
        let font = FixedWidthFont::default();
        let classes = ClassColorTable::new();
        let ctx = GlyphContext::new(Scale::new(0, 45_000, ppb), &constants, &font)
            .with_labels(labels)
            .with_arms(arms);
        let painter = GlyphPainter::new(ctx, &classes, 24);

        for record in build(&specs) {
            let extent = visual_extent(&record, &painter.ctx);
            // Slack for rounding in the bp/pixel conversions.
            let lo = painter.ctx.scale.x(extent.start) - 2;
            let hi = painter.ctx.scale.x(extent.end) + 2;

            let mut sink: Vec<DrawCommand> = Vec::new();
            painter.render_glyph(&record, 0, &mut sink).unwrap();
            for command in &sink {
                let (min_x, max_x) = x_bounds(command);
                prop_assert!(
                    min_x >= lo && max_x <= hi,
                    "{:?} outside [{}, {}] for record {}",
                    command,
                    lo,
                    hi,
                    record.id
                );
            }
        }
    }
}
