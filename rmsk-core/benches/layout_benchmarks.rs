use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rmsk_core::{AnnotationRecord, DrawCommand, FixedWidthFont, LayoutEngine, Strand, TrackConfig, TrackPainter};

fn generate_records(count: usize) -> Vec<AnnotationRecord> {
    let names = ["AluY#SINE/Alu", "L1PA2#LINE/L1", "MER5A#DNA/hAT-Charlie", "(CA)n#Simple_repeat"];
    (0..count)
        .map(|i| {
            let start = (i as u64 * 7919) % 40_000;
            let len = 100 + (i as i64 * 131) % 2_000;
            let strand = if i % 2 == 0 { Strand::Forward } else { Strand::Reverse };
            AnnotationRecord::joined(i as u64, names[i % names.len()], strand, (i as i64 * 37) % 3_000, &[(start, len)], 50)
        })
        .collect()
}

fn bench_detail_layout(c: &mut Criterion) {
    let engine = LayoutEngine::new();
    let font = FixedWidthFont::default();
    let config = TrackConfig::default().with_window(0, 45_000);
    let records = generate_records(500);

    c.bench_function("detail_layout_500", |b| {
        b.iter(|| {
            let layout = engine.compute_layout(black_box(&records), &config, &font);
            black_box(layout)
        })
    });
}

fn bench_track_render(c: &mut Criterion) {
    let engine = LayoutEngine::new();
    let font = FixedWidthFont::default();
    let config = TrackConfig::default().with_window(0, 45_000);
    let records = generate_records(500);
    let painter = TrackPainter::new(&engine, &config, &font);

    c.bench_function("detail_layout_and_draw_500", |b| {
        b.iter(|| {
            let mut sink: Vec<DrawCommand> = Vec::new();
            let result = painter.layout_and_draw(black_box(&records), &mut sink);
            black_box((result.is_ok(), sink.len()))
        })
    });
}

criterion_group!(benches, bench_detail_layout, bench_track_render);
criterion_main!(benches);
