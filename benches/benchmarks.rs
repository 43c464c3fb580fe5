//! Benchmarks for the pagination engine

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use script_press::{
    FontMetrics, Line, LineKind, PaginationOperation, PaginationSettings, ScreenplayStylesheet,
    ScriptSnapshot, SourceRange, TitlePage,
};

/// Build `scenes` scenes of heading, action and dialogue exchanges
fn sample_script(scenes: usize) -> ScriptSnapshot {
    let mut lines = Vec::new();
    let mut offset = 0;
    for i in 0..scenes {
        for template in [
            Line::scene_heading(format!("INT. LOCATION {} - DAY", i + 1), 0),
            Line::action("Something specific and visual happens in the room.", 0),
            Line::character("AVERY", 0),
            Line::dialogue("You keep saying that like it helps us.", 0),
            Line::empty(0),
            Line::character("BLAKE", 0),
            Line::parenthetical("(dry)", 0),
            Line::dialogue("It helps me.", 0),
            Line::empty(0),
        ] {
            let mut line = template;
            line.source_offset = offset;
            offset = line.end_offset() + 1;
            lines.push(line);
        }
    }
    ScriptSnapshot::new(lines)
}

fn provider() -> Arc<ScreenplayStylesheet> {
    Arc::new(ScreenplayStylesheet::default())
}

fn bench_full_pagination(c: &mut Criterion) {
    c.bench_function("paginate_200_scenes", |b| {
        let snapshot = sample_script(200);
        let provider = provider();

        b.iter(|| {
            let op = PaginationOperation::new(
                black_box(snapshot.clone()),
                TitlePage::default(),
                PaginationSettings::default(),
                provider.clone(),
            );
            op.run().map(|result| result.page_count()).unwrap_or(0)
        });
    });
}

fn bench_live_repagination(c: &mut Criterion) {
    c.bench_function("live_edit_near_end", |b| {
        let snapshot = sample_script(200);
        let provider = provider();
        let Ok(previous) = PaginationOperation::new(
            snapshot.clone(),
            TitlePage::default(),
            PaginationSettings::default(),
            provider.clone(),
        )
        .run() else {
            return;
        };
        let previous = Arc::new(previous);
        let change_at = previous.pages[previous.page_count() - 1]
            .represented_range
            .start;

        b.iter(|| {
            let op = PaginationOperation::live(
                snapshot.clone(),
                TitlePage::default(),
                PaginationSettings::default(),
                provider.clone(),
                black_box(change_at),
                Arc::clone(&previous),
            );
            op.run().map(|result| result.page_count()).unwrap_or(0)
        });
    });
}

fn bench_line_wrap(c: &mut Criterion) {
    c.bench_function("wrap_long_action", |b| {
        let metrics = FontMetrics::default();
        let text = "The corridor stretches past identical doors, every one of them ajar \
                    by exactly the same suspicious inch, and somewhere behind the last of \
                    them a phone keeps ringing.";

        b.iter(|| script_press::layout::measure::wrapped_line_count(black_box(text), 432.0, &metrics));
    });
}

fn bench_scene_lengths(c: &mut Criterion) {
    c.bench_function("scene_lengths_in_eighths", |b| {
        let snapshot = sample_script(200);
        let Ok(result) = PaginationOperation::new(
            snapshot.clone(),
            TitlePage::default(),
            PaginationSettings::default(),
            provider(),
        )
        .run() else {
            return;
        };

        let mut scene_starts: Vec<usize> = snapshot
            .lines()
            .iter()
            .filter(|line| line.kind == LineKind::SceneHeading)
            .map(|line| line.source_offset)
            .collect();
        scene_starts.push(snapshot.source_len());

        b.iter(|| {
            let mut total = 0usize;
            for pair in scene_starts.windows(2) {
                let range = SourceRange::new(pair[0], pair[1] - pair[0]);
                let (pages, eighths) = result.length_in_eighths(black_box(range));
                total += pages * 8 + eighths;
            }
            total
        });
    });
}

criterion_group!(
    benches,
    bench_full_pagination,
    bench_live_repagination,
    bench_line_wrap,
    bench_scene_lengths,
);

criterion_main!(benches);
