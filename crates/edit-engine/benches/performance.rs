use criterion::{Criterion, black_box, criterion_group, criterion_main};
use edit_engine::cursor::{CursorSet, insert_at_cursors};
use edit_engine::geometry::position_for_offset;
use edit_engine::surface::SurfaceLayout;

fn bench_normalize(c: &mut Criterion) {
    c.bench_function("normalize 200 cursors", |b| {
        b.iter(|| {
            let mut set = CursorSet::new();
            for i in 0..200 {
                set.add(i * 7 % 4000, i * 7 % 4000 + 3, 4000);
            }
            black_box(set.len())
        })
    });
}

fn bench_multi_caret_insert(c: &mut Criterion) {
    let text = "lorem ipsum dolor sit amet\n".repeat(200);
    let mut set = CursorSet::new();
    let len = text.chars().count();
    for i in 0..50 {
        set.add(i * 100, i * 100, len);
    }

    c.bench_function("insert at 50 carets", |b| {
        b.iter(|| {
            let (new_text, cursors) = insert_at_cursors(&text, set.cursors(), "x");
            black_box((new_text.len(), cursors.len()))
        })
    });
}

fn bench_geometry(c: &mut Criterion) {
    let text = "some wrapping text that goes on and on and on\n".repeat(100);
    let layout = SurfaceLayout::default();

    c.bench_function("position for offset in 100 lines", |b| {
        b.iter(|| black_box(position_for_offset(&text, 3200, Some(&layout))))
    });
}

criterion_group!(
    benches,
    bench_normalize,
    bench_multi_caret_insert,
    bench_geometry
);
criterion_main!(benches);
