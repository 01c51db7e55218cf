use code_anchor_core::{
    filter_anchors, rebase_anchors, reorder_anchors, Anchor, AnchorIcon, EditEvent, Selection,
    TextEdit, MAX_ANCHORS,
};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn full_list() -> Vec<Anchor> {
    (0..MAX_ANCHORS as u32)
        .map(|i| {
            let selection = Selection {
                file_path: format!("/work/src/module_{}.rs", i % 4).into(),
                start_line: i * 10,
                end_line: i * 10 + 2,
                text: format!("fn handler_{i}() {{}}"),
            };
            Anchor::from_selection(&selection, AnchorIcon::Todo, "check error path").unwrap()
        })
        .collect()
}

fn rebase_batch(c: &mut Criterion) {
    let anchors = full_list();
    let event = EditEvent::new(
        "/work/src/module_1.rs",
        vec![
            TextEdit::new(3, 5, "a\nb\nc\nd\n"),
            TextEdit::new(40, 40, ""),
            TextEdit::new(90, 120, "\n"),
        ],
    );

    c.bench_function("rebase_batch", |b| {
        b.iter(|| {
            let mut anchors = anchors.clone();
            rebase_anchors(&mut anchors, black_box(&event))
        })
    });
}

fn filter_list(c: &mut Criterion) {
    let anchors = full_list();

    c.bench_function("filter_list", |b| {
        b.iter(|| filter_anchors(&anchors, black_box("MODULE_3")).len())
    });
}

fn reorder_list(c: &mut Criterion) {
    let anchors = full_list();
    let dragged = vec![anchors[2].id().clone(), anchors[17].id().clone()];
    let target = anchors[9].id().clone();

    c.bench_function("reorder_list", |b| {
        b.iter(|| reorder_anchors(&anchors, black_box(&dragged), Some(&target)))
    });
}

criterion_group!(benches, rebase_batch, filter_list, reorder_list);
criterion_main!(benches);
