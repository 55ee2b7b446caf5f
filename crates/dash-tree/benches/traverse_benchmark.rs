//! Traversal and lookup benchmarks.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dash_core::{Child, ComponentSchema, Node};
use dash_tree::{count, traverse, Navigator};

fn schema() -> Arc<ComponentSchema> {
    ComponentSchema::builder("Div", "bench_components")
        .props(["children", "id"])
        .build()
}

fn leaf(schema: &Arc<ComponentSchema>, id: String) -> Node {
    match Node::builder(schema.clone()).id(id).build() {
        Ok(node) => node,
        Err(err) => panic!("bench component failed to build: {err}"),
    }
}

/// One root with `width` rows of `width` cells each, interleaved with text.
fn wide_tree(width: usize) -> Node {
    let schema = schema();
    let rows: Vec<Child> = (0..width)
        .map(|r| {
            let mut row = leaf(&schema, format!("row-{r}"));
            let cells: Vec<Child> = (0..width)
                .flat_map(|c| [leaf(&schema, format!("cell-{r}-{c}")).into(), Child::from("text")])
                .collect();
            row.set_children(cells);
            row.into()
        })
        .collect();

    let mut root = Node::new(schema);
    root.set_children(rows);
    root
}

/// A single chain of nested nodes.
fn deep_tree(depth: usize) -> Node {
    let schema = schema();
    let mut node = leaf(&schema, "bottom".to_string());
    for i in 0..depth {
        let mut parent = leaf(&schema, format!("level-{i}"));
        parent.set_children(node);
        node = parent;
    }
    node
}

fn traverse_wide(c: &mut Criterion) {
    let root = wide_tree(50);
    c.bench_function("traverse_wide", |b| {
        b.iter(|| traverse(black_box(&root)).count())
    });
    c.bench_function("count_wide", |b| b.iter(|| count(black_box(&root))));
}

fn get_last(c: &mut Criterion) {
    let root = wide_tree(50);
    let nav = Navigator::new(&root);
    c.bench_function("get_last_wide", |b| {
        b.iter(|| nav.get(black_box("cell-49-49")).is_ok())
    });
}

fn get_deep(c: &mut Criterion) {
    let root = deep_tree(1_000);
    let nav = Navigator::new(&root);
    c.bench_function("get_bottom_deep", |b| {
        b.iter(|| nav.get(black_box("bottom")).is_ok())
    });
}

criterion_group!(benches, traverse_wide, get_last, get_deep);
criterion_main!(benches);
