use criterion::{Criterion, black_box, criterion_group, criterion_main};
use h5p_package::{DependencyGraph, LibraryId, LibraryRecord, aggregate, resolve};

/// A layered graph where every library depends on all libraries of the
/// previous layer.
fn layered_graph(layers: usize, width: usize) -> DependencyGraph {
    let id = |layer: usize, i: usize| LibraryId::new(format!("L{layer}.N{i}"), 1, 0).unwrap();

    let mut graph = DependencyGraph::new();
    for layer in 0..layers {
        for i in 0..width {
            let deps = if layer == 0 {
                Vec::new()
            } else {
                (0..width).map(|j| id(layer - 1, j)).collect()
            };
            graph.insert(LibraryRecord::new(
                id(layer, i),
                vec![format!("js/n{i}.js")],
                vec![format!("css/n{i}.css")],
                deps,
            ));
        }
    }
    graph
}

fn resolve_benchmark(c: &mut Criterion) {
    let graph = layered_graph(8, 16);
    c.bench_function("dependency::resolve (8x16 layered)", |b| {
        b.iter(|| resolve(black_box(&graph)).unwrap())
    });

    let order = resolve(&graph).unwrap();
    c.bench_function("assets::aggregate (8x16 layered)", |b| {
        b.iter(|| aggregate(black_box(&order), black_box(&graph)).unwrap())
    });
}

criterion_group!(benches, resolve_benchmark);
criterion_main!(benches);
