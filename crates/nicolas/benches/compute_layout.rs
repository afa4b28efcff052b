use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use nicolas::{LayoutConfig, Relationship, RelationshipKind, compute_layout};
use std::collections::BTreeSet;
use std::hint::black_box;
use std::time::Duration;

#[derive(Debug, Clone)]
struct SyntheticSchema {
    nodes: Vec<String>,
    edges: Vec<Relationship>,
    selected: BTreeSet<String>,
}

/// Clusters of `cluster_size` entities, each a small hierarchy with a few cross links, chained
/// together by single bridge relationships.
fn build_schema(name: &str, node_count: usize, cluster_size: usize) -> SyntheticSchema {
    let nodes: Vec<String> = (0..node_count).map(|i| format!("{name}_e{i:04}")).collect();
    let mut edges: Vec<Relationship> = Vec::new();

    for start in (0..node_count).step_by(cluster_size) {
        let end = (start + cluster_size).min(node_count);
        for i in (start + 1)..end {
            let parent = start + (i - start - 1) / 2;
            edges.push(Relationship::new(
                nodes[i].clone(),
                nodes[parent].clone(),
                RelationshipKind::ManyToOne,
            ));
            if i + 2 < end {
                edges.push(Relationship::new(
                    nodes[i].clone(),
                    nodes[i + 2].clone(),
                    RelationshipKind::ManyToMany,
                ));
            }
        }
        if end < node_count {
            edges.push(Relationship::new(
                nodes[start].clone(),
                nodes[end].clone(),
                RelationshipKind::OneToMany,
            ));
        }
    }

    let selected = nodes.iter().cloned().collect();
    SyntheticSchema {
        nodes,
        edges,
        selected,
    }
}

fn bench_compute_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_layout");
    group.measurement_time(Duration::from_secs(10));

    let cases = [
        ("schema_50_c8", 50usize, 8usize),
        ("schema_200_c12", 200usize, 12usize),
        ("schema_400_c16", 400usize, 16usize),
    ];

    let config = LayoutConfig::default();
    for (name, nodes, cluster) in cases {
        let schema = build_schema(name, nodes, cluster);
        group.bench_with_input(BenchmarkId::new("compute_layout", name), &schema, |b, schema| {
            b.iter(|| {
                let out = compute_layout(
                    black_box(&schema.nodes),
                    black_box(&schema.edges),
                    black_box(&schema.selected),
                    &config,
                );
                black_box(out.len());
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_compute_layout);
criterion_main!(benches);
