use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use kdtree_knn::kdtree::{KDTree, KDTreeBuilder, KDTreeIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rstar::RTree;

fn random_coords(num_items: usize, num_dims: usize) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(0);
    (0..num_items * num_dims)
        .map(|_| rng.gen_range(-1000.0..1000.0))
        .collect()
}

fn construct_kdtree(coords: &[f64], num_dims: usize) -> KDTree<f64> {
    let mut builder = KDTreeBuilder::new_with_capacity(num_dims, coords.len() / num_dims).unwrap();
    for (id, point) in coords.chunks(num_dims).enumerate() {
        builder.add(id as i64, point).unwrap();
    }
    builder.finish()
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let coords = random_coords(100_000, 2);
    let points: Vec<[f64; 2]> = coords.chunks(2).map(|p| [p[0], p[1]]).collect();

    c.bench_function("construction (kdtree)", |b| {
        b.iter(|| construct_kdtree(&coords, 2))
    });

    c.bench_function("construction (rstar bulk)", |b| {
        b.iter(|| RTree::bulk_load(points.clone()))
    });

    let kdtree = construct_kdtree(&coords, 2);
    let rstar_tree = RTree::bulk_load(points.clone());
    let query = [12.5, -40.25];

    let mut group = c.benchmark_group("neighbors");
    for num_neighbors in [1, 10, 100] {
        group.bench_with_input(
            BenchmarkId::new("kdtree", num_neighbors),
            &num_neighbors,
            |b, &n| b.iter(|| kdtree.nearest(&query, n).unwrap()),
        );
        group.bench_with_input(
            BenchmarkId::new("rstar", num_neighbors),
            &num_neighbors,
            |b, &n| {
                b.iter(|| {
                    rstar_tree
                        .nearest_neighbor_iter(&query)
                        .take(n)
                        .collect::<Vec<_>>()
                })
            },
        );
    }
    group.finish();

    // higher dimensions have no rstar counterpart here
    let coords = random_coords(100_000, 5);
    let kdtree = construct_kdtree(&coords, 5);
    let query = [1., 2., 3., 4., 5.];
    c.bench_function("neighbors 5d (kdtree, 10)", |b| {
        b.iter(|| kdtree.nearest(&query, 10).unwrap())
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
