use criterion::{criterion_group, criterion_main, Criterion};
use dynamo_core::cell_list::CellList;
use dynamo_core::vector::Vec3;

fn build_populated_list(n: usize, box_size: f64) -> CellList {
    let per_axis = (n as f64).cbrt().ceil() as usize;
    let spacing = box_size / per_axis as f64;
    let mut list = CellList::new(Vec3::new(box_size, box_size, box_size), 1.0, n);
    let mut id = 0;
    'outer: for ix in 0..per_axis {
        for iy in 0..per_axis {
            for iz in 0..per_axis {
                if id >= n {
                    break 'outer;
                }
                let position = Vec3::new(
                    (ix as f64 + 0.5) * spacing - box_size / 2.0,
                    (iy as f64 + 0.5) * spacing - box_size / 2.0,
                    (iz as f64 + 0.5) * spacing - box_size / 2.0,
                );
                list.insert(id, position);
                id += 1;
            }
        }
    }
    list
}

fn neighbourhood_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("CellList neighbourhood");

    let list = build_populated_list(1_000, 50.0);
    group.bench_function("1k particles", |b| {
        b.iter(|| {
            let mut count = 0usize;
            list.neighbourhood(Vec3::new(0.0, 0.0, 0.0), |_id| count += 1);
            count
        })
    });

    let list = build_populated_list(10_000, 100.0);
    group.bench_function("10k particles", |b| {
        b.iter(|| {
            let mut count = 0usize;
            list.neighbourhood(Vec3::new(0.0, 0.0, 0.0), |_id| count += 1);
            count
        })
    });
}

fn update_churn(c: &mut Criterion) {
    let mut list = build_populated_list(5_000, 75.0);
    c.bench_function("CellList::update 5k particles round-robin", |b| {
        let mut id = 0usize;
        b.iter(|| {
            list.update(id, Vec3::new((id % 7) as f64 - 3.0, 0.0, 0.0));
            id = (id + 1) % 5_000;
        })
    });
}

criterion_group!(benches, neighbourhood_query, update_churn);
criterion_main!(benches);
