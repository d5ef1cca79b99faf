use criterion::{Criterion, black_box, criterion_group, criterion_main};
use textile_color::conflicts::{CatalogColor, ConflictDetector};

/// A catalog spread over the whole sRGB cube, deterministic between runs
fn catalog(size: usize) -> Vec<CatalogColor> {
    let mut seed: u32 = 0x5EED;
    (0..size)
        .map(|index| {
            seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            CatalogColor::new(format!("c{index}"), format!("Color {index}"))
                .with_hex(format!("#{:06X}", seed >> 8))
        })
        .collect()
}

fn benchmark_all_pairs(c: &mut Criterion) {
    let colors = catalog(300);
    let plain = ConflictDetector::default();
    let pruned = ConflictDetector::default().with_lightness_pruning(true);

    c.bench_function("find_all_conflicts_300", |b| {
        b.iter(|| plain.find_all_conflicts(black_box(&colors)))
    });
    c.bench_function("find_all_conflicts_300_pruned", |b| {
        b.iter(|| pruned.find_all_conflicts(black_box(&colors)))
    });
}

criterion_group!(benches, benchmark_all_pairs);
criterion_main!(benches);
