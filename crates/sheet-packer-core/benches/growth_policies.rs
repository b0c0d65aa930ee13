use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rand::{Rng, SeedableRng};
use sheet_packer_core::prelude::*;

fn generate_sprites(count: usize, min_size: u32, max_size: u32) -> Vec<(String, u32, u32)> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(0x5eed);
    (0..count)
        .map(|i| {
            let w = rng.gen_range(min_size..=max_size);
            let h = rng.gen_range(min_size..=max_size);
            (format!("sprite_{}", i), w, h)
        })
        .collect()
}

fn constraints_for(policy: GrowthPolicy) -> Constraints {
    match policy {
        GrowthPolicy::HighestFit => Constraints::new(4096, 4096, false, false),
        GrowthPolicy::HighestFitAspect => Constraints::new(4096, 2048, false, true),
        GrowthPolicy::DiagonalFitPow2 => Constraints::new(4096, 4096, true, false),
        GrowthPolicy::DiagonalFitAspectPow2 => Constraints::new(4096, 2048, true, true),
    }
    .unwrap_or_default()
}

fn build_sheet(constraints: &Constraints, sprites: &[(String, u32, u32)]) -> Sheet<String> {
    let mut sheet = Sheet::new(constraints.clone());
    for (key, w, h) in sprites {
        sheet.push_sprite(key.clone(), *w, *h);
    }
    sheet
}

fn bench_growth_policies(c: &mut Criterion) {
    let mut group = c.benchmark_group("growth_policies");
    let policies = [
        GrowthPolicy::HighestFit,
        GrowthPolicy::HighestFitAspect,
        GrowthPolicy::DiagonalFitPow2,
        GrowthPolicy::DiagonalFitAspectPow2,
    ];

    for count in [50usize, 100, 200] {
        let sprites = generate_sprites(count, 16, 64);
        group.throughput(Throughput::Elements(count as u64));

        for policy in policies {
            let constraints = constraints_for(policy);
            group.bench_with_input(
                BenchmarkId::new(policy.name(), count),
                &sprites,
                |b, sprites| {
                    b.iter(|| {
                        let mut sheet = build_sheet(&constraints, sprites);
                        let mut packer = SheetPacker::new(policy);
                        let _ = packer.pack(&mut sheet, &constraints);
                        black_box((sheet.width, sheet.height))
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_repack(c: &mut Criterion) {
    let mut group = c.benchmark_group("repack");
    let sprites = generate_sprites(100, 8, 48);
    let constraints = Constraints::default();
    let mut sheet = build_sheet(&constraints, &sprites);
    let mut packer = SheetPacker::for_constraints(&constraints);

    group.bench_function("reuse_packer", |b| {
        b.iter(|| {
            sheet.reset_positions();
            black_box(packer.pack(&mut sheet, &constraints).is_ok())
        });
    });

    group.finish();
}

criterion_group!(benches, bench_growth_policies, bench_repack);
criterion_main!(benches);
